//! LFPS detector.

use crate::constants::lfps::IDLE_SYNC_STAGES;
use crate::lfps::*;
use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DetectorPhase {
    /// Sampling the line once per burst period.
    #[default]
    AwaitBurst,
    /// Expecting idle until the next burst.
    AwaitRepeat,
}

/// Registers of the LFPS detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectorState {
    phase: DetectorPhase,
    count: u32,
    /// A full idle interval was seen; the next burst completes the pattern.
    found: bool,
}

impl_signal_default!(DetectorState);

/// Detects a repeating LFPS pattern on the synchronized RX idle line.
///
/// The line is sampled once every burst period. An idle sample starts the wait for the rest of the repeat
/// period; if the line stays idle until it elapses, the next non-idle sample is reported as a one-tick pulse.
/// Any activity during the wait restarts the search.
#[derive(Debug, Clone)]
pub struct Detector {
    pattern: &'static str,
    burst_reload: u32,
    repeat_reload: u32,
}

impl Detector {
    /// Creates a detector for `pattern` at a `sys_clk_freq_hz` tick rate.
    pub fn new(pattern: &LfpsPattern, sys_clk_freq_hz: u64) -> Result<Self, ConfigError> {
        let repeat = pattern.repeat().ok_or(ConfigError::MissingRepeat { pattern: pattern.name() })?;
        let burst = ticks_ceil(pattern.burst().typ(), sys_clk_freq_hz)?;
        let repeat = ticks_ceil(repeat.typ(), sys_clk_freq_hz)?;

        if burst == 0 || u64::from(repeat) <= 2 * u64::from(burst) {
            return Err(ConfigError::RepeatTooShort { pattern: pattern.name(), burst, repeat });
        }
        Ok(Self { pattern: pattern.name(), burst_reload: burst - 1, repeat_reload: repeat - 2 * burst - 1 })
    }
}

impl Fsm for Detector {
    type I = UniChannel<bool>;
    type O = UniChannel<bool>;
    type S = DetectorState;

    fn init(&self) -> DetectorState { DetectorState::x() }

    fn logic(&self, idle: &bool, _: &(), s: &DetectorState) -> (bool, (), DetectorState) {
        match s.phase {
            DetectorPhase::AwaitBurst => {
                let detect = s.found && !idle;
                let mut s_next = DetectorState { count: s.count.saturating_sub(1), found: s.found && !detect, ..*s };
                if s.count == 0 {
                    if *idle {
                        s_next.phase = DetectorPhase::AwaitRepeat;
                        s_next.count = self.repeat_reload;
                    } else {
                        s_next.count = self.burst_reload;
                    }
                }
                (detect, (), s_next)
            }
            DetectorPhase::AwaitRepeat => {
                let s_next = if s.count == 0 || !idle {
                    DetectorState { phase: DetectorPhase::AwaitBurst, count: self.burst_reload, found: s.count == 0 }
                } else {
                    DetectorState { count: s.count - 1, ..*s }
                };
                (false, (), s_next)
            }
        }
    }

    fn on_transition(&self, from: &DetectorState, to: &DetectorState) {
        if from.found && !to.found && to.phase == DetectorPhase::AwaitBurst && from.phase == to.phase {
            tracing::debug!(pattern = self.pattern, "LFPS detected");
        }
    }
}

/// Creates an LFPS detector on the raw, unsynchronized RX idle line.
pub fn detector(
    pattern: &LfpsPattern, sys_clk_freq_hz: u64,
) -> Result<Module<UniChannel<bool>, UniChannel<bool>>, ConfigError> {
    let detector = Machine::new(Detector::new(pattern, sys_clk_freq_hz)?);
    let sync = Machine::new(Synchronizer::<bool, IDLE_SYNC_STAGES>::new(false));
    Ok(sync.chain(detector).build("lfps_detector"))
}
