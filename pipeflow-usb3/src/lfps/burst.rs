//! LFPS burst generator.

use std::marker::PhantomData;
use std::time::Duration;

use crate::constants::lfps::*;
use crate::lfps::TxLine;
use crate::*;

/// Burst request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BurstRequest {
    /// Starts a burst. Sampled while idle.
    pub start: bool,

    /// Burst countdown, sampled while idle. The burst lasts `length + 1` ticks.
    pub length: u32,
}

impl_signal_default!(BurstRequest);

/// Burst generator outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BurstStatus {
    /// No burst in progress.
    pub done: bool,

    /// TX pins.
    pub tx: TxLine,
}

impl_signal_default!(BurstStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BurstPhase {
    #[default]
    Idle,
    Burst,
}

/// Registers of the burst generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BurstState {
    phase: BurstPhase,
    /// Free-running square wave.
    square: bool,
    /// Ticks until the square wave toggles.
    timer: u32,
    /// Burst ticks left after the current one.
    cycles_left: u32,
}

impl_signal_default!(BurstState);

/// Generates one burst of the LFPS square wave per request.
///
/// The square wave toggles every `timer_max` ticks, where `timer_max = ceil(f_sys / (2 * f_lfps)) - 1`, and
/// restarts in phase at the beginning of each burst. During a burst every pattern bit follows the square wave.
/// A burst requested with `length` lasts `length + 1` ticks.
#[derive(Debug, Clone)]
pub struct BurstGenerator<const W: usize> {
    timer_max: u32,
    pattern_mask: u64,
    _marker: PhantomData<Word<W>>,
}

impl<const W: usize> BurstGenerator<W> {
    /// Creates a burst generator for a `sys_clk_freq_hz` tick rate.
    pub fn new(sys_clk_freq_hz: u64, lfps_clk_freq_hz: u64) -> Result<Self, ConfigError> {
        if !(CLK_FREQ_MIN_HZ..=CLK_FREQ_MAX_HZ).contains(&lfps_clk_freq_hz) {
            return Err(ConfigError::LfpsClockOutOfBand {
                freq_hz: lfps_clk_freq_hz,
                min_hz: CLK_FREQ_MIN_HZ,
                max_hz: CLK_FREQ_MAX_HZ,
            });
        }

        let half_period = sys_clk_freq_hz.div_ceil(2 * lfps_clk_freq_hz);
        let timer_max = u32::try_from(half_period.saturating_sub(1)).map_err(|_| ConfigError::TickOverflow {
            duration: Duration::from_secs(1) / 2 / u32::try_from(lfps_clk_freq_hz).unwrap_or(u32::MAX),
            freq_hz: sys_clk_freq_hz,
        })?;

        let pattern_bits = PATTERN_BITS_PER_SYMBOL * Word::<W>::WIDTH;
        Ok(Self { timer_max, pattern_mask: (1 << pattern_bits) - 1, _marker: PhantomData })
    }

    /// Returns the square wave's toggle interval in ticks.
    pub fn timer_max(&self) -> u32 { self.timer_max }
}

impl<const W: usize> Fsm for BurstGenerator<W> {
    type I = UniChannel<BurstRequest>;
    type O = UniChannel<BurstStatus>;
    type S = BurstState;

    fn init(&self) -> BurstState { BurstState::x() }

    fn logic(&self, request: &BurstRequest, _: &(), s: &BurstState) -> (BurstStatus, (), BurstState) {
        let (square, timer) = if s.timer == 0 {
            (!s.square, self.timer_max.saturating_sub(1))
        } else {
            (s.square, s.timer - 1)
        };

        match s.phase {
            BurstPhase::Idle => {
                let phase = if request.start { BurstPhase::Burst } else { BurstPhase::Idle };
                let s_next = BurstState { phase, square, timer: 0, cycles_left: request.length };
                (BurstStatus { done: true, tx: TxLine::IDLE }, (), s_next)
            }
            BurstPhase::Burst => {
                let pattern = if s.square { self.pattern_mask } else { 0 };
                let phase = if s.cycles_left == 0 { BurstPhase::Idle } else { BurstPhase::Burst };
                let s_next = BurstState { phase, square, timer, cycles_left: s.cycles_left.saturating_sub(1) };
                (BurstStatus { done: false, tx: TxLine { idle: false, pattern } }, (), s_next)
            }
        }
    }
}
