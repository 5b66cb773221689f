//! LFPS pattern generator.

use crate::lfps::*;
use crate::*;

/// Pattern generator outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorStatus {
    /// TX pins.
    pub tx: TxLine,

    /// A pattern cycle is in progress.
    pub busy: bool,

    /// Pattern cycles completed since generation was requested (wrapping).
    ///
    /// Accumulates across consecutive cycles and clears only once the generator is idle with `generate`
    /// deasserted.
    pub count: u16,
}

impl_signal_default!(GeneratorStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum GeneratorPhase {
    #[default]
    Idle,
    BurstAndWait,
}

/// Registers of the pattern generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorState {
    phase: GeneratorPhase,
    /// Request registered for the burst generator.
    request: BurstRequest,
    repeat_left: u32,
    count: u16,
    burst: BurstState,
}

impl_signal_default!(GeneratorState);

impl GeneratorState {
    /// Returns the number of completed pattern cycles.
    pub fn count(&self) -> u16 { self.count }
}

/// Generates an LFPS pattern for as long as `generate` is asserted.
///
/// Each cycle starts one burst lasting one tick more than the pattern's typical length, then waits out the typical
/// repeat period. Between cycles the generator drives electrical idle for as long as `generate` is asserted.
#[derive(Debug, Clone)]
pub struct PatternGenerator<const W: usize> {
    burst: BurstGenerator<W>,
    burst_ticks: u32,
    repeat_ticks: u32,
}

impl<const W: usize> PatternGenerator<W> {
    /// Creates a pattern generator. A pattern without repeat period is repeated back-to-back.
    pub fn new(pattern: &LfpsPattern, sys_clk_freq_hz: u64, lfps_clk_freq_hz: u64) -> Result<Self, ConfigError> {
        let burst = BurstGenerator::new(sys_clk_freq_hz, lfps_clk_freq_hz)?;
        let burst_ticks = ticks_floor(pattern.burst().typ(), sys_clk_freq_hz)?;
        let repeat_ticks = match pattern.repeat() {
            Some(repeat) => ticks_floor(repeat.typ(), sys_clk_freq_hz)?,
            None => burst_ticks,
        };
        Ok(Self { burst, burst_ticks, repeat_ticks })
    }

    /// Returns the burst countdown in ticks. Bursts last one tick longer.
    pub fn burst_ticks(&self) -> u32 { self.burst_ticks }

    /// Returns the repeat period in ticks.
    pub fn repeat_ticks(&self) -> u32 { self.repeat_ticks }
}

impl<const W: usize> Fsm for PatternGenerator<W> {
    type I = UniChannel<bool>;
    type O = UniChannel<GeneratorStatus>;
    type S = GeneratorState;

    fn init(&self) -> GeneratorState { GeneratorState::x() }

    fn logic(&self, generate: &bool, _: &(), s: &GeneratorState) -> (GeneratorStatus, (), GeneratorState) {
        let (burst, (), burst_next) = self.burst.logic(&s.request, &(), &s.burst);
        let mut s_next = GeneratorState { burst: burst_next, ..*s };

        let status = match s.phase {
            GeneratorPhase::Idle => {
                if *generate {
                    s_next.phase = GeneratorPhase::BurstAndWait;
                    s_next.request = BurstRequest { start: true, length: self.burst_ticks };
                    s_next.repeat_left = self.repeat_ticks;
                } else {
                    s_next.count = 0;
                }
                GeneratorStatus { tx: TxLine { idle: *generate, pattern: 0 }, busy: false, count: s.count }
            }
            GeneratorPhase::BurstAndWait => {
                s_next.request.start = false;
                s_next.repeat_left = s.repeat_left.saturating_sub(1);
                if s.repeat_left == 0 {
                    s_next.phase = GeneratorPhase::Idle;
                    s_next.count = s.count.wrapping_add(1);
                }
                GeneratorStatus { tx: burst.tx, busy: true, count: s.count }
            }
        };

        (status, (), s_next)
    }

    fn on_transition(&self, from: &GeneratorState, to: &GeneratorState) {
        if from.phase != to.phase {
            tracing::debug!(from = ?from.phase, to = ?to.phase, count = to.count, "LFPS generator");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYS_HZ: u64 = 125_000_000;

    fn polling() -> Machine<PatternGenerator<2>> {
        Machine::new(PatternGenerator::new(&LfpsPattern::POLLING, SYS_HZ, 30_000_000).unwrap())
    }

    #[test]
    fn polling_cycle_lengths() {
        let mut generator = polling();
        let statuses = (0..5009).map(|_| generator.step(&true, &()).0).collect::<Vec<_>>();

        // One tick of idle between cycles.
        let busy_runs =
            statuses.split(|status| !status.busy).map(<[_]>::len).filter(|len| *len > 0).collect::<Vec<_>>();
        assert_eq!(busy_runs, vec![1251; 4]);

        // The burst starts one tick into the cycle.
        let burst_ticks = statuses[1..1252].iter().filter(|status| !status.tx.idle).count();
        assert_eq!(burst_ticks, 126);
        assert_eq!(burst_ticks, generator.fsm().burst_ticks() as usize + 1);
        assert!(statuses[2..128].iter().all(|status| !status.tx.idle));

        // Within 10% of the typical durations.
        let burst_ns = burst_ticks as f64 * 8.0;
        let cycle_ns = (busy_runs[0] + 1) as f64 * 8.0;
        assert!((burst_ns - 1_000.0).abs() <= 100.0);
        assert!((cycle_ns - 10_000.0).abs() <= 1_000.0);

        assert_eq!(statuses[1251].count, 0);
        assert_eq!(statuses[1252].count, 1);
        assert_eq!(statuses[2504].count, 2);
    }

    #[test]
    fn count_clears_when_released() {
        let mut generator = polling();
        for _ in 0..1300 {
            generator.step(&true, &());
        }
        assert_eq!(generator.state().count(), 1);

        // Finishes the current cycle, then clears.
        let mut released = Vec::new();
        while released.len() < 2 {
            let (status, ()) = generator.step(&false, &());
            if !status.busy {
                released.push(status.count);
            }
        }
        assert_eq!(released, vec![2, 0]);
        assert_eq!(generator.state().count(), 0);
    }

    #[test]
    fn single_burst_pattern_repeats_back_to_back() {
        let generator = PatternGenerator::<2>::new(&LfpsPattern::RESET, SYS_HZ, 30_000_000).unwrap();
        assert_eq!(generator.burst_ticks(), 12_500_000);
        assert_eq!(generator.repeat_ticks(), generator.burst_ticks());
    }
}
