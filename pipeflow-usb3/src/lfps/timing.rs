//! LFPS timing templates.

use std::time::Duration;

use crate::*;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Allowed range of an LFPS duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LfpsTiming {
    typ: Duration,
    min: Duration,
    max: Duration,
}

impl LfpsTiming {
    /// Creates a timing, checking `min <= typ <= max`.
    pub fn new(typ: Duration, min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min <= typ && typ <= max {
            Ok(Self { typ, min, max })
        } else {
            Err(ConfigError::UnorderedTiming { typ, min, max })
        }
    }

    /// Creates a timing from nanoseconds. Fails const evaluation if unordered.
    const fn checked(typ_ns: u64, min_ns: u64, max_ns: u64) -> Self {
        assert!(min_ns <= typ_ns && typ_ns <= max_ns, "unordered LFPS timing");
        Self { typ: Duration::from_nanos(typ_ns), min: Duration::from_nanos(min_ns), max: Duration::from_nanos(max_ns) }
    }

    /// Returns the typical duration.
    pub fn typ(&self) -> Duration { self.typ }

    /// Returns the minimum duration.
    pub fn min(&self) -> Duration { self.min }

    /// Returns the maximum duration.
    pub fn max(&self) -> Duration { self.max }

    /// Returns whether `duration` is within range.
    pub fn contains(&self, duration: Duration) -> bool { self.min <= duration && duration <= self.max }
}

/// LFPS pattern: a burst, repeated with a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LfpsPattern {
    name: &'static str,
    burst: LfpsTiming,
    repeat: Option<LfpsTiming>,
}

impl LfpsPattern {
    /// Polling.LFPS.
    pub const POLLING: Self = Self {
        name: "Polling",
        burst: LfpsTiming::checked(1_000, 600, 1_400),
        repeat: Some(LfpsTiming::checked(10_000, 6_000, 14_000)),
    };

    /// Warm reset: one long burst.
    pub const RESET: Self =
        Self { name: "Reset", burst: LfpsTiming::checked(100_000_000, 80_000_000, 120_000_000), repeat: None };

    /// Creates a pattern.
    pub const fn new(name: &'static str, burst: LfpsTiming, repeat: Option<LfpsTiming>) -> Self {
        Self { name, burst, repeat }
    }

    /// Returns the pattern name.
    pub fn name(&self) -> &'static str { self.name }

    /// Returns the burst duration.
    pub fn burst(&self) -> LfpsTiming { self.burst }

    /// Returns the period between burst starts, if the pattern repeats.
    pub fn repeat(&self) -> Option<LfpsTiming> { self.repeat }
}

fn ticks(duration: Duration, freq_hz: u64, round_up: bool) -> Result<u32, ConfigError> {
    let scaled = duration.as_nanos() * u128::from(freq_hz);
    let ticks = if round_up { scaled.div_ceil(NANOS_PER_SEC) } else { scaled / NANOS_PER_SEC };
    u32::try_from(ticks).map_err(|_| ConfigError::TickOverflow { duration, freq_hz })
}

/// Returns the number of `freq_hz` ticks covering `duration`, rounded up.
pub fn ticks_ceil(duration: Duration, freq_hz: u64) -> Result<u32, ConfigError> { ticks(duration, freq_hz, true) }

/// Returns the number of whole `freq_hz` ticks within `duration`.
pub fn ticks_floor(duration: Duration, freq_hz: u64) -> Result<u32, ConfigError> { ticks(duration, freq_hz, false) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_rounding() {
        let burst = LfpsPattern::POLLING.burst().typ();
        assert_eq!(ticks_ceil(burst, 125_000_000), Ok(125));
        assert_eq!(ticks_floor(burst, 125_000_000), Ok(125));
        assert_eq!(ticks_ceil(burst, 156_250_000), Ok(157));
        assert_eq!(ticks_floor(burst, 156_250_000), Ok(156));
        assert_eq!(
            ticks_ceil(Duration::from_secs(100), 125_000_000),
            Err(ConfigError::TickOverflow { duration: Duration::from_secs(100), freq_hz: 125_000_000 })
        );
    }

    #[test]
    fn timing_must_be_ordered() {
        let ns = Duration::from_nanos;
        assert!(LfpsTiming::new(ns(1_000), ns(600), ns(1_400)).is_ok());
        assert_eq!(
            LfpsTiming::new(ns(500), ns(600), ns(1_400)),
            Err(ConfigError::UnorderedTiming { typ: ns(500), min: ns(600), max: ns(1_400) })
        );
        assert!(LfpsPattern::POLLING.burst().contains(ns(1_400)));
        assert!(!LfpsPattern::POLLING.repeat().is_some_and(|repeat| repeat.contains(ns(15_000))));
        assert_eq!(LfpsPattern::RESET.repeat(), None);
    }
}
