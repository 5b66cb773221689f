//! Configuration errors.

use std::time::Duration;

use thiserror::Error;

/// Invalid construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The system clock is too slow.
    #[error("system clock of {freq_hz} Hz is below the minimum of {min_hz} Hz")]
    SysClockTooSlow {
        /// Requested frequency.
        freq_hz: u64,
        /// Minimum frequency.
        min_hz: u64,
    },

    /// The LFPS square-wave frequency is outside the allowed band.
    #[error("LFPS clock of {freq_hz} Hz is outside {min_hz}..={max_hz} Hz")]
    LfpsClockOutOfBand {
        /// Requested frequency.
        freq_hz: u64,
        /// Minimum frequency.
        min_hz: u64,
        /// Maximum frequency.
        max_hz: u64,
    },

    /// A timing template is not ordered as `min <= typ <= max`.
    #[error("timing is not ordered: min {min:?}, typ {typ:?}, max {max:?}")]
    UnorderedTiming {
        /// Typical duration.
        typ: Duration,
        /// Minimum duration.
        min: Duration,
        /// Maximum duration.
        max: Duration,
    },

    /// The LFPS pattern has no repeat period to detect.
    #[error("LFPS pattern `{pattern}` has no repeat period")]
    MissingRepeat {
        /// Pattern name.
        pattern: &'static str,
    },

    /// The repeat period is too short to tell bursts apart.
    #[error("LFPS pattern `{pattern}` repeats every {repeat} ticks, too short for bursts of {burst} ticks")]
    RepeatTooShort {
        /// Pattern name.
        pattern: &'static str,
        /// Burst length in ticks.
        burst: u32,
        /// Repeat period in ticks.
        repeat: u32,
    },

    /// A duration does not fit the tick counters.
    #[error("{duration:?} at {freq_hz} Hz overflows the tick counters")]
    TickOverflow {
        /// Duration to convert.
        duration: Duration,
        /// Tick rate.
        freq_hz: u64,
    },

    /// The lock sequencer timer would never run.
    #[error("the RX lock timer must be non-zero")]
    ZeroLockTimer,
}
