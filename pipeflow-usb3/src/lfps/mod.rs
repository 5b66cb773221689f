//! Low-frequency periodic signaling (LFPS).
//!
//! Before a data link exists, link partners signal each other with bursts of a 10-50 MHz square wave separated
//! by electrical idle. The pattern of burst and repeat durations identifies the request, e.g., Polling.

mod burst;
mod detector;
mod generator;
mod timing;
mod transceiver;

pub use burst::*;
pub use detector::*;
pub use generator::*;
pub use timing::*;
pub use transceiver::*;

use crate::*;

/// Drive of the transceiver's TX idle and pattern pins.
///
/// While `idle` is deasserted the transceiver serializes `pattern` instead of data words. Each transceiver
/// symbol takes 10 bits of the pattern bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TxLine {
    /// Electrical idle.
    pub idle: bool,

    /// Pattern bus.
    pub pattern: u64,
}

impl_signal_default!(TxLine);

impl TxLine {
    /// Line in electrical idle.
    pub const IDLE: Self = Self { idle: true, pattern: 0 };
}
