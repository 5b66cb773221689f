//! LFPS transceiver: Polling detection and generation.

use crate::lfps::*;
use crate::*;

/// Requests to the LFPS transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LfpsControl {
    /// Raw RX electrical idle from the transceiver.
    pub rx_idle: bool,

    /// Transmit Polling.LFPS.
    pub tx_polling: bool,

    /// Electrical idle requested while not transmitting LFPS.
    pub tx_idle: bool,
}

impl_signal_default!(LfpsControl);

/// Source of the TX pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxDrive {
    /// The Polling generator.
    Polling(TxLine),

    /// The explicit idle request; no pattern.
    Request {
        /// Electrical idle.
        idle: bool,
    },
}

impl Default for TxDrive {
    fn default() -> Self { Self::Request { idle: false } }
}

impl_signal_default!(TxDrive);

impl TxDrive {
    /// Returns the driven pins.
    pub fn line(&self) -> TxLine {
        match self {
            Self::Polling(line) => *line,
            Self::Request { idle } => TxLine { idle: *idle, pattern: 0 },
        }
    }
}

/// LFPS transceiver outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LfpsStatus {
    /// Polling.LFPS was received. One-tick pulse.
    pub rx_polling: bool,

    /// Polling cycles sent since `tx_polling` was asserted.
    pub tx_count: u16,

    /// TX pins.
    pub drive: TxDrive,
}

impl_signal_default!(LfpsStatus);

/// Polling.LFPS detector and generator.
///
/// While `tx_polling` is asserted the generator owns the TX pins; otherwise they follow `tx_idle`.
#[derive(Debug)]
pub struct LfpsTransceiver<const W: usize> {
    detector: Module<UniChannel<bool>, UniChannel<bool>>,
    generator: Machine<PatternGenerator<W>>,
}

impl<const W: usize> LfpsTransceiver<W> {
    /// Creates a transceiver at a `sys_clk_freq_hz` tick rate, sending a `lfps_clk_freq_hz` square wave.
    pub fn new(sys_clk_freq_hz: u64, lfps_clk_freq_hz: u64) -> Result<Self, ConfigError> {
        let pattern = LfpsPattern::POLLING;
        Ok(Self {
            detector: detector(&pattern, sys_clk_freq_hz)?,
            generator: Machine::new(PatternGenerator::new(&pattern, sys_clk_freq_hz, lfps_clk_freq_hz)?),
        })
    }

    /// Returns whether a Polling cycle is being sent.
    pub fn tx_busy(&self) -> bool { self.generator.fwd(&true, &()).busy }
}

impl<const W: usize> Circuit for LfpsTransceiver<W> {
    type I = UniChannel<LfpsControl>;
    type O = UniChannel<LfpsStatus>;

    fn bwd(&self, _: &()) {}

    fn fwd(&self, control: &LfpsControl, _: &()) -> LfpsStatus {
        let generated = self.generator.fwd(&control.tx_polling, &());
        let drive = if control.tx_polling {
            TxDrive::Polling(generated.tx)
        } else {
            TxDrive::Request { idle: control.tx_idle }
        };

        LfpsStatus { rx_polling: self.detector.fwd(&control.rx_idle, &()), tx_count: generated.count, drive }
    }

    fn clock(&mut self, control: &LfpsControl, _: &()) {
        self.detector.clock(&control.rx_idle, &());
        self.generator.clock(&control.tx_polling, &());
    }

    fn reset(&mut self) {
        self.detector.reset();
        self.generator.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_follows_request() {
        let mut lfps = LfpsTransceiver::<2>::new(125_000_000, 30_000_000).unwrap();

        let control = LfpsControl { rx_idle: true, tx_polling: false, tx_idle: true };
        assert_eq!(lfps.step(&control, &()).0.drive, TxDrive::Request { idle: true });
        let control = LfpsControl { tx_idle: false, ..control };
        assert_eq!(lfps.step(&control, &()).0.drive.line(), TxLine { idle: false, pattern: 0 });
        assert!(!lfps.tx_busy());

        let control = LfpsControl { tx_polling: true, ..control };
        let drives = (0..200).map(|_| lfps.step(&control, &()).0.drive).collect::<Vec<_>>();
        assert!(drives.iter().all(|drive| matches!(drive, TxDrive::Polling(_))));
        assert!(drives.iter().any(|drive| drive.line().pattern != 0));
        assert!(lfps.tx_busy());
    }

    #[test]
    fn loopback_detects_own_polling() {
        let mut lfps = LfpsTransceiver::<2>::new(125_000_000, 30_000_000).unwrap();
        let mut line_idle = true;

        let mut detected = Vec::new();
        for tick in 0..5100 {
            let control = LfpsControl { rx_idle: line_idle, tx_polling: true, tx_idle: false };
            let (status, ()) = lfps.step(&control, &());
            if status.rx_polling {
                detected.push((tick, status.tx_count));
            }
            line_idle = status.drive.line().idle;
        }

        // Detected once per cycle sent, starting with the second.
        assert_eq!(detected.iter().map(|(tick, _)| *tick).collect::<Vec<_>>(), vec![1257, 2509, 3761, 5013]);
        assert_eq!(detected.iter().map(|(_, count)| *count).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
