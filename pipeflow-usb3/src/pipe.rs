//! USB3.0 PIPE top level.

use crate::constants::lfps::{CLK_FREQ_MAX_HZ, CLK_FREQ_MIN_HZ, DEFAULT_CLK_FREQ_HZ};
use crate::constants::pipe::SYS_CLK_FREQ_MIN_HZ;
use crate::constants::rx_init::TIMER_CYCLES;
use crate::lfps::*;
use crate::*;

/// Construction parameters of [`Usb3Pipe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeConfig {
    sys_clk_freq_hz: u64,
    lfps_clk_freq_hz: u64,
    rx_init_timer_cycles: u32,
    with_endianness_swap: bool,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            sys_clk_freq_hz: SYS_CLK_FREQ_MIN_HZ,
            lfps_clk_freq_hz: DEFAULT_CLK_FREQ_HZ,
            rx_init_timer_cycles: TIMER_CYCLES,
            with_endianness_swap: true,
        }
    }
}

impl PipeConfig {
    /// Creates a configuration for a `sys_clk_freq_hz` system clock, with defaults for everything else.
    pub fn new(sys_clk_freq_hz: u64) -> Result<Self, ConfigError> {
        let config = Self { sys_clk_freq_hz, ..Self::default() };
        config.validate()?;
        Ok(config)
    }

    /// Sets the LFPS square-wave frequency.
    pub fn lfps_clk_freq_hz(self, lfps_clk_freq_hz: u64) -> Self { Self { lfps_clk_freq_hz, ..self } }

    /// Sets the duration of each lock check.
    pub fn rx_init_timer_cycles(self, rx_init_timer_cycles: u32) -> Self { Self { rx_init_timer_cycles, ..self } }

    /// Reverses the lane order of the system-facing streams.
    pub fn with_endianness_swap(self, with_endianness_swap: bool) -> Self { Self { with_endianness_swap, ..self } }

    /// Returns the system clock frequency.
    pub fn sys_clk_freq_hz(&self) -> u64 { self.sys_clk_freq_hz }

    /// Checks the parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sys_clk_freq_hz < SYS_CLK_FREQ_MIN_HZ {
            return Err(ConfigError::SysClockTooSlow { freq_hz: self.sys_clk_freq_hz, min_hz: SYS_CLK_FREQ_MIN_HZ });
        }
        if !(CLK_FREQ_MIN_HZ..=CLK_FREQ_MAX_HZ).contains(&self.lfps_clk_freq_hz) {
            return Err(ConfigError::LfpsClockOutOfBand {
                freq_hz: self.lfps_clk_freq_hz,
                min_hz: CLK_FREQ_MIN_HZ,
                max_hz: CLK_FREQ_MAX_HZ,
            });
        }
        if self.rx_init_timer_cycles == 0 {
            return Err(ConfigError::ZeroLockTimer);
        }
        Ok(())
    }
}

/// Requests from the link training state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkControl {
    /// Transmit Polling.LFPS.
    pub tx_polling: bool,

    /// Electrical idle while not transmitting LFPS.
    pub tx_idle: bool,

    /// TX words flow to the transceiver.
    pub tx_ready: bool,

    /// RX words are meant for the consumer rather than for training.
    pub rx_ready: bool,
}

/// Transceiver indicators sampled by the system domain. None need to be synchronous to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerdesStatus {
    /// Raw RX electrical idle.
    pub rx_idle: bool,

    /// Lock indicators.
    pub lock: LockStatus,
}

/// System domain inputs of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysInput {
    /// Link training requests.
    pub control: LinkControl,

    /// Transceiver indicators.
    pub serdes: SerdesStatus,

    /// Words to transmit.
    pub sink: Valid<SysWord>,

    /// The consumer of received words is ready.
    pub source_ready: Ready,
}

impl Default for SysInput {
    fn default() -> Self {
        Self {
            control: LinkControl::default(),
            serdes: SerdesStatus::default(),
            sink: Valid::invalid(),
            source_ready: Ready::new(false),
        }
    }
}

/// System domain outputs of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysOutput {
    /// Polling.LFPS was received. One-tick pulse.
    pub rx_polling: bool,

    /// Polling cycles sent since `tx_polling` was asserted.
    pub tx_count: u16,

    /// Transceiver TX idle and pattern pins.
    pub tx_line: TxLine,

    /// Transceiver resets and receiver readiness.
    pub rx_init: RxInitOutput,

    /// `sink` is accepted.
    pub sink_ready: Ready,

    /// Received words, once the receiver is live.
    pub source: Valid<SysWord>,

    /// Received words while the receiver is not live. Never stalled.
    pub training: Valid<SysWord>,
}

/// System-facing stream stage; scrambler or descrambler.
pub type SysStage = Module<VrChannel<SysWord>, VrChannel<SysWord>>;

/// USB3.0 PIPE over a transceiver with `W`-symbol words.
///
/// The PIPE spans three clock domains, each stepped by its own method: the system domain ([`Self::step_sys`]),
/// the transceiver TX domain ([`Self::step_tx`]) and the transceiver RX domain ([`Self::step_rx`]).
///
/// The scrambler is held in reset and disconnected from the TX datapath while `tx_ready` is deasserted. Received
/// words reach the descrambler only while `rx_ready` is asserted and the lock sequencer reports ready; otherwise
/// they are drained to the `training` output.
#[derive(Debug)]
pub struct Usb3Pipe<const W: usize> {
    config: PipeConfig,

    lfps: LfpsTransceiver<W>,
    rx_init: Module<UniChannel<LockStatus>, UniChannel<RxInitOutput>>,

    scrambler: SysStage,
    tx_sys: Module<VrChannel<SysWord>, ()>,
    tx_link: Module<(), VrChannel<Word<W>>>,

    rx_link: Module<VrChannel<DecodedWord<W>>, ()>,
    rx_sys: Module<(), VrChannel<SysWord>>,
    descrambler: SysStage,
}

impl<const W: usize> Usb3Pipe<W> {
    /// Creates a PIPE without scrambling.
    pub fn new(config: PipeConfig) -> Result<Self, ConfigError> {
        Self::with_scrambling(config, identity(), identity())
    }

    /// Creates a PIPE with the given scrambler and descrambler.
    pub fn with_scrambling(
        config: PipeConfig, scrambler: SysStage, descrambler: SysStage,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let lfps = LfpsTransceiver::new(config.sys_clk_freq_hz, config.lfps_clk_freq_hz)?;
        let rx_init = rx_init(config.rx_init_timer_cycles)?;
        let tx = datapath::tx::<W>();
        let rx = datapath::rx::<W>();
        let rx_link = error_substitution::<W>().chain(rx.link).build("rx_link");

        tracing::info!(
            sys_clk_freq_hz = config.sys_clk_freq_hz,
            lfps_clk_freq_hz = config.lfps_clk_freq_hz,
            link_width = Word::<W>::WIDTH,
            scrambler = scrambler.name(),
            descrambler = descrambler.name(),
            "USB3 PIPE created"
        );

        Ok(Self {
            config,
            lfps,
            rx_init,
            scrambler,
            tx_sys: tx.sys,
            tx_link: tx.link,
            rx_link,
            rx_sys: rx.sys,
            descrambler,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipeConfig { &self.config }

    fn swap(&self, word: SysWord) -> SysWord {
        if self.config.with_endianness_swap {
            word.swap_endianness()
        } else {
            word
        }
    }

    /// Evaluates one system clock tick.
    pub fn step_sys(&mut self, input: &SysInput) -> SysOutput {
        let control = &input.control;

        let lfps_control =
            LfpsControl { rx_idle: input.serdes.rx_idle, tx_polling: control.tx_polling, tx_idle: control.tx_idle };
        let (lfps, ()) = self.lfps.step(&lfps_control, &());
        let (rx_init, ()) = self.rx_init.step(&input.serdes.lock, &());

        // TX: sink, scrambler, datapath.
        let scrambler_bwd = if control.tx_ready { self.tx_sys.bwd(&()) } else { Ready::new(false) };
        let sink = input.sink.map_inner(|word| self.swap(word));
        let scrambled = self.scrambler.fwd(&sink, &scrambler_bwd);
        let tx_fwd = if control.tx_ready { scrambled } else { Valid::invalid() };
        let sink_ready = self.scrambler.bwd(&scrambler_bwd);

        self.scrambler.clock(&sink, &scrambler_bwd);
        if !control.tx_ready {
            self.scrambler.reset();
        }
        self.tx_sys.clock(&tx_fwd, &());

        // RX: datapath, descrambler or training, source.
        let live = control.rx_ready && rx_init.ready;
        let rx_bwd = if live { self.descrambler.bwd(&input.source_ready) } else { Ready::new(true) };
        let received = self.rx_sys.fwd(&(), &rx_bwd);
        let (descrambler_fwd, training) =
            if live { (received, Valid::invalid()) } else { (Valid::invalid(), received) };
        let source = self.descrambler.fwd(&descrambler_fwd, &input.source_ready);

        self.rx_sys.clock(&(), &rx_bwd);
        self.descrambler.clock(&descrambler_fwd, &input.source_ready);

        SysOutput {
            rx_polling: lfps.rx_polling,
            tx_count: lfps.tx_count,
            tx_line: lfps.drive.line(),
            rx_init,
            sink_ready,
            source: source.map_inner(|word| self.swap(word)),
            training,
        }
    }

    /// Evaluates one transceiver TX clock tick and returns the word offered to the transceiver.
    pub fn step_tx(&mut self, ready: &Ready) -> Valid<Word<W>> { self.tx_link.step(&(), ready).0 }

    /// Evaluates one transceiver RX clock tick and returns whether `word` is accepted.
    pub fn step_rx(&mut self, word: &Valid<DecodedWord<W>>) -> Ready { self.rx_link.step(word, &()).1 }
}
