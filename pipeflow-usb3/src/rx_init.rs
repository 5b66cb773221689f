//! Receiver lock and reset sequencer.

use crate::constants::rx_init::*;
use crate::*;

/// Lock indicators from the transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LockStatus {
    /// TX PLL loss of lock.
    pub tx_lol: bool,

    /// RX CDR loss of lock.
    pub rx_lol: bool,

    /// RX loss of signal.
    pub rx_los: bool,

    /// RX link state machine (word sync) is synchronized.
    pub rx_lsm: bool,
}

impl_signal_default!(LockStatus);

impl LockStatus {
    /// Locked and synchronized.
    pub const LOCKED: Self = Self { tx_lol: false, rx_lol: false, rx_los: false, rx_lsm: true };

    /// Nothing locked. Reset value of the synchronized indicators.
    pub const UNLOCKED: Self = Self { tx_lol: true, rx_lol: true, rx_los: true, rx_lsm: false };
}

/// Reset outputs of the lock sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxInitOutput {
    /// Resets the RX lane.
    pub lane_rx_rst: bool,

    /// Resets the whole receiver.
    pub rrst: bool,

    /// The receiver is locked and its output is live.
    pub ready: bool,
}

impl_signal_default!(RxInitOutput);

/// Phase of the lock sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RxInitPhase {
    /// Waiting for the TX PLL.
    #[default]
    Idle,
    /// Resetting the receiver.
    ResetAll,
    /// Waiting for the CDR to hold lock for a full timer period.
    ResetPcs,
    /// Waiting for word sync to hold for a full timer period.
    CheckLsm,
    /// Locked.
    Ready,
}

/// Registers of the lock sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxInitState {
    phase: RxInitPhase,
    timer: WaitTimer,
    /// Word sync was seen during `CheckLsm`.
    lsm_seen: bool,
}

impl RxInitState {
    /// Returns the phase.
    pub fn phase(&self) -> RxInitPhase { self.phase }
}

impl_signal_default!(RxInitState);

/// Receiver lock and reset sequencer.
///
/// Holds the RX lane in reset until the TX PLL is locked, pulses a full receiver reset, then requires the CDR
/// lock and then word sync to each hold for `timer_cycles` consecutive ticks. Word sync dropping after it was
/// seen restarts the sequence, unless the timer expires on the same tick. Any loss of lock while ready restarts
/// the sequence.
#[derive(Debug, Clone)]
pub struct RxInit {
    timer_cycles: u32,
}

impl Default for RxInit {
    fn default() -> Self { Self { timer_cycles: TIMER_CYCLES } }
}

impl RxInit {
    /// Creates a sequencer whose checks last `timer_cycles` ticks.
    pub fn new(timer_cycles: u32) -> Result<Self, ConfigError> {
        if timer_cycles == 0 {
            return Err(ConfigError::ZeroLockTimer);
        }
        Ok(Self { timer_cycles })
    }
}

impl Fsm for RxInit {
    type I = UniChannel<LockStatus>;
    type O = UniChannel<RxInitOutput>;
    type S = RxInitState;

    fn init(&self) -> RxInitState { RxInitState { timer: WaitTimer::new(self.timer_cycles), ..RxInitState::x() } }

    fn logic(&self, lock: &LockStatus, _: &(), s: &RxInitState) -> (RxInitOutput, (), RxInitState) {
        let mut output = RxInitOutput::default();
        let mut s_next = *s;

        let wait = match s.phase {
            RxInitPhase::Idle => {
                output.lane_rx_rst = true;
                if !lock.tx_lol {
                    s_next.phase = RxInitPhase::ResetAll;
                }
                false
            }
            RxInitPhase::ResetAll => {
                output.lane_rx_rst = true;
                output.rrst = true;
                s_next.phase = RxInitPhase::ResetPcs;
                false
            }
            RxInitPhase::ResetPcs => {
                output.lane_rx_rst = true;
                if s.timer.done() {
                    s_next.phase = RxInitPhase::CheckLsm;
                    s_next.lsm_seen = false;
                    false
                } else {
                    !lock.rx_lol && !lock.rx_los
                }
            }
            RxInitPhase::CheckLsm => {
                s_next.lsm_seen = s.lsm_seen || lock.rx_lsm;
                if s.timer.done() {
                    s_next.phase = if lock.rx_lsm { RxInitPhase::Ready } else { RxInitPhase::Idle };
                } else if s.lsm_seen && !lock.rx_lsm {
                    s_next.phase = RxInitPhase::Idle;
                }
                true
            }
            RxInitPhase::Ready => {
                output.ready = true;
                if lock.tx_lol || lock.rx_lol || lock.rx_los {
                    s_next.phase = RxInitPhase::Idle;
                }
                false
            }
        };
        s_next.timer = s.timer.tick(wait);

        (output, (), s_next)
    }

    fn on_transition(&self, from: &RxInitState, to: &RxInitState) {
        if from.phase != to.phase {
            tracing::debug!(from = ?from.phase, to = ?to.phase, "RX lock sequencer");
        }
    }
}

/// Creates a lock sequencer on raw, unsynchronized lock indicators.
pub fn rx_init(timer_cycles: u32) -> Result<Module<UniChannel<LockStatus>, UniChannel<RxInitOutput>>, ConfigError> {
    let rx_init = Machine::new(RxInit::new(timer_cycles)?);
    let sync = Machine::new(Synchronizer::<LockStatus, SYNC_STAGES>::new(LockStatus::UNLOCKED));
    Ok(sync.chain(rx_init).build("rx_init"))
}
