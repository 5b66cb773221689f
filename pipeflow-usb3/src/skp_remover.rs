//! RX clock compensation (SKP) remover.
//!
//! The link partner inserts SKP ordered sets to absorb the clock mismatch between the two ends. They are
//! stripped per lane and the remaining lanes are repacked into full words.

use arrayvec::ArrayVec;

use crate::constants::skp::*;
use crate::*;

/// Lane held by the remover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeldLane {
    symbol: Symbol,
    first: bool,
    last: bool,
}

/// Registers of the SKP remover.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoverState {
    /// Kept lanes, oldest first.
    lanes: ArrayVec<HeldLane, REMOVER_CAPACITY>,

    /// SKP symbols removed so far (wrapping).
    removed: u32,
}

impl_signal_default!(RemoverState);

impl RemoverState {
    /// Returns the number of lanes held.
    pub fn held(&self) -> usize { self.lanes.len() }

    /// Returns the number of SKP symbols removed so far.
    pub fn removed(&self) -> u32 { self.removed }
}

/// SKP remover.
///
/// Accepts a word while it holds at most `REMOVER_READY_MAX` lanes, and offers a word while it holds a full
/// one. A word's framing flags ride on its first and last kept lanes.
#[derive(Debug, Default, Clone)]
pub struct SkpRemover;

impl SkpRemover {
    /// Creates a new SKP remover.
    pub fn new() -> Self { Self }
}

impl Fsm for SkpRemover {
    type I = VrChannel<SysWord>;
    type O = VrChannel<SysWord>;
    type S = RemoverState;

    fn init(&self) -> RemoverState { RemoverState::x() }

    fn logic(&self, i_fwd: &Valid<SysWord>, o_bwd: &Ready, s: &RemoverState) -> (Valid<SysWord>, Ready, RemoverState) {
        let i_bwd = Ready::new(s.held() <= REMOVER_READY_MAX);

        let o_fwd = if s.held() >= SysWord::WIDTH {
            let out = &s.lanes[..SysWord::WIDTH];
            let word = SysWord::from_symbols(std::array::from_fn(|index| out[index].symbol));
            Valid::valid(word.with_framing(out.iter().any(|lane| lane.first), out.iter().any(|lane| lane.last)))
        } else {
            Valid::invalid()
        };

        let mut s_next = s.clone();
        if o_fwd.fire(o_bwd) {
            s_next.lanes.drain(..SysWord::WIDTH);
        }
        if i_fwd.fire(&i_bwd) {
            let word = &i_fwd.inner;
            let kept = word.symbols().into_iter().filter(|symbol| !symbol.is_skp()).collect::<ArrayVec<_, 4>>();
            let count = kept.len();

            s_next.removed = s.removed.wrapping_add((SysWord::WIDTH - count) as u32);
            // At most `REMOVER_READY_MAX` lanes are held when a word is accepted, so this never overflows.
            s_next.lanes.extend(kept.into_iter().enumerate().map(|(index, symbol)| HeldLane {
                symbol,
                first: word.first && index == 0,
                last: word.last && index + 1 == count,
            }));
        }

        (o_fwd, i_bwd, s_next)
    }

    fn on_transition(&self, from: &RemoverState, to: &RemoverState) {
        if from.removed != to.removed {
            tracing::trace!(removed = to.removed.wrapping_sub(from.removed), held = to.held(), "SKP removed");
        }
    }
}
