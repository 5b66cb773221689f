//! TX clock compensation (SKP) inserter.
//!
//! The nominal rate is one SKP ordered set every 354 symbols. To keep word alignment, a full word of four SKP
//! symbols (two ordered sets) is queued every 176 words instead: the same average with twice the interval.

use crate::constants::skp::*;
use crate::*;

/// Registers of the SKP inserter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InserterState {
    /// Words accepted since the last queued insertion.
    data_count: u32,
    /// An insertion was queued on the previous cycle.
    queue: bool,
    /// Insertion is allowed: no packet is open.
    grant: bool,
    /// Insertions queued but not yet sent.
    pending: u16,
}

impl Signal for InserterState {
    fn x() -> Self { Self { data_count: 0, queue: false, grant: true, pending: 0 } }
}

impl InserterState {
    /// Returns the number of insertions queued but not yet sent.
    pub fn pending(&self) -> u16 { self.pending }
}

/// SKP inserter.
///
/// Inserts between packets only: the grant is withdrawn by an accepted word carrying `first` and restored by
/// one carrying `last`.
#[derive(Debug, Default, Clone)]
pub struct SkpInserter;

impl SkpInserter {
    /// Creates a new SKP inserter.
    pub fn new() -> Self { Self }
}

impl Fsm for SkpInserter {
    type I = VrChannel<SysWord>;
    type O = VrChannel<SysWord>;
    type S = InserterState;

    fn init(&self) -> InserterState { InserterState::x() }

    fn logic(
        &self, i_fwd: &Valid<SysWord>, o_bwd: &Ready, s: &InserterState,
    ) -> (Valid<SysWord>, Ready, InserterState) {
        let insert = s.grant && s.pending != 0;

        let (o_fwd, i_bwd) = if insert {
            (Valid::valid(SysWord::repeat(Symbol::SKP)), Ready::new(false))
        } else {
            (*i_fwd, *o_bwd)
        };
        let dequeue = insert && o_bwd.ready;
        let fire = i_fwd.fire(&i_bwd);

        let mut s_next = InserterState { queue: false, ..*s };
        if fire {
            if s.data_count == INSERT_INTERVAL_WORDS - 1 {
                s_next.data_count = 0;
                s_next.queue = true;
            } else {
                s_next.data_count = s.data_count + 1;
            }

            if i_fwd.inner.last {
                s_next.grant = true;
            } else if i_fwd.inner.first {
                s_next.grant = false;
            }
        }
        s_next.pending = match (s.queue, dequeue) {
            (true, false) => s.pending.wrapping_add(1),
            (false, true) => s.pending.saturating_sub(1),
            _ => s.pending,
        };

        (o_fwd, i_bwd, s_next)
    }

    fn on_transition(&self, from: &InserterState, to: &InserterState) {
        if from.pending != to.pending {
            tracing::trace!(pending = to.pending, "SKP insertion queue");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_word(first: bool, last: bool) -> Valid<SysWord> {
        Valid::valid(SysWord::repeat(Symbol::data(0x55)).with_framing(first, last))
    }

    #[test]
    fn inserts_every_interval() {
        let mut inserter = Machine::new(SkpInserter::new());
        let ready = Ready::new(true);

        let mut outputs = Vec::new();
        while outputs.iter().filter(|word: &&SysWord| **word == SysWord::repeat(Symbol::SKP)).count() < 2 {
            let (output, _) = inserter.step(&data_word(false, false), &ready);
            outputs.push(output.inner);
        }
        let skips = outputs.iter().enumerate().filter(|(_, word)| word.lane(0).is_skp()).map(|(index, _)| index);
        assert_eq!(skips.collect::<Vec<_>>(), vec![177, 354]);
    }

    #[test]
    fn waits_for_end_of_packet() {
        let mut inserter = Machine::new(SkpInserter::new());
        let ready = Ready::new(true);

        // Opens a packet just before an insertion is queued.
        for _ in 0..INSERT_INTERVAL_WORDS - 1 {
            inserter.step(&data_word(false, false), &ready);
        }
        inserter.step(&data_word(true, false), &ready);
        for _ in 0..10 {
            let (output, i_bwd) = inserter.step(&data_word(false, false), &ready);
            assert!(!output.inner.lane(0).is_skp() && i_bwd.ready);
        }
        assert_eq!(inserter.state().pending(), 1);

        // Closing the packet releases the insertion; the producer stalls until the SKP word is taken.
        inserter.step(&data_word(false, true), &ready);
        let (output, i_bwd) = inserter.step(&data_word(true, false), &Ready::new(false));
        assert!(output.inner.lane(0).is_skp() && !i_bwd.ready);
        let (output, i_bwd) = inserter.step(&data_word(true, false), &ready);
        assert!(output.inner.lane(0).is_skp() && !i_bwd.ready);
        let (output, i_bwd) = inserter.step(&data_word(true, false), &ready);
        assert!(output.inner.first && i_bwd.ready);
        assert_eq!(inserter.state().pending(), 0);
    }
}
