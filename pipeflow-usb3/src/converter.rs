//! Width conversion between transceiver words and system words.

use std::marker::PhantomData;

use crate::*;

/// Number of transceiver words per system word.
const fn ratio<const W: usize>() -> usize { SysWord::WIDTH / Word::<W>::WIDTH }

/// Registers of the upconverter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpconverterState {
    /// Word being assembled, or assembled and waiting to be taken.
    word: SysWord,
    /// Chunks written into `word`.
    filled: usize,
    /// `word` is complete.
    full: bool,
}

impl Signal for UpconverterState {
    fn x() -> Self { Self { word: SysWord::x(), filled: 0, full: false } }
}

/// Joins consecutive transceiver words into system words.
///
/// The first transceiver word fills lanes `0..W`. `first` is taken from the first chunk and `last` from the final
/// one.
#[derive(Debug, Default)]
pub struct Upconverter<const W: usize> {
    _marker: PhantomData<Word<W>>,
}

impl<const W: usize> Upconverter<W> {
    /// Creates a new upconverter.
    pub fn new() -> Self { Self { _marker: PhantomData } }
}

impl<const W: usize> Fsm for Upconverter<W> {
    type I = VrChannel<Word<W>>;
    type O = VrChannel<SysWord>;
    type S = UpconverterState;

    fn init(&self) -> UpconverterState { UpconverterState::x() }

    fn logic(
        &self, i_fwd: &Valid<Word<W>>, o_bwd: &Ready, s: &UpconverterState,
    ) -> (Valid<SysWord>, Ready, UpconverterState) {
        let o_fwd = Valid::new(s.full, s.word);
        let i_bwd = Ready::new(!s.full || o_bwd.ready);

        let mut s_next = UpconverterState { full: s.full && !o_fwd.fire(o_bwd), ..*s };
        if i_fwd.fire(&i_bwd) {
            let chunk = &i_fwd.inner;
            if s.filled == 0 {
                s_next.word = SysWord::x().with_framing(chunk.first, false);
            }
            s_next.word.set_chunk(s.filled, chunk);

            if s.filled + 1 == ratio::<W>() {
                s_next.word.last = chunk.last;
                s_next.filled = 0;
                s_next.full = true;
            } else {
                s_next.filled = s.filled + 1;
            }
        }

        (o_fwd, i_bwd, s_next)
    }
}

/// Registers of the downconverter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownconverterState {
    /// Word being split.
    word: Valid<SysWord>,
    /// Chunk offered next.
    chunk: usize,
}

impl Signal for DownconverterState {
    fn x() -> Self { Self { word: Valid::invalid(), chunk: 0 } }
}

/// Splits system words into consecutive transceiver words, lanes `0..W` first.
///
/// `first` is set on the first chunk and `last` on the final chunk.
#[derive(Debug, Default)]
pub struct Downconverter<const W: usize> {
    _marker: PhantomData<Word<W>>,
}

impl<const W: usize> Downconverter<W> {
    /// Creates a new downconverter.
    pub fn new() -> Self { Self { _marker: PhantomData } }
}

impl<const W: usize> Fsm for Downconverter<W> {
    type I = VrChannel<SysWord>;
    type O = VrChannel<Word<W>>;
    type S = DownconverterState;

    fn init(&self) -> DownconverterState { DownconverterState::x() }

    fn logic(
        &self, i_fwd: &Valid<SysWord>, o_bwd: &Ready, s: &DownconverterState,
    ) -> (Valid<Word<W>>, Ready, DownconverterState) {
        let last_chunk = s.chunk + 1 == ratio::<W>();
        let word = &s.word.inner;

        let o_fwd = Valid::new(
            s.word.valid,
            word.chunk::<W>(s.chunk).with_framing(word.first && s.chunk == 0, word.last && last_chunk),
        );
        let i_bwd = Ready::new(!s.word.valid || (o_bwd.ready && last_chunk));

        let mut s_next = *s;
        if o_fwd.fire(o_bwd) {
            if last_chunk {
                s_next = DownconverterState::x();
            } else {
                s_next.chunk = s.chunk + 1;
            }
        }
        if i_fwd.fire(&i_bwd) {
            s_next = DownconverterState { word: *i_fwd, chunk: 0 };
        }

        (o_fwd, i_bwd, s_next)
    }
}
