//! RX word aligner.

use crate::*;

/// Re-establishes symbol-boundary alignment of the RX stream from the position of control symbols.
///
/// The aligner holds one word of lookahead. On every accepted word that carries control symbols while the
/// buffered word carries none, it records the lane of the first marker: a comma, or any control symbol when
/// `check_ctrl_only` is set. It then emits the window of four lanes starting at the recorded lane of the
/// buffered word followed by the current word. Framing flags follow the buffered word.
#[derive(Debug, Clone)]
pub struct WordAligner {
    enable: bool,
    check_ctrl_only: bool,
}

impl Default for WordAligner {
    fn default() -> Self { Self { enable: true, check_ctrl_only: false } }
}

impl WordAligner {
    /// Creates an enabled aligner looking for commas.
    pub fn new() -> Self { Self::default() }

    /// Freezes the alignment when `enable` is false.
    pub fn enable(self, enable: bool) -> Self { Self { enable, ..self } }

    /// Aligns on any control symbol instead of commas only.
    pub fn check_ctrl_only(self, check_ctrl_only: bool) -> Self { Self { check_ctrl_only, ..self } }

    /// Returns the lane of the first marker in `word`, or 0 if there is none.
    fn marker_lane(&self, word: &SysWord) -> usize {
        let is_marker = |symbol: &Symbol| symbol.ctrl && (self.check_ctrl_only || symbol.is_com());
        word.symbols().iter().position(is_marker).unwrap_or(0)
    }
}

/// Registers of the word aligner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignerState {
    /// Lookahead word.
    buffer: Valid<SysWord>,

    /// Lane where output words start.
    alignment: usize,
}

impl Signal for AlignerState {
    fn x() -> Self { Self { buffer: Valid::invalid(), alignment: 0 } }
}

impl AlignerState {
    /// Returns the lane where output words start.
    pub fn alignment(&self) -> usize { self.alignment }
}

/// Returns the four lanes of `low ++ high` starting at lane `offset`.
fn window(low: &SysWord, high: &SysWord, offset: usize) -> SysWord {
    let lanes = low.symbols().into_iter().chain(high.symbols()).skip(offset).take(SysWord::WIDTH);
    let mut word = SysWord::x();
    for (index, symbol) in lanes.enumerate() {
        word.set_lane(index, symbol);
    }
    word.with_framing(low.first, low.last)
}

impl Fsm for WordAligner {
    type I = VrChannel<SysWord>;
    type O = VrChannel<SysWord>;
    type S = AlignerState;

    fn init(&self) -> AlignerState { AlignerState::x() }

    fn logic(&self, i_fwd: &Valid<SysWord>, o_bwd: &Ready, s: &AlignerState) -> (Valid<SysWord>, Ready, AlignerState) {
        let i_bwd = Ready::new(!s.buffer.valid || o_bwd.ready);
        let o_fwd = Valid::new(i_fwd.valid && s.buffer.valid, window(&s.buffer.inner, &i_fwd.inner, s.alignment));

        if !i_fwd.fire(&i_bwd) {
            return (o_fwd, i_bwd, s.clone());
        }

        let realign = self.enable && i_fwd.inner.has_ctrl() && !s.buffer.inner.has_ctrl();
        let alignment = if realign { self.marker_lane(&i_fwd.inner) } else { s.alignment };
        (o_fwd, i_bwd, AlignerState { buffer: *i_fwd, alignment })
    }

    fn on_transition(&self, from: &AlignerState, to: &AlignerState) {
        if from.alignment != to.alignment {
            tracing::debug!(from = from.alignment, to = to.alignment, "word alignment changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(symbols: [Symbol; 4]) -> Valid<SysWord> { Valid::valid(SysWord::from_symbols(symbols)) }

    #[test]
    fn locks_on_comma_lane() {
        let mut aligner = Machine::new(WordAligner::new());
        let d = Symbol::data;
        let ready = Ready::new(true);

        assert!(!aligner.step(&word([d(0), d(1), d(2), d(3)]), &ready).0.valid);
        assert!(aligner.step(&word([d(4), d(5), Symbol::COM, d(7)]), &ready).0.valid);
        assert_eq!(aligner.state().alignment(), 2);

        let (output, _) = aligner.step(&word([d(8), d(9), d(10), d(11)]), &ready);
        assert_eq!(output.inner.symbols(), [Symbol::COM, d(7), d(8), d(9)]);
    }

    #[test]
    fn ignores_non_comma_control_unless_asked() {
        let d = Symbol::data;
        let input = word([d(0), Symbol::SKP, d(2), Symbol::COM]);

        let mut aligner = Machine::new(WordAligner::new());
        aligner.step(&input, &Ready::new(true));
        assert_eq!(aligner.state().alignment(), 3);

        let mut aligner = Machine::new(WordAligner::new().check_ctrl_only(true));
        aligner.step(&input, &Ready::new(true));
        assert_eq!(aligner.state().alignment(), 1);

        let mut aligner = Machine::new(WordAligner::new().enable(false));
        aligner.step(&input, &Ready::new(true));
        assert_eq!(aligner.state().alignment(), 0);
    }

    #[test]
    fn stalls_with_full_buffer() {
        let mut aligner = Machine::new(WordAligner::new());
        let d = Symbol::data;

        assert!(aligner.step(&word([d(0); 4]), &Ready::new(false)).1.ready);
        let (output, ready) = aligner.step(&word([d(1); 4]), &Ready::new(false));
        assert!(output.valid && !ready.ready);
        assert_eq!(output.inner.symbols(), [d(0); 4]);
        assert_eq!(aligner.step(&word([d(1); 4]), &Ready::new(true)).0.inner.symbols(), [d(0); 4]);
        assert_eq!(aligner.step(&word([d(2); 4]), &Ready::new(true)).0.inner.symbols(), [d(1); 4]);
    }
}
