//! RX decode error substitution.

use itertools::izip;

use crate::*;

/// Transceiver word with the decoder's per-lane invalid flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedWord<const W: usize> {
    /// Decoded word.
    pub word: Word<W>,

    /// Lane `i` failed to decode.
    pub invalid: [bool; W],
}

impl<const W: usize> Signal for DecodedWord<W> {
    fn x() -> Self { Self { word: Word::x(), invalid: [false; W] } }
}

impl<const W: usize> From<Word<W>> for DecodedWord<W> {
    fn from(word: Word<W>) -> Self { Self { word, invalid: [false; W] } }
}

/// Replaces every lane that failed to decode with the substitute control symbol.
pub fn substitute<const W: usize>(decoded: &DecodedWord<W>) -> Word<W> {
    let mut word = decoded.word;
    for (data, ctrl, invalid) in izip!(word.data.iter_mut(), word.ctrl.iter_mut(), decoded.invalid.iter()) {
        if *invalid {
            *data = Symbol::SUB.data;
            *ctrl = Symbol::SUB.ctrl;
        }
    }
    word
}

/// Creates an RX error substitution module.
pub fn error_substitution<const W: usize>() -> Module<VrChannel<DecodedWord<W>>, VrChannel<Word<W>>> {
    map("rx_error_substitution", substitute::<W>)
}
