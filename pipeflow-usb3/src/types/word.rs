use crate::constants::SYS_WORD_SYMBOLS;
use crate::*;

/// Group of `N` symbols moved by one transfer, with packet framing flags.
///
/// ### Lane order
///
/// Lane `i` is the symbol `(data[i], ctrl[i])`, and lane 0 is the symbol transmitted first. On a packed bus,
/// lane `i` occupies data bits `8 * i..8 * (i + 1)` and control bit `i`. Every module keeps this order: width
/// conversion splits and joins words on lane boundaries, and the word aligner and the SKP remover index lanes
/// in transmission order.
///
/// `N` is 4 for the system word and 1, 2 or 4 for the transceiver word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word<const N: usize> {
    /// Payload bytes.
    pub data: [u8; N],

    /// Control bits.
    pub ctrl: [bool; N],

    /// Start of packet.
    pub first: bool,

    /// End of packet.
    pub last: bool,
}

/// System word.
pub type SysWord = Word<SYS_WORD_SYMBOLS>;

impl<const N: usize> Signal for Word<N> {
    fn x() -> Self { Self { data: [0; N], ctrl: [false; N], first: false, last: false } }
}

impl<const N: usize> Default for Word<N> {
    fn default() -> Self { Self::x() }
}

impl<const N: usize> Word<N> {
    /// Number of lanes. Fails to compile unless `N` divides the system word.
    pub const WIDTH: usize = {
        assert!(N > 0 && SYS_WORD_SYMBOLS % N == 0, "a word must hold 1, 2 or 4 symbols");
        N
    };

    /// Creates an unframed word from its lanes.
    pub fn from_symbols(symbols: [Symbol; N]) -> Self {
        Self {
            data: symbols.map(|symbol| symbol.data),
            ctrl: symbols.map(|symbol| symbol.ctrl),
            first: false,
            last: false,
        }
    }

    /// Creates an unframed word with `symbol` on every lane.
    pub fn repeat(symbol: Symbol) -> Self { Self::from_symbols([symbol; N]) }

    /// Sets the framing flags.
    pub fn with_framing(self, first: bool, last: bool) -> Self { Self { first, last, ..self } }

    /// Returns lane `index`.
    pub fn lane(&self, index: usize) -> Symbol { Symbol { data: self.data[index], ctrl: self.ctrl[index] } }

    /// Sets lane `index`.
    pub fn set_lane(&mut self, index: usize, symbol: Symbol) {
        self.data[index] = symbol.data;
        self.ctrl[index] = symbol.ctrl;
    }

    /// Returns the lanes.
    pub fn symbols(&self) -> [Symbol; N] { std::array::from_fn(|index| self.lane(index)) }

    /// Returns whether any lane carries a control symbol.
    pub fn has_ctrl(&self) -> bool { self.ctrl.iter().any(|ctrl| *ctrl) }

    /// Returns the `index`-th group of `M` consecutive lanes, unframed.
    pub fn chunk<const M: usize>(&self, index: usize) -> Word<M> {
        Word::from_symbols(std::array::from_fn(|lane| self.lane(index * M + lane)))
    }

    /// Overwrites the `index`-th group of `M` consecutive lanes.
    pub fn set_chunk<const M: usize>(&mut self, index: usize, chunk: &Word<M>) {
        for (lane, symbol) in chunk.symbols().into_iter().enumerate() {
            self.set_lane(index * M + lane, symbol);
        }
    }

    /// Reverses the lane order, keeping the framing.
    pub fn swap_endianness(self) -> Self {
        let mut data = self.data;
        let mut ctrl = self.ctrl;
        data.reverse();
        ctrl.reverse();
        Self { data, ctrl, ..self }
    }
}
