use crate::constants::symbol::*;
use crate::*;

/// One byte of payload and its control bit.
///
/// Control symbols (K-codes) are protocol commands such as markers; data symbols are ordinary bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Symbol {
    /// Payload byte.
    pub data: u8,

    /// Control bit.
    pub ctrl: bool,
}

impl_signal_default!(Symbol);

impl Symbol {
    /// Comma.
    pub const COM: Self = Self::k(28, 5);
    /// Skip.
    pub const SKP: Self = Self::k(28, 1);
    /// Decode error substitute.
    pub const SUB: Self = Self::k(28, 4);

    /// Control symbol `K(x, y)`.
    pub const fn k(x: u8, y: u8) -> Self { Self { data: k(x, y), ctrl: true } }

    /// Data symbol.
    pub const fn data(data: u8) -> Self { Self { data, ctrl: false } }

    /// Returns whether this is a clock compensation symbol.
    pub fn is_skp(&self) -> bool { self.ctrl && self.data == SKP }

    /// Returns whether this is a comma.
    pub fn is_com(&self) -> bool { self.ctrl && self.data == COM }
}
