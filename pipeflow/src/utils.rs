//! Utilities.

/// Returns the Gray code of `value`.
pub const fn bin_to_gray(value: usize) -> usize { value ^ (value >> 1) }

/// Returns the binary value of the Gray code `gray`.
pub const fn gray_to_bin(gray: usize) -> usize {
    let mut value = gray;
    let mut shift = 1;
    while shift < ::std::mem::size_of::<usize>() * 8 {
        value ^= value >> shift;
        shift <<= 1;
    }
    value
}
