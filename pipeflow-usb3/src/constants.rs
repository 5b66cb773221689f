//! Constants for the USB3.0 PIPE modules.

/// Symbols per system word.
pub const SYS_WORD_SYMBOLS: usize = 4;

/// Constants for symbols.
pub mod symbol {
    /// Byte value of the K-code `K(x, y)`.
    pub const fn k(x: u8, y: u8) -> u8 { (y << 5) | x }

    /// Comma, K28.5. Marks ordered-set boundaries.
    pub const COM: u8 = k(28, 5);
    /// Skip, K28.1. Clock compensation filler.
    pub const SKP: u8 = k(28, 1);
    /// K28.4. Substituted for symbols that failed to decode.
    pub const SUB: u8 = k(28, 4);
}

/// Constants for LFPS.
pub mod lfps {
    use static_assertions::*;

    /// Default LFPS square-wave frequency.
    pub const DEFAULT_CLK_FREQ_HZ: u64 = 30_000_000;
    /// Slowest LFPS frequency (100 ns period).
    pub const CLK_FREQ_MIN_HZ: u64 = 10_000_000;
    /// Fastest LFPS frequency (20 ns period).
    pub const CLK_FREQ_MAX_HZ: u64 = 50_000_000;
    /// Width of the TX pattern bus per transceiver symbol (one 10b code group).
    pub const PATTERN_BITS_PER_SYMBOL: usize = 10;
    /// Synchronizer stages for the raw RX idle line.
    pub const IDLE_SYNC_STAGES: usize = 2;

    const_assert!(CLK_FREQ_MIN_HZ <= DEFAULT_CLK_FREQ_HZ && DEFAULT_CLK_FREQ_HZ <= CLK_FREQ_MAX_HZ);
    const_assert!(PATTERN_BITS_PER_SYMBOL * super::SYS_WORD_SYMBOLS <= 64);
    const_assert!(IDLE_SYNC_STAGES >= 2);
}

/// Constants for clock compensation.
pub mod skp {
    use static_assertions::*;

    use super::SYS_WORD_SYMBOLS;

    /// One SKP word is queued every this many transmitted words.
    pub const INSERT_INTERVAL_WORDS: u32 = 176;
    /// Lanes the remover can hold.
    pub const REMOVER_CAPACITY: usize = 3 * SYS_WORD_SYMBOLS;
    /// The remover accepts a word while it holds at most this many lanes.
    pub const REMOVER_READY_MAX: usize = 7;

    const_assert!(REMOVER_READY_MAX + SYS_WORD_SYMBOLS <= REMOVER_CAPACITY);
    const_assert!(REMOVER_READY_MAX >= SYS_WORD_SYMBOLS);
}

/// Constants for the datapaths.
pub mod datapath {
    use static_assertions::*;

    /// Entries of each clock-domain-crossing FIFO.
    pub const CDC_DEPTH: usize = 8;

    const_assert!(CDC_DEPTH.is_power_of_two());
}

/// Constants for `rx_init`.
pub mod rx_init {
    use static_assertions::*;

    /// Default duration of the PCS reset and LSM check phases.
    pub const TIMER_CYCLES: u32 = 400_000;
    /// Synchronizer stages for the lock indicators.
    pub const SYNC_STAGES: usize = 2;

    const_assert!(TIMER_CYCLES > 0);
    const_assert!(SYNC_STAGES >= 2);
}

/// Constants for `pipe`.
pub mod pipe {
    /// Slowest supported system clock.
    pub const SYS_CLK_FREQ_MIN_HZ: u64 = 125_000_000;
}
