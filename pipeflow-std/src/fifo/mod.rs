//! FIFOs.

mod async_fifo;

pub use async_fifo::*;
