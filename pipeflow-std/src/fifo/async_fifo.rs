//! Dual-clock FIFO.
//!
//! The write half and the read half are clocked by different domains. Each half owns its binary pointer and
//! publishes it Gray-coded; the other half only ever sees it through a two-stage synchronizer, so a pointer
//! observed across the crossing is at worst stale, never torn. Entries are written before the write pointer
//! moves past them and are read before the read pointer releases them.
//!
//! Resetting either half flushes the FIFO: the reset half moves its pointer onto the other half's pointer and
//! loads both synchronizers with the new pointer, so the two halves agree that the FIFO is empty.

use std::cell::RefCell;
use std::rc::Rc;

use crate::*;

/// Registers shared by the two halves.
#[derive(Debug)]
struct Shared<V: Signal, const DEPTH: usize> {
    mem: [V; DEPTH],
    /// Gray-coded write pointer, driven by the write half.
    wptr_gray: usize,
    /// Gray-coded read pointer, driven by the read half.
    rptr_gray: usize,
    /// Write pointer synchronizer, clocked by the read half.
    wptr_sync: [usize; 2],
    /// Read pointer synchronizer, clocked by the write half.
    rptr_sync: [usize; 2],
}

/// Pointers carry one extra wrap bit to tell full from empty.
const fn ptr_mask(depth: usize) -> usize { (depth << 1) - 1 }

/// Write half of a dual-clock FIFO.
#[derive(Debug)]
pub struct AsyncFifoWrite<V: Signal, const DEPTH: usize> {
    shared: Rc<RefCell<Shared<V, DEPTH>>>,
    wptr: usize,
}

/// Read half of a dual-clock FIFO.
#[derive(Debug)]
pub struct AsyncFifoRead<V: Signal, const DEPTH: usize> {
    shared: Rc<RefCell<Shared<V, DEPTH>>>,
    rptr: usize,
}

/// Creates a dual-clock FIFO holding `DEPTH` entries, a power of two.
pub fn async_fifo<V: Signal, const DEPTH: usize>() -> (AsyncFifoWrite<V, DEPTH>, AsyncFifoRead<V, DEPTH>) {
    #[allow(clippy::let_unit_value)]
    let () = AsyncFifoWrite::<V, DEPTH>::CHECK_DEPTH;

    let shared = Rc::new(RefCell::new(Shared {
        mem: std::array::from_fn(|_| V::x()),
        wptr_gray: 0,
        rptr_gray: 0,
        wptr_sync: [0; 2],
        rptr_sync: [0; 2],
    }));
    let write = AsyncFifoWrite { shared: shared.clone(), wptr: 0 };
    let read = AsyncFifoRead { shared, rptr: 0 };
    (write, read)
}

impl<V: Signal, const DEPTH: usize> AsyncFifoWrite<V, DEPTH> {
    const CHECK_DEPTH: () = assert!(DEPTH >= 2 && DEPTH.is_power_of_two(), "FIFO depth must be a power of two");

    fn rptr_synced(&self) -> usize { self.shared.borrow().rptr_sync[1] }

    fn full(&self) -> bool {
        // Full when the pointers differ only in the two most significant bits.
        bin_to_gray(self.wptr) == self.rptr_synced() ^ (DEPTH | (DEPTH >> 1))
    }

    /// Returns the number of entries the write half believes are occupied.
    pub fn level(&self) -> usize { self.wptr.wrapping_sub(gray_to_bin(self.rptr_synced())) & ptr_mask(DEPTH) }
}

impl<V: Signal, const DEPTH: usize> Circuit for AsyncFifoWrite<V, DEPTH> {
    type I = VrChannel<V>;
    type O = ();

    fn bwd(&self, _: &()) -> Ready { Ready::new(!self.full()) }

    fn fwd(&self, _: &Valid<V>, _: &()) {}

    fn clock(&mut self, i_fwd: &Valid<V>, _: &()) {
        let full = self.full();
        let mut shared = self.shared.borrow_mut();
        let rptr_gray = shared.rptr_gray;

        if i_fwd.valid && !full {
            shared.mem[self.wptr % DEPTH] = i_fwd.inner.clone();
            self.wptr = (self.wptr + 1) & ptr_mask(DEPTH);
            shared.wptr_gray = bin_to_gray(self.wptr);
        }
        shared.rptr_sync = [rptr_gray, shared.rptr_sync[0]];
    }

    /// Drops the unread entries.
    fn reset(&mut self) {
        let mut shared = self.shared.borrow_mut();
        let rptr_gray = shared.rptr_gray;

        self.wptr = gray_to_bin(rptr_gray);
        shared.wptr_gray = rptr_gray;
        shared.wptr_sync = [rptr_gray; 2];
        shared.rptr_sync = [rptr_gray; 2];
    }
}

impl<V: Signal, const DEPTH: usize> AsyncFifoRead<V, DEPTH> {
    fn wptr_synced(&self) -> usize { self.shared.borrow().wptr_sync[1] }

    fn empty(&self) -> bool { bin_to_gray(self.rptr) == self.wptr_synced() }

    /// Returns the number of entries the read half believes are occupied.
    pub fn level(&self) -> usize { gray_to_bin(self.wptr_synced()).wrapping_sub(self.rptr) & ptr_mask(DEPTH) }
}

impl<V: Signal, const DEPTH: usize> Circuit for AsyncFifoRead<V, DEPTH> {
    type I = ();
    type O = VrChannel<V>;

    fn bwd(&self, _: &Ready) {}

    fn fwd(&self, _: &(), _: &Ready) -> Valid<V> {
        if self.empty() {
            Valid::invalid()
        } else {
            Valid::valid(self.shared.borrow().mem[self.rptr % DEPTH].clone())
        }
    }

    fn clock(&mut self, _: &(), o_bwd: &Ready) {
        let empty = self.empty();
        let mut shared = self.shared.borrow_mut();
        let wptr_gray = shared.wptr_gray;

        if o_bwd.ready && !empty {
            self.rptr = (self.rptr + 1) & ptr_mask(DEPTH);
            shared.rptr_gray = bin_to_gray(self.rptr);
        }
        shared.wptr_sync = [wptr_gray, shared.wptr_sync[0]];
    }

    /// Drops the unread entries.
    fn reset(&mut self) {
        let mut shared = self.shared.borrow_mut();
        let wptr_gray = shared.wptr_gray;

        self.rptr = gray_to_bin(wptr_gray);
        shared.rptr_gray = wptr_gray;
        shared.rptr_sync = [wptr_gray; 2];
        shared.wptr_sync = [wptr_gray; 2];
    }
}
