//! Synchronizer for signals crossing clock domains.

use crate::*;

/// Samples a signal driven by another clock domain through a chain of `STAGES` registers.
///
/// The output lags the input by `STAGES` cycles of the sampling domain. `STAGES` must be at least 2.
#[derive(Debug, Clone)]
pub struct Synchronizer<V: Signal, const STAGES: usize> {
    init: V,
}

impl<V: Signal, const STAGES: usize> Synchronizer<V, STAGES> {
    const CHECK_STAGES: () = assert!(STAGES >= 2, "a synchronizer needs at least two stages");

    /// Creates a new synchronizer whose registers start out holding `init`.
    pub fn new(init: V) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CHECK_STAGES;
        Self { init }
    }
}

impl<V: Signal, const STAGES: usize> Default for Synchronizer<V, STAGES> {
    fn default() -> Self { Self::new(V::x()) }
}

impl<V: Signal, const STAGES: usize> Fsm for Synchronizer<V, STAGES> {
    type I = UniChannel<V>;
    type O = UniChannel<V>;
    type S = [V; STAGES];

    fn init(&self) -> [V; STAGES] { std::array::from_fn(|_| self.init.clone()) }

    fn logic(&self, input: &V, _: &(), stages: &[V; STAGES]) -> (V, (), [V; STAGES]) {
        let output = stages[STAGES - 1].clone();
        let stages_next = std::array::from_fn(|i| if i == 0 { input.clone() } else { stages[i - 1].clone() });
        (output, (), stages_next)
    }
}
