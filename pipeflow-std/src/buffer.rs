//! Buffer for valid-ready channels.

use std::marker::PhantomData;

use crate::*;

/// Registered pipe stage for valid-ready channels.
///
/// Holds at most one value. The egress signals are driven from the register only, and a new value is accepted
/// whenever the register is empty or is being drained in the same cycle, so the stage sustains one transfer per
/// cycle.
#[derive(Debug)]
pub struct BufferVr<V: Signal> {
    _marker: PhantomData<V>,
}

impl<V: Signal> BufferVr<V> {
    /// Creates a new buffer.
    pub fn new() -> Self { Self { _marker: PhantomData } }
}

impl<V: Signal> Default for BufferVr<V> {
    fn default() -> Self { Self::new() }
}

impl<V: Signal> Fsm for BufferVr<V> {
    type I = VrChannel<V>;
    type O = VrChannel<V>;
    type S = Valid<V>;

    fn init(&self) -> Valid<V> { Valid::invalid() }

    fn logic(&self, ingress_fwd: &Valid<V>, egress_bwd: &Ready, state: &Valid<V>) -> (Valid<V>, Ready, Valid<V>) {
        let egress_fwd = state.clone();
        let ingress_bwd = Ready::new(!state.valid || egress_bwd.ready);

        let incoming = ingress_fwd.fire(&ingress_bwd);
        let outgoing = egress_fwd.fire(egress_bwd);

        let state_next = if incoming {
            ingress_fwd.clone()
        } else if outgoing {
            Valid::invalid()
        } else {
            state.clone()
        };

        (egress_fwd, ingress_bwd, state_next)
    }
}

/// Creates a registered pipe stage module.
pub fn buffer_vr<V: Signal>() -> Module<VrChannel<V>, VrChannel<V>> { BufferVr::new().build("buffer_vr") }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_throughput_and_backpressure() {
        let mut buffer = buffer_vr::<u8>();

        assert_eq!(buffer.step(&Valid::valid(1), &Ready::new(true)), (Valid::invalid(), Ready::new(true)));
        assert_eq!(buffer.step(&Valid::valid(2), &Ready::new(true)), (Valid::valid(1), Ready::new(true)));

        // Stalled: the held value stays, the producer is stopped.
        assert_eq!(buffer.step(&Valid::valid(3), &Ready::new(false)), (Valid::valid(2), Ready::new(false)));
        assert_eq!(buffer.step(&Valid::valid(3), &Ready::new(true)), (Valid::valid(2), Ready::new(true)));
        assert_eq!(buffer.step(&Valid::invalid(), &Ready::new(true)), (Valid::valid(3), Ready::new(true)));
        assert!(!buffer.step(&Valid::invalid(), &Ready::new(true)).0.valid);
    }
}
