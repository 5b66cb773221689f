//! Finite state machine (Mealy machine) on valid-ready channels.

use crate::*;

/// Feeds a valid-ready channel to a new FSM.
///
/// The FSM is described by `f`, which computes (1) the current-cycle output for all cycles and (2) the
/// next-cycle state. The state is updated only after transfer cycles. The handshake passes straight through.
pub fn fsm_map<I, O, S, F>(module_name: &str, init: S, f: F) -> Module<VrChannel<I>, VrChannel<O>>
where
    I: Signal,
    O: Signal,
    S: Signal,
    F: 'static + Fn(&I, &S) -> (O, S),
{
    fsm::<VrChannel<I>, VrChannel<O>, S, _>(module_name, init, move |i_fwd, o_bwd, s| {
        let (inner, s_next) = f(&i_fwd.inner, s);
        let s_next = if i_fwd.fire(o_bwd) { s_next } else { s.clone() };
        (Valid::new(i_fwd.valid, inner), *o_bwd, s_next)
    })
}

/// Maps the payload of a valid-ready channel.
pub fn map<I: Signal, O: Signal, F: 'static + Fn(&I) -> O>(
    module_name: &str, f: F,
) -> Module<VrChannel<I>, VrChannel<O>> {
    fsm_map::<I, O, (), _>(module_name, (), move |input, state| (f(input), *state))
}

/// Passes a valid-ready channel through unchanged.
pub fn identity<V: Signal>() -> Module<VrChannel<V>, VrChannel<V>> { map("identity", V::clone) }
