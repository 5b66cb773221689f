//! Module.

use std::fmt;

use crate::hir::*;

/// Synchronous circuit with ingress interface `I` and egress interface `O`.
///
/// A cycle is evaluated in two sweeps. The backward sweep computes the ingress backward signals from the egress
/// backward signals (`bwd`); the forward sweep computes the egress forward signals from the ingress forward
/// signals (`fwd`). Then the clock edge latches the registers (`clock`).
///
/// ### Protocol
///
/// The ingress backward signals may depend on the registers and on the egress backward signals, but never on
/// the ingress forward signals. In valid-ready terms: a consumer's `ready` must not depend on its producer's
/// `valid`. Chained circuits therefore never form a combinational loop.
pub trait Circuit: fmt::Debug {
    /// Ingress interface.
    type I: Interface;

    /// Egress interface.
    type O: Interface;

    /// Computes the ingress backward signals of the current cycle.
    fn bwd(&self, o_bwd: &Bwd<Self::O>) -> Bwd<Self::I>;

    /// Computes the egress forward signals of the current cycle.
    fn fwd(&self, i_fwd: &Fwd<Self::I>, o_bwd: &Bwd<Self::O>) -> Fwd<Self::O>;

    /// Latches the registers at the clock edge ending the current cycle.
    fn clock(&mut self, i_fwd: &Fwd<Self::I>, o_bwd: &Bwd<Self::O>);

    /// Returns the registers to their initial values.
    fn reset(&mut self);

    /// Evaluates the current cycle, advances the clock, and returns the signals driven during the cycle.
    fn step(&mut self, i_fwd: &Fwd<Self::I>, o_bwd: &Bwd<Self::O>) -> (Fwd<Self::O>, Bwd<Self::I>) {
        let o_fwd = self.fwd(i_fwd, o_bwd);
        let i_bwd = self.bwd(o_bwd);
        self.clock(i_fwd, o_bwd);
        (o_fwd, i_bwd)
    }
}

/// Named circuit with its concrete type erased.
pub struct Module<I: Interface, O: Interface> {
    name: String,
    inner: Box<dyn Circuit<I = I, O = O>>,
}

impl<I: Interface, O: Interface> Module<I, O> {
    /// Creates new module.
    pub fn new<C: 'static + Circuit<I = I, O = O>>(name: &str, circuit: C) -> Self {
        Self { name: name.to_string(), inner: Box::new(circuit) }
    }

    /// Returns the module name.
    pub fn name(&self) -> &str { &self.name }
}

impl<I: Interface, O: Interface> fmt::Debug for Module<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module").field("name", &self.name).field("inner", &self.inner).finish()
    }
}

impl<I: Interface, O: Interface> Circuit for Module<I, O> {
    type I = I;
    type O = O;

    fn bwd(&self, o_bwd: &Bwd<O>) -> Bwd<I> { self.inner.bwd(o_bwd) }

    fn fwd(&self, i_fwd: &Fwd<I>, o_bwd: &Bwd<O>) -> Fwd<O> { self.inner.fwd(i_fwd, o_bwd) }

    fn clock(&mut self, i_fwd: &Fwd<I>, o_bwd: &Bwd<O>) { self.inner.clock(i_fwd, o_bwd) }

    fn reset(&mut self) { self.inner.reset() }
}
