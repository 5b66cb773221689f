//! Composite modules.

use crate::hir::*;

/// Two circuits connected back-to-back: `A`'s egress drives `B`'s ingress.
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    head: A,
    tail: B,
}

impl<A: Circuit, B: Circuit<I = A::O>> Chain<A, B> {
    /// Returns the upstream circuit.
    pub fn head(&self) -> &A { &self.head }

    /// Returns the downstream circuit.
    pub fn tail(&self) -> &B { &self.tail }

    /// Signals on the wires between `head` and `tail` during the current cycle.
    fn mid(&self, i_fwd: &Fwd<A::I>, o_bwd: &Bwd<B::O>) -> (Fwd<A::O>, Bwd<A::O>) {
        let mid_bwd = self.tail.bwd(o_bwd);
        let mid_fwd = self.head.fwd(i_fwd, &mid_bwd);
        (mid_fwd, mid_bwd)
    }
}

impl<A: Circuit, B: Circuit<I = A::O>> Circuit for Chain<A, B> {
    type I = A::I;
    type O = B::O;

    fn bwd(&self, o_bwd: &Bwd<B::O>) -> Bwd<A::I> { self.head.bwd(&self.tail.bwd(o_bwd)) }

    fn fwd(&self, i_fwd: &Fwd<A::I>, o_bwd: &Bwd<B::O>) -> Fwd<B::O> {
        let (mid_fwd, _) = self.mid(i_fwd, o_bwd);
        self.tail.fwd(&mid_fwd, o_bwd)
    }

    fn clock(&mut self, i_fwd: &Fwd<A::I>, o_bwd: &Bwd<B::O>) {
        let (mid_fwd, mid_bwd) = self.mid(i_fwd, o_bwd);
        self.head.clock(i_fwd, &mid_bwd);
        self.tail.clock(&mid_fwd, o_bwd);
    }

    fn reset(&mut self) {
        self.head.reset();
        self.tail.reset();
    }
}

/// Composition combinators for circuits.
pub trait CircuitExt: Circuit + Sized {
    /// Feeds `self`'s egress into `next`.
    fn chain<B: Circuit<I = Self::O>>(self, next: B) -> Chain<Self, B> { Chain { head: self, tail: next } }

    /// Erases the circuit's type into a named module.
    fn build(self, module_name: &str) -> Module<Self::I, Self::O>
    where Self: 'static {
        Module::new(module_name, self)
    }
}

impl<C: Circuit> CircuitExt for C {}
