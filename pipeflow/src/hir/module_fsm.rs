//! Finite state machine (Mealy machine).

use std::fmt;
use std::marker::PhantomData;

use crate::hir::*;

/// Finite state machine (Mealy machine).
///
/// The FSM is described by `logic`, which computes (1) the current-cycle outputs and (2) the next-cycle
/// registers from the current-cycle inputs and registers. `logic` must be a pure function: it is evaluated
/// several times per cycle, once per sweep.
pub trait Fsm: fmt::Debug {
    /// Ingress interface.
    type I: Interface;

    /// Egress interface.
    type O: Interface;

    /// Registers.
    type S: Signal;

    /// Initial value of the registers.
    fn init(&self) -> Self::S;

    /// Combinational logic of the FSM.
    fn logic(&self, i_fwd: &Fwd<Self::I>, o_bwd: &Bwd<Self::O>, s: &Self::S) -> (Fwd<Self::O>, Bwd<Self::I>, Self::S);

    /// Called on every clock edge where the registers change.
    fn on_transition(&self, _from: &Self::S, _to: &Self::S) {}

    /// Instantiates the FSM as a named module.
    fn build(self, module_name: &str) -> Module<Self::I, Self::O>
    where Self: 'static + Sized {
        Module::new(module_name, Machine::new(self))
    }
}

/// FSM instantiated together with its registers.
#[derive(Debug, Clone)]
pub struct Machine<F: Fsm> {
    fsm: F,
    state: F::S,
}

impl<F: Fsm> Machine<F> {
    /// Creates a new machine in the FSM's initial state.
    pub fn new(fsm: F) -> Self {
        let state = fsm.init();
        Self { fsm, state }
    }

    /// Returns the FSM description.
    pub fn fsm(&self) -> &F { &self.fsm }

    /// Returns the current registers.
    pub fn state(&self) -> &F::S { &self.state }
}

impl<F: Fsm> Circuit for Machine<F> {
    type I = F::I;
    type O = F::O;

    fn bwd(&self, o_bwd: &Bwd<F::O>) -> Bwd<F::I> { self.fsm.logic(&<Fwd<F::I> as Signal>::x(), o_bwd, &self.state).1 }

    fn fwd(&self, i_fwd: &Fwd<F::I>, o_bwd: &Bwd<F::O>) -> Fwd<F::O> { self.fsm.logic(i_fwd, o_bwd, &self.state).0 }

    fn clock(&mut self, i_fwd: &Fwd<F::I>, o_bwd: &Bwd<F::O>) {
        let (_, _, next) = self.fsm.logic(i_fwd, o_bwd, &self.state);
        if next != self.state {
            self.fsm.on_transition(&self.state, &next);
        }
        self.state = next;
    }

    fn reset(&mut self) { self.state = self.fsm.init(); }
}

/// FSM described by a closure.
pub struct FsmFn<I: Interface, O: Interface, S: Signal, F: Fn(&Fwd<I>, &Bwd<O>, &S) -> (Fwd<O>, Bwd<I>, S)> {
    /// Module name.
    module_name: String,
    /// FSM function.
    f: F,
    /// Initial value of registers in the FSM.
    init: S,
    _marker: PhantomData<(I, O)>,
}

impl<I: Interface, O: Interface, S: Signal, F: Fn(&Fwd<I>, &Bwd<O>, &S) -> (Fwd<O>, Bwd<I>, S)> FsmFn<I, O, S, F> {
    /// Creates a new FSM.
    pub fn new(module_name: &str, init: S, f: F) -> Self {
        Self { module_name: module_name.to_string(), f, init, _marker: PhantomData }
    }
}

impl<I: Interface, O: Interface, S: Signal, F: Fn(&Fwd<I>, &Bwd<O>, &S) -> (Fwd<O>, Bwd<I>, S)> fmt::Debug
    for FsmFn<I, O, S, F>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmFn").field("module_name", &self.module_name).field("init", &self.init).finish()
    }
}

impl<I: Interface, O: Interface, S: Signal, F: Fn(&Fwd<I>, &Bwd<O>, &S) -> (Fwd<O>, Bwd<I>, S)> Fsm
    for FsmFn<I, O, S, F>
{
    type I = I;
    type O = O;
    type S = S;

    fn init(&self) -> S { self.init.clone() }

    fn logic(&self, i_fwd: &Fwd<I>, o_bwd: &Bwd<O>, s: &S) -> (Fwd<O>, Bwd<I>, S) { (self.f)(i_fwd, o_bwd, s) }
}

/// Creates a module from an FSM closure.
pub fn fsm<I, O, S, F>(module_name: &str, init: S, f: F) -> Module<I, O>
where
    I: Interface,
    O: Interface,
    S: Signal,
    F: 'static + Fn(&Fwd<I>, &Bwd<O>, &S) -> (Fwd<O>, Bwd<I>, S),
{
    FsmFn::new(module_name, init, f).build(module_name)
}
