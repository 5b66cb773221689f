use std::fmt::Debug;

use crate::hir::*;

/// Interface of channels.
///
/// An interface only describes the shape of the wires between two circuits: the forward signals, driven by
/// the producer, and the backward signals, driven by the consumer.
pub trait Interface: 'static + Sized + Debug {
    /// Forward signals.
    type Fwd: Signal;

    /// Backward signals.
    type Bwd: Signal;
}

/// Forward signals of an interface.
pub type Fwd<I> = <I as Interface>::Fwd;

/// Backward signals of an interface.
pub type Bwd<I> = <I as Interface>::Bwd;

impl Interface for () {
    type Bwd = ();
    type Fwd = ();
}

macro_rules! impl_interface_tuple {
    ($($a:ident)+) => {
        impl<$($a: Interface,)+> Interface for ($($a,)+) {
            type Bwd = ($(<$a as Interface>::Bwd,)+);
            type Fwd = ($(<$a as Interface>::Fwd,)+);
        }
    };
}

impl_interface_tuple! { I1 }
impl_interface_tuple! { I1 I2 }
impl_interface_tuple! { I1 I2 I3 }
impl_interface_tuple! { I1 I2 I3 I4 }

/// Declares a channel interface carrying `$fwd` forward and `$bwd` backward.
#[macro_export]
macro_rules! channel {
    ($(#[$attr:meta])* $name:ident<$v:ident: Signal>, $fwd:ty, $bwd:ty) => {
        $(#[$attr])*
        #[derive(Debug)]
        pub struct $name<$v: $crate::Signal> {
            _marker: ::std::marker::PhantomData<$v>,
        }

        impl<$v: $crate::Signal> $crate::Interface for $name<$v> {
            type Bwd = $bwd;
            type Fwd = $fwd;
        }
    };
}
