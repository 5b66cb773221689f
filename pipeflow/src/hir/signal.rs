use std::fmt::Debug;

/// Values carried on wires.
///
/// Every signal has a don't-care value, `x()`. It is what a wire holds when nothing meaningful is driven on it,
/// e.g., the payload of an invalid valid-ready channel, or the forward signals used to evaluate the backward
/// path of a circuit.
pub trait Signal: 'static + Debug + Clone + PartialEq {
    /// Returns the don't-care value.
    fn x() -> Self;
}

impl Signal for () {
    fn x() -> Self {}
}

impl Signal for bool {
    fn x() -> Self { false }
}

macro_rules! impl_signal {
    ($typ:ty) => {
        impl Signal for $typ {
            fn x() -> Self { 0 }
        }
    };
}

impl_signal!(u8);
impl_signal!(u16);
impl_signal!(u32);
impl_signal!(u64);
impl_signal!(u128);
impl_signal!(usize);

impl<V: Signal, const N: usize> Signal for [V; N] {
    fn x() -> Self { std::array::from_fn(|_| V::x()) }
}

impl<V: Signal> Signal for Option<V> {
    fn x() -> Self { None }
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! impl_signal_tuple {
    ($($a:ident)+) => {
        impl<$($a: $crate::Signal,)+> $crate::Signal for ($($a,)+) {
            fn x() -> Self { ($(<$a as $crate::Signal>::x(),)+) }
        }
    };
}

impl_signal_tuple! { V1 }
impl_signal_tuple! { V1 V2 }
impl_signal_tuple! { V1 V2 V3 }
impl_signal_tuple! { V1 V2 V3 V4 }
impl_signal_tuple! { V1 V2 V3 V4 V5 }
impl_signal_tuple! { V1 V2 V3 V4 V5 V6 }

/// Implements `Signal` for types whose `Default` value serves as the don't-care value.
#[macro_export]
macro_rules! impl_signal_default {
    ($($typ:ty),+ $(,)?) => {
        $(
            impl $crate::Signal for $typ {
                fn x() -> Self { <$typ as ::std::default::Default>::default() }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Pins {
        idle: bool,
        pattern: u32,
    }

    impl_signal_default!(Pins);

    #[test]
    fn dont_care_values() {
        assert!(!bool::x());
        assert_eq!(<[u8; 4]>::x(), [0; 4]);
        assert_eq!(<(bool, u16)>::x(), (false, 0));
        assert_eq!(Option::<u8>::x(), None);
        assert_eq!(Pins::x(), Pins { idle: false, pattern: 0 });
    }
}
