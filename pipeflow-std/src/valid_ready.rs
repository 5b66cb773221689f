//! Utilities for valid-ready channels.

use crate::*;

channel! {
    /// Valid-ready channel.
    ///
    /// A value is transferred on every cycle where the producer's `valid` and the consumer's `ready` are both
    /// asserted. Either side may withhold indefinitely.
    VrChannel<V: Signal>, Valid<V>, Ready
}

/// Valid/ready channel's forward signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Valid<V: Signal> {
    /// Inner data
    pub inner: V,

    /// Valid bit
    pub valid: bool,
}

impl<V: Signal> Signal for Valid<V> {
    fn x() -> Self { Self::invalid() }
}

impl<V: Signal> Valid<V> {
    /// Creates a new value.
    pub fn new(valid: bool, inner: V) -> Self { Self { inner, valid } }

    /// Creates an invalid value.
    pub fn invalid() -> Self { Self::new(false, V::x()) }

    /// Creates a valid value.
    pub fn valid(inner: V) -> Self { Self::new(true, inner) }

    /// Maps the inner value.
    pub fn map_inner<W: Signal>(self, f: impl FnOnce(V) -> W) -> Valid<W> {
        Valid { inner: f(self.inner), valid: self.valid }
    }

    /// Returns whether a transfer happens when the consumer drives `ready`.
    pub fn fire(&self, ready: &Ready) -> bool { self.valid && ready.ready }

    /// Returns the inner value if valid.
    pub fn into_option(self) -> Option<V> {
        if self.valid {
            Some(self.inner)
        } else {
            None
        }
    }
}

impl<V: Signal> From<Option<V>> for Valid<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(inner) => Self::valid(inner),
            None => Self::invalid(),
        }
    }
}

/// Ready signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ready {
    /// Ready bit
    pub ready: bool,
}

impl_signal_default!(Ready);

impl Ready {
    /// Creates a new value.
    pub fn new(ready: bool) -> Self { Self { ready } }
}
