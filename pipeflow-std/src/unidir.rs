//! Utilities for unidirectional channels.

use crate::*;

channel! {
    /// Unidirectional channel: the value is sampled by the consumer every cycle, with no flow control.
    UniChannel<V: Signal>, V, ()
}
