//! Circuit description: signals, interfaces, FSMs and their composition.

#[macro_use]
mod signal;
#[macro_use]
mod interface;
mod module;
mod module_composite;
mod module_fsm;

pub use interface::*;
pub use module::*;
pub use module_composite::*;
pub use module_fsm::*;
pub use signal::*;
