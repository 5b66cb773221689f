//! USB3.0 PIPE interface over a raw SerDes transceiver.
//!
//! Wraps a transceiver exposing per-lane symbol streams into a 32-bit/4-bit PIPE stream by adding:
//! - LFPS detection and generation.
//! - Clock compensation (SKP) removal and insertion.
//! - Conversion between the transceiver's word width and the 4-symbol system word.
//! - Clock domain crossing between the transceiver clocks and the system clock.
//! - RX word alignment and decode error substitution.
//! - RX lock and reset sequencing.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
//
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::bare_urls)]
//
#![allow(clippy::needless_lifetimes)]
#![allow(clippy::type_complexity)]
#![allow(elided_lifetimes_in_paths)]

use pipeflow::*;
use pipeflow_std::*;

pub mod constants;
mod converter;
pub mod datapath;
mod error;
mod error_substitution;
pub mod lfps;
mod pipe;
mod rx_init;
mod skp_inserter;
mod skp_remover;
pub mod types;
mod word_aligner;

pub use converter::*;
pub use error::*;
pub use error_substitution::*;
pub use pipe::*;
pub use rx_init::*;
pub use skp_inserter::*;
pub use skp_remover::*;
pub use types::*;
pub use word_aligner::*;
