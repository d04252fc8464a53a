//! Command-line interface for licitacoes.

mod commands;
pub mod icons;

pub use commands::{is_verbose, run};
