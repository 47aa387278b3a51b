#![allow(clippy::collapsible_if)]

pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod options;
pub mod output;
pub mod parser;
pub mod value;

pub use error::{LangError, LangResult, LineError};
pub use interpreter::{OutputMapping, Report, Session, SymbolTable, interpret, run_lines, run_reader};
pub use parser::parse_value;
pub use value::Value;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
