//! The gnom front-end driver.
//!
//! `gnomc lex <file>` runs the tokenizer over a file and lists its tokens.
//! Everything the binary does is reachable from here so integration tests
//! can drive it against an in-memory sink.

use std::panic::PanicHookInfo;
use std::sync::Once;

use gnom_arena::Arena;
use gnom_stream::{AssertionReport, Console, StdSink};

pub mod commands;
mod error;

pub use error::CliError;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, once.
///
/// Does nothing unless `RUST_LOG` is set, so plain runs pay nothing for
/// the instrumentation. Events go to stderr as an indented span tree.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true),
                )
                .init();
        }
    });
}

/// Route panics through the console's assertion report and abort.
///
/// Panics in the front end are invariant violations (a zero block size,
/// a foreign free-list slot, ...), never recoverable conditions.
pub fn install_assertion_hook() {
    std::panic::set_hook(Box::new(assertion_hook));
}

fn assertion_hook(info: &PanicHookInfo<'_>) {
    let arena = Arena::new();
    let mut console = Console::new(&arena, StdSink);
    console.assertion_failed(&AssertionReport::from_panic(info));
    std::process::abort();
}
