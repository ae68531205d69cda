//! Byte streams for the gnom front end.
//!
//! A [`ByteStream`] is an append-only byte buffer stored in arena-backed
//! blocks. It serves both as the lexer's input buffer and as an output
//! buffer that is flushed block by block into an [`OutputSink`].
//!
//! [`Interval`] is a zero-copy view of a byte range inside a stream; tokens
//! carry intervals instead of owned strings. The borrow checker ties every
//! interval to the stream it points into.
//!
//! The rest of the crate is the output side: the `%`-specifier formatter
//! ([`print`], [`stream_print!`]), the sink boundary, the [`Console`]
//! context owning the print and error streams, and severity and assertion
//! reports rendered through it.

mod console;
mod interval;
mod print;
mod report;
mod sink;
mod stream;

pub use console::Console;
pub use interval::{Bytes, Interval};
pub use print::{print, Arg};
pub use report::{AssertionReport, Severity};
pub use sink::{MemorySink, OutputSink, StdSink, StreamHandle};
pub use stream::{ByteStream, DEFAULT_STREAM_BLOCK_SIZE};
