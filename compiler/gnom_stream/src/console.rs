//! Console context: the print and error streams plus their sink.

use gnom_arena::Arena;

use crate::print::{print, Arg};
use crate::report::{render_report, AssertionReport, Severity};
use crate::sink::{OutputSink, StreamHandle};
use crate::stream::ByteStream;

/// Buffered standard output and standard error.
///
/// Output is formatted into arena-backed streams and only reaches the sink
/// on an explicit flush (or a report severe enough to flush). Pass the
/// console by reference to whatever needs to print.
pub struct Console<'a, S> {
    output: ByteStream<'a>,
    error: ByteStream<'a>,
    sink: S,
}

impl<'a, S: OutputSink> Console<'a, S> {
    pub fn new(arena: &'a Arena, sink: S) -> Self {
        Self {
            output: ByteStream::new(arena),
            error: ByteStream::new(arena),
            sink,
        }
    }

    /// The print stream.
    pub fn output(&mut self) -> &mut ByteStream<'a> {
        &mut self.output
    }

    /// The error stream.
    pub fn error(&mut self) -> &mut ByteStream<'a> {
        &mut self.error
    }

    /// Format into the print stream.
    pub fn print(&mut self, template: &str, args: &[Arg<'_>]) -> usize {
        print(&mut self.output, template, args)
    }

    /// Format into the error stream.
    pub fn eprint(&mut self, template: &str, args: &[Arg<'_>]) -> usize {
        print(&mut self.error, template, args)
    }

    /// Append a `[SEVERITY] message` line to the error stream.
    ///
    /// Errors and fatal reports flush the error stream right away;
    /// warnings wait for the next flush.
    pub fn report(&mut self, severity: Severity, template: &str, args: &[Arg<'_>]) {
        render_report(&mut self.error, severity, template, args);
        if severity.flushes_immediately() {
            self.flush_error();
        }
    }

    /// Render an assertion failure to the error stream and flush it.
    pub fn assertion_failed(&mut self, report: &AssertionReport<'_>) {
        report.render(&mut self.error);
        self.flush_error();
    }

    pub fn flush_output(&mut self) -> usize {
        self.output.flush(StreamHandle::Output, &mut self.sink)
    }

    pub fn flush_error(&mut self) -> usize {
        self.error.flush(StreamHandle::Error, &mut self.sink)
    }

    /// Flush both streams, output first.
    pub fn flush(&mut self) -> usize {
        self.flush_output() + self.flush_error()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Flush everything and hand back the sink.
    pub fn into_sink(mut self) -> S {
        self.flush();
        self.sink
    }
}

impl<S> std::fmt::Debug for Console<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("output", &self.output)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
