//! Severity reports and assertion-failure reports.

use std::ffi::CStr;
use std::fmt;
use std::panic::PanicHookInfo;

use crate::print::{print, Arg};
use crate::stream::ByteStream;
use crate::stream_print;

/// Severity of a [`Console::report`](crate::Console::report).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Upper-case label used in the `[LABEL]` prefix.
    pub fn label(self) -> &'static CStr {
        match self {
            Severity::Warning => c"WARNING",
            Severity::Error => c"ERROR",
            Severity::Fatal => c"FATAL",
        }
    }

    /// Anything above a warning is flushed as soon as it is reported.
    pub fn flushes_immediately(self) -> bool {
        self > Severity::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_string_lossy())
    }
}

/// Append `[LABEL] message\n` to `stream`. Returns the bytes written.
pub(crate) fn render_report(
    stream: &mut ByteStream<'_>,
    severity: Severity,
    template: &str,
    args: &[Arg<'_>],
) -> usize {
    let mut written = stream_print!(stream, "[%s] ", severity.label());
    written += print(stream, template, args);
    stream.push(b'\n');
    written + 1
}

/// A failed invariant, as rendered by the process-level panic hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionReport<'m> {
    /// The failed condition or panic message.
    pub condition: &'m str,
    pub file: &'m str,
    pub line: u32,
}

impl<'m> AssertionReport<'m> {
    /// Build a report from panic hook information.
    pub fn from_panic(info: &'m PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let condition = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        let (file, line) = info
            .location()
            .map_or(("<unknown>", 0), |loc| (loc.file(), loc.line()));
        Self {
            condition,
            file,
            line,
        }
    }

    /// Append the banner, condition and location to `stream`.
    pub fn render(&self, stream: &mut ByteStream<'_>) -> usize {
        stream_print!(stream, "*********** [ASSERTION FAILED] ***********\n")
            + stream_print!(stream, "The assertion '%S' failed.\n", self.condition)
            + stream_print!(stream, "File: %S,\nLine: %u\n", self.file, self.line)
    }
}

#[cfg(test)]
mod tests;
