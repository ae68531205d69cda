//! `%`-specifier formatter writing into a [`ByteStream`].
//!
//! | Specifier | Argument                      |
//! |-----------|-------------------------------|
//! | `%%`      | none, emits `%`               |
//! | `%u`      | `u32`                         |
//! | `%i`      | `i32`                         |
//! | `%U`      | `u64`                         |
//! | `%I`      | `i64`                         |
//! | `%S`      | byte string or [`Interval`]   |
//! | `%s`      | NUL-terminated [`CStr`]       |
//! | `%b`      | `bool`, as `true` / `false`   |
//!
//! There are no width, precision or locale flags. An unknown specifier is
//! copied through verbatim, and so is a known one whose argument is missing
//! or of the wrong type. A lone `%` at the end of the template is emitted
//! as `%`.

use std::ffi::CStr;

use memchr::memchr;

use crate::interval::Interval;
use crate::stream::ByteStream;

/// One formatter argument.
#[derive(Clone, Copy, Debug)]
pub enum Arg<'a> {
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Bytes(&'a [u8]),
    Interval(Interval<'a>),
    CStr(&'a CStr),
    Bool(bool),
}

impl From<u32> for Arg<'_> {
    fn from(value: u32) -> Self {
        Arg::U32(value)
    }
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Arg::I32(value)
    }
}

impl From<u64> for Arg<'_> {
    fn from(value: u64) -> Self {
        Arg::U64(value)
    }
}

impl From<i64> for Arg<'_> {
    fn from(value: i64) -> Self {
        Arg::I64(value)
    }
}

impl From<usize> for Arg<'_> {
    fn from(value: usize) -> Self {
        Arg::U64(value as u64)
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Arg::Bytes(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Bytes(value.as_bytes())
    }
}

impl<'a> From<Interval<'a>> for Arg<'a> {
    fn from(value: Interval<'a>) -> Self {
        Arg::Interval(value)
    }
}

impl<'a> From<&'a CStr> for Arg<'a> {
    fn from(value: &'a CStr) -> Self {
        Arg::CStr(value)
    }
}

/// Format `template` with `args` into `stream`.
///
/// Returns the number of bytes appended.
pub fn print(stream: &mut ByteStream<'_>, template: &str, args: &[Arg<'_>]) -> usize {
    let mut out = Counted { stream, written: 0 };
    let mut args = args.iter();
    let mut rest = template.as_bytes();

    while let Some(at) = memchr(b'%', rest) {
        out.bytes(&rest[..at]);
        let Some(&spec) = rest.get(at + 1) else {
            out.byte(b'%');
            return out.written;
        };
        rest = &rest[at + 2..];

        let rendered = match spec {
            b'%' => {
                out.byte(b'%');
                true
            }
            b'u' | b'i' | b'U' | b'I' | b'S' | b's' | b'b' => {
                args.next().is_some_and(|arg| out.arg(spec, *arg))
            }
            _ => false,
        };
        if !rendered {
            out.bytes(&[b'%', spec]);
        }
    }
    out.bytes(rest);
    out.written
}

/// Format into a stream, converting each argument with [`Arg::from`].
///
/// ```
/// # use gnom_arena::Arena;
/// # use gnom_stream::{stream_print, ByteStream};
/// let arena = Arena::new();
/// let mut stream = ByteStream::new(&arena);
/// let n = stream_print!(&mut stream, "%S=%i", "x", -4);
/// assert_eq!(n, 4);
/// assert_eq!(stream.to_vec(), b"x=-4");
/// ```
#[macro_export]
macro_rules! stream_print {
    ($stream:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::print($stream, $template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Stream writer that counts what it appends.
struct Counted<'w, 'a> {
    stream: &'w mut ByteStream<'a>,
    written: usize,
}

impl Counted<'_, '_> {
    fn byte(&mut self, byte: u8) {
        self.stream.push(byte);
        self.written += 1;
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.stream.push_bytes(bytes);
        self.written += bytes.len();
    }

    /// Render `arg` for `spec`; false when the argument has the wrong type.
    fn arg(&mut self, spec: u8, arg: Arg<'_>) -> bool {
        match (spec, arg) {
            (b'u', Arg::U32(value)) => self.unsigned(u64::from(value)),
            (b'i', Arg::I32(value)) => self.signed(i64::from(value)),
            (b'U', Arg::U64(value)) => self.unsigned(value),
            (b'I', Arg::I64(value)) => self.signed(value),
            (b'S', Arg::Bytes(bytes)) => self.bytes(bytes),
            (b'S', Arg::Interval(interval)) => {
                for chunk in interval.chunks() {
                    self.bytes(chunk);
                }
            }
            (b's', Arg::CStr(cstr)) => self.bytes(cstr.to_bytes()),
            (b'b', Arg::Bool(value)) => self.bytes(if value { &b"true"[..] } else { b"false" }),
            _ => return false,
        }
        true
    }

    /// Digits are produced least significant first, then reversed.
    fn unsigned(&mut self, mut value: u64) {
        let mut digits = [0u8; 20];
        let mut count = 0;
        loop {
            digits[count] = b'0' + (value % 10) as u8;
            count += 1;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        digits[..count].reverse();
        self.bytes(&digits[..count]);
    }

    fn signed(&mut self, value: i64) {
        if value < 0 {
            self.byte(b'-');
        }
        self.unsigned(value.unsigned_abs());
    }
}
