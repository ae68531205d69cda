//! Numeric literals.
//!
//! Radix literals (`0x`, `0b`, leading-`0` octal) accumulate into a `u64`;
//! decimal literals accumulate their digits into a `u64` mantissa plus a
//! power-of-ten scale. Every error is recorded but scanning carries on to
//! the end of the lexeme, so the cursor lands where it would have without
//! the error. The first error wins.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::lex_error::LexErrorKind;
use crate::token::{TokenKind, TokenValue};

use super::{Lexeme, Lexer};

impl<'s> Lexer<'s> {
    pub(super) fn number(&mut self) -> Lexeme<'s> {
        if self.peek[0] == b'0' {
            match self.peek[1] {
                b'x' | b'X' => {
                    self.advance(2);
                    return self.radix_literal(16);
                }
                b'b' | b'B' => {
                    self.advance(2);
                    return self.radix_literal(2);
                }
                b'0'..=b'9' => {
                    self.advance(1);
                    return self.radix_literal(8);
                }
                _ => {}
            }
        }
        self.decimal_literal()
    }

    /// Digits of a radix literal whose prefix has been consumed.
    ///
    /// Hex consumes `0-9a-fA-F`; binary and octal consume `0-9` and flag
    /// digits outside the radix.
    fn radix_literal(&mut self, radix: u32) -> Lexeme<'s> {
        let mut value: u64 = 0;
        let mut digits = 0usize;
        let mut error = None;

        while !self.is_at_end() {
            let byte = self.peek[0];
            let digit = match byte {
                b'0'..=b'9' => u32::from(byte - b'0'),
                b'a'..=b'f' if radix == 16 => u32::from(byte - b'a') + 10,
                b'A'..=b'F' if radix == 16 => u32::from(byte - b'A') + 10,
                _ => break,
            };
            self.advance(1);
            digits += 1;

            if digit >= radix {
                error.get_or_insert(LexErrorKind::InvalidDigitForRadix {
                    digit: char::from(byte),
                    radix,
                });
                continue;
            }
            match value
                .checked_mul(u64::from(radix))
                .and_then(|v| v.checked_add(u64::from(digit)))
            {
                Some(next) => value = next,
                None => {
                    error.get_or_insert(LexErrorKind::IntOverflow);
                }
            }
        }

        if digits == 0 {
            error.get_or_insert(LexErrorKind::MissingDigits);
        }
        match error {
            Some(err) => Lexeme::error(err),
            None => Lexeme::new(TokenKind::IntLit, TokenValue::Int(value)),
        }
    }

    /// Decimal integer or float: digits, at most one `.` (only when a digit
    /// follows it), an optional exponent and an optional `f` suffix.
    fn decimal_literal(&mut self) -> Lexeme<'s> {
        let mut mantissa: u64 = 0;
        // Set once a digit no longer fits; later digits only move the scale.
        let mut saturated = false;
        // The literal's value is `mantissa * 10^scale`.
        let mut scale: i32 = 0;
        let mut seen_point = false;
        let mut is_float = false;
        let mut error = None;

        while !self.is_at_end() {
            match self.peek[0] {
                byte @ b'0'..=b'9' => {
                    self.advance(1);
                    let digit = u64::from(byte - b'0');
                    match mantissa.checked_mul(10).and_then(|m| m.checked_add(digit)) {
                        Some(next) if !saturated => {
                            mantissa = next;
                            if seen_point {
                                scale -= 1;
                            }
                        }
                        _ => {
                            saturated = true;
                            if !seen_point {
                                scale += 1;
                            }
                        }
                    }
                }
                b'.' if !seen_point && self.peek[1].is_ascii_digit() => {
                    seen_point = true;
                    is_float = true;
                    self.advance(1);
                }
                _ => break,
            }
        }

        if matches!(self.peek[0], b'e' | b'E') && !self.is_at_end() {
            is_float = true;
            self.advance(1);
            match self.exponent() {
                Ok(exponent) => scale += exponent,
                Err(err) => {
                    error.get_or_insert(err);
                }
            }
        }

        if matches!(self.peek[0], b'f' | b'F') && !self.is_at_end() {
            self.advance(1);
            if let Some(err) = error {
                return Lexeme::error(err);
            }
            return match scaled::<f32>(mantissa, scale) {
                Some(value) if value.is_finite() => {
                    Lexeme::new(TokenKind::F32Lit, TokenValue::F32(value))
                }
                _ => Lexeme::error(LexErrorKind::FloatOverflow),
            };
        }

        if let Some(err) = error {
            return Lexeme::error(err);
        }
        if !is_float {
            return if saturated {
                Lexeme::error(LexErrorKind::IntOverflow)
            } else {
                Lexeme::new(TokenKind::IntLit, TokenValue::Int(mantissa))
            };
        }
        match scaled::<f64>(mantissa, scale) {
            Some(value) if value.is_finite() => {
                Lexeme::new(TokenKind::F64Lit, TokenValue::F64(value))
            }
            _ => Lexeme::error(LexErrorKind::FloatOverflow),
        }
    }

    /// Signed exponent digits after `e`. Accumulates in `i16`.
    fn exponent(&mut self) -> Result<i32, LexErrorKind> {
        let negative = match self.peek[0] {
            b'-' => {
                self.advance(1);
                true
            }
            b'+' => {
                self.advance(1);
                false
            }
            _ => false,
        };

        let mut exponent: i16 = 0;
        let mut overflow = false;
        let digits = self.eat_digits(|digit| {
            match exponent
                .checked_mul(10)
                .and_then(|e| e.checked_add(i16::from(digit)))
            {
                Some(next) => exponent = next,
                None => overflow = true,
            }
        });

        if digits == 0 {
            return Err(LexErrorKind::EmptyExponent);
        }
        if overflow {
            return Err(LexErrorKind::ExponentOverflow);
        }
        let exponent = i32::from(exponent);
        Ok(if negative { -exponent } else { exponent })
    }

    /// Consume decimal digits, handing each value to `f`. Returns the count.
    fn eat_digits(&mut self, mut f: impl FnMut(u8)) -> usize {
        let mut count = 0;
        while !self.is_at_end() && self.peek[0].is_ascii_digit() {
            f(self.peek[0] - b'0');
            self.advance(1);
            count += 1;
        }
        count
    }
}

/// `mantissa * 10^scale`, correctly rounded.
///
/// The pair is rendered as `{mantissa}e{scale}` into a stack buffer and
/// handed to the standard float parser, which also handles subnormals and
/// rounds to the target width directly. `None` only if the rendering does
/// not parse.
fn scaled<F: FromStr>(mantissa: u64, scale: i32) -> Option<F> {
    let mut buf = DecimalBuf::default();
    write!(buf, "{mantissa}e{scale}").ok()?;
    std::str::from_utf8(buf.filled()).ok()?.parse().ok()
}

/// Room for a `u64` (20 digits), `e` and an `i32` (11 characters).
#[derive(Default)]
struct DecimalBuf {
    bytes: [u8; 32],
    len: usize,
}

impl DecimalBuf {
    fn filled(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Write for DecimalBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        let dest = self.bytes.get_mut(self.len..end).ok_or(fmt::Error)?;
        dest.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}
