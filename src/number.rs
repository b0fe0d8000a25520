// Copyright 2024 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

/// A JSON number kept in its canonical decimal text.
///
/// Numbers are never re-rendered after they are created: a parsed number keeps
/// its source lexeme and a built number keeps the text it was formatted to, so
/// `0.30` and `0.3` stay distinct when encoded. Comparison is numeric, so the
/// two are still equal.
///
/// The kind is decided once: text containing `.`, `e` or `E` is a double,
/// anything else is an integer.
#[derive(Clone)]
pub enum Number {
    Integer(String),
    Double(String),
}

impl Number {
    pub fn from_i64(value: i64) -> Number {
        let mut buf = itoa::Buffer::new();
        Number::Integer(buf.format(value).to_string())
    }

    pub fn from_u64(value: u64) -> Number {
        let mut buf = itoa::Buffer::new();
        Number::Integer(buf.format(value).to_string())
    }

    /// Formats `value` with exactly `decimals` fractional digits.
    ///
    /// With `decimals == 0` the result is an integer, rounded half to even.
    /// Returns `None` for NaN and infinities, which have no JSON text.
    pub fn from_f64(value: f64, decimals: usize) -> Option<Number> {
        if !value.is_finite() {
            return None;
        }
        let text = format!("{:.*}", decimals, value);
        if decimals == 0 {
            Some(Number::Integer(text))
        } else {
            Some(Number::Double(text))
        }
    }

    /// Formats `value` with the shortest text that reads back to the same bits.
    pub fn from_f64_shortest(value: f64) -> Option<Number> {
        if !value.is_finite() {
            return None;
        }
        let mut buf = ryu::Buffer::new();
        Some(Number::Double(buf.format_finite(value).to_string()))
    }

    /// Validates a scanned lexeme and classifies it.
    ///
    /// The whole lexeme must convert as a decimal float, must start (after an
    /// optional `-`) and end with a digit, and must not pad with leading zeros.
    pub(crate) fn from_lexeme(text: &str) -> Option<Number> {
        if fast_float2::parse::<f64, _>(text).is_err() {
            return None;
        }
        let digits = text.strip_prefix('-').unwrap_or(text).as_bytes();
        let first = *digits.first()?;
        let last = *digits.last()?;
        if first == b'0' && digits.get(1).is_some_and(|c| c.is_ascii_digit()) {
            return None;
        }
        if !first.is_ascii_digit() || !last.is_ascii_digit() {
            return None;
        }
        // 1.e5
        if digits
            .windows(2)
            .any(|w| w[0] == b'.' && !w[1].is_ascii_digit())
        {
            return None;
        }
        if digits.iter().any(|c| matches!(c, b'.' | b'e' | b'E')) {
            Some(Number::Double(text.to_string()))
        } else {
            Some(Number::Integer(text.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Number::Integer(text) | Number::Double(text) => text,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Number::Double(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(text) => text.parse().ok(),
            Number::Double(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Integer(text) => text.parse().ok(),
            Number::Double(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        fast_float2::parse(self.as_str()).unwrap_or(f64::NAN)
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            Number::Integer(text) => text.parse().ok(),
            Number::Double(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if let (Some(l), Some(r)) = (self.as_i128(), other.as_i128()) {
            return Some(l.cmp(&r));
        }
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(text) => f.debug_tuple("Integer").field(text).finish(),
            Number::Double(text) => f.debug_tuple("Double").field(text).finish(),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
