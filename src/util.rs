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

use super::constants::*;
use super::error::Position;

#[allow(clippy::zero_prefixed_literal)]
static HEX: [u8; 256] = {
    const __: u8 = 255; // not a hex digit
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 1
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
        00, 01, 02, 03, 04, 05, 06, 07, 08, 09, __, __, __, __, __, __, // 3
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 5
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

#[inline]
fn decode_hex_val(val: u8) -> Option<u32> {
    let n = HEX[val as usize];
    if n == 255 {
        None
    } else {
        Some(n as u32)
    }
}

/// Decodes the four hex digits of a `\uXXXX` escape.
#[inline]
pub(crate) fn decode_hex_escape(numbers: &[u8]) -> Option<u32> {
    if numbers.len() != UNICODE_LEN {
        return None;
    }
    numbers
        .iter()
        .try_fold(0, |n, c| decode_hex_val(*c).map(|hex| (n << 4) | hex))
}

/// Whether `c` may follow a backslash as a one-character escape.
#[inline]
pub(crate) fn is_simple_escape(c: u8) -> bool {
    matches!(c, b'\\' | b'/' | b'"' | b'b' | b'f' | b'n' | b'r' | b't')
}

/// Decodes the body of a quoted string whose escapes were already validated.
///
/// A `\uXXXX` escape becomes its character, and a high surrogate followed by
/// an escaped low surrogate becomes the pair's character. A lone surrogate
/// has no UTF-8 form and is kept as its six-character text. Surrogates are
/// never written out as three-byte CESU-8 sequences, which `String` rejects.
pub(crate) fn unescape(data: &[u8]) -> Option<String> {
    let mut buf = Vec::with_capacity(data.len());
    let mut idx = 0;
    while idx < data.len() {
        let byte = data[idx];
        if byte != b'\\' {
            buf.push(byte);
            idx += 1;
            continue;
        }
        let escaped = *data.get(idx + 1)?;
        match escaped {
            b'b' => buf.push(BB),
            b'f' => buf.push(FF),
            b'n' => buf.push(NN),
            b'r' => buf.push(RR),
            b't' => buf.push(TT),
            b'"' => buf.push(QU),
            b'\\' => buf.push(BS),
            b'/' => buf.push(SD),
            b'u' => {
                let code = decode_hex_escape(data.get(idx + 2..idx + 2 + UNICODE_LEN)?)?;
                let mut len = 2 + UNICODE_LEN;
                let c = match code {
                    0xD800..=0xDBFF => low_surrogate(&data[idx + len..]).and_then(|low| {
                        len += 2 + UNICODE_LEN;
                        char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))
                    }),
                    _ => char::from_u32(code),
                };
                match c {
                    Some(c) => {
                        let mut utf8 = [0u8; 4];
                        buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                    }
                    None => buf.extend_from_slice(&data[idx..idx + len]),
                }
                idx += len;
                continue;
            }
            _ => return None,
        }
        idx += 2;
    }
    String::from_utf8(buf).ok()
}

#[inline]
fn low_surrogate(data: &[u8]) -> Option<u32> {
    if data.len() < 2 + UNICODE_LEN || data[0] != b'\\' || data[1] != b'u' {
        return None;
    }
    decode_hex_escape(&data[2..2 + UNICODE_LEN]).filter(|code| (0xDC00..=0xDFFF).contains(code))
}

/// Appends `s` as a quoted JSON string.
pub(crate) fn escape_into(s: &str, out: &mut String) {
    out.push('"');
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let escaped = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\x08' => "\\b",
            '\x0C' => "\\f",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            c if c < ' ' => "",
            _ => continue,
        };
        out.push_str(&s[start..i]);
        if escaped.is_empty() {
            out.push_str(&format!("\\u{:04x}", c as u32));
        } else {
            out.push_str(escaped);
        }
        start = i + c.len_utf8();
    }
    out.push_str(&s[start..]);
    out.push('"');
}

/// Converts a byte offset into a 1-based line and column.
///
/// Columns count UTF-8 lead bytes, so a multi-byte character is one column.
pub(crate) fn position(buf: &[u8], offset: usize) -> Position {
    let mut pos = Position {
        offset,
        line: 1,
        column: 1,
    };
    for &c in &buf[..offset.min(buf.len())] {
        if c == b'\n' {
            pos.line += 1;
            pos.column = 1;
        } else if c & 0xC0 != 0x80 {
            pos.column += 1;
        }
    }
    pos
}
