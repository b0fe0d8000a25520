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

use std::path::Path;

use super::constants::*;
use super::document::Document;
use super::document::NodeId;
use super::error::Error;
use super::error::ParseErrorCode;
use super::error::Result;
use super::number::Number;
use super::util::decode_hex_escape;
use super::util::is_simple_escape;
use super::util::position;
use super::util::unescape;
use super::value::Node;
use super::value::Value;

/// Parses JSON text into a new document, returning it with its root.
pub fn parse(text: &str) -> Result<(Document, NodeId)> {
    let mut doc = Document::new();
    let root = doc.parse(text)?;
    Ok((doc, root))
}

/// Reads a whole file and parses it into a new document.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<(Document, NodeId)> {
    let mut doc = Document::new();
    let root = doc.parse_file(path)?;
    Ok((doc, root))
}

impl Document {
    /// Parses JSON text into a detached tree of this document.
    ///
    /// On failure nothing is added to the document and the error carries the
    /// position of the offending character.
    pub fn parse(&mut self, text: &str) -> Result<NodeId> {
        self.parse_utf8(text.as_bytes())
    }

    /// Like [`parse`](Document::parse), validating UTF-8 first.
    pub fn parse_bytes(&mut self, buf: &[u8]) -> Result<NodeId> {
        if let Err(err) = std::str::from_utf8(buf) {
            let pos = position(buf, err.valid_up_to());
            return Err(Error::Syntax(ParseErrorCode::InvalidUtf8, pos));
        }
        self.parse_utf8(buf)
    }

    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<NodeId> {
        let buf = std::fs::read(path)?;
        self.parse_bytes(&buf)
    }

    fn parse_utf8(&mut self, buf: &[u8]) -> Result<NodeId> {
        let root = self.alloc(Node::default())?;
        let mut parser = Parser::new(buf, self);
        match parser.parse(root) {
            Ok(()) => Ok(root),
            Err(err) => {
                log::debug!("discarding partial document: {}", err);
                self.release(root);
                Err(err)
            }
        }
    }
}

/// One scanner step: an optional scalar spanning `left..=right`, followed by
/// the structural token at `token` (`buf.len()` stands for end of input).
///
/// When no scalar precedes the token, `left == token`.
#[derive(Debug, Clone, Copy)]
struct Lexeme {
    left: usize,
    right: usize,
    token: usize,
}

impl Lexeme {
    #[inline]
    fn has_scalar(&self) -> bool {
        self.left != self.token
    }
}

/// Single pass parser.
///
/// The scanner never backtracks and the state machine never recurses: the
/// node being filled is the only state, opening a container moves it to a
/// fresh child, closing one moves it back to the parent.
struct Parser<'a, 'd> {
    buf: &'a [u8],
    doc: &'d mut Document,
}

impl<'a, 'd> Parser<'a, 'd> {
    fn new(buf: &'a [u8], doc: &'d mut Document) -> Parser<'a, 'd> {
        Self { buf, doc }
    }

    fn error(&self, code: ParseErrorCode, idx: usize) -> Error {
        Error::Syntax(code, position(self.buf, idx))
    }

    #[inline]
    fn peek(&self, idx: usize) -> Option<u8> {
        self.buf.get(idx).copied()
    }

    #[inline]
    fn is_space(&self, idx: usize) -> bool {
        matches!(self.peek(idx), Some(b' ' | b'\t' | b'\n' | b'\r'))
    }

    #[inline]
    fn is_token(&self, idx: usize) -> bool {
        matches!(
            self.peek(idx),
            None | Some(b'{' | b'}' | b'[' | b']' | b':' | b',')
        )
    }

    #[inline]
    fn skip_spaces(&self, mut idx: usize) -> usize {
        while self.is_space(idx) {
            idx += 1;
        }
        idx
    }

    /// Returns the index of the closing quote of a string starting at `idx`.
    fn scan_quoted(&self, mut idx: usize) -> Result<usize> {
        loop {
            match self.peek(idx) {
                None => return Err(self.error(ParseErrorCode::UnterminatedString, idx)),
                Some(c) if c < 0x20 => {
                    return Err(self.error(ParseErrorCode::ControlCharacterInString, idx))
                }
                Some(b'"') => return Ok(idx),
                Some(b'\\') => match self.peek(idx + 1) {
                    Some(c) if is_simple_escape(c) => idx += 2,
                    Some(b'u')
                        if self
                            .buf
                            .get(idx + 2..idx + 2 + UNICODE_LEN)
                            .and_then(decode_hex_escape)
                            .is_some() =>
                    {
                        idx += 2 + UNICODE_LEN
                    }
                    _ => return Err(self.error(ParseErrorCode::InvalidEscape, idx)),
                },
                Some(_) => idx += 1,
            }
        }
    }

    /// Returns the index just past an unquoted scalar.
    fn scan_unquoted(&self, mut idx: usize) -> usize {
        while !self.is_space(idx) && !self.is_token(idx) && self.peek(idx) != Some(b'"') {
            idx += 1;
        }
        idx
    }

    fn scan(&self, from: usize) -> Result<Lexeme> {
        let left = self.skip_spaces(from);
        if self.is_token(left) {
            return Ok(Lexeme {
                left,
                right: left,
                token: left,
            });
        }

        let (right, end) = if self.peek(left) == Some(b'"') {
            let right = self.scan_quoted(left + 1)?;
            (right, right + 1)
        } else {
            let end = self.scan_unquoted(left + 1);
            if self.peek(end) == Some(b'"') {
                return Err(self.error(ParseErrorCode::UnexpectedCharacter, end));
            }
            (end - 1, end)
        };

        let token = self.skip_spaces(end);
        if !self.is_token(token) {
            return Err(self.error(ParseErrorCode::UnexpectedCharacter, token));
        }
        Ok(Lexeme { left, right, token })
    }

    #[inline]
    fn value(&self, node: NodeId) -> &Value {
        &self.doc.data(node).value
    }

    #[inline]
    fn is_undefined(&self, node: NodeId) -> bool {
        matches!(self.value(node), Value::Undefined)
    }

    #[inline]
    fn is_named(&self, node: NodeId) -> bool {
        self.doc.data(node).name.is_some()
    }

    #[inline]
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.doc.link(node).parent
    }

    fn in_object(&self, node: NodeId) -> bool {
        self.parent(node)
            .is_some_and(|parent| matches!(self.value(parent), Value::Object))
    }

    fn create_child(&mut self, parent: NodeId) -> Result<NodeId> {
        let child = self.doc.alloc(Node::default())?;
        self.doc.link_front(parent, child);
        Ok(child)
    }

    fn create_next(&mut self, node: NodeId) -> Result<NodeId> {
        let next = self.doc.alloc(Node::default())?;
        self.doc.link_after(node, next);
        Ok(next)
    }

    fn set_name(&mut self, node: NodeId, lex: &Lexeme) -> Result<()> {
        if self.peek(lex.left) != Some(b'"') {
            return Err(self.error(ParseErrorCode::InvalidName, lex.left));
        }
        let name = unescape(&self.buf[lex.left + 1..lex.right])
            .ok_or_else(|| self.error(ParseErrorCode::InvalidEscape, lex.left))?;
        self.doc.data_mut(node).name = Some(name);
        Ok(())
    }

    fn set_value(&mut self, node: NodeId, lex: &Lexeme) -> Result<()> {
        let text = &self.buf[lex.left..=lex.right];
        let value = if text[0] == b'"' {
            let s = unescape(&self.buf[lex.left + 1..lex.right])
                .ok_or_else(|| self.error(ParseErrorCode::InvalidEscape, lex.left))?;
            Value::String(s)
        } else if text == LIT_NULL {
            Value::Null
        } else if text == LIT_TRUE {
            Value::Bool(true)
        } else if text == LIT_FALSE {
            Value::Bool(false)
        } else {
            let number = std::str::from_utf8(text).ok().and_then(Number::from_lexeme);
            match number {
                Some(number) => Value::Number(number),
                None if text[0] == b'-' || text[0].is_ascii_digit() => {
                    return Err(self.error(ParseErrorCode::InvalidNumber, lex.left))
                }
                None => return Err(self.error(ParseErrorCode::ExpectedValue, lex.left)),
            }
        };
        self.doc.data_mut(node).value = value;
        Ok(())
    }

    /// Finishes `node` before a `,`, a closing token or end of input.
    ///
    /// A node still undefined takes the scalar scanned before the token; a
    /// container already closed must not be followed by one.
    fn complete(&mut self, node: NodeId, lex: &Lexeme) -> Result<()> {
        if !self.is_undefined(node) {
            if lex.has_scalar() {
                let code = if self.parent(node).is_none() {
                    ParseErrorCode::TrailingCharacters
                } else {
                    ParseErrorCode::UnexpectedCharacter
                };
                return Err(self.error(code, lex.left));
            }
            return Ok(());
        }
        if !lex.has_scalar() {
            return Err(self.error(ParseErrorCode::ExpectedValue, lex.left));
        }
        if self.in_object(node) && !self.is_named(node) {
            return Err(self.error(ParseErrorCode::ExpectedName, lex.left));
        }
        self.set_value(node, lex)
    }

    fn parse(&mut self, root: NodeId) -> Result<()> {
        let mut node = root;
        let mut from = 0;
        loop {
            let lex = self.scan(from)?;
            match self.peek(lex.token) {
                Some(c @ (b'{' | b'[')) => {
                    // [[] []] and 1[] are both missing a comma
                    if !self.is_undefined(node) || lex.has_scalar() {
                        return Err(self.error(ParseErrorCode::UnexpectedToken, lex.left));
                    }
                    if self.in_object(node) && !self.is_named(node) {
                        return Err(self.error(ParseErrorCode::ExpectedName, lex.token));
                    }
                    self.doc.data_mut(node).value = if c == b'{' {
                        Value::Object
                    } else {
                        Value::Array
                    };
                    node = self.create_child(node)?;
                }
                Some(b':') => {
                    if !lex.has_scalar() {
                        return Err(self.error(ParseErrorCode::ExpectedName, lex.left));
                    }
                    if !self.in_object(node) || self.is_named(node) {
                        return Err(self.error(ParseErrorCode::UnexpectedName, lex.token));
                    }
                    self.set_name(node, &lex)?;
                }
                Some(b',') => {
                    if self.parent(node).is_none() {
                        return Err(self.error(ParseErrorCode::UnexpectedToken, lex.token));
                    }
                    self.complete(node, &lex)?;
                    node = self.create_next(node)?;
                }
                Some(c @ (b'}' | b']')) => {
                    let parent = match self.parent(node) {
                        Some(parent) => parent,
                        None => {
                            return Err(self.error(ParseErrorCode::MismatchedClose, lex.token))
                        }
                    };
                    let matches = match self.value(parent) {
                        Value::Object => c == b'}',
                        Value::Array => c == b']',
                        _ => false,
                    };
                    if !matches {
                        return Err(self.error(ParseErrorCode::MismatchedClose, lex.token));
                    }
                    let empty = self.is_undefined(node)
                        && !lex.has_scalar()
                        && self.doc.link(node).prev.is_none()
                        && !self.is_named(node);
                    if empty {
                        // {} and [] keep no placeholder child
                        self.doc.unlink(node);
                        self.doc.release(node);
                    } else {
                        self.complete(node, &lex)?;
                    }
                    node = parent;
                }
                None => {
                    if self.parent(node).is_some() {
                        return Err(self.error(ParseErrorCode::UnexpectedEof, lex.left));
                    }
                    return self.complete(node, &lex);
                }
                Some(_) => {
                    return Err(self.error(ParseErrorCode::UnexpectedCharacter, lex.token));
                }
            }
            from = lex.token + 1;
        }
    }
}
