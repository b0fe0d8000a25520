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

use std::fmt::Display;
use std::fmt::Formatter;

use super::document::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCode {
    UnexpectedCharacter,
    ControlCharacterInString,
    UnterminatedString,
    InvalidEscape,
    InvalidNumber,
    InvalidName,
    ExpectedValue,
    ExpectedName,
    UnexpectedName,
    UnexpectedToken,
    MismatchedClose,
    UnexpectedEof,
    TrailingCharacters,
    InvalidUtf8,
}

impl Display for ParseErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            ParseErrorCode::UnexpectedCharacter => f.write_str("unexpected character"),
            ParseErrorCode::ControlCharacterInString => {
                f.write_str("control character in string")
            }
            ParseErrorCode::UnterminatedString => f.write_str("unterminated string"),
            ParseErrorCode::InvalidEscape => f.write_str("invalid escape"),
            ParseErrorCode::InvalidNumber => f.write_str("invalid number"),
            ParseErrorCode::InvalidName => f.write_str("invalid member name"),
            ParseErrorCode::ExpectedValue => f.write_str("expected value"),
            ParseErrorCode::ExpectedName => f.write_str("expected member name"),
            ParseErrorCode::UnexpectedName => f.write_str("unexpected member name"),
            ParseErrorCode::UnexpectedToken => f.write_str("unexpected token"),
            ParseErrorCode::MismatchedClose => f.write_str("mismatched closing token"),
            ParseErrorCode::UnexpectedEof => f.write_str("EOF while parsing a value"),
            ParseErrorCode::TrailingCharacters => f.write_str("trailing characters"),
            ParseErrorCode::InvalidUtf8 => f.write_str("invalid UTF-8"),
        }
    }
}

/// Location of a parse failure.
///
/// `offset` is the byte offset of the offending character. `line` and
/// `column` are 1-based; the column counts characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// A handle refers to a node that has been freed.
    StaleNode(NodeId),
    /// A name or string contains a control character.
    InvalidText,
    /// NaN and infinities have no JSON representation.
    NonFiniteNumber,
    /// The operation needs an object or array.
    NotContainer(NodeId),
    /// The operation needs a scalar node.
    NotScalar(NodeId),
    /// The child already has a parent.
    AlreadyAttached(NodeId),
    /// The node has no parent.
    Detached(NodeId),
    /// Object members must be named.
    NameRequired(NodeId),
    /// Array elements must not be named.
    NameNotAllowed(NodeId),
    /// The child is an ancestor of the target parent.
    CycleDetected(NodeId),
    OutOfMemory,
    Syntax(ParseErrorCode, Position),
    Io(std::io::Error),
}

impl Error {
    /// Returns the location of a parse failure.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Syntax(_, pos) => Some(*pos),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::StaleNode(id) => write!(f, "stale node handle {}", id),
            Error::InvalidText => f.write_str("text contains a control character"),
            Error::NonFiniteNumber => f.write_str("number is not finite"),
            Error::NotContainer(id) => write!(f, "node {} is not an object or array", id),
            Error::NotScalar(id) => write!(f, "node {} is not a scalar", id),
            Error::AlreadyAttached(id) => write!(f, "node {} already has a parent", id),
            Error::Detached(id) => write!(f, "node {} has no parent", id),
            Error::NameRequired(id) => write!(f, "object member {} must be named", id),
            Error::NameNotAllowed(id) => write!(f, "array element {} must not be named", id),
            Error::CycleDetected(id) => write!(f, "node {} is an ancestor of the target", id),
            Error::OutOfMemory => f.write_str("memory allocation failed"),
            Error::Syntax(code, pos) => write!(f, "{}, {}", code, pos),
            Error::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}
