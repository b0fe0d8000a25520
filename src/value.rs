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

use super::constants::*;
use super::error::Error;
use super::error::Result;
use super::number::Number;

/// The type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JsonType {
    /// Only seen on nodes the parser has created but not yet filled.
    Undefined,
    Object,
    Array,
    String,
    Integer,
    Double,
    Boolean,
    Null,
}

impl JsonType {
    pub fn name(&self) -> &'static str {
        match self {
            JsonType::Undefined => TYPE_UNDEFINED,
            JsonType::Object => TYPE_OBJECT,
            JsonType::Array => TYPE_ARRAY,
            JsonType::String => TYPE_STRING,
            JsonType::Integer => TYPE_INTEGER,
            JsonType::Double => TYPE_DOUBLE,
            JsonType::Boolean => TYPE_BOOLEAN,
            JsonType::Null => TYPE_NULL,
        }
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, JsonType::Object | JsonType::Array)
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_iterable() && *self != JsonType::Undefined
    }
}

impl Display for JsonType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload of a node.
///
/// Containers carry no payload of their own, their content is the list of
/// child nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Object,
    Array,
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl Value {
    pub fn json_type(&self) -> JsonType {
        match self {
            Value::Undefined => JsonType::Undefined,
            Value::Object => JsonType::Object,
            Value::Array => JsonType::Array,
            Value::String(_) => JsonType::String,
            Value::Number(Number::Integer(_)) => JsonType::Integer,
            Value::Number(Number::Double(_)) => JsonType::Double,
            Value::Bool(_) => JsonType::Boolean,
            Value::Null => JsonType::Null,
        }
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::Object | Value::Array)
    }

    pub fn is_scalar(&self) -> bool {
        self.json_type().is_scalar()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// A node's own data: its optional member name and its payload.
///
/// This is what sort comparators see. Tree links are kept by the
/// [`Document`](crate::Document) and are not reachable from here.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub(crate) name: Option<String>,
    pub(crate) value: Value,
}

impl Node {
    pub(crate) fn new(name: Option<String>, value: Value) -> Node {
        Node { name, value }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn json_type(&self) -> JsonType {
        self.value.json_type()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_number(&self) -> Option<&Number> {
        self.value.as_number()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }
}

/// Copies a caller supplied name or string, rejecting control characters.
pub(crate) fn copy_text(text: &str) -> Result<String> {
    if text.bytes().any(|c| c < 0x20) {
        return Err(Error::InvalidText);
    }
    Ok(text.to_string())
}

pub(crate) fn copy_name(name: Option<&str>) -> Result<Option<String>> {
    name.map(copy_text).transpose()
}
