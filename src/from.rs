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

use serde_json::Map as JsonMap;
use serde_json::Number as JsonNumber;
use serde_json::Value as JsonValue;

use super::document::Document;
use super::document::NodeId;
use super::error::Error;
use super::error::Result;
use super::number::Number;
use super::reader::NodeRef;
use super::value::Node;
use super::value::Value;

impl Document {
    /// Copies a `serde_json` value into a new detached tree.
    ///
    /// Strings are taken as they are, so text holding control characters is
    /// accepted here just as it is from escaped JSON input.
    pub fn import(&mut self, name: Option<&str>, value: &JsonValue) -> Result<NodeId> {
        let root = self.alloc(Node::new(name.map(str::to_string), Value::Undefined))?;
        match self.import_into(root, value) {
            Ok(()) => Ok(root),
            Err(err) => {
                self.release(root);
                Err(err)
            }
        }
    }

    fn import_into(&mut self, root: NodeId, value: &JsonValue) -> Result<()> {
        let mut pending = vec![(root, value)];
        while let Some((node, value)) = pending.pop() {
            self.data_mut(node).value = match value {
                JsonValue::Null => Value::Null,
                JsonValue::Bool(v) => Value::Bool(*v),
                JsonValue::Number(n) => Value::Number(from_json_number(n)?),
                JsonValue::String(s) => Value::String(s.clone()),
                JsonValue::Array(items) => {
                    let mut last = None;
                    for item in items {
                        let child = self.alloc(Node::default())?;
                        self.append_child(node, last, child);
                        last = Some(child);
                        pending.push((child, item));
                    }
                    Value::Array
                }
                JsonValue::Object(map) => {
                    let mut last = None;
                    for (key, item) in map {
                        let child = self.alloc(Node::new(Some(key.clone()), Value::Undefined))?;
                        self.append_child(node, last, child);
                        last = Some(child);
                        pending.push((child, item));
                    }
                    Value::Object
                }
            };
        }
        Ok(())
    }

    #[inline]
    fn append_child(&mut self, parent: NodeId, last: Option<NodeId>, child: NodeId) {
        match last {
            Some(last) => self.link_after(last, child),
            None => self.link_front(parent, child),
        }
    }
}

fn from_json_number(n: &JsonNumber) -> Result<Number> {
    if let Some(v) = n.as_i64() {
        Ok(Number::from_i64(v))
    } else if let Some(v) = n.as_u64() {
        Ok(Number::from_u64(v))
    } else {
        n.as_f64()
            .and_then(Number::from_f64_shortest)
            .ok_or(Error::NonFiniteNumber)
    }
}

fn to_json_number(n: &Number) -> Option<JsonNumber> {
    if let Some(v) = n.as_i64() {
        return Some(JsonNumber::from(v));
    }
    if let Some(v) = n.as_u64() {
        return Some(JsonNumber::from(v));
    }
    JsonNumber::from_f64(n.as_f64())
}

impl NodeRef<'_> {
    /// Converts the subtree into a `serde_json` value.
    ///
    /// Numbers outside the range of `f64` become `null`, and of duplicate
    /// member names the last one wins.
    pub fn to_serde_json(&self) -> JsonValue {
        match self.value() {
            Value::Undefined | Value::Null => JsonValue::Null,
            Value::Bool(v) => JsonValue::Bool(*v),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Number(n) => to_json_number(n).map_or(JsonValue::Null, JsonValue::Number),
            Value::Array => JsonValue::Array(self.children().map(|c| c.to_serde_json()).collect()),
            Value::Object => {
                let mut map = JsonMap::new();
                for child in self.children() {
                    let key = child.name().unwrap_or_default().to_string();
                    map.insert(key, child.to_serde_json());
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl From<NodeRef<'_>> for JsonValue {
    fn from(node: NodeRef<'_>) -> Self {
        node.to_serde_json()
    }
}
