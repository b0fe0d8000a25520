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
use std::io::Write;

use super::document::Document;
use super::document::NodeId;
use super::error::Result;
use super::reader::NodeRef;
use super::util::escape_into;
use super::value::Value;

impl Document {
    /// Encodes the tree rooted at `id` as compact JSON text.
    ///
    /// The name of `id` itself is not part of the output, and neither are its
    /// siblings.
    pub fn encode(&self, id: NodeId) -> Result<String> {
        let node = self.node(id)?;
        let mut out = String::new();
        Encoder::new(None).encode(node, &mut out);
        Ok(out)
    }

    /// Encodes with one value per line, indenting nested levels by `indent`
    /// spaces.
    pub fn encode_pretty(&self, id: NodeId, indent: usize) -> Result<String> {
        let node = self.node(id)?;
        let mut out = String::new();
        Encoder::new(Some(indent)).encode(node, &mut out);
        Ok(out)
    }

    pub fn write<W: Write>(&self, id: NodeId, mut writer: W) -> Result<()> {
        let text = self.encode(id)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl Display for NodeRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        Encoder::new(None).encode(*self, &mut out);
        f.write_str(&out)
    }
}

struct Encoder {
    indent: Option<usize>,
}

impl Encoder {
    fn new(indent: Option<usize>) -> Encoder {
        Encoder { indent }
    }

    fn newline(&self, depth: usize, out: &mut String) {
        if let Some(width) = self.indent {
            out.push('\n');
            out.extend(std::iter::repeat(' ').take(width * depth));
        }
    }

    /// Walks the tree in document order without recursion, opening each
    /// container on the way down and closing it once its last child is done.
    fn encode(&self, root: NodeRef<'_>, out: &mut String) {
        let doc = root.document();
        let mut node = root.id();
        let mut depth = 0;
        loop {
            if depth > 0 {
                self.write_name(doc, node, out);
            }
            match &doc.data(node).value {
                Value::Object | Value::Array => {
                    let (open, close) = brackets(&doc.data(node).value);
                    out.push(open);
                    if let Some(child) = doc.link(node).child {
                        depth += 1;
                        self.newline(depth, out);
                        node = child;
                        continue;
                    }
                    out.push(close);
                }
                Value::String(s) => escape_into(s, out),
                Value::Number(n) => out.push_str(n.as_str()),
                Value::Bool(true) => out.push_str("true"),
                Value::Bool(false) => out.push_str("false"),
                Value::Null | Value::Undefined => out.push_str("null"),
            }

            loop {
                if depth == 0 {
                    return;
                }
                if let Some(next) = doc.link(node).next {
                    out.push(',');
                    self.newline(depth, out);
                    node = next;
                    break;
                }
                node = match doc.link(node).parent {
                    Some(parent) => parent,
                    None => return,
                };
                depth -= 1;
                self.newline(depth, out);
                out.push(brackets(&doc.data(node).value).1);
            }
        }
    }

    fn write_name(&self, doc: &Document, node: NodeId, out: &mut String) {
        let in_object = doc
            .link(node)
            .parent
            .is_some_and(|parent| matches!(doc.data(parent).value, Value::Object));
        if !in_object {
            return;
        }
        escape_into(doc.data(node).name.as_deref().unwrap_or_default(), out);
        out.push(':');
        if self.indent.is_some() {
            out.push(' ');
        }
    }
}

#[inline]
fn brackets(value: &Value) -> (char, char) {
    match value {
        Value::Object => ('{', '}'),
        _ => ('[', ']'),
    }
}
