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

use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::ControlFlow;

use super::document::Document;
use super::document::NodeId;
use super::error::Result;
use super::iterator::Children;
use super::number::Number;
use super::value::JsonType;
use super::value::Node;
use super::value::Value;

/// A read-only view of one node and its position in the tree.
///
/// `NodeRef` borrows the document, so any number of views can be held at
/// once (and shared across threads) while no mutation can happen.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl Document {
    /// Returns a read-only view of a live node.
    pub fn node(&self, id: NodeId) -> Result<NodeRef<'_>> {
        self.check(id)?;
        Ok(NodeRef { doc: self, id })
    }

    /// Structural equality of two subtrees, see [`NodeRef::equal`].
    pub fn equal(&self, a: NodeId, b: NodeId) -> Result<bool> {
        Ok(self.node(a)?.equal(&self.node(b)?))
    }
}

impl<'a> NodeRef<'a> {
    #[inline]
    fn at_id(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef { doc: self.doc, id }
    }

    #[inline]
    fn step(&self, id: Option<NodeId>) -> Option<NodeRef<'a>> {
        id.map(|id| self.at_id(id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn data(&self) -> &'a Node {
        self.doc.data(self.id)
    }

    pub fn json_type(&self) -> JsonType {
        self.data().json_type()
    }

    pub fn type_name(&self) -> &'static str {
        self.json_type().name()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.data().name()
    }

    pub fn value(&self) -> &'a Value {
        self.data().value()
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value().as_str()
    }

    pub fn as_number(&self) -> Option<&'a Number> {
        self.value().as_number()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_number().and_then(Number::as_u64)
    }

    /// Any number as a float, integers included.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value().as_bool()
    }

    pub fn is_object(&self) -> bool {
        self.json_type() == JsonType::Object
    }

    pub fn is_array(&self) -> bool {
        self.json_type() == JsonType::Array
    }

    pub fn is_iterable(&self) -> bool {
        self.json_type().is_iterable()
    }

    pub fn is_scalar(&self) -> bool {
        self.json_type().is_scalar()
    }

    pub fn is_string(&self) -> bool {
        self.json_type() == JsonType::String
    }

    pub fn is_integer(&self) -> bool {
        self.json_type() == JsonType::Integer
    }

    /// An integer that fits an unsigned 64-bit magnitude.
    pub fn is_real(&self) -> bool {
        self.as_u64().is_some()
    }

    pub fn is_double(&self) -> bool {
        self.json_type() == JsonType::Double
    }

    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_double()
    }

    pub fn is_boolean(&self) -> bool {
        self.json_type() == JsonType::Boolean
    }

    pub fn is_true(&self) -> bool {
        self.as_bool() == Some(true)
    }

    pub fn is_false(&self) -> bool {
        self.as_bool() == Some(false)
    }

    pub fn is_null(&self) -> bool {
        self.json_type() == JsonType::Null
    }

    pub fn root(&self) -> NodeRef<'a> {
        let mut node = self.id;
        while let Some(parent) = self.doc.link(node).parent {
            node = parent;
        }
        self.at_id(node)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.step(self.doc.link(self.id).parent)
    }

    pub fn child(&self) -> Option<NodeRef<'a>> {
        self.step(self.doc.link(self.id).child)
    }

    /// First child, same as [`child`](NodeRef::child).
    pub fn head(&self) -> Option<NodeRef<'a>> {
        self.child()
    }

    /// Last child.
    pub fn tail(&self) -> Option<NodeRef<'a>> {
        self.step(self.doc.last_child(self.id))
    }

    pub fn prev(&self) -> Option<NodeRef<'a>> {
        self.step(self.doc.link(self.id).prev)
    }

    pub fn next(&self) -> Option<NodeRef<'a>> {
        self.step(self.doc.link(self.id).next)
    }

    pub fn children(&self) -> Children<'a> {
        Children::new(self.doc, self.doc.link(self.id).child)
    }

    pub fn at(&self, index: usize) -> Option<NodeRef<'a>> {
        self.step(self.doc.nth_child(self.id, index))
    }

    /// First child named `name`.
    pub fn find(&self, name: &str) -> Option<NodeRef<'a>> {
        self.children().find(|child| child.name() == Some(name))
    }

    /// Next sibling after this node named `name`.
    pub fn find_next(&self, name: &str) -> Option<NodeRef<'a>> {
        Children::new(self.doc, self.doc.link(self.id).next).find(|n| n.name() == Some(name))
    }

    /// Number of children.
    pub fn size(&self) -> usize {
        self.children().count()
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.id;
        while let Some(parent) = self.doc.link(node).parent {
            node = parent;
            depth += 1;
        }
        depth
    }

    /// Position among siblings.
    pub fn offset(&self) -> usize {
        let mut offset = 0;
        let mut node = self.id;
        while let Some(prev) = self.doc.link(node).prev {
            node = prev;
            offset += 1;
        }
        offset
    }

    /// Compares the values of two subtrees.
    ///
    /// Names of the two starting nodes are ignored. Arrays compare element by
    /// element, objects compare as sets of named members. Numbers of the same
    /// type compare numerically.
    pub fn equal(&self, other: &NodeRef<'_>) -> bool {
        let mut pending = vec![(*self, *other)];
        while let Some((a, b)) = pending.pop() {
            if a.json_type() != b.json_type() {
                return false;
            }
            match (a.value(), b.value()) {
                (Value::Array, Value::Array) => {
                    let mut left = a.children();
                    let mut right = b.children();
                    loop {
                        match (left.next(), right.next()) {
                            (Some(l), Some(r)) => pending.push((l, r)),
                            (None, None) => break,
                            _ => return false,
                        }
                    }
                }
                (Value::Object, Value::Object) => {
                    if a.size() != b.size() {
                        return false;
                    }
                    // the k-th member named `n` in `a` pairs with the k-th
                    // member named `n` in `b`
                    let mut seen: HashMap<&str, usize> = HashMap::new();
                    for member in a.children() {
                        let Some(name) = member.name() else {
                            return false;
                        };
                        let nth = seen.entry(name).or_default();
                        let peer = b.children().filter(|c| c.name() == Some(name)).nth(*nth);
                        *nth += 1;
                        match peer {
                            Some(peer) => pending.push((member, peer)),
                            None => return false,
                        }
                    }
                }
                (l, r) => {
                    if l != r {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Walks the subtree in pre-order, calling `f` with each node and its
    /// depth below this node.
    ///
    /// Returning `ControlFlow::Break` stops the walk and hands the value back.
    pub fn traverse<B, F>(&self, mut f: F) -> ControlFlow<B>
    where F: FnMut(NodeRef<'a>, usize) -> ControlFlow<B> {
        let start = self.id;
        let mut node = start;
        let mut depth = 0;
        loop {
            if let ControlFlow::Break(b) = f(self.at_id(node), depth) {
                return ControlFlow::Break(b);
            }
            if let Some(child) = self.doc.link(node).child {
                node = child;
                depth += 1;
                continue;
            }
            loop {
                if node == start {
                    return ControlFlow::Continue(());
                }
                let links = self.doc.link(node);
                if let Some(next) = links.next {
                    node = next;
                    break;
                }
                match links.parent {
                    Some(parent) => {
                        node = parent;
                        depth -= 1;
                    }
                    None => return ControlFlow::Continue(()),
                }
            }
        }
    }
}

impl Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("value", self.value())
            .finish()
    }
}
