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

//! Construction and mutation of document trees.
//!
//! Every operation either succeeds completely or returns an error and leaves
//! all nodes as they were. A child that is rejected by a push stays detached
//! and remains owned by the caller.

use std::fmt::Arguments;

use super::document::Document;
use super::document::NodeId;
use super::error::Error;
use super::error::Result;
use super::number::Number;
use super::value::copy_name;
use super::value::copy_text;
use super::value::Node;
use super::value::Value;

impl Document {
    fn new_node(&mut self, name: Option<&str>, value: Value) -> Result<NodeId> {
        let name = copy_name(name)?;
        self.alloc(Node::new(name, value))
    }

    pub fn new_object(&mut self, name: Option<&str>) -> Result<NodeId> {
        self.new_node(name, Value::Object)
    }

    pub fn new_array(&mut self, name: Option<&str>) -> Result<NodeId> {
        self.new_node(name, Value::Array)
    }

    pub fn new_string(&mut self, name: Option<&str>, value: &str) -> Result<NodeId> {
        let value = copy_text(value)?;
        self.new_node(name, Value::String(value))
    }

    /// Creates a string node from format arguments, as in
    /// `doc.new_format(None, format_args!("{}-{}", a, b))`.
    pub fn new_format(&mut self, name: Option<&str>, args: Arguments<'_>) -> Result<NodeId> {
        let value = std::fmt::format(args);
        self.new_string(name, &value)
    }

    pub fn new_integer(&mut self, name: Option<&str>, value: i64) -> Result<NodeId> {
        self.new_node(name, Value::Number(Number::from_i64(value)))
    }

    /// Creates an integer node from an unsigned 64-bit magnitude.
    pub fn new_real(&mut self, name: Option<&str>, value: u64) -> Result<NodeId> {
        self.new_node(name, Value::Number(Number::from_u64(value)))
    }

    /// Creates a number printed with `decimals` fractional digits.
    ///
    /// `decimals == 0` yields an integer node.
    pub fn new_double(&mut self, name: Option<&str>, value: f64, decimals: usize) -> Result<NodeId> {
        let number = Number::from_f64(value, decimals).ok_or(Error::NonFiniteNumber)?;
        self.new_node(name, Value::Number(number))
    }

    pub fn new_boolean(&mut self, name: Option<&str>, value: bool) -> Result<NodeId> {
        self.new_node(name, Value::Bool(value))
    }

    pub fn new_null(&mut self, name: Option<&str>) -> Result<NodeId> {
        self.new_node(name, Value::Null)
    }

    /// Replaces the name of a node.
    ///
    /// Members of an object must keep a name and elements of an array must
    /// stay unnamed; detached nodes accept anything.
    pub fn set_name(&mut self, id: NodeId, name: Option<&str>) -> Result<()> {
        self.check(id)?;
        if let Some(parent) = self.link(id).parent {
            match (&self.data(parent).value, name) {
                (Value::Object, None) => return Err(Error::NameRequired(id)),
                (Value::Array, Some(_)) => return Err(Error::NameNotAllowed(id)),
                _ => {}
            }
        }
        let name = copy_name(name)?;
        self.data_mut(id).name = name;
        Ok(())
    }

    fn set_value(&mut self, id: NodeId, value: Value) -> Result<()> {
        self.check(id)?;
        let node = self.data_mut(id);
        if !node.value.is_scalar() {
            return Err(Error::NotScalar(id));
        }
        node.value = value;
        Ok(())
    }

    pub fn set_string(&mut self, id: NodeId, value: &str) -> Result<()> {
        let value = copy_text(value)?;
        self.set_value(id, Value::String(value))
    }

    pub fn set_format(&mut self, id: NodeId, args: Arguments<'_>) -> Result<()> {
        let value = std::fmt::format(args);
        self.set_string(id, &value)
    }

    pub fn set_integer(&mut self, id: NodeId, value: i64) -> Result<()> {
        self.set_value(id, Value::Number(Number::from_i64(value)))
    }

    pub fn set_real(&mut self, id: NodeId, value: u64) -> Result<()> {
        self.set_value(id, Value::Number(Number::from_u64(value)))
    }

    pub fn set_double(&mut self, id: NodeId, value: f64, decimals: usize) -> Result<()> {
        let number = Number::from_f64(value, decimals).ok_or(Error::NonFiniteNumber)?;
        self.set_value(id, Value::Number(number))
    }

    pub fn set_boolean(&mut self, id: NodeId, value: bool) -> Result<()> {
        self.set_value(id, Value::Bool(value))
    }

    pub fn set_null(&mut self, id: NodeId) -> Result<()> {
        self.set_value(id, Value::Null)
    }

    fn check_pushable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check(parent)?;
        self.check(child)?;
        let is_object = match self.data(parent).value {
            Value::Object => true,
            Value::Array => false,
            _ => return Err(Error::NotContainer(parent)),
        };
        if self.link(child).parent.is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        match (is_object, self.data(child).name.is_some()) {
            (true, false) => return Err(Error::NameRequired(child)),
            (false, true) => return Err(Error::NameNotAllowed(child)),
            _ => {}
        }
        if child == parent {
            return Err(Error::CycleDetected(child));
        }
        // `child` is a root, it is an ancestor of `parent` only if it is
        // the root of the tree holding `parent`. A leaf is no one's ancestor.
        if self.link(child).child.is_none() {
            return Ok(());
        }
        let mut node = parent;
        while let Some(up) = self.link(node).parent {
            node = up;
        }
        if node == child {
            return Err(Error::CycleDetected(child));
        }
        Ok(())
    }

    fn parent_of(&self, id: NodeId) -> Result<NodeId> {
        self.check(id)?;
        self.link(id).parent.ok_or(Error::Detached(id))
    }

    /// Appends `child` after `tail`, the last child pushed so far.
    ///
    /// Keeping the returned handle and passing it back as `tail` builds a
    /// list in constant time per element. A `None` tail falls back to
    /// [`push_back`](Document::push_back).
    pub fn push_fast(
        &mut self,
        parent: NodeId,
        tail: Option<NodeId>,
        child: NodeId,
    ) -> Result<NodeId> {
        match tail {
            Some(tail) => self.push_after(tail, child),
            None => self.push_back(parent, child),
        }
    }

    pub fn push_front(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.check_pushable(parent, child)?;
        self.link_front(parent, child);
        Ok(child)
    }

    pub fn push_back(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.check_pushable(parent, child)?;
        match self.last_child(parent) {
            Some(last) => self.link_after(last, child),
            None => self.link_front(parent, child),
        }
        Ok(child)
    }

    pub fn push_before(&mut self, place: NodeId, child: NodeId) -> Result<NodeId> {
        let parent = self.parent_of(place)?;
        self.check_pushable(parent, child)?;
        self.link_before(place, child);
        Ok(child)
    }

    pub fn push_after(&mut self, place: NodeId, child: NodeId) -> Result<NodeId> {
        let parent = self.parent_of(place)?;
        self.check_pushable(parent, child)?;
        self.link_after(place, child);
        Ok(child)
    }

    /// Inserts `child` so that it ends up at `index`.
    ///
    /// An index past the last child appends.
    pub fn push_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<NodeId> {
        self.check_pushable(parent, child)?;
        match self.nth_child(parent, index) {
            Some(place) => self.link_before(place, child),
            None => match self.last_child(parent) {
                Some(last) => self.link_after(last, child),
                None => self.link_front(parent, child),
            },
        }
        Ok(child)
    }

    /// Detaches a node from its parent and hands it back, subtree intact.
    pub fn pop(&mut self, child: NodeId) -> Result<NodeId> {
        self.parent_of(child)?;
        self.unlink(child);
        Ok(child)
    }

    pub fn pop_front(&mut self, parent: NodeId) -> Result<Option<NodeId>> {
        self.check(parent)?;
        let child = self.link(parent).child;
        if let Some(child) = child {
            self.unlink(child);
        }
        Ok(child)
    }

    pub fn pop_back(&mut self, parent: NodeId) -> Result<Option<NodeId>> {
        self.check(parent)?;
        let child = self.last_child(parent);
        if let Some(child) = child {
            self.unlink(child);
        }
        Ok(child)
    }

    pub fn pop_at(&mut self, parent: NodeId, index: usize) -> Result<Option<NodeId>> {
        self.check(parent)?;
        let child = self.nth_child(parent, index);
        if let Some(child) = child {
            self.unlink(child);
        }
        Ok(child)
    }

    /// Detaches and frees a node with all its descendants.
    ///
    /// Returns the sibling that followed the deleted node, so a loop can
    /// keep deleting from where it stands:
    ///
    /// ```
    /// # let mut doc = jsontree::Document::new();
    /// # let root = doc.new_array(None).unwrap();
    /// # for i in 0..4 { let n = doc.new_integer(None, i).unwrap(); doc.push_back(root, n).unwrap(); }
    /// let mut node = doc.node(root).unwrap().child().map(|n| n.id());
    /// while let Some(id) = node {
    ///     node = doc.delete(id).unwrap();
    /// }
    /// assert_eq!(doc.len(), 1);
    /// ```
    pub fn delete(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        self.check(id)?;
        let next = self.link(id).next;
        if self.link(id).parent.is_some() {
            self.unlink(id);
        }
        self.release(id);
        Ok(next)
    }

    pub fn free(&mut self, id: NodeId) -> Result<()> {
        self.delete(id).map(|_| ())
    }
}
