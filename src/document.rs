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

use super::error::Error;
use super::error::Result;
use super::value::Node;

/// A handle to a node stored in a [`Document`].
///
/// Handles are plain copyable values. Freeing a node bumps the generation of
/// its slot, so a handle kept past `free` or `delete` is detected as stale
/// instead of silently reaching whatever node reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.index as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Tree links of one node.
///
/// `child` and `next` are the owning direction, `parent` and `prev` only
/// navigate back. The first child is the only sibling with `prev == None`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Links {
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Slot {
    generation: u32,
    live: bool,
    pub(crate) node: Node,
}

/// An arena holding any number of JSON trees and detached nodes.
///
/// Every node lives in one slot of the arena and is addressed by a
/// [`NodeId`]. Nodes are created detached, become part of a tree when pushed
/// into a container, and can be moved between trees of the same document in
/// constant time. Dropping the document releases every node it holds.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub(crate) slots: Vec<Slot>,
    pub(crate) links: Vec<Links>,
    free: Vec<u32>,
    len: usize,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a live node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.live && slot.generation == id.generation)
    }

    /// Returns the data of a node.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.check(id)?;
        Ok(&self.slots[id.index()].node)
    }

    #[inline]
    pub(crate) fn check(&self, id: NodeId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::StaleNode(id))
        }
    }

    #[inline]
    pub(crate) fn data(&self, id: NodeId) -> &Node {
        &self.slots[id.index()].node
    }

    #[inline]
    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.slots[id.index()].node
    }

    #[inline]
    pub(crate) fn link(&self, id: NodeId) -> &Links {
        &self.links[id.index()]
    }

    #[inline]
    pub(crate) fn link_mut(&mut self, id: NodeId) -> &mut Links {
        &mut self.links[id.index()]
    }

    /// Stores a new detached node.
    pub(crate) fn alloc(&mut self, node: Node) -> Result<NodeId> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.live = true;
            slot.node = node;
            self.links[index as usize] = Links::default();
            self.len += 1;
            log::trace!("reusing node slot {}", index);
            return Ok(NodeId {
                index,
                generation: slot.generation,
            });
        }

        let index = u32::try_from(self.slots.len()).map_err(|_| Error::OutOfMemory)?;
        self.slots.try_reserve(1)?;
        self.links.try_reserve(1)?;
        self.slots.push(Slot {
            generation: 0,
            live: true,
            node,
        });
        self.links.push(Links::default());
        self.len += 1;
        Ok(NodeId {
            index,
            generation: 0,
        })
    }

    fn dispose(&mut self, id: NodeId) {
        let slot = &mut self.slots[id.index()];
        slot.generation = slot.generation.wrapping_add(1);
        slot.live = false;
        slot.node = Node::default();
        self.links[id.index()] = Links::default();
        self.free.push(id.index);
        self.len -= 1;
    }

    /// Releases a detached subtree, every node exactly once.
    ///
    /// Walks down through first children and across through siblings so that
    /// deep trees do not grow the call stack.
    pub(crate) fn release(&mut self, root: NodeId) {
        let mut node = root;
        loop {
            if let Some(child) = self.link_mut(node).child.take() {
                node = child;
                continue;
            }
            let links = *self.link(node);
            self.dispose(node);
            if node == root {
                break;
            }
            match links.next.or(links.parent) {
                Some(next) => node = next,
                None => break,
            }
        }
    }

    /// Links a detached `child` as the first child of `parent`.
    pub(crate) fn link_front(&mut self, parent: NodeId, child: NodeId) {
        let head = self.link(parent).child;
        if let Some(head) = head {
            self.link_mut(head).prev = Some(child);
        }
        let links = self.link_mut(child);
        links.parent = Some(parent);
        links.prev = None;
        links.next = head;
        self.link_mut(parent).child = Some(child);
    }

    /// Links a detached `child` right after the attached node `place`.
    pub(crate) fn link_after(&mut self, place: NodeId, child: NodeId) {
        let parent = self.link(place).parent;
        let next = self.link(place).next;
        if let Some(next) = next {
            self.link_mut(next).prev = Some(child);
        }
        let links = self.link_mut(child);
        links.parent = parent;
        links.prev = Some(place);
        links.next = next;
        self.link_mut(place).next = Some(child);
    }

    /// Links a detached `child` right before the attached node `place`.
    pub(crate) fn link_before(&mut self, place: NodeId, child: NodeId) {
        let links = *self.link(place);
        match links.prev {
            Some(prev) => self.link_after(prev, child),
            None => {
                if let Some(parent) = links.parent {
                    self.link_front(parent, child);
                }
            }
        }
    }

    /// Unlinks an attached node, leaving it as a detached root.
    pub(crate) fn unlink(&mut self, child: NodeId) {
        let links = *self.link(child);
        match links.prev {
            Some(prev) => self.link_mut(prev).next = links.next,
            None => {
                if let Some(parent) = links.parent {
                    self.link_mut(parent).child = links.next;
                }
            }
        }
        if let Some(next) = links.next {
            self.link_mut(next).prev = links.prev;
        }
        let links = self.link_mut(child);
        links.parent = None;
        links.prev = None;
        links.next = None;
    }

    /// Last child of `parent`, walking the sibling list.
    pub(crate) fn last_child(&self, parent: NodeId) -> Option<NodeId> {
        let mut node = self.link(parent).child?;
        while let Some(next) = self.link(node).next {
            node = next;
        }
        Some(node)
    }

    /// Child of `parent` at `index`, walking the sibling list.
    pub(crate) fn nth_child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        let mut node = self.link(parent).child;
        for _ in 0..index {
            node = self.link(node?).next;
        }
        node
    }
}
