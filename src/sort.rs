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

use super::document::Document;
use super::document::Links;
use super::document::NodeId;
use super::document::Slot;
use super::error::Result;
use super::value::Node;

impl Document {
    /// Sorts the children of `root` in place with a stable merge sort.
    ///
    /// Only links change: every child keeps its handle. Scalars and empty
    /// containers are left as they are.
    pub fn sort_by<F>(&mut self, root: NodeId, compare: F) -> Result<()>
    where
        F: FnMut(&Node, &Node) -> Ordering,
    {
        self.check(root)?;
        let Some(head) = self.link(root).child else {
            return Ok(());
        };

        let Document { slots, links, .. } = self;
        let mut sorter = Sorter {
            slots,
            links,
            compare,
        };
        let head = sorter.sort(head);

        links[root.index()].child = Some(head);
        let mut prev = None;
        let mut node = Some(head);
        while let Some(id) = node {
            links[id.index()].prev = prev;
            prev = Some(id);
            node = links[id.index()].next;
        }
        Ok(())
    }

    /// Reverses the order of the children of `root`.
    pub fn reverse(&mut self, root: NodeId) -> Result<()> {
        self.check(root)?;
        let mut node = self.link(root).child;
        let mut last = None;
        while let Some(id) = node {
            let links = self.link_mut(id);
            std::mem::swap(&mut links.prev, &mut links.next);
            last = Some(id);
            node = links.prev;
        }
        if last.is_some() {
            self.link_mut(root).child = last;
        }
        Ok(())
    }
}

/// Merge sort over the `next` links only. `prev` is rebuilt afterwards.
struct Sorter<'a, F> {
    slots: &'a [Slot],
    links: &'a mut [Links],
    compare: F,
}

impl<F> Sorter<'_, F>
where
    F: FnMut(&Node, &Node) -> Ordering,
{
    #[inline]
    fn next(&self, id: NodeId) -> Option<NodeId> {
        self.links[id.index()].next
    }

    #[inline]
    fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        self.links[id.index()].next = next;
    }

    #[inline]
    fn greater(&mut self, a: NodeId, b: NodeId) -> bool {
        (self.compare)(&self.slots[a.index()].node, &self.slots[b.index()].node)
            == Ordering::Greater
    }

    /// Cuts the list after its middle node and returns the second half.
    fn split(&mut self, head: NodeId) -> Option<NodeId> {
        let mut slow = head;
        let mut fast = self.next(head);
        while let Some(f) = fast {
            let Some(f2) = self.next(f) else {
                break;
            };
            slow = match self.next(slow) {
                Some(s) => s,
                None => break,
            };
            fast = self.next(f2);
        }
        let second = self.next(slow);
        self.set_next(slow, None);
        second
    }

    fn sort(&mut self, head: NodeId) -> NodeId {
        let Some(second) = self.split(head) else {
            return head;
        };
        let left = self.sort(head);
        let right = self.sort(second);
        self.merge(left, right)
    }

    /// Merges two sorted lists, taking from the right only when its node
    /// compares strictly less, so equal nodes keep their order.
    fn merge(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let (head, mut left, mut right) = if self.greater(left, right) {
            (right, Some(left), self.next(right))
        } else {
            (left, self.next(left), Some(right))
        };
        let mut tail = head;
        loop {
            match (left, right) {
                (Some(l), Some(r)) => {
                    if self.greater(l, r) {
                        self.set_next(tail, Some(r));
                        tail = r;
                        right = self.next(r);
                    } else {
                        self.set_next(tail, Some(l));
                        tail = l;
                        left = self.next(l);
                    }
                }
                (rest, None) | (None, rest) => {
                    self.set_next(tail, rest);
                    return head;
                }
            }
        }
    }
}
