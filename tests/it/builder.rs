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

use jsontree::{Document, Error, JsonType, NodeId, NodeRef};
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

/// Walks every live tree reachable from `pool` and checks the link and
/// naming invariants.
fn check_invariants(doc: &Document, pool: &[NodeId]) {
    let mut seen = 0;
    let mut roots: Vec<NodeId> = pool
        .iter()
        .copied()
        .filter(|id| doc.contains(*id))
        .map(|id| doc.node(id).unwrap().root().id())
        .collect();
    roots.sort();
    roots.dedup();

    for root in roots {
        let root = doc.node(root).unwrap();
        assert!(root.parent().is_none());
        assert!(root.prev().is_none() && root.next().is_none());
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            seen += 1;
            assert!(seen <= doc.len(), "cycle in tree");
            check_children(node);
            pending.extend(node.children());
        }
    }
    // nodes that are neither in the pool nor under a pooled root were freed
    assert!(seen <= doc.len());
}

fn check_children(node: NodeRef<'_>) {
    if node.is_scalar() {
        assert!(node.child().is_none(), "scalar {:?} has children", node);
        return;
    }
    let mut prev: Option<NodeId> = None;
    for child in node.children() {
        assert_eq!(child.parent().map(|p| p.id()), Some(node.id()));
        assert_eq!(child.prev().map(|p| p.id()), prev);
        match node.json_type() {
            JsonType::Object => assert!(child.name().is_some()),
            JsonType::Array => assert!(child.name().is_none()),
            _ => unreachable!(),
        }
        prev = Some(child.id());
    }
    assert_eq!(node.tail().map(|t| t.id()), prev);
}

fn random_node(doc: &mut Document, rng: &mut SmallRng) -> NodeId {
    let name = if rng.random_bool(0.5) {
        Some(format!("n{}", rng.random_range(0..8)))
    } else {
        None
    };
    let name = name.as_deref();
    match rng.random_range(0..6) {
        0 => doc.new_object(name).unwrap(),
        1 => doc.new_array(name).unwrap(),
        2 => doc.new_integer(name, rng.random_range(-100..100)).unwrap(),
        3 => doc.new_double(name, rng.random_range(-1.0..1.0), 3).unwrap(),
        4 => doc.new_string(name, "s").unwrap(),
        _ => doc.new_boolean(name, rng.random_bool(0.5)).unwrap(),
    }
}

#[test]
fn test_random_mutations_keep_invariants() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut doc = Document::new();
    let mut pool: Vec<NodeId> = Vec::new();

    for _ in 0..5000 {
        pool.retain(|id| doc.contains(*id));
        if pool.len() < 4 {
            pool.push(random_node(&mut doc, &mut rng));
            continue;
        }
        let a = pool[rng.random_range(0..pool.len())];
        let b = pool[rng.random_range(0..pool.len())];
        let before = doc.len();
        let res = match rng.random_range(0..11) {
            0 => doc.push_front(a, b).map(|_| ()),
            1 => doc.push_back(a, b).map(|_| ()),
            2 => doc.push_before(a, b).map(|_| ()),
            3 => doc.push_after(a, b).map(|_| ()),
            4 => doc.push_at(a, b, rng.random_range(0..5)).map(|_| ()),
            5 => doc.pop(a).map(|_| ()),
            6 => doc.pop_front(a).map(|_| ()),
            7 => doc.pop_back(a).map(|_| ()),
            8 => doc.pop_at(a, rng.random_range(0..5)).map(|_| ()),
            9 if rng.random_bool(0.2) => doc.delete(a).map(|_| ()),
            _ => {
                pool.push(random_node(&mut doc, &mut rng));
                Ok(())
            }
        };
        if res.is_err() {
            assert_eq!(doc.len(), before, "failed operation changed the document");
        }
        check_invariants(&doc, &pool);
    }
}

#[test]
fn test_rejected_push_leaves_both_sides_unchanged() {
    let mut doc = Document::new();
    let root = doc.parse(r#"{"a":[1,2],"b":{"c":true}}"#).unwrap();
    let before = doc.encode(root).unwrap();
    let a = doc.node(root).unwrap().find("a").unwrap().id();
    let b = doc.node(root).unwrap().find("b").unwrap().id();

    let named = doc.new_null(Some("x")).unwrap();
    assert!(matches!(doc.push_back(a, named), Err(Error::NameNotAllowed(_))));
    let unnamed = doc.new_null(None).unwrap();
    assert!(matches!(doc.push_front(b, unnamed), Err(Error::NameRequired(_))));
    assert!(matches!(doc.push_back(a, b), Err(Error::AlreadyAttached(_))));

    let popped = doc.pop(b).unwrap();
    assert!(matches!(doc.push_back(popped, popped), Err(Error::CycleDetected(_))));
    doc.push_back(root, popped).unwrap();

    assert_eq!(doc.encode(root).unwrap(), before);
    assert!(doc.node(named).unwrap().parent().is_none());
    assert!(doc.node(unnamed).unwrap().parent().is_none());
}

#[test]
fn test_push_pop_symmetry() {
    let mut doc = Document::new();
    let parent = doc.parse(r#"[1,"two",{"three":3}]"#).unwrap();
    let children: Vec<_> = doc.node(parent).unwrap().children().map(|c| c.id()).collect();

    let child = doc.parse(r#"{"x":[true,null]}"#).unwrap();
    let copy = doc.parse(r#"{"x":[true,null]}"#).unwrap();

    let pushed = doc.push_back(parent, child).unwrap();
    assert_eq!(pushed, child);
    assert_eq!(doc.node(parent).unwrap().size(), 4);
    let popped = doc.pop(pushed).unwrap();

    assert!(doc.equal(popped, copy).unwrap());
    let after: Vec<_> = doc.node(parent).unwrap().children().map(|c| c.id()).collect();
    assert_eq!(after, children);
    assert!(doc.node(popped).unwrap().parent().is_none());
}

#[test]
fn test_move_between_trees() {
    let mut doc = Document::new();
    let left = doc.parse(r#"{"keep":1,"move":[1,2]}"#).unwrap();
    let right = doc.parse(r#"{"other":null}"#).unwrap();
    let moving = doc.node(left).unwrap().find("move").unwrap().id();

    doc.pop(moving).unwrap();
    doc.push_front(right, moving).unwrap();
    doc.set_name(moving, Some("moved")).unwrap();

    assert_eq!(doc.encode(left).unwrap(), r#"{"keep":1}"#);
    assert_eq!(doc.encode(right).unwrap(), r#"{"moved":[1,2],"other":null}"#);
    assert_eq!(doc.node(moving).unwrap().root().id(), right);
}

#[test]
fn test_stale_handles_are_rejected() {
    let mut doc = Document::new();
    let root = doc.parse("[[1],[2]]").unwrap();
    let first = doc.node(root).unwrap().child().unwrap().id();
    let inner = doc.node(first).unwrap().child().unwrap().id();
    doc.free(first).unwrap();

    assert!(!doc.contains(inner));
    assert!(matches!(doc.node(inner), Err(Error::StaleNode(_))));
    assert!(matches!(doc.set_integer(inner, 3), Err(Error::StaleNode(_))));
    assert!(matches!(doc.push_back(root, inner), Err(Error::StaleNode(_))));

    // a new node may take the freed slot but not the old handle
    let fresh = doc.new_integer(None, 9).unwrap();
    assert_ne!(fresh, inner);
    assert!(matches!(doc.node(first), Err(Error::StaleNode(_))));
    assert_eq!(doc.encode(root).unwrap(), "[[2]]");
}
