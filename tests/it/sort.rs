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

use jsontree::{Document, Node};

fn by_name(a: &Node, b: &Node) -> Ordering {
    a.name().cmp(&b.name())
}

fn by_number(a: &Node, b: &Node) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[test]
fn test_sort_members_by_name() {
    let mut doc = Document::new();
    let root = doc.parse(r#"{"c":1,"a":{"z":0,"y":1},"b":[3,1,2]}"#).unwrap();
    doc.sort_by(root, by_name).unwrap();
    // only the direct children move
    assert_eq!(
        doc.encode(root).unwrap(),
        r#"{"a":{"z":0,"y":1},"b":[3,1,2],"c":1}"#
    );
}

#[test]
fn test_sort_mixed_numbers() {
    let mut doc = Document::new();
    let root = doc.parse(r#"[3, 1.5, "x", -2, 1e1, 0, null]"#).unwrap();
    doc.sort_by(root, by_number).unwrap();
    assert_eq!(doc.encode(root).unwrap(), r#"[-2,0,1.5,3,1e1,"x",null]"#);

    let first = doc.node(root).unwrap().head().unwrap();
    assert!(first.prev().is_none());
    let last = doc.node(root).unwrap().tail().unwrap();
    assert!(last.is_null() && last.next().is_none());
}

#[test]
fn test_sorted_input_keeps_identities() {
    let mut doc = Document::new();
    let root = doc.parse("[1,2,3,4,5,6,7,8,9]").unwrap();
    let before: Vec<_> = doc.node(root).unwrap().children().map(|c| c.id()).collect();
    doc.sort_by(root, by_number).unwrap();
    let after: Vec<_> = doc.node(root).unwrap().children().map(|c| c.id()).collect();
    assert_eq!(before, after);

    doc.sort_by(root, |a, b| by_number(b, a)).unwrap();
    assert_eq!(doc.encode(root).unwrap(), "[9,8,7,6,5,4,3,2,1]");
    doc.reverse(root).unwrap();
    let again: Vec<_> = doc.node(root).unwrap().children().map(|c| c.id()).collect();
    assert_eq!(again, before);
}
