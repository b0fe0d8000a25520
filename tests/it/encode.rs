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

use jsontree::{parse, Document, NodeId};
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use serde_json::json;

/// Builds a random tree through the builder API only.
fn build_random(doc: &mut Document, rng: &mut SmallRng) -> NodeId {
    let root = doc.new_object(None).unwrap();
    let mut containers = vec![root];
    for i in 0..200 {
        let parent = containers[rng.random_range(0..containers.len())];
        let in_object = doc.node(parent).unwrap().is_object();
        let name = format!("m{}", i);
        let name = in_object.then_some(name.as_str());
        let child = match rng.random_range(0..9) {
            0 => doc.new_object(name).unwrap(),
            1 => doc.new_array(name).unwrap(),
            2 => doc.new_string(name, "text \"quoted\" \\ é").unwrap(),
            3 => doc.new_integer(name, rng.random()).unwrap(),
            4 => doc.new_real(name, rng.random()).unwrap(),
            5 => doc.new_double(name, rng.random_range(-1e6..1e6), 4).unwrap(),
            6 => doc.new_boolean(name, rng.random_bool(0.5)).unwrap(),
            7 => doc.new_format(name, format_args!("#{}", i)).unwrap(),
            _ => doc.new_null(name).unwrap(),
        };
        if rng.random_bool(0.5) {
            doc.push_back(parent, child).unwrap();
        } else {
            doc.push_front(parent, child).unwrap();
        }
        if !doc.node(child).unwrap().is_scalar() {
            containers.push(child);
        }
    }
    root
}

#[test]
fn test_builder_round_trip() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..20 {
        let mut doc = Document::new();
        let built = build_random(&mut doc, &mut rng);
        let text = doc.encode(built).unwrap();
        let parsed = doc.parse(&text).unwrap();
        assert!(doc.equal(built, parsed).unwrap());
        assert_eq!(doc.encode(parsed).unwrap(), text);

        let pretty = doc.encode_pretty(built, 4).unwrap();
        let reparsed = doc.parse(&pretty).unwrap();
        assert!(doc.equal(built, reparsed).unwrap());

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc.node(built).unwrap().to_serde_json(), value);
    }
}

#[test]
fn test_encode_escapes() {
    let mut doc = Document::new();
    let root = doc.parse(r#"["\b\f\n\r\t", "\u0001", "é中", "\\\""]"#).unwrap();
    assert_eq!(
        doc.encode(root).unwrap(),
        r#"["\b\f\n\r\t","\u0001","é中","\\\""]"#
    );
}

#[test]
fn test_encode_named_root() {
    let mut doc = Document::new();
    let member = doc.new_integer(Some("n"), 5).unwrap();
    assert_eq!(doc.encode(member).unwrap(), "5");
    assert_eq!(doc.node(member).unwrap().to_string(), "5");
}

#[test]
fn test_serde_json_interop() {
    let value = json!({
        "id": 42,
        "tags": ["a", "b"],
        "ratio": 0.25,
        "nested": {"ok": true, "none": null}
    });
    let mut doc = Document::new();
    let root = doc.import(None, &value).unwrap();
    assert_eq!(
        doc.encode(root).unwrap(),
        r#"{"id":42,"tags":["a","b"],"ratio":0.25,"nested":{"ok":true,"none":null}}"#
    );
    assert_eq!(doc.node(root).unwrap().to_serde_json(), value);

    let (other, parsed) = parse(&value.to_string()).unwrap();
    assert_eq!(serde_json::Value::from(other.node(parsed).unwrap()), value);
}
