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

use std::collections::BTreeMap;

use jsontree::{Document, Duplicate, NameMap, NodeId};
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

#[test]
fn test_map_duplicate_policy() {
    let mut doc = Document::new();
    let first = doc.new_integer(Some("k"), 1).unwrap();
    let second = doc.new_integer(Some("k"), 2).unwrap();

    let mut map = NameMap::new();
    assert_eq!(map.insert("k", first).ok(), Some(&first));
    let Duplicate { existing, rejected } = map.insert("k", second).unwrap_err();
    assert_eq!(*existing, first);
    assert_eq!(rejected, second);
    assert_eq!(map.len(), 1);

    // the caller owns the rejected node
    doc.free(rejected).unwrap();
    assert_eq!(map.get("k"), Some(&first));
}

#[test]
fn test_map_search_after_random_operations() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = SmallRng::seed_from_u64(42);
    let mut map: NameMap<u32> = NameMap::with_capacity(0).unwrap();
    let mut model = BTreeMap::new();
    let mut max_tables = 1;

    for step in 0..20_000u32 {
        let name = format!("key{}", rng.random_range(0..3000));
        if rng.random_range(0..4) == 0 {
            assert_eq!(map.remove(&name), model.remove(&name));
        } else if model.contains_key(&name) {
            assert!(map.insert(&name, step).is_err());
        } else {
            assert_eq!(map.insert(&name, step).ok(), Some(&step));
            model.insert(name, step);
        }
        max_tables = max_tables.max(map.tables());
        assert_eq!(map.len(), model.len());

        if step % 1000 == 0 {
            for i in 0..3000 {
                let name = format!("key{}", i);
                assert_eq!(map.get(&name), model.get(&name), "{}", name);
            }
        }
    }
    // growth chained at least one table while rehashing lazily
    assert!(max_tables > 1);
    for (name, value) in &model {
        assert_eq!(map.get(name), Some(value));
    }
}

#[test]
fn test_map_destroy_frees_nodes() {
    let mut doc = Document::new();
    let root = doc.parse(r#"{"a":[1,2],"b":{"c":3},"d":4}"#).unwrap();
    let mut map = doc.index(root).unwrap();
    assert_eq!(map.len(), 3);
    assert!(map.contains_key("b"));
    assert!(!map.contains_key("c"));

    let d = map.remove("d").unwrap();
    assert_eq!(doc.node(d).unwrap().as_i64(), Some(4));

    let mut released: Vec<NodeId> = Vec::new();
    map.destroy(|id| released.push(id));
    for id in released {
        doc.free(id).unwrap();
    }
    assert_eq!(doc.encode(root).unwrap(), r#"{"d":4}"#);
}
