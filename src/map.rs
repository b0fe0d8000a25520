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

//! A string keyed hash map that grows without a stop-the-world resize.
//!
//! When the newest table passes 75% occupancy a larger empty table is chained
//! in front of it. Older tables are never rehashed in bulk: every insert
//! first moves the bucket its key hashes to out of each older table into the
//! newest one, and an older table is dropped from the chain once it is
//! empty.

use std::fmt::Debug;
use std::fmt::Formatter;

use super::constants::MAP_HASH_SEED;
use super::constants::MAP_PRIMES;
use super::document::Document;
use super::document::NodeId;
use super::error::Error;
use super::error::Result;

#[inline]
fn hash_name(name: &str) -> u64 {
    name.bytes().fold(MAP_HASH_SEED, |hash, c| {
        hash.wrapping_mul(33).wrapping_add(c as u64)
    })
}

/// The first prime of the table above `room`, or `room` past the table.
fn next_room(room: usize) -> usize {
    MAP_PRIMES
        .iter()
        .map(|p| *p as usize)
        .find(|p| *p > room)
        .unwrap_or(room)
}

struct Entry<V> {
    hash: u64,
    name: Box<str>,
    value: V,
}

impl<V> Entry<V> {
    #[inline]
    fn matches(&self, hash: u64, name: &str) -> bool {
        self.hash == hash && &*self.name == name
    }
}

struct Table<V> {
    buckets: Vec<Vec<Entry<V>>>,
    size: usize,
}

impl<V> Table<V> {
    fn with_room(room: usize) -> Result<Table<V>> {
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(room)?;
        buckets.resize_with(room, Vec::new);
        Ok(Table { buckets, size: 0 })
    }

    #[inline]
    fn room(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn bucket(&self, hash: u64) -> usize {
        (hash % self.room() as u64) as usize
    }

    /// Whether one more entry takes the table past 75% occupancy.
    #[inline]
    fn is_full(&self) -> bool {
        self.size + 1 > self.room() - self.room() / 4
    }

    fn position(&self, hash: u64, name: &str) -> Option<(usize, usize)> {
        let bucket = self.bucket(hash);
        self.buckets[bucket]
            .iter()
            .position(|entry| entry.matches(hash, name))
            .map(|pos| (bucket, pos))
    }

    fn push(&mut self, entry: Entry<V>) -> (usize, usize) {
        let bucket = self.bucket(entry.hash);
        let chain = &mut self.buckets[bucket];
        chain.push(entry);
        self.size += 1;
        (bucket, chain.len() - 1)
    }
}

/// Returned by [`NameMap::insert`] when the name is already present.
///
/// The map keeps the value inserted first; the rejected one is handed back
/// so that the caller can dispose of it.
pub struct Duplicate<'a, V> {
    pub existing: &'a V,
    pub rejected: V,
}

impl<V: Debug> Debug for Duplicate<'_, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Duplicate")
            .field("existing", self.existing)
            .field("rejected", &self.rejected)
            .finish()
    }
}

/// Maps member names to values, [`NodeId`]s by default.
///
/// The map never owns what the values refer to. Use
/// [`destroy`](NameMap::destroy) to release them together with the map.
pub struct NameMap<V = NodeId> {
    // oldest first, the last table is the head
    tables: Vec<Table<V>>,
}

impl<V> NameMap<V> {
    pub fn new() -> NameMap<V> {
        let mut buckets = Vec::new();
        buckets.resize_with(next_room(0), Vec::new);
        NameMap {
            tables: vec![Table { buckets, size: 0 }],
        }
    }

    /// Creates a map sized for about `hint` names, rounded up to a prime.
    pub fn with_capacity(hint: usize) -> Result<NameMap<V>> {
        let mut tables = Vec::new();
        tables.try_reserve_exact(1)?;
        tables.push(Table::with_room(next_room(hint))?);
        Ok(NameMap { tables })
    }

    /// Number of chained tables, one unless a migration is in progress.
    pub fn tables(&self) -> usize {
        self.tables.len()
    }

    pub fn len(&self) -> usize {
        self.tables.iter().map(|table| table.size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn head(&self) -> usize {
        self.tables.len() - 1
    }

    /// Moves the bucket `hash` falls into out of every older table.
    fn migrate(&mut self, hash: u64) {
        let Some((head, older)) = self.tables.split_last_mut() else {
            return;
        };
        for table in older.iter_mut() {
            let bucket = table.bucket(hash);
            let chain = std::mem::take(&mut table.buckets[bucket]);
            table.size -= chain.len();
            for entry in chain {
                head.push(entry);
            }
        }

        let head = self.head();
        if self.tables[..head].iter().any(|table| table.size == 0) {
            let mut index = 0;
            self.tables.retain(|table| {
                let keep = index == head || table.size > 0;
                index += 1;
                keep
            });
            log::debug!("name map retired drained tables, {} left", self.tables.len());
        }
    }

    fn grow(&mut self) -> Result<()> {
        let room = next_room(self.tables[self.head()].room());
        self.tables.try_reserve(1)?;
        self.tables.push(Table::with_room(room)?);
        log::debug!(
            "name map chained a table of {} buckets, {} tables",
            room,
            self.tables.len()
        );
        Ok(())
    }

    /// Inserts `value` under `name` unless the name is already present.
    pub fn insert(&mut self, name: &str, value: V) -> std::result::Result<&V, Duplicate<'_, V>> {
        let hash = hash_name(name);
        self.migrate(hash);

        let head = self.head();
        if let Some((bucket, pos)) = self.tables[head].position(hash, name) {
            return Err(Duplicate {
                existing: &self.tables[head].buckets[bucket][pos].value,
                rejected: value,
            });
        }

        if self.tables[head].is_full() {
            if let Err(err) = self.grow() {
                // keep filling the current head, chains get longer
                log::debug!("name map could not grow: {}", err);
            }
        }

        let head = self.head();
        let (bucket, pos) = self.tables[head].push(Entry {
            hash,
            name: name.into(),
            value,
        });
        Ok(&self.tables[head].buckets[bucket][pos].value)
    }

    /// Removes `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        let hash = hash_name(name);
        let head = self.head();
        for index in (0..self.tables.len()).rev() {
            let table = &mut self.tables[index];
            if let Some((bucket, pos)) = table.position(hash, name) {
                let entry = table.buckets[bucket].swap_remove(pos);
                table.size -= 1;
                if table.size == 0 && index < head {
                    self.tables.remove(index);
                    log::debug!("name map retired an emptied table, {} left", self.tables.len());
                }
                return Some(entry.value);
            }
        }
        None
    }

    /// Looks `name` up without moving anything between tables.
    pub fn get(&self, name: &str) -> Option<&V> {
        let hash = hash_name(name);
        self.tables.iter().rev().find_map(|table| {
            table
                .position(hash, name)
                .map(|(bucket, pos)| &table.buckets[bucket][pos].value)
        })
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Visits every entry, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.tables
            .iter()
            .flat_map(|table| table.buckets.iter())
            .flatten()
            .map(|entry| (&*entry.name, &entry.value))
    }

    /// Drops the map, passing every stored value to `release`.
    pub fn destroy<F: FnMut(V)>(self, mut release: F) {
        for table in self.tables {
            for chain in table.buckets {
                for entry in chain {
                    release(entry.value);
                }
            }
        }
    }
}

impl<V> Default for NameMap<V> {
    fn default() -> Self {
        NameMap::new()
    }
}

impl<V: Debug> Debug for NameMap<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Document {
    /// Indexes the members of an object by name.
    ///
    /// When a name repeats, the first member wins, as with
    /// [`NodeRef::find`](crate::NodeRef::find).
    pub fn index(&self, object: NodeId) -> Result<NameMap<NodeId>> {
        let node = self.node(object)?;
        if !node.is_object() {
            return Err(Error::NotContainer(object));
        }
        let mut map = NameMap::with_capacity(node.size())?;
        for child in node.children() {
            let Some(name) = child.name() else {
                continue;
            };
            if map.insert(name, child.id()).is_err() {
                log::trace!("member {:?} shadowed by an earlier one", name);
            }
        }
        Ok(map)
    }
}
