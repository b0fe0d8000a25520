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

//! `jsontree` is a mutable, in-memory `JSON` document tree. It parses `JSON` text in a single pass, lets you build and rearrange trees node by node, and indexes object members in a hash map that grows without pausing for a full rehash.
//!
//! ## Features
//!
//! - Arena storage: every node lives in a [`Document`] and is addressed by a copyable [`NodeId`]. Handles to freed nodes are detected instead of reaching a reused slot.
//! - Constant time moves: nodes are pushed into and popped out of containers by relinking, never by copying, and can move between trees of the same document.
//! - Precise errors: the parser reports the line and column of the first offending character and leaves the document untouched on failure.
//! - No recursion on input: parsing, encoding, comparing and freeing all run iteratively, so deeply nested input cannot overflow the stack.
//!
//! ## Tree model
//!
//! A node is either a container (`object` or `array`) or a scalar (`string`, `integer`, `double`, `boolean` or `null`). Children of an object always carry a name, children of an array never do. Numbers keep their text, so `0.30` stays `0.30`.
//!
//! ```
//! use jsontree::Document;
//!
//! let mut doc = Document::new();
//! let root = doc.parse(r#"{"name": "tree", "tags": ["a", "b"]}"#).unwrap();
//!
//! let tags = doc.node(root).unwrap().find("tags").unwrap().id();
//! let c = doc.new_string(None, "c").unwrap();
//! doc.push_front(tags, c).unwrap();
//!
//! assert_eq!(doc.encode(root).unwrap(), r#"{"name":"tree","tags":["c","a","b"]}"#);
//! ```

#![allow(clippy::uninlined_format_args)]

mod builder;
mod constants;
mod document;
mod error;
mod from;
mod iterator;
mod map;
mod number;
mod parser;
mod reader;
mod ser;
mod sort;
mod util;
mod value;

pub use document::Document;
pub use document::NodeId;
pub use error::Error;
pub use error::ParseErrorCode;
pub use error::Position;
pub use error::Result;
pub use iterator::Children;
pub use map::Duplicate;
pub use map::NameMap;
pub use number::Number;
pub use parser::parse;
pub use parser::parse_file;
pub use reader::NodeRef;
pub use value::JsonType;
pub use value::Node;
pub use value::Value;
