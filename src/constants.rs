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

// JSON text constants
pub(crate) const UNICODE_LEN: usize = 4;

// JSON text escape characters constants
pub(crate) const BS: u8 = b'\x5C'; // \\ Backslash
pub(crate) const QU: u8 = b'\x22'; // \" Double quotation mark
pub(crate) const SD: u8 = b'\x2F'; // \/ Slash or divide
pub(crate) const BB: u8 = b'\x08'; // \b Backspace
pub(crate) const FF: u8 = b'\x0C'; // \f Formfeed Page Break
pub(crate) const NN: u8 = b'\x0A'; // \n Newline
pub(crate) const RR: u8 = b'\x0D'; // \r Carriage Return
pub(crate) const TT: u8 = b'\x09'; // \t Horizontal Tab

// JSON literals
pub(crate) const LIT_NULL: &[u8] = b"null";
pub(crate) const LIT_TRUE: &[u8] = b"true";
pub(crate) const LIT_FALSE: &[u8] = b"false";

pub(crate) const TYPE_UNDEFINED: &str = "undefined";
pub(crate) const TYPE_OBJECT: &str = "object";
pub(crate) const TYPE_ARRAY: &str = "array";
pub(crate) const TYPE_STRING: &str = "string";
pub(crate) const TYPE_INTEGER: &str = "integer";
pub(crate) const TYPE_DOUBLE: &str = "double";
pub(crate) const TYPE_BOOLEAN: &str = "boolean";
pub(crate) const TYPE_NULL: &str = "null";

// Bucket counts of the name map tables, roughly doubling.
pub(crate) const MAP_PRIMES: [u64; 28] = [
    53,
    97,
    193,
    389,
    769,
    1543,
    3079,
    6151,
    12289,
    24593,
    49157,
    98317,
    196613,
    393241,
    786433,
    1572869,
    3145739,
    6291469,
    12582917,
    25165843,
    50331653,
    100663319,
    201326611,
    402653189,
    805306457,
    1610612741,
    3221225473,
    4294967291,
];

pub(crate) const MAP_HASH_SEED: u64 = 5381;
