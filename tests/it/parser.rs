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

use std::io::Write;

use jsontree::{parse, Document, Error, JsonType, ParseErrorCode, Position};

fn test_parse_err(errors: &[(&str, &'static str)]) {
    for &(s, err) in errors {
        let mut doc = Document::new();
        let res = doc.parse(s);
        assert!(res.is_err(), "{:?} should not parse", s);
        assert_eq!(res.err().unwrap().to_string(), err, "input {:?}", s);
        assert!(doc.is_empty(), "{:?} left nodes behind", s);
    }
}

fn test_parse_ok(tests: &[(&str, &str)]) {
    for &(s, encoded) in tests {
        let (doc, root) = parse(s).unwrap();
        assert_eq!(doc.encode(root).unwrap(), encoded, "input {:?}", s);
    }
}

#[test]
fn test_parse_scalars() {
    test_parse_ok(&[
        ("null", "null"),
        (" true ", "true"),
        ("false", "false"),
        ("0", "0"),
        ("-0", "-0"),
        ("-12", "-12"),
        ("3.25", "3.25"),
        ("1E+2", "1E+2"),
        ("-12.5e-3", "-12.5e-3"),
        ("18446744073709551616", "18446744073709551616"),
        (r#""x""#, r#""x""#),
        (r#""A\/\t""#, r#""A/\t""#),
        (r#""""#, r#""""#),
    ]);

    test_parse_err(&[
        ("", "expected value, line 1, column 1"),
        ("   ", "expected value, line 1, column 4"),
        ("nul\"", "unexpected character, line 1, column 4"),
        ("[tru]", "expected value, line 1, column 2"),
        ("[-]", "invalid number, line 1, column 2"),
        ("[1.]", "invalid number, line 1, column 2"),
        ("[01]", "invalid number, line 1, column 2"),
        ("[1]x", "trailing characters, line 1, column 4"),
        ("{} 1", "trailing characters, line 1, column 4"),
    ]);
}

#[test]
fn test_parse_strings() {
    test_parse_err(&[
        ("\"ab", "unterminated string, line 1, column 4"),
        ("\"é", "unterminated string, line 1, column 3"),
        (r#""a\qb""#, "invalid escape, line 1, column 3"),
        (r#""a\u12x4""#, "invalid escape, line 1, column 3"),
        ("\"a\tb\"", "control character in string, line 1, column 3"),
    ]);
}

#[test]
fn test_parse_containers() {
    test_parse_ok(&[
        ("[]", "[]"),
        (" [ ] ", "[]"),
        ("{}", "{}"),
        ("[[[]]]", "[[[]]]"),
        (r#"{"":""}"#, r#"{"":""}"#),
        (
            " {\n \"a\" : { \"b\" : [ true , null ] } ,\r\n\t\"c\":[1,{}]}",
            r#"{"a":{"b":[true,null]},"c":[1,{}]}"#,
        ),
    ]);

    test_parse_err(&[
        (r#"{"a": 1,}"#, "expected value, line 1, column 9"),
        ("[1,2", "EOF while parsing a value, line 1, column 4"),
        ("[", "EOF while parsing a value, line 1, column 2"),
        (r#"{"a" 1}"#, "unexpected character, line 1, column 6"),
        ("[1 2]", "unexpected character, line 1, column 4"),
        (r#"{"a":1}}"#, "mismatched closing token, line 1, column 8"),
        ("[1}", "mismatched closing token, line 1, column 3"),
        ("{1:2}", "invalid member name, line 1, column 2"),
        (r#"["a":1]"#, "unexpected member name, line 1, column 5"),
        (r#"{"a"}"#, "expected member name, line 1, column 2"),
        (r#"{"a":}"#, "expected value, line 1, column 6"),
        (r#"{"a":"b":1}"#, "unexpected member name, line 1, column 9"),
        ("{[]}", "expected member name, line 1, column 2"),
        ("1 {}", "unexpected token, line 1, column 1"),
        ("[[] []]", "unexpected token, line 1, column 5"),
        ("[1,,2]", "expected value, line 1, column 4"),
        ("[\n  1,\n  x\n]", "expected value, line 3, column 3"),
    ]);
}

#[test]
fn test_parse_tree_shape() {
    let (doc, root) = parse(r#"{"a":1,"b":[1.5,"s",false],"c":{}}"#).unwrap();
    let root = doc.node(root).unwrap();
    assert_eq!(root.json_type(), JsonType::Object);
    assert_eq!(root.name(), None);
    assert_eq!(root.size(), 3);

    let b = root.find("b").unwrap();
    let kinds: Vec<_> = b.children().map(|c| c.json_type()).collect();
    assert_eq!(kinds, vec![JsonType::Double, JsonType::String, JsonType::Boolean]);
    assert!(b.children().all(|c| c.name().is_none()));
    assert_eq!(b.at(0).unwrap().as_f64(), Some(1.5));
    assert_eq!(root.find("c").unwrap().size(), 0);
    assert_eq!(doc.len(), 7);
}

#[test]
fn test_parse_error_position() {
    let err = parse("{\n\"a\": [1, 2,,]\n}").unwrap_err();
    assert_eq!(
        err.position(),
        Some(Position {
            offset: 13,
            line: 2,
            column: 12
        })
    );
    assert!(matches!(err, Error::Syntax(ParseErrorCode::ExpectedValue, _)));
}

#[test]
fn test_failed_parse_keeps_document() {
    let mut doc = Document::new();
    let keep = doc.parse(r#"[1,2,3]"#).unwrap();
    assert_eq!(doc.len(), 4);
    assert!(doc.parse(r#"[1,2,{"a":[3,4,]}]"#).is_err());
    assert_eq!(doc.len(), 4);
    assert_eq!(doc.encode(keep).unwrap(), "[1,2,3]");
}

#[test]
fn test_parse_bytes() {
    let mut doc = Document::new();
    let err = doc.parse_bytes(b"[\"\xff\"]").unwrap_err();
    assert_eq!(err.to_string(), "invalid UTF-8, line 1, column 3");
    let root = doc.parse_bytes("[\"é\"]".as_bytes()).unwrap();
    assert_eq!(doc.node(root).unwrap().at(0).unwrap().as_str(), Some("é"));
}

#[test]
fn test_parse_file() {
    let path = std::env::temp_dir().join(format!("jsontree-parse-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(br#"{"k": [1, 2]}"#).unwrap();
    drop(file);

    let (doc, root) = jsontree::parse_file(&path).unwrap();
    assert_eq!(doc.encode(root).unwrap(), r#"{"k":[1,2]}"#);
    std::fs::remove_file(&path).unwrap();

    let err = jsontree::parse_file(&path).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_parse_deep_nesting() {
    let depth = 100_000;
    let text = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
    let (mut doc, root) = parse(&text).unwrap();
    assert_eq!(doc.len(), depth + 1);

    let mut node = doc.node(root).unwrap();
    while let Some(child) = node.child() {
        node = child;
    }
    assert_eq!(node.as_i64(), Some(1));
    assert_eq!(node.depth(), depth);

    let broken = format!("{}1{}", "[".repeat(depth), "]".repeat(depth - 1));
    assert!(doc.parse(&broken).is_err());
    assert_eq!(doc.len(), depth + 1);
    doc.free(root).unwrap();
    assert!(doc.is_empty());
}
