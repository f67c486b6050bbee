use keypath::{Key, Kind, Node, NodeError, Path, Tree, Value};
use proptest::prelude::*;
use serde_json::json;

fn json_object(pairs: Vec<(&str, Value)>) -> Value {
    Value::object(pairs)
}

fn json_array(values: Vec<Value>) -> Value {
    Value::Array(values)
}

fn sample() -> serde_json::Value {
    json!({
        "user": {
            "name": "Ada",
            "age": 36,
            "tags": ["math", "engines"],
            "address": null
        },
        "items": [
            {"price": 10},
            {"price": 25}
        ]
    })
}

// ========================================================================
// Navigation
// ========================================================================

#[test]
fn test_empty_path_is_identity() {
    let doc = sample();
    let root = doc.root();
    let same = root.at(Path::new());

    assert!(same.is_present());
    assert_eq!(same.path(), &Path::new());
    assert_eq!(same.tree(), Some(&doc));
}

#[test]
fn test_nested_field_access() {
    let doc = sample();
    let name: String = doc.root().at(["user", "name"]).value().unwrap();
    assert_eq!(name, "Ada");
}

#[test]
fn test_mixed_keys() {
    let doc = sample();
    let price: i64 = doc
        .root()
        .at([Key::from("items"), Key::from(1), Key::from("price")])
        .value()
        .unwrap();
    assert_eq!(price, 25);
}

#[test]
fn test_negative_index_counts_from_end() {
    let doc = sample();
    let tag: String = doc.root().get("user").get("tags").get(-1).value().unwrap();
    assert_eq!(tag, "engines");
}

#[test]
fn test_get_and_at_agree() {
    let doc = sample();
    let stepwise = doc.root().get("items").get(0).get("price");
    let pathwise = doc.root().at(&Path::parse("$[items][0][price]").unwrap());
    assert_eq!(stepwise.path(), pathwise.path());
    assert_eq!(stepwise.value::<i64>().unwrap(), pathwise.value::<i64>().unwrap());
}

#[test]
fn test_navigation_never_fails_eagerly() {
    let doc = sample();
    // name on array, index on object, index on string
    let node = doc.root().get("items").get("price").get(0).get("x");
    assert!(!node.is_present());
    assert_eq!(node.kind(), Kind::Absent);
}

// ========================================================================
// Optional and required reads
// ========================================================================

#[test]
fn test_optional_present() {
    let doc = sample();
    let node = doc.root().get("user").get("age").optional();
    assert_eq!(node.map(|n| n.value::<u8>().unwrap()), Some(36));
}

#[test]
fn test_optional_absent() {
    let doc = sample();
    assert!(doc.root().at(["user", "email"]).optional().is_none());
    assert!(doc.root().at(["missing", "deeper", "still"]).optional().is_none());
}

#[test]
fn test_optional_with_negative_indices() {
    let doc = json!(["a", "b", "c"]);
    let root = doc.root();
    for index in [-3, -2, -1, 0, 1, 2] {
        assert!(root.get(index).optional().is_some(), "{index}");
    }
    for index in [-4, 3, i64::MIN] {
        assert!(root.get(index).optional().is_none(), "{index}");
    }
    assert_eq!(root.get(-3).value::<String>().unwrap(), "a");
}

#[test]
fn test_null_is_present() {
    let doc = sample();
    let address = doc.root().at(["user", "address"]);
    assert!(address.optional().is_some());
    assert_eq!(address.kind(), Kind::Null);
    assert_eq!(address.value::<Option<String>>().unwrap(), None);
}

#[test]
fn test_optional_value() {
    let doc = sample();
    let user = doc.root().get("user");
    assert_eq!(user.get("email").optional_value::<String>().unwrap(), None);
    assert_eq!(user.get("name").optional_value::<String>().unwrap(), Some("Ada".into()));
    assert!(matches!(
        user.get("age").optional_value::<String>(),
        Err(NodeError::TypeMismatch { .. })
    ));
}

#[test]
fn test_required_missing_key() {
    let doc = sample();
    let err = doc.root().at(["user", "email"]).required().value::<String>().unwrap_err();
    assert_eq!(
        err,
        NodeError::KeyNotFound {
            path: Path::parse("$[user]").unwrap(),
            key: Key::from("email"),
        }
    );
    assert!(err.is_missing());
}

#[test]
fn test_required_index_out_of_range() {
    let doc = sample();
    let err = doc.root().at(["items"]).get(5).get("price").value::<i64>().unwrap_err();
    assert_eq!(
        err,
        NodeError::IndexOutOfRange {
            path: Path::parse("$[items]").unwrap(),
            index: 5,
        }
    );
}

#[test]
fn test_index_on_object_is_out_of_range() {
    let doc = sample();
    let err = doc.root().get("user").get(0).value::<String>().unwrap_err();
    assert!(matches!(err, NodeError::IndexOutOfRange { index: 0, .. }));
}

#[test]
fn test_absent_node_fails_every_extraction() {
    let doc = sample();
    let absent = doc.root().get("nope");
    assert!(absent.value::<bool>().unwrap_err().is_missing());
    assert!(absent.array().unwrap_err().is_missing());
    assert!(absent.dictionary().unwrap_err().is_missing());
    assert!(absent.array_of::<i64>().unwrap_err().is_missing());
}

// ========================================================================
// Collections
// ========================================================================

#[test]
fn test_array_of_integers() {
    let doc = json!([1, 2, 3]);
    assert_eq!(doc.root().array_of::<i64>().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_array_of_fails_fast() {
    let doc = json!([1, "two", true]);
    let err = doc.root().array_of::<i64>().unwrap_err();
    assert_eq!(
        err,
        NodeError::TypeMismatch {
            path: Path::from(Key::Index(1)),
            expected: "i64",
            found: Kind::String,
        }
    );
}

#[test]
fn test_array_order_is_stable() {
    let doc = json!(["a", "b", "c", "d"]);
    let first: Vec<String> = doc.root().array_of().unwrap();
    let second: Vec<String> = doc.root().array_of().unwrap();
    assert_eq!(first, vec!["a", "b", "c", "d"]);
    assert_eq!(first, second);
}

#[test]
fn test_array_on_object_is_type_mismatch() {
    let doc = sample();
    assert!(matches!(
        doc.root().get("user").array(),
        Err(NodeError::TypeMismatch { expected: "array", found: Kind::Object, .. })
    ));
}

#[test]
fn test_dictionary() {
    let doc = sample();
    let user = doc.root().get("user").dictionary().unwrap();
    assert_eq!(user.len(), 4);
    assert_eq!(user["name"].value::<String>().unwrap(), "Ada");
    assert_eq!(user["tags"].path().to_string(), "$[user][tags]");
}

#[test]
fn test_dictionary_on_array_is_type_mismatch() {
    let doc = sample();
    assert!(matches!(
        doc.root().get("items").dictionary(),
        Err(NodeError::TypeMismatch { expected: "object", found: Kind::Array, .. })
    ));
}

#[test]
fn test_dictionary_of_reports_first_key_in_order() {
    let doc = json!({"b": "x", "a": "y", "c": 3});
    assert_eq!(doc.root().dictionary_of::<i64>().unwrap_err().path().to_string(), "$[a]");

    let counts = json!({"x": 1, "y": 2});
    let map = counts.root().dictionary_of::<u32>().unwrap();
    assert_eq!(map["y"], 2);
}

// ========================================================================
// Providers
// ========================================================================

#[test]
fn test_value_tree_matches_json_tree() {
    let value = json_object(vec![
        ("name", Value::from("Ada")),
        ("scores", json_array(vec![Value::from(1), Value::from(2.5)])),
    ]);
    let json = json!({"name": "Ada", "scores": [1, 2.5]});

    assert_eq!(Value::from(json.clone()), value);
    for path in ["$[name]", "$[scores][0]", "$[scores][1]", "$[scores][2]"] {
        let path = Path::parse(path).unwrap();
        assert_eq!(value.root().at(&path).kind(), json.root().at(&path).kind());
    }
}

// ========================================================================
// Properties
// ========================================================================

fn arb_tree() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-c]{0,3}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-c]", inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        "[a-d]".prop_map(Key::Name),
        (-4i64..5).prop_map(Key::Index),
    ]
}

/// Direct lookup used as the oracle for navigation.
fn lookup<'a>(mut value: &'a serde_json::Value, keys: &[Key]) -> Option<&'a serde_json::Value> {
    for key in keys {
        value = match key {
            Key::Name(name) => value.as_object()?.get(name)?,
            Key::Index(i) => {
                let items = value.as_array()?;
                let len = items.len() as i64;
                let idx = if *i < 0 { len + i } else { *i };
                if idx < 0 || idx >= len {
                    return None;
                }
                &items[idx as usize]
            }
        };
    }
    Some(value)
}

proptest! {
    #[test]
    fn prop_optional_present_iff_path_resolves(tree in arb_tree(), keys in prop::collection::vec(arb_key(), 0..4)) {
        let node = tree.root().at(&keys);
        let expected = lookup(&tree, &keys);
        prop_assert_eq!(node.optional().is_some(), expected.is_some());
        prop_assert_eq!(node.tree(), expected);
        if expected.is_none() {
            prop_assert!(node.primitive().unwrap_err().is_missing());
        }
    }

    #[test]
    fn prop_extraction_is_idempotent(tree in arb_tree(), keys in prop::collection::vec(arb_key(), 0..3)) {
        let node = tree.root().at(&keys);
        prop_assert_eq!(node.value::<i64>(), node.value::<i64>());
        prop_assert_eq!(node.value::<String>(), node.value::<String>());
        prop_assert_eq!(node.array_of::<bool>(), node.array_of::<bool>());
    }
}
