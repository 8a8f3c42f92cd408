//! Round-trip properties over the full value grammar, plus concrete
//! scenarios pinning the wire form.

use proptest::prelude::*;
use serde_json::json;
use toon_codec::{
    decode, encode, from_json_text, to_json_text, DecodeOptions, Delimiter, EncodeOptions, Error,
    Map, Number, Value,
};

fn value_strategy() -> impl Strategy<Value = Value> {
    let scalar = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(Number::from(n))),
        (-1.0e12..1.0e12f64).prop_map(|f| Value::Number(Number::from(f))),
        ".*".prop_map(Value::String),
    ];
    scalar.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::List),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..5).prop_map(|entries| {
                Value::Map(entries.into_iter().collect::<Map>())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_round_trip(value in value_strategy()) {
        let encoded = encode(&value, &EncodeOptions::default()).unwrap();
        let decoded = decode(&encoded, &DecodeOptions::default()).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_round_trip_with_pipe_delimiter(value in value_strategy()) {
        let encode_options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
        let decode_options = DecodeOptions::new().with_delimiter(Delimiter::Pipe);
        let encoded = encode(&value, &encode_options).unwrap();
        let decoded = decode(&encoded, &decode_options).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_canonical_rendering_is_idempotent(value in value_strategy()) {
        let options = EncodeOptions::default();
        let first = encode(&value, &options).unwrap();
        let decoded = decode(&first, &DecodeOptions::default()).unwrap();
        prop_assert_eq!(encode(&decoded, &options).unwrap(), first);
    }
}

#[test]
fn flat_map_round_trips_with_entry_order() {
    let value = from_json_text(r#"{"name":"John Doe","age":30,"email":"john@example.com"}"#)
        .unwrap();
    let encoded = encode(&value, &EncodeOptions::default()).unwrap();
    let decoded = decode(&encoded, &DecodeOptions::default()).unwrap();
    let map = decoded.as_map().expect("map");
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["name", "age", "email"]);
    assert_eq!(decoded, value);
}

#[test]
fn uniform_users_encode_as_a_tabular_block() {
    let value = from_json_text(
        r#"{"users":[
            {"id":1,"name":"Alice Johnson","email":"alice@example.com","role":"admin","active":true},
            {"id":2,"name":"Bob Smith","email":"bob@example.com","role":"user","active":false}
        ]}"#,
    )
    .unwrap();
    let encoded = encode(&value, &EncodeOptions::default()).unwrap();
    assert_eq!(
        encoded,
        "users[id,name,email,role,active]:\n  \
         1,Alice Johnson,alice@example.com,admin,true\n  \
         2,Bob Smith,bob@example.com,user,false"
    );
    let decoded = decode(&encoded, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn unterminated_quote_is_a_decode_error() {
    let err = decode("note: \"never closed", &DecodeOptions::default()).unwrap_err();
    match err {
        Error::Decode { line, reason } => {
            assert_eq!(line, 1);
            assert!(reason.contains("unterminated"));
        }
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[test]
fn tabular_output_is_shorter_than_json() {
    let value = from_json_text(
        r#"{"users":[
            {"id":1,"name":"Alice Johnson","email":"alice@example.com","role":"admin","active":true},
            {"id":2,"name":"Bob Smith","email":"bob@example.com","role":"user","active":false},
            {"id":3,"name":"Cara Lane","email":"cara@example.com","role":"user","active":true}
        ]}"#,
    )
    .unwrap();
    let encoded = encode(&value, &EncodeOptions::default()).unwrap();
    assert!(encoded.len() < to_json_text(&value).len());
}

#[test]
fn two_uniform_rows_already_save_space() {
    let value = Value::from(json!([
        {"alpha": 1, "beta": 2},
        {"alpha": 3, "beta": 4},
    ]));
    let encoded = encode(&value, &EncodeOptions::default()).unwrap();
    assert!(encoded.len() < to_json_text(&value).len());
}

#[test]
fn mixed_structures_round_trip() {
    let value = Value::from(json!({
        "title": "TOON sample",
        "meta": {"version": 1, "tags": ["compact", "llm"]},
        "rows": [
            {"id": 1, "note": null},
            {"id": 2, "note": "has, comma"},
        ],
        "extras": [1, [2, 3], {"nested": {"deep": true}}, {}],
    }));
    let encoded = encode(&value, &EncodeOptions::default()).unwrap();
    let decoded = decode(&encoded, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded, value);
}
