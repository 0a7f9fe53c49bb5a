use emod_core::canon::{stable_hash_string, to_canonical_json_bytes};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct Forward {
    alpha: u32,
    beta: u32,
}

#[derive(Serialize)]
struct Backward {
    beta: u32,
    alpha: u32,
}

#[test]
fn hash_ignores_struct_field_order() {
    let a = stable_hash_string(&Forward { alpha: 1, beta: 2 }).expect("hash");
    let b = stable_hash_string(&Backward { beta: 2, alpha: 1 }).expect("hash");
    assert_eq!(a, b);
}

#[test]
fn hash_distinguishes_values() {
    let a = stable_hash_string(&json!({ "coverage": 0.8 })).expect("hash");
    let b = stable_hash_string(&json!({ "coverage": 0.9 })).expect("hash");
    assert_ne!(a, b);
}

#[test]
fn hash_is_hex_sha256() {
    let digest = stable_hash_string(&json!({})).expect("hash");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn canonical_bytes_are_key_sorted() {
    let bytes = to_canonical_json_bytes(&Backward { beta: 2, alpha: 1 }).expect("encode");
    assert_eq!(bytes, br#"{"alpha":1,"beta":2}"#);
}
