/*
 * cache/key.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Cache key derivation.
 */

//! Cache key derivation.
//!
//! A cache key is the SHA-256 digest of the canonical JSON
//! serialization of the key material: the renderer's name, its
//! declared properties, and the rendering key it extracted from the
//! request. `serde_json::Map` is BTreeMap-backed in this workspace (no
//! `preserve_order` feature), so serialization always emits keys in
//! sorted order and unordered input mappings can never change the
//! digest.
//!
//! The key is a pure function of its inputs: identical material yields
//! an identical key across processes and runs. Anything that changes a
//! renderer's output bytes must therefore surface in either
//! `properties` (logic/version changes) or the rendering key (request
//! changes).

use serde_json::{Map, Value};

/// Derive the cache key for one render call.
pub fn derive_cache_key(
    name: &str,
    properties: &Map<String, Value>,
    rendering_key: &Map<String, Value>,
) -> String {
    let mut material = Map::new();
    material.insert("name".to_string(), Value::String(name.to_string()));
    material.insert("properties".to_string(), Value::Object(properties.clone()));
    material.insert(
        "rendering_key".to_string(),
        Value::Object(rendering_key.clone()),
    );

    // Serializing a Value cannot fail.
    let canonical = serde_json::to_vec(&Value::Object(material))
        .expect("JSON value serialization is infallible");
    podium_util::hash_bytes(&canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_key_is_deterministic() {
        let props = map(json!({"version": 1, "rendering_dpi": 600}));
        let key_fields = map(json!({"formula": "x^2", "short": false}));
        assert_eq!(
            derive_cache_key("latex", &props, &key_fields),
            derive_cache_key("latex", &props, &key_fields)
        );
    }

    #[test]
    fn test_key_independent_of_insertion_order() {
        let mut a = Map::new();
        a.insert("formula".to_string(), json!("x^2"));
        a.insert("short".to_string(), json!(true));
        let mut b = Map::new();
        b.insert("short".to_string(), json!(true));
        b.insert("formula".to_string(), json!("x^2"));

        let props = map(json!({"version": 1}));
        assert_eq!(
            derive_cache_key("latex", &props, &a),
            derive_cache_key("latex", &props, &b)
        );
    }

    #[test]
    fn test_name_is_a_namespace() {
        let props = map(json!({"version": 1}));
        let key_fields = map(json!({"srchash": "abc"}));
        assert_ne!(
            derive_cache_key("img", &props, &key_fields),
            derive_cache_key("exec", &props, &key_fields)
        );
    }

    #[test]
    fn test_version_bump_changes_key() {
        let key_fields = map(json!({"formula": "x^2"}));
        assert_ne!(
            derive_cache_key("latex", &map(json!({"version": 1})), &key_fields),
            derive_cache_key("latex", &map(json!({"version": 2})), &key_fields)
        );
    }

    #[test]
    fn test_rendering_key_change_changes_key() {
        let props = map(json!({"version": 1}));
        assert_ne!(
            derive_cache_key("latex", &props, &map(json!({"formula": "x^2"}))),
            derive_cache_key("latex", &props, &map(json!({"formula": "x^3"})))
        );
    }

    #[test]
    fn test_key_is_hex_sha256() {
        let key = derive_cache_key("latex", &Map::new(), &Map::new());
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
