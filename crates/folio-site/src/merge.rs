//! Header merging for partial updates.

use folio_storage::Header;
use serde_json::Value;

/// Merge `patch` into `base`.
///
/// Nested mappings merge key by key; any other value (scalar, list, or a
/// mapping replacing a non-mapping) overwrites the existing one.
pub fn deep_merge(base: &mut Header, patch: Header) {
    for (key, value) in patch {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => deep_merge(existing, nested),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn header(value: Value) -> Header {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_nested_mappings_merge() {
        let mut base = header(json!({
            "title": "Post",
            "taxonomy": {"category": ["blog"], "tag": ["rust"]}
        }));

        deep_merge(
            &mut base,
            header(json!({"taxonomy": {"tag": ["cms"], "author": "joe"}})),
        );

        assert_eq!(
            Value::Object(base),
            json!({
                "title": "Post",
                "taxonomy": {"category": ["blog"], "tag": ["cms"], "author": "joe"}
            })
        );
    }

    #[test]
    fn test_lists_and_scalars_replace() {
        let mut base = header(json!({"tags": ["a", "b"], "draft": true}));

        deep_merge(&mut base, header(json!({"tags": ["c"], "draft": false})));

        assert_eq!(Value::Object(base), json!({"tags": ["c"], "draft": false}));
    }

    #[test]
    fn test_mapping_replaces_scalar() {
        let mut base = header(json!({"menu": "Home"}));

        deep_merge(&mut base, header(json!({"menu": {"label": "Home"}})));

        assert_eq!(Value::Object(base), json!({"menu": {"label": "Home"}}));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let patch = header(json!({"title": "New", "meta": {"a": 1}}));
        let mut once = header(json!({"title": "Old", "meta": {"b": 2}}));
        deep_merge(&mut once, patch.clone());
        let mut twice = once.clone();

        deep_merge(&mut twice, patch);

        assert_eq!(once, twice);
    }
}
