use super::*;

#[test]
fn defaults_are_valid() {
    let s = BakeSettings::default();
    assert_eq!(s.default_length, 1.0);
    assert!(s.parallel);
    assert!(s.threads.is_none());
    assert!(s.excluded_nodes.is_empty());
    s.validate().unwrap();
}

#[test]
fn rejects_non_positive_length_and_zero_threads() {
    for len in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let s = BakeSettings {
            default_length: len,
            ..BakeSettings::default()
        };
        assert!(matches!(s.validate(), Err(ModelError::Validation(_))));
    }
    let s = BakeSettings {
        threads: Some(0),
        ..BakeSettings::default()
    };
    assert!(s.validate().unwrap_err().to_string().contains("threads"));
}

#[test]
fn partial_json_fills_defaults() {
    let s: BakeSettings = serde_json::from_str(r#"{ "excluded_nodes": [3, 1] }"#).unwrap();
    assert_eq!(s, BakeSettings::default().exclude(NodeId(1)).exclude(NodeId(3)));
}
