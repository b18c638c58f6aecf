use super::*;

#[test]
fn explicit_options_win_over_defaults() {
    let explicit = StyleOptions {
        color: Some("green".to_owned()),
        ..StyleOptions::default()
    };
    let s = StyleOptions::defaults_for(StyleKind::Line).merged_with(&explicit);
    assert_eq!(s.color.as_deref(), Some("green"));
    assert_eq!(s.stroke_width, Some(2.0));
}

#[test]
fn per_kind_defaults() {
    assert_eq!(StyleOptions::defaults_for(StyleKind::Point).radius, Some(4.0));
    assert_eq!(
        StyleOptions::defaults_for(StyleKind::Plot).color.as_deref(),
        Some("blue")
    );
    assert_eq!(
        StyleOptions::defaults_for(StyleKind::Polygon).fill_opacity,
        Some(0.2)
    );
    assert!(StyleOptions::defaults_for(StyleKind::Graph).is_empty());
}

#[test]
fn json_ignores_unknown_keys() {
    let s = StyleOptions::from_json(r#"{"strokeWidth": 3, "color": "red", "dash": [1, 2]}"#)
        .unwrap();
    assert_eq!(s.stroke_width, Some(3.0));
    assert_eq!(s.color.as_deref(), Some("red"));
    assert_eq!(s.radius, None);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = StyleOptions::from_json("{").unwrap_err();
    assert!(matches!(err, GeoError::Serde(_)));
}
