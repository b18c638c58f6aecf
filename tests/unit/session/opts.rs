use super::*;

#[test]
fn defaults() {
    let o = EngineOpts::default();
    assert_eq!(o.fps, 60);
    assert_eq!(o.default_duration_secs, 0.8);
    assert_eq!(o.ease, Ease::InOutQuad);
    o.validate().unwrap();
}

#[test]
fn json_fills_missing_fields() {
    let o = EngineOpts::from_json(r#"{"fps": 30, "ease": "linear"}"#).unwrap();
    assert_eq!(o.fps, 30);
    assert_eq!(o.ease, Ease::Linear);
    assert_eq!(o.plot_samples, 200);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(matches!(
        EngineOpts::from_json(r#"{"fps": 0}"#),
        Err(GeoError::Serde(_))
    ));
    assert!(EngineOpts::from_json(r#"{"shape_duration_secs": -1}"#).is_err());
    assert!(EngineOpts::from_json(r#"{"plot_samples": 1}"#).is_err());
    assert!(EngineOpts::from_json("[]").is_err());
}
