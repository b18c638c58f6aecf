use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GeoError::expression(NodeId(7), "x")
            .to_string()
            .contains("expression error in node #7:")
    );
    assert!(
        GeoError::lifecycle("graph 'g'", "x")
            .to_string()
            .contains("lifecycle error: graph 'g':")
    );
    assert!(GeoError::formula("x").to_string().contains("formula error:"));
    assert!(
        GeoError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn cycle_lists_labels_in_order() {
    let err = GeoError::Cycle {
        variable: "a".to_owned(),
        labels: vec!["B".to_owned(), "A".to_owned()],
    };
    assert_eq!(
        err.to_string(),
        "dependency cycle while animating 'a': B -> A"
    );
}

#[test]
fn node_id_only_for_expression_errors() {
    assert_eq!(GeoError::expression(NodeId(3), "x").node_id(), Some(NodeId(3)));
    assert_eq!(GeoError::formula("x").node_id(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GeoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
