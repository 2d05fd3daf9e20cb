use super::*;

#[test]
fn builtin_catalog_loads_and_covers_one_to_nine() {
    let cat = LayoutCatalog::builtin().unwrap();
    assert!(!cat.is_empty());
    assert_eq!(cat.panel_counts(), (1..=9).collect::<Vec<_>>());
    for n in 1..=9 {
        let found = cat.templates_for_panel_count(n);
        assert!(!found.is_empty(), "no templates for {n}");
        assert!(found.iter().all(|t| t.panel_count == n && t.panels.len() == n));
    }
}

#[test]
fn counts_without_templates_yield_empty() {
    let cat = LayoutCatalog::builtin().unwrap();
    assert!(cat.templates_for_panel_count(0).is_empty());
    assert!(cat.templates_for_panel_count(12).is_empty());
    assert!(LayoutCatalog::default().templates_for_panel_count(1).is_empty());
}

#[test]
fn lookup_by_id() {
    let cat = LayoutCatalog::builtin().unwrap();
    assert_eq!(cat.require("four-grid").unwrap().panel_count, 4);
    assert!(cat.get("nope").is_none());
    assert!(
        cat.require("nope")
            .unwrap_err()
            .to_string()
            .contains("unknown layout template 'nope'")
    );
}

#[test]
fn duplicate_ids_are_rejected() {
    let cat = LayoutCatalog::builtin().unwrap();
    let t = cat.require("single-full").unwrap().clone();
    let err = LayoutCatalog::from_templates(vec![t.clone(), t]).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn json_round_trip_and_version_check() {
    let cat = LayoutCatalog::builtin().unwrap();
    let json = cat.to_json_string().unwrap();
    let back = LayoutCatalog::from_json_str(&json).unwrap();
    assert_eq!(back.templates(), cat.templates());

    let err = LayoutCatalog::from_json_str(r#"{"version": 2, "templates": []}"#).unwrap_err();
    assert!(err.to_string().contains("unsupported layout catalog version 2"));

    let err = LayoutCatalog::from_json_str("{").unwrap_err();
    assert!(matches!(err, PanelError::Serde(_)));
}
