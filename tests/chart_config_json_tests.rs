use chart_marks::api::{
    CHART_CONFIG_JSON_SCHEMA_V1, ChartConfig, ChartKind, ChartRenderer, TreemapValueFormat,
};
use chart_marks::core::{CategoryColorPolicy, Padding, Viewport};
use chart_marks::ChartError;

#[test]
fn presets_match_page_layouts() {
    let heat_map = ChartConfig::for_kind(ChartKind::HeatMap);
    assert_eq!(heat_map.viewport, Viewport::new(800, 500));
    assert_eq!(heat_map.padding, Padding::new(30.0, 50.0, 100.0, 50.0));

    let choropleth = ChartConfig::for_kind(ChartKind::Choropleth);
    assert_eq!(choropleth.viewport, Viewport::new(960, 630));
    assert!(!choropleth.show_axes);

    let treemap = ChartConfig::for_kind(ChartKind::Treemap);
    assert_eq!(treemap.viewport, Viewport::new(900, 550));
    assert_eq!(treemap.color_policy, CategoryColorPolicy::RootChildIndex);

    let bar = ChartConfig::for_kind(ChartKind::Bar);
    assert_eq!(bar.bar_width_px, 3.0);
    assert!(bar.show_axes);
}

#[test]
fn bare_config_round_trips() {
    let config = ChartConfig::for_kind(ChartKind::Treemap)
        .with_color_policy(CategoryColorPolicy::Disabled)
        .with_treemap_value_format(TreemapValueFormat::Currency);

    let json = config.to_json_pretty().expect("serialize");
    let parsed = ChartConfig::from_json_compat_str(&json).expect("parse");

    assert_eq!(parsed, config);
}

#[test]
fn contract_v1_round_trips() {
    let config = ChartConfig::for_kind(ChartKind::Scatter).with_dot_radius_px(4.0);

    let json = config.to_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains(&format!("\"schema_version\": {CHART_CONFIG_JSON_SCHEMA_V1}")));

    let parsed = ChartConfig::from_json_compat_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn omitted_fields_take_defaults() {
    let json = r#"{
        "kind": "Scatter",
        "viewport": {"width": 800, "height": 500},
        "padding": {"top": 50, "right": 50, "bottom": 50, "left": 50}
    }"#;

    let parsed = ChartConfig::from_json_compat_str(json).expect("parse");

    assert_eq!(parsed, ChartConfig::for_kind(ChartKind::Scatter));
}

#[test]
fn unknown_schema_version_is_rejected() {
    let config = ChartConfig::for_kind(ChartKind::Bar);
    let json = config
        .to_json_contract_v1_pretty()
        .expect("serialize")
        .replace(
            &format!("\"schema_version\": {CHART_CONFIG_JSON_SCHEMA_V1}"),
            "\"schema_version\": 99",
        );

    assert!(matches!(
        ChartConfig::from_json_compat_str(&json),
        Err(ChartError::InvalidData(_))
    ));
}

#[test]
fn unparseable_config_is_invalid_data() {
    assert!(matches!(
        ChartConfig::from_json_compat_str("{\"kind\": "),
        Err(ChartError::InvalidData(_))
    ));
}

#[test]
fn renderer_rejects_invalid_config() {
    let crowded = ChartConfig::for_kind(ChartKind::Bar).with_padding(Padding::uniform(400.0));
    assert!(matches!(
        ChartRenderer::new(crowded),
        Err(ChartError::InvalidData(_))
    ));

    let empty = ChartConfig::for_kind(ChartKind::Bar).with_viewport(Viewport::new(0, 500));
    assert!(matches!(
        ChartRenderer::new(empty),
        Err(ChartError::InvalidViewport { width: 0, height: 500 })
    ));

    let zero_bar = ChartConfig::for_kind(ChartKind::Bar).with_bar_width_px(0.0);
    assert!(ChartRenderer::new(zero_bar).is_err());
}
