use approx::assert_relative_eq;
use chart_marks::ChartError;
use chart_marks::core::{
    CategoryColorPolicy, HierarchyNode, build_tile_marks, partition_hierarchy,
};

const ROOT_AREA: f64 = 900.0 * 550.0;

#[test]
fn two_leaf_tree_splits_area_by_value() {
    let root = HierarchyNode::branch(
        "root",
        vec![HierarchyNode::leaf("a", 30.0), HierarchyNode::leaf("b", 70.0)],
    );

    let leaves = partition_hierarchy(&root, 900.0, 550.0).expect("partition");
    let area_of = |name: &str| {
        leaves
            .iter()
            .find(|leaf| leaf.name == name)
            .map(|leaf| leaf.rect.area())
            .expect("leaf present")
    };

    assert_eq!(leaves.len(), 2);
    assert_relative_eq!(area_of("a"), 0.3 * ROOT_AREA, max_relative = 1e-9);
    assert_relative_eq!(area_of("b"), 0.7 * ROOT_AREA, max_relative = 1e-9);
}

#[test]
fn siblings_are_ordered_by_descending_value_then_input_order() {
    let root = HierarchyNode::branch(
        "root",
        vec![
            HierarchyNode::leaf("first-tie", 10.0),
            HierarchyNode::leaf("big", 50.0),
            HierarchyNode::leaf("second-tie", 10.0),
        ],
    );

    let leaves = partition_hierarchy(&root, 400.0, 300.0).expect("partition");
    let names: Vec<&str> = leaves.iter().map(|leaf| leaf.name.as_str()).collect();

    assert_eq!(names, vec!["big", "first-tie", "second-tie"]);
}

#[test]
fn leaf_ids_are_dotted_paths() {
    let root = HierarchyNode::branch(
        "Video Game Sales",
        vec![HierarchyNode::branch(
            "Wii",
            vec![HierarchyNode::leaf("Wii Sports", 82.53).with_category("Wii")],
        )],
    );

    let leaves = partition_hierarchy(&root, 100.0, 100.0).expect("partition");

    assert_eq!(leaves[0].id, "Video Game Sales.Wii.Wii Sports");
    assert_eq!(leaves[0].category.as_deref(), Some("Wii"));
}

#[test]
fn groups_follow_root_child_index() {
    let root = HierarchyNode::branch(
        "root",
        vec![
            HierarchyNode::branch("Wii", vec![HierarchyNode::leaf("a", 1.0).with_category("Wii")]),
            HierarchyNode::branch("DS", vec![HierarchyNode::leaf("b", 9.0).with_category("DS")]),
        ],
    );

    let leaves = partition_hierarchy(&root, 200.0, 100.0).expect("partition");
    let group_of = |name: &str| {
        leaves
            .iter()
            .find(|leaf| leaf.name == name)
            .map(|leaf| leaf.group)
            .expect("leaf present")
    };
    assert_eq!(group_of("a"), 0);
    assert_eq!(group_of("b"), 1);

    let marks = build_tile_marks(&leaves, CategoryColorPolicy::RootChildIndex);
    assert!(marks.iter().all(|mark| mark.color_slot.is_some()));

    let plain = build_tile_marks(&leaves, CategoryColorPolicy::Disabled);
    assert!(plain.iter().all(|mark| mark.color_slot.is_none()));
}

#[test]
fn tile_marks_carry_split_label_lines() {
    let root = HierarchyNode::branch("root", vec![HierarchyNode::leaf("Super Mario Bros.", 40.0)]);

    let leaves = partition_hierarchy(&root, 300.0, 200.0).expect("partition");
    let marks = build_tile_marks(&leaves, CategoryColorPolicy::default());

    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].point, leaves[0].key);
    assert_eq!(marks[0].label_lines.len(), 3);
}

#[test]
fn leaf_without_value_is_malformed() {
    let root = HierarchyNode::branch(
        "root",
        vec![HierarchyNode::leaf("a", 1.0), HierarchyNode::branch("empty-leaf", Vec::new())],
    );

    let err = partition_hierarchy(&root, 100.0, 100.0).expect_err("leaf has no value");
    assert!(matches!(err, ChartError::MalformedDataset { .. }));
}

#[test]
fn negative_leaf_value_is_malformed() {
    let root = HierarchyNode::branch("root", vec![HierarchyNode::leaf("a", -1.0)]);

    assert!(matches!(
        partition_hierarchy(&root, 100.0, 100.0),
        Err(ChartError::MalformedDataset { .. })
    ));
}

#[test]
fn zero_size_is_invalid() {
    let root = HierarchyNode::branch("root", vec![HierarchyNode::leaf("a", 1.0)]);

    assert!(matches!(
        partition_hierarchy(&root, 0.0, 100.0),
        Err(ChartError::InvalidData(_))
    ));
}

#[test]
fn numeric_string_values_deserialize() {
    let root: HierarchyNode = serde_json::from_str(
        r#"{"name":"root","children":[{"name":"x","category":"c","value":"12.5"}]}"#,
    )
    .expect("lenient value");

    assert_eq!(root.children[0].value, Some(12.5));
}
