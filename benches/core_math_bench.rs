use chart_marks::core::{
    AttrValue, AxisSpec, DataPoint, HierarchyNode, IntensityRange, MarkSpec, PointKey, ScaleSet,
    ValueField, build_marks, derive_scale, partition_hierarchy,
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_treemap_partition_2k(c: &mut Criterion) {
    let root = HierarchyNode::branch(
        "root",
        (0..20)
            .map(|group| {
                HierarchyNode::branch(
                    format!("group-{group}"),
                    (0..100)
                        .map(|leaf| {
                            let value = 1.0 + (leaf * 7 % 31) as f64;
                            HierarchyNode::leaf(format!("leaf-{group}-{leaf}"), value)
                                .with_category(format!("group-{group}"))
                        })
                        .collect(),
                )
            })
            .collect(),
    );

    c.bench_function("treemap_partition_2k", |b| {
        b.iter(|| {
            let _ = partition_hierarchy(black_box(&root), black_box(900.0), black_box(550.0))
                .expect("partition should succeed");
        })
    });
}

fn bench_heat_map_cells_3k(c: &mut Criterion) {
    let points: Vec<DataPoint> = (0..3_000)
        .map(|i| {
            let year = 1753 + (i / 12) as i64;
            let month = 1 + (i % 12) as i64;
            DataPoint::new(PointKey(i), ((i * 37 % 101) as f64 - 50.0) / 10.0)
                .with_attribute("year", AttrValue::Integer(year))
                .with_attribute("month", AttrValue::Integer(month))
        })
        .collect();

    let x = derive_scale(
        &points,
        &AxisSpec::linear(ValueField::attribute("year"), (50.0, 750.0)),
    )
    .expect("year scale");
    let y = derive_scale(&points, &AxisSpec::band((1..=12).collect(), (30.0, 400.0)))
        .expect("month scale");
    let scales = ScaleSet::xy(x, y)
        .with_intensity(IntensityRange::from_points(&points, &ValueField::Metric));
    let spec = MarkSpec::Cells {
        x: ValueField::attribute("year"),
        band: ValueField::attribute("month"),
        step: 1.0,
    };

    c.bench_function("heat_map_cells_3k", |b| {
        b.iter(|| {
            let _ = build_marks(black_box(&points), black_box(&scales), black_box(&spec))
                .expect("cells should build");
        })
    });
}

criterion_group!(benches, bench_treemap_partition_2k, bench_heat_map_cells_3k);
criterion_main!(benches);
