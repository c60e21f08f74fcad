use std::cell::RefCell;
use std::rc::Rc;

use chart_marks::api::{ChartConfig, ChartDataset, ChartKind, ChartRenderer};
use chart_marks::core::{CategoryColorPolicy, Mark, MarkKey, MarkShape, PointKey, Viewport};
use chart_marks::interaction::{OverlayCallbacks, PointerDispatcher};
use chart_marks::render::{
    Color, DrawingSurface, NullSurface, Palette, RectPrimitive, RenderFrame, SvgSurface,
};

const TREEMAP: &str = r#"{"name":"Kickstarter","children":[
    {"name":"Product Design","children":[
        {"name":"Pebble Time","category":"Product Design","value":"20338986"},
        {"name":"COOLEST COOLER","category":"Product Design","value":"13285226"}
    ]},
    {"name":"Tabletop Games","children":[
        {"name":"Exploding Kittens","category":"Tabletop Games","value":"8782571"}
    ]}
]}"#;

fn treemap_chart() -> (ChartRenderer, ChartDataset) {
    let config = ChartConfig::for_kind(ChartKind::Treemap)
        .with_color_policy(CategoryColorPolicy::RootChildIndex);
    (
        ChartRenderer::new(config).expect("valid config"),
        ChartDataset::Treemap(TREEMAP.to_owned()),
    )
}

#[test]
fn svg_surface_serializes_marks_with_keys() {
    let (renderer, dataset) = treemap_chart();
    let mut surface = SvgSurface::new();
    let mut dispatcher = PointerDispatcher::new();

    let (prepared, _disposer) = renderer
        .render(&dataset, &mut surface, &mut dispatcher, OverlayCallbacks::new(|_, _| {}, || {}))
        .expect("render succeeds");
    let svg = surface.to_svg_string();

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" "));
    assert!(svg.contains("width=\"900\" height=\"550\""));
    assert_eq!(svg.matches("<rect ").count(), prepared.marks.len());
    for mark in &prepared.marks {
        assert!(svg.contains(&format!("data-mark=\"{}\"", mark.key.0)));
    }
    assert!(svg.contains(">Pebble </text>") || svg.contains(">Pebble</text>"));
    assert!(svg.contains(">Kittens</text>"));
}

#[test]
fn svg_text_is_escaped() {
    let frame = RenderFrame::new(Viewport::new(100, 100)).with_text(
        chart_marks::render::TextPrimitive::new(
            "Fish & <Chips>",
            10.0,
            10.0,
            10.0,
            Color::rgb(0.0, 0.0, 0.0),
            chart_marks::render::TextHAlign::Left,
        ),
    );
    let mut surface = SvgSurface::new();
    surface.mount(&frame).expect("mount");

    assert!(surface.to_svg_string().contains("Fish &amp; &lt;Chips&gt;"));
}

#[test]
fn clearing_surface_drops_previous_content() {
    let (renderer, dataset) = treemap_chart();
    let mut surface = SvgSurface::new();
    let prepared = renderer.prepare(&dataset).expect("prepare");

    surface.mount(&prepared.frame).expect("mount");
    let first = surface.element_count();
    surface.clear();
    assert!(surface.is_empty());

    surface.mount(&prepared.frame).expect("mount again");
    assert_eq!(surface.element_count(), first);
}

#[test]
fn invalid_frame_is_rejected_before_drawing() {
    let frame = RenderFrame::new(Viewport::new(100, 100)).with_rect(RectPrimitive {
        x: 0.0,
        y: 0.0,
        width: -1.0,
        height: 5.0,
        fill: Color::rgb(1.0, 0.0, 0.0),
        mark: None,
    });
    let mut surface = NullSurface::default();

    assert!(surface.mount(&frame).is_err());
    assert!(surface.is_empty());
}

#[test]
fn frame_from_marks_applies_opacity_and_category_colors() {
    let palette = Palette::default();
    let marks = vec![
        Mark {
            key: MarkKey(0),
            point: PointKey(0),
            shape: MarkShape::rect_between(0.0, 0.0, 10.0, 10.0),
            opacity: 0.5,
            emphasis: false,
            color_slot: None,
            label_lines: Vec::new(),
        },
        Mark {
            key: MarkKey(1),
            point: PointKey(1),
            shape: MarkShape::rect_between(10.0, 0.0, 20.0, 10.0),
            opacity: 1.0,
            emphasis: false,
            color_slot: Some(19),
            label_lines: vec!["Wii ".to_owned(), "Sports".to_owned()],
        },
        Mark {
            key: MarkKey(2),
            point: PointKey(2),
            shape: MarkShape::Circle { cx: 5.0, cy: 5.0, r: 2.0 },
            opacity: 1.0,
            emphasis: true,
            color_slot: None,
            label_lines: Vec::new(),
        },
    ];

    let frame = RenderFrame::from_marks(Viewport::new(100, 100), &marks, &palette);

    assert_eq!(frame.mark_primitive_count(), 3);
    assert_eq!(frame.rects[0].fill, palette.base.faded(0.5));
    assert_eq!(frame.rects[1].fill, palette.category(19));
    assert_eq!(palette.category(19), palette.category(1));
    assert_eq!(frame.texts.len(), 2);
    assert_eq!(frame.texts[0].text, "Wii");
    assert!(frame.circles[0].stroke.is_none());
}

#[test]
fn overlay_routes_pointer_to_svg_mark_points() {
    let (renderer, dataset) = treemap_chart();
    let mut surface = SvgSurface::new();
    let mut dispatcher = PointerDispatcher::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let (prepared, mut disposer) = renderer
        .render(
            &dataset,
            &mut surface,
            &mut dispatcher,
            OverlayCallbacks::new(
                move |point, _| {
                    let name = point.text("name").unwrap_or_default().to_owned();
                    sink.borrow_mut().push(name);
                },
                || {},
            ),
        )
        .expect("render");

    let first = &prepared.marks[0];
    let (x0, y0, x1, y1) = first.shape.bounds().expect("rect bounds");
    dispatcher.dispatch(chart_marks::interaction::PointerEvent::Move(
        chart_marks::core::PointerPosition {
            x: (x0 + x1) / 2.0,
            y: (y0 + y1) / 2.0,
        },
    ));

    assert_eq!(*seen.borrow(), vec!["Pebble Time".to_owned()]);
    assert!(disposer.dispose(&mut dispatcher));
}
