use std::cell::RefCell;
use std::rc::Rc;

use chart_marks::core::{
    AttrValue, AxisSpec, DataPoint, Mark, MarkSpec, PointKey, PointerPosition, ScaleSet,
    ValueField, build_marks, derive_scale,
};
use chart_marks::interaction::{
    OverlayCallbacks, OverlayState, PointerDispatcher, PointerEvent, attach_interaction_overlay,
};

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Enter(PointKey),
    Leave,
    Activate(PointKey),
}

fn recording_callbacks(log: &Rc<RefCell<Vec<Seen>>>) -> OverlayCallbacks {
    let enter_log = Rc::clone(log);
    let leave_log = Rc::clone(log);
    let activate_log = Rc::clone(log);
    OverlayCallbacks::new(
        move |point, _| enter_log.borrow_mut().push(Seen::Enter(point.key)),
        move || leave_log.borrow_mut().push(Seen::Leave),
    )
    .with_activate(move |point| activate_log.borrow_mut().push(Seen::Activate(point.key)))
}

/// Three dots at x = 100, 200, 300 on y = 100, radius 5.
fn dot_chart() -> (Vec<DataPoint>, Vec<Mark>) {
    let points: Vec<DataPoint> = (0..3)
        .map(|index| {
            DataPoint::new(PointKey(index), 10.0)
                .with_attribute("x", AttrValue::Integer(index as i64 + 1))
        })
        .collect();
    let x = derive_scale(&points, &AxisSpec::linear(ValueField::attribute("x"), (100.0, 300.0)))
        .expect("x");
    let y = derive_scale(&points, &AxisSpec::linear(ValueField::Metric, (100.0, 100.0)))
        .expect("y");
    let marks = build_marks(
        &points,
        &ScaleSet::xy(x, y),
        &MarkSpec::Dots {
            x: ValueField::attribute("x"),
            y: ValueField::Metric,
            radius: 5.0,
            emphasis: None,
        },
    )
    .expect("marks");
    (points, marks)
}

fn at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Move(PointerPosition { x, y })
}

#[test]
fn enter_and_leave_follow_pointer() {
    let (points, marks) = dot_chart();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = PointerDispatcher::new();
    let disposer =
        attach_interaction_overlay(&mut dispatcher, &marks, &points, recording_callbacks(&log));
    let id = disposer.listener_id().expect("attached");

    assert_eq!(dispatcher.overlay_state(id), Some(OverlayState::Idle));

    dispatcher.dispatch(at(200.0, 101.0));
    assert_eq!(dispatcher.overlay_state(id), Some(OverlayState::Hovering(marks[1].key)));

    dispatcher.dispatch(at(250.0, 100.0));
    assert_eq!(dispatcher.overlay_state(id), Some(OverlayState::Idle));

    assert_eq!(*log.borrow(), vec![Seen::Enter(PointKey(1)), Seen::Leave]);
}

#[test]
fn moving_between_marks_leaves_before_entering() {
    let (points, marks) = dot_chart();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = PointerDispatcher::new();
    let _disposer =
        attach_interaction_overlay(&mut dispatcher, &marks, &points, recording_callbacks(&log));

    dispatcher.dispatch(at(100.0, 100.0));
    dispatcher.dispatch(at(300.0, 100.0));

    assert_eq!(
        *log.borrow(),
        vec![Seen::Enter(PointKey(0)), Seen::Leave, Seen::Enter(PointKey(2))]
    );
}

#[test]
fn moving_within_a_mark_refreshes_enter() {
    let (points, marks) = dot_chart();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = PointerDispatcher::new();
    let _disposer =
        attach_interaction_overlay(&mut dispatcher, &marks, &points, recording_callbacks(&log));

    dispatcher.dispatch(at(100.0, 100.0));
    dispatcher.dispatch(at(102.0, 101.0));

    assert_eq!(
        *log.borrow(),
        vec![Seen::Enter(PointKey(0)), Seen::Enter(PointKey(0))]
    );
}

#[test]
fn pointer_leave_returns_to_idle_once() {
    let (points, marks) = dot_chart();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = PointerDispatcher::new();
    let _disposer =
        attach_interaction_overlay(&mut dispatcher, &marks, &points, recording_callbacks(&log));

    dispatcher.dispatch(PointerEvent::Leave);
    dispatcher.dispatch(at(100.0, 100.0));
    dispatcher.dispatch(PointerEvent::Leave);
    dispatcher.dispatch(PointerEvent::Leave);

    assert_eq!(*log.borrow(), vec![Seen::Enter(PointKey(0)), Seen::Leave]);
}

#[test]
fn activate_resolves_mark_under_pointer() {
    let (points, marks) = dot_chart();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = PointerDispatcher::new();
    let _disposer =
        attach_interaction_overlay(&mut dispatcher, &marks, &points, recording_callbacks(&log));

    dispatcher.dispatch(PointerEvent::Activate(PointerPosition { x: 300.0, y: 98.0 }));
    dispatcher.dispatch(PointerEvent::Activate(PointerPosition { x: 10.0, y: 10.0 }));

    assert_eq!(*log.borrow(), vec![Seen::Activate(PointKey(2))]);
}

#[test]
fn disposed_overlay_receives_no_events() {
    let (points, marks) = dot_chart();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = PointerDispatcher::new();
    let mut disposer =
        attach_interaction_overlay(&mut dispatcher, &marks, &points, recording_callbacks(&log));

    assert!(disposer.dispose(&mut dispatcher));
    assert!(disposer.is_disposed());
    assert_eq!(dispatcher.listener_count(), 0);

    dispatcher.dispatch(at(100.0, 100.0));
    dispatcher.dispatch(PointerEvent::Leave);
    dispatcher.dispatch(PointerEvent::Activate(PointerPosition { x: 100.0, y: 100.0 }));

    assert!(log.borrow().is_empty());
    assert!(!disposer.dispose(&mut dispatcher));
}

#[test]
fn overlays_are_independent() {
    let (points, marks) = dot_chart();
    let first_log = Rc::new(RefCell::new(Vec::new()));
    let second_log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = PointerDispatcher::new();
    let mut first = attach_interaction_overlay(
        &mut dispatcher,
        &marks,
        &points,
        recording_callbacks(&first_log),
    );
    let _second = attach_interaction_overlay(
        &mut dispatcher,
        &marks,
        &points,
        recording_callbacks(&second_log),
    );
    assert_eq!(dispatcher.listener_count(), 2);

    first.dispose(&mut dispatcher);
    dispatcher.dispatch(at(200.0, 100.0));

    assert!(first_log.borrow().is_empty());
    assert_eq!(*second_log.borrow(), vec![Seen::Enter(PointKey(1))]);
}

#[test]
fn marks_without_points_are_not_hoverable() {
    let (points, marks) = dot_chart();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = PointerDispatcher::new();
    let _disposer = attach_interaction_overlay(
        &mut dispatcher,
        &marks,
        &points[..1],
        recording_callbacks(&log),
    );

    dispatcher.dispatch(at(200.0, 100.0));
    dispatcher.dispatch(at(100.0, 100.0));

    assert_eq!(*log.borrow(), vec![Seen::Enter(PointKey(0))]);
}
