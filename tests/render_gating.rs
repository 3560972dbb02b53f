use screen_ruler::geometry::{PointI, RectI};
use screen_ruler::overlay::render::{visibility_transition, FrameDecision};

const MONITOR: RectI = RectI::new(0, 0, 1920, 1080);
const TOOLBAR: RectI = RectI::new(860, 0, 1060, 40);

/// Replays a cursor path the way the render loop does and collects the
/// visibility edges it would act on.
fn replay(path: &[PointI]) -> Vec<bool> {
    let mut on_screen = true;
    let mut transitions = Vec::new();
    for &cursor in path {
        let decision = FrameDecision::evaluate(cursor, MONITOR, TOOLBAR);
        if let Some(now) = visibility_transition(on_screen, decision.cursor_on_screen) {
            on_screen = now;
            transitions.push(now);
        }
    }
    transitions
}

#[test]
fn repeated_frames_on_one_side_produce_no_transitions() {
    let inside = vec![PointI::new(100, 100); 50];
    assert!(replay(&inside).is_empty());
}

#[test]
fn each_boundary_crossing_produces_exactly_one_transition() {
    let path = [
        PointI::new(500, 500),
        PointI::new(-40, 500), // leaves
        PointI::new(-45, 510),
        PointI::new(10, 500), // returns
        PointI::new(11, 501),
        PointI::new(2000, 500), // leaves on the other edge
    ];
    assert_eq!(replay(&path), vec![false, true, false]);
}

#[test]
fn toolbar_hover_gates_drawing_without_touching_visibility() {
    let path = [PointI::new(900, 20), PointI::new(900, 20)];
    assert!(replay(&path).is_empty());

    let decision = FrameDecision::evaluate(PointI::new(900, 20), MONITOR, TOOLBAR);
    assert!(decision.cursor_on_screen);
    assert!(!decision.should_draw());
}

#[test]
fn monitor_edges_are_half_open() {
    assert!(FrameDecision::evaluate(PointI::new(0, 0), MONITOR, TOOLBAR).cursor_on_screen);
    assert!(!FrameDecision::evaluate(PointI::new(1920, 0), MONITOR, TOOLBAR).cursor_on_screen);
    assert!(!FrameDecision::evaluate(PointI::new(0, 1080), MONITOR, TOOLBAR).cursor_on_screen);
}
