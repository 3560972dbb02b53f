use screen_ruler::colors::OverlayColor;
use screen_ruler::geometry::{PointF, RectI};
use screen_ruler::overlay::events::{handle_measure_event, EventResponse, OverlayEvent};
use screen_ruler::state::{CommonState, Measurement, MeasureToolState};

fn common() -> CommonState {
    CommonState::new(
        RectI::default(),
        OverlayColor::opaque(1.0, 0.4, 0.0),
        false,
        Box::new(|| {}),
    )
}

#[test]
fn release_copies_whatever_label_is_current() {
    let common = common();
    let mut copied = Vec::new();
    let mut sink = |text: &str| copied.push(text.to_owned());

    common.overlay_box_text.set("800 × 600");
    handle_measure_event(&common, OverlayEvent::LeftButtonUp, &mut sink);
    common.overlay_box_text.set("10 × 10");
    handle_measure_event(&common, OverlayEvent::LeftButtonUp, &mut sink);

    assert_eq!(copied, vec!["800 × 600".to_owned(), "10 × 10".to_owned()]);
}

#[test]
fn close_request_destroys_and_escape_requests_close() {
    let common = common();
    let mut sink = |_: &str| {};
    assert_eq!(
        handle_measure_event(&common, OverlayEvent::CloseRequested, &mut sink),
        EventResponse::Destroy
    );
    assert_eq!(
        handle_measure_event(&common, OverlayEvent::EscapeReleased, &mut sink),
        EventResponse::RequestClose
    );
}

#[test]
fn recorded_measurements_accumulate_until_cleared() {
    let tool = MeasureToolState::new();
    tool.record(Measurement {
        start: PointF::new(0.0, 0.0),
        end: PointF::new(100.0, 0.0),
    });
    tool.record(Measurement {
        start: PointF::new(5.0, 5.0),
        end: PointF::new(5.0, 45.0),
    });
    assert_eq!(tool.read(<[Measurement]>::len), 2);
    tool.clear();
    assert_eq!(tool.read(<[Measurement]>::len), 0);
}
