use screen_ruler::colors::OverlayColor;
use screen_ruler::geometry::RectI;
use screen_ruler::state::CommonState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn every_overlay_thread_may_signal_but_the_callback_runs_once() {
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_in_callback = Arc::clone(&fired);
    let common = Arc::new(CommonState::new(
        RectI::default(),
        OverlayColor::opaque(1.0, 0.4, 0.0),
        false,
        Box::new(move || {
            fired_in_callback.fetch_add(1, Ordering::SeqCst);
        }),
    ));

    // One simulated thread per monitor of a large session, all exiting at
    // nearly the same time.
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let common = Arc::clone(&common);
            std::thread::spawn(move || common.signal_session_completed())
        })
        .collect();
    for handle in handles {
        handle.join().expect("overlay thread stand-in");
    }

    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Late signals after the session ended stay silent too.
    common.signal_session_completed();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
