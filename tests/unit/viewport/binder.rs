use super::*;
use crate::foundation::core::Size;

fn metrics(w: f64, h: f64) -> ViewportMetrics {
    ViewportMetrics::new(Size::new(w, h), 1.0).unwrap()
}

fn binder() -> ViewportBinder {
    let mut b = ViewportBinder::new(Duration::from_millis(150), 2);
    b.subscribe();
    b
}

#[test]
fn measurement_waits_for_debounce_then_two_frames() {
    let mut b = binder();
    assert!(b.on_resize_notified(TimestampMs(0)));
    assert!(!b.on_animation_frame());
    assert!(!b.on_time(TimestampMs(100)));
    assert!(!b.on_time(TimestampMs(150)));
    assert!(!b.on_animation_frame());
    assert!(b.on_animation_frame());
    assert!(!b.is_pending());
}

#[test]
fn burst_of_notifications_yields_one_pass() {
    let mut b = binder();
    b.on_resize_notified(TimestampMs(0));
    b.on_resize_notified(TimestampMs(100));
    assert!(!b.on_time(TimestampMs(160)));

    let mut passes = 0;
    for t in [200, 250, 300, 400] {
        b.on_time(TimestampMs(t));
        for _ in 0..3 {
            if b.on_animation_frame() {
                passes += 1;
            }
        }
    }
    assert_eq!(passes, 1);
}

#[test]
fn notification_during_settle_restarts_debounce() {
    let mut b = binder();
    b.on_resize_notified(TimestampMs(0));
    b.on_time(TimestampMs(150));
    assert!(!b.on_animation_frame());
    b.on_resize_notified(TimestampMs(160));
    assert!(!b.on_animation_frame());
    assert!(!b.on_animation_frame());
    b.on_time(TimestampMs(310));
    assert!(!b.on_animation_frame());
    assert!(b.on_animation_frame());
}

#[test]
fn zero_settle_frames_measures_on_debounce() {
    let mut b = ViewportBinder::new(Duration::from_millis(150), 0);
    b.subscribe();
    b.on_resize_notified(TimestampMs(0));
    assert!(b.on_time(TimestampMs(150)));
}

#[test]
fn unsubscribed_binder_ignores_everything() {
    let mut b = binder();
    b.on_resize_notified(TimestampMs(0));
    b.unsubscribe();
    assert!(!b.is_pending());
    assert!(!b.on_resize_notified(TimestampMs(10)));
    assert!(!b.on_time(TimestampMs(1_000)));
    assert!(!b.on_animation_frame());
}

#[test]
fn assess_reloads_only_for_responsive_mismatch() {
    let tall = metrics(390.0, 844.0);
    assert_eq!(
        ViewportBinder::assess(Some(tall), OrientationClass::Wide, true),
        ViewportDecision::Reload {
            orientation: OrientationClass::Tall,
            metrics: tall
        }
    );
    assert_eq!(
        ViewportBinder::assess(Some(tall), OrientationClass::Any, false),
        ViewportDecision::Resize { metrics: tall }
    );
    let wide = metrics(1280.0, 720.0);
    assert_eq!(
        ViewportBinder::assess(Some(wide), OrientationClass::Wide, true),
        ViewportDecision::Resize { metrics: wide }
    );
    assert_eq!(
        ViewportBinder::assess(None, OrientationClass::Wide, true),
        ViewportDecision::Deferred
    );
}
