use super::*;

fn binding(session: u64, range_end: f64) -> ScrubBinding {
    ScrubBinding {
        session: SessionId(session),
        range_end,
        pin: PinRegion {
            pinned_height_px: 720.0,
            scroll_distance_px: 2000.0,
        },
    }
}

#[test]
fn unattached_source_emits_nothing() {
    let mut p = ScrollProgress::new(Duration::ZERO);
    assert!(p.scroll_to(100.0, TimestampMs(0)).is_none());
    assert!(p.tick(TimestampMs(10)).is_none());
}

#[test]
fn immediate_scrub_maps_offset_linearly() {
    let mut p = ScrollProgress::new(Duration::ZERO);
    p.attach(binding(1, 395.0)).unwrap();

    let u = p.scroll_to(1000.0, TimestampMs(0)).unwrap();
    assert_eq!(u.session, SessionId(1));
    assert!((u.value - 197.5).abs() < 1e-9);

    assert_eq!(p.scroll_to(5000.0, TimestampMs(1)).unwrap().value, 395.0);
    assert_eq!(p.scroll_to(-30.0, TimestampMs(2)).unwrap().value, 0.0);
}

#[test]
fn lagged_scrub_eases_toward_target() {
    let mut p = ScrollProgress::new(Duration::from_secs(1));
    p.attach(binding(1, 100.0)).unwrap();

    assert!(p.scroll_to(2000.0, TimestampMs(0)).is_none());
    let half = p.tick(TimestampMs(500)).unwrap().value;
    assert!((half - 50.0).abs() < 1e-9);
    let done = p.tick(TimestampMs(5_000)).unwrap().value;
    assert_eq!(done, 100.0);
    assert!(p.tick(TimestampMs(6_000)).is_none());
}

#[test]
fn refresh_recomputes_target_from_new_extent() {
    let mut p = ScrollProgress::new(Duration::ZERO);
    p.attach(binding(3, 10.0)).unwrap();
    p.scroll_to(1000.0, TimestampMs(0));

    p.refresh(
        SessionId(3),
        PinRegion {
            pinned_height_px: 400.0,
            scroll_distance_px: 1000.0,
        },
    );
    assert_eq!(p.pin().unwrap().pinned_height_px, 400.0);
    assert_eq!(p.tick(TimestampMs(1)).unwrap().value, 10.0);
}

#[test]
fn release_stops_emissions_and_allows_rebinding() {
    let mut p = ScrollProgress::new(Duration::ZERO);
    p.attach(binding(1, 10.0)).unwrap();
    assert!(p.attach(binding(2, 10.0)).is_err());

    p.release(SessionId(9));
    assert!(p.is_attached());
    p.release(SessionId(1));
    assert!(!p.is_attached());
    assert!(p.scroll_to(100.0, TimestampMs(0)).is_none());

    p.attach(binding(2, 10.0)).unwrap();
    assert_eq!(p.session(), Some(SessionId(2)));
}
