use super::*;
use crate::test_support::RecordingProgress;

fn pin(height: f64) -> PinRegion {
    PinRegion {
        pinned_height_px: height,
        scroll_distance_px: 2000.0,
    }
}

#[test]
fn bind_attaches_over_the_frame_range_and_refreshes_once() {
    let mut source = RecordingProgress::default();
    let s = Session::bind(SessionId(4), FrameCount::new(396).unwrap(), pin(720.0), &mut source)
        .unwrap();

    assert_eq!(s.id(), SessionId(4));
    assert_eq!(source.attached.len(), 1);
    assert_eq!(source.attached[0].range_end, 395.0);
    assert_eq!(source.refreshes, [(SessionId(4), pin(720.0))]);
    assert_eq!(s.progress().value(), 0.0);
    assert_eq!(s.frame_index(), FrameIndex(0));
}

#[test]
fn refused_attach_creates_no_session() {
    let mut source = RecordingProgress {
        fail_attach: true,
        ..RecordingProgress::default()
    };
    assert!(
        Session::bind(SessionId(1), FrameCount::new(3).unwrap(), pin(10.0), &mut source).is_err()
    );
    assert!(source.refreshes.is_empty());
}

#[test]
fn progress_is_clamped_into_the_frame_range() {
    let mut source = RecordingProgress::default();
    let mut s =
        Session::bind(SessionId(1), FrameCount::new(10).unwrap(), pin(10.0), &mut source).unwrap();

    assert_eq!(s.apply_progress(3.9), FrameIndex(3));
    assert_eq!(s.progress().value(), 3.9);
    assert_eq!(s.apply_progress(25.0), FrameIndex(9));
    assert_eq!(s.progress().value(), 9.0);
    assert_eq!(s.apply_progress(-4.0), FrameIndex(0));
    assert_eq!(s.apply_progress(f64::NAN), FrameIndex(0));
    assert_eq!(s.progress().value(), 0.0);
}

#[test]
fn refresh_and_release_reach_the_source() {
    let mut source = RecordingProgress::default();
    let mut s =
        Session::bind(SessionId(2), FrameCount::new(5).unwrap(), pin(100.0), &mut source).unwrap();

    s.refresh(pin(250.0), &mut source);
    assert_eq!(s.pin(), pin(250.0));
    assert_eq!(source.refreshes.last(), Some(&(SessionId(2), pin(250.0))));

    s.release(&mut source);
    assert_eq!(source.releases, [SessionId(2)]);
    assert_eq!(source.active, None);
}
