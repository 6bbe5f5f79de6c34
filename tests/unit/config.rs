use super::*;

#[test]
fn minimal_json_fills_defaults() {
    let cfg = ReelConfig::from_json_str(
        r#"{"catalog":{"mode":"fixed","set":{"prefix":"frames/f_","extension":"jpg","frame_count":12}}}"#,
    )
    .unwrap();
    assert_eq!(cfg.debounce(), Duration::from_millis(150));
    assert_eq!(cfg.settle_frames, 2);
    assert_eq!(cfg.scroll_distance_px, 2000.0);
    assert_eq!(cfg.scrub(), Duration::from_secs(1));
    assert_eq!(cfg.load_policy(), LoadPolicy::default());
    let CatalogConfig::Fixed { set } = &cfg.catalog else {
        panic!("expected fixed catalog");
    };
    assert_eq!(set.aspect_ratio, DEFAULT_ASPECT_RATIO);
    assert!(!cfg.catalog().unwrap().is_responsive());
}

#[test]
fn responsive_catalog_parses() {
    let cfg = ReelConfig::from_json_str(
        r#"{
            "catalog": {
                "mode": "responsive",
                "wide": {"prefix": "wide/f_", "extension": "webp", "frame_count": 100},
                "tall": {"prefix": "tall/f_", "extension": "webp", "frame_count": 80, "aspect_ratio": 0.5625}
            },
            "debounce_ms": 50,
            "max_in_flight": 4
        }"#,
    )
    .unwrap();
    assert!(cfg.catalog().unwrap().is_responsive());
    assert_eq!(cfg.debounce(), Duration::from_millis(50));
    assert_eq!(cfg.load_policy().max_in_flight, NonZeroUsize::new(4));
}

#[test]
fn invalid_values_are_rejected() {
    let zero_frames =
        r#"{"catalog":{"mode":"fixed","set":{"prefix":"f_","extension":"png","frame_count":0}}}"#;
    assert!(matches!(
        ReelConfig::from_json_str(zero_frames),
        Err(ReelError::Validation(_))
    ));

    let mut cfg = ReelConfig::default();
    cfg.scroll_distance_px = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.max_in_flight = Some(0);
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.scrub_secs = -1.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_serde_error() {
    assert!(matches!(
        ReelConfig::from_json_str("{"),
        Err(ReelError::Serde(_))
    ));
}

#[test]
fn default_round_trips_through_json() {
    let cfg = ReelConfig::default();
    cfg.validate().unwrap();
    let back = ReelConfig::from_json_str(&cfg.to_json_pretty().unwrap()).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn missing_file_is_reported() {
    let err = ReelConfig::from_json_path(Path::new("no/such/config.json")).unwrap_err();
    assert!(err.to_string().contains("config.json"));
}
