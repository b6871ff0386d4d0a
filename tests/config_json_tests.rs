use scroll_choreo::ChoreoError;
use scroll_choreo::api::{Choreographer, ChoreographerConfig};
use scroll_choreo::core::{Color, ThemePalette, Viewport};
use scroll_choreo::interaction::{InertiaConfig, LoopSettleConfig};
use scroll_choreo::render::RecordingWriter;
use scroll_choreo::scroll::ScrollMode;

#[test]
fn minimal_json_fills_in_defaults() {
    let config = ChoreographerConfig::from_json_str(r#"{ "viewport": { "width": 1440, "height": 900 } }"#)
        .expect("minimal config");
    assert_eq!(config, ChoreographerConfig::new(Viewport::new(1440, 900)));
    assert_eq!(config.scroll_mode, ScrollMode::Native);
    assert_eq!(config.readiness_timeout_ms, 3_000.0);
    assert_eq!(config.inertia, InertiaConfig::default());
    assert_eq!(config.loop_settle, LoopSettleConfig::default());
    assert_eq!(config.palette, ThemePalette::garden());
}

#[test]
fn tuned_config_round_trips() {
    let mut palette = ThemePalette::new();
    palette.insert("ink", Color::from_hex("#1b1f3a").expect("hex"));
    palette.insert("paper", Color::from_hex("#f4f1ea").expect("hex"));

    let config = ChoreographerConfig::new(Viewport::new(390, 844))
        .with_scroll_mode(ScrollMode::smoothed())
        .with_readiness_timeout_ms(1_200.0)
        .with_inertia(InertiaConfig {
            decay_factor: 0.9,
            max_velocity: 80.0,
            stop_velocity_abs: 0.1,
        })
        .with_loop_settle(LoopSettleConfig {
            lerp: 0.25,
            snap_threshold_px: 1.0,
        })
        .with_palette(palette);

    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"mode\": \"smoothed\""));
    assert!(json.contains("\"ink\": \"#1b1f3a\""));
    let parsed = ChoreographerConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn authored_scroll_mode_uses_tagged_form() {
    let config = ChoreographerConfig::from_json_str(
        r#"{
            "viewport": { "width": 1280, "height": 720 },
            "scroll_mode": { "mode": "smoothed", "lerp": 0.2, "snap_threshold_px": 0.75 }
        }"#,
    )
    .expect("config");
    assert_eq!(
        config.scroll_mode,
        ScrollMode::Smoothed {
            lerp: 0.2,
            snap_threshold_px: 0.75
        }
    );
    assert!(config.validate().is_ok());
}

#[test]
fn malformed_json_reports_invalid_data() {
    for input in [
        "",
        "{ \"viewport\": 3 }",
        r##"{ "viewport": { "width": 800, "height": 600 }, "palette": { "bad": "#xyz" } }"##,
    ] {
        let err = ChoreographerConfig::from_json_str(input).expect_err("malformed");
        assert!(matches!(err, ChoreoError::InvalidData(_)), "{input}: {err}");
    }
}

#[test]
fn parsed_but_out_of_range_values_fail_validation() {
    let config = ChoreographerConfig::from_json_str(
        r#"{
            "viewport": { "width": 1280, "height": 720 },
            "scroll_mode": { "mode": "smoothed", "lerp": 2.0, "snap_threshold_px": 0.5 }
        }"#,
    )
    .expect("shape is valid");
    assert!(config.validate().is_err());
    assert!(Choreographer::new(RecordingWriter::default(), config).is_err());

    let zero_height = ChoreographerConfig::new(Viewport::new(1280, 0));
    assert!(matches!(
        zero_height.validate(),
        Err(ChoreoError::InvalidViewport { width: 1280, height: 0 })
    ));

    let frozen = ChoreographerConfig::new(Viewport::new(1280, 720)).with_inertia(InertiaConfig {
        decay_factor: 1.0,
        ..InertiaConfig::default()
    });
    assert!(frozen.validate().is_err());
}
