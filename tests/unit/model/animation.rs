use serde_json::json;

use super::*;

#[test]
fn inline_animation_exposes_data() {
    let anim = Animation::new("bull", json!({ "v": "5.7.0", "layers": [] })).unwrap();
    assert_eq!(anim.id(), "bull");
    assert_eq!(anim.data().unwrap()["v"], "5.7.0");
    assert!(anim.asset_handles().is_empty());
    assert_eq!(anim.themes().count(), 0);
}

#[test]
fn rejects_empty_id_and_non_lottie_data() {
    assert!(matches!(
        Animation::new("", json!({})).unwrap_err(),
        BundleError::Validation(_)
    ));
    assert!(Animation::new("a", json!([1, 2])).is_err());
    assert!(Animation::new("a", json!({ "layers": {} })).is_err());
    assert!(Animation::from_url("a", "").is_err());
}

#[test]
fn with_functions_validate_and_update() {
    let anim = Animation::new("a", json!({}))
        .unwrap()
        .with_initial_theme(Some("dark".to_owned()))
        .with_background(Some("#000000".to_owned()))
        .with_default_active(true);
    assert_eq!(anim.initial_theme(), Some("dark"));
    assert_eq!(anim.background(), Some("#000000"));
    assert!(anim.is_default_active());

    let bad = PlaybackSettings {
        speed: Some(0.0),
        ..PlaybackSettings::default()
    };
    assert!(anim.clone().with_playback(bad).is_err());
    let bad_dir = PlaybackSettings {
        direction: Some(2),
        ..PlaybackSettings::default()
    };
    assert!(anim.with_playback(bad_dir).is_err());
}

#[test]
fn playback_serializes_with_manifest_field_names() {
    let playback = PlaybackSettings {
        direction: Some(-1),
        speed: Some(1.5),
        play_mode: Some(PlayMode::Bounce),
        loop_setting: Some(LoopSetting::Count(3)),
        theme_color: Some("#ffffff".to_owned()),
        ..PlaybackSettings::default()
    };
    let v = serde_json::to_value(&playback).unwrap();
    assert_eq!(
        v,
        json!({
            "direction": -1,
            "speed": 1.5,
            "playMode": "bounce",
            "loop": 3,
            "themeColor": "#ffffff"
        })
    );
    let back: PlaybackSettings = serde_json::from_value(json!({ "loop": true })).unwrap();
    assert_eq!(back.loop_setting, Some(LoopSetting::Enabled(true)));
    assert!(PlaybackSettings::default().is_empty());
}

#[test]
fn clearing_initial_theme_only_matches_same_id() {
    let mut anim = Animation::new("a", json!({}))
        .unwrap()
        .with_initial_theme(Some("dark".to_owned()));
    anim.clear_initial_theme_if("light");
    assert_eq!(anim.initial_theme(), Some("dark"));
    anim.clear_initial_theme_if("dark");
    assert_eq!(anim.initial_theme(), None);
}
