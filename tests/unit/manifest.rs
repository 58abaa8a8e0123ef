use serde_json::json;

use super::*;
use crate::model::{Animation, StateMachine, Theme};

fn registry() -> AssetRegistry {
    let mut reg = AssetRegistry::new();
    reg.add_animation(
        Animation::new("bull", json!({}))
            .unwrap()
            .with_default_active(true)
            .with_background(Some("#101010".to_owned())),
    )
    .unwrap();
    reg.add_animation(
        Animation::new("cow", json!({}))
            .unwrap()
            .with_initial_theme(Some("dark".to_owned())),
    )
    .unwrap();
    reg.add_theme(Theme::new("dark", json!({ "rules": [] })).unwrap())
        .unwrap();
    reg.assign_theme("dark", "cow").unwrap();
    reg.add_state_machine(StateMachine::new("flow", json!({})).unwrap())
        .unwrap();
    reg
}

#[test]
fn current_projection_emits_only_non_default_fields() {
    let m = Manifest::project_parts(FormatVersion::V2, &BundleMetadata::default(), &registry());
    let v: Value = serde_json::from_slice(&m.to_json_bytes().unwrap()).unwrap();
    assert_eq!(v["version"], "2");
    assert_eq!(v["generator"], crate::model::GENERATOR);
    assert_eq!(
        v["animations"],
        json!([
            { "id": "bull", "background": "#101010" },
            { "id": "cow", "initialTheme": "dark", "themes": ["dark"] }
        ])
    );
    assert_eq!(v["themes"], json!([{ "id": "dark" }]));
    assert_eq!(v["stateMachines"], json!([{ "id": "flow" }]));
    assert_eq!(v["initial"], json!({ "animation": "bull" }));
}

#[test]
fn initial_pointer_requires_exactly_one_active_animation() {
    let mut reg = registry();
    reg.update_animation("cow", |a| Ok(a.with_default_active(true)))
        .unwrap();
    let Manifest::V2(m) = Manifest::project_parts(FormatVersion::V2, &BundleMetadata::default(), &reg)
    else {
        panic!("expected current manifest");
    };
    assert_eq!(m.initial, None);
}

#[test]
fn legacy_projection_carries_metadata_and_playback() {
    let mut reg = AssetRegistry::new();
    reg.add_animation(
        Animation::new("bull", json!({}))
            .unwrap()
            .with_default_active(true)
            .with_playback(PlaybackSettings {
                speed: Some(2.0),
                autoplay: Some(true),
                ..PlaybackSettings::default()
            })
            .unwrap(),
    )
    .unwrap();
    let metadata = BundleMetadata {
        author: Some("studio".to_owned()),
        revision: Some(3),
        ..BundleMetadata::default()
    };
    let m = Manifest::project_parts(FormatVersion::V1, &metadata, &reg);
    let v: Value = serde_json::from_slice(&m.to_json_bytes().unwrap()).unwrap();
    assert_eq!(v["version"], "1");
    assert_eq!(v["author"], "studio");
    assert_eq!(v["revision"], 3);
    assert_eq!(v["activeAnimationId"], "bull");
    assert_eq!(
        v["animations"],
        json!([{ "id": "bull", "speed": 2.0, "autoplay": true }])
    );
    assert!(v.get("themes").is_none());
}

#[test]
fn projection_is_idempotent() {
    let reg = registry();
    let a = Manifest::project_parts(FormatVersion::V2, &BundleMetadata::default(), &reg);
    let b = Manifest::project_parts(FormatVersion::V2, &BundleMetadata::default(), &reg);
    assert_eq!(a, b);
}

#[test]
fn parse_sniffs_version_and_tolerates_legacy_shapes() {
    let legacy = br#"{"version":1.0,"generator":"x","animations":[{"id":"a","loop":true,"speed":1}]}"#;
    let Manifest::V1(m) = Manifest::parse(legacy).unwrap() else {
        panic!("expected legacy manifest");
    };
    assert_eq!(m.animations[0].id, "a");
    assert_eq!(m.animations[0].playback.speed, Some(1.0));

    let current = br#"{"version":"2","animations":[{"id":"a","themes":["t"]}],"themes":[{"id":"t"}]}"#;
    let parsed = Manifest::parse(current).unwrap();
    assert_eq!(parsed.version(), FormatVersion::V2);
    assert_eq!(parsed.animation_ids(), ["a"]);
}

#[test]
fn unparsable_manifest_is_malformed() {
    for bad in [&b"not json"[..], b"[]", br#"{"version":"2","animations":5}"#] {
        assert!(matches!(
            Manifest::parse(bad).unwrap_err(),
            BundleError::MalformedArchive(_)
        ));
    }
}
