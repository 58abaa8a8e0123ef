use serde_json::json;

use super::*;

fn anim(id: &str) -> Animation {
    Animation::new(id, json!({ "assets": [], "layers": [] })).unwrap()
}

fn image(name: &str) -> Asset {
    Asset::new(AssetKind::Image, name, vec![1, 2, 3]).unwrap()
}

fn owners(reg: &AssetRegistry, h: AssetHandle) -> Vec<String> {
    reg.asset(h).unwrap().owners().to_vec()
}

#[test]
fn duplicate_animation_id_leaves_registry_unchanged() {
    let mut reg = AssetRegistry::new();
    reg.add_animation(anim("a")).unwrap();
    let err = reg.add_animation(anim("a")).unwrap_err();
    assert!(matches!(
        err,
        BundleError::DuplicateId {
            kind: EntityKind::Animation,
            ..
        }
    ));
    assert_eq!(reg.animation_count(), 1);
}

#[test]
fn asset_requires_known_owner_and_unique_id_per_owner() {
    let mut reg = AssetRegistry::new();
    assert!(matches!(
        reg.add_asset("ghost", image("image_0.png")).unwrap_err(),
        BundleError::Validation(_)
    ));
    reg.add_animation(anim("a")).unwrap();
    reg.add_animation(anim("b")).unwrap();
    reg.add_asset("a", image("image_0.png")).unwrap();
    assert!(matches!(
        reg.add_asset("a", image("image_0.jpg")).unwrap_err(),
        BundleError::DuplicateId { .. }
    ));
    // Same id under another owner is fine before renaming.
    reg.add_asset("b", image("image_0.png")).unwrap();
    // Same id with another kind is fine too.
    reg.add_asset("a", Asset::new(AssetKind::Audio, "image_0.mp3", vec![]).unwrap())
        .unwrap();
    assert_eq!(reg.asset_count(), 3);
}

#[test]
fn links_are_bidirectional() {
    let mut reg = AssetRegistry::new();
    reg.add_animation(anim("a")).unwrap();
    reg.add_animation(anim("b")).unwrap();
    let h = reg.add_asset("a", image("image_0.png")).unwrap();
    reg.link_asset(h, "b").unwrap();
    reg.link_asset(h, "b").unwrap();
    assert_eq!(owners(&reg, h), ["a", "b"]);
    assert_eq!(reg.animation("b").unwrap().asset_handles(), [h]);
    assert_eq!(reg.flattened_assets(AssetKind::Image), [h]);
}

#[test]
fn removing_animation_drops_sole_owned_assets_only() {
    let mut reg = AssetRegistry::new();
    reg.add_animation(anim("a")).unwrap();
    reg.add_animation(anim("b")).unwrap();
    let shared = reg.add_asset("a", image("image_0.png")).unwrap();
    let solo = reg.add_asset("a", image("image_1.png")).unwrap();
    reg.link_asset(shared, "b").unwrap();
    reg.add_theme(Theme::new("dark", json!({ "rules": [] })).unwrap())
        .unwrap();
    reg.assign_theme("dark", "a").unwrap();

    let removed = reg.remove_animation("a").unwrap();
    assert_eq!(removed.id(), "a");
    assert!(reg.asset(solo).is_none());
    assert_eq!(owners(&reg, shared), ["b"]);
    assert_eq!(reg.theme("dark").unwrap().animations().count(), 0);
    assert!(reg.remove_animation("a").is_none());
}

#[test]
fn removing_theme_unscopes_and_clears_initial_pointer() {
    let mut reg = AssetRegistry::new();
    reg.add_animation(anim("a").with_initial_theme(Some("light".to_owned())))
        .unwrap();
    reg.add_theme(Theme::new("light", json!({ "rules": [] })).unwrap())
        .unwrap();
    reg.assign_theme("light", "a").unwrap();
    assert_eq!(reg.animation("a").unwrap().themes().collect::<Vec<_>>(), ["light"]);

    reg.remove_theme("light").unwrap();
    let a = reg.animation("a").unwrap();
    assert_eq!(a.themes().count(), 0);
    assert_eq!(a.initial_theme(), None);
    assert!(reg.remove_theme("light").is_none());
}

#[test]
fn assignment_requires_both_ends() {
    let mut reg = AssetRegistry::new();
    reg.add_animation(anim("a")).unwrap();
    assert!(matches!(
        reg.assign_theme("nope", "a").unwrap_err(),
        BundleError::DanglingReference(_)
    ));
    reg.add_theme(Theme::new("t", json!({})).unwrap()).unwrap();
    assert!(reg.assign_theme("t", "nope").is_err());
    assert!(!reg.unassign_theme("t", "a"));
    reg.assign_theme("t", "a").unwrap();
    assert!(reg.unassign_theme("t", "a"));
}

#[test]
fn update_keeps_links_and_id() {
    let mut reg = AssetRegistry::new();
    reg.add_animation(anim("a")).unwrap();
    let h = reg.add_asset("a", image("image_0.png")).unwrap();
    reg.update_animation("a", |a| Ok(a.with_default_active(true)))
        .unwrap();
    let a = reg.animation("a").unwrap();
    assert!(a.is_default_active());
    assert_eq!(a.asset_handles(), [h]);

    let err = reg
        .update_animation("a", |_| Animation::new("b", json!({})))
        .unwrap_err();
    assert!(matches!(err, BundleError::Validation(_)));
    assert!(reg.update_animation("zzz", Ok).is_err());
}

#[test]
fn rename_rewrites_every_owner_simultaneously() {
    let mut reg = AssetRegistry::new();
    let data = json!({
        "assets": [
            { "id": "x", "w": 1, "h": 1, "u": "/i/", "p": "image_0.png", "e": 0 },
            { "id": "y", "w": 1, "h": 1, "u": "/i/", "p": "image_1.png", "e": 0 }
        ]
    });
    reg.add_animation(Animation::new("a", data.clone()).unwrap()).unwrap();
    reg.add_animation(Animation::new("b", data).unwrap()).unwrap();
    let h0 = reg.add_asset("a", image("image_0.png")).unwrap();
    let h1 = reg.add_asset("a", image("image_1.png")).unwrap();
    reg.link_asset(h0, "b").unwrap();
    reg.link_asset(h1, "b").unwrap();

    let swap = HashMap::from([(h0, "image_1".to_owned()), (h1, "image_0".to_owned())]);
    assert_eq!(reg.rename_assets(AssetKind::Image, &swap), 4);
    assert_eq!(reg.asset(h0).unwrap().file_name(), "image_1.png");
    for id in ["a", "b"] {
        let d = reg.animation(id).unwrap().data().unwrap();
        assert_eq!(d["assets"][0]["p"], "image_1.png");
        assert_eq!(d["assets"][1]["p"], "image_0.png");
    }
}

#[test]
fn merge_replaces_in_place_and_drops_duplicate() {
    let mut reg = AssetRegistry::new();
    let data_a = json!({ "assets": [
        { "id": "x", "w": 1, "h": 1, "p": "image_0.png", "e": 0 }
    ]});
    let data_b = json!({ "assets": [
        { "id": "p", "w": 1, "h": 1, "p": "image_9.png", "e": 0 },
        { "id": "q", "w": 1, "h": 1, "p": "image_1.png", "e": 0 }
    ]});
    reg.add_animation(Animation::new("a", data_a).unwrap()).unwrap();
    reg.add_animation(Animation::new("b", data_b).unwrap()).unwrap();
    let canon = reg.add_asset("a", image("image_0.png")).unwrap();
    let other = reg.add_asset("b", image("image_9.png")).unwrap();
    let dup = reg.add_asset("b", image("image_1.png")).unwrap();

    reg.merge_asset(dup, canon).unwrap();
    assert!(reg.asset(dup).is_none());
    assert_eq!(reg.animation("b").unwrap().asset_handles(), [other, canon]);
    assert_eq!(owners(&reg, canon), ["a", "b"]);
    let b = reg.animation("b").unwrap().data().unwrap();
    assert_eq!(b["assets"][1]["p"], "image_0.png");
    assert_eq!(b["assets"][0]["p"], "image_9.png");
}

#[test]
fn state_machines_are_unique_by_id() {
    let mut reg = AssetRegistry::new();
    reg.add_state_machine(StateMachine::new("sm", json!({})).unwrap())
        .unwrap();
    assert!(reg
        .add_state_machine(StateMachine::new("sm", json!({})).unwrap())
        .is_err());
    assert_eq!(reg.state_machines().count(), 1);
    assert!(reg.remove_state_machine("sm").is_some());
    assert!(reg.state_machine("sm").is_none());
}
