use serde_json::{Value, json};

use super::*;
use crate::model::{Animation, Asset};

fn doc(files: &[&str]) -> Value {
    let assets: Vec<Value> = files
        .iter()
        .map(|f| json!({ "id": f, "w": 1, "h": 1, "u": "/i/", "p": f, "e": 0 }))
        .collect();
    json!({ "assets": assets, "layers": [] })
}

fn registry() -> (AssetRegistry, Vec<AssetHandle>) {
    let mut reg = AssetRegistry::new();
    reg.add_animation(Animation::new("a", doc(&["image_0.png", "image_1.png"])).unwrap())
        .unwrap();
    reg.add_animation(Animation::new("b", doc(&["image_0.png", "image_1.png"])).unwrap())
        .unwrap();
    let mut handles = Vec::new();
    for owner in ["a", "b"] {
        for name in ["image_0.png", "image_1.png"] {
            let asset = Asset::new(AssetKind::Image, name, vec![0]).unwrap();
            handles.push(reg.add_asset(owner, asset).unwrap());
        }
    }
    (reg, handles)
}

#[test]
fn numbering_follows_animation_then_asset_order() {
    let (mut reg, handles) = registry();
    rename_assets(&mut reg);

    let names: Vec<_> = handles
        .iter()
        .map(|h| reg.asset(*h).unwrap().file_name().to_owned())
        .collect();
    assert_eq!(names, ["image_0.png", "image_1.png", "image_2.png", "image_3.png"]);

    let b = reg.animation("b").unwrap().data().unwrap();
    assert_eq!(b["assets"][0]["p"], "image_2.png");
    assert_eq!(b["assets"][1]["p"], "image_3.png");
    let a = reg.animation("a").unwrap().data().unwrap();
    assert_eq!(a["assets"][0]["p"], "image_0.png");
}

#[test]
fn renaming_is_deterministic_and_stable() {
    let (mut first, _) = registry();
    let (mut second, _) = registry();
    rename_assets(&mut first);
    rename_assets(&mut second);
    let snapshot = |reg: &AssetRegistry| -> Vec<Value> {
        reg.animations().map(|a| a.data().cloned().unwrap()).collect()
    };
    assert_eq!(snapshot(&first), snapshot(&second));

    let before = snapshot(&first);
    assert_eq!(rename_assets(&mut first), 0);
    assert_eq!(snapshot(&first), before);
}

#[test]
fn shared_asset_is_named_once_from_first_owner() {
    let (mut reg, handles) = registry();
    // Share b's second image with a; it keeps the slot of its first owner in registry order.
    reg.link_asset(handles[3], "a").unwrap();
    let plan = plan_names(&reg, AssetKind::Image);
    assert_eq!(plan.len(), 4);
    assert_eq!(plan[&handles[0]], "image_0");
    assert_eq!(plan[&handles[1]], "image_1");
    assert_eq!(plan[&handles[3]], "image_2");
    assert_eq!(plan[&handles[2]], "image_3");
}

#[test]
fn single_animation_bundles_are_left_alone() {
    let mut reg = AssetRegistry::new();
    reg.add_animation(Animation::new("solo", doc(&["image_7.png"])).unwrap())
        .unwrap();
    let h = reg
        .add_asset("solo", Asset::new(AssetKind::Image, "image_7.png", vec![0]).unwrap())
        .unwrap();
    assert_eq!(rename_assets(&mut reg), 0);
    assert_eq!(reg.asset(h).unwrap().file_name(), "image_7.png");
}

#[test]
fn dimensionless_embedded_images_stay_in_sync_with_json() {
    let embedded = |bytes: &[u8]| {
        json!({
            "assets": [
                { "id": "img", "u": "", "p": crate::encode_data_url("image/png", bytes), "e": 1 }
            ],
            "layers": []
        })
    };
    let mut bundle = crate::Bundle::new(crate::FormatVersion::V2);
    bundle
        .add_animation(Animation::new("a", embedded(&[1, 2, 3])).unwrap())
        .unwrap();
    bundle
        .add_animation(Animation::new("b", embedded(&[4, 5, 6])).unwrap())
        .unwrap();
    bundle.build().unwrap();

    for (id, expected) in [("a", "image_0.png"), ("b", "image_1.png")] {
        let assets = bundle.registry().assets_of(id);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].1.file_name(), expected);
        let data = bundle.animation(id).unwrap().data().unwrap();
        assert_eq!(data["assets"][0]["p"], expected);
    }
}
