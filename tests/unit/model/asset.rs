use super::*;

#[test]
fn id_is_the_file_stem() {
    let asset = Asset::new(AssetKind::Image, "image_3.png", vec![1, 2]).unwrap();
    assert_eq!(asset.id(), "image_3");
    assert_eq!(asset.file_name(), "image_3.png");
    assert_eq!(asset.bytes(), Some(&[1u8, 2][..]));
    assert_eq!(asset.mime(), "image/png");
    assert!(asset.owners().is_empty());
}

#[test]
fn rename_keeps_extension() {
    let mut asset = Asset::new(AssetKind::Audio, "audio_0.mp3", vec![]).unwrap();
    asset.set_id("audio_7");
    assert_eq!(asset.id(), "audio_7");
    assert_eq!(asset.file_name(), "audio_7.mp3");
}

#[test]
fn constructors_reject_bad_input() {
    assert!(Asset::new(AssetKind::Image, "", vec![]).is_err());
    assert!(Asset::new(AssetKind::Image, "dir/x.png", vec![]).is_err());
    assert!(Asset::from_url(AssetKind::Image, "x.png", " ").is_err());
    let err = Asset::new(AssetKind::Image, "x.png", vec![])
        .unwrap()
        .with_options(EntryOptions { level: Some(11) })
        .unwrap_err();
    assert!(matches!(err, BundleError::Validation(_)));
}

#[test]
fn builder_functions_set_flags() {
    let asset = Asset::from_url(AssetKind::Image, "logo.webp", "https://cdn.example/logo.webp")
        .unwrap()
        .with_excluded(true)
        .with_lottie_asset_id("img_0");
    assert!(asset.is_excluded());
    assert_eq!(asset.lottie_asset_id(), Some("img_0"));
    assert_eq!(asset.bytes(), None);
    assert_eq!(
        asset.source(),
        &AssetSource::Url("https://cdn.example/logo.webp".to_owned())
    );
}
