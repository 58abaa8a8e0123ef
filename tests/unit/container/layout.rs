use super::*;

#[test]
fn paths_follow_each_layout() {
    assert_eq!(animation_path(FormatVersion::V1, "bull"), "animations/bull.json");
    assert_eq!(animation_path(FormatVersion::V2, "bull"), "a/bull.json");
    assert_eq!(image_path(FormatVersion::V1, "image_0.png"), "images/image_0.png");
    assert_eq!(image_path(FormatVersion::V2, "image_0.png"), "i/image_0.png");
    assert_eq!(audio_path(FormatVersion::V1, "audio_0.mp3"), "audio/audio_0.mp3");
    assert_eq!(audio_path(FormatVersion::V2, "audio_0.mp3"), "u/audio_0.mp3");
    assert_eq!(theme_path(FormatVersion::V2, "dark").as_deref(), Some("t/dark.json"));
    assert_eq!(theme_path(FormatVersion::V1, "dark"), None);
    assert_eq!(
        state_machine_path(FormatVersion::V2, "sm").as_deref(),
        Some("s/sm.json")
    );
    assert_eq!(state_machine_path(FormatVersion::V1, "sm"), None);
}

#[test]
fn classification_depends_on_version() {
    assert_eq!(
        classify(FormatVersion::V2, "a/bull.json"),
        Some(EntryClass::Animation { id: "bull".to_owned() })
    );
    assert_eq!(classify(FormatVersion::V1, "a/bull.json"), None);
    assert_eq!(
        classify(FormatVersion::V1, "images/image_2.jpg"),
        Some(EntryClass::Image { file_name: "image_2.jpg".to_owned() })
    );
    assert_eq!(
        classify(FormatVersion::V2, "s/flow.json"),
        Some(EntryClass::StateMachine { id: "flow".to_owned() })
    );
    assert_eq!(classify(FormatVersion::V1, "t/dark.json"), None);
    assert_eq!(classify(FormatVersion::V2, "manifest.json"), Some(EntryClass::Manifest));
}

#[test]
fn unknown_and_nested_entries_are_ignored() {
    assert_eq!(classify(FormatVersion::V2, "README.txt"), None);
    assert_eq!(classify(FormatVersion::V2, "a/nested/x.json"), None);
    assert_eq!(classify(FormatVersion::V2, "a/notes.txt"), None);
    assert_eq!(classify(FormatVersion::V2, "x/y.json"), None);
}

#[test]
fn reference_dirs_match_layout() {
    assert_eq!(image_reference_dir(FormatVersion::V1), "/images/");
    assert_eq!(image_reference_dir(FormatVersion::V2), "/i/");
    assert_eq!(audio_reference_dir(FormatVersion::V1), "/audio/");
    assert_eq!(audio_reference_dir(FormatVersion::V2), "/u/");
    assert_eq!(asset_id("image_3.png"), "image_3");
}
