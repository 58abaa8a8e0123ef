use super::*;

#[test]
fn pack_then_unpack_preserves_order_bytes_and_stored_flag() {
    let entries = vec![
        ArchiveEntry::new("manifest.json", br#"{"version":"2"}"#.to_vec())
            .with_options(EntryOptions::STORED),
        ArchiveEntry::new("a/bull.json", vec![b'{'; 4096]),
        ArchiveEntry::new("i/image_0.png", vec![7u8; 32])
            .with_options(EntryOptions { level: Some(9) }),
    ];
    let bytes = ZipCodec.pack(&entries).unwrap();
    let back = ZipCodec.unpack(&bytes).unwrap();

    let paths: Vec<_> = back.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["manifest.json", "a/bull.json", "i/image_0.png"]);
    assert_eq!(back[0].bytes, entries[0].bytes);
    assert_eq!(back[1].bytes, entries[1].bytes);
    assert!(back[0].options.is_stored());
    assert!(!back[1].options.is_stored());
}

#[test]
fn out_of_range_level_is_rejected() {
    let err = EntryOptions { level: Some(12) }.validate().unwrap_err();
    assert!(matches!(err, BundleError::Validation(_)));
    let entry = ArchiveEntry::new("x", vec![]).with_options(EntryOptions { level: Some(10) });
    assert!(ZipCodec.pack(&[entry]).is_err());
}

#[test]
fn garbage_is_a_malformed_archive() {
    let err = ZipCodec.unpack(b"this is not a zip file").unwrap_err();
    assert!(matches!(err, BundleError::MalformedArchive(_)));
}

fn patch_u32(bytes: &mut [u8], signature: &[u8; 4], offset: usize, value: u32) {
    let at = bytes
        .windows(4)
        .position(|w| w == signature)
        .unwrap();
    bytes[at + offset..at + offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[test]
fn inflated_declared_size_does_not_drive_allocation() {
    let entry = ArchiveEntry::new("i/image_0.png", b"tiny!".to_vec()).with_options(EntryOptions::STORED);
    let mut bytes = ZipCodec.pack(&[entry]).unwrap();
    let huge = 0xFFFF_FFF0;
    patch_u32(&mut bytes, b"PK\x03\x04", 22, huge);
    patch_u32(&mut bytes, b"PK\x01\x02", 24, huge);

    match ZipCodec.unpack(&bytes) {
        Ok(entries) => {
            assert_eq!(entries[0].bytes, b"tiny!");
            assert!(entries[0].bytes.capacity() <= MAX_PREALLOCATION);
        }
        Err(e) => assert!(matches!(e, BundleError::MalformedArchive(_))),
    }
}
