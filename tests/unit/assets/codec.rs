use super::*;

#[test]
fn offline_codec_rejects_remote_urls_with_network_error() {
    let err = OfflineAssetCodec
        .fetch("https://example.invalid/anim.json")
        .unwrap_err();
    match err {
        BundleError::Network { url, .. } => assert_eq!(url, "https://example.invalid/anim.json"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn offline_codec_still_resolves_data_urls() {
    let url = OfflineAssetCodec.encode_data_url("application/json", b"{}");
    assert_eq!(OfflineAssetCodec.fetch(&url).unwrap(), b"{}");
}

#[test]
fn default_codec_round_trips_data_urls() {
    let codec = default_asset_codec();
    let url = codec.encode_data_url("audio/mpeg", &[1, 2, 3]);
    let decoded = codec.decode_data_url(&url).unwrap();
    assert_eq!(decoded.mime, "audio/mpeg");
    assert_eq!(decoded.bytes, vec![1, 2, 3]);
}
