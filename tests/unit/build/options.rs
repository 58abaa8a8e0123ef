use super::*;

#[test]
fn zero_threads_is_rejected() {
    let opts = BuildOptions {
        plugin_threads: Some(0),
        ..BuildOptions::default()
    };
    assert!(matches!(opts.validate().unwrap_err(), BundleError::Validation(_)));
    assert!(build_thread_pool(Some(0)).is_err());
}

#[test]
fn defaults_are_valid_and_pool_honors_size() {
    assert!(BuildOptions::default().validate().is_ok());
    assert!(!BuildOptions::default().deduplicate_images);
    let pool = build_thread_pool(Some(2)).unwrap();
    assert_eq!(pool.current_num_threads(), 2);
}
