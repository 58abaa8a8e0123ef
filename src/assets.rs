//! Asset bytes at the bundle boundary: data URLs, remote fetching, perceptual hashing and the
//! Lottie JSON records that reference assets.

pub(crate) mod codec;
pub(crate) mod lottie;
pub(crate) mod media;
pub(crate) mod phash;
