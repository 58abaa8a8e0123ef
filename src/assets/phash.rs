use anyhow::Context;

use crate::BundleResult;

/// Two images whose hashes differ in fewer bits than this are treated as the same picture.
pub const DUPLICATE_DISTANCE_THRESHOLD: u32 = 5;

/// Fixed-length perceptual fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHash(pub u64);

/// Perceptual hash primitive consumed by the duplicate image reducer.
pub trait PerceptualHasher: Send + Sync {
    /// Fingerprint encoded image bytes.
    fn hash(&self, bytes: &[u8]) -> BundleResult<ImageHash>;

    /// Distance between two fingerprints. Smaller means more similar.
    fn distance(&self, a: ImageHash, b: ImageHash) -> u32 {
        (a.0 ^ b.0).count_ones()
    }
}

/// 64-bit difference hash: grayscale 9x8 thumbnail, one bit per horizontal brightness step.
#[derive(Clone, Copy, Debug, Default)]
pub struct DifferenceHasher;

const HASH_W: u32 = 9;
const HASH_H: u32 = 8;

impl PerceptualHasher for DifferenceHasher {
    fn hash(&self, bytes: &[u8]) -> BundleResult<ImageHash> {
        let img = image::load_from_memory(bytes).context("decode image for perceptual hash")?;
        let thumb = img
            .resize_exact(HASH_W, HASH_H, image::imageops::FilterType::Triangle)
            .to_luma8();

        let mut bits = 0u64;
        for y in 0..HASH_H {
            for x in 0..HASH_W - 1 {
                let left = thumb.get_pixel(x, y)[0];
                let right = thumb.get_pixel(x + 1, y)[0];
                bits = (bits << 1) | u64::from(left < right);
            }
        }
        Ok(ImageHash(bits))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/phash.rs"]
mod tests;
