use super::*;

fn encode(img: image::RgbImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn horizontal_ramp(w: u32, h: u32) -> image::RgbImage {
    image::RgbImage::from_fn(w, h, |x, _| {
        let v = (x * 255 / (w - 1)) as u8;
        image::Rgb([v, v, v])
    })
}

#[test]
fn identical_pictures_at_different_sizes_hash_close() {
    let hasher = DifferenceHasher;
    let a = hasher.hash(&encode(horizontal_ramp(64, 64))).unwrap();
    let b = hasher.hash(&encode(horizontal_ramp(128, 96))).unwrap();
    assert!(hasher.distance(a, b) < DUPLICATE_DISTANCE_THRESHOLD);
}

#[test]
fn reversed_gradient_is_far_away() {
    let hasher = DifferenceHasher;
    let ramp = horizontal_ramp(64, 64);
    let reversed = image::imageops::flip_horizontal(&ramp);
    let a = hasher.hash(&encode(ramp)).unwrap();
    let b = hasher.hash(&encode(reversed)).unwrap();
    assert!(hasher.distance(a, b) >= DUPLICATE_DISTANCE_THRESHOLD);
}

#[test]
fn undecodable_bytes_are_an_error() {
    assert!(DifferenceHasher.hash(b"definitely not an image").is_err());
}

#[test]
fn distance_is_hamming() {
    assert_eq!(DifferenceHasher.distance(ImageHash(0b1011), ImageHash(0b0001)), 2);
}
