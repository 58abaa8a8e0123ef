#![allow(dead_code)]

use std::{collections::HashMap, io::Cursor};

use dotlottie_bundle::{AssetCodec, BundleError, BundleResult, encode_data_url};
use serde_json::{Value, json};

pub fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "dotlottie_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

pub fn png(img: image::RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Flat picture whose bytes differ per `seed`.
pub fn flat_png(seed: u8, w: u32, h: u32) -> Vec<u8> {
    png(image::RgbImage::from_pixel(w, h, image::Rgb([seed, 255 - seed, seed / 2])))
}

/// Left-to-right brightness ramp; the same picture at any size.
pub fn ramp_png(w: u32, h: u32) -> Vec<u8> {
    png(image::RgbImage::from_fn(w, h, |x, _| {
        let v = (x * 255 / (w - 1)) as u8;
        image::Rgb([v, v, v])
    }))
}

/// Right-to-left brightness ramp, far from [`ramp_png`] under a difference hash.
pub fn reversed_ramp_png(w: u32, h: u32) -> Vec<u8> {
    png(image::RgbImage::from_fn(w, h, |x, _| {
        let v = 255 - (x * 255 / (w - 1)) as u8;
        image::Rgb([v, v, v])
    }))
}

/// Lottie JSON with one embedded image record per payload.
pub fn lottie_with_images(images: &[Vec<u8>]) -> Value {
    let assets: Vec<Value> = images
        .iter()
        .enumerate()
        .map(|(i, bytes)| {
            json!({
                "id": format!("img_{i}"),
                "w": 32,
                "h": 32,
                "u": "",
                "p": encode_data_url("image/png", bytes),
                "e": 1
            })
        })
        .collect();
    json!({
        "v": "5.7.0",
        "fr": 30,
        "ip": 0,
        "op": 60,
        "w": 64,
        "h": 64,
        "assets": assets,
        "layers": []
    })
}

pub fn theme_doc() -> Value {
    json!({
        "rules": [
            { "id": "fill", "type": "Color", "value": [1.0, 0.0, 0.0, 1.0] }
        ]
    })
}

pub fn state_machine_doc(animation: &str) -> Value {
    json!({
        "initial": "idle",
        "states": [
            { "name": "idle", "type": "PlaybackState", "animation": animation, "autoplay": true }
        ]
    })
}

/// Serves fixed payloads by URL, fails everything else.
#[derive(Default)]
pub struct MapCodec {
    pub payloads: HashMap<String, Vec<u8>>,
}

impl MapCodec {
    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.payloads.insert(url.to_owned(), bytes);
        self
    }
}

impl AssetCodec for MapCodec {
    fn fetch(&self, url: &str) -> BundleResult<Vec<u8>> {
        self.payloads
            .get(url)
            .cloned()
            .ok_or_else(|| BundleError::network(url, anyhow::anyhow!("404 not found")))
    }
}

pub fn entry_paths(archive: &[u8]) -> Vec<String> {
    use dotlottie_bundle::{ArchiveCodec as _, ZipCodec};
    ZipCodec
        .unpack(archive)
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect()
}

pub fn entries(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
    use dotlottie_bundle::{ArchiveCodec as _, ZipCodec};
    ZipCodec
        .unpack(archive)
        .unwrap()
        .into_iter()
        .map(|e| (e.path, e.bytes))
        .collect()
}
