use base64::Engine as _;

use crate::{BundleError, BundleResult, model::AssetKind};

/// Decoded `data:<mime>;base64,<payload>` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared media type, empty when the URL omits it.
    pub mime: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

pub(crate) fn is_data_url(s: &str) -> bool {
    s.starts_with("data:")
}

/// Decode a base64 data URL.
pub fn decode_data_url(url: &str) -> BundleResult<DataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| BundleError::validation("not a data URL"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| BundleError::validation("data URL has no payload separator"))?;
    let Some(mime) = header.strip_suffix(";base64") else {
        return Err(BundleError::validation(
            "only base64 data URLs are supported",
        ));
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| BundleError::validation(format!("data URL payload is not base64: {e}")))?;
    Ok(DataUrl {
        mime: mime.to_owned(),
        bytes,
    })
}

/// Encode bytes as a base64 data URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

/// Pick a file extension for asset bytes: content sniffing first, then the declared MIME type.
pub(crate) fn detect_extension(kind: AssetKind, mime: Option<&str>, bytes: &[u8]) -> String {
    let sniffed = match kind {
        AssetKind::Image => sniff_image(bytes),
        AssetKind::Audio => sniff_audio(bytes),
    };
    if let Some(ext) = sniffed {
        return ext.to_owned();
    }
    if let Some(ext) = mime.and_then(extension_for_mime) {
        return ext.to_owned();
    }
    match kind {
        AssetKind::Image => "png".to_owned(),
        AssetKind::Audio => "mp3".to_owned(),
    }
}

fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    format.extensions_str().first().copied()
}

fn sniff_audio(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"ID3") || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0)
    {
        return Some("mp3");
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        return Some("wav");
    }
    if bytes.starts_with(b"OggS") {
        return Some("ogg");
    }
    if bytes.starts_with(b"fLaC") {
        return Some("flac");
    }
    None
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let ext = match mime.trim().to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/avif" => "avif",
        "image/svg+xml" => "svg",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        _ => return None,
    };
    Some(ext)
}

/// MIME type for an asset file name, used when inlining assets back into data URLs.
pub fn mime_for_file(file_name: &str) -> &'static str {
    let ext = crate::foundation::ids::file_extension(file_name)
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "tga" => "image/x-tga",
        "qoi" => "image/qoi",
        "hdr" => "image/vnd.radiance",
        "exr" => "image/x-exr",
        "dds" => "image/vnd-ms.dds",
        "ff" => "image/x-farbfeld",
        "pbm" | "pgm" | "ppm" | "pnm" | "pam" => "image/x-portable-anymap",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
