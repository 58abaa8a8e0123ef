use std::sync::Arc;

use crate::{
    BundleError, BundleResult,
    assets::media::{self, DataUrl},
};

/// Byte transport used while building: remote fetches and base64 data-URL conversion.
///
/// A bundle holds one codec and routes every URL resolution through it, so swapping the codec
/// is how callers run builds offline or against a pre-fetched cache.
pub trait AssetCodec: Send + Sync {
    /// Fetch the bytes behind `url`.
    fn fetch(&self, url: &str) -> BundleResult<Vec<u8>>;

    /// Encode `bytes` as a base64 data URL.
    fn encode_data_url(&self, mime: &str, bytes: &[u8]) -> String {
        media::encode_data_url(mime, bytes)
    }

    /// Decode a base64 data URL.
    fn decode_data_url(&self, url: &str) -> BundleResult<DataUrl> {
        media::decode_data_url(url)
    }
}

/// Blocking HTTP(S) codec backed by `ureq`.
#[cfg(feature = "http")]
#[derive(Clone)]
pub struct HttpAssetCodec {
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl HttpAssetCodec {
    /// Codec with a default agent.
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Codec reusing a caller-configured agent (proxies, timeouts, TLS).
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

#[cfg(feature = "http")]
impl std::fmt::Debug for HttpAssetCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAssetCodec").finish_non_exhaustive()
    }
}

#[cfg(feature = "http")]
impl Default for HttpAssetCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
impl AssetCodec for HttpAssetCodec {
    #[tracing::instrument(skip(self))]
    fn fetch(&self, url: &str) -> BundleResult<Vec<u8>> {
        use std::io::Read as _;

        if media::is_data_url(url) {
            return Ok(self.decode_data_url(url)?.bytes);
        }
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| BundleError::network(url, e))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| BundleError::network(url, e))?;
        tracing::debug!(bytes = bytes.len(), "fetched remote payload");
        Ok(bytes)
    }
}

/// Codec that refuses every remote fetch. Data URLs still resolve.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineAssetCodec;

impl AssetCodec for OfflineAssetCodec {
    fn fetch(&self, url: &str) -> BundleResult<Vec<u8>> {
        if media::is_data_url(url) {
            return Ok(self.decode_data_url(url)?.bytes);
        }
        Err(BundleError::network(
            url,
            anyhow::anyhow!("network access is disabled for this bundle"),
        ))
    }
}

/// Codec installed when the caller does not inject one.
pub(crate) fn default_asset_codec() -> Arc<dyn AssetCodec> {
    #[cfg(feature = "http")]
    {
        Arc::new(HttpAssetCodec::new())
    }
    #[cfg(not(feature = "http"))]
    {
        Arc::new(OfflineAssetCodec)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
