use crate::{BundleError, BundleResult};

/// Build-time settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fold perceptually identical images into one canonical copy.
    pub deduplicate_images: bool,
    /// Worker threads for parallel plugins and image hashing. `None` uses the rayon default.
    pub plugin_threads: Option<usize>,
}

impl BuildOptions {
    /// Reject `plugin_threads == Some(0)`.
    pub fn validate(&self) -> BundleResult<()> {
        if let Some(n) = self.plugin_threads
            && n == 0
        {
            return Err(BundleError::validation(
                "build option 'plugin_threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> BundleResult<rayon::ThreadPool> {
    BuildOptions {
        deduplicate_images: false,
        plugin_threads: threads,
    }
    .validate()?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BundleError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/build/options.rs"]
mod tests;
