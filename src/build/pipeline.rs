use std::{sync::Mutex, thread};

use crate::{Bundle, BundleError, BundleResult, build::options::build_thread_pool};

/// Build-phase extension point.
///
/// Parallel plugins run first, each taking an exclusive turn on the bundle; their nested rayon
/// work runs on the build thread pool. Sequential plugins follow in registration order.
pub trait BundlePlugin: Send + Sync {
    /// Name used in logs and [`BundleError::Plugin`] values.
    fn name(&self) -> &str;

    /// Whether the plugin may run concurrently with other parallel plugins.
    fn parallel(&self) -> bool {
        false
    }

    /// Inspect or mutate the bundle during [`Bundle::build`].
    fn on_build(&self, bundle: &mut Bundle) -> BundleResult<()>;
}

#[tracing::instrument(skip_all, fields(plugins = bundle.plugins.len()))]
pub(crate) fn run_plugins(bundle: &mut Bundle) -> BundleResult<()> {
    if bundle.plugins.is_empty() {
        return Ok(());
    }
    let (parallel, sequential): (Vec<_>, Vec<_>) =
        bundle.plugins.clone().into_iter().partition(|p| p.parallel());

    if !parallel.is_empty() {
        let pool = build_thread_pool(bundle.options.plugin_threads)?;
        let shared = Mutex::new(&mut *bundle);
        // Each plugin waits for its turn on its own scoped thread. Only the lock holder enters
        // the pool, so a worker stealing nested rayon jobs never meets a queued plugin.
        let results: Vec<BundleResult<()>> = thread::scope(|scope| {
            let handles: Vec<_> = parallel
                .iter()
                .map(|plugin| {
                    let (shared, pool) = (&shared, &pool);
                    scope.spawn(move || -> BundleResult<()> {
                        let mut guard = shared.lock().map_err(|_| {
                            BundleError::plugin(plugin.name(), "bundle lock poisoned by another plugin")
                        })?;
                        let target: &mut Bundle = &mut guard;
                        tracing::debug!(plugin = plugin.name(), "running parallel plugin");
                        pool.install(|| plugin.on_build(target))
                    })
                })
                .collect();
            handles
                .into_iter()
                .zip(&parallel)
                .map(|(handle, plugin)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(BundleError::plugin(plugin.name(), "plugin panicked")))
                })
                .collect()
        });
        drop(shared);
        // All parallel plugins have settled; report the first failure in registration order.
        for (plugin, result) in parallel.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(plugin = plugin.name(), error = %e, "parallel plugin failed");
                return Err(e);
            }
        }
    }

    for plugin in &sequential {
        tracing::debug!(plugin = plugin.name(), "running sequential plugin");
        plugin.on_build(bundle).inspect_err(|e| {
            tracing::warn!(plugin = plugin.name(), error = %e, "sequential plugin failed");
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/build/pipeline.rs"]
mod tests;
