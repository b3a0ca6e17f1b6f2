use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::registry::Snapshot;
use crate::utils::time::Clock;

const PREFIX: &str = "employees-";
const SUFFIX: &str = ".db";

/// Snapshots the registry every `every`, keeping the newest `keep` files.
/// A failed run is logged and retried on the next tick only.
pub async fn run_backups<S: Snapshot>(
    registry: S,
    dir: PathBuf,
    every: Duration,
    keep: usize,
    clock: Clock,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        match backup_once(&registry, &dir, keep, clock).await {
            Ok(path) => info!(path = %path.display(), "backup written"),
            Err(e) => error!(error = ?e, dir = %dir.display(), "backup failed"),
        }
    }
}

pub async fn backup_once<S: Snapshot>(
    registry: &S,
    dir: &Path,
    keep: usize,
    clock: Clock,
) -> Result<PathBuf> {
    let stamp = clock.now().format("%Y%m%d-%H%M%S%.3f");
    let path = dir.join(format!("{PREFIX}{stamp}{SUFFIX}"));

    registry
        .snapshot(&path)
        .await
        .with_context(|| format!("snapshot to {}", path.display()))?;

    let removed = prune(dir, keep).await?;
    if removed > 0 {
        log::info!("Pruned {} old backups from {}", removed, dir.display());
    }
    Ok(path)
}

/// Deletes all but the `keep` newest backups. Names sort chronologically.
async fn prune(dir: &Path, keep: usize) -> Result<usize> {
    let mut backups = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("read {}", dir.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(PREFIX) && name.ends_with(SUFFIX) {
            backups.push(entry.path());
        }
    }

    backups.sort();
    let excess = backups.len().saturating_sub(keep);
    for old in &backups[..excess] {
        tokio::fs::remove_file(old)
            .await
            .with_context(|| format!("remove {}", old.display()))?;
    }
    Ok(excess)
}
