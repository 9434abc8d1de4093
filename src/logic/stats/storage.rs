use std::fs;
use std::path::Path;

use crate::logic::error::ShieldResult;
use super::types::RunningStats;

/// Save stats: temp file then rename, so a crash never leaves half a file
pub fn save_stats(stats: &RunningStats, path: &Path) -> ShieldResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(stats)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load stats. Missing file starts at zero.
pub fn load_stats(path: &Path) -> ShieldResult<RunningStats> {
    if !path.exists() {
        return Ok(RunningStats::default());
    }

    let data = fs::read(path)?;
    let stats: RunningStats = serde_json::from_slice(&data)?;
    Ok(stats)
}
