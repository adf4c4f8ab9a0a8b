use std::{fs, path::Path};

use anyhow::Context;
use squadsmith_roster::{HeroRecord, Roster, RosterConfig};

use crate::util;

/// Reads every `*.json` file of `dir` as a hero record, in file-name order.
///
/// Unreadable or malformed files are skipped with a warning.
pub fn read_hero_dir(dir: &Path) -> anyhow::Result<Vec<HeroRecord>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read hero directory: {}", dir.display()))?;

    let mut paths = vec![];
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to list hero directory: {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut records = vec![];
    for path in &paths {
        match util::read_json_file::<HeroRecord, _>("hero", path) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(error = %format!("{err:#}"), "skipping hero file"),
        }
    }
    tracing::info!(
        dir = %dir.display(),
        files = paths.len(),
        records = records.len(),
        "hero records read"
    );
    Ok(records)
}

/// Reads and validates the roster stored in `dir`.
pub fn load_roster(dir: &Path, config: &RosterConfig) -> anyhow::Result<Roster> {
    let records = read_hero_dir(dir)?;
    let roster = Roster::from_records(records, config)
        .with_context(|| format!("Unusable roster in {}", dir.display()))?;
    tracing::info!(heroes = roster.len(), "roster loaded");
    Ok(roster)
}
