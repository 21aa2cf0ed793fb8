use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, warn};

use super::{
    snapshot::{SnapshotBackend, StoreSnapshot, SNAPSHOT_SCHEMA_VERSION},
    StoreError, StoreResult,
};

const DATA_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Persists the store snapshot as pretty JSON, keeping a rolling set of backups of the
/// previous file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonFile {
    /// Backups go to a `backups` directory next to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backups_dir = path
            .parent()
            .map(|parent| parent.join("backups"))
            .unwrap_or_else(|| PathBuf::from("backups"));
        Self::with_backups(path, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_backups(path: PathBuf, backups_dir: PathBuf, retention: usize) -> Self {
        Self {
            path,
            backups_dir,
            retention: retention.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backup files, newest first.
    pub fn list_backups(&self) -> StoreResult<Vec<PathBuf>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", self.stem());
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DATA_EXTENSION) {
                continue;
            }
            let matches_stem = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix));
            if matches_stem {
                entries.push(path);
            }
        }
        // Fixed-width timestamps sort lexicographically.
        entries.sort_by_key(|path| Reverse(path.file_name().map(|name| name.to_owned())));
        Ok(entries)
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("ledger")
            .to_string()
    }

    fn backup_existing_file(&self) -> StoreResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup = self
            .backups_dir
            .join(format!("{}_{}.{}", self.stem(), timestamp, DATA_EXTENSION));
        fs::copy(&self.path, &backup)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> StoreResult<()> {
        for stale in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale) {
                warn!(path = %stale.display(), %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl SnapshotBackend for JsonFile {
    fn load(&self) -> StoreResult<StoreSnapshot> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no data file yet, starting empty");
            return Ok(StoreSnapshot::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let snapshot: StoreSnapshot = serde_json::from_str(&data)?;
        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(StoreError::Conflict(format!(
                "data file `{}` uses schema {} but this build reads up to {}",
                self.path.display(),
                snapshot.schema_version,
                SNAPSHOT_SCHEMA_VERSION
            )));
        }
        Ok(snapshot)
    }

    fn persist(&self, snapshot: &StoreSnapshot) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.backup_existing_file()?;
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> StoreResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
