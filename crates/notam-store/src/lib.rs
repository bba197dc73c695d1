//! Durable per-day NOTAM persistence.
//!
//! Each day's NOTAM list lives in its own YAML file
//! (`<YYYY-MM-DD>_notams.yaml`) under the data directory. Mutations load
//! the day, change the in-memory list, and atomically replace the whole
//! file (temp file + rename), so a crash mid-write never leaves a corrupt
//! or partially appended day on disk.
//!
//! Same-day mutations are serialized by a per-day async mutex; operations
//! on different days never contend.

pub mod error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use notam_common::{DayKey, Notam, RawNotam};

pub use error::StoreError;

/// Per-day NOTAM store backed by YAML files.
///
/// The store is the sole reader and writer of its data directory.
pub struct DayStore {
    data_dir: PathBuf,
    locks: StdMutex<HashMap<DayKey, Arc<Mutex<()>>>>,
}

impl DayStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| StoreError::io(&data_dir, e))?;
        Ok(Self {
            data_dir,
            locks: StdMutex::new(HashMap::new()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load a day's NOTAMs in insertion order.
    ///
    /// An unseen day is an empty list, not an error. Records that no longer
    /// pass validation are skipped with a warning (and dropped for good on
    /// the next rewrite of that day).
    pub async fn get_day(&self, day: DayKey) -> Result<Vec<Notam>, StoreError> {
        let raw = self.load_raw(day).await?;
        Ok(self.validate_list(day, raw))
    }

    /// Append a NOTAM to the day's list.
    pub async fn add(&self, day: DayKey, notam: &Notam) -> Result<(), StoreError> {
        let lock = self.day_lock(day);
        let _guard = lock.lock().await;

        let raw = self.load_raw(day).await?;
        let mut list: Vec<RawNotam> = self
            .validate_list(day, raw)
            .into_iter()
            .map(Notam::into_raw)
            .collect();
        list.push(notam.raw().clone());
        self.write_day(day, &list).await?;
        debug!(day = %day, ident = %notam.ident(), count = list.len(), "Added NOTAM");
        Ok(())
    }

    /// Remove the first record matching all four raw fields of `target`.
    ///
    /// Returns `false` if no record matched (not an error).
    pub async fn delete(&self, day: DayKey, target: &RawNotam) -> Result<bool, StoreError> {
        let lock = self.day_lock(day);
        let _guard = lock.lock().await;

        let raw = self.load_raw(day).await?;
        let mut list: Vec<RawNotam> = self
            .validate_list(day, raw)
            .into_iter()
            .map(Notam::into_raw)
            .collect();
        let Some(pos) = list.iter().position(|n| n == target) else {
            return Ok(false);
        };
        list.remove(pos);
        self.write_day(day, &list).await?;
        debug!(day = %day, ident = %target.ident, count = list.len(), "Deleted NOTAM");
        Ok(true)
    }

    /// Replace the first record matching `original` with `replacement`,
    /// keeping its position in the list.
    ///
    /// Returns `false` if no record matched (not an error).
    pub async fn update(
        &self,
        day: DayKey,
        original: &RawNotam,
        replacement: &Notam,
    ) -> Result<bool, StoreError> {
        let lock = self.day_lock(day);
        let _guard = lock.lock().await;

        let raw = self.load_raw(day).await?;
        let mut list: Vec<RawNotam> = self
            .validate_list(day, raw)
            .into_iter()
            .map(Notam::into_raw)
            .collect();
        let Some(pos) = list.iter().position(|n| n == original) else {
            return Ok(false);
        };
        list[pos] = replacement.raw().clone();
        self.write_day(day, &list).await?;
        debug!(day = %day, ident = %replacement.ident(), "Updated NOTAM");
        Ok(true)
    }

    fn day_path(&self, day: DayKey) -> PathBuf {
        self.data_dir.join(day.yaml_name())
    }

    fn day_lock(&self, day: DayKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("day lock map poisoned");
        locks.entry(day).or_default().clone()
    }

    async fn load_raw(&self, day: DayKey) -> Result<Vec<RawNotam>, StoreError> {
        let path = self.day_path(day);
        let contents = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let list: Option<Vec<RawNotam>> =
            serde_yaml::from_str(&contents).map_err(|e| StoreError::yaml(&path, e))?;
        Ok(list.unwrap_or_default())
    }

    fn validate_list(&self, day: DayKey, raw: Vec<RawNotam>) -> Vec<Notam> {
        raw.into_iter()
            .filter_map(|r| match r.validate() {
                Ok(notam) => Some(notam),
                Err(e) => {
                    warn!(day = %day, ident = %r.ident, error = %e, "Skipping invalid NOTAM record");
                    None
                }
            })
            .collect()
    }

    /// Atomically replace the day file with the given list.
    async fn write_day(&self, day: DayKey, list: &[RawNotam]) -> Result<(), StoreError> {
        let path = self.day_path(day);
        let yaml = serde_yaml::to_string(list).map_err(|e| StoreError::yaml(&path, e))?;

        // Temp file in the same directory so the rename stays on one filesystem.
        let tmp_path = self.data_dir.join(format!("{}.tmp", day.yaml_name()));
        fs::write(&tmp_path, yaml.as_bytes())
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notam_common::parse_fields;
    use tempfile::tempdir;

    fn notam(ident: &str, rad: &str) -> Notam {
        parse_fields(ident, "123456N", "0765432W", rad).unwrap()
    }

    #[tokio::test]
    async fn test_unseen_day_is_empty() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();
        assert!(store.get_day(day).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_is_append_only_and_order_preserving() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();

        let a = notam("ALPHA", "100");
        let b = notam("BRAVO", "200");
        store.add(day, &a).await.unwrap();
        store.add(day, &b).await.unwrap();

        let list = store.get_day(day).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ident(), "ALPHA");
        assert_eq!(list[1].ident(), "BRAVO");
    }

    #[tokio::test]
    async fn test_get_day_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();
        store.add(day, &notam("ALPHA", "100")).await.unwrap();

        let first = store.get_day(day).await.unwrap();
        let second = store.get_day(day).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_days_are_independent() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let d1: DayKey = "2024-03-01".parse().unwrap();
        let d2: DayKey = "2024-03-02".parse().unwrap();

        store.add(d1, &notam("ALPHA", "100")).await.unwrap();
        assert_eq!(store.get_day(d1).await.unwrap().len(), 1);
        assert!(store.get_day(d2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_durable_across_reopen() {
        let dir = tempdir().unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();
        {
            let store = DayStore::open(dir.path()).await.unwrap();
            store.add(day, &notam("ALPHA", "500NM")).await.unwrap();
        }
        let store = DayStore::open(dir.path()).await.unwrap();
        let list = store.get_day(day).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].radius_nm(), 500.0);
    }

    #[tokio::test]
    async fn test_delete_removes_matching_record() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();

        let a = notam("ALPHA", "100");
        let b = notam("BRAVO", "200");
        store.add(day, &a).await.unwrap();
        store.add(day, &b).await.unwrap();

        assert!(store.delete(day, a.raw()).await.unwrap());
        let list = store.get_day(day).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].ident(), "BRAVO");

        // second delete of the same record finds nothing
        assert!(!store.delete(day, a.raw()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();

        let a = notam("ALPHA", "100");
        let b = notam("BRAVO", "200");
        let c = notam("CHARLIE", "300");
        store.add(day, &a).await.unwrap();
        store.add(day, &b).await.unwrap();
        store.add(day, &c).await.unwrap();

        let b2 = notam("BRAVO", "250");
        assert!(store.update(day, b.raw(), &b2).await.unwrap());

        let list = store.get_day(day).await.unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].ident(), "BRAVO");
        assert_eq!(list[1].radius_nm(), 250.0);

        let missing = notam("DELTA", "100");
        assert!(!store.update(day, missing.raw(), &b2).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_records_in_file_are_skipped() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();

        let yaml = "- ident: GOOD\n  lat: 123456N\n  lon: 0765432W\n  rad: 500NM\n\
                    - ident: BAD\n  lat: 12345N\n  lon: 0765432W\n  rad: 500NM\n";
        std::fs::write(dir.path().join(day.yaml_name()), yaml).unwrap();

        let list = store.get_day(day).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].ident(), "GOOD");
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_day() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();

        std::fs::write(dir.path().join(day.yaml_name()), "").unwrap();
        assert!(store.get_day(day).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let store = DayStore::open(dir.path()).await.unwrap();
        let day: DayKey = "2024-03-01".parse().unwrap();
        store.add(day, &notam("ALPHA", "100")).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
