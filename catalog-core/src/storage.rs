use anyhow::{Context, Result};
use fs2::FileExt;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::CatalogStore;

/// Determines the catalog file path to use.
///
/// Priority: explicit path from the caller, then the `CATALOG_FILE`
/// environment variable, then `catalog.yaml` in the current directory if it
/// already exists, then `~/.catalog/catalog.yaml`.
pub fn resolve_catalog_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = env::var("CATALOG_FILE") {
        return Ok(PathBuf::from(path));
    }

    let local = PathBuf::from("catalog.yaml");
    if local.exists() {
        return Ok(local);
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".catalog").join("catalog.yaml"))
}

/// Loads and saves the catalog file, guarded by a sidecar lock file so two
/// concurrent editors do not tear each other's writes.
pub struct Storage {
    file_path: PathBuf,
    lock_file_path: PathBuf,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let lock_file_path = file_path.with_extension("yaml.lock");
        Self {
            file_path,
            lock_file_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Acquire an exclusive lock for writing. The returned handle must be
    /// held for the duration of the operation.
    fn acquire_write_lock(&self) -> Result<File> {
        if let Some(parent) = self.lock_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to create lock file: {:?}", self.lock_file_path))?;

        let start = std::time::Instant::now();
        let timeout = Duration::from_secs(5);

        loop {
            match FileExt::try_lock_exclusive(&lock_file) {
                Ok(()) => return Ok(lock_file),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if start.elapsed() > timeout {
                        anyhow::bail!(
                            "Timeout waiting for catalog lock - another user may be editing: {:?}",
                            self.file_path
                        );
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to acquire lock on {:?}", self.lock_file_path)
                    })
                }
            }
        }
    }

    /// Acquire a shared lock for reading, if a lock file exists at all.
    fn acquire_read_lock(&self) -> Result<Option<File>> {
        if !self.lock_file_path.exists() {
            return Ok(None);
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to open lock file: {:?}", self.lock_file_path))?;

        let start = std::time::Instant::now();
        let timeout = Duration::from_secs(5);

        loop {
            match FileExt::try_lock_shared(&lock_file) {
                Ok(()) => return Ok(Some(lock_file)),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if start.elapsed() > timeout {
                        anyhow::bail!(
                            "Timeout waiting for catalog lock - another user may be editing: {:?}",
                            self.file_path
                        );
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to acquire lock on {:?}", self.lock_file_path)
                    })
                }
            }
        }
    }

    /// Loads the catalog. A missing file is initialized with the seed
    /// catalog, which is also written back to disk.
    pub fn load(&self) -> Result<CatalogStore> {
        if !self.file_path.exists() {
            let store = CatalogStore::seed();
            self.save(&store)?;
            return Ok(store);
        }

        let _lock = self.acquire_read_lock()?;

        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open file: {:?}", self.file_path))?;
        let reader = BufReader::new(file);

        serde_yaml::from_reader(reader)
            .with_context(|| format!("Failed to parse YAML from {:?}", self.file_path))
    }

    /// Saves the catalog, holding the exclusive lock while writing.
    pub fn save(&self, store: &CatalogStore) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut lock_file = self.acquire_write_lock()?;
        let _ = writeln!(
            lock_file,
            "Locked by PID {} at {}",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        );

        let yaml = serde_yaml::to_string(store)?;
        fs::write(&self.file_path, yaml)?;

        // Lock is released when lock_file is dropped
        Ok(())
    }

    /// Reload-modify-write under a single exclusive lock.
    pub fn update_atomically<F>(&self, update_fn: F) -> Result<CatalogStore>
    where
        F: FnOnce(&mut CatalogStore),
    {
        if !self.file_path.exists() {
            let mut store = CatalogStore::seed();
            update_fn(&mut store);
            self.save(&store)?;
            return Ok(store);
        }

        let mut lock_file = self.acquire_write_lock()?;
        let _ = writeln!(
            lock_file,
            "Locked by PID {} at {}",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        );

        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open file: {:?}", self.file_path))?;
        let reader = BufReader::new(file);
        let mut store: CatalogStore = serde_yaml::from_reader(reader)
            .with_context(|| format!("Failed to parse YAML from {:?}", self.file_path))?;

        update_fn(&mut store);

        let yaml = serde_yaml::to_string(&store)?;
        fs::write(&self.file_path, yaml)?;

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DevelopmentStatus;
    use tempfile::TempDir;

    #[test]
    fn load_seeds_a_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        let storage = Storage::new(&path);

        let store = storage.load().unwrap();
        assert!(path.exists());
        assert_eq!(store.modules.len(), 8);
        assert_eq!(store.modules[0].name, "Cadastros");

        // a second load reads the file it just wrote
        let again = storage.load().unwrap();
        assert_eq!(again, store);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        let storage = Storage::new(&path);

        let mut store = storage.load().unwrap();
        let module_id = store.modules[0].id.clone();
        let first_menu = store.modules[0].menus.roots()[0].clone();
        store
            .module_mut(&module_id)
            .unwrap()
            .menus
            .set_status(&first_menu, Some(DevelopmentStatus::Testing));
        storage.save(&store).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, store);
        assert_eq!(
            loaded.module(&module_id).unwrap().menus.get(&first_menu).unwrap().status,
            Some(DevelopmentStatus::Testing)
        );
    }

    #[test]
    fn update_atomically_applies_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        let storage = Storage::new(&path);
        storage.load().unwrap();

        let updated = storage
            .update_atomically(|store| {
                assert!(store.swap_modules(0, 1));
            })
            .unwrap();
        assert_eq!(updated.modules[0].name, "Governança");

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.modules[0].name, "Governança");
        assert_eq!(loaded.modules[1].name, "Cadastros");
    }
}
