use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::error::Result;
use crate::mix::MixArchive;

/// Entry point for loading game data directories.
/// This is best to use at a high level, as it caches parsed archives.
#[derive(Clone)]
pub struct Vault {
    root: PathBuf,
    state: Arc<RwLock<VaultState>>,
}

impl Vault {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            state: Arc::new(RwLock::new(VaultState {
                archives: HashMap::new(),
            })),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open an archive by name relative to the vault root.
    pub fn archive(&self, name: &str) -> Result<Arc<MixArchive>> {
        self.load_archive(Cow::Owned(self.root.join(name)))
    }

    pub fn load_archive(&self, path: Cow<Path>) -> Result<Arc<MixArchive>> {
        // Pass one: check with read lock.
        {
            let state = self.state.read();
            if let Some(v) = state.archives.get(path.as_ref()) {
                return Ok(Arc::clone(v));
            }
        }

        // Pass two: try again with upgradable read lock.
        let state = self.state.upgradable_read();
        if let Some(v) = state.archives.get(path.as_ref()) {
            return Ok(Arc::clone(v));
        }
        // Pass three: load it under upgradable read lock, and then write lock to save it.
        let archive = Arc::new(MixArchive::open(&path)?);
        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state
            .archives
            .insert(path.into_owned(), Arc::clone(&archive));
        Ok(archive)
    }
}

struct VaultState {
    archives: HashMap<PathBuf, Arc<MixArchive>>,
}

#[cfg(test)]
mod vault_tests {
    use std::borrow::Cow;
    use std::io::Write;

    use super::Vault;

    #[test]
    fn caches_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.mix");
        // A TD archive with a single one-byte entry.
        let mut data = Vec::new();
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.push(0x42);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&data).unwrap();
        drop(f);

        let vault = Vault::new(dir.path().to_path_buf());
        let a = vault.load_archive(Cow::Borrowed(path.as_path())).unwrap();
        let b = vault.archive("one.mix").unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
        assert_eq!(a.entries().len(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::new(dir.path().to_path_buf());
        assert!(vault.archive("nope.mix").is_err());
    }
}
