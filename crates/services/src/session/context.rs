use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parking_lot::Mutex;
use speakcheck_models::StudentIdentity;
use thiserror::Error;
use tracing::{debug, info};

use crate::records::{RecordStore, RecordStoreError};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("identity store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("identity store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no data directory available for the identity store")]
    NoDataDir,
    #[error(transparent)]
    Lookup(#[from] RecordStoreError),
}

/// Persists the signed-in identity across restarts.
pub trait IdentityStore: Send + Sync {
    fn load(&self) -> Result<Option<StudentIdentity>, ContextError>;

    fn save(&self, identity: &StudentIdentity) -> Result<(), ContextError>;

    fn clear(&self) -> Result<(), ContextError>;
}

#[derive(Default)]
pub struct MemoryIdentityStore {
    identity: Mutex<Option<StudentIdentity>>,
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<StudentIdentity>, ContextError> {
        Ok(self.identity.lock().clone())
    }

    fn save(&self, identity: &StudentIdentity) -> Result<(), ContextError> {
        *self.identity.lock() = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ContextError> {
        *self.identity.lock() = None;
        Ok(())
    }
}

/// JSON file holding the last signed-in identity.
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/speakcheck/student.json` for the current user.
    pub fn default_location() -> Result<Self, ContextError> {
        let dirs = ProjectDirs::from("", "", "speakcheck").ok_or(ContextError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join("student.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<StudentIdentity>, ContextError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, identity: &StudentIdentity) -> Result<(), ContextError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(identity)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ContextError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The current student, shared by every step of a test session.
pub struct StudentContext {
    identity: Option<StudentIdentity>,
    store: Box<dyn IdentityStore>,
}

impl StudentContext {
    /// Restores any identity persisted by a previous run.
    pub fn load(store: Box<dyn IdentityStore>) -> Result<Self, ContextError> {
        let identity = store.load()?;
        if let Some(identity) = &identity {
            debug!(student_id = %identity.id, "Restored student identity");
        }
        Ok(Self { identity, store })
    }

    pub fn student_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.id.as_str())
    }

    pub fn identity(&self) -> Option<&StudentIdentity> {
        self.identity.as_ref()
    }

    pub fn sign_in(&mut self, identity: StudentIdentity) -> Result<(), ContextError> {
        self.store.save(&identity)?;
        info!(student_id = %identity.id, "Student signed in");
        self.identity = Some(identity);
        Ok(())
    }

    /// Looks the id up in the record store and signs in on a match.
    ///
    /// An unknown id leaves the context untouched.
    pub async fn resolve(
        &mut self,
        records: &dyn RecordStore,
        student_id: &str,
    ) -> Result<Option<&StudentIdentity>, ContextError> {
        match records.lookup_student(student_id).await? {
            Some(identity) => {
                self.sign_in(identity)?;
                Ok(self.identity.as_ref())
            }
            None => Ok(None),
        }
    }

    /// Forgets the identity, e.g. after the final question.
    pub fn clear(&mut self) -> Result<(), ContextError> {
        self.store.clear()?;
        if let Some(identity) = self.identity.take() {
            info!(student_id = %identity.id, "Student context cleared");
        }
        Ok(())
    }
}
