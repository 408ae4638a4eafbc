//! Persistence-facing records and the adapter seam.
//!
//! The engine never talks to storage directly. It snapshots traversal
//! state into plain records and hands them to a `PersistenceAdapter`
//! implemented by the host application.

use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PersistError;

/// One `(question, answer)` pair in the submission-in-progress log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseEntry {
    pub question: String,
    pub answer: String,
}

/// A resumable snapshot of a partially-completed traversal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DraftRecord {
    pub flow_id: String,
    pub responses: Vec<ResponseEntry>,
    pub current_node_id: String,
}

impl DraftRecord {
    /// Serializes the draft using the bincode format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        encode_to_vec(self, standard())
            .map_err(|e| PersistError::Backend(format!("Serialization failed: {}", e)))
    }

    /// Deserializes a draft from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        decode_from_slice(bytes, standard())
            .map(|(record, _)| record) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| PersistError::Backend(format!("Deserialization failed: {}", e)))
    }

    /// Saves the draft to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| {
            PersistError::Backend(format!("Could not write '{}': {}", path.display(), e))
        })
    }

    /// Loads a draft from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            PersistError::Backend(format!("Could not read '{}': {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }
}

/// Opaque reference to a stored draft.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftHandle(pub String);

/// Opaque reference to a completed submission.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub String);

/// Storage operations the engine depends on, implemented by the host.
pub trait PersistenceAdapter {
    /// Stores a resumable draft and returns a handle to it.
    fn save_draft(&mut self, record: &DraftRecord) -> Result<DraftHandle, PersistError>;

    /// Stores a sealed, completed submission.
    fn finalize_submission(
        &mut self,
        flow_id: &str,
        responses: &[ResponseEntry],
    ) -> Result<SubmissionId, PersistError>;

    /// Retrieves a previously stored draft.
    fn load_draft(&mut self, handle: &DraftHandle) -> Result<DraftRecord, PersistError>;
}
