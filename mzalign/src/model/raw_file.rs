use serde::{Deserialize, Serialize};

// Stable id for raw data files, the identity key for peaks
pub type RawFileId = usize;

/// One analytical run. Immutable once loaded; rows reference peaks through
/// the file id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDataFile {
    pub id: RawFileId,
    pub name: String,
}

impl RawDataFile {
    pub fn new(id: RawFileId, name: &str) -> Self {
        RawDataFile {
            id,
            name: name.to_string(),
        }
    }
}
