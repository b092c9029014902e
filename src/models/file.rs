//! Stored file metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one uploaded file. The blob itself lives in external
/// storage; the core only tracks ownership and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: Uuid,
    /// Back-reference to the owning user.
    pub owner_id: Uuid,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Upload payload: the metadata recorded once a blob has landed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFile {
    pub name: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_file_round_trips_through_json() {
        let file = StoredFile {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "report.pdf".to_string(),
            size: 1024,
            uploaded_at: Utc::now(),
        };
        let json = serde_json::to_string(&file).unwrap();
        let back: StoredFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, file.id);
        assert_eq!(back.size, 1024);
    }
}
