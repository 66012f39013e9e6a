//! Batch kinds
//!
//! A batch kind selects the record-set query, whether records are enriched
//! with holdings or marked deleted, the filename label and the remote
//! destination directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of export batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    /// Every record with in-scope holdings
    Full,
    /// Records whose holdings were created or activated in the window
    Updates,
    /// Records whose last in-scope holdings were deleted in the window
    Deletes,
}

impl BatchKind {
    /// Label used in batch filenames
    pub fn label(&self) -> &'static str {
        match self {
            BatchKind::Full => "full",
            BatchKind::Updates => "updates",
            BatchKind::Deletes => "deletes",
        }
    }

    /// Remote directory the batch is uploaded into
    pub fn remote_dir(&self) -> &'static str {
        self.label()
    }

    /// Delete batches carry no holdings and flip the leader status instead
    pub fn is_delete(&self) -> bool {
        matches!(self, BatchKind::Deletes)
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BatchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(BatchKind::Full),
            "updates" => Ok(BatchKind::Updates),
            "deletes" => Ok(BatchKind::Deletes),
            other => Err(format!(
                "Invalid batch kind '{other}'. Must be one of: full, updates, deletes"
            )),
        }
    }
}
