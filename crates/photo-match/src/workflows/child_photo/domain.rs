use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a record under the children collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(pub String);

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fields of a child record the matcher reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRecord {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A created or updated child record. `after` is absent when the record was
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildWriteEvent {
    pub child_id: ChildId,
    #[serde(default)]
    pub after: Option<ChildRecord>,
}

impl ChildWriteEvent {
    pub fn new(child_id: impl Into<String>, display_name: Option<&str>) -> Self {
        Self {
            child_id: ChildId(child_id.into()),
            after: Some(ChildRecord {
                display_name: display_name.map(str::to_string),
                photo_url: None,
            }),
        }
    }

    /// The display name when one is present and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        self.after
            .as_ref()
            .and_then(|record| record.display_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match &self.after {
            None => Some(SkipReason::RecordDeleted),
            Some(_) if self.display_name().is_none() => Some(SkipReason::MissingDisplayName),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    RecordDeleted,
    MissingDisplayName,
}

impl SkipReason {
    pub fn label(self) -> &'static str {
        match self {
            SkipReason::RecordDeleted => "record deleted",
            SkipReason::MissingDisplayName => "no displayName",
        }
    }
}

/// What an event should do to the record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhotoAction {
    Skip {
        reason: SkipReason,
    },
    NoMatch {
        best_score: f64,
    },
    WritePhotoUrl {
        child_id: ChildId,
        candidate_id: String,
        photo_url: String,
        score: f64,
    },
}

impl PhotoAction {
    pub fn writes(&self) -> bool {
        matches!(self, PhotoAction::WritePhotoUrl { .. })
    }
}

/// Result of handling one event. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventOutcome {
    Completed { action: PhotoAction },
    Failed { error: String },
}
