use serde::Serialize;

/// A storage object considered as a photo for a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub id: String,
    pub key: String,
}

impl Candidate {
    /// Returns `None` when the identifier has no letters to compare, which is
    /// the case for folder placeholders and purely numeric names.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let key = candidate_key(&id);
        if key.is_empty() {
            None
        } else {
            Some(Self { id, key })
        }
    }
}

/// Lowercased identifier with every character outside `a-z` removed.
pub fn candidate_key(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(char::is_ascii_lowercase)
        .collect()
}
