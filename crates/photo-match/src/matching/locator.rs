use serde::{Deserialize, Serialize};

/// Characters `encodeURIComponent` leaves alone that `urlencoding` escapes.
const JS_UNRESERVED_EXTRAS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Storage host and bucket that photo download URLs point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub host: String,
    pub bucket: String,
}

impl StorageLocation {
    pub fn new(host: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            bucket: bucket.into(),
        }
    }

    /// Download URL for an object, in the form clients already resolve:
    /// `https://<host>/v0/b/<bucket>/o/<encoded object name>?alt=media`.
    pub fn photo_url(&self, object_name: &str) -> String {
        format!(
            "https://{}/v0/b/{}/o/{}?alt=media",
            self.host,
            self.bucket,
            encode_uri_component(object_name)
        )
    }
}

/// Percent-encodes a path component the way JavaScript's
/// `encodeURIComponent` does.
pub fn encode_uri_component(value: &str) -> String {
    let mut encoded = urlencoding::encode(value).into_owned();
    for (escaped, literal) in JS_UNRESERVED_EXTRAS {
        if encoded.contains(escaped) {
            encoded = encoded.replace(escaped, literal);
        }
    }
    encoded
}
