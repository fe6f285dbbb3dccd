use serde::Serialize;

const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Canonical word form of a display name plus the derived strings that get
/// compared against candidate keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedName {
    words: Vec<String>,
    combined: String,
    reversed: String,
    initials: String,
}

impl NormalizedName {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Words joined with no separator, e.g. `janedoe`.
    pub fn combined(&self) -> &str {
        &self.combined
    }

    /// Words in reverse order joined with no separator, e.g. `doejane`.
    pub fn reversed(&self) -> &str {
        &self.reversed
    }

    /// First letter of each word, e.g. `jd`.
    pub fn initials(&self) -> &str {
        &self.initials
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<&str> for NormalizedName {
    fn from(value: &str) -> Self {
        normalize(value)
    }
}

/// Lowercases, keeps `a-z` and whitespace, drops apostrophes, and splits into
/// words.
///
/// Straight apostrophes survive the letter filter and are removed afterwards,
/// so `O'Brien` yields the single word `obrien`. Every other non-letter,
/// hyphens included, is dropped in place: `Mary-Jane` yields `maryjane`.
/// Input without letters yields no words. A byte order mark separates words
/// like any other whitespace.
pub fn normalize(name: &str) -> NormalizedName {
    let filtered: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c == BYTE_ORDER_MARK { ' ' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace() || *c == '\'')
        .filter(|c| !APOSTROPHES.contains(c))
        .collect();

    let words: Vec<String> = filtered.split_whitespace().map(str::to_string).collect();

    let combined = words.concat();
    let reversed = words.iter().rev().map(String::as_str).collect::<String>();
    let initials = words
        .iter()
        .filter_map(|word| word.chars().next())
        .collect::<String>();

    NormalizedName {
        words,
        combined,
        reversed,
        initials,
    }
}
