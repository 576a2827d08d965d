use std::collections::BTreeMap;
use std::fmt;

/// Field names every tag reader must expose, set or not.
pub const READABLE_FIELDS: &[&str] = &[
    "title",
    "artist",
    "artist_sort",
    "artist_credit",
    "albumartist",
    "albumartist_sort",
    "albumartist_credit",
    "album",
    "album_sort",
    "genre",
    "composer",
    "grouping",
    "label",
    "comments",
    "track",
    "tracktotal",
    "disc",
    "disctotal",
    "year",
    "original_year",
    "bpm",
    "comp",
    "mb_trackid",
    "mb_albumid",
];

/// A single metadata value.
///
/// Zero integers and empty strings count as unset, matching how tags with a
/// blank or `0` value are usually written by taggers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    #[default]
    Absent,
    Text(String),
    Int(u32),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Int(n) => *n == 0,
        }
    }

    /// Numeric view of the value; text is parsed leniently and anything
    /// unparsable is `0`.
    pub fn as_int(&self) -> u32 {
        match self {
            FieldValue::Absent => 0,
            FieldValue::Int(n) => *n,
            FieldValue::Text(s) => leading_number(s).unwrap_or(0),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent | FieldValue::Int(0) => Ok(()),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Int(n)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

/// Parse the leading run of ASCII digits, e.g. `"4/12"` -> 4, `"2001-05-01"` -> 2001.
pub fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

/// Ordered mapping from field name to value for one audio file.
///
/// Lookups of names that were never set yield [`FieldValue::Absent`], so a
/// template can reference any name without failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStore {
    fields: BTreeMap<String, FieldValue>,
}

static ABSENT: FieldValue = FieldValue::Absent;

impl Default for FieldStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldStore {
    /// A store with every readable field present and absent.
    pub fn new() -> Self {
        let fields = READABLE_FIELDS
            .iter()
            .map(|name| (name.to_string(), FieldValue::Absent))
            .collect();
        Self { fields }
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&ABSENT)
    }

    /// Rendered text of a field, empty when unset.
    pub fn text(&self, name: &str) -> String {
        self.get(name).to_string()
    }

    pub fn int(&self, name: &str) -> u32 {
        self.get(name).as_int()
    }

    pub fn is_set(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FieldValue)> {
        self.fields.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: AsRef<str>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = FieldStore::new();
        for (k, v) in iter {
            store.set(k.as_ref(), v);
        }
        store
    }
}
