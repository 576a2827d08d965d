use super::store::{FieldStore, FieldValue};

/// Ordered list of candidate fields with a terminal default.
struct Fallback {
    candidates: &'static [&'static str],
    default: &'static str,
}

impl Fallback {
    fn resolve(&self, fields: &FieldStore) -> FieldValue {
        self.candidates
            .iter()
            .map(|name| fields.get(name))
            .find(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                if self.default.is_empty() {
                    FieldValue::Absent
                } else {
                    FieldValue::Text(self.default.to_string())
                }
            })
    }
}

const ARTIST_SAFE: Fallback = Fallback {
    candidates: &["albumartist", "artist", "albumartist_credit", "artist_credit"],
    default: "",
};

// `artistsafe` must be derived before this chain runs.
const ARTIST_SAFE_SORT: Fallback = Fallback {
    candidates: &["albumartist_sort", "artist_sort", "artistsafe"],
    default: "Unknown",
};

const YEAR_SAFE: Fallback = Fallback {
    candidates: &["original_year", "year"],
    default: "",
};

/// Strip what must never reach a file name: control characters, path
/// separators and the characters Windows and SMB shares reject.
pub fn sanitize(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_control())
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '?' | '*' | '|'))
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    cleaned.trim().to_string()
}

/// Sanitize every text field, then append the derived fields.
///
/// Total over all inputs: each derived field has a terminal default.
pub fn normalize(fields: &mut FieldStore, shell_friendly: bool) {
    for (_, value) in fields.iter_mut() {
        if let FieldValue::Text(s) = value {
            *s = sanitize(s);
        }
    }

    let disctrack = disc_track(fields);
    fields.set("disctrack", disctrack);

    let artistsafe = ARTIST_SAFE.resolve(fields);
    fields.set("artistsafe", artistsafe);

    let mut artistsafe_sort = ARTIST_SAFE_SORT.resolve(fields).to_string();
    if shell_friendly {
        artistsafe_sort = artistsafe_sort.replace(", ", "_");
    }
    fields.set("artistsafe_sort", artistsafe_sort);

    let year_safe = YEAR_SAFE.resolve(fields);
    fields.set("year_safe", year_safe);

    let artist_initial = initial(&fields.text("artistsafe_sort"));
    fields.set("artist_initial", artist_initial);
    let album_initial = initial(&fields.text("album"));
    fields.set("album_initial", album_initial);
}

/// Sortable disc/track prefix, e.g. `04`, `2-07`, `03-112`.
fn disc_track(fields: &FieldStore) -> String {
    let disc = fields.int("disc");
    let disctotal = fields.int("disctotal");
    let track = fields.int("track");
    let tracktotal = fields.int("tracktotal");

    let track = if tracktotal > 99 {
        format!("{track:03}")
    } else {
        format!("{track:02}")
    };

    if disc > 0 && disctotal > 1 {
        let disc = if disctotal > 9 {
            format!("{disc:02}")
        } else {
            disc.to_string()
        };
        format!("{disc}-{track}")
    } else {
        track
    }
}

fn initial(s: &str) -> String {
    s.chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_separators_and_drops_illegal_chars() {
        assert_eq!(sanitize("AC/DC"), "AC_DC");
        assert_eq!(sanitize("a\\b"), "a_b");
        assert_eq!(sanitize("What?"), "What");
        assert_eq!(sanitize("  tab\there  "), "tabhere");
        assert_eq!(sanitize("Ke$ha"), "Ke$ha");
    }

    #[test]
    fn fallback_uses_first_non_empty_candidate() {
        let mut fields = FieldStore::new();
        fields.set("artist", "B");
        fields.set("albumartist_credit", "C");
        assert_eq!(ARTIST_SAFE.resolve(&fields), FieldValue::Text("B".into()));

        fields.set("albumartist", "A");
        assert_eq!(ARTIST_SAFE.resolve(&fields), FieldValue::Text("A".into()));
    }

    #[test]
    fn fallback_terminal_default() {
        let fields = FieldStore::new();
        assert_eq!(ARTIST_SAFE.resolve(&fields), FieldValue::Absent);
        assert_eq!(
            ARTIST_SAFE_SORT.resolve(&fields),
            FieldValue::Text("Unknown".into())
        );
    }

    #[test]
    fn initial_lowercases_first_char() {
        assert_eq!(initial("The Band"), "t");
        assert_eq!(initial("Ärzte"), "ä");
        assert_eq!(initial(""), "");
    }
}
