use std::collections::BTreeSet;

use crate::meta::FieldStore;

/// An album is a compilation when its tracks name more than one
/// `artistsafe_sort`, or when any track carries the compilation flag.
///
/// Expects normalized field stores.
pub fn is_compilation<'a>(members: impl IntoIterator<Item = &'a FieldStore>) -> bool {
    let mut artists = BTreeSet::new();
    let mut flagged = false;
    for fields in members {
        flagged |= fields.is_set("comp");
        artists.insert(fields.text("artistsafe_sort"));
    }
    flagged || artists.len() > 1
}
