use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::tag::ItemKey;

use crate::error::{Error, Result};

use super::store::{FieldStore, leading_number};

/// Source of raw metadata for one file.
pub trait TagReader {
    /// Read the raw tags of `path`. Every name in
    /// [`READABLE_FIELDS`](super::READABLE_FIELDS) is present in the result.
    fn read_tags(&self, path: &Path) -> Result<FieldStore>;
}

const TEXT_KEYS: &[(&str, ItemKey)] = &[
    ("title", ItemKey::TrackTitle),
    ("artist", ItemKey::TrackArtist),
    ("artist_sort", ItemKey::TrackArtistSortOrder),
    ("albumartist", ItemKey::AlbumArtist),
    ("albumartist_sort", ItemKey::AlbumArtistSortOrder),
    ("album", ItemKey::AlbumTitle),
    ("album_sort", ItemKey::AlbumTitleSortOrder),
    ("genre", ItemKey::Genre),
    ("composer", ItemKey::Composer),
    ("grouping", ItemKey::ContentGroup),
    ("label", ItemKey::Label),
    ("comments", ItemKey::Comment),
    ("mb_trackid", ItemKey::MusicBrainzRecordingId),
    ("mb_albumid", ItemKey::MusicBrainzReleaseId),
];

const NUMBER_KEYS: &[(&str, ItemKey)] = &[
    ("track", ItemKey::TrackNumber),
    ("tracktotal", ItemKey::TrackTotal),
    ("disc", ItemKey::DiscNumber),
    ("disctotal", ItemKey::DiscTotal),
    ("bpm", ItemKey::Bpm),
    ("original_year", ItemKey::OriginalReleaseDate),
];

/// Tag reader backed by `lofty`, covering ID3, Vorbis comments, MP4 atoms and
/// APE tags through lofty's generic tag view.
///
/// The `*_credit` fields have no generic lofty key and stay absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl TagReader for LoftyReader {
    fn read_tags(&self, path: &Path) -> Result<FieldStore> {
        let tagged = lofty::read_from_path(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut fields = FieldStore::new();
        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(fields);
        };

        for (name, key) in TEXT_KEYS {
            if let Some(v) = tag.get_string(key) {
                fields.set(name, v);
            }
        }
        for (name, key) in NUMBER_KEYS {
            if let Some(n) = tag.get_string(key).and_then(leading_number) {
                fields.set(name, n);
            }
        }

        // ID3v2.4 keeps the year in the recording date; older tags have a plain year.
        let year = tag
            .get_string(&ItemKey::Year)
            .or_else(|| tag.get_string(&ItemKey::RecordingDate))
            .and_then(leading_number);
        fields.set("year", year);

        let comp = tag
            .get_string(&ItemKey::FlagCompilation)
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
            .unwrap_or(false);
        if comp {
            fields.set("comp", 1u32);
        }

        Ok(fields)
    }
}
