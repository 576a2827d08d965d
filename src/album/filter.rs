use std::collections::BTreeMap;

use crate::config::FilterSettings;
use crate::meta::FieldStore;
use crate::relocate::SkipReason;

/// Whole-album gates. Both are disabled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlbumFilter {
    /// Minimum number of files an album needs.
    pub min_files: Option<usize>,
    /// Require the file count to match the declared track total.
    pub require_complete: bool,
}

impl From<&FilterSettings> for AlbumFilter {
    fn from(settings: &FilterSettings) -> Self {
        Self {
            min_files: settings.album_min,
            require_complete: settings.album_complete,
        }
    }
}

impl AlbumFilter {
    /// Decide for a whole album. `None` lets every member through, `Some`
    /// excludes every member with the returned reason.
    pub fn check(&self, members: &[&FieldStore]) -> Option<SkipReason> {
        let files = members.len();
        if let Some(minimum) = self.min_files {
            if files < minimum {
                return Some(SkipReason::BelowMinimum { files, minimum });
            }
        }
        if self.require_complete {
            let expected = expected_tracks(members);
            if expected != Some(files) {
                return Some(SkipReason::IncompleteAlbum { files, expected });
            }
        }
        None
    }
}

/// Declared size of the album: the sum of `tracktotal` over the discs present
/// in the group. Albums stored one disc per directory are judged disc by disc.
///
/// `None` when no track total is known.
fn expected_tracks(members: &[&FieldStore]) -> Option<usize> {
    let mut per_disc: BTreeMap<u32, u32> = BTreeMap::new();
    for fields in members {
        let total = fields.int("tracktotal");
        let slot = per_disc.entry(fields.int("disc")).or_default();
        *slot = (*slot).max(total);
    }

    let total: u32 = per_disc.values().sum();
    (total > 0).then_some(total as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(disc: u32, disctotal: u32, tracktotal: u32) -> FieldStore {
        let mut f = FieldStore::new();
        f.set("disc", disc);
        f.set("disctotal", disctotal);
        f.set("tracktotal", tracktotal);
        f
    }

    fn album(n: usize, tracktotal: u32) -> Vec<FieldStore> {
        (0..n).map(|_| track(0, 0, tracktotal)).collect()
    }

    fn check(filter: AlbumFilter, album: &[FieldStore]) -> Option<SkipReason> {
        let members: Vec<&FieldStore> = album.iter().collect();
        filter.check(&members)
    }

    #[test]
    fn disabled_filter_passes_everything() {
        assert_eq!(check(AlbumFilter::default(), &album(1, 0)), None);
    }

    #[test]
    fn minimum_size_excludes_small_albums() {
        let filter = AlbumFilter {
            min_files: Some(5),
            require_complete: false,
        };
        assert_eq!(
            check(filter, &album(3, 3)),
            Some(SkipReason::BelowMinimum {
                files: 3,
                minimum: 5
            })
        );
        assert_eq!(check(filter, &album(5, 0)), None);
    }

    #[test]
    fn minimum_size_wins_over_completeness() {
        let filter = AlbumFilter {
            min_files: Some(5),
            require_complete: true,
        };
        assert!(matches!(
            check(filter, &album(3, 12)),
            Some(SkipReason::BelowMinimum { .. })
        ));
    }

    #[test]
    fn completeness_compares_file_count_with_tracktotal() {
        let filter = AlbumFilter {
            min_files: None,
            require_complete: true,
        };
        assert_eq!(check(filter, &album(4, 4)), None);
        assert_eq!(
            check(filter, &album(3, 4)),
            Some(SkipReason::IncompleteAlbum {
                files: 3,
                expected: Some(4)
            })
        );
    }

    #[test]
    fn unknown_tracktotal_counts_as_incomplete() {
        let filter = AlbumFilter {
            min_files: None,
            require_complete: true,
        };
        assert_eq!(
            check(filter, &album(3, 0)),
            Some(SkipReason::IncompleteAlbum {
                files: 3,
                expected: None
            })
        );
    }

    #[test]
    fn multi_disc_albums_sum_disc_totals() {
        let filter = AlbumFilter {
            min_files: None,
            require_complete: true,
        };
        let mut tracks = vec![track(1, 2, 2), track(1, 2, 2)];
        tracks.extend([track(2, 2, 3), track(2, 2, 3), track(2, 2, 3)]);
        assert_eq!(check(filter, &tracks), None);

        let tracks = vec![track(1, 2, 2), track(2, 2, 3), track(2, 2, 3)];
        assert_eq!(
            check(filter, &tracks),
            Some(SkipReason::IncompleteAlbum {
                files: 3,
                expected: Some(5)
            })
        );
    }

    #[test]
    fn disc_directory_is_complete_on_its_own() {
        let filter = AlbumFilter {
            min_files: None,
            require_complete: true,
        };
        let cd1 = vec![track(1, 2, 3), track(1, 2, 3), track(1, 2, 3)];
        assert_eq!(check(filter, &cd1), None);

        let partial = vec![track(1, 2, 3), track(1, 2, 3)];
        assert_eq!(
            check(filter, &partial),
            Some(SkipReason::IncompleteAlbum {
                files: 2,
                expected: Some(3)
            })
        );
    }

    #[test]
    fn from_settings() {
        let settings = FilterSettings {
            album_min: Some(2),
            album_complete: true,
        };
        assert_eq!(
            AlbumFilter::from(&settings),
            AlbumFilter {
                min_files: Some(2),
                require_complete: true
            }
        );
    }
}
