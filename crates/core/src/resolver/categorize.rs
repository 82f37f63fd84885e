//! Categorization of search results into release structures.

use crate::catalog::{QualityMap, SeasonMap, UncategorizedBucket};
use crate::release::{
    extract_episode_only, extract_quality_with, extract_season_episode, is_full_pack, QualityOrder,
    ReleaseFilter,
};
use crate::searcher::Release;

/// Season grid plus the bucket of releases that would not fit on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    pub seasons: SeasonMap,
    pub uncategorized: UncategorizedBucket,
}

impl Resolved {
    /// Whether anything at all was placed.
    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty() && self.uncategorized.is_empty()
    }
}

/// Place releases of a seasoned title onto its grid.
///
/// Full packs go to the bucket before any parsing runs, so pack names never
/// reach the loose season/episode patterns. Names that yield no pair land in
/// the bucket too; the grid and the bucket never share a release.
pub fn resolve_seasoned(
    releases: Vec<Release>,
    filter: &ReleaseFilter,
    order: QualityOrder,
) -> Resolved {
    let mut resolved = Resolved::default();

    for release in releases {
        if !filter.accepts(&release.name, &release.category) {
            continue;
        }
        if is_full_pack(&release.name) {
            resolved.uncategorized.insert(release);
            continue;
        }
        match extract_season_episode(&release.name) {
            Ok((season, episode)) => {
                let quality = extract_quality_with(&release.name, order);
                resolved.seasons.insert(season, episode, quality, release);
            }
            Err(_) => resolved.uncategorized.insert(release),
        }
    }

    resolved.seasons.sort_all();
    resolved
}

/// Place releases of a single-season title onto season 1 of a grid.
///
/// Anime airs in absolute episode numbering, so only the episode number is
/// extracted; an unparseable name goes to the bucket.
pub fn resolve_single_season(
    releases: Vec<Release>,
    filter: &ReleaseFilter,
    order: QualityOrder,
) -> Resolved {
    let mut resolved = Resolved::default();

    for release in releases {
        if !filter.accepts(&release.name, &release.category) {
            continue;
        }
        if is_full_pack(&release.name) {
            resolved.uncategorized.insert(release);
            continue;
        }
        let episode = extract_episode_only(&release.name);
        if episode == 0 {
            resolved.uncategorized.insert(release);
            continue;
        }
        let quality = extract_quality_with(&release.name, order);
        resolved.seasons.insert(1, episode, quality, release);
    }

    resolved.seasons.sort_all();
    resolved
}

/// Group movie releases by quality. Movies have no grid and no bucket;
/// everything the filter accepts lands in a quality slot ("unknown" when no
/// tag is found).
pub fn resolve_by_quality(
    releases: Vec<Release>,
    filter: &ReleaseFilter,
    order: QualityOrder,
) -> QualityMap {
    let mut map = QualityMap::new();

    for release in releases {
        if !filter.accepts(&release.name, &release.category) {
            continue;
        }
        let quality = extract_quality_with(&release.name, order);
        map.insert(quality, release);
    }

    map.sort_all();
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentKind;
    use crate::release::Quality;
    use crate::testing::fixtures;

    fn show_filter() -> ReleaseFilter {
        ReleaseFilter::for_kind(ContentKind::Show)
    }

    #[test]
    fn test_seasoned_places_parsed_releases() {
        let releases = vec![
            fixtures::release("Breaking.Bad.S02E05.1080p.WEB", "40"),
            fixtures::release("Breaking.Bad.3x08.720p", "12"),
        ];

        let resolved = resolve_seasoned(releases, &show_filter(), QualityOrder::UhdLast);

        assert!(resolved.seasons.has_episode(2, 5));
        assert!(resolved.seasons.has_episode(3, 8));
        assert!(resolved.uncategorized.is_empty());
    }

    #[test]
    fn test_seasoned_pack_check_runs_before_parsing() {
        // Without the pack check this name would land on the grid through
        // the loose digit-pair pattern.
        let releases = vec![fixtures::release("The.Wire.Season.3.Complete.720p", "30")];

        let resolved = resolve_seasoned(releases, &show_filter(), QualityOrder::UhdLast);

        assert!(resolved.seasons.is_empty());
        assert!(resolved
            .uncategorized
            .contains_name("The.Wire.Season.3.Complete.720p"));
    }

    #[test]
    fn test_seasoned_unparseable_goes_to_bucket() {
        let releases = vec![fixtures::release("The Wire Remastered", "5")];

        let resolved = resolve_seasoned(releases, &show_filter(), QualityOrder::UhdLast);

        assert!(resolved.seasons.is_empty());
        assert!(resolved.uncategorized.contains_name("The Wire Remastered"));
    }

    #[test]
    fn test_seasoned_drops_filtered_releases() {
        let mut wrong_category = fixtures::release("Show.S01E01.1080p", "10");
        wrong_category.category = "E-books".to_string();

        let releases = vec![
            wrong_category,
            fixtures::release("Show Official Soundtrack", "90"),
            fixtures::release("Show.S01E01.XXX.Parody", "50"),
        ];

        let resolved = resolve_seasoned(releases, &show_filter(), QualityOrder::UhdLast);

        assert!(resolved.is_empty());
    }

    #[test]
    fn test_seasoned_every_accepted_release_lands_exactly_once() {
        let releases = vec![
            fixtures::release("Show.S01E01.1080p", "10"),
            fixtures::release("Show.S01E02.720p", "20"),
            fixtures::release("Show COMPLETE", "30"),
            fixtures::release("Show Extras", "40"),
        ];

        let resolved = resolve_seasoned(releases, &show_filter(), QualityOrder::UhdLast);

        assert_eq!(
            resolved.seasons.release_count() + resolved.uncategorized.len(),
            4
        );
    }

    #[test]
    fn test_seasoned_ranks_within_quality_buckets() {
        let releases = vec![
            fixtures::release("Show.S01E01.1080p.x264", "3"),
            fixtures::release("Show.S01E01.1080p.x265", "80"),
            fixtures::release("Show.S01E01.1080p.REPACK", "nan"),
        ];

        let resolved = resolve_seasoned(releases, &show_filter(), QualityOrder::UhdLast);

        let bucket = &resolved.seasons.0[&1][&1][&Quality::Hd1080];
        assert_eq!(bucket[0].seeders, "80");
        assert_eq!(bucket[1].seeders, "3");
        assert_eq!(bucket[2].seeders, "nan");
    }

    #[test]
    fn test_single_season_uses_absolute_numbering() {
        let filter = ReleaseFilter::for_kind(ContentKind::AnimeShow);
        let releases = vec![
            fixtures::anime_release("[Subs] Frieren - 28 [1080p]", "60"),
            fixtures::anime_release("[Subs] Bleach 366 [720p]", "15"),
        ];

        let resolved = resolve_single_season(releases, &filter, QualityOrder::UhdLast);

        assert!(resolved.seasons.has_episode(1, 28));
        assert!(resolved.seasons.has_episode(1, 366));
        assert_eq!(resolved.seasons.season_count(), 1);
    }

    #[test]
    fn test_single_season_zero_episode_goes_to_bucket() {
        let filter = ReleaseFilter::for_kind(ContentKind::AnimeShow);
        let releases = vec![
            fixtures::anime_release("Gintama 4th Season", "10"),
            fixtures::anime_release("One Piece COMPLETE", "99"),
        ];

        let resolved = resolve_single_season(releases, &filter, QualityOrder::UhdLast);

        assert!(resolved.seasons.is_empty());
        assert_eq!(resolved.uncategorized.len(), 2);
    }

    #[test]
    fn test_movies_group_by_quality() {
        let filter = ReleaseFilter::for_kind(ContentKind::Movie);
        let releases = vec![
            fixtures::movie_release("Film.2023.1080p.BluRay", "200"),
            fixtures::movie_release("Film.2023.1080p.WEB", "350"),
            fixtures::movie_release("Film.2023.2160p.HDR", "40"),
            fixtures::movie_release("Film.2023.DVDSCR", "5"),
        ];

        let map = resolve_by_quality(releases, &filter, QualityOrder::UhdLast);

        assert_eq!(map.0[&Quality::Hd1080].len(), 2);
        assert_eq!(map.0[&Quality::Hd1080][0].seeders, "350");
        assert_eq!(map.0[&Quality::Uhd4k].len(), 1);
        assert_eq!(map.0[&Quality::Hd720].len(), 1); // "dvd" marker
    }

    #[test]
    fn test_movies_without_quality_tag_land_in_unknown() {
        let filter = ReleaseFilter::for_kind(ContentKind::Movie);
        let releases = vec![fixtures::movie_release("Film 2023 CAM", "8")];

        let map = resolve_by_quality(releases, &filter, QualityOrder::UhdLast);

        assert_eq!(map.0[&Quality::Unknown].len(), 1);
    }

    #[test]
    fn test_quality_order_preference_applies() {
        let filter = ReleaseFilter::for_kind(ContentKind::Movie);
        // "2160p" carries both a UHD marker and the 1080p-adjacent "480p"
        let releases = vec![fixtures::movie_release("Film.2160p.480p.mkv", "10")];

        let last = resolve_by_quality(releases.clone(), &filter, QualityOrder::UhdLast);
        assert_eq!(last.0[&Quality::Sd480].len(), 1);

        let first = resolve_by_quality(releases, &filter, QualityOrder::UhdFirst);
        assert_eq!(first.0[&Quality::Uhd4k].len(), 1);
    }

    #[test]
    fn test_mixed_result_set_scenario() {
        let releases = vec![
            fixtures::release("Example.Show.S01E01.1080p.WEB", "40"),
            fixtures::release("Example.Show.S01E01.1080p.BluRay", "90"),
            fixtures::release("Example.Show.1x02.720p", "25"),
            fixtures::release("Example Show COMPLETE Series", "60"),
            fixtures::release("Example Show Official Soundtrack", "100"),
            fixtures::release("Example Show Behind The Scenes", "2"),
        ];

        let resolved = resolve_seasoned(releases, &show_filter(), QualityOrder::UhdLast);

        let e1 = &resolved.seasons.0[&1][&1][&Quality::Hd1080];
        assert_eq!(e1.len(), 2);
        assert_eq!(e1[0].seeders, "90");
        assert!(resolved.seasons.has_episode(1, 2));
        assert!(resolved
            .uncategorized
            .contains_name("Example Show COMPLETE Series"));
        assert!(resolved
            .uncategorized
            .contains_name("Example Show Behind The Scenes"));
        // Soundtrack was dropped, not bucketed.
        assert_eq!(resolved.uncategorized.len(), 2);
    }
}
