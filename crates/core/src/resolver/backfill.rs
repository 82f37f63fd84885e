//! Gap detection and targeted secondary searches.

use tracing::{debug, warn};

use super::Resolved;
use crate::metadata::EpisodeInfo;
use crate::release::{
    extract_quality_with, is_full_pack, QualityOrder, ReleaseFilter,
};
use crate::searcher::{Release, TorrentSearcher};

/// The (season, episode) pairs the ledger expects but the grid does not
/// cover with at least one release. Season 0 (specials) is excluded: it is
/// stored when a release parses to it, but never counted as a gap.
pub fn missing_episodes(resolved: &Resolved, ledger: &[EpisodeInfo]) -> Vec<(u32, u32)> {
    let mut gaps: Vec<(u32, u32)> = ledger
        .iter()
        .filter(|e| e.season != 0)
        .map(|e| (e.season, e.episode))
        .filter(|&(s, e)| !resolved.seasons.has_episode(s, e))
        .collect();
    gaps.sort_unstable();
    gaps.dedup();
    gaps
}

/// Fills ledger gaps with targeted per-episode searches.
///
/// For each gap, one query shaped `"<title> S<NN>E<NN>"` runs first; when it
/// places nothing on the slot, the looser `"<title> <NN>"` form runs as a
/// fallback. Results pass through the same relevance filter as the broad
/// search, and full packs route to the bucket rather than the slot.
pub struct Backfiller<'a> {
    searcher: &'a dyn TorrentSearcher,
    filter: &'a ReleaseFilter,
    order: QualityOrder,
}

impl<'a> Backfiller<'a> {
    pub fn new(
        searcher: &'a dyn TorrentSearcher,
        filter: &'a ReleaseFilter,
        order: QualityOrder,
    ) -> Self {
        Self {
            searcher,
            filter,
            order,
        }
    }

    /// Run the backfill pass over every detected gap. Returns the number of
    /// gaps that now hold at least one release. A search error or an
    /// unfillable gap leaves the slot empty and never fails the item.
    pub async fn fill(
        &self,
        title: &str,
        resolved: &mut Resolved,
        ledger: &[EpisodeInfo],
    ) -> usize {
        let gaps = missing_episodes(resolved, ledger);
        if gaps.is_empty() {
            return 0;
        }
        debug!(title = title, gaps = gaps.len(), "backfilling episode gaps");

        let mut filled = 0;
        for (season, episode) in gaps {
            let query = format!("{} S{:02}E{:02}", title, season, episode);
            if self.fill_slot(&query, season, episode, resolved).await {
                filled += 1;
                continue;
            }

            let fallback = format!("{} {:02}", title, episode);
            if self.fill_slot(&fallback, season, episode, resolved).await {
                filled += 1;
            } else {
                debug!(
                    title = title,
                    season = season,
                    episode = episode,
                    "episode gap left unfilled"
                );
            }
        }

        filled
    }

    /// Run one query and place its relevant results at the slot. Returns
    /// whether the slot holds a release afterwards.
    async fn fill_slot(
        &self,
        query: &str,
        season: u32,
        episode: u32,
        resolved: &mut Resolved,
    ) -> bool {
        let releases = match self.searcher.search(query).await {
            Ok(releases) => releases,
            Err(e) => {
                warn!(query = query, error = %e, "backfill search failed");
                return false;
            }
        };

        let mut placed = false;
        for release in releases {
            if !self.filter.accepts(&release.name, &release.category) {
                continue;
            }
            if is_full_pack(&release.name) {
                resolved.uncategorized.insert(release);
                continue;
            }
            self.place(season, episode, release, resolved);
            placed = true;
        }

        if placed {
            resolved.seasons.sort_slot(season, episode);
        }
        placed
    }

    /// The release was found by a per-episode query, so it lands at the
    /// queried slot rather than being re-parsed.
    fn place(&self, season: u32, episode: u32, release: Release, resolved: &mut Resolved) {
        let quality = extract_quality_with(&release.name, self.order);
        resolved.seasons.insert(season, episode, quality, release);
    }
}
