//! Per-kind release relevance filtering.
//!
//! A release survives when its category text matches the kind's curated
//! allowlist, its name carries no non-video keyword, and neither field trips
//! the adult-content list. Adult exclusion runs first and wins over any
//! allowlist entry.

use crate::catalog::ContentKind;

/// Category keywords admitting movie releases. Matched case-insensitively as
/// substrings of the aggregator's free-text category field.
const MOVIE_CATEGORIES: &[&str] = &[
    "movie", "film", "cinema", "blockbuster", "feature film",
    "motion picture", "flick", "biopic", "documentary", "short film",
    "thriller", "comedy", "drama", "action", "adventure",
    "animation", "crime", "fantasy", "historical", "horror",
    "musical", "mystery", "romance", "sci-fi", "science fiction",
    "war", "western", "independent film", "indie film", "art house",
    "silent film", "noir", "cult film", "video > movies",
    "video > hd - tv shows",
];

const SHOW_CATEGORIES: &[&str] = &[
    "show", "shows", "tv show", "tv shows", "television show", "series",
    "tv series", "sitcom", "reality show", "talk show", "drama series",
    "comedy series", "mini-series", "soap opera", "docuseries",
    "children's show", "news show", "variety show", "game show",
    "late-night show", "cooking show", "competition show", "talent show",
    "true crime", "crime drama", "fantasy series", "sci-fi series",
    "science fiction series", "historical drama", "superhero series",
    "animated series", "anime series", "documentary series", "medical drama",
    "legal drama", "reality competition", "video > hd - tv shows",
];

// "hentai" is a legacy allowlist entry; the adult-content check rejects such
// releases before the allowlist is ever consulted.
const ANIME_CATEGORIES: &[&str] = &[
    "anime", "manga", "ova", "ona", "anime series", "anime movie",
    "light novel", "hentai", "josei", "seinen", "shonen", "shojo",
    "yaoi", "yuri", "anime film", "isekai", "mecha", "slice of life",
    "shoujo-ai", "shounen-ai", "magical girl", "sports anime", "supernatural",
    "fantasy anime", "sci-fi anime", "science fiction anime", "romance anime",
    "action anime", "adventure anime", "comedy anime", "drama anime",
    "historical anime", "horror anime", "music anime", "psychological anime",
    "school anime", "space anime", "thriller anime", "military anime",
];

const UNRELATED_KEYWORDS: &[&str] = &[
    "book", "guide", "soundtrack", "companion", "album", "cookbook", "unofficial",
];

const ADULT_KEYWORDS: &[&str] = &["xxx", "porn", "hentai", "erotic", "18+"];

/// Relevance filter for one content kind.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseFilter {
    kind: ContentKind,
    allowlists: &'static [&'static [&'static str]],
}

impl ReleaseFilter {
    pub fn for_kind(kind: ContentKind) -> Self {
        // Anime kinds also accept plain movie/show categories because
        // aggregators frequently file anime under those.
        let allowlists: &'static [&'static [&'static str]] = match kind {
            ContentKind::Movie => &[MOVIE_CATEGORIES],
            ContentKind::Show => &[SHOW_CATEGORIES],
            ContentKind::AnimeMovie => &[ANIME_CATEGORIES, MOVIE_CATEGORIES],
            ContentKind::AnimeShow => &[ANIME_CATEGORIES, SHOW_CATEGORIES],
        };
        Self { kind, allowlists }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Whether the category text matches this kind's allowlist.
    pub fn is_relevant_category(&self, category: &str) -> bool {
        let category = category.trim().to_lowercase();
        self.allowlists
            .iter()
            .any(|list| list.iter().any(|keyword| category.contains(keyword)))
    }

    /// The single predicate the resolver applies: relevant category, no
    /// unrelated keyword in the name, no adult marker anywhere.
    pub fn accepts(&self, name: &str, category: &str) -> bool {
        if is_adult_content(category) || is_adult_content(name) {
            return false;
        }
        self.is_relevant_category(category) && !is_unrelated_content(name)
    }
}

/// Whether a release name denotes non-video content (books, soundtracks and
/// the like) that happens to share the title.
pub fn is_unrelated_content(name: &str) -> bool {
    let name = name.to_lowercase();
    UNRELATED_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

pub fn is_adult_content(text: &str) -> bool {
    let text = text.to_lowercase();
    ADULT_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_category_per_kind() {
        let movies = ReleaseFilter::for_kind(ContentKind::Movie);
        assert!(movies.is_relevant_category("Video > Movies"));
        assert!(movies.is_relevant_category("documentary"));
        assert!(!movies.is_relevant_category("tv shows"));

        let shows = ReleaseFilter::for_kind(ContentKind::Show);
        assert!(shows.is_relevant_category("TV Shows"));
        assert!(shows.is_relevant_category("Video > HD - TV shows"));

        let anime = ReleaseFilter::for_kind(ContentKind::AnimeShow);
        assert!(anime.is_relevant_category("Anime"));
        // Anime kinds fall back to the plain show/movie lists.
        assert!(anime.is_relevant_category("TV Series"));
    }

    #[test]
    fn test_empty_category_is_not_relevant() {
        let movies = ReleaseFilter::for_kind(ContentKind::Movie);
        assert!(!movies.is_relevant_category(""));
        assert!(!movies.is_relevant_category("   "));
    }

    #[test]
    fn test_unrelated_content() {
        assert!(is_unrelated_content("Show Title Official Soundtrack FLAC"));
        assert!(is_unrelated_content("The Unofficial Companion Guide"));
        assert!(is_unrelated_content("Title Art Book Scans"));
        assert!(!is_unrelated_content("Show.S01E01.1080p.mkv"));
    }

    #[test]
    fn test_adult_exclusion_beats_allowlist() {
        // "hentai" is on the anime allowlist but the adult check runs first.
        let anime = ReleaseFilter::for_kind(ContentKind::AnimeShow);
        assert!(anime.is_relevant_category("hentai"));
        assert!(!anime.accepts("Some Title 01", "hentai"));
        assert!(!anime.accepts("Title XXX Edition", "anime"));
    }

    #[test]
    fn test_accepts_combines_all_checks() {
        let shows = ReleaseFilter::for_kind(ContentKind::Show);
        assert!(shows.accepts("Show.S01E01.1080p", "TV Shows"));
        assert!(!shows.accepts("Show Original Soundtrack", "TV Shows"));
        assert!(!shows.accepts("Show.S01E01.1080p", "Apps > Windows"));
    }
}
