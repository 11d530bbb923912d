use crate::storage::StoreError;
use crate::watchlist::WatchlistStore;
use reelkeep_models::WatchlistEntry;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;

pub const SAVED_BADGE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchFilter {
    #[default]
    All,
    Watched,
    Unwatched,
}

impl WatchFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchFilter::All => "all",
            WatchFilter::Watched => "watched",
            WatchFilter::Unwatched => "unwatched",
        }
    }

    fn matches(&self, entry: &WatchlistEntry) -> bool {
        match self {
            WatchFilter::All => true,
            WatchFilter::Watched => entry.watched,
            WatchFilter::Unwatched => !entry.watched,
        }
    }
}

impl FromStr for WatchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(WatchFilter::All),
            "watched" => Ok(WatchFilter::Watched),
            "unwatched" => Ok(WatchFilter::Unwatched),
            _ => Err(format!("Unknown filter: {} (expected all, watched or unwatched)", s)),
        }
    }
}

impl fmt::Display for WatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchSort {
    /// Most recently added first
    #[default]
    Newest,
    /// Title, case-insensitive
    Az,
    /// Watched entries first, otherwise stored order
    WatchedFirst,
}

impl WatchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchSort::Newest => "newest",
            WatchSort::Az => "az",
            WatchSort::WatchedFirst => "watched-first",
        }
    }
}

impl FromStr for WatchSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(WatchSort::Newest),
            "az" | "a-z" | "title" => Ok(WatchSort::Az),
            "watched-first" | "watchedfirst" => Ok(WatchSort::WatchedFirst),
            _ => Err(format!("Unknown sort: {} (expected newest, az or watched-first)", s)),
        }
    }
}

impl fmt::Display for WatchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistStats {
    pub total: usize,
    pub watched: usize,
    pub remaining: usize,
    /// Whole percent
    pub progress: u32,
    /// Mean over rated entries to one decimal, `None` when nothing is rated
    pub average_rating: Option<f64>,
}

impl WatchlistStats {
    pub fn compute(entries: &[WatchlistEntry]) -> Self {
        let total = entries.len();
        let watched = entries.iter().filter(|e| e.watched).count();
        let progress = if total == 0 {
            0
        } else {
            (watched as f64 / total as f64 * 100.0).round() as u32
        };

        let ratings: Vec<f64> = entries.iter().filter_map(|e| e.rating).map(f64::from).collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            Some((mean * 10.0).round() / 10.0)
        };

        Self {
            total,
            watched,
            remaining: total - watched,
            progress,
            average_rating,
        }
    }
}

/// The watchlist screen: filtered, sorted view over the stored entries
pub struct WatchlistPage {
    store: WatchlistStore,
    entries: Vec<WatchlistEntry>,
    pub query: String,
    pub filter: WatchFilter,
    pub sort: WatchSort,
    saved: Option<(i64, Instant)>,
}

impl WatchlistPage {
    pub fn new(store: WatchlistStore) -> Self {
        let entries = store.list();
        Self {
            store,
            entries,
            query: String::new(),
            filter: WatchFilter::default(),
            sort: WatchSort::default(),
            saved: None,
        }
    }

    pub fn reload(&mut self) {
        self.entries = self.store.list();
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn stats(&self) -> WatchlistStats {
        WatchlistStats::compute(&self.entries)
    }

    /// Entries after the title query and filter, in the selected order
    pub fn visible(&self) -> Vec<&WatchlistEntry> {
        let needle = self.query.trim().to_lowercase();
        let mut out: Vec<&WatchlistEntry> = self
            .entries
            .iter()
            .filter(|e| needle.is_empty() || e.title.to_lowercase().contains(&needle))
            .filter(|e| self.filter.matches(e))
            .collect();

        match self.sort {
            WatchSort::Newest => out.sort_by(|a, b| b.added_at.cmp(&a.added_at)),
            WatchSort::Az => out.sort_by_cached_key(|e| e.title.to_lowercase()),
            WatchSort::WatchedFirst => out.sort_by_key(|e| !e.watched),
        }
        out
    }

    pub fn toggle_watched(&mut self, id: i64) -> Result<bool, StoreError> {
        let changed = self.store.toggle_watched(id)?;
        self.reload();
        Ok(changed)
    }

    pub fn set_rating(&mut self, id: i64, rating: Option<u8>) -> Result<bool, StoreError> {
        let changed = self.store.update_rating(id, rating)?;
        self.reload();
        Ok(changed)
    }

    pub fn remove(&mut self, id: i64) -> Result<bool, StoreError> {
        let changed = self.store.remove(id)?;
        self.reload();
        Ok(changed)
    }

    /// Save a note with trailing whitespace trimmed and show the saved badge
    pub fn save_note(&mut self, id: i64, draft: &str) -> Result<bool, StoreError> {
        let changed = self.store.update_note(id, draft.trim_end())?;
        self.reload();
        if changed {
            self.saved = Some((id, Instant::now()));
        }
        Ok(changed)
    }

    /// The entry whose "Saved" badge is still showing
    pub fn saved_id(&self) -> Option<i64> {
        self.saved
            .filter(|(_, at)| at.elapsed() < SAVED_BADGE)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::movie;
    use std::sync::Arc;

    fn entry(id: i64, title: &str, added_at: i64, watched: bool, rating: Option<u8>) -> WatchlistEntry {
        let mut e = WatchlistEntry::from_movie(&movie(id, title), added_at);
        e.watched = watched;
        e.rating = rating;
        e
    }

    fn page_with(entries: Vec<WatchlistEntry>) -> WatchlistPage {
        let backing = Arc::new(MemoryStore::new());
        crate::storage::save_json(backing.as_ref(), crate::watchlist::WATCHLIST_KEY, &entries).unwrap();
        WatchlistPage::new(WatchlistStore::new(backing))
    }

    fn ids(list: Vec<&WatchlistEntry>) -> Vec<i64> {
        list.into_iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_stats() {
        let page = page_with(vec![
            entry(1, "Alien", 1, true, Some(5)),
            entry(2, "Heat", 2, true, Some(4)),
            entry(3, "Dune", 3, false, Some(4)),
        ]);
        let stats = page.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.watched, 2);
        assert_eq!(stats.remaining, 1);
        assert_eq!(stats.progress, 67);
        assert_eq!(stats.average_rating, Some(4.3));
    }

    #[test]
    fn test_empty_stats() {
        let stats = page_with(Vec::new()).stats();
        assert_eq!(stats.progress, 0);
        assert_eq!(stats.average_rating, None);
    }

    #[test]
    fn test_filter_sort_and_query() {
        let mut page = page_with(vec![
            entry(1, "heat", 10, false, None),
            entry(2, "Alien", 30, true, None),
            entry(3, "Aliens", 20, false, None),
            entry(4, "Dune", 40, true, None),
        ]);

        assert_eq!(ids(page.visible()), vec![4, 2, 3, 1]);

        page.sort = WatchSort::Az;
        assert_eq!(ids(page.visible()), vec![2, 3, 4, 1]);

        page.sort = WatchSort::WatchedFirst;
        assert_eq!(ids(page.visible()), vec![2, 4, 1, 3]);

        page.filter = WatchFilter::Unwatched;
        assert_eq!(ids(page.visible()), vec![1, 3]);

        page.filter = WatchFilter::All;
        page.query = "  ALIEN ".to_string();
        page.sort = WatchSort::Newest;
        assert_eq!(ids(page.visible()), vec![2, 3]);
    }

    #[test]
    fn test_parse_filter_and_sort() {
        assert_eq!("Watched".parse::<WatchFilter>().unwrap(), WatchFilter::Watched);
        assert!("seen".parse::<WatchFilter>().is_err());
        assert_eq!("watched-first".parse::<WatchSort>().unwrap(), WatchSort::WatchedFirst);
        assert_eq!("az".parse::<WatchSort>().unwrap(), WatchSort::Az);
    }

    #[tokio::test(start_paused = true)]
    async fn test_note_trimmed_and_badge_expires() {
        let mut page = page_with(vec![entry(1, "Alien", 1, false, None)]);

        assert!(page.save_note(1, "  great score \n ").unwrap());
        assert_eq!(page.entries()[0].note, "  great score");
        assert_eq!(page.saved_id(), Some(1));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(page.saved_id(), Some(1));
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(page.saved_id(), None);
    }

    #[test]
    fn test_mutations_reload() {
        let mut page = page_with(vec![entry(1, "Alien", 1, false, None)]);

        assert!(page.toggle_watched(1).unwrap());
        assert!(page.entries()[0].watched);
        assert!(page.set_rating(1, Some(3)).unwrap());
        assert_eq!(page.stats().average_rating, Some(3.0));
        assert!(page.remove(1).unwrap());
        assert!(page.entries().is_empty());
        assert!(!page.save_note(1, "gone").unwrap());
        assert_eq!(page.saved_id(), None);
    }
}
