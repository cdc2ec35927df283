//! Crawl frontier
//!
//! A two-tier queue driving the bounded breadth-first traversal:
//! - Priority-tagged links are popped before normal ones
//! - A monotonic visited set is the sole cycle-prevention mechanism
//! - `max_pages` counts accepted documents, `max_depth` bounds link depth
//!
//! The frontier holds no I/O; the job controller pops entries, fetches, and
//! reports accepted documents back.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// One queued URL with its discovery depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Which tier a link enters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierTier {
    Priority,
    Normal,
}

/// Bounded two-tier crawl frontier
#[derive(Debug)]
pub struct Frontier {
    priority: VecDeque<FrontierEntry>,
    normal: VecDeque<FrontierEntry>,
    visited: HashSet<Url>,
    accepted: u32,
    max_pages: u32,
    max_depth: u32,
}

impl Frontier {
    /// Creates a frontier seeded with one normal entry at depth 0
    pub fn new(seed: Url, max_pages: u32, max_depth: u32) -> Self {
        let mut normal = VecDeque::new();
        normal.push_back(FrontierEntry {
            url: seed,
            depth: 0,
        });

        Self {
            priority: VecDeque::new(),
            normal,
            visited: HashSet::new(),
            accepted: 0,
            max_pages,
            max_depth,
        }
    }

    /// Pops the next URL to fetch, or `None` when the crawl is over
    ///
    /// Terminates when the accepted-page bound is reached or both queues are
    /// empty. Already-visited entries and entries beyond `max_depth` are
    /// skipped without counting against any bound. A popped URL is marked
    /// visited immediately, so it is dequeued at most once per job.
    pub fn next(&mut self) -> Option<FrontierEntry> {
        loop {
            if self.accepted >= self.max_pages {
                return None;
            }

            let entry = self
                .priority
                .pop_front()
                .or_else(|| self.normal.pop_front())?;

            if entry.depth > self.max_depth {
                continue;
            }
            if !self.visited.insert(entry.url.clone()) {
                continue;
            }

            return Some(entry);
        }
    }

    /// Queues a discovered link one level below its parent
    ///
    /// Visited URLs are dropped here as well, which keeps the queues small on
    /// link-dense sites.
    pub fn push(&mut self, url: Url, parent_depth: u32, tier: FrontierTier) {
        if self.visited.contains(&url) {
            return;
        }

        let entry = FrontierEntry {
            url,
            depth: parent_depth + 1,
        };
        match tier {
            FrontierTier::Priority => self.priority.push_back(entry),
            FrontierTier::Normal => self.normal.push_back(entry),
        }
    }

    /// Counts an accepted document against the `max_pages` bound
    pub fn record_accepted(&mut self) {
        self.accepted += 1;
    }

    /// Number of documents accepted so far
    pub fn accepted(&self) -> u32 {
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://bip.example.org{path}")).unwrap()
    }

    #[test]
    fn test_seed_pops_first() {
        let mut frontier = Frontier::new(url("/"), 10, 2);
        let entry = frontier.next().unwrap();
        assert_eq!(entry.url, url("/"));
        assert_eq!(entry.depth, 0);
    }

    #[test]
    fn test_priority_tier_pops_before_normal() {
        let mut frontier = Frontier::new(url("/"), 10, 2);
        frontier.next().unwrap();

        frontier.push(url("/normal"), 0, FrontierTier::Normal);
        frontier.push(url("/important"), 0, FrontierTier::Priority);

        assert_eq!(frontier.next().unwrap().url, url("/important"));
        assert_eq!(frontier.next().unwrap().url, url("/normal"));
    }

    #[test]
    fn test_visited_url_never_pops_twice() {
        let mut frontier = Frontier::new(url("/"), 10, 2);
        frontier.next().unwrap();

        // Cycle back to the seed
        frontier.push(url("/"), 0, FrontierTier::Normal);
        frontier.push(url("/a"), 0, FrontierTier::Normal);

        assert_eq!(frontier.next().unwrap().url, url("/a"));
        assert!(frontier.next().is_none());
    }

    #[test]
    fn test_max_pages_terminates() {
        let mut frontier = Frontier::new(url("/"), 1, 2);
        frontier.next().unwrap();
        frontier.record_accepted();

        frontier.push(url("/a"), 0, FrontierTier::Normal);
        assert!(frontier.next().is_none());
    }

    #[test]
    fn test_depth_bound_skips_deep_entries() {
        let mut frontier = Frontier::new(url("/"), 10, 1);
        frontier.next().unwrap();

        frontier.push(url("/d1"), 0, FrontierTier::Normal);
        let d1 = frontier.next().unwrap();
        assert_eq!(d1.depth, 1);

        // Children of a depth-1 page sit at depth 2, beyond the bound
        frontier.push(url("/d2"), d1.depth, FrontierTier::Normal);
        assert!(frontier.next().is_none());
    }

    #[test]
    fn test_skips_do_not_count_against_bounds() {
        let mut frontier = Frontier::new(url("/"), 10, 0);
        frontier.next().unwrap();

        // Both beyond max_depth, both skipped without counting
        frontier.push(url("/deep1"), 5, FrontierTier::Normal);
        frontier.push(url("/deep2"), 5, FrontierTier::Normal);
        assert!(frontier.next().is_none());
    }

    #[test]
    fn test_empty_frontier_terminates() {
        let mut frontier = Frontier::new(url("/"), 10, 2);
        frontier.next().unwrap();
        assert!(frontier.next().is_none());
    }
}
