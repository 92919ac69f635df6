//! Source trust ranking.
//!
//! Providers disagree on descriptive fields; conflicts are settled by a
//! fixed total order over source tags. The order is data, not code: it ships
//! with a default but can be overridden through configuration without
//! touching the merge engine.

/// Default trust order, most trusted first.
pub const DEFAULT_SOURCE_PRIORITY: &[&str] = &[
    "football-data",
    "sports-db",
    "multi-source",
    "manual",
    "internal",
];

/// Total order over provider source tags.
///
/// Lower rank means more trusted. Tags not present in the order rank below
/// every known tag.
#[derive(Debug, Clone)]
pub struct SourceRanking {
    order: Vec<String>,
}

impl Default for SourceRanking {
    fn default() -> Self {
        Self {
            order: DEFAULT_SOURCE_PRIORITY
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SourceRanking {
    /// Build a ranking from an explicit trust order, most trusted first.
    /// An empty order falls back to the default.
    pub fn new(order: Vec<String>) -> Self {
        if order.is_empty() {
            Self::default()
        } else {
            Self { order }
        }
    }

    /// Rank of a source tag; unknown or absent tags rank lowest.
    pub fn rank(&self, source_tag: Option<&str>) -> usize {
        source_tag
            .and_then(|tag| self.order.iter().position(|known| known == tag))
            .unwrap_or(self.order.len())
    }

    /// Whether the incoming source may overwrite descriptive fields recorded
    /// by the existing source. Ties favor the incoming record.
    pub fn dominates(&self, incoming: Option<&str>, existing: Option<&str>) -> bool {
        self.rank(incoming) <= self.rank(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_ranks_football_data_first() {
        let ranking = SourceRanking::default();
        assert_eq!(ranking.rank(Some("football-data")), 0);
        assert_eq!(ranking.rank(Some("sports-db")), 1);
        assert!(ranking.rank(Some("manual")) < ranking.rank(Some("internal")));
    }

    #[test]
    fn unknown_tags_rank_lowest() {
        let ranking = SourceRanking::default();
        let unknown = ranking.rank(Some("scraper-9000"));
        assert_eq!(unknown, DEFAULT_SOURCE_PRIORITY.len());
        assert_eq!(ranking.rank(None), unknown);
        assert!(ranking.rank(Some("internal")) < unknown);
    }

    #[test]
    fn equal_or_better_dominates() {
        let ranking = SourceRanking::default();
        assert!(ranking.dominates(Some("football-data"), Some("sports-db")));
        assert!(ranking.dominates(Some("sports-db"), Some("sports-db")));
        assert!(!ranking.dominates(Some("manual"), Some("football-data")));
        // A record with no recorded source loses to any known source.
        assert!(ranking.dominates(Some("internal"), None));
    }

    #[test]
    fn custom_order_replaces_default() {
        let ranking = SourceRanking::new(vec!["manual".to_string(), "football-data".to_string()]);
        assert!(ranking.dominates(Some("manual"), Some("football-data")));
        assert_eq!(ranking.rank(Some("sports-db")), 2);
    }

    #[test]
    fn empty_order_falls_back_to_default() {
        let ranking = SourceRanking::new(Vec::new());
        assert_eq!(ranking.rank(Some("football-data")), 0);
    }
}
