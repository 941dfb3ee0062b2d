use std::collections::HashMap;

use super::types::{Article, Status};
use super::BoardError;

// ============================================================================
// Article Catalog
// ============================================================================

/// All articles known to the session, in ingestion order, indexed by link.
///
/// Insertion order is the tie-breaker for every sort mode, so articles are
/// never reordered inside `articles`; only their `status` field changes.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    articles: Vec<Article>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog.
    ///
    /// Links must be unique; a repeated link keeps its first occurrence and the
    /// duplicate is dropped. Returns the number of dropped duplicates.
    pub fn ingest(&mut self, articles: Vec<Article>) -> usize {
        self.articles = Vec::with_capacity(articles.len());
        self.index = HashMap::with_capacity(articles.len());

        let mut duplicates = 0;
        for article in articles {
            if self.index.contains_key(article.key()) {
                tracing::warn!(link = %article.link, "Duplicate article link, keeping first occurrence");
                duplicates += 1;
                continue;
            }
            self.index
                .insert(article.key().to_string(), self.articles.len());
            self.articles.push(article);
        }
        duplicates
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// O(1) lookup by link.
    pub fn get(&self, key: &str) -> Option<&Article> {
        self.index.get(key).map(|&i| &self.articles[i])
    }

    /// Current status of `key`, if known.
    pub fn status_of(&self, key: &str) -> Option<Status> {
        self.get(key).map(|a| a.status)
    }

    pub(crate) fn at(&self, position: usize) -> &Article {
        &self.articles[position]
    }

    /// Members of `column`, in insertion order.
    pub fn articles_in(&self, column: Status) -> impl Iterator<Item = &Article> + Clone + '_ {
        self.articles.iter().filter(move |a| a.status == column)
    }

    /// Insertion positions of the members of `column`.
    pub(crate) fn positions_in(&self, column: Status) -> Vec<usize> {
        self.articles
            .iter()
            .enumerate()
            .filter(|(_, a)| a.status == column)
            .map(|(i, _)| i)
            .collect()
    }

    /// Every article in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.articles.iter()
    }

    /// Reassign an article's status.
    ///
    /// # Errors
    ///
    /// `BoardError::NotFound` if no article has this link; nothing changes.
    pub fn set_status(&mut self, key: &str, status: Status) -> Result<Status, BoardError> {
        let &i = self
            .index
            .get(key)
            .ok_or_else(|| BoardError::NotFound(key.to_string()))?;
        let previous = self.articles[i].status;
        self.articles[i].status = status;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::testing::article;

    #[test]
    fn test_ingest_and_lookup() {
        let mut catalog = Catalog::new();
        catalog.ingest(vec![
            article("a", Status::Fresh, 100, "https://one.example"),
            article("b", Status::Saved, 200, "https://two.example"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.status_of("a"), Some(Status::Fresh));
        assert_eq!(catalog.status_of("b"), Some(Status::Saved));
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_ingest_replaces_previous_contents() {
        let mut catalog = Catalog::new();
        catalog.ingest(vec![article("a", Status::Fresh, 1, "s")]);
        catalog.ingest(vec![article("b", Status::Fresh, 1, "s")]);

        assert!(catalog.get("a").is_none());
        assert!(catalog.get("b").is_some());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_links_keep_first() {
        let mut catalog = Catalog::new();
        let dropped = catalog.ingest(vec![
            article("a", Status::Fresh, 1, "s"),
            article("a", Status::Archived, 2, "s"),
        ]);

        assert_eq!(dropped, 1);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.status_of("a"), Some(Status::Fresh));
    }

    #[test]
    fn test_articles_in_partitions_by_status() {
        let mut catalog = Catalog::new();
        catalog.ingest(vec![
            article("a", Status::Fresh, 1, "s"),
            article("b", Status::Saved, 2, "s"),
            article("c", Status::Fresh, 3, "s"),
        ]);

        let fresh: Vec<&str> = catalog.articles_in(Status::Fresh).map(|a| a.key()).collect();
        assert_eq!(fresh, vec!["a", "c"]);
        assert_eq!(catalog.articles_in(Status::Archived).count(), 0);
    }

    #[test]
    fn test_set_status_unknown_key() {
        let mut catalog = Catalog::new();
        catalog.ingest(vec![article("a", Status::Fresh, 1, "s")]);

        let err = catalog.set_status("zzz", Status::Saved).unwrap_err();
        assert_eq!(err, BoardError::NotFound("zzz".to_string()));
        assert_eq!(catalog.status_of("a"), Some(Status::Fresh));
    }

    #[test]
    fn test_set_status_returns_previous() {
        let mut catalog = Catalog::new();
        catalog.ingest(vec![article("a", Status::Fresh, 1, "s")]);

        let previous = catalog.set_status("a", Status::Saved).unwrap();
        assert_eq!(previous, Status::Fresh);
        assert_eq!(catalog.status_of("a"), Some(Status::Saved));
    }
}
