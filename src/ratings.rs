//! Ratings/metadata table: one row per (user, book) rating that survived cleaning

use serde::{Deserialize, Serialize};

/// A cleaned rating joined with its book's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: u32,
    pub isbn: String,
    pub rating: f32,
    pub title: String,
    pub author: String,
    pub year: String,
    pub publisher: String,
    pub image_url: String,
    /// Total ratings the title received among active users.
    pub num_of_rating: usize,
}

/// Positional table of [`RatingRecord`]s. Titles repeat across rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingsTable {
    records: Vec<RatingRecord>,
}

impl RatingsTable {
    pub fn new(records: Vec<RatingRecord>) -> Self {
        Self { records }
    }

    /// Poster of the first row whose title equals `title`.
    pub fn image_url_for(&self, title: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.title == title)
            .map(|r| r.image_url.as_str())
    }

    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(user_id: u32, title: &str, image_url: &str) -> RatingRecord {
    RatingRecord {
        user_id,
        isbn: format!("isbn-{title}"),
        rating: 8.0,
        title: title.to_string(),
        author: "Anon".to_string(),
        year: "2001".to_string(),
        publisher: "Pub".to_string(),
        image_url: image_url.to_string(),
        num_of_rating: 50,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let table = RatingsTable::new(vec![
            record(1, "Dune", "http://img/dune-1.jpg"),
            record(2, "Dune", "http://img/dune-2.jpg"),
        ]);
        assert_eq!(table.image_url_for("Dune"), Some("http://img/dune-1.jpg"));
    }

    #[test]
    fn test_missing_title() {
        let table = RatingsTable::new(vec![record(1, "Dune", "http://img/dune.jpg")]);
        assert_eq!(table.image_url_for("Emma"), None);
    }
}
