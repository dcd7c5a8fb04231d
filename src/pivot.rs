//! Pivot table: books × users rating matrix

use crate::error::{RecommenderError, Result};
use crate::vector::RatingVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Books × users rating matrix. Row order is the index space the neighbour
/// model was fit against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PivotParts")]
pub struct PivotTable {
    titles: Vec<String>,
    users: Vec<u32>,
    rows: Vec<RatingVector>,
    /// Title -> row position
    #[serde(skip_serializing)]
    index: HashMap<String, usize>,
}

/// On-disk layout of a [`PivotTable`]; the title index is rebuilt on load.
#[derive(Deserialize)]
struct PivotParts {
    titles: Vec<String>,
    users: Vec<u32>,
    rows: Vec<RatingVector>,
}

impl TryFrom<PivotParts> for PivotTable {
    type Error = RecommenderError;

    fn try_from(parts: PivotParts) -> Result<Self> {
        PivotTable::new(parts.titles, parts.users, parts.rows)
    }
}

impl PivotTable {
    /// Build a pivot table. Titles must be unique and every row must have
    /// one column per user.
    pub fn new(titles: Vec<String>, users: Vec<u32>, rows: Vec<RatingVector>) -> Result<Self> {
        if titles.len() != rows.len() {
            return Err(RecommenderError::InvalidData(format!(
                "pivot has {} titles but {} rows",
                titles.len(),
                rows.len()
            )));
        }
        if let Some(row) = rows.iter().find(|r| r.dimension() != users.len()) {
            return Err(RecommenderError::InvalidData(format!(
                "pivot row has {} columns, expected {}",
                row.dimension(),
                users.len()
            )));
        }

        let mut index = HashMap::with_capacity(titles.len());
        for (pos, title) in titles.iter().enumerate() {
            if index.insert(title.clone(), pos).is_some() {
                return Err(RecommenderError::InvalidData(format!(
                    "duplicate pivot title: {title}"
                )));
            }
        }

        Ok(Self {
            titles,
            users,
            rows,
            index,
        })
    }

    /// Exact title lookup.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.index.get(title).copied()
    }

    /// First row label that starts with or contains `needle`, in row order.
    pub fn fuzzy_position(&self, needle: &str) -> Option<usize> {
        self.titles
            .iter()
            .position(|t| t.starts_with(needle) || t.contains(needle))
    }

    /// Exact lookup, falling back to [`PivotTable::fuzzy_position`].
    pub fn resolve(&self, title: &str) -> Result<usize> {
        self.position(title)
            .or_else(|| self.fuzzy_position(title))
            .ok_or_else(|| RecommenderError::NotFound {
                title: title.to_string(),
            })
    }

    pub fn title(&self, pos: usize) -> Option<&str> {
        self.titles.get(pos).map(String::as_str)
    }

    pub fn row(&self, pos: usize) -> Option<&RatingVector> {
        self.rows.get(pos)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn users(&self) -> &[u32] {
        &self.users
    }

    pub fn rows(&self) -> &[RatingVector] {
        &self.rows
    }

    /// Number of book rows.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
