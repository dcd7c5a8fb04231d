//! Recommendation service: title -> neighbouring titles and their posters.

use crate::artifacts::ArtifactStore;
use crate::config::AppConfig;
use crate::error::{RecommenderError, Result, ResultExt};
use crate::model::NearestNeighbors;
use crate::pivot::PivotTable;
use crate::ratings::RatingsTable;
use serde::Serialize;
use tracing::{debug, info};

/// Number of recommendations shown, the query book excluded.
pub const DISPLAYED_RECOMMENDATIONS: usize = 5;

/// One neighbour of the query book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedBook {
    pub title: String,
    pub poster_url: Option<String>,
    pub distance: f32,
}

/// Neighbours of a query book, nearest first. The first entry is the query
/// book itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    books: Vec<RecommendedBook>,
}

impl Recommendations {
    /// All neighbour titles, the query book first.
    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(|b| b.title.as_str()).collect()
    }

    /// Posters of the neighbours that have one, in neighbour order.
    pub fn poster_urls(&self) -> Vec<&str> {
        self.books
            .iter()
            .filter_map(|b| b.poster_url.as_deref())
            .collect()
    }

    /// What the page shows: up to five neighbours, skipping the query book.
    pub fn displayed(&self) -> &[RecommendedBook] {
        let end = self.books.len().min(DISPLAYED_RECOMMENDATIONS + 1);
        self.books.get(1..end).unwrap_or(&[])
    }

    pub fn books(&self) -> &[RecommendedBook] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Poster URL for the pivot row at `index`: the `image_url` of the first
/// ratings row carrying the same title.
pub fn resolve_poster<'a>(
    pivot: &PivotTable,
    ratings: &'a RatingsTable,
    index: usize,
) -> Option<&'a str> {
    pivot
        .title(index)
        .and_then(|title| ratings.image_url_for(title))
}

/// Poster URLs for a list of pivot rows. Out-of-range rows and titles with
/// no ratings row are skipped, so the output may be shorter than the input.
pub fn resolve_posters(
    pivot: &PivotTable,
    ratings: &RatingsTable,
    indices: &[usize],
) -> Vec<String> {
    indices
        .iter()
        .filter_map(|&i| resolve_poster(pivot, ratings, i))
        .map(str::to_string)
        .collect()
}

/// Serves recommendations from the artifacts on disk. Every call re-reads
/// the artifacts it needs.
#[derive(Debug, Clone)]
pub struct Recommendation {
    store: ArtifactStore,
}

impl Recommendation {
    pub fn new(app_config: &AppConfig) -> Result<Self> {
        let config = app_config.get_recommendation_config()?;
        Ok(Self {
            store: ArtifactStore::new(config),
        })
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Load the pivot and ratings tables and resolve posters for `indices`.
    pub fn fetch_posters(&self, indices: &[usize]) -> Result<Vec<String>> {
        let pivot = self.store.load_pivot().context("Recommendation::fetch_posters")?;
        let ratings = self
            .store
            .load_ratings()
            .context("Recommendation::fetch_posters")?;
        Ok(resolve_posters(&pivot, &ratings, indices))
    }

    /// The known titles, for the page's selector. A list that has drifted
    /// from the pivot index is still returned, with a warning logged.
    pub fn book_names(&self) -> Result<Vec<String>> {
        let names = self
            .store
            .load_book_names()
            .context("Recommendation::book_names")?;
        let pivot = self
            .store
            .load_pivot()
            .context("Recommendation::book_names")?;
        self.store.check_book_names(&names, &pivot);
        Ok(names)
    }

    /// Neighbours of `book_name`. An exact title match is tried first, then
    /// the first title that starts with or contains it.
    pub fn recommend(&self, book_name: &str) -> Result<Recommendations> {
        let (model, pivot) = self
            .store
            .load_model_and_pivot()
            .context("Recommendation::recommend")?;
        let ratings = self
            .store
            .load_ratings()
            .context("Recommendation::recommend")?;

        let recommendations = recommend_from(
            &model,
            &pivot,
            &ratings,
            book_name,
            self.store.config().neighbors,
        )
        .context("Recommendation::recommend")?;

        info!(
            book = book_name,
            results = recommendations.len(),
            "recommendations computed"
        );
        Ok(recommendations)
    }
}

/// Recommend against already-loaded artifacts.
pub fn recommend_from(
    model: &NearestNeighbors,
    pivot: &PivotTable,
    ratings: &RatingsTable,
    book_name: &str,
    neighbors: usize,
) -> Result<Recommendations> {
    let book_id = pivot.resolve(book_name)?;
    if pivot.position(book_name).is_none() {
        debug!(
            query = book_name,
            matched = pivot.title(book_id).unwrap_or_default(),
            "no exact title match, using first partial match"
        );
    }

    let row = pivot.row(book_id).ok_or_else(|| RecommenderError::NotFound {
        title: book_name.to_string(),
    })?;
    let neighbours = model.kneighbors(row, neighbors)?;

    let books = neighbours
        .into_iter()
        .filter_map(|(idx, distance)| {
            pivot.title(idx).map(|title| RecommendedBook {
                title: title.to_string(),
                poster_url: resolve_poster(pivot, ratings, idx).map(str::to_string),
                distance,
            })
        })
        .collect();

    Ok(Recommendations { books })
}
