//! The single HTML page: train button, book selector, five result columns.

use crate::error::{RecommenderError, Result, RETRAIN_HINT};
use crate::recommend::{Recommendations, DISPLAYED_RECOMMENDATIONS};
use askama_axum::Template;

pub const HEADING: &str = "End to End Books Recommender System";
pub const DESCRIPTION: &str = "This is a collaborative filtering based recommendation system!";
pub const TRAINING_DONE: &str = "Training Completed!";

/// One result slot. Empty fields render as an empty column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    pub title: String,
    pub poster_url: String,
}

#[derive(Template, Debug)]
#[template(path = "index.html")]
pub struct IndexPage {
    heading: &'static str,
    description: &'static str,
    notice: String,
    /// Set when the book name list could not be loaded; the page stops there.
    names_error: String,
    book_names: Vec<String>,
    selected: String,
    error: String,
    show_results: bool,
    columns: [Column; DISPLAYED_RECOMMENDATIONS],
}

impl IndexPage {
    /// Start a page from the result of loading the book name list.
    pub fn new(book_names: Result<Vec<String>>) -> Self {
        let (book_names, names_error) = match book_names {
            Ok(names) => (names, String::new()),
            Err(e) => (Vec::new(), names_error_message(&e)),
        };
        Self {
            heading: HEADING,
            description: DESCRIPTION,
            notice: String::new(),
            names_error,
            book_names,
            selected: String::new(),
            error: String::new(),
            show_results: false,
            columns: Default::default(),
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = notice.into();
        self
    }

    pub fn with_error(mut self, error: &RecommenderError) -> Self {
        self.error = error.to_string();
        self
    }

    pub fn with_selected(mut self, selected: impl Into<String>) -> Self {
        self.selected = selected.into();
        self
    }

    /// Fill the result columns, skipping the query book itself.
    pub fn with_recommendations(mut self, recommendations: &Recommendations) -> Self {
        for (i, book) in recommendations.displayed().iter().enumerate() {
            self.columns[i] = Column {
                title: book.title.clone(),
                poster_url: book.poster_url.clone().unwrap_or_default(),
            };
        }
        self.show_results = true;
        self
    }

    /// Whether the selector and recommend button are shown.
    pub fn is_interactive(&self) -> bool {
        self.names_error.is_empty()
    }

    pub fn columns(&self) -> &[Column; DISPLAYED_RECOMMENDATIONS] {
        &self.columns
    }
}

fn names_error_message(e: &RecommenderError) -> String {
    if e.needs_retrain() {
        format!("Book names data is incompatible. {RETRAIN_HINT}")
    } else {
        format!("Book names could not be loaded: {e}. Train the recommender first.")
    }
}
