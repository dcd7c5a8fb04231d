//! Reading the raw Book-Crossing CSV exports.
//!
//! Both files are `;`-separated with a header row. The published dump is
//! Latin-1 encoded, so fields that are not valid UTF-8 are decoded as Latin-1.
//! Lines with the wrong number of fields are skipped.

use crate::error::Result;
use csv::{ByteRecord, ReaderBuilder};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// A row of `Books.csv`, restricted to the columns training uses.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: String,
    pub publisher: String,
    /// The large cover image (`Image-URL-L`).
    pub image_url: String,
}

/// A row of `Ratings.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRating {
    pub user_id: u32,
    pub isbn: String,
    pub rating: f32,
}

const BOOK_FIELDS: usize = 8;
const RATING_FIELDS: usize = 3;

pub fn read_books(path: &Path) -> Result<Vec<RawBook>> {
    let file = std::fs::File::open(path)?;
    let books = parse_books(file)?;
    info!(path = %path.display(), books = books.len(), "books ingested");
    Ok(books)
}

pub fn read_ratings(path: &Path) -> Result<Vec<RawRating>> {
    let file = std::fs::File::open(path)?;
    let ratings = parse_ratings(file)?;
    info!(path = %path.display(), ratings = ratings.len(), "ratings ingested");
    Ok(ratings)
}

pub fn parse_books<R: Read>(reader: R) -> Result<Vec<RawBook>> {
    let mut books = Vec::new();
    let mut skipped = 0usize;

    for record in records(reader) {
        let record = record?;
        if record.len() != BOOK_FIELDS {
            skipped += 1;
            continue;
        }
        books.push(RawBook {
            isbn: field(&record, 0),
            title: field(&record, 1),
            author: field(&record, 2),
            year: field(&record, 3),
            publisher: field(&record, 4),
            image_url: field(&record, 7),
        });
    }

    if skipped > 0 {
        warn!(skipped, "skipped malformed book lines");
    }
    Ok(books)
}

pub fn parse_ratings<R: Read>(reader: R) -> Result<Vec<RawRating>> {
    let mut ratings = Vec::new();
    let mut skipped = 0usize;

    for record in records(reader) {
        let record = record?;
        if record.len() != RATING_FIELDS {
            skipped += 1;
            continue;
        }
        let user_id = field(&record, 0).trim().parse::<u32>();
        let rating = field(&record, 2).trim().parse::<f32>();
        match (user_id, rating) {
            (Ok(user_id), Ok(rating)) if rating.is_finite() => ratings.push(RawRating {
                user_id,
                isbn: field(&record, 1),
                rating,
            }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped malformed rating lines");
    }
    Ok(ratings)
}

fn records<R: Read>(reader: R) -> impl Iterator<Item = csv::Result<ByteRecord>> {
    ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
        .into_byte_records()
}

fn field(record: &ByteRecord, i: usize) -> String {
    let bytes = record.get(i).unwrap_or_default();
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
