//! Turning raw CSV rows into the ratings table and the pivot table.

use super::ingestion::{RawBook, RawRating};
use crate::error::{RecommenderError, Result};
use crate::pivot::PivotTable;
use crate::ratings::{RatingRecord, RatingsTable};
use crate::vector::RatingVector;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::info;

/// Filter and join the raw data:
///
/// - keep users with more than `min_user_ratings` ratings,
/// - join ratings with books on ISBN (first book row per ISBN),
/// - keep titles with at least `min_book_ratings` ratings after the join,
/// - drop repeated `(user, title)` pairs, keeping the first.
pub fn clean(
    books: &[RawBook],
    ratings: &[RawRating],
    min_user_ratings: usize,
    min_book_ratings: usize,
) -> RatingsTable {
    let mut per_user: HashMap<u32, usize> = HashMap::new();
    for r in ratings {
        *per_user.entry(r.user_id).or_default() += 1;
    }

    let mut by_isbn: HashMap<&str, &RawBook> = HashMap::with_capacity(books.len());
    for book in books {
        by_isbn.entry(book.isbn.as_str()).or_insert(book);
    }

    let joined: Vec<(&RawRating, &RawBook)> = ratings
        .iter()
        .filter(|r| per_user.get(&r.user_id).copied().unwrap_or(0) > min_user_ratings)
        .filter_map(|r| by_isbn.get(r.isbn.as_str()).map(|&b| (r, b)))
        .collect();

    let mut per_title: HashMap<&str, usize> = HashMap::new();
    for (_, book) in &joined {
        *per_title.entry(book.title.as_str()).or_default() += 1;
    }

    let mut seen: HashSet<(u32, &str)> = HashSet::new();
    let records: Vec<RatingRecord> = joined
        .iter()
        .filter_map(|&(r, b)| {
            let num_of_rating = per_title[b.title.as_str()];
            if num_of_rating < min_book_ratings || !seen.insert((r.user_id, b.title.as_str())) {
                return None;
            }
            Some(RatingRecord {
                user_id: r.user_id,
                isbn: r.isbn.clone(),
                rating: r.rating,
                title: b.title.clone(),
                author: b.author.clone(),
                year: b.year.clone(),
                publisher: b.publisher.clone(),
                image_url: b.image_url.clone(),
                num_of_rating,
            })
        })
        .collect();

    info!(
        active_users = per_user.values().filter(|&&n| n > min_user_ratings).count(),
        joined = joined.len(),
        kept = records.len(),
        "ratings cleaned"
    );
    RatingsTable::new(records)
}

/// Pivot the ratings table into titles × users, both sorted ascending.
/// Missing ratings are `0.0`.
pub fn pivot(ratings: &RatingsTable) -> Result<PivotTable> {
    if ratings.is_empty() {
        return Err(RecommenderError::InvalidData(
            "no ratings left after filtering; lower the rating thresholds".to_string(),
        ));
    }

    let users: Vec<u32> = ratings
        .records()
        .iter()
        .map(|r| r.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let user_pos: HashMap<u32, usize> = users.iter().enumerate().map(|(i, &u)| (u, i)).collect();

    let mut rows: BTreeMap<&str, RatingVector> = BTreeMap::new();
    for r in ratings.records() {
        rows.entry(r.title.as_str())
            .or_insert_with(|| RatingVector::zeros(users.len()))
            .set(user_pos[&r.user_id], r.rating);
    }

    let (titles, rows): (Vec<String>, Vec<RatingVector>) = rows
        .into_iter()
        .map(|(title, row)| (title.to_string(), row))
        .unzip();

    PivotTable::new(titles, users, rows)
}
