//! Integration tests for the recommendation service over on-disk artifacts

use std::fs;

use book_recommender::{
    AppConfig, ArtifactStore, DistanceMetric, NearestNeighbors, PivotTable, RatingRecord,
    RatingVector, RatingsTable, Recommendation, RecommenderError,
};
use tempfile::TempDir;

fn record(user_id: u32, title: &str, image_url: &str) -> RatingRecord {
    RatingRecord {
        user_id,
        isbn: format!("isbn-{}", title),
        rating: 9.0,
        title: title.to_string(),
        author: "Author".to_string(),
        year: "2000".to_string(),
        publisher: "Publisher".to_string(),
        image_url: image_url.to_string(),
        num_of_rating: 60,
    }
}

/// Pivot rows A, B, C where row 0's neighbours are rows 0, 2, 1.
fn write_artifacts(dir: &TempDir) -> AppConfig {
    let config = AppConfig::default().with_artifacts_dir(dir.path());
    let store = ArtifactStore::new(config.get_recommendation_config().unwrap());

    let pivot = PivotTable::new(
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
        vec![1, 2, 3],
        vec![
            RatingVector::new(vec![10.0, 9.0, 0.0]),
            RatingVector::new(vec![0.0, 0.0, 7.0]),
            RatingVector::new(vec![9.0, 9.0, 0.0]),
        ],
    )
    .unwrap();
    let model = NearestNeighbors::fit(pivot.rows().to_vec(), DistanceMetric::Euclidean).unwrap();
    let ratings = RatingsTable::new(vec![
        record(1, "A", "http://img/a.jpg"),
        record(1, "C", "http://img/c.jpg"),
        record(3, "B", "http://img/b.jpg"),
    ]);

    store.save_model(&model).unwrap();
    store.save_pivot(&pivot).unwrap();
    store.save_ratings(&ratings).unwrap();
    store.save_book_names(pivot.titles()).unwrap();
    config
}

#[test]
fn test_recommend_scenario() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(&dir);
    let service = Recommendation::new(&config).unwrap();

    let recs = service.recommend("A").unwrap();
    assert_eq!(recs.titles(), vec!["A", "C", "B"]);
    assert_eq!(
        recs.poster_urls(),
        vec!["http://img/a.jpg", "http://img/c.jpg", "http://img/b.jpg"]
    );
    assert!(recs.len() <= 6);

    let shown: Vec<&str> = recs.displayed().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(shown, vec!["C", "B"]);
}

#[test]
fn test_recommend_partial_title() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(&dir);
    let service = Recommendation::new(&config).unwrap();

    // an empty fragment is contained in every title, so the first row wins
    let recs = service.recommend("").unwrap();
    assert_eq!(recs.titles()[0], "A");
}

#[test]
fn test_recommend_not_found() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(&dir);
    let service = Recommendation::new(&config).unwrap();

    let err = service.recommend("Zzz").unwrap_err();
    assert!(matches!(err, RecommenderError::NotFound { ref title } if title == "Zzz"));
}

#[test]
fn test_fetch_posters() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(&dir);
    let service = Recommendation::new(&config).unwrap();

    assert_eq!(service.fetch_posters(&[2]).unwrap(), vec!["http://img/c.jpg"]);
    assert!(service.fetch_posters(&[3, 42]).unwrap().is_empty());
}

#[test]
fn test_corrupt_artifact_asks_for_retrain() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(&dir);
    let rec_config = config.get_recommendation_config().unwrap();
    fs::write(&rec_config.trained_model_path, b"not a model").unwrap();

    let err = Recommendation::new(&config)
        .unwrap()
        .recommend("A")
        .unwrap_err();
    assert!(err.needs_retrain());
    assert!(err.to_string().contains("Please retrain the model."));
}

#[test]
fn test_missing_artifacts_carry_context() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::default().with_artifacts_dir(dir.path().join("empty"));

    let err = Recommendation::new(&config)
        .unwrap()
        .recommend("A")
        .unwrap_err();
    match err {
        RecommenderError::Unknown { context, .. } => {
            assert_eq!(context, "Recommendation::recommend")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_drifted_book_names_still_listed() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(&dir);
    let store = ArtifactStore::new(config.get_recommendation_config().unwrap());
    let drifted = vec!["A".to_string(), "C".to_string()];
    store.save_book_names(&drifted).unwrap();

    let service = Recommendation::new(&config).unwrap();
    assert_eq!(service.book_names().unwrap(), drifted);
    assert!(!store.check_book_names(&drifted, &store.load_pivot().unwrap()));
}

#[test]
fn test_retrained_pivot_with_new_users_asks_for_retrain() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(&dir);
    let store = ArtifactStore::new(config.get_recommendation_config().unwrap());

    // same titles, one more kept user: the old model rows are now too short
    let pivot = PivotTable::new(
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
        vec![1, 2, 3, 4],
        vec![
            RatingVector::new(vec![10.0, 9.0, 0.0, 1.0]),
            RatingVector::new(vec![0.0, 0.0, 7.0, 0.0]),
            RatingVector::new(vec![9.0, 9.0, 0.0, 2.0]),
        ],
    )
    .unwrap();
    store.save_pivot(&pivot).unwrap();

    let err = Recommendation::new(&config)
        .unwrap()
        .recommend("A")
        .unwrap_err();
    assert!(err.needs_retrain());
}
