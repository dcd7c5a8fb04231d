//! Benchmarks for neighbour search over pivot tables

use book_recommender::recommend::recommend_from;
use book_recommender::{
    DistanceMetric, NearestNeighbors, PivotTable, RatingVector, RatingsTable,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_pivot(books: usize, users: usize) -> PivotTable {
    let titles = (0..books).map(|i| format!("Book {}", i)).collect();
    let rows = (0..books)
        .map(|b| {
            // sparse: roughly one user in ten rated each book
            let data = (0..users)
                .map(|u| {
                    if (b * 7 + u * 13) % 10 == 0 {
                        ((b + u) % 10) as f32 + 1.0
                    } else {
                        0.0
                    }
                })
                .collect();
            RatingVector::new(data)
        })
        .collect();
    PivotTable::new(titles, (0..users as u32).collect(), rows).unwrap()
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    let ratings = RatingsTable::default();

    for books in [100, 700, 2000].iter() {
        let pivot = create_pivot(*books, 900);
        let model =
            NearestNeighbors::fit(pivot.rows().to_vec(), DistanceMetric::Euclidean).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(books), books, |b, _| {
            b.iter(|| {
                recommend_from(&model, &pivot, &ratings, black_box("Book 42"), black_box(6))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_recommend);
criterion_main!(benches);
