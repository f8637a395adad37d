// crates/laptop-store/src/rating.rs
//
// In-memory rating aggregates implementing the `RatingStore` trait.
//
// A single write lock covers the whole table, which is enough to make each
// `add` atomic with respect to concurrent `add` calls on the same laptop.

use std::collections::HashMap;
use std::sync::RwLock;

use laptop_core::error::LaptopError;
use laptop_core::rating::Rating;
use laptop_core::traits::RatingStore;

use crate::poisoned;

/// In-memory rating table keyed by laptop ID.
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    ratings: RwLock<HashMap<String, Rating>>,
}

impl InMemoryRatingStore {
    /// Create a new empty rating table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current aggregate for a laptop, if it has ever been rated.
    pub fn get(&self, laptop_id: &str) -> Option<Rating> {
        self.ratings.read().ok()?.get(laptop_id).copied()
    }
}

impl RatingStore for InMemoryRatingStore {
    fn add(&self, laptop_id: &str, score: f64) -> Result<Rating, LaptopError> {
        let mut ratings = self.ratings.write().map_err(poisoned)?;

        let rating = ratings.entry(laptop_id.to_string()).or_default();
        rating.record(score);

        Ok(*rating)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_first_rating() {
        let store = InMemoryRatingStore::new();
        let rating = store.add("a", 7.0).unwrap();
        assert_eq!(rating, Rating { count: 1, sum: 7.0 });
    }

    #[test]
    fn test_ratings_accumulate() {
        let store = InMemoryRatingStore::new();
        store.add("a", 3.0).unwrap();
        let rating = store.add("a", 8.0).unwrap();
        assert_eq!(rating.count, 2);
        assert_eq!(rating.sum, 11.0);
        assert!((rating.average() - 5.5).abs() < f64::EPSILON);

        // Other laptops are untouched.
        assert!(store.get("b").is_none());
        assert_eq!(store.get("a").unwrap().count, 2);
    }

    #[test]
    fn test_returned_rating_is_a_copy() {
        let store = InMemoryRatingStore::new();
        let mut rating = store.add("a", 5.0).unwrap();
        rating.count = 100;
        assert_eq!(store.get("a").unwrap().count, 1);
    }

    #[test]
    fn test_concurrent_adds_lose_nothing() {
        let store = Arc::new(InMemoryRatingStore::new());
        let threads = 16;
        let per_thread = 250;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..per_thread {
                        store.add("hot", 1.0).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let rating = store.get("hot").unwrap();
        assert_eq!(rating.count, threads * per_thread);
        assert_eq!(rating.sum, f64::from(threads * per_thread));
    }
}
