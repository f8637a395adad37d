// crates/laptop-core/src/rating.rs

use serde::{Deserialize, Serialize};

/// Running rating aggregate for one laptop.
///
/// Only the count and the sum are stored; the average is derived on read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Number of times the laptop has been rated.
    pub count: u32,
    /// Sum of all scores received.
    pub sum: f64,
}

impl Rating {
    /// Fold one more score into the aggregate.
    pub fn record(&mut self, score: f64) {
        self.count += 1;
        self.sum += score;
    }

    /// Mean score, or 0.0 when nothing has been rated yet.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / f64::from(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_average() {
        let mut rating = Rating::default();
        rating.record(4.0);
        rating.record(9.0);
        assert_eq!(rating.count, 2);
        assert_eq!(rating.sum, 13.0);
        assert!((rating.average() - 6.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_average_is_zero() {
        assert_eq!(Rating::default().average(), 0.0);
    }
}
