use std::collections::VecDeque;

use crate::models::HistoryPoint;

/// Bounded FIFO of per-cycle summary metrics for one symbol.
///
/// Holds at most `capacity` points; appending past capacity evicts the
/// oldest. The engine only ever appends — reads belong to consumers.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    capacity: usize,
    points: VecDeque<HistoryPoint>,
}

impl RollingHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: HistoryPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn point(i: i64) -> HistoryPoint {
        HistoryPoint {
            timestamp: Utc::now() + Duration::seconds(i),
            spot_price: 22000.0 + i as f64,
            pcr_oi: 1.0,
            sentiment_score: 50,
            max_pain: 22000.0,
        }
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut hist = RollingHistory::new(10);
        for i in 0..37 {
            hist.push(point(i));
            assert!(hist.len() <= 10);
        }
        assert_eq!(hist.len(), 10);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut hist = RollingHistory::new(5);
        for i in 0..8 {
            hist.push(point(i));
        }
        // 8 appends into capacity 5: points 0..3 evicted, 3..8 remain in order
        let spots: Vec<f64> = hist.iter().map(|p| p.spot_price).collect();
        assert_eq!(spots, vec![22003.0, 22004.0, 22005.0, 22006.0, 22007.0]);
        assert_eq!(hist.latest().unwrap().spot_price, 22007.0);
    }

    #[test]
    fn under_capacity_keeps_everything() {
        let mut hist = RollingHistory::new(100);
        for i in 0..7 {
            hist.push(point(i));
        }
        assert_eq!(hist.len(), 7);
    }
}
