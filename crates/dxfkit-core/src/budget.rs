//! # Point Budget
//!
//! Hard cap on the number of points path generation may produce. Dense
//! curves with tight error bounds can otherwise explode a small input file
//! into millions of vertices.

use crate::error::GeomError;

/// Counts generated points against a fixed cap.
#[derive(Debug, Clone)]
pub struct PointBudget {
    used: usize,
    limit: usize,
}

impl PointBudget {
    pub fn new(limit: usize) -> Self {
        PointBudget { used: 0, limit }
    }

    /// Reserves one point. Exactly `limit` points are granted; the next
    /// request fails.
    pub fn take(&mut self) -> Result<(), GeomError> {
        if self.used == self.limit {
            return Err(GeomError::PointBudgetExceeded { limit: self.limit });
        }
        self.used += 1;
        Ok(())
    }

    pub fn used(&self) -> usize {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_limit_points_granted() {
        let mut budget = PointBudget::new(3);
        assert!(budget.take().is_ok());
        assert!(budget.take().is_ok());
        assert!(budget.take().is_ok());
        assert_eq!(budget.used(), 3);

        let err = budget.take().unwrap_err();
        assert_eq!(err, GeomError::PointBudgetExceeded { limit: 3 });
        assert_eq!(budget.used(), 3);
    }

    #[test]
    fn test_zero_budget_rejects_first_point() {
        let mut budget = PointBudget::new(0);
        assert!(budget.take().is_err());
    }
}
