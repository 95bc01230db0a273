use serde::Serialize;
use std::fmt;

/// Inclusive cloud-coverage window in percent.
///
/// The bounds are taken as given: a window with `min > max` is legal and
/// simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageWindow {
    pub min: i64,
    pub max: i64,
}

impl CoverageWindow {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, coverage: i64) -> bool {
        self.min <= coverage && coverage <= self.max
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    pub fn is_within_percent_range(&self) -> bool {
        (0..=100).contains(&self.min) && (0..=100).contains(&self.max)
    }
}

impl Default for CoverageWindow {
    fn default() -> Self {
        Self::new(0, 100)
    }
}

impl fmt::Display for CoverageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}%, {}%]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let window = CoverageWindow::new(0, 50);
        assert!(window.contains(0));
        assert!(window.contains(30));
        assert!(window.contains(50));
        assert!(!window.contains(51));
        assert!(!window.contains(80));
        assert!(!window.contains(-1));
    }

    #[test]
    fn test_single_value_window() {
        let window = CoverageWindow::new(0, 0);
        assert!(window.contains(0));
        assert!(!window.contains(1));
    }

    #[test]
    fn test_out_of_order_window_matches_nothing() {
        let window = CoverageWindow::new(60, 40);
        assert!(!window.is_ordered());
        for coverage in 0..=100 {
            assert!(!window.contains(coverage), "{} should not match", coverage);
        }
    }

    #[test]
    fn test_percent_range_check() {
        assert!(CoverageWindow::default().is_within_percent_range());
        assert!(!CoverageWindow::new(-5, 50).is_within_percent_range());
        assert!(!CoverageWindow::new(0, 150).is_within_percent_range());
    }

    #[test]
    fn test_display() {
        assert_eq!(CoverageWindow::new(10, 20).to_string(), "[10%, 20%]");
    }
}
