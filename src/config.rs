//! Construction parameters for [`BidTable`](crate::BidTable)

/// Capacity used when none is given
pub const DEFAULT_CAPACITY: usize = 179;

/// Load factor above which the table grows before the next insert
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// Lowest accepted load factor threshold
const MIN_LOAD_FACTOR: f64 = 0.05;

/// Tunable parameters of a [`BidTable`](crate::BidTable)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Number of slots allocated up front
    pub initial_capacity: usize,
    /// Proactive growth threshold, `1.0` leaves growth to the table-full case only
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { initial_capacity: DEFAULT_CAPACITY, max_load_factor: DEFAULT_MAX_LOAD_FACTOR }
    }
}

impl TableConfig {
    /// Sets the initial capacity
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the proactive growth threshold
    #[must_use]
    pub fn with_max_load_factor(mut self, load_factor: f64) -> Self {
        self.max_load_factor = load_factor;
        self
    }

    /// Returns a copy with every field forced into its valid range
    #[must_use]
    pub(crate) fn normalized(self) -> Self {
        Self {
            initial_capacity: self.initial_capacity.max(1),
            max_load_factor: clamp_load_factor(self.max_load_factor),
        }
    }
}

/// Keeps a load factor threshold within `[MIN_LOAD_FACTOR, 1.0]`, NaN falls back to the default
pub(crate) fn clamp_load_factor(load_factor: f64) -> f64 {
    if load_factor.is_nan() {
        DEFAULT_MAX_LOAD_FACTOR
    } else {
        load_factor.clamp(MIN_LOAD_FACTOR, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = TableConfig::default();
        assert_eq!(config.initial_capacity, 179);
        assert!((config.max_load_factor - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalized() {
        let config = TableConfig::default().with_capacity(0).with_max_load_factor(3.0).normalized();
        assert_eq!(config.initial_capacity, 1);
        assert!((config.max_load_factor - 1.0).abs() < f64::EPSILON);

        let config = TableConfig::default().with_max_load_factor(f64::NAN).normalized();
        assert!((config.max_load_factor - DEFAULT_MAX_LOAD_FACTOR).abs() < f64::EPSILON);

        let config = TableConfig::default().with_max_load_factor(0.0).normalized();
        assert!((config.max_load_factor - MIN_LOAD_FACTOR).abs() < f64::EPSILON);
    }
}
