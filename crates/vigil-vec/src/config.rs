//! Vector configuration parameters.

/// Construction parameters for a [`Vector`](crate::Vector).
///
/// Capacity is acquired up front; no element is constructed until it is
/// pushed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorConfig {
    /// Number of slots acquired at construction.
    ///
    /// Default: 10. Zero is allowed and defers acquisition to the first
    /// growth.
    pub initial_capacity: usize,

    /// Capacity adopted when a zero-capacity vector grows.
    ///
    /// Default: 1. Values below 1 are clamped up, see
    /// [`resolved_min_grow_capacity`](Self::resolved_min_grow_capacity).
    pub min_grow_capacity: usize,
}

impl VectorConfig {
    /// Default initial capacity.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

    /// Default capacity for growth out of zero.
    pub const DEFAULT_MIN_GROW_CAPACITY: usize = 1;

    /// Config with the given initial capacity and default growth floor.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            min_grow_capacity: Self::DEFAULT_MIN_GROW_CAPACITY,
        }
    }

    /// Growth floor actually used, never zero.
    pub fn resolved_min_grow_capacity(&self) -> usize {
        self.min_grow_capacity.max(1)
    }

    /// Capacity to adopt when a buffer of `capacity` slots is full.
    ///
    /// Doubles, or jumps to the growth floor from zero. Returns `None` on
    /// arithmetic overflow.
    pub fn next_capacity(&self, capacity: usize) -> Option<usize> {
        if capacity == 0 {
            Some(self.resolved_min_grow_capacity())
        } else {
            capacity.checked_mul(2)
        }
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_ten() {
        assert_eq!(VectorConfig::default().initial_capacity, 10);
    }

    #[test]
    fn zero_growth_floor_is_clamped() {
        let config = VectorConfig {
            initial_capacity: 0,
            min_grow_capacity: 0,
        };
        assert_eq!(config.resolved_min_grow_capacity(), 1);
        assert_eq!(config.next_capacity(0), Some(1));
    }

    #[test]
    fn growth_doubles() {
        let config = VectorConfig::default();
        assert_eq!(config.next_capacity(10), Some(20));
        assert_eq!(config.next_capacity(usize::MAX), None);
    }
}
