//! Counters describing a vector's growth and cursor bookkeeping.

/// Snapshot of a vector's bookkeeping counters.
///
/// Returned by [`Vector::metrics`](crate::Vector::metrics). Counters are
/// cumulative over the vector's lifetime, except `live_cursors`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VectorMetrics {
    /// Number of times the buffer was reallocated to a larger capacity.
    pub grow_events: u64,
    /// Number of cursors invalidated by mutations.
    pub invalidated_cursors: u64,
    /// Cursors currently registered (valid and not yet dropped).
    pub live_cursors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = VectorMetrics::default();
        assert_eq!(m.grow_events, 0);
        assert_eq!(m.invalidated_cursors, 0);
        assert_eq!(m.live_cursors, 0);
    }
}
