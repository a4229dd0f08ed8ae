use crate::condition::Condition;

/// Configuration for a [`SparseGrid`](crate::SparseGrid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Relationships evicted by `put`, `put_all`, `remove` and `remove_all`
    /// when the caller passes no conditions.
    pub evict_on: Vec<Condition>,
    /// Relationships considered by `has`, `get_keys` and `get_all` when the
    /// caller passes no conditions.
    pub lookup: Vec<Condition>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            evict_on: vec![Condition::Intersects],
            lookup: vec![Condition::Match],
        }
    }
}

impl Config {
    pub fn with_evict_on(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.evict_on = conditions.into_iter().collect();
        self
    }

    pub fn with_lookup(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.lookup = conditions.into_iter().collect();
        self
    }
}
