use crate::error::ConfigError;

/// Tunables of a [`Dict`](crate::Dict).
///
/// None of these are observable through the dictionary operations,
/// they only trade memory for chain length.
#[derive(Debug, Clone, PartialEq)]
pub struct DictConfig {
    /// Number of buckets allocated up front
    pub initial_capacity: usize,

    /// The table grows once `items / buckets` exceeds this
    pub max_load_factor: f64,

    /// Multiplier applied to the bucket count on every growth
    pub growth_factor: usize,
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_CAPACITY,
            max_load_factor: Self::DEFAULT_MAX_LOAD_FACTOR,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl DictConfig {
    pub const DEFAULT_CAPACITY: usize = 8;
    pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Checks that a table built from this config can always restore
    /// its load factor by growing
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0f64 {
            return Err(ConfigError::InvalidLoadFactor(self.max_load_factor));
        }
        if self.growth_factor < 2 {
            return Err(ConfigError::InvalidGrowthFactor(self.growth_factor));
        }
        Ok(())
    }
}
