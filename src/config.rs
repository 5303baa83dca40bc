use crate::error::Error;
use crate::error::Result;

/// Number of buckets a table starts with unless configured otherwise.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Ratio of entries to buckets at which the next insert doubles the table.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted load factor. Below it a small table would double on
/// every insert.
pub const MIN_LOAD_FACTOR: f64 = 0.05;

/// Sizing parameters for a [`HashTable`](crate::HashTable) or
/// [`HashMap`](crate::HashMap).
///
/// # Examples
///
/// ```rust
/// use chain_hash::Config;
///
/// let config = Config::default()
///     .with_initial_capacity(100)
///     .with_load_factor(0.5)
///     .validate()
///     .unwrap();
/// assert_eq!(config.initial_capacity(), 128);
/// assert_eq!(config.load_factor(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    initial_capacity: usize,
    load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Config {
    /// Sets the number of buckets the table starts with. Rounded up to a
    /// power of two by [`validate`](Config::validate).
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the `len / capacity` ratio at which the table grows.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// The configured initial bucket count.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// The configured load-factor threshold.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Checks the parameters and normalizes the capacity to a power of two.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the capacity is zero or too large to
    /// round up, or if the load factor is not finite or is below
    /// [`MIN_LOAD_FACTOR`].
    pub fn validate(self) -> Result<Self> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidArgument("initial capacity must be non-zero"));
        }
        let initial_capacity = self
            .initial_capacity
            .checked_next_power_of_two()
            .ok_or(Error::InvalidArgument("initial capacity is too large"))?;

        if !self.load_factor.is_finite() || self.load_factor < MIN_LOAD_FACTOR {
            return Err(Error::InvalidArgument(
                "load factor must be finite and at least 0.05",
            ));
        }

        Ok(Self {
            initial_capacity,
            load_factor: self.load_factor,
        })
    }
}
