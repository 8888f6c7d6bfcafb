use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("trace length {0} is not a power of two")]
    NotPowerOfTwo(usize),
    #[error("trace length must be at least 2, got {0}")]
    TooShort(usize),
}

/// Number of rows of every column of a state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceLength(usize);

impl TraceLength {
    pub const DEFAULT: Self = Self(1 << 10);

    pub fn new(n: usize) -> Result<Self, ConfigError> {
        if n < 2 {
            return Err(ConfigError::TooShort(n));
        }
        if !n.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(n));
        }
        Ok(Self(n))
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// Row following `row` on the ring of `n` rows.
    pub const fn next(self, row: usize) -> usize {
        (row + 1) % self.0
    }
}

impl Default for TraceLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for TraceLength {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}
