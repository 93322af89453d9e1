use std::fmt;

/// Number of generations the driver has advanced; wraps instead of overflowing.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Generation(pub u64);

impl Generation {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn increment_self(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
