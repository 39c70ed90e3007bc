//! Bounds for supervisor-wide tunables.
//!
//! A declared value of `0` means "unset" and resolves to the default.
//! Anything else, negative values included, is clamped into `[min, max]`.
//! Clamping never fails.

/// Inclusive range plus the value used when a tunable is left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
    pub default: T,
}

impl<T> Bounds<T>
where
    T: Copy + Ord + Default,
{
    /// Resolve a declared value against these bounds.
    pub fn clamp(&self, value: T) -> T {
        if value == T::default() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Seconds between supervisor ticks.
pub const TICK_EVERY: Bounds<i64> = Bounds {
    min: 5,
    max: 120,
    default: 15,
};

/// Run-history entries retained per entity.
pub const HISTORY: Bounds<i64> = Bounds {
    min: 5,
    max: 1000,
    default: 100,
};

/// Seconds an HTTP/UDP keep-alive app may go without pinging.
pub const PING_TIMEOUT: Bounds<i64> = Bounds {
    min: 5,
    max: 600,
    default: 30,
};
