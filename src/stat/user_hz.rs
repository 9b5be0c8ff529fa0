use std::{
    num::ParseIntError,
    ops::{Add, Div},
    str::FromStr,
};

/// a count of kernel clock ticks.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct UserHz(u64);

// === impl UserHz ===

impl UserHz {
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// subtracts, clamping at zero.
    ///
    /// counters only go backwards if the kernel resets them, which is not a negative interval.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        let (Self(lhs), Self(rhs)) = (self, rhs);
        Self(lhs.saturating_sub(rhs))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for UserHz {
    type Err = ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Add for UserHz {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        let (Self(lhs), Self(rhs)) = (self, rhs);
        Self(lhs + rhs)
    }
}

impl Div for UserHz {
    type Output = f64;
    fn div(self, rhs: Self) -> Self::Output {
        let to_float = |Self(hz)| -> f64 { hz as f64 };
        let (lhs, rhs) = (to_float(self), to_float(rhs));

        lhs / rhs
    }
}
