//! Percentage type for category shares
//!
//! Stored as basis points (hundredths of a percent) so a node set's sum can be
//! compared against 100% exactly. 1 basis point is also the sum tolerance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A percentage stored as hundredths of a percent (`50.25%` is `5025`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    /// Basis points in 100%
    pub const SCALE: i64 = 10_000;

    /// Allowed distance of a node set's sum from 100% (0.01%)
    pub const SUM_TOLERANCE: i64 = 1;

    pub const fn from_basis_points(bp: i64) -> Self {
        Self(bp)
    }

    pub const fn from_whole(percent: i64) -> Self {
        Self(percent * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn full() -> Self {
        Self(Self::SCALE)
    }

    pub const fn basis_points(&self) -> i64 {
        self.0
    }

    /// Whether this lies in the closed range [0%, 100%]
    pub const fn is_in_range(&self) -> bool {
        self.0 >= 0 && self.0 <= Self::SCALE
    }

    /// Whether this is within the sum tolerance of 100%
    pub const fn is_full(&self) -> bool {
        (self.0 - Self::SCALE).abs() <= Self::SUM_TOLERANCE
    }

    /// Parse "20", "33.33", "12.5%"
    pub fn parse(s: &str) -> Result<Self, PercentageParseError> {
        let original = s;
        let s = s.trim();
        let s = s.strip_suffix('%').unwrap_or(s).trim();

        let invalid = || PercentageParseError::InvalidFormat(original.to_string());

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let (whole_str, frac_str) = s.split_once('.').unwrap_or((s, ""));

        if whole_str.is_empty() && frac_str.is_empty() {
            return Err(invalid());
        }
        if !whole_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = if whole_str.is_empty() {
            0
        } else {
            whole_str.parse().map_err(|_| invalid())?
        };

        let frac = match frac_str.len() {
            0 => 0,
            1 => frac_str.parse::<i64>().map_err(|_| invalid())? * 10,
            2 => frac_str.parse::<i64>().map_err(|_| invalid())?,
            _ => return Err(PercentageParseError::TooPrecise(original.to_string())),
        };

        let bp = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -bp } else { bp }))
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Percentage {
    /// Trailing fractional zeros are dropped: `20%`, `12.5%`, `33.33%`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / 100;
        let frac = abs % 100;
        match frac {
            0 => write!(f, "{}{}%", sign, whole),
            f2 if f2 % 10 == 0 => write!(f, "{}{}.{}%", sign, whole, f2 / 10),
            f2 => write!(f, "{}{}.{:02}%", sign, whole, f2),
        }
    }
}

impl Add for Percentage {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::iter::Sum for Percentage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Percentage::zero(), |acc, p| acc + p)
    }
}

impl std::str::FromStr for Percentage {
    type Err = PercentageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PercentageParseError {
    InvalidFormat(String),
    TooPrecise(String),
}

impl fmt::Display for PercentageParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid percentage: {}", s),
            Self::TooPrecise(s) => {
                write!(f, "Percentage has more than two decimal places: {}", s)
            }
        }
    }
}

impl std::error::Error for PercentageParseError {}
