//! Count-or-percentage values for rollout budgets.
//!
//! On the wire a value is either a bare integer (`2`) or a percentage string
//! (`"25%"`). Percentages are resolved against a total with an explicit
//! rounding direction:
//!
//! - surge budgets round **up**, so `25%` of 3 groups allows 1 extra group;
//! - unavailable budgets round **down**, so `25%` of 3 groups allows 0.
//!
//! Absolute counts are returned unchanged regardless of rounding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIntOrPercent", into = "RawIntOrPercent")]
pub enum IntOrPercent {
    Count(i32),
    Percent(i32),
}

/// Which way a percentage is rounded when resolved against a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

impl IntOrPercent {
    /// Resolve against `total`.
    pub fn scaled(&self, total: i32, rounding: Rounding) -> i32 {
        match *self {
            IntOrPercent::Count(n) => n,
            IntOrPercent::Percent(p) => {
                let product = i64::from(p) * i64::from(total);
                let value = match rounding {
                    Rounding::Up => (product + 99).div_euclid(100),
                    Rounding::Down => product.div_euclid(100),
                };
                value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            }
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, IntOrPercent::Percent(_))
    }

    /// The raw number, without its unit.
    pub fn raw(&self) -> i32 {
        match *self {
            IntOrPercent::Count(n) | IntOrPercent::Percent(n) => n,
        }
    }
}

impl fmt::Display for IntOrPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntOrPercent::Count(n) => write!(f, "{n}"),
            IntOrPercent::Percent(p) => write!(f, "{p}%"),
        }
    }
}

impl FromStr for IntOrPercent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidIntOrPercent(s.to_string());
        match s.trim().strip_suffix('%') {
            Some(number) => number.parse().map(IntOrPercent::Percent).map_err(|_| invalid()),
            None => Err(invalid()),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawIntOrPercent {
    Int(i32),
    Str(String),
}

impl TryFrom<RawIntOrPercent> for IntOrPercent {
    type Error = CoreError;

    fn try_from(raw: RawIntOrPercent) -> Result<Self, Self::Error> {
        match raw {
            RawIntOrPercent::Int(n) => Ok(IntOrPercent::Count(n)),
            RawIntOrPercent::Str(s) => s.parse(),
        }
    }
}

impl From<IntOrPercent> for RawIntOrPercent {
    fn from(value: IntOrPercent) -> Self {
        match value {
            IntOrPercent::Count(n) => RawIntOrPercent::Int(n),
            IntOrPercent::Percent(_) => RawIntOrPercent::Str(value.to_string()),
        }
    }
}
