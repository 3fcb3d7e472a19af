//! Strongly-typed prices, ratios and the candle granularity selection.

use serde::{Deserialize, Serialize};
use std::ops::{Mul, Sub};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::utils::TimeUtils;

/// Time span of one candle. Selecting a new one invalidates every result and triggers a full re-fetch.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    Default,
    clap::ValueEnum,
)]
pub enum Granularity {
    #[serde(rename = "1m")]
    #[value(name = "1m")]
    Minute,
    #[default]
    #[serde(rename = "1h")]
    #[value(name = "1h")]
    Hour,
    #[serde(rename = "1d")]
    #[value(name = "1d")]
    Day,
}

impl Granularity {
    pub fn interval_ms(&self) -> i64 {
        match self {
            Self::Minute => TimeUtils::MS_IN_MIN,
            Self::Hour => TimeUtils::MS_IN_H,
            Self::Day => TimeUtils::MS_IN_D,
        }
    }

    /// Exchange interval token (`1m`, `1h`, `1d`).
    pub fn token(&self) -> &'static str {
        TimeUtils::interval_to_string(self.interval_ms())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Minute => "1 minute",
            Self::Hour => "1 hour",
            Self::Day => "1 day",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::iter()
            .find(|g| g.token() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::iter().map(|g| g.token()).collect();
                format!(
                    "Unsupported granularity '{}' (expected one of: {})",
                    wanted,
                    valid.join(", ")
                )
            })
    }
}

/// A plain multiplier in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Ratio(f64);

impl Ratio {
    pub const fn new(val: f64) -> Self {
        let v = if val < 0.0 {
            0.0
        } else if val > 1.0 {
            1.0
        } else {
            val
        };
        Self(v)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.)
    }
}

/// A behavioral contract for anything that behaves like a price.
pub trait PriceLike {
    fn value(&self) -> f64;

    const MIN_EPSILON: f64 = 1e-12;

    fn is_positive(&self) -> bool {
        self.value() > Self::MIN_EPSILON
    }

    fn percent_diff_from_0_1<R: PriceLike>(&self, reference: &R) -> f64 {
        if !reference.is_positive() {
            return 0.0;
        }

        (self.value() - reference.value()).abs() / reference.value()
    }

    /// Formats a price with "Trader Precision" adaptive decimals.
    fn format_price(&self) -> String {
        let price = self.value();
        if price == 0.0 {
            return "$0.00".to_string();
        }

        let abs_price = price.abs();

        if abs_price >= 1000.0 {
            format!("${:.2}", price)
        } else if abs_price >= 1.0 {
            format!("${:.4}", price)
        } else if abs_price >= 0.01 {
            format!("${:.5}", price)
        } else {
            format!("${:.8}", price)
        }
    }
}

macro_rules! define_price_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name::new(v)
            }
        }

        impl $name {
            pub const fn new(val: f64) -> Self {
                // Absolute prices should not be negative
                let v = if val < 0.0 { 0.0 } else { val };
                Self(v)
            }
        }

        impl Sub for $name {
            type Output = f64;

            fn sub(self, rhs: Self) -> Self::Output {
                self.value() - rhs.value()
            }
        }

        impl PriceLike for $name {
            fn value(&self) -> f64 {
                self.0
            }
        }

        impl Mul<Ratio> for $name {
            type Output = $name;

            fn mul(self, rhs: Ratio) -> Self::Output {
                $name::new(self.value() * rhs.value())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.format_price())
            }
        }
    };
}

macro_rules! impl_price_compare {
    ($a:ty, $b:ty) => {
        impl PartialEq<$b> for $a {
            fn eq(&self, other: &$b) -> bool {
                self.value() == other.value()
            }
        }

        impl PartialOrd<$b> for $a {
            fn partial_cmp(&self, other: &$b) -> Option<std::cmp::Ordering> {
                self.value().partial_cmp(&other.value())
            }
        }
    };
}

// Generate the Price Hierarchy
define_price_type!(OpenPrice);
define_price_type!(HighPrice);
define_price_type!(LowPrice);
define_price_type!(ClosePrice);

// Used by the OHLC sanity check on incoming candles
impl_price_compare!(HighPrice, OpenPrice);
impl_price_compare!(HighPrice, ClosePrice);
impl_price_compare!(LowPrice, OpenPrice);
impl_price_compare!(LowPrice, ClosePrice);
impl_price_compare!(HighPrice, LowPrice);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct BaseVol(f64);

impl BaseVol {
    pub const fn new(val: f64) -> Self {
        let v = if val < 0.0 { 0.0 } else { val };
        Self(v)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for BaseVol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.8}", self.0)
    }
}
