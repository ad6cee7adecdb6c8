use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Standard normal CDF via the Zelen & Severo polynomial approximation
/// (Abramowitz & Stegun 26.2.17), absolute error below 7.5e-8.
///
/// The coefficients are part of the tool's contract: every published
/// p-value was produced by exactly this polynomial, so it must not be
/// swapped for an erf-based implementation.
pub fn normal_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.2316419 * x.abs());
    let d = 0.3989423 * (-x * x / 2.0).exp();
    let tail = d
        * t
        * (0.3193815 + t * (-0.3565638 + t * (1.781478 + t * (-1.821256 + t * 1.330274))));
    if x >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Two-sided significance level.
///
/// Only three levels are supported; their z critical values are fixed
/// table entries, not an inverse CDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alpha {
    /// 99% confidence.
    #[serde(rename = "0.01")]
    P01,
    /// 95% confidence, the conventional default.
    #[default]
    #[serde(rename = "0.05")]
    P05,
    /// 90% confidence.
    #[serde(rename = "0.10")]
    P10,
}

impl Alpha {
    /// The significance level as a probability.
    pub fn level(&self) -> f64 {
        match self {
            Alpha::P01 => 0.01,
            Alpha::P05 => 0.05,
            Alpha::P10 => 0.10,
        }
    }

    /// Two-sided critical value of the standard normal at this level.
    pub fn z_value(&self) -> f64 {
        match self {
            Alpha::P01 => 2.576,
            Alpha::P05 => 1.96,
            Alpha::P10 => 1.645,
        }
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alpha::P01 => write!(f, "0.01"),
            Alpha::P05 => write!(f, "0.05"),
            Alpha::P10 => write!(f, "0.10"),
        }
    }
}

impl FromStr for Alpha {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0.01" => Ok(Alpha::P01),
            "0.05" => Ok(Alpha::P05),
            "0.1" | "0.10" => Ok(Alpha::P10),
            other => Err(format!(
                "unsupported significance level '{other}' (expected 0.01, 0.05 or 0.10)"
            )),
        }
    }
}

/// Statistical power target for sample size estimation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Power {
    /// 80% power, the conventional default.
    #[default]
    #[serde(rename = "0.80")]
    P80,
    /// 90% power.
    #[serde(rename = "0.90")]
    P90,
    /// 95% power.
    #[serde(rename = "0.95")]
    P95,
}

impl Power {
    /// The power target as a probability.
    pub fn level(&self) -> f64 {
        match self {
            Power::P80 => 0.80,
            Power::P90 => 0.90,
            Power::P95 => 0.95,
        }
    }

    /// One-sided critical value of the standard normal at this power.
    pub fn z_value(&self) -> f64 {
        match self {
            Power::P80 => 0.84,
            Power::P90 => 1.28,
            Power::P95 => 1.645,
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Power::P80 => write!(f, "0.80"),
            Power::P90 => write!(f, "0.90"),
            Power::P95 => write!(f, "0.95"),
        }
    }
}

impl FromStr for Power {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0.8" | "0.80" => Ok(Power::P80),
            "0.9" | "0.90" => Ok(Power::P90),
            "0.95" => Ok(Power::P95),
            other => Err(format!(
                "unsupported power target '{other}' (expected 0.80, 0.90 or 0.95)"
            )),
        }
    }
}
