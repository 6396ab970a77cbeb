//! The four validated business series.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that names none of the four series.
#[derive(Debug, Clone, Error)]
#[error("unknown series: {0}")]
pub struct ParseSeriesError(String);

/// One of the independent business data domains validated by this system.
/// `System` tags boundary diagnostics that belong to no series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Series {
    Dekispart,
    DekispartSchool,
    Innosite,
    Cloud,
    System,
}

impl Series {
    /// The four real series, in the order the application presents them.
    pub const ALL: [Series; 4] = [
        Series::Dekispart,
        Series::DekispartSchool,
        Series::Innosite,
        Series::Cloud,
    ];

    /// Canonical name used in the result table and check ids.
    pub fn as_str(self) -> &'static str {
        match self {
            Series::Dekispart => "DEKISPART",
            Series::DekispartSchool => "DEKISPART_SCHOOL",
            Series::Innosite => "INNOSITE",
            Series::Cloud => "CLOUD",
            Series::System => "System",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Series {
    type Err = ParseSeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEKISPART" => Ok(Series::Dekispart),
            "DEKISPART_SCHOOL" => Ok(Series::DekispartSchool),
            "INNOSITE" => Ok(Series::Innosite),
            "CLOUD" => Ok(Series::Cloud),
            other => Err(ParseSeriesError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_canonical_names() {
        for series in Series::ALL {
            assert_eq!(series.as_str().parse::<Series>().unwrap(), series);
        }
        assert!("System".parse::<Series>().is_err());
    }
}
