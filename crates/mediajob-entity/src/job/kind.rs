//! Job type enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mediajob_core::error::AppError;

/// Kind of media work a job requests. Selects the processor that runs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// Video transcoding.
    Video,
    /// Audio transcoding.
    Audio,
    /// Image transformation.
    Image,
}

impl JobType {
    /// Every valid job type.
    pub const ALL: [JobType; 3] = [Self::Video, Self::Audio, Self::Image];

    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown job type '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_types() {
        for kind in JobType::ALL {
            assert_eq!(kind.as_str().parse::<JobType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_rejects_other_strings() {
        for s in ["", "Video", "document", " audio"] {
            assert!(s.parse::<JobType>().is_err(), "{s:?} should be rejected");
        }
    }
}
