//! Per-category query options

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An option value that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct InvalidOption {
    pub kind: &'static str,
    pub value: String,
}

impl InvalidOption {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Safe search level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeSearch {
    On,
    Moderate,
    Off,
}

impl FromStr for SafeSearch {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(SafeSearch::On),
            "moderate" => Ok(SafeSearch::Moderate),
            "off" => Ok(SafeSearch::Off),
            _ => Err(InvalidOption::new("safesearch", s)),
        }
    }
}

/// Restricts results to a recent time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLimit {
    Day,
    Week,
    Month,
    Year,
}

impl TimeLimit {
    /// One-letter code of the lite `df` field
    pub fn code(&self) -> &'static str {
        match self {
            TimeLimit::Day => "d",
            TimeLimit::Week => "w",
            TimeLimit::Month => "m",
            TimeLimit::Year => "y",
        }
    }

    /// Value of the `time:` image filter
    pub fn image_code(&self) -> &'static str {
        match self {
            TimeLimit::Day => "Day",
            TimeLimit::Week => "Week",
            TimeLimit::Month => "Month",
            TimeLimit::Year => "Year",
        }
    }

    /// Value of the `publishedAfter:` video filter. Videos have no yearly window.
    pub fn video_code(&self) -> Option<&'static str> {
        match self {
            TimeLimit::Day => Some("d"),
            TimeLimit::Week => Some("w"),
            TimeLimit::Month => Some("m"),
            TimeLimit::Year => None,
        }
    }
}

impl FromStr for TimeLimit {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" => Ok(TimeLimit::Day),
            "w" | "week" => Ok(TimeLimit::Week),
            "m" | "month" => Ok(TimeLimit::Month),
            "y" | "year" => Ok(TimeLimit::Year),
            _ => Err(InvalidOption::new("timelimit", s)),
        }
    }
}

/// Video definition filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    High,
    Standard,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::High => write!(f, "high"),
            Resolution::Standard => write!(f, "standard"),
        }
    }
}

impl FromStr for Resolution {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Resolution::High),
            "standard" => Ok(Resolution::Standard),
            _ => Err(InvalidOption::new("resolution", s)),
        }
    }
}

/// Options for web text search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    pub region: String,
    pub safesearch: SafeSearch,
    pub timelimit: Option<TimeLimit>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            region: "cn-zh".to_string(),
            safesearch: SafeSearch::On,
            timelimit: Some(TimeLimit::Year),
        }
    }
}

/// Options for image search. Empty filters are not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub region: String,
    pub safesearch: SafeSearch,
    pub timelimit: Option<TimeLimit>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub type_image: Option<String>,
    pub layout: Option<String>,
    pub license: Option<String>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            region: "wt-wt".to_string(),
            safesearch: SafeSearch::Off,
            timelimit: None,
            size: None,
            color: None,
            type_image: None,
            layout: None,
            license: None,
        }
    }
}

/// Options for video search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOptions {
    pub region: String,
    pub safesearch: SafeSearch,
    pub timelimit: Option<TimeLimit>,
    pub resolution: Option<Resolution>,
    pub duration: Option<String>,
    pub license: Option<String>,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            region: "wt-wt".to_string(),
            safesearch: SafeSearch::Off,
            timelimit: None,
            resolution: Some(Resolution::High),
            duration: None,
            license: None,
        }
    }
}
