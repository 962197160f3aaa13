//! Parametrization tuples for the resample checks.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::SettingsError;

/// Whether a resample case goes up or down in rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `rate + rate / 2`
    Up,
    /// `rate - rate / 2`
    Down,
}

impl Direction {
    /// Both directions, in case-generation order.
    pub const ALL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// The sign used in case ids.
    pub fn sign(self) -> char {
        match self {
            Direction::Up => '+',
            Direction::Down => '-',
        }
    }

    /// Target rate for a source at `rate`: half the rate added or removed.
    pub fn apply(self, rate: u32) -> u32 {
        let offset = rate / 2;
        match self {
            Direction::Up => rate.saturating_add(offset),
            Direction::Down => rate - offset,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

impl FromStr for Direction {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Direction::Up),
            "-" => Ok(Direction::Down),
            other => Err(SettingsError::Invalid {
                message: format!("direction must be '+' or '-', got '{}'", other),
            }),
        }
    }
}

/// One up/down-sampling energy check: (file, threshold, direction).
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleCase {
    pub file: PathBuf,
    pub threshold: f64,
    pub direction: Direction,
}

impl ResampleCase {
    pub fn new(file: impl Into<PathBuf>, threshold: f64, direction: Direction) -> Self {
        Self {
            file: file.into(),
            threshold,
            direction,
        }
    }

    /// Target rate for a source at `rate`.
    pub fn target_rate(&self, rate: u32) -> u32 {
        self.direction.apply(rate)
    }
}

impl fmt::Display for ResampleCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.file.display(), self.direction)
    }
}

/// Cartesian product of `files` × {+, -}, every case carrying `threshold`.
pub fn resample_cases(files: &[PathBuf], threshold: f64) -> Vec<ResampleCase> {
    files
        .iter()
        .flat_map(|file| {
            Direction::ALL
                .iter()
                .map(move |&direction| ResampleCase::new(file.clone(), threshold, direction))
        })
        .collect()
}

/// Whether case `id` contains any of `keywords`, ignoring case.
///
/// No keywords selects every case.
pub fn keyword_selects(keywords: &[String], id: &str) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let id = id.to_lowercase();
    keywords
        .iter()
        .any(|keyword| id.contains(&keyword.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_direction_apply() {
        assert_eq!(Direction::Up.apply(48000), 72000);
        assert_eq!(Direction::Down.apply(48000), 24000);
        assert_eq!(Direction::Down.apply(44101), 22051);
        assert_eq!(Direction::Up.apply(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("+".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("-".parse::<Direction>().unwrap(), Direction::Down);
        assert!("*".parse::<Direction>().is_err());
    }

    #[test]
    fn test_resample_cases_product() {
        let files = vec![PathBuf::from("a.wav"), PathBuf::from("b.wav")];
        let cases = resample_cases(&files, 1.0);

        let ids: Vec<String> = cases.iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["a.wav-+", "a.wav--", "b.wav-+", "b.wav--"]);
        assert!(cases.iter().all(|c| c.threshold == 1.0));
    }

    #[test]
    fn test_resample_cases_empty() {
        assert!(resample_cases(&[], 1.0).is_empty());
    }
}
