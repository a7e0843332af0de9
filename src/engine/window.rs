//! Co-occurrence window policies.
//!
//! Every policy partitions or covers the corpus with a finite universe of
//! windows, each identified by a slot number:
//!
//! - `Ayah`: one window per ayah (slot = ayah slot).
//! - `Surah`: one window per surah (slot = surah slot).
//! - `AyahDistance(d)`: one window per ayah, covering the ayahs of the same
//!   surah whose number is within `d` of the centre (slot = centre ayah slot).
//! - `TokenDistance(d)`: one window per token, covering the tokens of the
//!   same surah within `d` linear positions of the centre (slot = centre rank).

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::index::WindowIndex;
use crate::types::{LensError, Token};

/// Window granularity requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    #[default]
    Ayah,
    Surah,
    Distance,
}

impl FromStr for WindowType {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ayah" => Ok(Self::Ayah),
            "surah" | "sura" => Ok(Self::Surah),
            "distance" => Ok(Self::Distance),
            other => Err(LensError::config(format!(
                "unknown window type '{other}' (expected ayah, surah or distance)"
            ))),
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ayah => "ayah",
            Self::Surah => "surah",
            Self::Distance => "distance",
        })
    }
}

/// Unit in which a distance window is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Ayah,
    Token,
}

impl FromStr for DistanceUnit {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ayah" => Ok(Self::Ayah),
            "token" => Ok(Self::Token),
            other => Err(LensError::config(format!(
                "unknown distance unit '{other}' (expected ayah or token)"
            ))),
        }
    }
}

/// A validated window policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    Ayah,
    Surah,
    AyahDistance(u32),
    TokenDistance(u32),
}

impl Window {
    /// Resolve a requested policy. `distance` is only checked for distance windows.
    pub fn resolve(kind: WindowType, distance: u32, unit: DistanceUnit) -> Result<Self, LensError> {
        match kind {
            WindowType::Ayah => Ok(Self::Ayah),
            WindowType::Surah => Ok(Self::Surah),
            WindowType::Distance if distance < 1 => Err(LensError::config(format!(
                "distance window requires distance >= 1, got {distance}"
            ))),
            WindowType::Distance => Ok(match unit {
                DistanceUnit::Ayah => Self::AyahDistance(distance),
                DistanceUnit::Token => Self::TokenDistance(distance),
            }),
        }
    }

    /// Size of the window universe.
    pub fn total_windows(&self, index: &WindowIndex) -> usize {
        match self {
            Self::Ayah | Self::AyahDistance(_) => index.ayah_count(),
            Self::Surah => index.sura_count(),
            Self::TokenDistance(_) => index.token_count(),
        }
    }

    /// Token ranks covered by window `slot`.
    pub fn members(&self, index: &WindowIndex, slot: usize) -> Range<usize> {
        match *self {
            Self::Ayah => index.ayahs()[slot].tokens.clone(),
            Self::Surah => index.suras()[slot].tokens.clone(),
            Self::AyahDistance(d) => index.ayah_range_tokens(index.ayah_neighbourhood(slot, d)),
            Self::TokenDistance(d) => index.token_neighbourhood(slot, d),
        }
    }

    /// The window anchored on an occurrence: its own ayah, surah, or the
    /// distance window centred on it. Its members are exactly the tokens
    /// that co-occur with the occurrence.
    pub fn anchor(&self, index: &WindowIndex, token: usize) -> usize {
        match self {
            Self::Ayah | Self::AyahDistance(_) => index.ayah_slot_of(token),
            Self::Surah => index.sura_slot_of(token),
            Self::TokenDistance(_) => index.rank_of(token),
        }
    }

    /// Slots of every window containing the token. Contiguous by construction.
    pub fn containing(&self, index: &WindowIndex, token: usize) -> Range<usize> {
        match *self {
            Self::Ayah | Self::Surah => {
                let slot = self.anchor(index, token);
                slot..slot + 1
            }
            // Distance is symmetric, so the centres covering a token are its
            // own neighbourhood.
            Self::AyahDistance(d) => index.ayah_neighbourhood(index.ayah_slot_of(token), d),
            Self::TokenDistance(d) => index.token_neighbourhood(index.rank_of(token), d),
        }
    }

    /// Sorted, deduplicated slots of windows containing any of the occurrences.
    pub fn windows_containing(&self, index: &WindowIndex, occurrences: &[usize]) -> Vec<usize> {
        let mut ranges: Vec<Range<usize>> = occurrences
            .iter()
            .map(|&t| self.containing(index, t))
            .collect();
        ranges.sort_by_key(|r| (r.start, r.end));

        let mut slots = Vec::new();
        let mut next = 0usize;
        for range in ranges {
            for slot in range.start.max(next)..range.end {
                slots.push(slot);
            }
            next = next.max(range.end);
        }
        slots
    }

    /// Human-readable identifier of window `slot`.
    pub fn label(&self, index: &WindowIndex, tokens: &[Token], slot: usize) -> String {
        match self {
            Self::Ayah | Self::AyahDistance(_) => index.ayahs()[slot].ayah.to_string(),
            Self::Surah => index.suras()[slot].sura.to_string(),
            Self::TokenDistance(_) => {
                let t = &tokens[index.token_at(slot)];
                format!("{}:{}:{}", t.sura, t.ayah, t.position)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenBuilder;

    fn corpus() -> Vec<Token> {
        vec![
            TokenBuilder::new(1, 1, 1).build(),
            TokenBuilder::new(1, 1, 2).build(),
            TokenBuilder::new(1, 2, 1).build(),
            TokenBuilder::new(1, 4, 1).build(),
            TokenBuilder::new(2, 1, 1).build(),
        ]
    }

    #[test]
    fn test_resolve_rejects_zero_distance() {
        let err = Window::resolve(WindowType::Distance, 0, DistanceUnit::Ayah).unwrap_err();
        assert!(err.is_configuration());
        // Distance is ignored for non-distance windows.
        assert_eq!(
            Window::resolve(WindowType::Ayah, 0, DistanceUnit::Ayah).unwrap(),
            Window::Ayah
        );
    }

    #[test]
    fn test_parse_window_type() {
        assert_eq!("Surah".parse::<WindowType>().unwrap(), WindowType::Surah);
        assert!("verse".parse::<WindowType>().is_err());
        assert!("line".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn test_totals() {
        let tokens = corpus();
        let idx = WindowIndex::build(&tokens);
        assert_eq!(Window::Ayah.total_windows(&idx), 4);
        assert_eq!(Window::Surah.total_windows(&idx), 2);
        assert_eq!(Window::AyahDistance(1).total_windows(&idx), 4);
        assert_eq!(Window::TokenDistance(2).total_windows(&idx), 5);
    }

    #[test]
    fn test_ayah_distance_uses_ayah_numbers() {
        let tokens = corpus();
        let idx = WindowIndex::build(&tokens);
        // 1:4 is two ayahs away from 1:2, so distance 1 keeps them apart.
        assert_eq!(Window::AyahDistance(1).members(&idx, 1), 0..3);
        assert_eq!(Window::AyahDistance(2).members(&idx, 1), 0..4);
    }

    #[test]
    fn test_windows_containing_merges() {
        let tokens = corpus();
        let idx = WindowIndex::build(&tokens);
        let w = Window::TokenDistance(1);
        assert_eq!(w.windows_containing(&idx, &[0, 1]), vec![0, 1, 2]);
        assert_eq!(w.windows_containing(&idx, &[4]), vec![4]);
        assert_eq!(Window::Ayah.windows_containing(&idx, &[0, 1, 2]), vec![0, 1]);
    }

    #[test]
    fn test_labels() {
        let tokens = corpus();
        let idx = WindowIndex::build(&tokens);
        assert_eq!(Window::Ayah.label(&idx, &tokens, 2), "1:4");
        assert_eq!(Window::Surah.label(&idx, &tokens, 1), "2");
        assert_eq!(Window::TokenDistance(1).label(&idx, &tokens, 2), "1:2:1");
    }
}
