//! Rank letters and per-rank constant tables.
//!
//! Ranks run E < D < C < B < A < S. Every numeric rule that scales with
//! rank is expressed as a [`ByRank`] so action configs stay declarative.

pub mod table;

pub use table::{RankEntry, RankTable};

use serde::{Deserialize, Serialize};

/// A power tier letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Lowest tier.
    E,
    /// Second tier.
    D,
    /// Third tier.
    C,
    /// Fourth tier.
    B,
    /// Fifth tier.
    A,
    /// Highest tier.
    S,
}

impl Rank {
    /// All ranks, lowest first.
    pub const ALL: [Rank; 6] = [Rank::E, Rank::D, Rank::C, Rank::B, Rank::A, Rank::S];

    /// Parse a rank letter, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "e" => Some(Self::E),
            "d" => Some(Self::D),
            "c" => Some(Self::C),
            "b" => Some(Self::B),
            "a" => Some(Self::A),
            "s" => Some(Self::S),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::E => "E",
            Self::D => "D",
            Self::C => "C",
            Self::B => "B",
            Self::A => "A",
            Self::S => "S",
        };
        write!(f, "{letter}")
    }
}

/// Which of the two rank tables a letter is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankCategory {
    /// Mastery rank (MR).
    Mastery,
    /// Weapon rank (WR).
    Weapon,
}

impl RankCategory {
    /// Short label used in calculation strings.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Mastery => "MR",
            Self::Weapon => "WR",
        }
    }
}

impl std::fmt::Display for RankCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mastery => write!(f, "mastery"),
            Self::Weapon => write!(f, "weapon"),
        }
    }
}

/// One value per rank, E first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByRank<T>(pub [T; 6]);

impl<T: Copy> ByRank<T> {
    /// Build from values listed E, D, C, B, A, S.
    pub const fn new(values: [T; 6]) -> Self {
        Self(values)
    }

    /// The same value at every rank.
    pub const fn uniform(value: T) -> Self {
        Self([value; 6])
    }

    /// Build by evaluating `f` for every rank.
    pub fn from_fn(f: impl Fn(Rank) -> T) -> Self {
        Self(Rank::ALL.map(f))
    }

    /// The value for `rank`.
    pub fn get(&self, rank: Rank) -> T {
        self.0[rank.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Rank::parse("b"), Some(Rank::B));
        assert_eq!(Rank::parse(" S "), Some(Rank::S));
        assert_eq!(Rank::parse("z"), None);
        assert_eq!(Rank::parse(""), None);
        assert_eq!(Rank::parse("ss"), None);
    }

    #[test]
    fn ranks_are_ordered() {
        assert!(Rank::E < Rank::D);
        assert!(Rank::A < Rank::S);
        assert_eq!(Rank::ALL.iter().max(), Some(&Rank::S));
    }

    #[test]
    fn by_rank_lookup() {
        let table = ByRank::new([40, 35, 30, 30, 25, 25]);
        assert_eq!(table.get(Rank::E), 40);
        assert_eq!(table.get(Rank::B), 30);
        assert_eq!(table.get(Rank::S), 25);
        assert_eq!(ByRank::uniform(7).get(Rank::C), 7);
        assert!(ByRank::from_fn(|r| r == Rank::S).get(Rank::S));
    }
}
