//! Banzuke (ranking sheet) domain: divisions, ranks and participation.
//!
//! # Responsibility
//! - Model sumo's fixed division/rank hierarchy as closed enumerated types.
//! - Parse and format the rank string form used by banzuke data
//!   (`"Maegashira 5 East"`).
//! - Model per-tournament participation (`BashoRikishi`).
//!
//! # Invariants
//! - Every `RankTitle` belongs to exactly one `Division`; a rank entered
//!   under another division is invalid data.
//! - `Rank::ordering_value()` orders ranks the way the banzuke does:
//!   higher rank sorts first within a division.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::basho::BashoId;
use super::rikishi::RikishiId;

/// The six professional divisions, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    Makuuchi,
    Juryo,
    Makushita,
    Sandanme,
    Jonidan,
    Jonokuchi,
}

impl Division {
    /// All divisions in banzuke order, highest first.
    pub const ALL: [Division; 6] = [
        Division::Makuuchi,
        Division::Juryo,
        Division::Makushita,
        Division::Sandanme,
        Division::Jonidan,
        Division::Jonokuchi,
    ];

    /// Canonical name as stored in the database and used by banzuke data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Makuuchi => "Makuuchi",
            Self::Juryo => "Juryo",
            Self::Makushita => "Makushita",
            Self::Sandanme => "Sandanme",
            Self::Jonidan => "Jonidan",
            Self::Jonokuchi => "Jonokuchi",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|division| division.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Position in the banzuke order: 0 for Makuuchi through 5 for Jonokuchi.
    pub fn banzuke_order(self) -> u8 {
        self as u8
    }
}

impl Display for Division {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank titles, highest first. The first five are Makuuchi titles; the
/// rest name the numbered ranks of the lower divisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTitle {
    Yokozuna,
    Ozeki,
    Sekiwake,
    Komusubi,
    Maegashira,
    Juryo,
    Makushita,
    Sandanme,
    Jonidan,
    Jonokuchi,
}

impl RankTitle {
    const ALL: [RankTitle; 10] = [
        RankTitle::Yokozuna,
        RankTitle::Ozeki,
        RankTitle::Sekiwake,
        RankTitle::Komusubi,
        RankTitle::Maegashira,
        RankTitle::Juryo,
        RankTitle::Makushita,
        RankTitle::Sandanme,
        RankTitle::Jonidan,
        RankTitle::Jonokuchi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yokozuna => "Yokozuna",
            Self::Ozeki => "Ozeki",
            Self::Sekiwake => "Sekiwake",
            Self::Komusubi => "Komusubi",
            Self::Maegashira => "Maegashira",
            Self::Juryo => "Juryo",
            Self::Makushita => "Makushita",
            Self::Sandanme => "Sandanme",
            Self::Jonidan => "Jonidan",
            Self::Jonokuchi => "Jonokuchi",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|title| title.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// The division this title belongs to.
    pub fn division(self) -> Division {
        match self {
            Self::Yokozuna | Self::Ozeki | Self::Sekiwake | Self::Komusubi | Self::Maegashira => {
                Division::Makuuchi
            }
            Self::Juryo => Division::Juryo,
            Self::Makushita => Division::Makushita,
            Self::Sandanme => Division::Sandanme,
            Self::Jonidan => Division::Jonidan,
            Self::Jonokuchi => Division::Jonokuchi,
        }
    }
}

impl Display for RankTitle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// East/west side of the banzuke sheet. East outranks west at equal rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    East,
    West,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::East => "East",
            Self::West => "West",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            v if v.eq_ignore_ascii_case("East") => Some(Self::East),
            v if v.eq_ignore_ascii_case("West") => Some(Self::West),
            _ => None,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A full banzuke rank, e.g. `Maegashira 5 East` or a bare `Yokozuna`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub title: RankTitle,
    /// Numbered position within the title, when the banzuke carries one.
    pub number: Option<u16>,
    pub side: Option<Side>,
}

// Title word, optional number, optional side. Matches the string form the
// banzuke data uses, e.g. "Maegashira 17 East".
static RANK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z]+)(?:\s+(\d{1,3}))?(?:\s+([A-Za-z]+))?\s*$").unwrap());

impl Rank {
    pub fn titled(title: RankTitle) -> Self {
        Self {
            title,
            number: None,
            side: None,
        }
    }

    pub fn numbered(title: RankTitle, number: u16, side: Side) -> Self {
        Self {
            title,
            number: Some(number),
            side: Some(side),
        }
    }

    /// Parses the banzuke string form. Returns `None` for anything outside
    /// the closed rank domain.
    pub fn parse(value: &str) -> Option<Self> {
        let captures = RANK_RE.captures(value)?;
        let title = RankTitle::parse(captures.get(1)?.as_str())?;
        let number = match captures.get(2) {
            Some(m) => Some(m.as_str().parse::<u16>().ok()?),
            None => None,
        };
        let side = match captures.get(3) {
            Some(m) => Some(Side::parse(m.as_str())?),
            None => None,
        };
        Some(Self {
            title,
            number,
            side,
        })
    }

    /// Numeric ordering hint: lower values outrank higher ones. Stored as
    /// `basho_rikishi.rank_value` and used to sort roster reads.
    pub fn ordering_value(self) -> i64 {
        let title = self.title as i64;
        let number = i64::from(self.number.unwrap_or(0));
        let side = match self.side {
            Some(Side::West) => 1,
            _ => 0,
        };
        title * 1_000 + number * 2 + side
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title.as_str())?;
        if let Some(number) = self.number {
            write!(f, " {number}")?;
        }
        if let Some(side) = self.side {
            write!(f, " {side}")?;
        }
        Ok(())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| format!("unrecognized rank string `{value}`"))
    }
}

/// Per-tournament participation record, keyed by `(basho_id, rikishi_id)`.
///
/// Rank fields are nullable: a row created as a `record_match` side effect
/// holds membership only until `enter_roster` fills the rank in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BashoRikishi {
    pub basho_id: BashoId,
    pub rikishi_id: RikishiId,
    pub rank: Option<Rank>,
    pub division: Option<Division>,
    pub rank_value: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_parse_is_case_insensitive() {
        assert_eq!(Division::parse("makuuchi"), Some(Division::Makuuchi));
        assert_eq!(Division::parse(" JURYO "), Some(Division::Juryo));
        assert_eq!(Division::parse("ozumo"), None);
    }

    #[test]
    fn rank_parses_full_banzuke_form() {
        let rank = Rank::parse("Maegashira 17 East").unwrap();
        assert_eq!(rank.title, RankTitle::Maegashira);
        assert_eq!(rank.number, Some(17));
        assert_eq!(rank.side, Some(Side::East));
    }

    #[test]
    fn rank_parses_bare_title() {
        let rank = Rank::parse("Yokozuna").unwrap();
        assert_eq!(rank, Rank::titled(RankTitle::Yokozuna));
    }

    #[test]
    fn rank_rejects_unknown_title_and_side() {
        assert!(Rank::parse("Shogun 1 East").is_none());
        assert!(Rank::parse("Maegashira 1 North").is_none());
    }

    #[test]
    fn rank_display_round_trips_through_parse() {
        let rank = Rank::numbered(RankTitle::Sekiwake, 1, Side::West);
        assert_eq!(Rank::parse(&rank.to_string()), Some(rank));
    }

    #[test]
    fn ordering_value_ranks_yokozuna_above_maegashira() {
        let yokozuna = Rank::numbered(RankTitle::Yokozuna, 1, Side::East);
        let maegashira = Rank::numbered(RankTitle::Maegashira, 1, Side::East);
        assert!(yokozuna.ordering_value() < maegashira.ordering_value());
    }

    #[test]
    fn ordering_value_puts_east_above_west_at_equal_rank() {
        let east = Rank::numbered(RankTitle::Maegashira, 5, Side::East);
        let west = Rank::numbered(RankTitle::Maegashira, 5, Side::West);
        assert!(east.ordering_value() < west.ordering_value());
    }

    #[test]
    fn title_division_mapping_covers_makuuchi_titles() {
        assert_eq!(RankTitle::Yokozuna.division(), Division::Makuuchi);
        assert_eq!(RankTitle::Komusubi.division(), Division::Makuuchi);
        assert_eq!(RankTitle::Juryo.division(), Division::Juryo);
        assert_eq!(RankTitle::Jonokuchi.division(), Division::Jonokuchi);
    }

    #[test]
    fn division_serializes_as_snake_case() {
        let json = serde_json::to_string(&Division::Makuuchi).unwrap();
        assert_eq!(json, "\"makuuchi\"");
        let back: Division = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Division::Makuuchi);
    }
}
