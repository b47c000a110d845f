//! Roster listing with search and squad filters.

use crate::config::ClubConfig;
use crate::error::ClubError;
use crate::models::{Player, PlayerGroup};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterFilter {
    #[default]
    All,
    Competitive,
    Recreational,
    HasPhoto,
}

impl FromStr for RosterFilter {
    type Err = ClubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(RosterFilter::All),
            "competitive" => Ok(RosterFilter::Competitive),
            "recreational" => Ok(RosterFilter::Recreational),
            "has_photo" | "hasphoto" | "photo" => Ok(RosterFilter::HasPhoto),
            other => Err(ClubError::InvalidRequest(format!("unknown roster filter: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterQuery {
    pub search: Option<String>,
    pub filter: RosterFilter,
}

impl RosterQuery {
    /// Case-insensitive match on name, jersey number or any position label.
    pub fn matches_search(&self, player: &Player) -> bool {
        let query = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };
        player.name.to_lowercase().contains(&query)
            || player.number.to_string().contains(&query)
            || player.positions.iter().any(|p| p.to_lowercase().contains(&query))
    }

    pub fn matches_filter(&self, player: &Player, config: &ClubConfig) -> bool {
        match self.filter {
            RosterFilter::All => true,
            RosterFilter::Competitive => player.group == PlayerGroup::Competitive,
            RosterFilter::Recreational => player.group == PlayerGroup::Recreational,
            RosterFilter::HasPhoto => player.has_number() && config.photo_for(player.number).is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(flatten)]
    pub player: Player,
    pub has_photo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub total: usize,
    pub players: Vec<RosterEntry>,
}

/// Players passing `query`, by jersey number with unassigned numbers last.
pub fn list_players(players: &[Player], query: &RosterQuery, config: &ClubConfig) -> Roster {
    let mut selected: Vec<&Player> = players
        .iter()
        .filter(|p| query.matches_search(p) && query.matches_filter(p, config))
        .collect();
    selected.sort_by_key(|p| p.number_sort_key());

    let players: Vec<RosterEntry> = selected
        .into_iter()
        .map(|p| RosterEntry {
            player: p.clone(),
            has_photo: p.has_number() && config.photo_for(p.number).is_some(),
        })
        .collect();

    Roster { total: players.len(), players }
}
