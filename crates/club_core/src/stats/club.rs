//! Club-wide record, match listings and the home page summary.

use super::leaderboard::{scorer_names, tally_names};
use crate::adapter::ClubView;
use crate::config::ClubConfig;
use crate::models::{Match, MatchKind, Outcome, Player};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// All-time win/draw/loss record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubRecord {
    pub total: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub competitive: u32,
    pub friendly: u32,
    pub active_players: u32,
}

impl ClubRecord {
    pub fn from_matches(matches: &[Match], players: &[Player]) -> Self {
        let mut record = ClubRecord {
            total: matches.len() as u32,
            active_players: players.len() as u32,
            ..Default::default()
        };

        for m in matches {
            match m.result {
                Outcome::Win => record.wins += 1,
                Outcome::Draw => record.draws += 1,
                Outcome::Loss => record.losses += 1,
            }
            match m.kind {
                MatchKind::Competitive => record.competitive += 1,
                MatchKind::Friendly => record.friendly += 1,
            }
            record.goals_for += m.our_score;
            record.goals_against += m.opponent_score;
        }
        record
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub total: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl OutcomeTally {
    pub fn from_matches<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Self {
        let mut tally = OutcomeTally::default();
        for m in matches {
            tally.total += 1;
            match m.result {
                Outcome::Win => tally.wins += 1,
                Outcome::Draw => tally.draws += 1,
                Outcome::Loss => tally.losses += 1,
            }
        }
        tally
    }
}

/// Newest `n` matches.
pub fn recent_matches(matches: &[Match], n: usize) -> Vec<Match> {
    let mut sorted = matches.to_vec();
    sorted.sort_by(Match::cmp_newest_first);
    sorted.truncate(n);
    sorted
}

/// Distinct years with at least one match, newest first.
pub fn available_years(matches: &[Match]) -> Vec<i32> {
    let mut years: Vec<i32> = matches.iter().filter_map(Match::year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    pub year: Option<i32>,
    pub kind: Option<MatchKind>,
}

impl MatchFilter {
    pub fn accepts(&self, m: &Match) -> bool {
        self.year.map_or(true, |y| m.year() == Some(y)) && self.kind.map_or(true, |k| m.kind == k)
    }
}

/// Matches passing `filter`, newest first.
pub fn filter_matches(matches: &[Match], filter: &MatchFilter) -> Vec<Match> {
    let mut list: Vec<Match> = matches.iter().filter(|m| filter.accepts(m)).cloned().collect();
    list.sort_by(Match::cmp_newest_first);
    list
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchListing {
    pub years: Vec<i32>,
    pub filter: MatchFilter,
    pub tally: OutcomeTally,
    pub matches: Vec<Match>,
}

pub fn match_listing(view: &ClubView, filter: MatchFilter) -> MatchListing {
    let matches = filter_matches(&view.matches, &filter);
    MatchListing {
        years: available_years(&view.matches),
        filter,
        tally: OutcomeTally::from_matches(&matches),
        matches,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerLine {
    pub name: String,
    pub goals: u32,
    pub assists: u32,
}

fn line_index<'a>(
    index: &mut FxHashMap<&'a str, usize>,
    lines: &mut Vec<ScorerLine>,
    name: &'a str,
) -> usize {
    *index.entry(name).or_insert_with(|| {
        lines.push(ScorerLine { name: name.to_string(), goals: 0, assists: 0 });
        lines.len() - 1
    })
}

/// Goals and assists per player within one match, most goals first.
/// A scorer named as his own assister gets no assist.
pub fn scorer_summary(m: &Match) -> Vec<ScorerLine> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut lines: Vec<ScorerLine> = Vec::new();

    for goal in &m.events.goal_scorers {
        let scorer = goal.scorer.trim();
        if scorer.is_empty() {
            continue;
        }
        let i = line_index(&mut index, &mut lines, scorer);
        lines[i].goals += 1;

        if let Some(assister) = goal.assister.as_deref().map(str::trim) {
            if !assister.is_empty() && assister != scorer {
                let j = line_index(&mut index, &mut lines, assister);
                lines[j].assists += 1;
            }
        }
    }

    lines.sort_by(|a, b| b.goals.cmp(&a.goals));
    lines
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopScorer {
    pub rank: u32,
    pub name: String,
    pub goals: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadPreviewEntry {
    pub id: String,
    pub name: String,
    pub number: u32,
    pub photo_url: String,
    pub positions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
    pub club_name: String,
    pub record: ClubRecord,
    pub recent_matches: Vec<Match>,
    pub top_scorers: Vec<TopScorer>,
    pub squad_preview: Vec<SquadPreviewEntry>,
    pub last_updated: Option<String>,
}

pub fn home_summary(view: &ClubView, config: &ClubConfig) -> HomeSummary {
    let top_scorers = tally_names(scorer_names(&view.matches, &config.unknown_name))
        .into_iter()
        .take(config.home_top_scorers)
        .enumerate()
        .map(|(i, (name, goals))| TopScorer { rank: i as u32 + 1, name, goals })
        .collect();

    let squad_preview = view
        .players
        .iter()
        .filter(|p| p.number > 0)
        .filter_map(|p| {
            config.photo_for(p.number).map(|photo| SquadPreviewEntry {
                id: p.id.clone(),
                name: p.name.clone(),
                number: p.number,
                photo_url: photo.to_string(),
                positions: p.positions.clone(),
            })
        })
        .take(config.squad_preview_size)
        .collect();

    HomeSummary {
        club_name: config.club_name.clone(),
        record: ClubRecord::from_matches(&view.matches, &view.players),
        recent_matches: recent_matches(&view.matches, config.recent_matches),
        top_scorers,
        squad_preview,
        last_updated: view.metadata.as_ref().and_then(|m| m.last_updated.clone()),
    }
}
