//! Match squad: starters and bench, per-player lineup details.

use crate::data::Archive;
use crate::models::archive::{STATUS_STARTER, STATUS_SUBSTITUTE};
use crate::models::{ParticipantRow, Position};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fewer starters than this are topped up from the bench.
pub const MIN_STARTERS: usize = 7;

const GOALKEEPER_FILE_FALLBACK_RATING: u32 = 80;
const MEMBER_FALLBACK_RATING: u32 = 75;
const UNKNOWN_PLAYER_RATING: u32 = 70;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Squad {
    pub starters: Vec<String>,
    pub substitutes: Vec<String>,
}

impl Squad {
    /// At least `MIN_STARTERS` starters after topping up.
    pub fn is_complete(&self) -> bool {
        self.starters.len() >= MIN_STARTERS
    }
}

fn dedup_in_order(names: Vec<String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    names.into_iter().filter(|n| seen.insert(n.clone())).collect()
}

/// Split participation rows into starters and bench. Unknown statuses
/// count as starters.
pub fn split_squad<'a>(participants: impl IntoIterator<Item = &'a ParticipantRow>) -> Squad {
    let mut starters = Vec::new();
    let mut substitutes = Vec::new();

    for p in participants {
        match p.status.trim() {
            STATUS_SUBSTITUTE => substitutes.push(p.player_name.clone()),
            STATUS_STARTER => starters.push(p.player_name.clone()),
            _ => starters.push(p.player_name.clone()),
        }
    }

    if starters.len() < MIN_STARTERS {
        let needed = (MIN_STARTERS - starters.len()).min(substitutes.len());
        warn!(starters = starters.len(), moved = needed, "short of starters, topping up from bench");
        starters.extend(substitutes.drain(..needed));
    }

    Squad { starters: dedup_in_order(starters), substitutes: dedup_in_order(substitutes) }
}

/// Lineup-relevant facts about one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetails {
    pub name: String,
    pub primary: Option<Position>,
    pub secondary: Option<Position>,
    pub is_goalkeeper: bool,
    /// Listed in the goalkeeper file
    pub specialist_keeper: bool,
    pub rating: u32,
    /// Jersey number as stored, `"0"` when unknown
    pub number: String,
}

/// Goalkeeper file first, then a member marked GK, then any member, then
/// an unknown outfield player.
pub fn resolve_details(archive: &Archive, name: &str) -> PlayerDetails {
    let member = archive.member(name);

    if let Some(keeper) = archive.goalkeeper(name) {
        return PlayerDetails {
            name: name.to_string(),
            primary: Some(Position::GK),
            secondary: keeper
                .secondary_position
                .as_deref()
                .and_then(Position::parse)
                .or(Some(Position::CB)),
            is_goalkeeper: true,
            specialist_keeper: true,
            rating: keeper
                .rating
                .or_else(|| member.and_then(|m| m.ability))
                .unwrap_or(GOALKEEPER_FILE_FALLBACK_RATING),
            number: keeper
                .number
                .clone()
                .or_else(|| member.map(|m| m.number.clone()))
                .unwrap_or_else(|| "0".to_string()),
        };
    }

    match member {
        Some(m) if m.primary() == Some(Position::GK) => PlayerDetails {
            name: name.to_string(),
            primary: Some(Position::GK),
            secondary: m.secondary().or(Some(Position::CB)),
            is_goalkeeper: true,
            specialist_keeper: false,
            rating: m.ability.unwrap_or(MEMBER_FALLBACK_RATING),
            number: m.number.clone(),
        },
        Some(m) => PlayerDetails {
            name: name.to_string(),
            primary: m.primary().or(Some(Position::CM)),
            secondary: m.secondary(),
            is_goalkeeper: false,
            specialist_keeper: false,
            rating: m.ability.unwrap_or(MEMBER_FALLBACK_RATING),
            number: m.number.clone(),
        },
        None => {
            debug!(name, "player not in roster, using placeholder details");
            PlayerDetails {
                name: name.to_string(),
                primary: Some(Position::CM),
                secondary: None,
                is_goalkeeper: false,
                specialist_keeper: false,
                rating: UNKNOWN_PLAYER_RATING,
                number: "0".to_string(),
            }
        }
    }
}

/// With no keeper among the starters and one on the bench, swap the best
/// bench keeper for the weakest starter. Returns the swapped names
/// (keeper in, starter out).
pub fn promote_bench_keeper(
    starters: &mut Vec<PlayerDetails>,
    bench: &mut Vec<PlayerDetails>,
) -> Option<(String, String)> {
    if starters.iter().any(|p| p.is_goalkeeper) {
        return None;
    }

    let mut best: Option<usize> = None;
    for (i, p) in bench.iter().enumerate().filter(|(_, p)| p.is_goalkeeper) {
        if best.map_or(true, |b| p.rating > bench[b].rating) {
            best = Some(i);
        }
    }
    let keeper_idx = best?;

    let mut weakest: Option<usize> = None;
    for (i, p) in starters.iter().enumerate() {
        if weakest.map_or(true, |w| p.rating < starters[w].rating) {
            weakest = Some(i);
        }
    }
    let out_idx = weakest?;

    let keeper = bench.remove(keeper_idx);
    let benched = std::mem::replace(&mut starters[out_idx], keeper);
    warn!(
        keeper = %starters[out_idx].name,
        benched = %benched.name,
        "goalkeeper on the bench, promoted to starter"
    );
    let swap = (starters[out_idx].name.clone(), benched.name.clone());
    bench.push(benched);
    Some(swap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::archive::fixtures;

    fn row(activity: &str, name: &str, status: &str) -> ParticipantRow {
        ParticipantRow {
            activity_id: activity.to_string(),
            player_name: name.to_string(),
            status: status.to_string(),
            group: None,
        }
    }

    #[test]
    fn test_split_tops_up_and_dedups() {
        let rows = vec![
            row("1", "甲", "首发"),
            row("1", "乙", "替补"),
            row("1", "丙", "迟到"),
            row("1", "甲", "首发"),
            row("1", "丁", "替补"),
        ];
        let squad = split_squad(&rows);
        // 甲 丙 甲 plus 乙 丁 from the bench, then dedup
        assert_eq!(squad.starters, vec!["甲", "丙", "乙", "丁"]);
        assert!(squad.substitutes.is_empty());
        assert!(!squad.is_complete());
    }

    #[test]
    fn test_split_keeps_bench_when_enough_starters() {
        let mut rows: Vec<ParticipantRow> =
            (0..7).map(|i| row("1", &format!("首发{i}"), "首发")).collect();
        rows.push(row("1", "替补甲", "替补"));
        let squad = split_squad(&rows);
        assert_eq!(squad.starters.len(), 7);
        assert_eq!(squad.substitutes, vec!["替补甲"]);
    }

    #[test]
    fn test_resolve_details_fallbacks() {
        let archive = fixtures::archive();

        let keeper = resolve_details(&archive, "赵六");
        assert!(keeper.specialist_keeper);
        assert_eq!(keeper.rating, 81);
        assert_eq!(keeper.secondary, Some(Position::CB));

        let striker = resolve_details(&archive, "张三");
        assert_eq!(striker.primary, Some(Position::ST));
        assert_eq!(striker.secondary, Some(Position::CAM));
        assert_eq!(striker.rating, 85);
        assert_eq!(striker.number, "9");

        let unknown = resolve_details(&archive, "路人");
        assert_eq!(unknown.primary, Some(Position::CM));
        assert_eq!(unknown.rating, 70);
        assert_eq!(unknown.number, "0");
    }

    #[test]
    fn test_member_marked_goalkeeper() {
        let mut archive = fixtures::archive();
        archive.goalkeepers.clear();
        let keeper = resolve_details(&archive, "赵六");
        assert!(keeper.is_goalkeeper);
        assert!(!keeper.specialist_keeper);
        assert_eq!(keeper.rating, 76);
    }

    #[test]
    fn test_promote_bench_keeper() {
        let archive = fixtures::archive();
        let mut starters: Vec<PlayerDetails> =
            ["张三", "李四", "孙八"].iter().map(|n| resolve_details(&archive, n)).collect();
        let mut bench = vec![resolve_details(&archive, "赵六")];

        let swap = promote_bench_keeper(&mut starters, &mut bench);
        assert_eq!(swap, Some(("赵六".to_string(), "孙八".to_string())));
        assert_eq!(starters[2].name, "赵六");
        assert_eq!(bench[0].name, "孙八");

        // already has a keeper
        assert_eq!(promote_bench_keeper(&mut starters, &mut bench), None);
    }
}
