//! Per-player aggregates over the legacy archive: appearances, training
//! attendance, match ratings, market value and goal/assist history.

use crate::data::Archive;
use crate::error::{ClubError, Result};
use crate::models::archive::STATUS_STARTER;
use crate::models::{ActivityType, MatchEventRow, MemberRow, ParticipantRow, Position};
use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const GROUP_COMPETITIVE: &str = "竞技组";
pub const GROUP_RECREATIONAL: &str = "兴趣组";

const DEFAULT_ABILITY: u32 = 75;
const DEFAULT_AGE: u32 = 30;
const VALUE_PER_ABILITY_POINT: f64 = 8000.0;
const MARKET_VALUE_CAP: f64 = 1_000_000.0;

const STARTER_BASE_RATING: f64 = 7.0;
const SUBSTITUTE_BASE_RATING: f64 = 6.0;
const MAX_RATING: f64 = 10.0;
const MVP_THRESHOLD: f64 = 8.5;
const RECENT_PERFORMANCES: usize = 5;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub total_matches: u32,
    pub starter_matches: u32,
    pub substitute_matches: u32,
    pub total_goals: u32,
    pub total_assists: u32,
    pub competitive_matches: u32,
    pub recreational_matches: u32,
}

pub fn player_match_stats(archive: &Archive, name: &str) -> MatchStats {
    let mut stats = MatchStats::default();

    for p in archive.participants.iter().filter(|p| p.player_name == name) {
        stats.total_matches += 1;
        if p.is_starter() {
            stats.starter_matches += 1;
        }
        if p.is_substitute() {
            stats.substitute_matches += 1;
        }
        match p.group.as_deref() {
            Some(GROUP_COMPETITIVE) => stats.competitive_matches += 1,
            Some(GROUP_RECREATIONAL) => stats.recreational_matches += 1,
            _ => {}
        }
    }

    stats.total_goals = archive.events.iter().filter(|e| e.scorer == name).count() as u32;
    stats.total_assists =
        archive.events.iter().filter(|e| e.assister.as_deref() == Some(name)).count() as u32;
    stats
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStats {
    pub total_registrations: u32,
    pub total_attendance: u32,
    /// Rounded percentage, 0 without registrations
    pub attendance_rate: u32,
    pub team_trainings: u32,
    pub skirmish_matches: u32,
    pub attended_team_trainings: u32,
    pub attended_skirmish_matches: u32,
}

pub fn player_training_stats(archive: &Archive, name: &str) -> TrainingStats {
    let mut stats = TrainingStats::default();

    for t in archive.trainings.iter().filter(|t| t.player_name == name) {
        stats.total_registrations += 1;
        if t.attended {
            stats.total_attendance += 1;
        }
        match t.activity_type {
            ActivityType::TeamTraining => {
                stats.team_trainings += 1;
                if t.attended {
                    stats.attended_team_trainings += 1;
                }
            }
            ActivityType::Skirmish => {
                stats.skirmish_matches += 1;
                if t.attended {
                    stats.attended_skirmish_matches += 1;
                }
            }
            _ => {}
        }
    }

    if stats.total_registrations > 0 {
        let rate = stats.total_attendance as f64 / stats.total_registrations as f64 * 100.0;
        stats.attendance_rate = rate.round() as u32;
    }
    stats
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsReport {
    pub player_name: String,
    pub match_stats: MatchStats,
    pub training_stats: TrainingStats,
}

pub fn player_stats(archive: &Archive, name: &str) -> PlayerStatsReport {
    PlayerStatsReport {
        player_name: name.to_string(),
        match_stats: player_match_stats(archive, name),
        training_stats: player_training_stats(archive, name),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPerformance {
    pub activity_id: String,
    pub status: String,
    pub rating: f64,
    pub goals: u32,
    pub assists: u32,
    pub mvp: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub rated_matches: u32,
    pub mvp_count: u32,
    pub average_rating: f64,
    /// Most recent first, by numeric activity id
    pub recent: Vec<MatchPerformance>,
}

/// Rating for one appearance: base by status, bonuses by goals and
/// assists, a positional bonus, capped at 10.
///
/// `position` is the parsed primary position, so members stored with a
/// Chinese label (前锋, 后腰) earn the same bonus as members stored with a code.
pub fn match_rating(starter: bool, goals: u32, assists: u32, position: Option<Position>) -> f64 {
    let goals = goals as f64;
    let assists = assists as f64;

    let mut rating = if starter { STARTER_BASE_RATING } else { SUBSTITUTE_BASE_RATING };
    rating += goals * 1.0 + assists * 0.5;

    match position {
        Some(Position::ST | Position::LW | Position::RW | Position::CAM) => rating += goals * 0.5,
        Some(Position::CDM | Position::CM | Position::LM | Position::RM) => {
            rating += assists * 0.5
        }
        _ => {}
    }
    rating.min(MAX_RATING)
}

fn cmp_activity_id_desc(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => b.cmp(a),
    }
}

pub fn performance_ratings(archive: &Archive, member: &MemberRow) -> PerformanceSummary {
    let name = member.name.as_str();
    let position = member.primary();

    let mut seen = FxHashSet::default();
    let appearances: Vec<&ParticipantRow> = archive
        .participants
        .iter()
        .filter(|p| p.player_name == name && seen.insert(p.activity_id.as_str()))
        .collect();

    let mut performances: Vec<MatchPerformance> = appearances
        .iter()
        .map(|p| {
            let events: Vec<&MatchEventRow> = archive.events_for(&p.activity_id).collect();
            let goals = events.iter().filter(|e| e.scorer == name).count() as u32;
            let assists = events.iter().filter(|e| e.assister.as_deref() == Some(name)).count() as u32;
            let rating = match_rating(p.status == STATUS_STARTER, goals, assists, position);
            MatchPerformance {
                activity_id: p.activity_id.clone(),
                status: p.status.clone(),
                rating,
                goals,
                assists,
                mvp: rating >= MVP_THRESHOLD,
            }
        })
        .collect();

    let rated = performances.len() as u32;
    let total: f64 = performances.iter().map(|p| p.rating).sum();
    let mvp_count = performances.iter().filter(|p| p.mvp).count() as u32;

    performances.sort_by(|a, b| cmp_activity_id_desc(&a.activity_id, &b.activity_id));
    performances.truncate(RECENT_PERFORMANCES);

    PerformanceSummary {
        rated_matches: rated,
        mvp_count,
        average_rating: if rated > 0 { round1(total / rated as f64) } else { 0.0 },
        recent: performances,
    }
}

// Parsed position: 中后卫 and CB share a multiplier.
fn position_multiplier(position: Option<Position>) -> f64 {
    match position {
        Some(Position::ST | Position::CAM | Position::LW | Position::RW) => 1.3,
        Some(Position::CB | Position::LB | Position::RB) => 1.1,
        Some(Position::GK) => 1.2,
        _ => 1.0,
    }
}

fn age_multiplier(age: u32) -> f64 {
    match age {
        0..=24 => 1.4,
        25..=29 => 1.2,
        30..=34 => 0.9,
        _ => 0.6,
    }
}

fn level_multiplier(level: Option<&str>) -> f64 {
    match level.map(str::trim) {
        Some("职业") => 1.5,
        Some("极高") => 1.3,
        Some("高") => 1.1,
        Some("中") => 1.0,
        Some("低") => 0.8,
        _ => 1.0,
    }
}

/// Deterministic estimate: ability × 8000 scaled by position, age and
/// level, rounded and capped at 1,000,000.
pub fn estimate_market_value(member: &MemberRow) -> u32 {
    let ability = member.ability.unwrap_or(DEFAULT_ABILITY) as f64;
    let age = member.age.unwrap_or(DEFAULT_AGE);

    let value = ability
        * VALUE_PER_ABILITY_POINT
        * position_multiplier(member.primary())
        * age_multiplier(age)
        * level_multiplier(member.level.as_deref());

    value.round().min(MARKET_VALUE_CAP) as u32
}

/// Stored value when present, the estimate otherwise.
pub fn market_value(member: &MemberRow) -> f64 {
    member.stored_value.unwrap_or_else(|| estimate_market_value(member) as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePlayerProfile {
    #[serde(flatten)]
    pub member: MemberRow,
    pub total_matches: u32,
    pub total_goals: u32,
    pub total_assists: u32,
    pub mvp_count: u32,
    pub average_rating: f64,
    pub market_value: f64,
    pub recent_performances: Vec<MatchPerformance>,
}

pub fn archive_player_profile(archive: &Archive, name: &str) -> Result<ArchivePlayerProfile> {
    let member = archive.member(name).ok_or_else(|| ClubError::not_found("player", name))?;
    let stats = player_match_stats(archive, name);
    let performance = performance_ratings(archive, member);

    Ok(ArchivePlayerProfile {
        member: member.clone(),
        total_matches: stats.total_matches,
        total_goals: stats.total_goals,
        total_assists: stats.total_assists,
        mvp_count: performance.mvp_count,
        average_rating: performance.average_rating,
        market_value: market_value(member),
        recent_performances: performance.recent,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventRole {
    #[serde(rename = "进球者")]
    Scorer,
    #[serde(rename = "助攻者")]
    Assister,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEvent {
    pub role: EventRole,
    pub activity_id: String,
    pub date: String,
    pub minute: u32,
    pub scorer: String,
    pub assister: Option<String>,
    pub opponent: String,
    pub group: Option<String>,
    pub participation_status: String,
    /// 有助攻 / 单独破门 for goals, 传球助攻 for assists
    pub assist_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEventSummary {
    pub date: String,
    pub opponent: String,
    pub group: Option<String>,
    pub participation_status: String,
    pub goals: u32,
    pub assists: u32,
    pub events: Vec<PlayerEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEvents {
    pub player_name: String,
    pub total_events: u32,
    pub goals: u32,
    pub assists: u32,
    pub events: Vec<PlayerEvent>,
    pub match_summary: Vec<MatchEventSummary>,
}

pub(crate) const UNKNOWN_OPPONENT: &str = "未知对手";
const UNKNOWN_STATUS: &str = "未知";

fn player_event(archive: &Archive, name: &str, row: &MatchEventRow, role: EventRole) -> PlayerEvent {
    let activity = archive.activity(&row.activity_id);
    let status = archive
        .participants_for(&row.activity_id)
        .find(|p| p.player_name == name)
        .map(|p| p.status.clone())
        .unwrap_or_else(|| UNKNOWN_STATUS.to_string());

    let assist_type = match role {
        EventRole::Scorer if row.assister.is_some() => "有助攻",
        EventRole::Scorer => "单独破门",
        EventRole::Assister => "传球助攻",
    };

    PlayerEvent {
        role,
        activity_id: row.activity_id.clone(),
        date: row.date.clone(),
        minute: row.minute,
        scorer: row.scorer.clone(),
        assister: row.assister.clone(),
        opponent: activity
            .and_then(|a| a.opponent.clone())
            .unwrap_or_else(|| UNKNOWN_OPPONENT.to_string()),
        group: activity.and_then(|a| a.group.clone()).or_else(|| row.group.clone()),
        participation_status: status,
        assist_type: assist_type.to_string(),
    }
}

fn parse_event_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y/%m/%d"))
        .ok()
}

/// Newest first; unparsable dates go last.
pub(crate) fn cmp_date_desc(a: &str, b: &str) -> Ordering {
    match (parse_event_date(a), parse_event_date(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn player_events(archive: &Archive, name: &str) -> PlayerEvents {
    let goals: Vec<PlayerEvent> = archive
        .events
        .iter()
        .filter(|e| e.scorer == name)
        .map(|e| player_event(archive, name, e, EventRole::Scorer))
        .collect();
    let assists: Vec<PlayerEvent> = archive
        .events
        .iter()
        .filter(|e| e.assister.as_deref() == Some(name))
        .map(|e| player_event(archive, name, e, EventRole::Assister))
        .collect();

    let (goal_count, assist_count) = (goals.len() as u32, assists.len() as u32);
    let mut events: Vec<PlayerEvent> = goals.into_iter().chain(assists).collect();
    events.sort_by(|a, b| cmp_date_desc(&a.date, &b.date));

    let mut summary: Vec<MatchEventSummary> = Vec::new();
    for event in &events {
        let existing = summary
            .iter_mut()
            .find(|s| s.date == event.date && s.opponent == event.opponent);
        let entry = match existing {
            Some(entry) => entry,
            None => {
                summary.push(MatchEventSummary {
                    date: event.date.clone(),
                    opponent: event.opponent.clone(),
                    group: event.group.clone(),
                    participation_status: event.participation_status.clone(),
                    goals: 0,
                    assists: 0,
                    events: Vec::new(),
                });
                let last = summary.len() - 1;
                &mut summary[last]
            }
        };
        match event.role {
            EventRole::Scorer => entry.goals += 1,
            EventRole::Assister => entry.assists += 1,
        }
        entry.events.push(event.clone());
    }

    PlayerEvents {
        player_name: name.to_string(),
        total_events: events.len() as u32,
        goals: goal_count,
        assists: assist_count,
        events,
        match_summary: summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::archive::fixtures;

    #[test]
    fn test_match_and_training_stats() {
        let archive = fixtures::archive();

        let stats = player_match_stats(&archive, "张三");
        assert_eq!(stats.total_matches, 2);
        assert_eq!(stats.starter_matches, 2);
        assert_eq!(stats.total_goals, 2);
        assert_eq!(stats.total_assists, 2);
        assert_eq!(stats.competitive_matches, 2);

        let li = player_match_stats(&archive, "李四");
        assert_eq!(li.substitute_matches, 1);

        let training = player_training_stats(&archive, "张三");
        assert_eq!(training.total_registrations, 3);
        assert_eq!(training.total_attendance, 2);
        assert_eq!(training.attendance_rate, 67);
        assert_eq!(training.team_trainings, 2);
        assert_eq!(training.attended_team_trainings, 1);
        assert_eq!(training.attended_skirmish_matches, 1);

        let nobody = player_training_stats(&archive, "无名");
        assert_eq!(nobody.attendance_rate, 0);
    }

    #[test]
    fn test_match_rating_rules() {
        assert_eq!(match_rating(true, 0, 0, None), 7.0);
        assert_eq!(match_rating(false, 0, 1, Some(Position::CB)), 6.5);
        // attacker: 7 + 2 + 0.5 + 1.0 bonus
        assert_eq!(match_rating(true, 2, 1, Some(Position::ST)), 10.0);
        // midfielder: 7 + 1 + 1.0 + 1.0 bonus
        assert_eq!(match_rating(true, 1, 2, Some(Position::CM)), 10.0);
        assert_eq!(match_rating(true, 5, 0, None), 10.0);
    }

    #[test]
    fn test_performance_ratings() {
        let archive = fixtures::archive();
        let member = archive.member("张三").unwrap();
        let summary = performance_ratings(&archive, member);

        // activity 1: 2 goals, 1 assist as ST starter → 7 + 2 + 0.5 + 1 = 10.5 → 10
        // activity 2: 0 goals, 1 assist as starter → 7.5
        assert_eq!(summary.rated_matches, 2);
        assert_eq!(summary.mvp_count, 1);
        assert_eq!(summary.average_rating, 8.8);
        assert_eq!(summary.recent[0].activity_id, "2");
        assert_eq!(summary.recent[1].rating, 10.0);
    }

    #[test]
    fn test_market_value() {
        let archive = fixtures::archive();
        // 85 × 8000 × 1.3 × 1.4 × 1.1 exceeds the cap
        assert_eq!(estimate_market_value(archive.member("张三").unwrap()), 1_000_000);
        // 80 × 8000 × 1.0 × 0.9 × 1.0
        assert_eq!(estimate_market_value(archive.member("李四").unwrap()), 576_000);
        // 74 × 8000 × 1.1 × 0.6 × 0.8
        assert_eq!(estimate_market_value(archive.member("孙八").unwrap()), 312_576);
        assert_eq!(market_value(archive.member("周九").unwrap()), 300_000.0);
    }

    #[test]
    fn test_position_labels_count_like_codes() {
        let archive = fixtures::archive();
        let mut labelled = archive.member("孙八").unwrap().clone();
        labelled.primary_position = Some("中后卫".to_string());
        assert_eq!(estimate_market_value(&labelled), 312_576);

        let striker = Position::parse("前锋");
        assert_eq!(match_rating(true, 1, 0, striker), match_rating(true, 1, 0, Some(Position::ST)));
        assert_eq!(match_rating(true, 1, 0, striker), 8.5);
    }

    #[test]
    fn test_archive_profile_not_found() {
        let archive = fixtures::archive();
        let err = archive_player_profile(&archive, "无名").unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        let profile = archive_player_profile(&archive, "张三").unwrap();
        assert_eq!(profile.total_goals, 2);
        assert_eq!(profile.market_value, 1_000_000.0);
    }

    #[test]
    fn test_player_events() {
        let archive = fixtures::archive();
        let events = player_events(&archive, "张三");

        assert_eq!(events.goals, 2);
        assert_eq!(events.assists, 2);
        assert_eq!(events.total_events, 4);
        assert_eq!(events.events[0].date, "2025-03-08");
        assert_eq!(events.events[0].role, EventRole::Assister);
        assert_eq!(events.events[0].opponent, "闪电队");

        let solo = events.events.iter().find(|e| e.minute == 40).unwrap();
        assert_eq!(solo.assist_type, "单独破门");
        assert_eq!(solo.participation_status, "首发");

        assert_eq!(events.match_summary.len(), 2);
        assert_eq!(events.match_summary[1].goals, 2);
        assert_eq!(events.match_summary[1].assists, 1);
    }
}
