//! Raw cloud documents → display records.

use crate::config::ClubConfig;
use crate::data::ClubSnapshot;
use crate::models::{
    Goal, Match, MatchEvents, MatchKind, Outcome, Participants, Player, PlayerGroup, RatingMeta,
    RawEvent, RawGoal, RawGoalRecord, RawTeammateEvaluation, RawUser, SkillRatings,
    SnapshotMetadata, TeammateEvaluation,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

const META_KEY: &str = "_meta";

/// Every display record derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubView {
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub metadata: Option<SnapshotMetadata>,
}

impl ClubView {
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn match_by_id(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Name → jersey number, first roster entry wins.
    pub fn numbers_by_name(&self) -> FxHashMap<&str, u32> {
        let mut numbers =
            FxHashMap::with_capacity_and_hasher(self.players.len(), Default::default());
        for player in &self.players {
            numbers.entry(player.name.as_str()).or_insert(player.number);
        }
        numbers
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn numeric_scores(raw: &BTreeMap<String, Value>) -> BTreeMap<String, f64> {
    raw.iter()
        .filter(|(key, _)| key.as_str() != META_KEY)
        .filter_map(|(key, value)| value_as_f64(value).map(|score| (key.clone(), score)))
        .collect()
}

fn skill_ratings(raw: Option<&BTreeMap<String, Value>>) -> SkillRatings {
    let Some(raw) = raw else {
        return SkillRatings::default();
    };

    let meta = raw.get(META_KEY).and_then(|value| {
        serde_json::from_value::<RatingMeta>(value.clone())
            .map_err(|e| debug!(error = %e, "ignoring malformed rating meta"))
            .ok()
    });

    SkillRatings { meta, scores: numeric_scores(raw) }
}

fn teammate_evaluation(raw: &RawTeammateEvaluation) -> TeammateEvaluation {
    TeammateEvaluation {
        text: raw.tag.text.clone(),
        icon: raw.tag.icon.clone(),
        category: raw.tag.category.clone(),
        description: raw.tag.description.clone(),
        count: raw.count.unwrap_or(0),
        evaluators: raw.evaluators.iter().map(|e| e.name.clone()).collect(),
    }
}

pub fn transform_user(user: &RawUser, config: &ClubConfig) -> Player {
    let number = user.current_jersey_number.unwrap_or(0);
    let defaults = &config.roster_defaults;

    let name = non_empty(user.real_name.as_deref())
        .or_else(|| non_empty(user.nickname.as_deref()))
        .unwrap_or(config.unknown_name.as_str())
        .to_string();

    let avatar_url = config
        .photo_for(number)
        .filter(|_| number > 0)
        .or_else(|| non_empty(user.avatar_url.as_deref()))
        .unwrap_or("")
        .to_string();

    Player {
        id: user.id.clone(),
        name,
        number,
        positions: user.positions.clone().unwrap_or_default(),
        group: PlayerGroup::from_raw(user.group.as_deref()),
        bio: user.bio.clone().unwrap_or_default(),
        value: user.player_value.unwrap_or(0.0),
        avatar_url,
        preferred_foot: non_empty(user.preferred_foot.as_deref())
            .unwrap_or(defaults.preferred_foot.as_str())
            .to_string(),
        height_cm: user.height_cm.filter(|h| *h > 0).unwrap_or(defaults.height_cm as u32),
        weight_kg: user.weight_kg.filter(|w| *w > 0).unwrap_or(defaults.weight_kg as u32),
        teammate_evaluations: user
            .teammate_evaluations
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(teammate_evaluation)
            .collect(),
        skill_ratings: skill_ratings(user.skill_ratings.as_ref()),
        self_skill_ratings: user.self_skill_ratings.as_ref().map(numeric_scores),
    }
}

fn display_goal(goal: &RawGoal, config: &ClubConfig) -> Goal {
    Goal {
        scorer: non_empty(goal.scorer_name.as_deref())
            .unwrap_or(config.unknown_name.as_str())
            .to_string(),
        assister: non_empty(goal.assister_name.as_deref()).map(str::to_string),
        minute: goal.minute.unwrap_or(0),
        is_own_goal: goal.is_own_goal,
    }
}

fn build_match(event: &RawEvent, goals: &[&RawGoal], config: &ClubConfig) -> Match {
    let offset = config.utc_offset();
    let kickoff = event.start_time.as_ref().and_then(|ts| ts.to_utc(offset));
    let date = kickoff
        .map(|dt| dt.with_timezone(&offset).format("%Y/%m/%d").to_string())
        .unwrap_or_default();
    let date_raw = event.start_time.as_ref().map(|ts| ts.raw_text()).unwrap_or_default();

    let our_score = goals.iter().filter(|g| !g.is_own_goal).count() as u32;
    let opponent_score = goals.iter().filter(|g| g.is_own_goal).count() as u32;

    let competitive = event.activity_category.as_deref() == Some("competitive")
        || non_empty(event.competition_id.as_deref()).is_some();
    let kind = if competitive { MatchKind::Competitive } else { MatchKind::Friendly };

    let opponent = non_empty(event.opponent.as_deref())
        .unwrap_or(config.default_opponent.as_str())
        .to_string();
    let venue =
        non_empty(event.location.as_deref()).unwrap_or(config.default_venue.as_str()).to_string();

    Match {
        id: event.id.clone(),
        date,
        date_raw,
        kickoff,
        kind,
        type_label: kind.label().to_string(),
        title: format!("{} {}:{} {}", config.club_name, our_score, opponent_score, opponent),
        opponent,
        our_score,
        opponent_score,
        result: Outcome::from_scores(our_score, opponent_score),
        venue,
        status: "completed".to_string(),
        participants: Participants::default(),
        events: MatchEvents {
            goals: our_score,
            goal_scorers: goals.iter().map(|g| display_goal(g, config)).collect(),
        },
    }
}

pub fn transform_event(
    event: &RawEvent,
    goal_records: &[RawGoalRecord],
    config: &ClubConfig,
) -> Match {
    let goals: Vec<&RawGoal> = goal_records
        .iter()
        .filter(|r| r.event_id == event.id)
        .flat_map(|r| r.goals.iter())
        .collect();
    build_match(event, &goals, config)
}

pub fn build_view(snapshot: &ClubSnapshot, config: &ClubConfig) -> ClubView {
    let players = snapshot.users.iter().map(|u| transform_user(u, config)).collect();

    let mut goals_by_event: FxHashMap<&str, Vec<&RawGoal>> = FxHashMap::default();
    for record in &snapshot.goal_records {
        goals_by_event.entry(record.event_id.as_str()).or_default().extend(record.goals.iter());
    }

    let matches: Vec<Match> = snapshot
        .events
        .iter()
        .map(|event| {
            let goals = goals_by_event.get(event.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            build_match(event, goals, config)
        })
        .collect();

    let view = ClubView { players, matches, metadata: snapshot.metadata.clone() };
    info!(players = view.players.len(), matches = view.matches.len(), "club view built");
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawTimestamp;

    fn config() -> ClubConfig {
        ClubConfig::default()
    }

    fn user(json: &str) -> RawUser {
        serde_json::from_str(json).unwrap()
    }

    fn goal(scorer: &str, assister: Option<&str>, minute: u32, own: bool) -> RawGoal {
        RawGoal {
            scorer_name: Some(scorer.to_string()),
            assister_name: assister.map(str::to_string),
            minute: Some(minute),
            is_own_goal: own,
        }
    }

    #[test]
    fn test_transform_user_defaults() {
        let player = transform_user(
            &user(r#"{"_id": "u1", "real_name": "", "nickname": "", "height_cm": 0}"#),
            &config(),
        );
        assert_eq!(player.name, "未知");
        assert_eq!(player.number, 0);
        assert_eq!(player.group, PlayerGroup::Recreational);
        assert_eq!(player.preferred_foot, "右脚");
        assert_eq!(player.height_cm, 175);
        assert_eq!(player.weight_kg, 70);
        assert_eq!(player.avatar_url, "");
        assert!(player.self_skill_ratings.is_none());
    }

    #[test]
    fn test_transform_user_prefers_real_name_and_photo() {
        let player = transform_user(
            &user(
                r#"{
                    "_id": "u7",
                    "real_name": "王小明",
                    "nickname": "小明",
                    "current_jersey_number": 7,
                    "group": "competitive",
                    "avatar_url": "https://example.com/a.png",
                    "positions": ["前锋"]
                }"#,
            ),
            &config(),
        );
        assert_eq!(player.name, "王小明");
        assert_eq!(player.group, PlayerGroup::Competitive);
        assert_eq!(Some(player.avatar_url.as_str()), config().photo_for(7));
        assert_eq!(player.positions, vec!["前锋".to_string()]);
    }

    #[test]
    fn test_transform_user_falls_back_to_stored_avatar() {
        let player = transform_user(
            &user(r#"{"_id": "u", "nickname": "阿强", "current_jersey_number": 1, "avatar_url": "x.png"}"#),
            &config(),
        );
        assert_eq!(player.name, "阿强");
        assert_eq!(player.avatar_url, "x.png");
    }

    #[test]
    fn test_transform_user_ratings_and_evaluations() {
        let player = transform_user(
            &user(
                r#"{
                    "_id": "u",
                    "skill_ratings": {"pace": 80, "passing": "75", "note": "n/a",
                                      "_meta": {"averageScore": 77.5, "evaluationCount": 4}},
                    "self_skill_ratings": {"pace": 90},
                    "teammate_evaluations": [
                        {"tag": {"text": "铁腰", "icon": "🛡", "category": "defense", "description": "d"},
                         "count": 3,
                         "evaluators": [{"id": "a", "name": "甲"}, {"id": "b", "name": "乙"}]}
                    ]
                }"#,
            ),
            &config(),
        );
        assert_eq!(player.skill_ratings.scores.len(), 2);
        assert_eq!(player.skill_ratings.scores.get("passing"), Some(&75.0));
        assert_eq!(player.skill_ratings.meta.as_ref().and_then(|m| m.average_score), Some(77.5));
        assert_eq!(player.self_skill_ratings.as_ref().and_then(|s| s.get("pace")), Some(&90.0));
        assert_eq!(player.teammate_evaluations[0].evaluators, vec!["甲", "乙"]);
        assert_eq!(player.teammate_evaluations[0].count, 3);
    }

    #[test]
    fn test_transform_event_scores_and_labels() {
        let event = RawEvent {
            id: "e1".to_string(),
            opponent: Some("雷霆".to_string()),
            start_time: Some(RawTimestamp::Text("2025-03-01T18:00:00.000Z".to_string())),
            competition_id: Some("c1".to_string()),
            ..Default::default()
        };
        let records = vec![
            RawGoalRecord {
                id: "g1".to_string(),
                event_id: "e1".to_string(),
                goals: vec![goal("张三", Some("李四"), 10, false), goal("王五", None, 30, true)],
            },
            RawGoalRecord {
                id: "g2".to_string(),
                event_id: "e1".to_string(),
                goals: vec![goal("张三", Some(""), 80, false)],
            },
            RawGoalRecord {
                id: "g3".to_string(),
                event_id: "other".to_string(),
                goals: vec![goal("X", None, 1, false)],
            },
        ];

        let m = transform_event(&event, &records, &config());
        assert_eq!(m.our_score, 2);
        assert_eq!(m.opponent_score, 1);
        assert_eq!(m.result, Outcome::Win);
        assert_eq!(m.kind, MatchKind::Competitive);
        assert_eq!(m.type_label, "竞技赛");
        // 18:00Z is the next day in UTC+8
        assert_eq!(m.date, "2025/03/02");
        assert_eq!(m.title, "蔚来联队 2:1 雷霆");
        assert_eq!(m.venue, "未知场地");
        assert_eq!(m.events.goals, 2);
        assert_eq!(m.events.goal_scorers.len(), 3);
        assert_eq!(m.events.goal_scorers[2].assister, None);
    }

    #[test]
    fn test_transform_event_without_start_time() {
        let event = RawEvent { id: "e2".to_string(), ..Default::default() };
        let m = transform_event(&event, &[], &config());
        assert_eq!(m.date, "");
        assert_eq!(m.date_raw, "");
        assert!(m.kickoff.is_none());
        assert_eq!(m.opponent, "对手");
        assert_eq!(m.kind, MatchKind::Friendly);
        assert_eq!(m.result, Outcome::Draw);
        assert_eq!(m.title, "蔚来联队 0:0 对手");
    }

    #[test]
    fn test_build_view_matches_transform_event() {
        let snapshot = ClubSnapshot {
            users: vec![user(r#"{"_id": "u1", "nickname": "A", "current_jersey_number": 9}"#)],
            events: vec![RawEvent { id: "e1".to_string(), ..Default::default() }],
            goal_records: vec![RawGoalRecord {
                id: "g".to_string(),
                event_id: "e1".to_string(),
                goals: vec![goal("A", None, 5, false)],
            }],
            ..Default::default()
        };
        let view = build_view(&snapshot, &config());
        let direct = transform_event(&snapshot.events[0], &snapshot.goal_records, &config());
        assert_eq!(view.matches[0], direct);
        assert_eq!(view.numbers_by_name().get("A"), Some(&9));
        assert!(view.player("u1").is_some());
    }
}
