//! Aggregations over the site view and the legacy archive.

pub mod archive_matches;
pub mod club;
pub mod leaderboard;
pub mod network;
pub mod player_stats;

pub use archive_matches::{
    archive_matches, ArchiveMatchList, ArchiveMatchSummary, GoalLine, ParticipantCounts,
};
pub use club::{
    available_years, filter_matches, home_summary, match_listing, recent_matches, scorer_summary,
    ClubRecord, HomeSummary, MatchFilter, MatchListing, OutcomeTally, ScorerLine,
    SquadPreviewEntry, TopScorer,
};
pub use leaderboard::{
    build_leaderboard, tally_names, Board, BoardValue, Leaderboard, LeaderboardEntry, Medal,
};
pub use network::{cooperation_network, Cooperation, CooperationNetwork};
pub use player_stats::{
    archive_player_profile, estimate_market_value, market_value, match_rating,
    performance_ratings, player_events, player_match_stats, player_stats, player_training_stats,
    ArchivePlayerProfile, EventRole, MatchEventSummary, MatchPerformance, MatchStats,
    PerformanceSummary, PlayerEvent, PlayerEvents, PlayerStatsReport, TrainingStats,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{
        Goal, Match, MatchEvents, MatchKind, Outcome, Participants, Player, PlayerGroup,
        SkillRatings,
    };
    use chrono::{DateTime, Utc};

    pub fn goal(scorer: &str, assister: Option<&str>, minute: u32, own: bool) -> Goal {
        Goal {
            scorer: scorer.to_string(),
            assister: assister.map(str::to_string),
            minute,
            is_own_goal: own,
        }
    }

    fn base_match(id: &str, ours: u32, theirs: u32, goals: Vec<Goal>) -> Match {
        Match {
            id: id.to_string(),
            date: String::new(),
            date_raw: String::new(),
            kickoff: None,
            kind: MatchKind::Competitive,
            type_label: MatchKind::Competitive.label().to_string(),
            opponent: "对手".to_string(),
            our_score: ours,
            opponent_score: theirs,
            result: Outcome::from_scores(ours, theirs),
            venue: String::new(),
            title: format!("蔚来联队 vs 对手 {id}"),
            status: "completed".to_string(),
            participants: Participants::default(),
            events: MatchEvents { goals: ours, goal_scorers: goals },
        }
    }

    /// Undated match whose score follows its goals.
    pub fn match_with_goals(id: &str, goals: Vec<Goal>) -> Match {
        let ours = goals.iter().filter(|g| !g.is_own_goal).count() as u32;
        base_match(id, ours, 0, goals)
    }

    pub fn dated_match(id: &str, rfc3339: &str, ours: u32, theirs: u32) -> Match {
        let kickoff: DateTime<Utc> = DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let mut m = base_match(id, ours, theirs, Vec::new());
        m.kickoff = Some(kickoff);
        m.date = kickoff.format("%Y/%m/%d").to_string();
        m.date_raw = rfc3339.to_string();
        m
    }

    pub fn player(id: &str, name: &str, number: u32, value: f64) -> Player {
        Player {
            id: id.to_string(),
            name: name.to_string(),
            number,
            positions: Vec::new(),
            group: PlayerGroup::Recreational,
            bio: String::new(),
            value,
            avatar_url: String::new(),
            preferred_foot: "右脚".to_string(),
            height_cm: 175,
            weight_kg: 70,
            teammate_evaluations: Vec::new(),
            skill_ratings: SkillRatings::default(),
            self_skill_ratings: None,
        }
    }
}
