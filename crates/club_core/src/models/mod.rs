pub mod archive;
pub mod match_record;
pub mod player;
pub mod position;
pub mod raw;

pub use archive::{
    ActivityRow, ActivityType, AttributeBandRow, GoalkeeperRow, MatchEventRow, MemberRow,
    ParticipantRow, Row, TrainingRow,
};
pub use match_record::{Goal, Match, MatchEvents, MatchKind, Outcome, Participants};
pub use player::{Player, PlayerGroup, RatingMeta, SkillRatings, TeammateEvaluation};
pub use position::Position;
pub use raw::{
    RawEvent, RawGoal, RawGoalRecord, RawTeammateEvaluation, RawTimestamp, RawUser,
    SnapshotMetadata,
};
