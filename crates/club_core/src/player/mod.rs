//! Player views
//!
//! - roster listing with search and squad filters
//! - profile page data (tags, rated skills, highlights)
//! - six-axis radar for teammate and self ratings
//! - attribute score band descriptions

pub mod attribute_bands;
pub mod profile;
pub mod radar;
pub mod roster;

pub use attribute_bands::{AttributeCatalog, AttributeDescription, ScoreBand, NO_DESCRIPTION};
pub use profile::{
    build_profile, ranked_skills, skill_label, Highlights, PlayerProfile, RatingBand, SkillScore,
    StrongestSkill, TopTag, SKILL_NAMES,
};
pub use radar::{player_radar, AxisGap, PlayerRadar, Radar, RadarAxis, RadarDiff, RadarKind};
pub use roster::{list_players, Roster, RosterEntry, RosterFilter, RosterQuery};
