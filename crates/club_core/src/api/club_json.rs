//! JSON endpoints for the site views and the archive views.

use super::{ApiError, ApiResponse};
use crate::adapter::ClubView;
use crate::config::ClubConfig;
use crate::data::Archive;
use crate::error::{ClubError, Result};
use crate::lineup::{match_lineup, squad_board};
use crate::models::Match;
use crate::player::{build_profile, list_players, player_radar, AttributeCatalog, RosterQuery};
use crate::stats::{
    archive_matches, archive_player_profile, build_leaderboard, cooperation_network, home_summary,
    match_listing, player_events, player_stats, scorer_summary, Board, MatchFilter, ScorerLine,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

fn respond<T: Serialize>(result: Result<T>) -> String {
    if let Err(e) = &result {
        debug!(code = e.code(), error = %e, "request failed");
    }
    ApiResponse::from(result).to_json()
}

fn player_in<'a>(view: &'a ClubView, id: &str) -> Result<&'a crate::models::Player> {
    view.player(id).ok_or_else(|| ClubError::not_found("player", id))
}

pub fn home_json(view: &ClubView, config: &ClubConfig) -> String {
    respond(Ok(home_summary(view, config)))
}

pub fn players_json(view: &ClubView, query: &RosterQuery, config: &ClubConfig) -> String {
    respond(Ok(list_players(&view.players, query, config)))
}

/// Profile page of one roster player, by id.
pub fn player_json(view: &ClubView, id: &str, config: &ClubConfig) -> String {
    respond(player_in(view, id).map(|p| build_profile(p, config)))
}

pub fn player_radar_json(view: &ClubView, id: &str) -> String {
    respond(player_in(view, id).map(player_radar))
}

pub fn matches_json(view: &ClubView, filter: MatchFilter) -> String {
    respond(Ok(match_listing(view, filter)))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetail {
    #[serde(rename = "match")]
    pub record: Match,
    pub scorers: Vec<ScorerLine>,
}

pub fn match_json(view: &ClubView, id: &str) -> String {
    let detail = view
        .match_by_id(id)
        .ok_or_else(|| ClubError::not_found("match", id))
        .map(|m| MatchDetail { scorers: scorer_summary(m), record: m.clone() });
    respond(detail)
}

/// `board` is one of `goals`, `assists`, `value`.
pub fn leaderboard_json(view: &ClubView, board: &str, config: &ClubConfig) -> String {
    respond(board.parse::<Board>().map(|b| build_leaderboard(view, b, config)))
}

pub fn player_stats_json(archive: &Archive, name: &str) -> String {
    respond(Ok(player_stats(archive, name)))
}

pub fn player_profile_json(archive: &Archive, name: &str) -> String {
    respond(archive_player_profile(archive, name))
}

pub fn player_events_json(archive: &Archive, name: &str) -> String {
    respond(Ok(player_events(archive, name)))
}

pub fn player_network_json(archive: &Archive, name: &str) -> String {
    respond(Ok(cooperation_network(archive, name)))
}

pub fn archive_matches_json(archive: &Archive) -> String {
    respond(Ok(archive_matches(archive)))
}

pub fn match_lineup_json(archive: &Archive, activity_id: &str) -> String {
    respond(match_lineup(archive, activity_id))
}

pub fn squad_board_json(view: &ClubView, config: &ClubConfig) -> String {
    respond(Ok(squad_board(&view.players, config)))
}

/// Attribute description request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDescriptionRequest {
    pub attribute: Option<String>,
    pub score: Option<f64>,
}

/// Takes a JSON request body `{"attribute": "传球", "score": 75}`.
pub fn attribute_description_json(request_json: &str, catalog: &AttributeCatalog) -> String {
    let request: AttributeDescriptionRequest = match serde_json::from_str(request_json) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to parse AttributeDescriptionRequest: {}", e);
            return ApiResponse::<()>::failure(ApiError::invalid_json(&e)).to_json();
        }
    };

    match (request.attribute.as_deref().map(str::trim), request.score) {
        (Some(attribute), Some(score)) if !attribute.is_empty() => {
            respond(catalog.describe(attribute, score))
        }
        _ => respond::<()>(Err(ClubError::InvalidRequest(
            "attribute and score are required".to_string(),
        ))),
    }
}
