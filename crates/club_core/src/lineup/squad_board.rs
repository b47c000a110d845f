//! 4-3-3 squad board: where the photographed players can play.

use crate::config::ClubConfig;
use crate::models::{Player, Position};
use serde::{Deserialize, Serialize};

/// Avatars shown per slot; the rest are reported as overflow.
pub const MAX_SHOWN_PER_SLOT: usize = 5;

const OVERLAP_OFFSET_PX: i32 = -8;

struct BoardSlot {
    key: &'static str,
    label: &'static str,
    accepts: &'static [Position],
}

use Position::*;

const BOARD_SLOTS: [BoardSlot; 11] = [
    // Attack
    BoardSlot { key: "LW", label: "左边锋", accepts: &[LW, LM] },
    BoardSlot { key: "ST", label: "前锋", accepts: &[ST] },
    BoardSlot { key: "RW", label: "右边锋", accepts: &[RW, RM] },
    // Midfield
    BoardSlot { key: "CM1", label: "中前卫", accepts: &[CDM, CM] },
    BoardSlot { key: "CM2", label: "中前卫", accepts: &[CDM, CM] },
    BoardSlot { key: "CM3", label: "前腰", accepts: &[CAM, CM] },
    // Defense
    BoardSlot { key: "LB", label: "左后卫", accepts: &[LB] },
    BoardSlot { key: "CB1", label: "中后卫", accepts: &[CB] },
    BoardSlot { key: "CB2", label: "中后卫", accepts: &[CB] },
    BoardSlot { key: "RB", label: "右后卫", accepts: &[RB] },
    // Goalkeeper
    BoardSlot { key: "GK", label: "门将", accepts: &[GK] },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardAvatar {
    pub id: String,
    pub name: String,
    pub number: u32,
    pub photo_url: String,
    pub opacity: f64,
    pub z_index: u32,
    pub offset_px: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSlotView {
    pub key: String,
    pub label: String,
    pub avatars: Vec<BoardAvatar>,
    /// Eligible players not shown
    pub hidden: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadBoard {
    pub formation: String,
    pub slots: Vec<BoardSlotView>,
}

fn avatar_opacity(index: usize) -> f64 {
    match index {
        0 | 1 => 1.0,
        2 => 0.7,
        3 => 0.5,
        _ => 0.3,
    }
}

fn avatar_offset(index: usize) -> i32 {
    if index < 2 {
        0
    } else {
        index as i32 * OVERLAP_OFFSET_PX
    }
}

pub fn squad_board(players: &[Player], config: &ClubConfig) -> SquadBoard {
    let photographed: Vec<(&Player, &str, Vec<Position>)> = players
        .iter()
        .filter(|p| p.has_number())
        .filter_map(|p| config.photo_for(p.number).map(|photo| (p, photo, p.parsed_positions())))
        .collect();

    let slots = BOARD_SLOTS
        .iter()
        .map(|slot| {
            let eligible: Vec<&(&Player, &str, Vec<Position>)> = photographed
                .iter()
                .filter(|(_, _, positions)| positions.iter().any(|p| slot.accepts.contains(p)))
                .collect();
            let shown = eligible.len().min(MAX_SHOWN_PER_SLOT);

            let avatars = eligible
                .iter()
                .take(shown)
                .enumerate()
                .map(|(i, (player, photo, _))| BoardAvatar {
                    id: player.id.clone(),
                    name: player.name.clone(),
                    number: player.number,
                    photo_url: photo.to_string(),
                    opacity: avatar_opacity(i),
                    z_index: (shown - i) as u32,
                    offset_px: avatar_offset(i),
                })
                .collect();

            BoardSlotView {
                key: slot.key.to_string(),
                label: slot.label.to_string(),
                avatars,
                hidden: eligible.len() - shown,
            }
        })
        .collect();

    SquadBoard { formation: "4-3-3".to_string(), slots }
}
