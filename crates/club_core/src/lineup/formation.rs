//! Formation templates and slot assignment
//!
//! Coordinates are pitch percentages (0-100) where:
//! - X: 0 = left touchline, 100 = right touchline
//! - Y: 0 = opponent goal line, 100 = own goal line

use super::squad::PlayerDetails;
use crate::models::Position;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormationSlot {
    pub position: Position,
    pub x: f64,
    pub y: f64,
    /// Positions preferred for this slot, best first
    pub priority: &'static [Position],
}

const fn slot(position: Position, x: f64, y: f64, priority: &'static [Position]) -> FormationSlot {
    FormationSlot { position, x, y, priority }
}

use Position::*;

const GOALKEEPER: FormationSlot = slot(GK, 50.0, 92.0, &[GK]);

/// 7-a-side
const SLOTS_1_2_2_1_1: &[FormationSlot] = &[
    GOALKEEPER,
    // Defense
    slot(LB, 30.0, 75.0, &[LB, CB, LM]),
    slot(RB, 70.0, 75.0, &[RB, CB, RM]),
    // Midfield
    slot(LM, 30.0, 50.0, &[LM, CM, LW]),
    slot(RM, 70.0, 50.0, &[RM, CM, RW]),
    slot(CM, 50.0, 40.0, &[CM, CAM, CDM]),
    // Attack
    slot(ST, 50.0, 15.0, &[ST, CAM]),
];

/// 8-a-side
const SLOTS_1_2_3_1_1: &[FormationSlot] = &[
    GOALKEEPER,
    // Defense
    slot(LB, 25.0, 75.0, &[LB, CB, LM]),
    slot(RB, 75.0, 75.0, &[RB, CB, RM]),
    // Midfield
    slot(LM, 20.0, 50.0, &[LM, CM, LW]),
    slot(CM, 50.0, 50.0, &[CM, CDM, CAM]),
    slot(RM, 80.0, 50.0, &[RM, CM, RW]),
    slot(CAM, 50.0, 30.0, &[CAM, CM, ST]),
    // Attack
    slot(ST, 50.0, 15.0, &[ST, CAM]),
];

/// 9-a-side
const SLOTS_1_3_3_1_1: &[FormationSlot] = &[
    GOALKEEPER,
    // Defense
    slot(LB, 20.0, 75.0, &[LB, CB, LM]),
    slot(CB, 50.0, 75.0, &[CB, CDM]),
    slot(RB, 80.0, 75.0, &[RB, CB, RM]),
    // Midfield
    slot(LM, 25.0, 50.0, &[LM, CM, LW]),
    slot(CM, 50.0, 50.0, &[CM, CDM, CAM]),
    slot(RM, 75.0, 50.0, &[RM, CM, RW]),
    slot(CAM, 50.0, 30.0, &[CAM, CM, ST]),
    // Attack
    slot(ST, 50.0, 15.0, &[ST, CAM]),
];

/// 10-a-side
const SLOTS_1_3_4_1_1: &[FormationSlot] = &[
    GOALKEEPER,
    // Defense
    slot(LB, 20.0, 75.0, &[LB, CB, LM]),
    slot(CB, 50.0, 75.0, &[CB, CDM]),
    slot(RB, 80.0, 75.0, &[RB, CB, RM]),
    // Midfield (4)
    slot(LM, 20.0, 50.0, &[LM, CM, LW]),
    slot(CDM, 40.0, 55.0, &[CDM, CM, CB]),
    slot(CAM, 60.0, 45.0, &[CAM, CM, ST]),
    slot(RM, 80.0, 50.0, &[RM, CM, RW]),
    // Attack
    slot(LW, 35.0, 25.0, &[LW, ST, LM]),
    slot(ST, 50.0, 15.0, &[ST, CAM]),
];

/// 11-a-side and any other squad size
const SLOTS_1_4_3_2_1: &[FormationSlot] = &[
    GOALKEEPER,
    // Defense (4)
    slot(LB, 15.0, 75.0, &[LB, LM, LW]),
    slot(CB, 35.0, 75.0, &[CB, CDM]),
    slot(CB, 65.0, 75.0, &[CB, CDM]),
    slot(RB, 85.0, 75.0, &[RB, RM, RW]),
    // Midfield (3)
    slot(LM, 25.0, 50.0, &[LM, CM, LW]),
    slot(CM, 50.0, 50.0, &[CM, CDM, CAM]),
    slot(RM, 75.0, 50.0, &[RM, CM, RW]),
    // Attack
    slot(LF, 40.0, 25.0, &[LW, ST, CAM]),
    slot(RF, 60.0, 25.0, &[RW, ST, CAM]),
    slot(ST, 50.0, 8.0, &[ST, CAM]),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormationTemplate {
    pub name: &'static str,
    /// Goalkeeper slot first
    pub slots: &'static [FormationSlot],
}

impl FormationTemplate {
    pub fn for_count(players: usize) -> Self {
        match players {
            7 => FormationTemplate { name: "1-2-2-1-1", slots: SLOTS_1_2_2_1_1 },
            8 => FormationTemplate { name: "1-2-3-1-1", slots: SLOTS_1_2_3_1_1 },
            9 => FormationTemplate { name: "1-3-3-1-1", slots: SLOTS_1_3_3_1_1 },
            10 => FormationTemplate { name: "1-3-4-1-1", slots: SLOTS_1_3_4_1_1 },
            _ => FormationTemplate { name: "1-4-3-2-1", slots: SLOTS_1_4_3_2_1 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedPlayer {
    #[serde(flatten)]
    pub details: PlayerDetails,
    pub formation_position: Position,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub formation: String,
    pub players: Vec<AssignedPlayer>,
}

impl Lineup {
    pub fn player(&self, name: &str) -> Option<&AssignedPlayer> {
        self.players.iter().find(|p| p.name() == name)
    }
}

impl AssignedPlayer {
    pub fn name(&self) -> &str {
        &self.details.name
    }

    fn place(details: PlayerDetails, slot: &FormationSlot) -> Self {
        AssignedPlayer { details, formation_position: slot.position, x: slot.x, y: slot.y }
    }
}

/// Fit score of `player` for `slot`; higher is better.
pub fn slot_score(slot: &FormationSlot, player: &PlayerDetails) -> f64 {
    let mut score = 0.0;
    let in_priority = |p: Option<Position>| p.is_some_and(|p| slot.priority.contains(&p));
    let compatible = |p: Option<Position>| {
        p.is_some_and(|p| slot.position.compatible_with().contains(&p))
    };

    if in_priority(player.primary) {
        score += 100.0;
    }
    if in_priority(player.secondary) {
        score += 50.0;
    }
    if compatible(player.primary) {
        score += 20.0;
    }
    if compatible(player.secondary) {
        score += 10.0;
    }
    score + player.rating as f64 / 10.0
}

const STAND_IN_KEEPER_POSITIONS: [Position; 4] = [CB, CDM, LB, RB];

fn pick_goalkeeper(available: &[PlayerDetails]) -> Option<usize> {
    let mut keepers: Vec<usize> = (0..available.len()).filter(|&i| available[i].is_goalkeeper).collect();

    if !keepers.is_empty() {
        keepers.sort_by(|&a, &b| available[b].rating.cmp(&available[a].rating));
        return keepers
            .iter()
            .copied()
            .find(|&i| available[i].specialist_keeper)
            .or_else(|| keepers.first().copied());
    }

    warn!("no goalkeeper in the starting lineup, picking a stand-in");
    let mut stand_in: Option<usize> = None;
    for (i, p) in available.iter().enumerate() {
        let defensive = p.primary.is_some_and(|pos| STAND_IN_KEEPER_POSITIONS.contains(&pos));
        if defensive && stand_in.map_or(true, |s| p.rating < available[s].rating) {
            stand_in = Some(i);
        }
    }
    stand_in.or(if available.is_empty() { None } else { Some(0) })
}

/// Place starters into the template for their count. The keeper slot is
/// filled first, then each further slot takes the best-scoring free
/// player. Players beyond the template's slots are left out.
pub fn assign_lineup(starters: &[PlayerDetails]) -> Lineup {
    let template = FormationTemplate::for_count(starters.len());
    let mut available: Vec<PlayerDetails> = starters.to_vec();
    let mut players = Vec::with_capacity(template.slots.len());

    if let Some(i) = pick_goalkeeper(&available) {
        let mut keeper = available.remove(i);
        keeper.is_goalkeeper = true;
        debug!(name = %keeper.name, rating = keeper.rating, "goalkeeper selected");
        players.push(AssignedPlayer::place(keeper, &template.slots[0]));
    }

    for slot in template.slots.iter().skip(1) {
        if available.is_empty() {
            break;
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in available.iter().enumerate() {
            let score = slot_score(slot, p);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        if let Some((i, _)) = best {
            players.push(AssignedPlayer::place(available.remove(i), slot));
        }
    }

    if !available.is_empty() {
        debug!(left_out = available.len(), "more starters than formation slots");
    }

    Lineup { formation: template.name.to_string(), players }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str, primary: Position, secondary: Option<Position>, rating: u32) -> PlayerDetails {
        PlayerDetails {
            name: name.to_string(),
            primary: Some(primary),
            secondary,
            is_goalkeeper: primary == GK,
            specialist_keeper: false,
            rating,
            number: "0".to_string(),
        }
    }

    #[test]
    fn test_templates_by_count() {
        for (count, name) in [
            (7, "1-2-2-1-1"),
            (8, "1-2-3-1-1"),
            (9, "1-3-3-1-1"),
            (10, "1-3-4-1-1"),
            (11, "1-4-3-2-1"),
            (5, "1-4-3-2-1"),
        ] {
            let template = FormationTemplate::for_count(count);
            assert_eq!(template.name, name);
            assert_eq!(template.slots[0].position, GK);
        }
        assert_eq!(FormationTemplate::for_count(7).slots.len(), 7);
        assert_eq!(FormationTemplate::for_count(10).slots.len(), 10);
        assert_eq!(FormationTemplate::for_count(11).slots.len(), 11);
    }

    #[test]
    fn test_slot_score() {
        let lb = &SLOTS_1_2_2_1_1[1];
        // primary in priority + compatible + rating
        assert_eq!(slot_score(lb, &details("a", LB, None, 80)), 128.0);
        // secondary in priority (CB) + compatible secondary
        assert_eq!(slot_score(lb, &details("b", ST, Some(CB), 70)), 67.0);
    }

    #[test]
    fn test_assign_seven() {
        let starters = vec![
            details("前锋", ST, None, 80),
            details("左卫", LB, None, 70),
            details("右卫", RB, None, 70),
            details("左中", LM, None, 70),
            details("右中", RM, None, 70),
            details("中场", CM, None, 70),
            details("门将", GK, None, 60),
        ];
        let lineup = assign_lineup(&starters);
        assert_eq!(lineup.formation, "1-2-2-1-1");
        assert_eq!(lineup.players.len(), 7);
        assert_eq!(lineup.players[0].name(), "门将");
        assert_eq!(lineup.player("左卫").map(|p| p.formation_position), Some(LB));
        assert_eq!(lineup.player("前锋").map(|p| (p.x, p.y)), Some((50.0, 15.0)));
    }

    #[test]
    fn test_stand_in_keeper_is_weakest_defender() {
        let starters = vec![
            details("甲", ST, None, 80),
            details("乙", CB, None, 78),
            details("丙", CDM, None, 65),
            details("丁", RB, None, 70),
        ];
        let lineup = assign_lineup(&starters);
        assert_eq!(lineup.players[0].name(), "丙");
        assert!(lineup.players[0].details.is_goalkeeper);
        assert_eq!(lineup.players.len(), 4);
    }

    #[test]
    fn test_specialist_keeper_preferred() {
        let mut listed = details("名单门将", GK, None, 70);
        listed.specialist_keeper = true;
        let starters = vec![details("后备门将", GK, None, 75), listed, details("甲", ST, None, 80)];
        let lineup = assign_lineup(&starters);
        assert_eq!(lineup.players[0].name(), "名单门将");
    }

    #[test]
    fn test_empty_and_oversized_lineups() {
        assert!(assign_lineup(&[]).players.is_empty());

        let starters: Vec<PlayerDetails> =
            (0..13).map(|i| details(&format!("p{i}"), CM, None, 70)).collect();
        let lineup = assign_lineup(&starters);
        assert_eq!(lineup.players.len(), 11);
        // first player stands in as keeper when no defender exists
        assert_eq!(lineup.players[0].name(), "p0");
    }
}
