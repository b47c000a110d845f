use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pitch position. Parsed from codes (`CB`) or the Chinese labels used in
/// roster documents (`中后卫`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    GK,
    LB,
    CB,
    RB,
    LWB,
    RWB,
    CDM,
    CM,
    CAM,
    LM,
    RM,
    LW,
    RW,
    LF,
    RF,
    CF,
    ST,
}

impl Position {
    pub const ALL: [Position; 17] = [
        Position::GK,
        Position::LB,
        Position::CB,
        Position::RB,
        Position::LWB,
        Position::RWB,
        Position::CDM,
        Position::CM,
        Position::CAM,
        Position::LM,
        Position::RM,
        Position::LW,
        Position::RW,
        Position::LF,
        Position::RF,
        Position::CF,
        Position::ST,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::LB => "LB",
            Position::CB => "CB",
            Position::RB => "RB",
            Position::LWB => "LWB",
            Position::RWB => "RWB",
            Position::CDM => "CDM",
            Position::CM => "CM",
            Position::CAM => "CAM",
            Position::LM => "LM",
            Position::RM => "RM",
            Position::LW => "LW",
            Position::RW => "RW",
            Position::LF => "LF",
            Position::RF => "RF",
            Position::CF => "CF",
            Position::ST => "ST",
        }
    }

    pub fn label_cn(&self) -> &'static str {
        match self {
            Position::GK => "门将",
            Position::LB => "左后卫",
            Position::CB => "中后卫",
            Position::RB => "右后卫",
            Position::LWB => "左翼卫",
            Position::RWB => "右翼卫",
            Position::CDM => "后腰",
            Position::CM => "中前卫",
            Position::CAM => "前腰",
            Position::LM => "左边前卫",
            Position::RM => "右边前卫",
            Position::LW => "左边锋",
            Position::RW => "右边锋",
            Position::LF => "左前锋",
            Position::RF => "右前锋",
            Position::CF => "中锋",
            Position::ST => "前锋",
        }
    }

    /// Lenient parse: trims, accepts codes in any case and Chinese labels.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let upper = trimmed.to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.code() == upper || p.label_cn() == trimmed)
            .or(match trimmed {
                "中场" => Some(Position::CM),
                "守门员" => Some(Position::GK),
                _ => None,
            })
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::GK)
    }

    pub fn is_defender(&self) -> bool {
        matches!(self, Position::LB | Position::CB | Position::RB | Position::LWB | Position::RWB)
    }

    pub fn is_midfielder(&self) -> bool {
        matches!(
            self,
            Position::CDM | Position::CM | Position::CAM | Position::LM | Position::RM
        )
    }

    pub fn is_forward(&self) -> bool {
        matches!(
            self,
            Position::LW | Position::RW | Position::LF | Position::RF | Position::CF | Position::ST
        )
    }

    /// Positions a player listed here can cover in a lineup slot.
    pub fn compatible_with(&self) -> &'static [Position] {
        use Position::*;
        match self {
            CB => &[CDM, CB, LB, RB],
            LB => &[LM, LW, LB, CB],
            RB => &[RM, RW, RB, CB],
            CDM => &[CM, CB, CDM],
            CM => &[CAM, CDM, CM, LM, RM],
            LM => &[LW, CM, LB, LM],
            RM => &[RW, CM, RB, RM],
            CAM => &[CM, ST, LW, RW, CAM],
            LW => &[LM, ST, CAM, LW],
            RW => &[RM, ST, CAM, RW],
            ST => &[CAM, LW, RW, ST],
            LF => &[LW, ST, CAM, LM],
            RF => &[RW, ST, CAM, RM],
            GK | LWB | RWB | CF => &[],
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s).ok_or_else(|| format!("unknown position: {s}"))
    }
}
