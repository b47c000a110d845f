//! Assist partnerships of one player.

use crate::data::Archive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cooperation {
    pub partner_name: String,
    /// Goals this player scored from the partner's assist
    pub assists_to_me: u32,
    /// Goals the partner scored from this player's assist
    pub assists_from_me: u32,
    pub total_cooperations: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooperationNetwork {
    pub player_name: String,
    pub network_size: u32,
    pub cooperations: Vec<Cooperation>,
}

fn partner<'a>(list: &'a mut Vec<Cooperation>, name: &str) -> &'a mut Cooperation {
    let i = match list.iter().position(|c| c.partner_name == name) {
        Some(i) => i,
        None => {
            list.push(Cooperation {
                partner_name: name.to_string(),
                assists_to_me: 0,
                assists_from_me: 0,
                total_cooperations: 0,
            });
            list.len() - 1
        }
    };
    &mut list[i]
}

/// Partners ordered by total cooperations, ties in first-seen order.
pub fn cooperation_network(archive: &Archive, name: &str) -> CooperationNetwork {
    let mut cooperations: Vec<Cooperation> = Vec::new();

    for event in archive.events.iter().filter(|e| e.scorer == name) {
        if let Some(assister) = event.assister.as_deref().filter(|a| *a != name) {
            partner(&mut cooperations, assister).assists_to_me += 1;
        }
    }
    for event in archive.events.iter().filter(|e| e.assister.as_deref() == Some(name)) {
        if !event.scorer.is_empty() && event.scorer != name {
            partner(&mut cooperations, &event.scorer).assists_from_me += 1;
        }
    }

    for c in cooperations.iter_mut() {
        c.total_cooperations = c.assists_to_me + c.assists_from_me;
    }
    cooperations.sort_by(|a, b| b.total_cooperations.cmp(&a.total_cooperations));

    CooperationNetwork {
        player_name: name.to_string(),
        network_size: cooperations.len() as u32,
        cooperations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::archive::fixtures;

    #[test]
    fn test_cooperation_network() {
        let archive = fixtures::archive();
        let network = cooperation_network(&archive, "张三");

        assert_eq!(network.network_size, 2);
        // 李四: assisted 张三 once, scored from 张三 once
        assert_eq!(network.cooperations[0].partner_name, "李四");
        assert_eq!(network.cooperations[0].assists_to_me, 1);
        assert_eq!(network.cooperations[0].assists_from_me, 1);
        assert_eq!(network.cooperations[0].total_cooperations, 2);
        assert_eq!(network.cooperations[1].partner_name, "钱七");
        assert_eq!(network.cooperations[1].total_cooperations, 1);
    }

    #[test]
    fn test_unknown_player_has_empty_network() {
        let archive = fixtures::archive();
        let network = cooperation_network(&archive, "无名");
        assert_eq!(network.network_size, 0);
        assert!(network.cooperations.is_empty());
    }
}
