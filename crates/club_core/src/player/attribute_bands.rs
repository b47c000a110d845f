//! Score band descriptions per attribute.

use crate::error::{ClubError, Result};
use crate::models::AttributeBandRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text returned when an attribute is known but no band covers the score.
pub const NO_DESCRIPTION: &str = "暂无详细描述";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub min: u32,
    pub max: u32,
    pub description: String,
}

impl ScoreBand {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min as f64 && score <= self.max as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescription {
    pub attribute: String,
    pub score: f64,
    pub description: String,
}

/// Bands grouped by attribute name, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCatalog {
    bands: BTreeMap<String, Vec<ScoreBand>>,
}

impl AttributeCatalog {
    pub fn from_rows(rows: &[AttributeBandRow]) -> Self {
        let mut bands: BTreeMap<String, Vec<ScoreBand>> = BTreeMap::new();
        for row in rows {
            bands.entry(row.attribute.clone()).or_default().push(ScoreBand {
                min: row.min,
                max: row.max,
                description: row.description.clone(),
            });
        }
        Self { bands }
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.bands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// First band containing `score`; inclusive on both ends.
    pub fn describe(&self, attribute: &str, score: f64) -> Result<AttributeDescription> {
        let attribute = attribute.trim();
        let bands = self
            .bands
            .get(attribute)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ClubError::not_found("attribute", attribute))?;

        let description = bands
            .iter()
            .find(|band| band.contains(score))
            .map(|band| band.description.clone())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Ok(AttributeDescription { attribute: attribute.to_string(), score, description })
    }
}
