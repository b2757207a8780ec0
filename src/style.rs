//! Build configuration for the graph and node attribute blocks.

use crate::palette::default_palette;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Invalid style file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RankDir {
    #[serde(alias = "tb")]
    TB,
    #[default]
    #[serde(alias = "lr")]
    LR,
    #[serde(alias = "bt")]
    BT,
    #[serde(alias = "rl")]
    RL,
}

impl RankDir {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TB" => Some(Self::TB),
            "LR" => Some(Self::LR),
            "BT" => Some(Self::BT),
            "RL" => Some(Self::RL),
            _ => None,
        }
    }
}

impl fmt::Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TB => "TB",
            Self::LR => "LR",
            Self::BT => "BT",
            Self::RL => "RL",
        };
        f.write_str(s)
    }
}

/// Attributes written into the `graph [...]` and `node [...]` blocks, plus
/// the edge palette.
///
/// Every field is optional in a style file; missing ones take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub font_color: String,
    pub font_size: f64,
    /// Graph label; empty means no watermark.
    pub watermark_label: String,
    pub node_separation: f64,
    pub rank_direction: RankDir,
    pub rank_separation: f64,
    pub node_font_size: f64,
    /// Escape sequences such as `\N` are kept; bare quotes get escaped.
    pub node_label_expression: String,
    pub node_shape: String,
    pub palette: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_color: "gray66".to_string(),
            font_size: 18.0,
            watermark_label: String::new(),
            node_separation: 0.5,
            rank_direction: RankDir::LR,
            rank_separation: 10.0,
            node_font_size: 12.0,
            node_label_expression: "\\N".to_string(),
            node_shape: "plaintext".to_string(),
            palette: default_palette(),
        }
    }
}

impl StyleConfig {
    pub fn from_toml(input: &str) -> Result<Self, StyleError> {
        let style: Self = toml::from_str(input)?;
        style.validate()?;
        Ok(style)
    }

    /// Numeric attributes are written as bare DOT IDs, so `nan` and `inf`
    /// are rejected.
    pub fn validate(&self) -> Result<(), StyleError> {
        let numbers = [
            ("font_size", self.font_size),
            ("node_separation", self.node_separation),
            ("rank_separation", self.rank_separation),
            ("node_font_size", self.node_font_size),
        ];
        match numbers.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, value)) => Err(StyleError::NonFinite { field, value }),
            None => Ok(()),
        }
    }
}
