use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A persistent claim of one territory by one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildClaim {
    pub territory: String,
    pub guild_name: String,
    pub guild_tag: String,
}

impl GuildClaim {
    pub fn new(
        territory: impl Into<String>,
        guild_name: impl Into<String>,
        guild_tag: impl Into<String>,
    ) -> Self {
        Self {
            territory: territory.into(),
            guild_name: guild_name.into(),
            guild_tag: guild_tag.into(),
        }
    }

    pub fn guild(&self) -> GuildKey {
        GuildKey::new(&self.guild_name, &self.guild_tag)
    }
}

/// Guilds are identified by the `(name, tag)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuildKey {
    pub name: String,
    pub tag: String,
}

impl GuildKey {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
        }
    }
}

/// On-disk claims document: `{ "claims": { territory: claim } }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimsDocument {
    #[serde(default)]
    pub claims: HashMap<String, GuildClaim>,
}

/// One entry of a guild color list: `{ "name", "tag", "color": "#RRGGBB" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildEntry {
    pub name: String,
    pub tag: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Parse a claims document, returning claims sorted by territory name so
/// batch imports are deterministic.
pub fn parse_claims(json: &str) -> Result<Vec<GuildClaim>, serde_json::Error> {
    let doc: ClaimsDocument = serde_json::from_str(json)?;
    let mut claims: Vec<GuildClaim> = doc.claims.into_values().collect();
    claims.sort_by(|a, b| a.territory.cmp(&b.territory));
    Ok(claims)
}

pub fn parse_guilds(json: &str) -> Result<Vec<GuildEntry>, serde_json::Error> {
    serde_json::from_str(json)
}
