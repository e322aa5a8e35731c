use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::site::Site;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    pub fotmob_url: String,
    pub fbref_url: String,
}

impl PlayerEntry {
    pub fn url_for(&self, site: Site) -> &str {
        match site {
            Site::Fotmob => &self.fotmob_url,
            Site::Fbref => &self.fbref_url,
        }
    }
}

pub fn load_roster(path: &Path) -> Result<Vec<PlayerEntry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read roster {}", path.display()))?;
    parse_roster_json(&raw).with_context(|| format!("parse roster {}", path.display()))
}

pub fn parse_roster_json(raw: &str) -> Result<Vec<PlayerEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid roster json")
}
