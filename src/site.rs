use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::document::StatDocument;
use crate::{fbref_parser, fotmob_parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Fotmob,
    Fbref,
}

impl Site {
    pub const ALL: [Site; 2] = [Site::Fotmob, Site::Fbref];

    /// Path segment used for the site's cache and output directories.
    pub fn as_str(self) -> &'static str {
        match self {
            Site::Fotmob => "fotmob",
            Site::Fbref => "fbref",
        }
    }

    pub fn parse(self, html: &str) -> Result<StatDocument> {
        match self {
            Site::Fotmob => fotmob_parser::parse(html),
            Site::Fbref => fbref_parser::parse(html),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fotmob" => Ok(Site::Fotmob),
            "fbref" => Ok(Site::Fbref),
            other => Err(anyhow!("unknown site: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for site in Site::ALL {
            assert_eq!(site.as_str().parse::<Site>().unwrap(), site);
        }
        assert_eq!(" FBref ".parse::<Site>().unwrap(), Site::Fbref);
        assert!("transfermarkt".parse::<Site>().is_err());
    }
}
