use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::Config;
use crate::http_client::Transport;
use crate::site::Site;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifies one saved page: a site, a player name and the day it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub site: Site,
    pub name: String,
    pub date: NaiveDate,
}

impl CacheKey {
    pub fn new(site: Site, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            site,
            name: name.into(),
            date,
        }
    }

    pub fn path(&self, config: &Config) -> PathBuf {
        let date = self.date.format(DATE_FORMAT).to_string();
        config.html_path(self.site.as_str(), &self.name, &date)
    }
}

/// Raw pages on disk, fetched through `T` on a miss. Entries never expire.
pub struct PageCache<T> {
    config: Config,
    transport: T,
}

impl<T: Transport> PageCache<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Saved content for `key`, else the body of a GET to `url` (saved before returning).
    /// `Ok(None)` when the server did not answer with a success status.
    pub fn load(&self, url: &str, key: &CacheKey) -> Result<Option<String>> {
        let path = key.path(&self.config);
        match fs::read_to_string(&path) {
            Ok(body) => {
                info!(path = %path.display(), "reading cached page");
                return Ok(Some(body));
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).with_context(|| format!("read cached page {}", path.display()));
            }
        }

        let Some(body) = self.transport.get(url)? else {
            warn!(%url, site = %key.site, name = %key.name, "page not available");
            return Ok(None);
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create cache dir {}", dir.display()))?;
        }
        fs::write(&path, &body).with_context(|| format!("write cached page {}", path.display()))?;
        info!(path = %path.display(), "saving page");
        Ok(Some(body))
    }
}
