use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::config::Config;
use crate::document::StatDocument;
use crate::http_client::{HttpTransport, Transport};
use crate::page_cache::{CacheKey, PageCache};
use crate::site::Site;

/// Fetches (or reuses) a player's page and runs the matching site parser.
pub struct Extractor<T> {
    cache: PageCache<T>,
}

impl Extractor<HttpTransport> {
    pub fn from_config(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(PageCache::new(config, transport)))
    }
}

impl<T: Transport> Extractor<T> {
    pub fn new(cache: PageCache<T>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &PageCache<T> {
        &self.cache
    }

    pub fn extract(&self, site: Site, url: &str, name: &str) -> Result<StatDocument> {
        self.extract_on(site, url, name, Local::now().date_naive())
    }

    /// Like [`Extractor::extract`], keyed to `date` instead of today.
    /// An unavailable page yields an empty document.
    pub fn extract_on(
        &self,
        site: Site,
        url: &str,
        name: &str,
        date: NaiveDate,
    ) -> Result<StatDocument> {
        let key = CacheKey::new(site, name, date);
        let Some(html) = self.cache.load(url, &key)? else {
            return Ok(StatDocument::empty());
        };

        debug!(%site, %name, bytes = html.len(), "parsing page");
        let doc = site
            .parse(&html)
            .with_context(|| format!("parse {site} page for {name}"))?;
        info!(%site, %name, sections = doc.keys().count(), "extracted");
        Ok(doc)
    }
}
