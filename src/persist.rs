use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::document::StatDocument;
use crate::site::Site;

/// Writes `doc` as indented JSON to the site's output path for `name`.
pub fn save_document(
    config: &Config,
    site: Site,
    name: &str,
    doc: &StatDocument,
) -> Result<PathBuf> {
    let path = config.json_path(site.as_str(), name);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let json = doc.to_pretty_json().context("serialize stat document")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write stat document")?;
    fs::rename(&tmp, &path).context("swap stat document")?;
    info!(path = %path.display(), "saved");
    Ok(path)
}

pub fn load_document(config: &Config, site: Site, name: &str) -> Result<StatDocument> {
    let path = config.json_path(site.as_str(), name);
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).context("invalid stat document json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_pretty_unescaped_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_data_dir(dir.path());
        let mut doc = StatDocument::empty();
        doc.insert("career_history", serde_json::json!({"고위급 경력": []}));

        let path = save_document(&config, Site::Fotmob, "son", &doc).unwrap();
        assert_eq!(path, dir.path().join("fotmob/json/son.json"));
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{\n  \"career_history\": {\n    \"고위급 경력\": []\n  }\n}");
        assert!(!path.with_extension("json.tmp").exists());

        let back = load_document(&config, Site::Fotmob, "son").unwrap();
        assert_eq!(back, doc);
    }
}
