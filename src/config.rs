use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_HTML_TEMPLATE: &str = "{site}/html/{name}_{date}.html";
const DEFAULT_JSON_TEMPLATE: &str = "{site}/json/{name}.json";
const DEFAULT_ROSTER: &str = "players.json";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Paths and transport settings shared by the cache, the JSON writer and the batch runner.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub html_path_template: String,
    pub json_path_template: String,
    pub roster_path: PathBuf,
    pub user_agent: String,
    // None keeps the transport's own default.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            html_path_template: DEFAULT_HTML_TEMPLATE.to_string(),
            json_path_template: DEFAULT_JSON_TEMPLATE.to_string(),
            roster_path: PathBuf::from(DEFAULT_ROSTER),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env_non_empty("PLAYER_STATS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(roster) = env_non_empty("PLAYER_STATS_ROSTER") {
            config.roster_path = PathBuf::from(roster);
        }
        if let Some(agent) = env_non_empty("PLAYER_STATS_USER_AGENT") {
            config.user_agent = agent;
        }
        config.request_timeout = env_non_empty("PLAYER_STATS_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        config
    }

    pub fn html_path(&self, site: &str, name: &str, date: &str) -> PathBuf {
        self.data_dir
            .join(render_template(&self.html_path_template, site, name, date))
    }

    pub fn json_path(&self, site: &str, name: &str) -> PathBuf {
        self.data_dir
            .join(render_template(&self.json_path_template, site, name, ""))
    }
}

fn render_template(template: &str, site: &str, name: &str, date: &str) -> String {
    template
        .replace("{site}", site)
        .replace("{name}", name)
        .replace("{date}", date)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
