use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::extractor::Extractor;
use crate::http_client::Transport;
use crate::persist::save_document;
use crate::roster::PlayerEntry;
use crate::site::Site;

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub players_total: usize,
    pub players_succeeded: usize,
    pub written: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// Extracts and saves both sites for every player. A failing player is
/// recorded in `errors` and the rest of the roster still runs.
pub fn run_batch<T: Transport>(extractor: &Extractor<T>, roster: &[PlayerEntry]) -> BatchSummary {
    let mut summary = BatchSummary {
        players_total: roster.len(),
        ..BatchSummary::default()
    };

    for player in roster {
        info!(name = %player.name, "processing");
        match process_player(extractor, player) {
            Ok(paths) => {
                summary.players_succeeded += 1;
                summary.written.extend(paths);
            }
            Err(err) => {
                let msg = format!("{err:#}");
                warn!(name = %player.name, error = %msg, "player failed");
                summary.errors.push(format!("{}: {msg}", player.name));
            }
        }
    }
    summary
}

fn process_player<T: Transport>(
    extractor: &Extractor<T>,
    player: &PlayerEntry,
) -> Result<Vec<PathBuf>> {
    let config = extractor.cache().config();
    let mut written = Vec::with_capacity(Site::ALL.len());
    for site in Site::ALL {
        let doc = extractor.extract(site, player.url_for(site), &player.name)?;
        written.push(save_document(config, site, &player.name, &doc)?);
    }
    Ok(written)
}
