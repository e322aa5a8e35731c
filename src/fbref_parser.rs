use anyhow::Result;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::document::{StatDocument, opt_string};
use crate::selector::{Node, Query, parse_html, text_of};

const SCOUT_TABLE_PREFIX: &str = "scout_summary_";
const SIMILAR_TABLE_PREFIX: &str = "similar_";
const PLAYER_LINK_SUFFIX: &str = "-Stats";
// Nation links end with the three-letter country code, e.g. "kr KOR".
const NATION_CODE_WIDTH: usize = 3;

const PULLOUT: Query = Query::tag("div").class_token("stats_pullout");
const DIV: Query = Query::tag("div");
const STRONG: Query = Query::tag("strong");
const PARAGRAPH: Query = Query::tag("p");
const CATEGORY: Query = Query::tag("div").class_prefix("p");

const SCOUT_SECTION: Query = Query::tag("div").attr_eq("id", "all_scout_summary");
const FOOTER: Query = Query::tag("div").class_token("footer");
const SCOUT_TABLE: Query = Query::tag("table").attr_prefix("id", SCOUT_TABLE_PREFIX);
const TBODY: Query = Query::tag("tbody");
const ROW: Query = Query::tag("tr");
const HEADER_CELL: Query = Query::tag("th");
const PER90: Query = Query::tag("td").attr_eq("data-stat", "per90");
const PERCENTILE: Query = Query::tag("td").attr_eq("data-stat", "percentile");

const SIMILAR_TABLE: Query = Query::tag("table").attr_prefix("id", SIMILAR_TABLE_PREFIX);
const PLAYER_CELL: Query = Query::tag("td").attr_eq("data-stat", "player");
const NATION_CELL: Query = Query::tag("td").attr_eq("data-stat", "nationality");
const TEAM_CELL: Query = Query::tag("td").attr_eq("data-stat", "team");
const LINK: Query = Query::tag("a");
const FLAG_ICON: Query = Query::tag("span").class_token("f-i");

const LAST_MATCHES: Query = Query::tag("table").attr_eq("id", "last_5_matchlogs");
const MATCH_DATE: Query = Query::tag("th").attr_eq("data-stat", "date");

/// Output key and `data-stat` attribute of each per-match metric.
const MATCH_METRICS: &[(&str, Query)] = &[
    ("goals", td_stat("goals")),
    ("assists", td_stat("assists")),
    ("shots", td_stat("shots")),
    ("shots_on_target", td_stat("shots_on_target")),
    ("xg", td_stat("xg")),
    ("npxg", td_stat("npxg")),
    ("xg_assist", td_stat("xg_assist")),
    ("sca", td_stat("sca")),
    ("gca", td_stat("gca")),
    ("passes_completed", td_stat("passes_completed")),
    ("passes_attempted", td_stat("passes")),
    ("progressive_passes", td_stat("progressive_passes")),
    ("carries", td_stat("carries")),
    ("progressive_carries", td_stat("progressive_carries")),
];

const MATCH_FIELDS: &[(&str, Query)] = &[
    ("competition", td_stat("round")),
    ("venue", td_stat("venue")),
    ("result", td_stat("result")),
    ("team", td_stat("team")),
    ("opponent", td_stat("opponent")),
    ("position", td_stat("position")),
    ("minutes", td_stat("minutes")),
];

const fn td_stat(key: &'static str) -> Query {
    Query::tag("td").attr_eq("data-stat", key)
}

pub fn parse(html: &str) -> Result<StatDocument> {
    let doc = parse_html(html);
    Ok(parse_root(doc.root_element()))
}

pub fn parse_root<'a, N: Node<'a>>(root: N) -> StatDocument {
    let mut out = StatDocument::empty();
    out.insert("stats", stats(root));
    out.insert("scouting_report", scouting_report(root));
    out.insert("similar_players", similar_players(root));
    out.insert("last_matches", last_matches(root));
    out
}

fn stats<'a, N: Node<'a>>(root: N) -> Value {
    let Some(pullout) = root.find(&PULLOUT) else {
        return Value::Null;
    };

    let header = pullout.find(&DIV);
    let season = text_of(header.and_then(|h| h.find(&STRONG)));
    let competitions: Vec<String> = header
        .map(|h| h.find_all(&PARAGRAPH).iter().map(|p| p.trimmed_text()).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut stats = Map::new();
    for category in pullout.find_all(&CATEGORY) {
        for stat in category.children_matching(&DIV) {
            let Some(name) = stat.find(&STRONG) else {
                continue;
            };
            let values: Vec<String> = stat
                .find_all(&PARAGRAPH)
                .iter()
                .map(|p| p.trimmed_text())
                .collect();
            stats.insert(name.trimmed_text(), json!(values));
        }
    }

    json!({
        "season": season,
        "competitions": competitions,
        "stats": stats,
    })
}

fn scouting_report<'a, N: Node<'a>>(root: N) -> Value {
    let tables = root.find_all(&SCOUT_TABLE);
    // Most FBref tables carry a footer; only the one beside the scout tables counts.
    let section = root
        .find(&SCOUT_SECTION)
        .or_else(|| tables.first().and_then(|t| t.parent_element()));
    let minutes = text_of(
        section
            .and_then(|s| s.find(&FOOTER))
            .and_then(|f| f.find(&STRONG)),
    );

    let mut positions = Map::new();
    for table in tables {
        let position = table_position(table, SCOUT_TABLE_PREFIX);
        let Some(body) = table.find(&TBODY) else {
            continue;
        };

        let mut position_stats = Map::new();
        for row in body.find_all(&ROW) {
            if row.has_class("spacer") {
                continue;
            }
            let (Some(stat), Some(per90), Some(percentile)) = (
                row.find(&HEADER_CELL),
                row.find(&PER90),
                row.find(&PERCENTILE),
            ) else {
                continue;
            };

            let stat = stat.trimmed_text();
            if stat.is_empty() {
                continue;
            }
            // The percentile number sits inside the bar graphic.
            let percentile = text_of(percentile.find(&DIV));
            position_stats.insert(
                stat,
                json!({
                    "per90": per90.trimmed_text(),
                    "percentile": percentile,
                }),
            );
        }

        if !position_stats.is_empty() {
            positions.insert(position, Value::Object(position_stats));
        }
    }

    debug!(positions = positions.len(), "fbref scouting report");
    json!({
        "minutes_played": minutes,
        "stats": positions,
    })
}

fn similar_players<'a, N: Node<'a>>(root: N) -> Value {
    let mut positions = Map::new();

    for table in root.find_all(&SIMILAR_TABLE) {
        let position = table_position(table, SIMILAR_TABLE_PREFIX);
        let Some(body) = table.find(&TBODY) else {
            continue;
        };

        let players: Vec<Value> = body
            .find_all(&ROW)
            .into_iter()
            .filter_map(similar_player)
            .collect();
        if !players.is_empty() {
            positions.insert(position, Value::Array(players));
        }
    }
    Value::Object(positions)
}

fn similar_player<'a, N: Node<'a>>(row: N) -> Option<Value> {
    let player = row.find(&PLAYER_CELL)?.find(&LINK)?;
    let nation = row.find(&NATION_CELL)?.find(&LINK)?;
    let team = row.find(&TEAM_CELL)?.find(&LINK)?;

    let id = player_id(player.attr("href")?);
    let code = nation.find(&FLAG_ICON).and_then(flag_code);

    Some(json!({
        "name": player.trimmed_text(),
        "id": id,
        "nation": {
            "name": nation_name(&nation.trimmed_text()),
            "code": code,
        },
        "team": team.trimmed_text(),
    }))
}

/// "/en/players/92e7e919/Son-Heung-min-Stats" -> "Son-Heung-min"
fn player_id(href: &str) -> String {
    let tail = href.rsplit('/').next().unwrap_or_default();
    tail.replace(PLAYER_LINK_SUFFIX, "")
}

fn nation_name(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.len().saturating_sub(NATION_CODE_WIDTH);
    chars[start..].iter().collect()
}

// `<span class="f-i f-kr">` -> "KR"
fn flag_code<'a, N: Node<'a>>(flag: N) -> Option<String> {
    let token = flag.class_tokens().get(1).copied()?;
    let code = token.rsplit('-').next().unwrap_or(token);
    Some(code.to_uppercase())
}

fn last_matches<'a, N: Node<'a>>(root: N) -> Value {
    let Some(body) = root.find(&LAST_MATCHES).and_then(|t| t.find(&TBODY)) else {
        return Value::Array(Vec::new());
    };

    let matches: Vec<Value> = body.find_all(&ROW).into_iter().map(match_row).collect();
    debug!(matches = matches.len(), "fbref last matches");
    Value::Array(matches)
}

fn match_row<'a, N: Node<'a>>(row: N) -> Value {
    let mut entry = Map::new();
    entry.insert("date".to_string(), opt_string(text_of(row.find(&MATCH_DATE))));
    for (key, query) in MATCH_FIELDS {
        entry.insert(key.to_string(), opt_string(text_of(row.find(query))));
    }

    let mut stats = Map::new();
    for (key, query) in MATCH_METRICS {
        stats.insert(key.to_string(), opt_string(text_of(row.find(query))));
    }
    entry.insert("stats".to_string(), Value::Object(stats));
    Value::Object(entry)
}

fn table_position<'a, N: Node<'a>>(table: N, prefix: &str) -> String {
    let id = table.attr("id").unwrap_or_default();
    id.strip_prefix(prefix).unwrap_or(id).to_string()
}
