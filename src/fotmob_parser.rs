use anyhow::{Result, anyhow};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::document::{StatDocument, opt_string};
use crate::selector::{Node, Query, parse_html, text_of};

// FotMob serves the Korean locale; group headers end with "순위" (rank) plus the rank itself.
const GROUP_TITLE_SUFFIX: &str = "순위";
const UNKNOWN: &str = "Unknown";

const SEASON_PERFORMANCE: Query = Query::tag("div").class_contains("SeasonPerformance");
const STAT_GROUP_TITLE: Query = Query::tag("h3").class_contains("StatGroupTitle");
const STAT_ITEM: Query = Query::tag("div").class_contains("StatItem");
const STAT_ITEM_TITLE: Query = Query::tag("div").class_contains("StatTitle");
const STAT_ITEM_VALUE: Query = Query::tag("div").class_contains("StatValue");

const PLAYER_TRAITS: Query = Query::tag("div").class_contains("PlayerTraits");
const TRAIT_LABEL: Query = Query::tag("span").class_contains("TraitLabel");
const TRAIT_TEXT: Query = Query::tag("span").class_contains("TraitText");
const TRAIT_PERCENTAGE: Query = Query::tag("span").class_contains("TraitPercentage");

const MAIN_LEAGUE: Query = Query::tag("section").class_contains("PlayerCareerMainLeague");
const MAIN_LEAGUE_HEADER: Query = Query::tag("h2").class_contains("HeaderText");
const STAT_BOX: Query = Query::tag("div").class_contains("StatBox");
const STAT_BOX_TITLE: Query = Query::any().class_contains("StatTitle");
const STAT_BOX_VALUE: Query = Query::any().class_contains_any(&["StatValue", "PlayerRatingStyled"]);
const SPAN: Query = Query::tag("span");

const MATCH_ROW: Query = Query::tag("a").class_contains("PlayerMatchStatsTableRowCSS");
const LEFT_CONTENT: Query = Query::tag("div").class_contains("LeftContent");
const LEAGUE_AND_DATE: Query = Query::tag("div").class_contains("LeagueIconAndDate");
const TITLED_DIV: Query = Query::tag("div").has_attr("title");
const PARAGRAPH: Query = Query::tag("p");
const OPPONENT: Query = Query::tag("div").class_contains("TeamIconAndName");
const RESULT: Query = Query::tag("div").class_contains("Result");
const SCORE: Query = Query::tag("span").class_contains("Score");
const MATCH_DATA: Query = Query::tag("div").class_contains("PlayerMatchStatsDataCSS");
const DATA_CELL: Query = Query::tag("div").class_contains("DataCell");

const CAREER_PHASE: Query = Query::tag("tbody").class_contains("CareerPhaseTbody");
const CAREER_PHASE_TITLE: Query = Query::tag("h4").class_contains("CareerPhaseH4");
const CAREER_ROW: Query = Query::tag("tr").class_contains("TeamAndSeasonsCSS");
const CAREER_TEAM: Query = Query::tag("div").class_contains("TeamCSS");
const CAREER_TEAM_NAME: Query = Query::tag("span").class_contains("TeamName");
const CAREER_DATES: Query = Query::tag("span").class_contains("DateCSS");
const CAREER_TRANSFER: Query = Query::tag("span").class_contains("TransferSuffix");
const CAREER_STAT_CELL: Query = Query::tag("div").class_contains("StatCell");

// Positions of the stat cells inside a career row.
const APPEARANCES_CELL: usize = 1;
const GOALS_CELL: usize = 2;

pub fn parse(html: &str) -> Result<StatDocument> {
    let doc = parse_html(html);
    parse_root(doc.root_element())
}

pub fn parse_root<'a, N: Node<'a>>(root: N) -> Result<StatDocument> {
    let mut out = StatDocument::empty();
    out.insert("season_performance", season_performance(root));
    out.insert("player_traits", player_traits(root));
    out.insert("player_career_main_league", career_main_league(root));
    out.insert("match_stats", match_stats(root));
    out.insert("career_history", career_history(root)?);
    Ok(out)
}

fn season_performance<'a, N: Node<'a>>(root: N) -> Value {
    let mut groups = Map::new();
    let Some(container) = root.find(&SEASON_PERFORMANCE) else {
        return Value::Object(groups);
    };

    for header in container.find_all(&STAT_GROUP_TITLE) {
        let title = header.trimmed_text();
        let group_name = if title.is_empty() {
            UNKNOWN.to_string()
        } else {
            strip_group_suffix(&title)
        };

        let mut items = Map::new();
        for item in header.siblings_until(&STAT_ITEM, &STAT_GROUP_TITLE) {
            let name = text_of(item.find(&STAT_ITEM_TITLE)).unwrap_or_else(|| UNKNOWN.to_string());
            let value = text_of(item.find(&STAT_ITEM_VALUE));
            items.insert(name, opt_string(value));
        }
        groups.insert(group_name, Value::Object(items));
    }

    debug!(groups = groups.len(), "fotmob season performance");
    Value::Object(groups)
}

fn strip_group_suffix(title: &str) -> String {
    match title.split_once(GROUP_TITLE_SUFFIX) {
        Some((head, _)) => head.trim_end().to_string(),
        None => title.to_string(),
    }
}

fn player_traits<'a, N: Node<'a>>(root: N) -> Value {
    let mut traits = Map::new();
    let Some(container) = root.find(&PLAYER_TRAITS) else {
        return Value::Object(traits);
    };

    for label in container.find_all(&TRAIT_LABEL) {
        let text = text_of(label.find(&TRAIT_TEXT)).filter(|t| !t.is_empty());
        let percentage = text_of(label.find(&TRAIT_PERCENTAGE)).filter(|p| !p.is_empty());
        if let (Some(text), Some(percentage)) = (text, percentage) {
            traits.insert(text, Value::String(percentage));
        }
    }
    Value::Object(traits)
}

fn career_main_league<'a, N: Node<'a>>(root: N) -> Value {
    let mut career = Map::new();
    let Some(section) = root.find(&MAIN_LEAGUE) else {
        return Value::Object(career);
    };

    career.insert(
        "main_league".to_string(),
        opt_string(text_of(section.find(&MAIN_LEAGUE_HEADER))),
    );

    for stat_box in section.find_all(&STAT_BOX) {
        let Some(title) = stat_box.find(&STAT_BOX_TITLE) else {
            continue;
        };
        // Plain stats and the rating badge share the output slot.
        let Some(value) = stat_box.find(&STAT_BOX_VALUE) else {
            continue;
        };
        let Some(span) = value.find(&SPAN) else {
            continue;
        };
        let title = title.trimmed_text();
        let value = span.trimmed_text();
        if !title.is_empty() && !value.is_empty() {
            career.insert(title, Value::String(value));
        }
    }
    Value::Object(career)
}

fn match_stats<'a, N: Node<'a>>(root: N) -> Value {
    let rows: Vec<Value> = root.find_all(&MATCH_ROW).into_iter().map(match_row).collect();
    debug!(matches = rows.len(), "fotmob match stats");
    Value::Array(rows)
}

fn match_row<'a, N: Node<'a>>(row: N) -> Value {
    let left = row.find(&LEFT_CONTENT);
    let league_date = left.and_then(|l| l.find(&LEAGUE_AND_DATE));
    let league = league_date
        .and_then(|l| l.find(&TITLED_DIV))
        .and_then(|d| d.attr("title"))
        .map(str::to_string);
    let date = text_of(league_date.and_then(|l| l.find(&PARAGRAPH)));
    let opponent = text_of(left.and_then(|l| l.find(&OPPONENT)));

    let scores = left
        .and_then(|l| l.find(&RESULT))
        .map(|r| r.find_all(&SCORE))
        .unwrap_or_default();
    // Home and away scores sit around a separator span.
    let score = match scores.as_slice() {
        [home, _, away, ..] => Some(format!("{}-{}", home.trimmed_text(), away.trimmed_text())),
        _ => None,
    };

    let cells = row
        .find(&MATCH_DATA)
        .map(|d| d.find_all(&DATA_CELL))
        .unwrap_or_default();
    let cell = |idx: usize| cells.get(idx).map(|c| c.trimmed_text());
    let rating = cells
        .get(5)
        .and_then(|c| c.find(&SPAN))
        .map(|s| s.trimmed_text());

    json!({
        "league": league,
        "date": date,
        "opponent": opponent,
        "score": score,
        "minutes": cell(0),
        "goals": cell(1),
        "assists": cell(2),
        "yellow_cards": cell(3),
        "red_cards": cell(4),
        "rating": rating,
    })
}

fn career_history<'a, N: Node<'a>>(root: N) -> Result<Value> {
    let mut phases = Map::new();

    for phase in root.find_all(&CAREER_PHASE) {
        let Some(header) = phase.find(&CAREER_PHASE_TITLE) else {
            continue;
        };
        let phase_name = header.trimmed_text();

        let mut entries = Vec::new();
        for row in phase.find_all(&CAREER_ROW) {
            let entry = career_entry(row)?;
            if !entry.is_empty() {
                entries.push(Value::Object(entry));
            }
        }
        phases.insert(phase_name, Value::Array(entries));
    }
    Ok(Value::Object(phases))
}

fn career_entry<'a, N: Node<'a>>(row: N) -> Result<Map<String, Value>> {
    let mut entry = Map::new();

    if let Some(team_cell) = row.find(&CAREER_TEAM) {
        if let Some(name) = team_cell.find(&CAREER_TEAM_NAME) {
            // Loan spells carry a "(...)" suffix on the team name.
            let text = name.text();
            let team = text.split('(').next().unwrap_or_default().trim();
            entry.insert("team".to_string(), Value::String(team.to_string()));
        }
        if let Some(period) = text_of(team_cell.find(&CAREER_DATES)) {
            entry.insert("period".to_string(), Value::String(period));
        }
        if let Some(status) = text_of(team_cell.find(&CAREER_TRANSFER)).filter(|s| !s.is_empty()) {
            let status = status.trim_matches(|c: char| c == ' ' || c == '(' || c == ')');
            entry.insert("status".to_string(), Value::String(status.to_string()));
        }
    }

    for (idx, cell) in row.find_all(&CAREER_STAT_CELL).into_iter().enumerate() {
        let key = match idx {
            APPEARANCES_CELL => "appearances",
            GOALS_CELL => "goals",
            _ => continue,
        };
        let Some(span) = cell.find(&SPAN) else {
            continue;
        };
        entry.insert(key.to_string(), Value::from(parse_count(key, &span.text())?));
    }

    Ok(entry)
}

fn parse_count(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| anyhow!("career {field} is not an integer: {raw:?}"))
}
