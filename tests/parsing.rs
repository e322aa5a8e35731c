use std::fs;
use std::path::PathBuf;

use serde_json::json;

use player_stats::{Site, fbref_parser, fotmob_parser};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_fotmob_player_fixture() {
    let raw = read_fixture("fotmob_player.html");
    let doc = fotmob_parser::parse(&raw).expect("fixture should parse");

    let keys: Vec<&str> = doc.keys().collect();
    assert_eq!(
        keys,
        vec![
            "season_performance",
            "player_traits",
            "player_career_main_league",
            "match_stats",
            "career_history",
        ]
    );
    assert_eq!(
        doc.get("season_performance"),
        Some(&json!({
            "슈팅": {"골": "17", "xG": "12.3"},
            "패스": {"도움": null},
        }))
    );
    assert_eq!(doc.get("player_traits"), Some(&json!({"득점력": "88%"})));
    assert_eq!(
        doc.get("player_career_main_league"),
        Some(&json!({
            "main_league": "Premier League 2023/2024",
            "경기": "35",
            "평점": "7.42",
        }))
    );
    assert_eq!(
        doc.get("career_history"),
        Some(&json!({
            "고위급 경력": [
                {"team": "Tottenham Hotspur", "period": "2015 - 현재", "appearances": 333, "goals": 127}
            ],
            "청년 경력": [
                {"team": "Hamburger SV", "period": "2008 - 2010", "status": "임대", "appearances": 10, "goals": 3}
            ],
        }))
    );
}

#[test]
fn fotmob_season_groups_without_items_or_title() {
    let raw = read_fixture("fotmob_season_groups.html");
    let doc = fotmob_parser::parse(&raw).expect("fixture should parse");

    assert_eq!(
        doc.get("season_performance"),
        Some(&json!({
            "Unknown": {"태클": "4"},
            "드리블": {},
            "수비": {},
        }))
    );
    let groups: Vec<&String> = doc
        .get("season_performance")
        .and_then(|v| v.as_object())
        .expect("season_performance is an object")
        .keys()
        .collect();
    assert_eq!(groups, ["Unknown", "드리블", "수비"]);
}

#[test]
fn fotmob_match_rows_keep_nullable_rating() {
    let raw = read_fixture("fotmob_player.html");
    let doc = fotmob_parser::parse(&raw).expect("fixture should parse");
    let matches = doc
        .get("match_stats")
        .and_then(|v| v.as_array())
        .expect("match_stats is a list");

    assert_eq!(matches.len(), 2);
    assert_eq!(
        matches[0],
        json!({
            "league": "Premier League",
            "date": "2024-05-19",
            "opponent": "Sheffield United",
            "score": "3-0",
            "minutes": "90",
            "goals": "1",
            "assists": "0",
            "yellow_cards": "0",
            "red_cards": "0",
            "rating": "8.1",
        })
    );
    assert_eq!(matches[1]["score"], json!("0-2"));
    assert_eq!(matches[1]["yellow_cards"], json!("1"));
    assert!(matches[1]["rating"].is_null());
}

#[test]
fn fotmob_match_row_without_content_is_all_null() {
    let html = r#"<a class="css-x-PlayerMatchStatsTableRowCSS" href="/m"></a>"#;
    let doc = fotmob_parser::parse(html).expect("bare row should parse");
    assert_eq!(
        doc.get("match_stats"),
        Some(&json!([{
            "league": null,
            "date": null,
            "opponent": null,
            "score": null,
            "minutes": null,
            "goals": null,
            "assists": null,
            "yellow_cards": null,
            "red_cards": null,
            "rating": null,
        }]))
    );
}

#[test]
fn parses_fbref_player_fixture() {
    let raw = read_fixture("fbref_player.html");
    let doc = fbref_parser::parse(&raw).expect("fixture should parse");

    assert_eq!(
        doc.get("stats"),
        Some(&json!({
            "season": "2023-2024",
            "competitions": ["Premier League", "Club Friendlies"],
            "stats": {
                "MP": ["35", "230"],
                "Gls": ["17", "120"],
                "xG": ["12.3"],
            },
        }))
    );
    assert_eq!(
        doc.get("scouting_report"),
        Some(&json!({
            "minutes_played": "2,847 minutes",
            "stats": {
                "FW": {
                    "Non-Penalty Goals": {"per90": "0.43", "percentile": "96"},
                    "Assists": {"per90": "0.25", "percentile": "89"},
                }
            },
        }))
    );
}

#[test]
fn similar_players_skip_rows_without_nation_link() {
    let raw = read_fixture("fbref_player.html");
    let doc = fbref_parser::parse(&raw).expect("fixture should parse");

    assert_eq!(
        doc.get("similar_players"),
        Some(&json!({
            "FW": [
                {
                    "name": "Harry Kane",
                    "id": "Harry-Kane",
                    "nation": {"name": "ENG", "code": "ENG"},
                    "team": "Bayern Munich",
                },
                {
                    "name": "Mohamed Salah",
                    "id": "Mohamed-Salah",
                    "nation": {"name": "EGY", "code": "EG"},
                    "team": "Liverpool",
                },
            ]
        }))
    );
}

#[test]
fn similar_players_keep_rows_without_flag_icon() {
    let raw = read_fixture("fbref_similar_players.html");
    let doc = fbref_parser::parse(&raw).expect("fixture should parse");

    assert_eq!(
        doc.get("similar_players").and_then(|p| p.get("FW")),
        Some(&json!([{
            "name": "Hwang Hee-chan",
            "id": "Hwang-Hee-chan",
            "nation": {"name": "KOR", "code": null},
            "team": "Wolves",
        }]))
    );
}

#[test]
fn similar_players_drop_rows_without_player_href() {
    let raw = read_fixture("fbref_similar_players.html");
    let doc = fbref_parser::parse(&raw).expect("fixture should parse");

    let forwards = doc
        .get("similar_players")
        .and_then(|p| p.get("FW"))
        .and_then(|v| v.as_array())
        .expect("FW table is kept");
    assert_eq!(forwards.len(), 1);
    assert!(forwards.iter().all(|p| p["name"] != json!("Cho Gue-sung")));
}

#[test]
fn similar_players_omit_tables_without_surviving_rows() {
    let raw = read_fixture("fbref_similar_players.html");
    let doc = fbref_parser::parse(&raw).expect("fixture should parse");

    let positions: Vec<&String> = doc
        .get("similar_players")
        .and_then(|v| v.as_object())
        .expect("similar_players is an object")
        .keys()
        .collect();
    assert_eq!(positions, ["FW"]);
}

#[test]
fn fbref_last_matches_read_all_metrics() {
    let raw = read_fixture("fbref_player.html");
    let doc = fbref_parser::parse(&raw).expect("fixture should parse");

    assert_eq!(
        doc.get("last_matches"),
        Some(&json!([{
            "date": "2024-05-19",
            "competition": "Matchweek 38",
            "venue": "Away",
            "result": "W 3–0",
            "team": "Tottenham",
            "opponent": "Sheffield Utd",
            "position": "LW",
            "minutes": "90",
            "stats": {
                "goals": "1",
                "assists": "0",
                "shots": "4",
                "shots_on_target": "2",
                "xg": "0.6",
                "npxg": "0.6",
                "xg_assist": "0.1",
                "sca": "3",
                "gca": "1",
                "passes_completed": "21",
                "passes_attempted": "27",
                "progressive_passes": "3",
                "carries": "25",
                "progressive_carries": "4",
            },
        }]))
    );
}

#[test]
fn fbref_without_scouting_report_keeps_other_sections() {
    let raw = read_fixture("fbref_no_scouting.html");
    let doc = Site::Fbref.parse(&raw).expect("fixture should parse");

    assert_eq!(
        doc.get("scouting_report"),
        Some(&json!({"minutes_played": null, "stats": {}}))
    );
    assert_eq!(
        doc.get("stats"),
        Some(&json!({
            "season": "2024-2025",
            "competitions": ["Bundesliga"],
            "stats": {"MP": ["27", "150"]},
        }))
    );
    assert_eq!(doc.get("similar_players"), Some(&json!({})));

    let matches = doc.get("last_matches").and_then(|v| v.as_array()).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["opponent"], json!("Bochum"));
    assert_eq!(matches[0]["stats"]["goals"], json!("0"));
    assert!(matches[0]["stats"]["xg"].is_null());
}

#[test]
fn parsing_is_deterministic() {
    for (site, fixture) in [
        (Site::Fotmob, "fotmob_player.html"),
        (Site::Fbref, "fbref_player.html"),
    ] {
        let raw = read_fixture(fixture);
        let first = site.parse(&raw).unwrap().to_pretty_json().unwrap();
        let second = site.parse(&raw).unwrap().to_pretty_json().unwrap();
        assert_eq!(first, second);
    }
}
