use anyhow::Result;

use crate::{parse_json_str, IngestReport};

/// Demo slate (Team Liquid vs Fnatic) used when no input file is given.
pub const SAMPLE_SLATE_JSON: &str = r#"{
    "team1": "Team Liquid",
    "team2": "Fnatic",
    "players": [
        { "name": "Jawgemo", "team": "Team Liquid", "agent": "Jett",      "line": 23.5,
          "recentSamples": [23, 19, 25, 21, 18, 22, 20] },
        { "name": "Derke",   "team": "Fnatic",      "agent": "Raze",      "line": 25.5,
          "recentSamples": [27, 24, 26, 30, 22, 25, 28] },
        { "name": "Boaster", "team": "Fnatic",      "agent": "Brimstone", "line": 13.5,
          "recentSamples": [15, 12, 14, 11, 16] }
    ]
}"#;

pub fn sample_slate() -> Result<IngestReport> {
    parse_json_str(SAMPLE_SLATE_JSON)
}
