use anyhow::{anyhow, bail, Result};
use prediction_engine::Position;
use props_board::{BoardFilter, SortKey};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Runtime settings, všechno z env (.env načte dotenv v main).
#[derive(Debug, Clone)]
pub struct Settings {
    pub input:        Option<PathBuf>,
    pub model_config: Option<PathBuf>,
    pub ratings:      Option<PathBuf>,
    pub log_dir:      PathBuf,
    pub export_csv:   Option<PathBuf>,
    pub export_json:  Option<PathBuf>,
    pub filter:       BoardFilter,
    pub sort:         SortKey,
    pub min_edge:     Option<f64>,
    pub threads:      Option<usize>,
}

fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{name}={raw:?}: {e}")),
    }
}

impl Settings {
    /// `cli_input` (first positional arg) wins over `PROPS_INPUT`.
    pub fn from_env(cli_input: Option<String>) -> Result<Self> {
        let position = match var("PROPS_POSITION") {
            None => None,
            Some(raw) => match Position::from_name(&raw) {
                Some(p) => Some(p),
                None => bail!("PROPS_POSITION={raw:?} is not a role or agent"),
            },
        };

        let min_edge = parsed::<f64>("PROPS_MIN_EDGE")?;
        if let Some(edge) = min_edge {
            if !edge.is_finite() || !(0.0..=0.5).contains(&edge) {
                bail!("PROPS_MIN_EDGE must be within [0, 0.5], got {edge}");
            }
        }

        let threads = parsed::<usize>("PROPS_THREADS")?;
        if threads == Some(0) {
            bail!("PROPS_THREADS must be at least 1");
        }

        Ok(Self {
            input:        cli_input.or_else(|| var("PROPS_INPUT")).map(PathBuf::from),
            model_config: var("PROPS_MODEL_CONFIG").map(PathBuf::from),
            ratings:      var("PROPS_RATINGS").map(PathBuf::from),
            log_dir:      var("PROPS_LOG_DIR").unwrap_or_else(|| "logs".to_string()).into(),
            export_csv:   var("PROPS_EXPORT_CSV").map(PathBuf::from),
            export_json:  var("PROPS_EXPORT_JSON").map(PathBuf::from),
            filter: BoardFilter {
                team:           var("PROPS_TEAM"),
                position,
                min_confidence: parsed::<u8>("PROPS_MIN_CONFIDENCE")?,
            },
            sort:         parsed::<SortKey>("PROPS_SORT")?.unwrap_or_default(),
            min_edge,
            threads,
        })
    }
}
