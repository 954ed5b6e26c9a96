use super::table::{ComboTable, TableBuild};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Tier lists as they appear in the data file, keyed by genre. A missing tier
/// is an empty one.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierData {
    pub amazing: HashMap<String, Vec<String>>,
    pub creative: HashMap<String, Vec<String>>,
    pub hmm: HashMap<String, Vec<String>>,
    pub not_good: HashMap<String, Vec<String>>,
}

const BUILTIN_COMBOS_JSON: &str = include_str!("../../data/combos.json");

impl TierData {
    /// The tier data compiled into the binary.
    pub fn builtin() -> TierData {
        serde_json::from_str(BUILTIN_COMBOS_JSON).expect("builtin combos data must parse")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<TierData> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read combos data file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse combos data file: {:?}", path))
    }
}

/// Builds the rating table from the given data file, or from the builtin data
/// when no file is given, and reports what came out of the build.
pub fn load_table<P: AsRef<Path>>(data_path: Option<P>) -> Result<ComboTable> {
    let data = match data_path {
        Some(path) => {
            info!("Loading combos data from {:?}", path.as_ref());
            TierData::from_file(path)?
        }
        None => TierData::builtin(),
    };

    let TableBuild { table, problems } = ComboTable::build(data);

    if !problems.is_empty() {
        info!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            info!("- {:?}", problem);
        }
        info!("");
    }

    if problems.is_empty() {
        info!("Combos table checked, no issues found.");
    } else {
        info!(
            "Combos table was built, but check the {} non-fatal issues above.",
            problems.len()
        );
    }
    info!(
        "Combos table has:\n{} genres\n{} types",
        table.get_genres_count(),
        table.get_types_count()
    );
    Ok(table)
}
