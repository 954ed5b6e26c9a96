use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import modules from the library crate
use gds_combo_finder::cli_style;
use gds_combo_finder::combos::{load_table, ComboTable, TableBuild, TierData};
use gds_combo_finder::config;
use gds_combo_finder::repl;
use gds_combo_finder::sqlite_persistence::{SqliteInventoryStore, INVENTORY_DB_FILE_NAME};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=cli_style::get_styles())]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the sqlite database holding the owned selection. Created on
    /// first use if missing. Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a combos JSON file replacing the built-in data.
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub data_path: Option<PathBuf>,

    /// Check the combos data and exit without opening the console.
    #[clap(long)]
    pub check_only: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_path: args.db_path.clone(),
            data_path: args.data_path.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    if cli_args.check_only {
        let data = match &app_config.data_path {
            Some(path) => TierData::from_file(path)?,
            None => TierData::builtin(),
        };
        let TableBuild { table, problems } = ComboTable::build(data);

        if !problems.is_empty() {
            println!("Found {} problems:", problems.len());
            for problem in problems.iter() {
                println!("- {:?}", problem);
            }
            println!();
        }

        if problems.is_empty() {
            println!("Combos data checked, no issues found.");
        } else {
            println!("Combos table was built, but check the issues above.");
        }
        println!(
            "Combos table has:\n{} genres\n{} types",
            table.get_genres_count(),
            table.get_types_count()
        );
        return Ok(());
    }

    let table = load_table(app_config.data_path.as_ref())?;
    let data_source = match &app_config.data_path {
        Some(path) => path.display().to_string(),
        None => "builtin".to_string(),
    };

    let db_path = app_config
        .db_path
        .or_else(SqliteInventoryStore::infer_path)
        .unwrap_or_else(|| PathBuf::from(INVENTORY_DB_FILE_NAME));

    if !db_path.exists() {
        info!("Creating new inventory database at {:?}", db_path);
    }
    let store = SqliteInventoryStore::new(&db_path)?;

    repl::run(
        &table,
        Box::new(store),
        db_path.display().to_string(),
        data_source,
    )
}
