use crate::cli_style::{self, box_chars, colors, rating_color, CommandHelp, TableBuilder};
use crate::combos::{
    best_combos, enumerate_all, filter_by_rating, rate_one, ComboResult, ComboTable, RatingFilter,
};
use crate::inventory::{load_inventory, Dimension, Inventory, InventoryStore};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use crossterm::style::Stylize;

use rustyline::{
    completion::Completer,
    highlight::Highlighter,
    history::FileHistory,
    validate::Validator,
    CompletionType, Config, Editor, Helper,
};

const PROMPT: &str = ">> ";

#[derive(Parser)]
#[command(styles=cli_style::get_styles(), name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Rates a single genre and type pairing. Neither value has to be owned
    /// or even known, unknown pairings rate Not Bad.
    Rate { genre: String, game_type: String },

    /// Rates every pairing of the owned genres and types, best first.
    Combos {
        /// Rating tier to keep, or "all".
        #[clap(default_value = "all")]
        filter: RatingFilter,
    },

    /// Shows the owned pairings that reach the Amazing tier.
    Best,

    /// Lists every known genre, marking the owned ones. An optional query
    /// keeps only matching names.
    Genres { query: Option<String> },

    /// Lists every known type, marking the owned ones. An optional query
    /// keeps only matching names.
    Types { query: Option<String> },

    /// Adds a value to the owned selection, or removes it if already owned.
    Toggle { dimension: Dimension, value: String },

    /// Owns every known value of the given dimension.
    SelectAll { dimension: Dimension },

    /// Disowns every value of the given dimension.
    ClearAll { dimension: Dimension },

    /// Shows the owned selection.
    Inventory,

    /// Shows the paths of the inventory database and the combos data.
    Where,

    /// Close this program.
    Exit,
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "rate",
        args: "<genre> <type>",
        description: "Rate a single pairing",
    },
    CommandHelp {
        name: "combos",
        args: "[filter]",
        description: "Rate all owned pairings, best first",
    },
    CommandHelp {
        name: "best",
        args: "",
        description: "Show owned pairings reaching Amazing",
    },
    CommandHelp {
        name: "genres",
        args: "[query]",
        description: "List all genres, owned ones marked",
    },
    CommandHelp {
        name: "types",
        args: "[query]",
        description: "List all types, owned ones marked",
    },
    CommandHelp {
        name: "toggle",
        args: "<genre|type> <value>",
        description: "Add or remove an owned value",
    },
    CommandHelp {
        name: "select-all",
        args: "<genre|type>",
        description: "Own every value of a dimension",
    },
    CommandHelp {
        name: "clear-all",
        args: "<genre|type>",
        description: "Disown every value of a dimension",
    },
    CommandHelp {
        name: "inventory",
        args: "",
        description: "Show the owned selection",
    },
    CommandHelp {
        name: "where",
        args: "",
        description: "Show database and data paths",
    },
    CommandHelp {
        name: "help",
        args: "",
        description: "Show this help",
    },
    CommandHelp {
        name: "exit",
        args: "",
        description: "Close this program",
    },
];

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

fn universe_of(table: &ComboTable, dimension: Dimension) -> &[String] {
    match dimension {
        Dimension::Genre => table.all_genres(),
        Dimension::Type => table.all_types(),
    }
}

fn render_results(results: &[ComboResult]) {
    if results.is_empty() {
        cli_style::print_empty_list("Nothing to rate, own some genres and types first.");
        return;
    }
    let mut table = TableBuilder::new(vec!["Genre", "Type", "Rating"]);
    for result in results {
        table.add_row_colored(
            vec![&result.genre, &result.game_type, result.rating.label()],
            rating_color(result.rating),
        );
    }
    table.print();
    cli_style::print_info(&format!("{} combos", results.len()));
}

fn render_universe(label: &str, universe: &[String], owned: &[String], query: Option<&str>) {
    let owned_count = universe
        .iter()
        .filter(|value| owned.iter().any(|o| o == *value))
        .count();
    cli_style::print_section_header(&format!(
        "{} ({}/{} owned)",
        label,
        owned_count,
        universe.len()
    ));

    let query_lower = query.map(str::to_lowercase);
    let mut shown = 0;
    for value in universe {
        if let Some(q) = &query_lower {
            if !value.to_lowercase().contains(q.as_str()) {
                continue;
            }
        }
        shown += 1;
        let is_owned = owned.iter().any(|o| o == value);
        if is_owned {
            cli_style::print_list_item_styled(
                &format!("{} {}", box_chars::CHECK, value),
                colors::GREEN,
                1,
            );
        } else {
            cli_style::print_list_item_styled(&format!("  {}", value), colors::DIM, 1);
        }
    }
    if shown == 0 {
        if let Some(q) = query {
            cli_style::print_empty_list(&format!("No matches for '{}'.", q));
        }
    }
    cli_style::print_section_footer();
}

fn render_owned_group(title: &str, owned: &[String]) {
    println!(
        "  {} {}",
        box_chars::DIAMOND.with(colors::MAGENTA),
        title.with(colors::CYAN).bold()
    );
    if owned.is_empty() {
        cli_style::print_empty_list("(nothing owned yet)");
    } else {
        for value in owned {
            cli_style::print_list_item(value, 2);
        }
    }
    println!();
}

fn save_owned(
    store: &dyn InventoryStore,
    inventory: &Inventory,
    dimension: Dimension,
) -> Result<()> {
    store.set_owned(dimension, inventory.owned(dimension))
}

fn execute_command(
    line: String,
    table: &ComboTable,
    inventory: &mut Inventory,
    store: &dyn InventoryStore,
    db_path: &str,
    data_source: &str,
) -> CommandExecutionResult {
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => {
            cli_style::print_command_echo(&line);
            match cli.command {
                InnerCommand::Rate { genre, game_type } => {
                    match rate_one(table, &genre, &game_type) {
                        Some(result) => cli_style::print_key_value_colored(
                            &format!("{} × {}", result.genre, result.game_type),
                            result.rating.label(),
                            rating_color(result.rating),
                        ),
                        None => cli_style::print_warning(
                            "Nothing to rate, both a genre and a type are needed.",
                        ),
                    }
                }
                InnerCommand::Combos { filter } => {
                    let results = enumerate_all(table, inventory.genres(), inventory.types());
                    let results = filter_by_rating(results, filter);
                    render_results(&results);
                }
                InnerCommand::Best => {
                    let combos = best_combos(table, inventory.genres(), inventory.types());
                    if combos.is_empty() {
                        cli_style::print_empty_list(
                            "No Amazing combos with the current inventory.",
                        );
                    } else {
                        for (genre, game_type) in combos.iter() {
                            cli_style::print_list_item_styled(
                                &format!("{} {} × {}", box_chars::STAR, genre, game_type),
                                colors::GREEN,
                                1,
                            );
                        }
                        cli_style::print_info(&format!("{} Amazing combos", combos.len()));
                    }
                }
                InnerCommand::Genres { query } => {
                    render_universe(
                        "Genres",
                        table.all_genres(),
                        inventory.genres(),
                        query.as_deref(),
                    );
                }
                InnerCommand::Types { query } => {
                    render_universe(
                        "Types",
                        table.all_types(),
                        inventory.types(),
                        query.as_deref(),
                    );
                }
                InnerCommand::Toggle { dimension, value } => {
                    let known = universe_of(table, dimension).iter().any(|v| v == &value);
                    let now_owned = inventory.toggle(dimension, &value);
                    if let Err(err) = save_owned(store, inventory, dimension) {
                        inventory.toggle(dimension, &value);
                        return CommandExecutionResult::Error(format!("{}", err));
                    }
                    if now_owned {
                        cli_style::print_success(&format!(
                            "Now own {} '{}'",
                            dimension.noun(),
                            value
                        ));
                    } else {
                        cli_style::print_success(&format!(
                            "No longer own {} '{}'",
                            dimension.noun(),
                            value
                        ));
                    }
                    if !known {
                        cli_style::print_warning(&format!(
                            "'{}' is not a known {}, its pairings can only rate Not Bad.",
                            value,
                            dimension.noun()
                        ));
                    }
                }
                InnerCommand::SelectAll { dimension } => {
                    let previous = inventory.owned(dimension).to_vec();
                    let universe = universe_of(table, dimension).to_vec();
                    inventory.select_all(dimension, &universe);
                    if let Err(err) = save_owned(store, inventory, dimension) {
                        inventory.select_all(dimension, &previous);
                        return CommandExecutionResult::Error(format!("{}", err));
                    }
                    cli_style::print_success(&format!(
                        "Now own all {} {}s",
                        universe.len(),
                        dimension.noun()
                    ));
                }
                InnerCommand::ClearAll { dimension } => {
                    let previous = inventory.owned(dimension).to_vec();
                    inventory.clear(dimension);
                    if let Err(err) = save_owned(store, inventory, dimension) {
                        inventory.select_all(dimension, &previous);
                        return CommandExecutionResult::Error(format!("{}", err));
                    }
                    cli_style::print_success(&format!("Cleared all owned {}s", dimension.noun()));
                }
                InnerCommand::Inventory => {
                    cli_style::print_section_header("Owned Inventory");
                    println!();
                    let genres_owned = inventory.genres().len().to_string();
                    let genres_total = table.get_genres_count().to_string();
                    let types_owned = inventory.types().len().to_string();
                    let types_total = table.get_types_count().to_string();
                    let mut counts = TableBuilder::new(vec!["Dimension", "Owned", "Total"]);
                    counts.add_row(vec!["Genres", &genres_owned, &genres_total]);
                    counts.add_row(vec!["Types", &types_owned, &types_total]);
                    counts.print();
                    println!();
                    render_owned_group("Genres", inventory.genres());
                    render_owned_group("Types", inventory.types());
                    cli_style::print_section_footer();
                }
                InnerCommand::Where => {
                    cli_style::print_key_value("Inventory", db_path);
                    cli_style::print_key_value("Data", data_source);
                }
                InnerCommand::Exit => return CommandExecutionResult::Exit,
            }
        }

        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        match line.split_once(' ') {
            None => {
                let matches = self
                    .commands_names
                    .iter()
                    .filter(|c| c.starts_with(line))
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>();

                Ok((0, matches))
            }
            Some((command, rest)) => {
                // Commands taking a dimension get it completed too.
                if !matches!(command, "toggle" | "select-all" | "clear-all") || rest.contains(' ') {
                    return Ok((0, Vec::with_capacity(0)));
                }
                let matches = ["genre", "type"]
                    .iter()
                    .filter(|d| d.starts_with(rest))
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>();

                Ok((command.len() + 1, matches))
            }
        }
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

/// Runs the interactive console until `exit`, CTRL-C or CTRL-D.
pub fn run(
    table: &ComboTable,
    store: Box<dyn InventoryStore>,
    db_path: String,
    data_source: String,
) -> Result<()> {
    let mut inventory = load_inventory(store.as_ref())?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<MyHelper, FileHistory>::with_config(config)?;

    let helper = MyHelper::new();
    rl.set_helper(Some(helper));
    let _ = rl.clear_screen();

    cli_style::print_welcome(&db_path, &data_source);
    cli_style::print_help(COMMANDS);

    loop {
        let readline = rl.readline(PROMPT);

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(
                    line,
                    table,
                    &mut inventory,
                    store.as_ref(),
                    &db_path,
                    &data_source,
                ) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }
    cli_style::print_goodbye();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combos::Rating;

    fn parse(line: &str) -> Result<InnerCli, clap::Error> {
        let args = shlex::split(line).unwrap();
        InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)))
    }

    #[test]
    fn parses_rate_with_quoted_values() {
        let cli = parse("rate Educational \"Card Game\"").unwrap();
        match cli.command {
            InnerCommand::Rate { genre, game_type } => {
                assert_eq!(genre, "Educational");
                assert_eq!(game_type, "Card Game");
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn parses_toggle_with_a_dimension() {
        let cli = parse("toggle type Marathon").unwrap();
        match cli.command {
            InnerCommand::Toggle { dimension, value } => {
                assert_eq!(dimension, Dimension::Type);
                assert_eq!(value, "Marathon");
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn combos_filter_defaults_to_all() {
        let cli = parse("combos").unwrap();
        match cli.command {
            InnerCommand::Combos { filter } => assert_eq!(filter, RatingFilter::All),
            _ => panic!("parsed the wrong command"),
        }

        let cli = parse("combos amazing").unwrap();
        match cli.command {
            InnerCommand::Combos { filter } => {
                assert_eq!(filter, RatingFilter::Only(Rating::Amazing))
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn rejects_unknown_commands_and_dimensions() {
        assert!(parse("frobnicate").is_err());
        assert!(parse("toggle flavor RPG").is_err());
        assert!(parse("combos sideways").is_err());
    }

    #[test]
    fn helper_completes_commands_and_dimensions() {
        let helper = MyHelper::new();
        let ctx_history = rustyline::history::MemHistory::new();
        let ctx = rustyline::Context::new(&ctx_history);

        let (start, candidates) = helper.complete("to", 2, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(candidates, vec!["toggle".to_string()]);

        let (start, candidates) = helper.complete("toggle ge", 9, &ctx).unwrap();
        assert_eq!(start, 7);
        assert_eq!(candidates, vec!["genre".to_string()]);

        let (_, candidates) = helper.complete("rate RP", 7, &ctx).unwrap();
        assert!(candidates.is_empty());
    }

    use crate::combos::load_table;
    use crate::inventory::MemoryInventoryStore;
    use std::path::Path;

    fn run(
        line: &str,
        table: &ComboTable,
        inventory: &mut Inventory,
        store: &dyn InventoryStore,
    ) -> CommandExecutionResult {
        execute_command(line.to_string(), table, inventory, store, "db", "builtin")
    }

    #[test]
    fn toggle_saves_through_the_store() {
        let table = load_table::<&Path>(None).unwrap();
        let store = MemoryInventoryStore::default();
        let mut inventory = Inventory::default();

        let result = run("toggle genre RPG", &table, &mut inventory, &store);
        assert!(matches!(result, CommandExecutionResult::Ok));
        assert!(inventory.contains(Dimension::Genre, "RPG"));
        assert_eq!(store.get_owned(Dimension::Genre).unwrap(), ["RPG"]);

        // Toggling again disowns and saves the empty list
        run("toggle genre RPG", &table, &mut inventory, &store);
        assert!(!inventory.contains(Dimension::Genre, "RPG"));
        assert!(store.get_owned(Dimension::Genre).unwrap().is_empty());
    }

    #[test]
    fn select_all_and_clear_all_persist() {
        let table = load_table::<&Path>(None).unwrap();
        let store = MemoryInventoryStore::default();
        let mut inventory = Inventory::default();

        run("select-all type", &table, &mut inventory, &store);
        assert_eq!(inventory.types().len(), table.get_types_count());
        assert_eq!(
            store.get_owned(Dimension::Type).unwrap().len(),
            table.get_types_count()
        );

        run("clear-all type", &table, &mut inventory, &store);
        assert!(inventory.types().is_empty());
        assert!(store.get_owned(Dimension::Type).unwrap().is_empty());
    }

    #[test]
    fn exit_ends_the_loop_and_bad_commands_do_not() {
        let table = load_table::<&Path>(None).unwrap();
        let store = MemoryInventoryStore::default();
        let mut inventory = Inventory::default();

        let result = run("exit", &table, &mut inventory, &store);
        assert!(matches!(result, CommandExecutionResult::Exit));

        let result = run("frobnicate", &table, &mut inventory, &store);
        assert!(matches!(result, CommandExecutionResult::Ok));

        let result = run("", &table, &mut inventory, &store);
        assert!(matches!(result, CommandExecutionResult::Ok));
    }

    #[test]
    fn read_commands_leave_the_store_untouched() {
        let table = load_table::<&Path>(None).unwrap();
        let store = MemoryInventoryStore::default();
        let mut inventory = Inventory::default();
        run("toggle genre Puzzle", &table, &mut inventory, &store);
        run("toggle type Checkers", &table, &mut inventory, &store);

        for line in ["combos", "combos amazing", "best", "genres pu", "types", "inventory", "where", "rate Puzzle Checkers"] {
            let result = run(line, &table, &mut inventory, &store);
            assert!(matches!(result, CommandExecutionResult::Ok));
        }
        assert_eq!(store.get_owned(Dimension::Genre).unwrap(), ["Puzzle"]);
        assert_eq!(store.get_owned(Dimension::Type).unwrap(), ["Checkers"]);
    }
}
