use std::{env, path::Path};

use strsim::levenshtein;
use thiserror::Error;
use tracing::{debug, warn};

use super::output;
use crate::{
    config::{Config, ConfigManager},
    core::{Aggregator, LedgerManager},
    errors::{ConfigError, LedgerError},
    ledger::{date, Deferred, Ledger, LedgerEvent, Partition, Row, SortKey},
    storage::{with_mbf_extension, MbfStorage},
    utils::build_info,
};

/// Every command name the host understands.
pub const COMMANDS: [&str; 13] = [
    "summary",
    "rows",
    "categories",
    "daily",
    "add",
    "remove",
    "budget",
    "category-add",
    "category-remove",
    "sort",
    "new",
    "version",
    "help",
];

const MAX_SUGGESTION_DISTANCE: usize = 3;
const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("usage: mbf_cli {0}")]
    Usage(&'static str),
    #[error("unknown command `{input}`{}", hint(.suggestion))]
    UnknownCommand {
        input: String,
        suggestion: Option<String>,
    },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(best) => format!(" (did you mean `{best}`?)"),
        None => String::new(),
    }
}

/// Closest candidate to `input`, ignoring case, when it is close enough to be
/// a likely typo.
pub fn suggest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let needle = input.to_lowercase();
    candidates
        .into_iter()
        .map(|candidate| (levenshtein(&needle, &candidate.to_lowercase()), candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

pub fn run_cli() -> Result<(), CliError> {
    run(env::args().skip(1).collect())
}

pub fn run(args: Vec<String>) -> Result<(), CliError> {
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        return Err(CliError::Usage("<command> [arguments]"));
    };

    match command.as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" => {
            println!("{}", build_info::current());
            Ok(())
        }
        "new" => new_ledger(rest),
        "summary" => summary(rest),
        "rows" => list_rows(rest),
        "categories" => category_totals(rest),
        "daily" => daily(rest),
        "add" => add_row(rest),
        "remove" => remove_row(rest),
        "budget" => set_budget(rest),
        "category-add" => category_add(rest),
        "category-remove" => category_remove(rest),
        "sort" => sort_rows(rest),
        other => Err(CliError::UnknownCommand {
            input: other.to_string(),
            suggestion: suggest(other, COMMANDS).map(str::to_string),
        }),
    }
}

/// A loaded ledger plus the preferences it was opened with.
struct Session {
    config_manager: ConfigManager,
    config: Config,
    manager: LedgerManager,
}

impl Session {
    fn start() -> Result<Self, CliError> {
        let config_manager = ConfigManager::new();
        let config = config_manager.load()?;
        let defaults = config.default_category_list();
        let ledger = Ledger::with_categories(defaults.clone());
        let mut manager = LedgerManager::with_ledger(Box::new(MbfStorage::new(defaults)), ledger);
        manager.ledger_mut().subscribe(
            |event: &LedgerEvent, ledger: &Ledger, _deferred: &mut Deferred| {
                debug!(?event, rows = ledger.row_count(), "ledger changed");
            },
        );
        Ok(Self {
            config_manager,
            config,
            manager,
        })
    }

    fn open(file: &str) -> Result<Self, CliError> {
        let mut session = Self::start()?;
        let path = Path::new(file);
        let metadata = session.manager.open(path)?;
        for warning in &metadata.warnings {
            output::warning(warning);
        }
        if metadata.skipped_lines > 0 {
            output::warning(format!(
                "{} line(s) without a fixed/variable tag were skipped",
                metadata.skipped_lines
            ));
        }
        session.remember(path);
        Ok(session)
    }

    fn ledger(&self) -> &Ledger {
        self.manager.ledger()
    }

    fn ledger_mut(&mut self) -> &mut Ledger {
        self.manager.ledger_mut()
    }

    fn save(&mut self) -> Result<(), CliError> {
        let path = self.manager.save()?;
        output::success(format!("Saved {}", path.display()));
        Ok(())
    }

    fn remember(&mut self, path: &Path) {
        self.config.last_opened = Some(path.to_path_buf());
        if let Err(err) = self.config_manager.save(&self.config) {
            warn!(error = %err, "could not record the last opened file");
        }
    }

    /// Fails with a suggestion when `name` is not one of the ledger's
    /// categories.
    fn require_category(&self, name: &str) -> Result<(), CliError> {
        let categories = self.ledger().categories();
        if categories.contains(name) {
            return Ok(());
        }
        let suggestion = suggest(name, categories.iter()).map(str::to_string);
        Err(LedgerError::InvalidCategory(format!("`{name}`{}", hint(&suggestion))).into())
    }
}

fn parse_index(text: &str) -> Result<usize, LedgerError> {
    text.parse()
        .map_err(|_| LedgerError::InvalidInput(format!("`{text}` is not a row index")))
}

fn parse_amount(text: &str) -> Result<f64, LedgerError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LedgerError::InvalidAmount(text.to_string()))
}

fn new_ledger(args: &[String]) -> Result<(), CliError> {
    let (file, budget) = match args {
        [file] => (file, None),
        [file, budget] => (file, Some(parse_amount(budget)?)),
        _ => return Err(CliError::Usage("new <file> [budget]")),
    };
    let mut session = Session::start()?;
    let path = with_mbf_extension(Path::new(file));
    if path.exists() {
        return Err(
            LedgerError::InvalidInput(format!("`{}` already exists", path.display())).into(),
        );
    }
    if let Some(budget) = budget {
        session.ledger_mut().set_budget(budget);
    }
    let saved = session.manager.save_as(&path)?;
    session.remember(&saved);
    output::success(format!("Created {}", saved.display()));
    Ok(())
}

fn summary(args: &[String]) -> Result<(), CliError> {
    let [file] = args else {
        return Err(CliError::Usage("summary <file>"));
    };
    let session = Session::open(file)?;
    let ledger = session.ledger();
    let totals = Aggregator::summary(ledger)?;

    output::section(file);
    println!("Budget:    {:.2}", totals.budget);
    println!("Spent:     {:.2}", totals.spent);
    println!("Remaining: {:.2}", totals.remaining);
    for partition in Partition::ALL {
        println!("{} rows: {}", partition.label(), ledger.rows(partition).len());
    }
    Ok(())
}

fn list_rows(args: &[String]) -> Result<(), CliError> {
    let (file, only) = match args {
        [file] => (file, None),
        [file, partition] => (file, Some(partition.parse::<Partition>()?)),
        _ => return Err(CliError::Usage("rows <file> [fixed|variable]")),
    };
    let session = Session::open(file)?;
    for partition in Partition::ALL {
        if only.is_some_and(|wanted| wanted != partition) {
            continue;
        }
        output::section(partition.label());
        let rows = session.ledger().rows(partition);
        if rows.is_empty() {
            output::info("No rows.");
        }
        for (index, row) in rows.iter().enumerate() {
            println!("{index:>3}  {row}");
        }
    }
    Ok(())
}

fn category_totals(args: &[String]) -> Result<(), CliError> {
    let (file, only) = match args {
        [file] => (file, None),
        [file, partition] => (file, Some(partition.parse::<Partition>()?)),
        _ => return Err(CliError::Usage("categories <file> [fixed|variable]")),
    };
    let session = Session::open(file)?;
    let slices: Vec<(String, f64)> = match only {
        None => Aggregator::pie_slices(session.ledger())?,
        Some(partition) => Aggregator::by_category_in(session.ledger(), partition)?
            .into_iter()
            .collect(),
    };
    output::section("Totals by category");
    for (category, total) in slices {
        println!("{category:<20} {}", output::money(total));
    }
    Ok(())
}

fn daily(args: &[String]) -> Result<(), CliError> {
    let [file, category, partition] = args else {
        return Err(CliError::Usage("daily <file> <category|all> <fixed|variable>"));
    };
    let partition = partition.parse::<Partition>()?;
    let session = Session::open(file)?;
    let ledger = session.ledger();
    let totals = if category.eq_ignore_ascii_case(ALL_CATEGORIES) {
        Aggregator::daily_totals(ledger, partition, date::days_in_current_month())?
    } else {
        if let Err(err) = session.require_category(category) {
            output::warning(err);
        }
        Aggregator::by_day(ledger, category, partition)?
    };

    output::section(format!("{category} ({partition}) by day"));
    for (day, total) in &totals {
        println!("{day:>2}  {}", output::money(*total));
    }
    println!("Total: {}", output::money(totals.values().sum()));
    Ok(())
}

fn add_row(args: &[String]) -> Result<(), CliError> {
    let [file, partition, date_text, category, name, amount] = args else {
        return Err(CliError::Usage(
            "add <file> <fixed|variable> <date|today> <category> <name> <amount>",
        ));
    };
    let partition = partition.parse::<Partition>()?;
    let mut session = Session::open(file)?;
    session.require_category(category)?;
    let date_text = if date_text.eq_ignore_ascii_case("today") {
        date::today()
    } else {
        date_text.clone()
    };
    let row = Row::from_input(&date_text, category, name, amount)?;
    output::info(format!("Adding {row} to {partition}"));
    session.ledger_mut().add_row(partition, row);
    session.save()
}

fn remove_row(args: &[String]) -> Result<(), CliError> {
    let [file, partition, index] = args else {
        return Err(CliError::Usage("remove <file> <fixed|variable> <index>"));
    };
    let partition = partition.parse::<Partition>()?;
    let index = parse_index(index)?;
    let mut session = Session::open(file)?;
    let removed = session.ledger_mut().remove_row(partition, index)?;
    output::info(format!("Removed {removed}"));
    session.save()
}

fn set_budget(args: &[String]) -> Result<(), CliError> {
    let [file, amount] = args else {
        return Err(CliError::Usage("budget <file> <amount>"));
    };
    let amount = parse_amount(amount)?;
    let mut session = Session::open(file)?;
    session.ledger_mut().set_budget(amount);
    output::info(format!("Budget set to {:.2}", session.ledger().budget()));
    session.save()
}

fn category_add(args: &[String]) -> Result<(), CliError> {
    let [file, name] = args else {
        return Err(CliError::Usage("category-add <file> <name>"));
    };
    let mut session = Session::open(file)?;
    if !session.ledger_mut().add_category(name)? {
        output::info(format!("`{name}` is already a category"));
        return Ok(());
    }
    session.save()
}

fn category_remove(args: &[String]) -> Result<(), CliError> {
    let [file, name] = args else {
        return Err(CliError::Usage("category-remove <file> <name>"));
    };
    let mut session = Session::open(file)?;
    session.require_category(name)?;
    session.ledger_mut().remove_category(name);
    session.save()
}

fn sort_rows(args: &[String]) -> Result<(), CliError> {
    let [file, partition, key] = args else {
        return Err(CliError::Usage(
            "sort <file> <fixed|variable> <name|date|money|money-abs>",
        ));
    };
    let partition = partition.parse::<Partition>()?;
    let key = key.parse::<SortKey>()?;
    let mut session = Session::open(file)?;
    session.ledger_mut().sort_rows(partition, key)?;
    session.save()
}

fn print_usage() {
    output::section("mbf_cli");
    println!("Usage: mbf_cli <command> [arguments]");
    println!();
    println!("  new <file> [budget]                       create an empty ledger");
    println!("  summary <file>                            budget, spent and remaining");
    println!("  rows <file> [fixed|variable]              list rows with their index");
    println!("  categories <file> [fixed|variable]        totals by category");
    println!("  daily <file> <category|all> <partition>   totals by day of this month");
    println!("  add <file> <partition> <date> <category> <name> <amount>");
    println!("  remove <file> <partition> <index>");
    println!("  budget <file> <amount>");
    println!("  category-add <file> <name>");
    println!("  category-remove <file> <name>");
    println!("  sort <file> <partition> <name|date|money|money-abs>");
    println!("  version");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_tolerate_typos_and_case() {
        assert_eq!(suggest("sumary", COMMANDS), Some("summary"));
        assert_eq!(suggest("FOD", ["Food", "Rent"]), Some("Food"));
        assert_eq!(suggest("completely-unrelated", COMMANDS), None);
    }

    #[test]
    fn unknown_command_message_carries_hint() {
        let err = run(vec!["categores".into()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown command `categores` (did you mean `categories`?)"
        );
    }

    #[test]
    fn wrong_arity_is_a_usage_error() {
        let err = run(vec!["remove".into(), "a.mbf".into()]).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn amounts_must_be_finite_numbers() {
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("twelve").is_err());
    }
}
