//! cordex - Terminal Explorer for CORD-19 Metadata

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cordex::export::{export_to_dir, write_to};
use cordex::render::ui::{ColorTheme, TerminalUI};
use cordex::{
    Application, DataStore, Dataset, FilterCriteria, Settings, SettingsOverrides, Snapshot,
    ThemeName, YearRange,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

fn file_arg() -> Arg {
    Arg::new("file")
        .help("Path to the CORD-19 metadata CSV")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .index(1)
}

fn filter_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("keyword")
                .long("keyword")
                .short('k')
                .help("Case-insensitive substring matched against title and abstract"),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_parser(value_parser!(i32))
                .help("First publication year to include"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_parser(value_parser!(i32))
                .help("Last publication year to include"),
        )
        .arg(
            Arg::new("journal")
                .long("journal")
                .short('j')
                .action(ArgAction::Append)
                .help("Keep only this journal (repeatable)"),
        )
}

fn build_cli() -> Command {
    Command::new("cordex")
        .version(cordex::VERSION)
        .about("Interactive terminal explorer for CORD-19 publication metadata")
        .long_about(
            "cordex loads a CORD-19 metadata.csv and shows a live dashboard of the papers that \
             match a keyword, a year range and a set of journals: a preview table, publications \
             per year, top journals and a title term cloud.",
        )
        .args_conflicts_with_subcommands(true)
        .arg(file_arg().required(false))
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Settings file (default: <config dir>/cordex/config.toml)"),
        )
        .arg(
            Arg::new("preview-rows")
                .long("preview-rows")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Rows shown in the preview table"),
        )
        .arg(
            Arg::new("top")
                .long("top")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Number of journals in the top journals chart"),
        )
        .arg(
            Arg::new("export-dir")
                .long("export-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory receiving cord19_filtered.csv"),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .global(true)
                .value_parser(["default", "monochrome", "high-contrast"])
                .help("Color theme"),
        )
        .subcommand(filter_args(
            Command::new("summary")
                .about("Print match count, year counts, top journals and top title terms")
                .arg(file_arg()),
        ))
        .subcommand(filter_args(
            Command::new("export")
                .about("Write the filtered records as CSV")
                .arg(file_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file, or '-' for stdout (default: <export-dir>/cord19_filtered.csv)"),
                ),
        ))
}

fn load_settings(matches: &ArgMatches) -> Result<Settings> {
    let theme = matches
        .get_one::<String>("theme")
        .map(|name| name.parse::<ThemeName>())
        .transpose()?;
    let overrides = SettingsOverrides {
        preview_rows: matches.get_one::<usize>("preview-rows").copied(),
        top_sources: matches.get_one::<usize>("top").copied(),
        export_dir: matches.get_one::<PathBuf>("export-dir").cloned(),
        theme,
    };

    let config_path = matches.get_one::<PathBuf>("config");
    let settings = Settings::load(config_path.map(PathBuf::as_path))?;
    Ok(settings.with_overrides(&overrides))
}

fn criteria_from(matches: &ArgMatches, dataset: &Dataset) -> FilterCriteria {
    let keyword = matches.get_one::<String>("keyword").cloned().unwrap_or_default();
    let year_range = YearRange::from_bounds(
        matches.get_one::<i32>("from").copied(),
        matches.get_one::<i32>("to").copied(),
        dataset.year_bounds(),
    );
    let journals = matches
        .get_many::<String>("journal")
        .into_iter()
        .flatten()
        .cloned();

    FilterCriteria::new()
        .with_keyword(keyword)
        .with_year_range(year_range)
        .with_journals(journals)
}

fn required_file(matches: &ArgMatches) -> Result<PathBuf> {
    match matches.get_one::<PathBuf>("file") {
        Some(path) => Ok(path.clone()),
        None => bail!("a metadata CSV file is required (see --help)"),
    }
}

fn run_summary(matches: &ArgMatches, settings: &Settings) -> Result<()> {
    let store = DataStore::from_path(required_file(matches)?);
    let dataset = store.load()?;
    let criteria = criteria_from(matches, dataset);
    let snapshot = Snapshot::compute(dataset, &criteria, settings);

    let stdout = io::stdout();
    snapshot
        .write_report(stdout.lock(), settings.cloud_terms)
        .context("failed to write summary")?;
    Ok(())
}

fn run_export(matches: &ArgMatches, settings: &Settings) -> Result<()> {
    let store = DataStore::from_path(required_file(matches)?);
    let dataset = store.load()?;
    let criteria = criteria_from(matches, dataset);
    let snapshot = Snapshot::compute(dataset, &criteria, settings);

    match matches.get_one::<PathBuf>("output") {
        Some(path) if path.as_os_str() == "-" => {
            write_to(dataset.schema(), snapshot.view.iter(), io::stdout().lock())?;
        }
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_to(dataset.schema(), snapshot.view.iter(), &mut writer)?;
            writer.flush()?;
            eprintln!("{} -> {}", snapshot.summary_line(), path.display());
        }
        None => {
            let path = export_to_dir(dataset.schema(), &snapshot.view, &settings.export_dir)?;
            eprintln!("{} -> {}", snapshot.summary_line(), path.display());
        }
    }
    Ok(())
}

async fn run_dashboard(matches: &ArgMatches, settings: Settings) -> Result<()> {
    let file_path = required_file(matches)?;
    let ui_renderer = Box::new(TerminalUI::with_theme(
        ColorTheme::from_name(settings.theme),
        settings.cloud_terms,
    ));
    let mut app = Application::new(DataStore::from_path(file_path), settings, ui_renderer);

    app.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG)
    env_logger::init();

    let matches = build_cli().get_matches();
    let settings = load_settings(&matches)?;

    match matches.subcommand() {
        Some(("summary", sub)) => run_summary(sub, &settings),
        Some(("export", sub)) => run_export(sub, &settings),
        _ => run_dashboard(&matches, settings).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!cordex::VERSION.is_empty());
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let matches = build_cli()
            .try_get_matches_from([
                "cordex", "summary", "m.csv", "--top", "3", "--from", "2020", "-j", "Nature",
                "-j", "Lancet",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "summary");
        assert_eq!(sub.get_one::<usize>("top"), Some(&3));
        assert_eq!(sub.get_one::<i32>("from"), Some(&2020));
        assert_eq!(sub.get_many::<String>("journal").unwrap().count(), 2);
    }

    #[test]
    fn criteria_complete_single_year_bound() {
        let dataset = Dataset::parse(b"title,publish_time\na,2018\nb,2022\n").unwrap();
        let matches = build_cli()
            .try_get_matches_from(["cordex", "export", "m.csv", "--from", "2020", "-k", "x"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();

        let criteria = criteria_from(sub, &dataset);
        assert_eq!(criteria.keyword, "x");
        assert_eq!(criteria.year_range, Some(YearRange::new(2020, 2022)));
        assert!(criteria.journals.is_empty());
    }

    #[test]
    fn dashboard_takes_positional_file() {
        let matches = build_cli()
            .try_get_matches_from(["cordex", "--theme", "monochrome", "m.csv"])
            .unwrap();
        assert!(matches.subcommand().is_none());
        assert_eq!(required_file(&matches).unwrap(), PathBuf::from("m.csv"));
        assert_eq!(
            matches.get_one::<String>("theme").map(String::as_str),
            Some("monochrome")
        );
    }
}
