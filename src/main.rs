//! modsulator - MODS record inspector

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use modsulator::{Record, RecordConfig};

#[derive(Parser)]
#[command(name = "modsulator")]
#[command(version, about = "Extract titles, names and languages from MODS records", long_about = None)]
#[command(after_help = "EXAMPLES:
    modsulator record.xml                         Show extracted fields
    modsulator --json record.xml                  Show extracted fields as JSON
    modsulator --term name.role.roleTerm rec.xml  Print matching element text
    modsulator https://example.org/mods/1.xml     Fetch and inspect a record")]
struct Cli {
    /// Input file path or http(s) URL
    #[arg(value_name = "INPUT")]
    input: String,

    /// Match elements in the MODS namespace instead of stripping namespaces
    #[arg(long)]
    namespace_aware: bool,

    /// Separator between a title and its subtitle
    #[arg(long, value_name = "D", default_value = modsulator::DEFAULT_TITLE_DELIMITER)]
    delimiter: String,

    /// Print extracted fields as JSON
    #[arg(long, conflicts_with = "term")]
    json: bool,

    /// Print the text of every node matching a dotted term path
    #[arg(long, value_name = "NAME[.SUB...]")]
    term: Option<String>,
}

#[derive(Serialize)]
struct Summary {
    id: Option<String>,
    version: Option<String>,
    short_titles: Vec<String>,
    full_titles: Vec<String>,
    alternative_titles: Vec<String>,
    sort_title: Option<String>,
    personal_names: Vec<String>,
    corporate_names: Vec<String>,
    languages: Vec<String>,
}

impl Summary {
    fn new(record: &Record) -> Self {
        Self {
            id: record.id().map(str::to_string),
            version: record.version().map(str::to_string),
            short_titles: record.short_titles(),
            full_titles: record.full_titles(),
            alternative_titles: record.alternative_titles(),
            sort_title: record.sort_title(),
            personal_names: record.personal_names(),
            corporate_names: record.corporate_names(),
            languages: record.languages(),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = RecordConfig::new()
        .with_namespace_aware(cli.namespace_aware)
        .with_title_delimiter(cli.delimiter.as_str());
    let mut record = Record::with_config(config);

    let loaded = if is_url(&cli.input) {
        record.load_url(&cli.input)
    } else {
        record.load_file(&cli.input)
    };
    loaded.map_err(|e| format!("{}: {e}", cli.input))?;

    if let Some(ref term) = cli.term {
        let nodes = record.query(term).map_err(|e| e.to_string())?;
        for text in nodes.texts() {
            println!("{}", text.trim());
        }
        return Ok(());
    }

    let summary = Summary::new(&record);
    if cli.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print_summary(&cli.input, &summary);
    }
    Ok(())
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn print_summary(input: &str, summary: &Summary) {
    println!("Record: {input}");
    if let Some(ref id) = summary.id {
        println!("ID: {id}");
    }
    if let Some(ref version) = summary.version {
        println!("MODS version: {version}");
    }
    print_list("Title", &summary.full_titles);
    print_list("Alternative title", &summary.alternative_titles);
    if let Some(ref sort) = summary.sort_title {
        println!("Sort title: {sort}");
    }
    print_list("Author", &summary.personal_names);
    print_list("Organization", &summary.corporate_names);
    if !summary.languages.is_empty() {
        println!("Languages: {}", summary.languages.join(", "));
    }
}

fn print_list(label: &str, values: &[String]) {
    for value in values {
        println!("{label}: {value}");
    }
}
