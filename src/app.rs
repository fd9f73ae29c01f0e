use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::fetcher;
use crate::filters::{self, FilterSelection, ALL_LABEL};
use crate::output;
use crate::view::{self, tui, Card, UiState};

fn print_banner(no_color: bool) {
    let _ = no_color;
    const BANNER: &str = r#"
 _ __ ___   __ _ _ __ __ _  ___ _ __ ___
| '_ ` _ \ / _` | '__/ _` |/ _ \ '_ ` _ \
| | | | | | (_| | | | (_| |  __/ | | | | |
|_| |_| |_|\__,_|_|  \__, |\___|_| |_| |_|
                     |___/
       v0.2.0 - company margin dashboard
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

#[derive(Clone, Debug)]
struct RunConfig {
    endpoint: String,
    timeout: u64,
    once: bool,
    filter: FilterSelection,
    output: Option<String>,
    output_format: Option<output::OutputFormat>,
    no_color: bool,
}

fn parse_filter(raw: &str) -> FilterSelection {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_LABEL) {
        FilterSelection::All
    } else {
        FilterSelection::Location(trimmed.to_string())
    }
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let endpoint = args
        .url
        .or(cfg.url)
        .unwrap_or_else(|| fetcher::DEFAULT_ENDPOINT.to_string());
    if reqwest::Url::parse(&endpoint).is_err() {
        return Err(format!("invalid endpoint URL '{endpoint}'"));
    }

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    let once = args.once || cfg.once.unwrap_or(false);
    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let filter = args
        .filter
        .or(cfg.filter)
        .map(|raw| parse_filter(&raw))
        .unwrap_or_default();

    let output = args.output.or(cfg.output);
    let output_format_raw = args.output_format.or(cfg.output_format);
    let output_format = match (output.as_deref(), output_format_raw.as_deref()) {
        (_, Some(raw)) => Some(
            output::OutputFormat::parse(raw)
                .ok_or_else(|| format!("invalid output format '{raw}', expected text or json"))?,
        ),
        (Some(path), None) => Some(
            output::infer_format_from_path(path).unwrap_or(output::OutputFormat::Text),
        ),
        (None, None) => None,
    };

    Ok(RunConfig {
        endpoint,
        timeout,
        once,
        filter,
        output,
        output_format,
        no_color,
    })
}

fn print_card(card: &Card) {
    let badge = match card.margin.as_deref() {
        Some(margin) if margin.starts_with('-') => margin.bold().red(),
        Some(margin) => margin.bold().green(),
        None => "n/a".bold().yellow(),
    };
    println!(
        "{}{}{} {} {}{}{}",
        "[".bold().white(),
        badge,
        "]".bold().white(),
        card.title.bold().cyan(),
        "(".bold().white(),
        card.location.bold().blue(),
        ")".bold().white(),
    );
    println!("     {} {}", "gross :".bold().white(), card.gross_profit);
    println!("     {} {}", "debt  :".bold().white(), card.debt);
    println!("     {} {}", "net   :".bold().white(), card.net_profit);
}

async fn run_once(run: &RunConfig, client: &reqwest::Client) -> Result<(), String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg}")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    pb.set_message("fetching dataset...");

    let result = fetcher::fetch_dataset(client, &run.endpoint).await;
    pb.finish_and_clear();

    let dataset = match result {
        Ok(dataset) => dataset,
        Err(e) => {
            println!(
                "{}{}{} {}",
                "[".bold().white(),
                "ERR".bold().red(),
                "]".bold().white(),
                e.to_string().bold().white()
            );
            return Err(e.to_string());
        }
    };

    let filter_index = filters::derive_filters(&dataset);
    let summary = filter_index
        .iter()
        .map(|e| format!("{} ({})", e.label, e.count))
        .collect::<Vec<_>>()
        .join(", ");
    format_kv_line("endpoint", &run.endpoint);
    format_kv_line("records", &dataset.len().to_string());
    format_kv_line("filters", &summary);
    format_kv_line("filter", run.filter.label());
    println!();

    let cards = view::build_cards(&dataset, &run.filter);
    match view::ui_state_for(&cards) {
        UiState::Empty => {
            println!(
                "{}{}{} {}",
                "[".bold().white(),
                "~".bold().yellow(),
                "]".bold().white(),
                "no records match the current filter".bold().white()
            );
        }
        _ => {
            for card in &cards {
                print_card(card);
            }
        }
    }

    if let Some(outfile_path) = run.output.as_deref() {
        let format = run.output_format.unwrap_or(output::OutputFormat::Text);
        let records = output::build_records(&dataset, &run.filter);
        let rendered = match format {
            output::OutputFormat::Text => output::render_text(&records),
            output::OutputFormat::Json => output::render_json(&records),
        };

        let mut outfile = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(outfile_path)
            .await
            .map_err(|e| format!("failed to open output file: {e}"))?;
        outfile
            .write_all(&rendered)
            .await
            .map_err(|_| "failed to write output file".to_string())?;

        println!();
        format_kv_line("output", outfile_path);
    }

    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let client = fetcher::build_client(run.timeout).map_err(|e| e.to_string())?;

    if run.once {
        print_banner(run.no_color);
        run_once(&run, &client).await
    } else {
        let initial_filter = match &run.filter {
            FilterSelection::All => None,
            FilterSelection::Location(location) => Some(location.clone()),
        };
        tui::run_dashboard(client, run.endpoint.clone(), initial_filter).await
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();

    if args.init_config {
        let path = config::default_config_path()
            .ok_or_else(|| "could not determine home directory".to_string())?;
        config::ensure_default_config_file(&path)?;
        format_kv_line("config", &path.display().to_string());
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
