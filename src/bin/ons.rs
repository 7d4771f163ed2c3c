use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use ons_rs::config::{DEFAULT_BASE_URL, DEFAULT_EDITION};
use ons_rs::{Client, ClientConfig, Dimensions, Selection};
use ons_rs::{stats, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ons",
    version,
    about = "List the dimensions of an ONS dataset and fetch its time series"
)]
struct Cli {
    /// Dataset id (e.g., cpih01)
    #[arg(short, long, default_value = "cpih01")]
    dataset: String,
    /// Fix a dimension to a value, NAME=VALUE (repeatable; VALUE may be *).
    /// Unset dimensions take their first option; time is wildcarded.
    #[arg(short, long = "select", value_parser = parse_pair)]
    select: Vec<(String, String)>,
    /// Print the titles of all published datasets and exit.
    #[arg(long, default_value_t = false)]
    list_datasets: bool,
    /// Edition to query when the dataset publishes several.
    #[arg(long, default_value = DEFAULT_EDITION)]
    edition: String,
    /// API root.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Save observations to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print summary statistics of the observation values.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let (k, v) = (k.trim(), v.trim());
    if k.is_empty() || v.is_empty() {
        return Err(format!("expected NAME=VALUE, got '{s}'"));
    }
    Ok((k.to_string(), v.to_string()))
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn print_dimensions(dims: &Dimensions) {
    for dim in dims.values() {
        println!(
            "{} ({} options){}",
            dim.name,
            dim.options.len(),
            dim.label
                .as_deref()
                .map(|l| format!(": {l}"))
                .unwrap_or_default()
        );
        for o in &dim.options {
            println!("    {:<24} {}", o.option, o.label.as_deref().unwrap_or(""));
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ClientConfig::default()
        .with_base_url(cli.base_url.as_str())
        .with_edition(cli.edition.as_str());
    let client = Client::new(config).context("build HTTP client")?;

    if cli.list_datasets {
        let datasets = client.list_datasets().context("list datasets")?;
        for d in &datasets {
            println!("{:<40} {}", d.id, d.title);
        }
        return Ok(());
    }

    let version_url = client
        .version_url(&cli.dataset)
        .with_context(|| format!("resolve dataset {}", cli.dataset))?;
    let dims = client
        .dimensions_at(&version_url)
        .with_context(|| format!("list dimensions of {}", cli.dataset))?;
    println!("{}", "=".repeat(70));
    println!("Dimensions of {} ({})", cli.dataset, version_url);
    print_dimensions(&dims);

    let overrides: Selection = cli.select.iter().cloned().collect();
    let selection = ons_rs::choose_dimensions(&dims, &overrides);
    println!("{}", "=".repeat(70));
    println!("Selection:");
    for (name, choice) in selection.iter() {
        println!("    {name} = {choice}");
    }

    let response = client
        .observations_at(&version_url, &selection)
        .with_context(|| format!("fetch observations of {}", cli.dataset))?;
    let mut observations = response.observations;
    stats::sort_chronologically(&mut observations);

    println!("{}", "=".repeat(70));
    if let Some(unit) = response.unit_of_measure.as_deref() {
        println!("Unit: {unit}");
    }
    for o in &observations {
        let time = o.time().map(|t| t.id.as_str()).unwrap_or("-");
        println!("{:<16} {}", time, o.observation);
    }

    if let Some(path) = cli.out.as_ref() {
        let fmt = match cli.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&observations, path)?,
            "json" => storage::save_json(&observations, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", observations.len(), path.display());
    }

    if cli.stats {
        let s = stats::summarize(&observations);
        println!(
            "count={} missing={}  min={} max={} mean={} median={}",
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }

    Ok(())
}
