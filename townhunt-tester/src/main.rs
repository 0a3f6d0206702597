mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;
use townhunt_game::TownConfig;

use common::split_csv;
use logic::{LogicTester, ScenarioResult, get_scenario, list_scenarios, resolve_seed_inputs};

#[derive(Debug, Parser)]
#[command(name = "townhunt-tester", version = "0.1.0")]
#[command(about = "Seeded logic checks for Townhunt towns")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// JSON file with town settings (`toughness`, `easy_mode`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Probability in [0, 1] that a town is tough; overrides the config file
    #[arg(long)]
    toughness: Option<f64>,

    /// Never break crossing items
    #[arg(long)]
    easy: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let config = resolve_config(&args)?;
    info!(
        "town config: toughness={} easy_mode={}",
        config.toughness, config.easy_mode
    );
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    debug!("seeds: {seeds:?}");

    let results = run_logic_scenarios(&args, config, &scenarios, &seeds);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏘️  Townhunt Logic Tester".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

fn load_config_file(path: &Path) -> Result<TownConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    TownConfig::from_json(&raw).with_context(|| format!("invalid town config {}", path.display()))
}

fn resolve_config(args: &Args) -> Result<TownConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => TownConfig::default(),
    };
    if let Some(toughness) = args.toughness {
        config.toughness = toughness;
    }
    if args.easy {
        config.easy_mode = true;
    }
    config.validate().context("invalid --toughness")?;
    Ok(config)
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in logic::scenario_keys() {
            if !scenarios.contains(&key) {
                scenarios.push(key);
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    config: TownConfig,
    scenarios: &[String],
    seeds: &[u64],
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(config, args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(tester.run_scenario(scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Townhunt Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            let duration = start_time.elapsed();
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(&mut output_target, results, duration)?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            config: None,
            toughness: None,
            easy: false,
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "townhunt-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn all_expands_to_every_scenario_once() {
        let scenarios = expand_scenarios("treasure-run,all");
        assert_eq!(scenarios.len(), logic::scenario_keys().len());
        assert_eq!(scenarios[0], "treasure-run");
        assert!(scenarios.contains(&"smoke".to_string()));
    }

    #[test]
    fn cli_flags_override_config_file() {
        let path = temp_path("config");
        std::fs::write(&path, r#"{"toughness": 0.2}"#).expect("write config");
        let mut args = base_args();
        args.config = Some(path.clone());
        let config = resolve_config(&args).expect("valid config");
        assert!((config.toughness - 0.2).abs() < f64::EPSILON);
        assert!(!config.easy_mode);

        args.toughness = Some(0.9);
        args.easy = true;
        let config = resolve_config(&args).expect("valid config");
        assert!((config.toughness - 0.9).abs() < f64::EPSILON);
        assert!(config.easy_mode);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn out_of_range_toughness_is_rejected() {
        let mut args = base_args();
        args.toughness = Some(1.5);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let mut args = base_args();
        args.config = Some(PathBuf::from("/nonexistent/town.json"));
        let err = resolve_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/town.json"));
    }

    #[test]
    fn json_report_writes_to_output_file() {
        let path = temp_path("report");
        let mut args = base_args();
        args.output = Some(path.clone());
        let config = resolve_config(&args).expect("default config");
        let results = run_logic_scenarios(&args, config, &["smoke".to_string()], &[5]);
        write_reports(&args, &results, Instant::now()).expect("report written");
        let content = std::fs::read_to_string(&path).expect("read report");
        let parsed: Vec<ScenarioResult> = serde_json::from_str(&content).expect("json");
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].passed);
        let _ = std::fs::remove_file(path);
    }
}
