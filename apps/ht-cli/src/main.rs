use clap::{Args, Parser, Subcommand};
use ht_core::{degc, display_degc, display_m, display_s, s};
use ht_project::{Overrides, Preset, ProjectError, Scenario, ValidationError, validate_scenario};
use ht_results::{LabeledRun, LoopMetrics, RunComparison, RunManifest, RunRecord};
use ht_sim::{SimError, SimulationParameters, kp_range, simulate, sweep};
use std::path::{Path, PathBuf};
use tracing::info;

type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Results(#[from] ht_results::ResultsError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Give either a scenario file or --preset, not both")]
    AmbiguousSource,

    #[error("Nothing to compare: pass at least one override")]
    NoOverrides,

    #[error("Invalid sweep: {0}")]
    InvalidSweep(&'static str),
}

#[derive(Parser)]
#[command(name = "ht-cli")]
#[command(about = "Heated tank PID simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scenario and print loop metrics
    Run {
        #[command(flatten)]
        source: ScenarioSource,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Write the trace as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write manifest, metrics and trace as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Print a preset scenario as YAML
    Defaults {
        /// Preset name (steam-heated, flow-through, level-tracking)
        #[arg(long, default_value = "steam-heated")]
        preset: String,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a scenario before and after overrides and compare the responses
    Compare {
        #[command(flatten)]
        source: ScenarioSource,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Sweep the proportional gain over a range in parallel
    Sweep {
        #[command(flatten)]
        source: ScenarioSource,
        #[arg(long)]
        kp_min: f64,
        #[arg(long)]
        kp_max: f64,
        /// Number of runs
        #[arg(long, default_value_t = 8)]
        count: usize,
    },
}

#[derive(Args)]
struct ScenarioSource {
    /// Path to the scenario YAML or JSON file
    scenario_path: Option<PathBuf>,
    /// Use a built-in preset instead of a file
    #[arg(long)]
    preset: Option<String>,
}

impl ScenarioSource {
    fn load(&self) -> CliResult<Scenario> {
        match (&self.scenario_path, &self.preset) {
            (Some(_), Some(_)) => Err(CliError::AmbiguousSource),
            (Some(path), None) => Ok(ht_project::load(path)?),
            (None, Some(name)) => Ok(name.parse::<Preset>()?.scenario()),
            (None, None) => Ok(Preset::SteamHeated.scenario()),
        }
    }
}

#[derive(Args)]
struct OverrideArgs {
    /// Proportional gain
    #[arg(long)]
    kp: Option<f64>,
    /// Integral time (s), time-constant gains only
    #[arg(long)]
    ti: Option<f64>,
    /// Derivative time (s), time-constant gains only
    #[arg(long)]
    td: Option<f64>,
    /// Integral gain, parallel gains only
    #[arg(long)]
    ki: Option<f64>,
    /// Derivative gain, parallel gains only
    #[arg(long)]
    kd: Option<f64>,
    /// Temperature setpoint (°C)
    #[arg(long)]
    setpoint: Option<f64>,
}

impl From<&OverrideArgs> for Overrides {
    fn from(a: &OverrideArgs) -> Self {
        Overrides {
            kp: a.kp,
            ti_s: a.ti,
            td_s: a.td,
            ki: a.ki,
            kd: a.kd,
            setpoint_c: a.setpoint,
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            source,
            overrides,
            csv,
            json,
        } => cmd_run(
            &source,
            &(&overrides).into(),
            csv.as_deref(),
            json.as_deref(),
        ),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Defaults { preset, output } => cmd_defaults(&preset, output.as_deref()),
        Commands::Compare { source, overrides } => cmd_compare(&source, &(&overrides).into()),
        Commands::Sweep {
            source,
            kp_min,
            kp_max,
            count,
        } => cmd_sweep(&source, kp_min, kp_max, count),
    }
}

fn cmd_run(
    source: &ScenarioSource,
    overrides: &Overrides,
    csv: Option<&Path>,
    json: Option<&Path>,
) -> CliResult<()> {
    let scenario = overrides.apply(&source.load()?)?;
    let params = validate_scenario(&scenario)?;

    println!("Running scenario: {}", scenario.name);
    if !overrides.is_empty() {
        println!("  Overrides: {}", overrides.describe());
    }
    println!(
        "  dt = {}, duration = {}",
        display_s(s(params.timing.dt_s)),
        display_s(s(params.timing.duration_s))
    );
    if let Some(tau) = params.plant.residence_time() {
        println!("  Residence time: {}", display_s(tau));
    }

    let trace = simulate(&params)?;
    let manifest = RunManifest::new(&scenario.name, &params, trace.len());
    let run = LabeledRun::new(&scenario.name, &params, trace);
    info!(run_id = %manifest.run_id, "run finished");

    println!("✓ Simulation completed: {}", manifest.run_id);
    println!("  Time points: {}", run.trace.len());
    print_metrics(&run);

    if let Some(path) = csv {
        ht_results::write_csv(path, &run.trace)?;
        println!("✓ Wrote trace to {}", path.display());
    }
    if let Some(path) = json {
        let record = RunRecord {
            manifest,
            metrics: run.metrics,
            trace: run.trace,
        };
        ht_results::write_json(path, &record)?;
        println!("✓ Wrote run record to {}", path.display());
    }

    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = ht_project::load(scenario_path)?;
    let params = validate_scenario(&scenario)?;
    println!("✓ Scenario is valid");
    println!("  Steps: {}", params.step_count()?);
    Ok(())
}

fn cmd_defaults(preset: &str, output: Option<&Path>) -> CliResult<()> {
    let scenario = preset.parse::<Preset>()?.scenario();

    if let Some(path) = output {
        ht_project::save_yaml(path, &scenario)?;
        println!("✓ Wrote {} preset to {}", preset, path.display());
    } else {
        if let Some(tau) = scenario.plant.residence_time() {
            println!("# residence time: {}", display_s(tau));
        }
        print!("{}", serde_yaml::to_string(&scenario)?);
    }
    Ok(())
}

fn cmd_compare(source: &ScenarioSource, overrides: &Overrides) -> CliResult<()> {
    if overrides.is_empty() {
        return Err(CliError::NoOverrides);
    }

    let baseline = source.load()?;
    let tuned = overrides.apply(&baseline)?;

    let mut comparison = RunComparison::new(labeled_run("baseline", &baseline)?);
    comparison.push(labeled_run(&overrides.describe(), &tuned)?);

    let Some(previous) = &comparison.previous else {
        return Ok(());
    };
    let current = &comparison.current;

    println!("Comparing runs of: {}", baseline.name);
    println!("  {:<22} {:>16} {:>16}", "", previous.label, current.label);
    for (label, a, b) in metric_rows(&previous.metrics, &current.metrics) {
        println!("  {:<22} {:>16} {:>16}", label, a, b);
    }
    if let Some(delta) = comparison.final_temperature_delta() {
        println!("  Final temperature change: {:+.3} K", delta);
    }
    Ok(())
}

fn cmd_sweep(source: &ScenarioSource, kp_min: f64, kp_max: f64, count: usize) -> CliResult<()> {
    if count == 0 {
        return Err(CliError::InvalidSweep("count must be >= 1"));
    }
    if kp_min.is_nan() || kp_max.is_nan() || kp_min > kp_max {
        return Err(CliError::InvalidSweep("kp-min must be <= kp-max"));
    }

    let scenario = source.load()?;
    let base = validate_scenario(&scenario)?;
    let gains = kp_range(base.gains, kp_min, kp_max, count);

    println!("Sweeping Kp over {} runs of: {}", gains.len(), scenario.name);
    println!(
        "  {:>12} {:>14} {:>14} {:>14} {:>14}",
        "Kp", "final T", "overshoot", "settling", "IAE"
    );

    for point in sweep(&base, &gains) {
        let kp = point.gains.kp();
        match point.result {
            Ok(trace) => {
                let params = SimulationParameters {
                    gains: point.gains,
                    ..base.clone()
                };
                let run = LabeledRun::new(format!("Kp={kp}"), &params, trace);
                let m = &run.metrics;
                println!(
                    "  {:>12.4} {:>14} {:>14} {:>14} {:>14}",
                    kp,
                    fmt_temperature(run.trace.final_temperature_c()),
                    fmt_opt(m.overshoot_pct, "%"),
                    fmt_time(m.settling_time_2pct_s),
                    fmt_opt(m.iae, "K·s"),
                );
            }
            Err(e) => println!("  {:>12.4} error: {}", kp, e),
        }
    }
    Ok(())
}

fn labeled_run(label: &str, scenario: &Scenario) -> CliResult<LabeledRun> {
    let params = validate_scenario(scenario)?;
    let trace = simulate(&params)?;
    Ok(LabeledRun::new(label, &params, trace))
}

fn print_metrics(run: &LabeledRun) {
    let m = &run.metrics;
    println!("\nLoop metrics (setpoint {}):", display_degc(degc(run.setpoint_c)));
    println!(
        "  Final temperature: {}",
        fmt_temperature(run.trace.final_temperature_c())
    );
    if let Some(h) = run.trace.last().and_then(|s| s.height_m) {
        println!("  Final height:      {}", display_m(ht_core::m(h)));
    }
    println!("  Peak temperature:  {}", fmt_temperature(m.peak_temperature_c));
    println!("  Rise time 10%:     {}", fmt_time(m.rise_time_10_s));
    println!("  Rise time 90%:     {}", fmt_time(m.rise_time_90_s));
    println!("  Settling time 2%:  {}", fmt_time(m.settling_time_2pct_s));
    println!("  Overshoot:         {}", fmt_opt(m.overshoot_pct, "%"));
    println!("  Steady-state err:  {}", fmt_opt(m.steady_state_error, "K"));
    println!("  IAE:               {}", fmt_opt(m.iae, "K·s"));
    println!(
        "  Output saturated:  {} upper, {} lower",
        fmt_opt(m.saturation_pct_upper, "%"),
        fmt_opt(m.saturation_pct_lower, "%")
    );
}

fn metric_rows(a: &LoopMetrics, b: &LoopMetrics) -> Vec<(&'static str, String, String)> {
    vec![
        (
            "Peak temperature",
            fmt_temperature(a.peak_temperature_c),
            fmt_temperature(b.peak_temperature_c),
        ),
        (
            "Rise time 90%",
            fmt_time(a.rise_time_90_s),
            fmt_time(b.rise_time_90_s),
        ),
        (
            "Settling time 2%",
            fmt_time(a.settling_time_2pct_s),
            fmt_time(b.settling_time_2pct_s),
        ),
        (
            "Overshoot",
            fmt_opt(a.overshoot_pct, "%"),
            fmt_opt(b.overshoot_pct, "%"),
        ),
        (
            "Steady-state error",
            fmt_opt(a.steady_state_error, "K"),
            fmt_opt(b.steady_state_error, "K"),
        ),
        ("IAE", fmt_opt(a.iae, "K·s"), fmt_opt(b.iae, "K·s")),
    ]
}

fn fmt_temperature(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |t| display_degc(degc(t)))
}

fn fmt_time(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |t| display_s(s(t)))
}

fn fmt_opt(v: Option<f64>, unit: &str) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{:.2} {}", x, unit))
}
