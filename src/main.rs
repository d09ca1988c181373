use planetsim::{ScenarioConfig, ParameterChange};
use planetsim::{build_controller, run_2d, bench_step};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "2D planet simulator: gravity, springs, damping, merging")]
struct Args {
    /// Scenario file, either a path or a name under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without a window and log a summary
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    ticks: usize,

    /// Override a parameter, e.g. `--set merging=true` (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,

    /// Time the simulation step for several body counts
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.is_file() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig =
        serde_yaml::from_reader(reader).with_context(|| format!("parsing {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn parse_override(s: &str) -> Result<ParameterChange> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{}'", s))?;
    Ok(ParameterChange::parse(name, value)?)
}

// viewer logging goes through Bevy's LogPlugin instead
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        init_logging();
        bench_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let randomize_on_start = scenario_cfg.bodies.is_none();
    let overrides = args
        .overrides
        .iter()
        .map(|s| parse_override(s))
        .collect::<Result<Vec<_>>>()?;

    let mut controller = build_controller(scenario_cfg);
    for change in overrides {
        controller.set_parameter(change);
    }

    if !args.headless {
        run_2d(controller, randomize_on_start);
        return Ok(());
    }

    init_logging();
    controller.start()?;
    let initial_mass = controller.total_mass();
    for _ in 0..args.ticks {
        controller.frame();
    }

    log::info!(
        "{} ticks: {} bodies, {} merges, total mass {:.3} (initial {:.3})",
        controller.tick_count(),
        controller.bodies().len(),
        controller.merge_count(),
        controller.total_mass(),
        initial_mass,
    );

    Ok(())
}
