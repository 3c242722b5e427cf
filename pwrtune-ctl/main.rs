use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pwrtune::orchestrator::actions;
use pwrtune::{report, Config, CpuSelector, MsrStore, VoltagePlane};

#[derive(Parser, Debug)]
#[command(name = "pwrtune")]
#[command(about = "Power management utilities for Intel laptops")]
struct Args {
    #[arg(
        short,
        long,
        global = true,
        default_value = "all",
        help = "CPUs to act on: 'all' or a list such as 0-3,6"
    )]
    cpu: CpuSelector,

    #[arg(
        short,
        long,
        global = true,
        help = "Enable verbose logging (shows every MSR read/write)"
    )]
    verbose: bool,

    #[arg(
        long,
        global = true,
        default_value = pwrtune_raw::DEFAULT_MSR_ROOT,
        help = "Directory holding the per-CPU msr devices"
    )]
    msr_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Under/overvolt interface
    Volt {
        #[command(subcommand)]
        action: VoltAction,
    },
    /// Package temperature target interface
    Temp {
        #[command(subcommand)]
        action: TempAction,
    },
    /// Package running average power limit (RAPL)
    Powerlimit {
        #[command(subcommand)]
        action: PowerlimitAction,
    },
}

#[derive(Subcommand, Debug)]
enum VoltAction {
    /// List plane voltage offset(s) in mV
    List {
        /// cpu, gpu, cache, uncore or analogio; all planes when omitted
        plane: Option<VoltagePlane>,
    },
    /// Set a plane's voltage offset in mV
    Set {
        plane: VoltagePlane,
        #[arg(allow_negative_numbers = true)]
        offset_mv: i32,
    },
}

#[derive(Subcommand, Debug)]
enum TempAction {
    /// List throttle temperatures
    List,
    /// Set the throttle temperature in °C
    Set { temperature: i32 },
}

#[derive(Subcommand, Debug)]
enum PowerlimitAction {
    /// List the package power limit
    List,
}

fn check_permissions(msr_root: &Path) -> anyhow::Result<()> {
    if std::fs::metadata(msr_root).is_err() {
        bail!(
            "Cannot access {}. The MSR kernel module may not be loaded; run: sudo modprobe msr",
            msr_root.display()
        );
    }

    // Try to open one device to check actual permissions
    let probe = pwrtune_raw::msr_path(msr_root, 0);
    if let Err(e) = std::fs::File::open(&probe) {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            bail!(
                "Permission denied accessing {}. Run as root (CAP_SYS_RAWIO is required)",
                probe.display()
            );
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging based on verbose flag, RUST_LOG overrides
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    check_permissions(&args.msr_root)?;

    let config = Config::new(args.msr_root, args.cpu);
    let store = MsrStore::from_config(&config);
    tracing::debug!("Using configuration: {:?}", config);

    match args.command {
        Command::Volt { action } => match action {
            VoltAction::List { plane } => {
                let planes = match plane {
                    Some(plane) => vec![plane],
                    None => VoltagePlane::all(),
                };
                let outcome = actions::list_voltage(&config, &store, &planes)
                    .context("could not read voltage offsets")?;
                print!("{}", report::voltage_table(&outcome));
            }
            VoltAction::Set { plane, offset_mv } => {
                let outcome = actions::set_voltage(&config, &store, plane, offset_mv)
                    .context("unable to set voltage offset")?;
                println!(
                    "Set {} plane offset to {} mV on {} CPU(s)",
                    plane,
                    offset_mv,
                    outcome.applied()
                );
            }
        },
        Command::Temp { action } => match action {
            TempAction::List => {
                let outcome = actions::list_temperature(&config, &store)
                    .context("could not read temperature target data")?;
                print!("{}", report::temperature_table(&outcome));
            }
            TempAction::Set { temperature } => {
                let outcome = actions::set_temperature(&config, &store, temperature)
                    .context("unable to set throttling temperature")?;
                println!(
                    "Throttle temperature {} °C on {} CPU(s), {} written",
                    temperature,
                    outcome.applied(),
                    outcome.written()
                );
            }
        },
        Command::Powerlimit { action } => match action {
            PowerlimitAction::List => {
                let outcome = actions::list_power_limit(&config, &store)
                    .context("could not read package power limit")?;
                print!("{}", report::power_limit_table(&outcome));
            }
        },
    }

    Ok(())
}
