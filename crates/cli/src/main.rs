mod exit_code;
mod logging;
mod prompt;

use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use exit_code::ExitCode;
use livetidy_core::{
    app_paths, load_config, load_config_from, run, save_config, AppConfig, AssumeYes,
    Capabilities, Confirmer, ExifPropertyProvider, MagickConverter, MediaInfoProbe, RunConfig,
    RunReport, TracingProgress,
};
use prompt::StdinConfirmer;
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Debug, Parser)]
#[command(name = "livetidy", version)]
#[command(about = "Prefix phone media with capture dates, convert stills and sort out live photo clips")]
struct Cli {
    /// Read settings from this file instead of the OS config directory
    #[arg(long = "config", global = true, value_name = "FILE")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Run(RunArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    /// Write the default settings to the OS config directory
    Init,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Folder holding the phone export
    dir: PathBuf,
    /// Encoding png/heic stills are converted to
    #[arg(short = 'e', long)]
    target_extension: Option<String>,
    /// Delete originals after they were converted
    #[arg(long, default_value_t = false)]
    replace_originals: bool,
    /// Move .mov clips of live photos into their own folder first
    #[arg(long, default_value_t = false)]
    move_live_photos: bool,
    /// Skip the date prefix rename
    #[arg(long, default_value_t = false)]
    no_prefix: bool,
    /// Skip conversion
    #[arg(long, default_value_t = false)]
    no_convert: bool,
    /// Also rename videos one folder level down
    #[arg(short, long, default_value_t = false, overrides_with = "no_recursive")]
    recursive: bool,
    /// Stay in the top folder even when the config file says otherwise
    #[arg(long, default_value_t = false, overrides_with = "recursive")]
    no_recursive: bool,
    #[arg(long, default_value_t = false, overrides_with = "no_include_hidden")]
    include_hidden: bool,
    #[arg(long, default_value_t = false, overrides_with = "include_hidden")]
    no_include_hidden: bool,
    /// Do not ask before deleting originals
    #[arg(short, long, default_value_t = false)]
    yes: bool,
    /// Write an execution log into the folder
    #[arg(long, default_value_t = false)]
    log_file: bool,
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let code = match dispatch(cli) {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::for_error(&err)
        }
    };
    std::process::exit(code.into());
}

fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config_file {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Commands::Run(args) => cmd_run(args, &config),
        Commands::Config(args) => match args.action {
            ConfigAction::Show => cmd_config_show(&config, cli.config_file),
            ConfigAction::Init => cmd_config_init(),
        },
    }
}

fn cmd_run(args: RunArgs, app: &AppConfig) -> Result<()> {
    let started = Local::now();
    let run_config = build_run_config(&args, app);
    run_config.validate()?;

    // Held until the end of this function so the log file is flushed.
    let log_guard = logging::init(
        args.verbose,
        args.log_file.then_some(run_config.dir.as_path()),
        &started,
    )?;
    if let Some(path) = &log_guard.log_path {
        debug!("execution log: {}", path.display());
    }

    let properties = ExifPropertyProvider;
    let video = MediaInfoProbe::new(app.video_probe_program.clone());
    let converter = MagickConverter::new(app.converter_program.clone());
    let mut assume_yes = AssumeYes;
    let mut stdin_confirmer = StdinConfirmer;
    let confirmer: &mut dyn Confirmer = if args.yes {
        &mut assume_yes
    } else {
        &mut stdin_confirmer
    };

    let report = run(
        &run_config,
        Capabilities {
            properties: &properties,
            video: &video,
            converter: &converter,
            confirmer,
        },
        &mut TracingProgress,
    )?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_summary(&report),
    }
    Ok(())
}

fn build_run_config(args: &RunArgs, app: &AppConfig) -> RunConfig {
    let mut config = RunConfig::from_app_config(args.dir.clone(), app);
    if let Some(ext) = &args.target_extension {
        config.target_extension = ext.clone();
    }
    config.move_live_photos = args.move_live_photos;
    config.prefix_dates = !args.no_prefix;
    config.convert = !args.no_convert;
    config.replace_originals = args.replace_originals;
    if let Some(recursive) = flag_pair(args.recursive, args.no_recursive) {
        config.recursive = recursive;
    }
    if let Some(include_hidden) = flag_pair(args.include_hidden, args.no_include_hidden) {
        config.include_hidden = include_hidden;
    }
    config
}

/// `--x` / `--no-x`; `None` keeps the config file default.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn cmd_config_show(config: &AppConfig, explicit: Option<PathBuf>) -> Result<()> {
    let path = match explicit {
        Some(path) => path,
        None => app_paths()?.config_path,
    };
    println!("config file: {}", path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    save_config(&AppConfig::default())?;
    println!("wrote {}", app_paths()?.config_path.display());
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("folder: {}", report.dir.display());
    if let Some(live) = &report.live_photos {
        println!(
            "live photos : moved={} failed={}",
            live.moved(),
            live.failed()
        );
    }
    if let Some(renames) = &report.renames {
        println!(
            "rename      : renamed={} skipped={} failed={}",
            renames.renamed(),
            renames.skipped(),
            renames.failed()
        );
    }
    if let Some(conversions) = &report.conversions {
        println!(
            "convert     : converted={} failed={}",
            conversions.converted(),
            conversions.failed()
        );
        for failed in conversions.results.iter().filter(|r| !r.succeeded()) {
            println!("  failed: {}", failed.original.display());
        }
    }
    if let Some(deletions) = &report.deletions {
        if deletions.declined {
            println!("originals   : kept (declined)");
        } else {
            println!(
                "originals   : deleted={} failed={}",
                deletions.deleted(),
                deletions.failed()
            );
        }
    }
}
