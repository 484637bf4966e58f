use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use svgstore::{ConfigFile, Job, Options, resolve_options, run_job};
use tracing::{error, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "svgstore")]
#[command(about = "Merge SVG icons into a single <symbol> sprite", long_about = None)]
struct Cli {
    /// Icons to merge (ad-hoc mode, requires --output)
    inputs: Vec<PathBuf>,

    /// Sprite to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file with task options and targets
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Targets to run from the config file (default: all)
    #[arg(short, long)]
    target: Vec<String>,

    /// Prefix for every symbol id
    #[arg(long)]
    prefix: Option<String>,

    /// Write an HTML demo page next to the sprite
    #[arg(long)]
    include_demo: bool,

    /// Put symbols inside <defs>
    #[arg(long)]
    insert_into_defs: bool,

    /// Drop inline style attributes
    #[arg(long)]
    cleanup: bool,

    /// Expand self-closing forms of this tag (repeatable)
    #[arg(long = "force-close-tag")]
    force_close_tags: Vec<String>,

    /// Do not add <title> to symbols
    #[arg(long)]
    no_title: bool,

    /// Do not copy <desc> into symbols
    #[arg(long)]
    no_desc: bool,

    /// Do not copy viewBox onto symbols
    #[arg(long)]
    no_view_box: bool,

    /// Pretty-print the sprite
    #[arg(long)]
    format: bool,

    /// More output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Flags given on the command line, as a target-level options table.
    fn option_overrides(&self) -> toml::Value {
        let mut table = toml::Table::new();
        if let Some(prefix) = &self.prefix {
            table.insert("prefix".into(), prefix.clone().into());
        }
        let flags = [
            ("includedemo", self.include_demo, true),
            ("insertIntoDefs", self.insert_into_defs, true),
            ("cleanup", self.cleanup, true),
            ("formatting", self.format, true),
            ("includeTitle", self.no_title, false),
            ("includeDesc", self.no_desc, false),
            ("includeViewBox", self.no_view_box, false),
        ];
        for (key, given, value) in flags {
            if given {
                table.insert(key.into(), value.into());
            }
        }
        if !self.force_close_tags.is_empty() {
            let tags = self.force_close_tags.iter().cloned().map(toml::Value::from);
            table.insert("forceCloseTags".into(), toml::Value::Array(tags.collect()));
        }
        toml::Value::Table(table)
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else if cli.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = match &cli.config {
        Some(path) => Some(ConfigFile::load(path)?),
        None => None,
    };
    let mut runs: Vec<(String, Options, Job)> = Vec::new();

    if let Some(output) = &cli.output {
        let overrides = cli.option_overrides();
        let options = match &config {
            Some(config) => config.task_options(Some(&overrides))?,
            None => resolve_options(None, Some(&overrides))?,
        };
        runs.push(("cli".into(), options, Job::new(cli.inputs.clone(), output)));
    } else if let Some(config) = &config {
        let names: Vec<String> = if cli.target.is_empty() {
            config.targets.keys().cloned().collect()
        } else {
            cli.target.clone()
        };
        for name in names {
            let options = config.target_options(&name)?;
            for mapping in &config.targets[&name].files {
                let job = Job::expand(&mapping.src, &mapping.dest, &config.base_dir)?;
                runs.push((name.clone(), options.clone(), job));
            }
        }
    } else {
        return Err("nothing to do: pass --output with input files, or --config".into());
    }

    let mut failed = 0;
    for (name, options, job) in &runs {
        if let Err(e) = run_job(job, options) {
            error!(target_name = %name, dest = %job.dest.display(), "{e}");
            failed += 1;
        }
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
