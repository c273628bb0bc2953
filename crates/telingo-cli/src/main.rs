#![doc = include_str!("../README.md")]

mod output;

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use miette::IntoDiagnostic;
use tracing::info;
use tracing_subscriber::EnvFilter;

use telingo_solve::{SolveOptions, StopCriterion};
use telingo_transform::{transform_sources, SourceFile};

#[derive(Parser)]
#[command(name = "telingo")]
#[command(about = "Rewrite and incrementally solve temporal logic programs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rewritten program without solving it
    Transform {
        /// Input files; standard input when omitted
        files: Vec<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Solve the program over a growing horizon
    Solve {
        /// Input files; standard input when omitted
        files: Vec<PathBuf>,

        /// Minimum number of solving steps
        #[arg(long, default_value_t = 0)]
        imin: u32,

        /// Maximum number of solving steps
        #[arg(long)]
        imax: Option<u32>,

        /// Stop criterion: sat, unsat or unknown
        #[arg(long, default_value = "sat")]
        istop: StopCriterion,

        /// Number of models to compute per step (0 for all)
        #[arg(short = 'n', long, default_value_t = 1)]
        models: u64,

        /// Additional options passed to clingo
        #[arg(last = true)]
        clingo_args: Vec<String>,
    },
}

fn read_sources(files: &[PathBuf]) -> miette::Result<Vec<SourceFile>> {
    if files.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .into_diagnostic()?;
        return Ok(vec![SourceFile::new("<stdin>", text)]);
    }
    files
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .map_err(|e| miette::miette!("cannot read {}: {e}", path.display()))?;
            Ok(SourceFile::new(path.display().to_string(), text))
        })
        .collect()
}

fn run_transform(files: &[PathBuf], format: OutputFormat) -> miette::Result<()> {
    let sources = read_sources(files)?;
    let output = transform_sources(&sources)?;
    match format {
        OutputFormat::Text => print!("{}", output::render_transform_text(&output)),
        OutputFormat::Json => {
            let report = output::TransformReport::new(&output);
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
    }
    Ok(())
}

#[cfg(feature = "clingo")]
fn run_solve(
    files: &[PathBuf],
    options: SolveOptions,
    models: u64,
    clingo_args: Vec<String>,
) -> miette::Result<i32> {
    use telingo_solve::backends::clingo_backend::ClingoControl;

    let sources = read_sources(files)?;
    let program = transform_sources(&sources)?;

    let mut arguments = vec![models.to_string()];
    arguments.extend(clingo_args);
    let mut control = ClingoControl::new(arguments).into_diagnostic()?;
    control
        .add_program(&program.statements)
        .into_diagnostic()?;

    let summary = telingo_solve::imain(&mut control, &program, &options, |model, step| {
        print!("{}", output::format_model(model, step));
        true
    })
    .into_diagnostic()?;

    match summary.last {
        Some(result) => println!("{result}"),
        None => println!("UNKNOWN"),
    }
    info!(steps = summary.steps, "done");
    Ok(output::exit_code(summary.last))
}

#[cfg(not(feature = "clingo"))]
fn run_solve(
    _files: &[PathBuf],
    _options: SolveOptions,
    _models: u64,
    _clingo_args: Vec<String>,
) -> miette::Result<i32> {
    Err(miette::miette!(
        help = "rebuild with `--features clingo`, or use `telingo transform` and pass its output to an incremental solver",
        "telingo was built without a solver backend"
    ))
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Transform { files, format } => run_transform(&files, format),
        Commands::Solve {
            files,
            imin,
            imax,
            istop,
            models,
            clingo_args,
        } => {
            let options = SolveOptions { imin, imax, istop };
            info!(imin, ?imax, %istop, "solving");
            let code = run_solve(&files, options, models, clingo_args)?;
            std::process::exit(code);
        }
    }
}
