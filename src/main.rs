use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use git_lanes::{ApplyMode, OutputFormat};

#[derive(Parser)]
#[command(name = "git-lanes")]
#[command(about = "Commit-graph lane layout and line-level patch building")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a history printed by `git log --format='%H %P'`
    Graph {
        /// Commit listing (stdin when omitted or `-`)
        file: Option<PathBuf>,
        /// Draw the working directory as a row above the first commit
        #[arg(long)]
        uncommitted: bool,
    },
    /// List the hunks of a single-file diff with their line ids
    Hunks {
        /// Diff text (stdin when omitted or `-`)
        file: Option<PathBuf>,
    },
    /// Print a patch for one hunk, or for selected lines of it
    Patch {
        /// Diff text (stdin when omitted or `-`)
        file: Option<PathBuf>,
        /// Hunk index as listed by `hunks`
        #[arg(long)]
        hunk: usize,
        /// Line ids to keep, e.g. "2,4..6"
        #[arg(long)]
        lines: Option<String>,
        /// Report the `git apply` arguments for this operation on stderr
        #[arg(long, value_enum)]
        mode: Option<Mode>,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Generate a man page
    Man,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Stage,
    Unstage,
    Discard,
}

impl From<Mode> for ApplyMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Stage => ApplyMode::Stage,
            Mode::Unstage => ApplyMode::Unstage,
            Mode::Discard => ApplyMode::Discard,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    git_lanes::logging::init(cli.verbose);

    let output = match cli.command {
        Commands::Graph { file, uncommitted } => {
            let log = git_lanes::read_input(file.as_deref())?;
            git_lanes::render_graph(&log, uncommitted, cli.format)?
        }
        Commands::Hunks { file } => {
            let diff = git_lanes::read_input(file.as_deref())?;
            git_lanes::render_hunks(&diff, cli.format)?
        }
        Commands::Patch {
            file,
            hunk,
            lines,
            mode,
        } => {
            let diff = git_lanes::read_input(file.as_deref())?;
            let patch = git_lanes::render_patch(&diff, hunk, lines.as_deref())?;
            if let Some(mode) = mode {
                eprintln!("git {}", ApplyMode::from(mode).git_apply_args().join(" "));
            }
            patch
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "git-lanes", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Man => {
            clap_mangen::Man::new(Cli::command()).render(&mut std::io::stdout())?;
            return Ok(());
        }
    };

    std::io::stdout().write_all(output.as_bytes())?;
    Ok(())
}
