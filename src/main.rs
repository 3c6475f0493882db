use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{apply, patterns, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "relabel")]
#[command(version = VERSION)]
#[command(about = "Propagate element-id renames across markup, script, and style trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track rename pairs and apply them across a file tree
    Run(run::RunArgs),
    /// Apply an externally supplied pattern configuration
    Apply(apply::ApplyArgs),
    /// Print the generated pattern configuration for rename pairs
    Patterns(patterns::PatternsArgs),
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Run(args) => output::respond(run::run(args)),
        Commands::Apply(args) => output::respond(apply::run(args)),
        Commands::Patterns(args) => output::respond(patterns::run(args)),
    };

    std::process::exit(code);
}
