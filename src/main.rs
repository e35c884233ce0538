//! Stackforge - manifest-driven installer for AI application stacks

use clap::Parser;

use stackforge::cli::{Cli, Commands};
use stackforge::commands;

fn main() {
    let cli = Cli::parse();
    let manifests_dir = cli.manifests_dir.clone();
    let verbose = cli.verbose;

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(manifests_dir, verbose, args),
        Commands::List(args) => commands::list::run(manifests_dir, verbose, args),
        Commands::Show(args) => commands::show::run(manifests_dir, verbose, args),
        Commands::Validate => commands::validate::run(manifests_dir, verbose),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
