//! Completions command implementation

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::{Cli, CompletionsArgs};
use crate::error::{Result, StackforgeError};

/// Run completions command
pub fn run(args: CompletionsArgs) -> Result<()> {
    let shell = match args.shell.as_str() {
        "bash" => Shell::Bash,
        "elvish" => Shell::Elvish,
        "fish" => Shell::Fish,
        "powershell" => Shell::PowerShell,
        "zsh" => Shell::Zsh,
        other => {
            return Err(StackforgeError::IoError {
                message: format!(
                    "Unsupported shell '{other}' (expected bash, elvish, fish, powershell, or zsh)"
                ),
            });
        }
    };

    let mut command = Cli::command();
    generate(shell, &mut command, "stackforge", &mut std::io::stdout());
    Ok(())
}
