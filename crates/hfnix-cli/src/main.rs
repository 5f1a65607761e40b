//! helmfile-nix - write helmfiles and charts in nix, deploy them with helmfile

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hfnix_engine::{Helmfile, NixEvaluator};

mod args;
mod commands;
mod error;
mod exit_codes;

use commands::Options;

#[derive(Parser)]
#[command(name = "helmfile-nix")]
#[command(version)]
#[command(args_override_self = true)]
#[command(about = "Render helmfile.nix and nix charts, then run helmfile", long_about = None)]
#[command(after_help = "Arguments after the command are passed to helmfile, except \
helmfile-nix's own options, which are read wherever they appear. \
Use `render` as the last argument to print the rendered helmfile.")]
struct Cli {
    /// helmfile.nix, helmfile.gotmpl.nix, or a directory containing one
    #[arg(short = 'f', long, default_value = ".")]
    file: PathBuf,

    /// Environment to render
    #[arg(short = 'e', long, default_value = "dev", env = "HELMFILE_NIX_ENVIRONMENT")]
    environment: String,

    /// Set state values on the command line (key=value,other.key=value)
    #[arg(long = "state-values-set", value_name = "KEY=VALUE")]
    state_values_set: Vec<String>,

    /// Pass --show-trace to nix eval
    #[arg(long)]
    show_trace: bool,

    /// nix binary
    #[arg(long, default_value = "nix", env = "HELMFILE_NIX_NIX_BIN")]
    nix_bin: PathBuf,

    /// helmfile binary
    #[arg(long, default_value = "helmfile", env = "HELMFILE_NIX_HELMFILE_BIN")]
    helmfile_bin: PathBuf,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// helmfile command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    args: Vec<String>,
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse_from(args::hoist_own_options(std::env::args()));
    init_tracing(cli.debug);

    let evaluator = NixEvaluator::new()
        .with_binary(cli.nix_bin)
        .with_show_trace(cli.show_trace);
    let packager = Helmfile::new().with_binary(cli.helmfile_bin);
    let options = Options {
        file: cli.file,
        environment: cli.environment,
        state_values: cli.state_values_set,
        args: cli.args,
    };

    let code = match commands::forward::run(&options, &evaluator, &packager, &mut std::io::stdout()) {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    ExitCode::from(u8::try_from(code).unwrap_or(exit_codes::ERROR as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_before_command() {
        let cli = Cli::try_parse_from([
            "helmfile-nix",
            "-e",
            "prod",
            "--state-values-set",
            "a=1,b.c=2",
            "--state-values-set",
            "d=x",
            "diff",
            "--context",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.environment, "prod");
        assert_eq!(cli.state_values_set, vec!["a=1,b.c=2", "d=x"]);
        assert_eq!(cli.args, vec!["diff", "--context", "3"]);
        assert_eq!(cli.file, PathBuf::from("."));
    }

    #[test]
    fn test_own_options_after_command_are_read() {
        let argv = args::hoist_own_options(
            ["helmfile-nix", "-e", "dev", "diff", "-e", "prod", "--debug", "--context", "3"]
                .map(String::from),
        );
        let cli = Cli::try_parse_from(argv).unwrap();

        assert_eq!(cli.environment, "prod");
        assert!(cli.debug);
        assert_eq!(cli.args, vec!["diff", "--context", "3"]);
    }

    #[test]
    fn test_helmfile_options_after_command_are_forwarded() {
        let argv = args::hoist_own_options(
            ["helmfile-nix", "template", "--skip-deps", "--set", "a=1"].map(String::from),
        );
        let cli = Cli::try_parse_from(argv).unwrap();

        assert_eq!(cli.environment, "dev");
        assert_eq!(cli.args, vec!["template", "--skip-deps", "--set", "a=1"]);
    }
}
