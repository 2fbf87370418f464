//! dotload: run a command with variables from dotenv files.
//!
//! Parses the configured files (without touching this process's
//! environment), then spawns the command with the parsed variables added.
//! With no command, prints the variables instead.

use std::path::PathBuf;
use std::process::{Command, ExitCode};

use clap::Parser;
use dotload::config::Config;
use dotload::{EnvMap, ParseOptions, logging};

#[derive(Parser, Debug)]
#[command(name = "dotload", version)]
#[command(about = "Run a command with environment variables loaded from dotenv files")]
#[command(
    after_help = "Examples:\n  Multiple files:\n    dotload -f .env -f .another.env -- some_command -a args\n  Environment and paths:\n    dotload -e development -p ../devcfg -- some_command -a args"
)]
struct Cli {
    /// File with KEY=value pairs to read (repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    files: Vec<String>,

    /// Read the file suite for an environment (.env.<ENV>.local, .env.local, .env.<ENV>, .env)
    #[arg(short = 'e', long = "env", value_name = "ENV")]
    environment: Option<String>,

    /// Directory to search for files (repeatable)
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Fail when any listed file is missing
    #[arg(long)]
    all_files_required: bool,

    /// Print variables as a JSON object when no command is given
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Command to run, with its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

impl Cli {
    /// Flags override the configuration; `-e` wins over `-f`.
    fn parse_options(&self, config: &Config) -> ParseOptions {
        let mut options = config.parse_options();
        if !self.files.is_empty() {
            options = options.files(&self.files);
        }
        if let Some(environment) = &self.environment {
            options = options.environment(environment);
        }
        if !self.paths.is_empty() {
            options = options.paths(&self.paths);
        }
        if self.all_files_required {
            options = options.all_files_required();
        }
        options
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::load();
    logging::init(logging::level_for(cli.verbose, config.log_level()));

    let options = cli.parse_options(&config);
    log::debug!(
        "files {:?} in paths {:?}",
        options.sources.files,
        options.sources.paths
    );

    let vars = match dotload::parse(&options) {
        Ok(vars) => vars,
        Err(e) => {
            eprintln!("dotload: loading environment files errored: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.command.is_empty() {
        return print_vars(&vars, cli.json);
    }

    match run_command(&cli.command, &vars) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("dotload: encountered an error spawning command: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_vars(vars: &EnvMap, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string_pretty(vars) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("dotload: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (key, value) in vars {
            println!("{key}={value}");
        }
    }
    ExitCode::SUCCESS
}

/// Run the command in the current directory with the parsed variables added
/// to the inherited environment, and pass its exit code through.
fn run_command(command: &[String], vars: &EnvMap) -> std::io::Result<ExitCode> {
    let Some((program, args)) = command.split_first() else {
        return Ok(ExitCode::SUCCESS);
    };
    let display = shlex::try_join(command.iter().map(String::as_str))
        .unwrap_or_else(|_| command.join(" "));
    log::info!("running {display} with {} variable(s)", vars.len());

    let status = Command::new(program)
        .args(args)
        .current_dir(std::env::current_dir()?)
        .envs(vars)
        .status()?;

    Ok(ExitCode::from(exit_status(status.code())))
}

/// The child's exit code when it fits in a `u8`, otherwise `1`. A missing
/// code means the child was killed by a signal.
fn exit_status(code: Option<i32>) -> u8 {
    code.and_then(|code| u8::try_from(code).ok()).unwrap_or(1)
}
