//! roster — terminal user-management client.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use roster::api::RestUserApi;
use roster::config::Config;
use roster::constants;
use roster::controller::Controller;
use roster::env::Env;
use roster::logging;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;

use cli::args::{Cli, Command, ListArgs};
use cli::shell::Shell;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();
    logging::init(&env, cli.verbose);

    match cli.command {
        Some(Command::Version) => run_version(),
        Some(Command::List(ref args)) => {
            let config = load_config(&cli, &env)?;
            run_list(&config, args).await
        }
        Some(Command::Shell) | None => {
            let config = load_config(&cli, &env)?;
            run_shell(&config).await
        }
    }
}

/// Layer config files, environment and CLI flags.
fn load_config(cli: &Cli, env: &Env) -> Result<Config> {
    let cwd = std::env::current_dir().ok();
    let mut config = Config::load(cwd.as_deref(), env).context("failed to load configuration")?;
    config
        .apply_cli_overrides(cli.api_url.clone(), cli.page_size.map(usize::from))
        .context("invalid command-line options")?;
    tracing::debug!(?config, "effective configuration");
    Ok(config)
}

fn build_controller(config: &Config) -> Result<Controller> {
    let api = RestUserApi::from_config(&config.api).context("failed to set up the API client")?;
    Ok(Controller::new(Arc::new(api), config))
}

/// Print detailed version and build information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}

/// Fetch the collection and print one page.
async fn run_list(config: &Config, args: &ListArgs) -> Result<()> {
    let mut controller = build_controller(config)?;
    controller.load().await;
    if let Some(error) = controller.state().error.clone() {
        bail!(error);
    }

    controller.set_search(args.search.clone());
    controller.go_to_page(args.page);
    print!("{}", args.format.render(&controller.view()));
    Ok(())
}

/// Run the interactive session on stdin/stdout.
async fn run_shell(config: &Config) -> Result<()> {
    use colored::Colorize;

    let controller = build_controller(config)?;
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        format!("· {} · type 'help' for commands", config.api.base_url).dimmed()
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut shell = Shell::new(controller, stdin, std::io::stdout());
    shell.run().await
}
