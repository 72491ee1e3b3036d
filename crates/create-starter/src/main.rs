//! create-starter - Scaffold web projects from composable integrations

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use starter_core::model::{Framework, PackageManager, RouterMode, BASE_ID};
use starter_core::tui::CreateArgs;
use starter_core::{IntegrationFetcher, ProductConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable controlling log output
const LOG_ENV: &str = "STARTER_LOG";

/// Starter product configuration
#[derive(Clone)]
pub struct StarterConfig;

impl ProductConfig for StarterConfig {
    fn name(&self) -> &'static str {
        "create-starter"
    }

    fn display_name(&self) -> &'static str {
        "Create Starter"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/starter-dev/integrations/main/registry"
    }

    fn registry_url_env(&self) -> &'static str {
        "STARTER_REGISTRY_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://starter.dev/docs"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding web projects from composable integrations"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install create-starter --force"
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-starter")]
#[command(about = "CLI for scaffolding web projects from composable integrations")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    Create(CliCreateArgs),
    /// Build zip bundles for every integration in a local registry (for development use)
    BuildZips(BuildZipsArgs),
    /// Show which integration produced each line of a generated file
    Explain(ExplainArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project name
    pub name: Option<String>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Local registry directory to use instead of the remote one (for development use)
    #[arg(long = "integrations-dir")]
    pub integrations_dir: Option<PathBuf>,

    /// Integrations to add (comma-separated ids)
    #[arg(short, long, value_delimiter = ',')]
    pub integrations: Option<Vec<String>>,

    /// Custom template id
    #[arg(short, long)]
    pub template: Option<String>,

    /// Framework (react, solid)
    #[arg(short, long)]
    pub framework: Option<Framework>,

    /// Router mode (file-router, code-router)
    #[arg(short, long)]
    pub mode: Option<RouterMode>,

    /// Package manager (npm, pnpm, yarn, bun, deno)
    #[arg(short, long = "package-manager")]
    pub package_manager: Option<PackageManager>,

    /// Generate JavaScript instead of TypeScript
    #[arg(long = "no-typescript", alias = "js")]
    pub no_typescript: bool,

    /// Add Tailwind CSS
    #[arg(long, conflicts_with = "no_tailwind")]
    pub tailwind: bool,

    /// Skip Tailwind CSS
    #[arg(long = "no-tailwind")]
    pub no_tailwind: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        let tailwind = if args.tailwind {
            Some(true)
        } else if args.no_tailwind {
            Some(false)
        } else {
            None
        };

        CreateArgs {
            integrations_dir: args.integrations_dir,
            project_name: args.name,
            directory: args.directory,
            framework: args.framework,
            mode: args.mode,
            typescript: args.no_typescript.then_some(false),
            tailwind,
            package_manager: args.package_manager,
            integrations: args.integrations,
            template: args.template,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct BuildZipsArgs {
    /// Local registry directory to build bundles from (for development use)
    #[arg(long = "integrations-dir")]
    pub integrations_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ExplainArgs {
    /// File to explain, relative to the project root
    pub file: String,

    /// Project directory
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Local registry directory to use instead of the remote one
    #[arg(long = "integrations-dir")]
    pub integrations_dir: Option<PathBuf>,
}

async fn explain<C: ProductConfig>(config: &C, args: ExplainArgs) -> Result<()> {
    let persisted = starter_core::read_config(&args.dir)
        .await?
        .with_context(|| {
            format!(
                "No readable {} in {}",
                starter_core::config::CONFIG_FILE,
                args.dir.display()
            )
        })?;

    let fetcher = match args.integrations_dir {
        Some(path) => IntegrationFetcher::from_local(path, config.user_agent()),
        None => IntegrationFetcher::from_config(config)?,
    };
    let options = fetcher.resolve_options(&persisted).await?;
    let result = starter_core::compile_with_attribution(&options)?;

    let file = result
        .attributed_files
        .get(&args.file)
        .with_context(|| format!("{} is not part of the generated project", args.file))?;

    let width = file
        .attributions
        .iter()
        .map(|a| a.feature_name.len())
        .max()
        .unwrap_or(0);

    for (line, attribution) in file.content.split('\n').zip(&file.attributions) {
        let name = format!("{:<width$}", attribution.feature_name, width = width);
        let name = if attribution.feature_id == BASE_ID {
            name.dimmed()
        } else {
            name.cyan()
        };
        println!(
            "{} {} {} {}",
            format!("{:>4}", attribution.line_number).dimmed(),
            name,
            "|".dimmed(),
            line
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = StarterConfig;

    match args.command {
        Some(Command::Create(create_args)) => {
            let result = starter_core::run(&config, create_args.into(), CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Some(Command::BuildZips(build_args)) => {
            starter_core::registry::build_zips(&config, &build_args.integrations_dir)
                .await
                .map(|_| ())
        }
        Some(Command::Explain(explain_args)) => explain(&config, explain_args).await,
        None => {
            // No subcommand provided, default to create behavior (interactive mode)
            let result = starter_core::run(&config, CreateArgs::default(), CLI_VERSION).await;

            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
