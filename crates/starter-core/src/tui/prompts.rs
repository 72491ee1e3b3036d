//! Charm-style CLI prompts using cliclack

use crate::compile::compile;
use crate::config::{write_config, PersistedConfig};
use crate::model::{
    CompileOptions, CustomTemplate, EnvVar, Framework, Integration, PackageManager, RouterMode,
};
use crate::product::ProductConfig;
use crate::registry::{version, IntegrationFetcher, RegistryManifest};
use crate::runtime::check;
use crate::writer::write_project;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Project name used when none is given
pub const DEFAULT_PROJECT_NAME: &str = "my-app";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local registry directory instead of the remote one
    pub integrations_dir: Option<PathBuf>,

    /// Project name
    pub project_name: Option<String>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    pub framework: Option<Framework>,
    pub mode: Option<RouterMode>,
    pub typescript: Option<bool>,
    pub tailwind: Option<bool>,
    pub package_manager: Option<PackageManager>,

    /// Integration ids to add
    pub integrations: Option<Vec<String>>,

    /// Custom template id
    pub template: Option<String>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Registry
    let fetcher = setup_fetcher(config, &args.integrations_dir)?;

    // Step 2: Where and what
    let project_name = select_project_name(&args)?;
    let project_dir = select_directory(&args, &project_name)?;
    let mut options = select_options(&args, project_name)?;

    // Step 3: Custom template, then integrations
    let spinner = cliclack::spinner();
    spinner.start("Loading integrations...");
    let manifest = fetcher.fetch_registry_manifest().await?;
    spinner.stop(format!(
        "{} integrations, {} templates available",
        manifest.integrations.len(),
        manifest.templates.len()
    ));

    let template = select_template(&fetcher, &manifest, &args).await?;
    options.chosen_integrations =
        select_integrations(&fetcher, &manifest, &args, options.mode, template.as_ref()).await?;
    options.custom_template = template;

    for warning in version::compatibility_warnings(
        cli_version,
        &options.chosen_integrations,
        config.upgrade_command(),
    ) {
        cliclack::log::warning(format!("Version warning: {}", warning))?;
    }

    // Step 4: Compile and write
    create_project(&options, &project_dir).await?;

    // Step 5: Advisory runtime check
    check_runtimes(options.package_manager)?;

    // Step 6: Show next steps
    print_next_steps(config, &project_dir, options.package_manager)?;

    Ok(())
}

fn setup_fetcher<C: ProductConfig>(
    config: &C,
    integrations_dir: &Option<PathBuf>,
) -> Result<IntegrationFetcher> {
    let fetcher = match integrations_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local integrations from {}", path.display()))?;
            IntegrationFetcher::from_local(path.clone(), config.user_agent())
        }
        None => {
            cliclack::log::info("Using remote integrations")?;
            IntegrationFetcher::from_config(config)?
        }
    };

    Ok(fetcher)
}

fn select_project_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.project_name {
        return Ok(name.clone());
    }
    if args.yes {
        return Ok(DEFAULT_PROJECT_NAME.to_string());
    }

    let name: String = cliclack::input("Project name")
        .placeholder(DEFAULT_PROJECT_NAME)
        .default_input(DEFAULT_PROJECT_NAME)
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a name")
            } else {
                Ok(())
            }
        })
        .interact()?;
    Ok(name.trim().to_string())
}

fn resolve_dir(current_dir: &Path, input: &Path) -> PathBuf {
    if input.is_absolute() {
        input.to_path_buf()
    } else {
        current_dir.join(input)
    }
}

fn select_directory(args: &CreateArgs, project_name: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = if let Some(dir) = &args.directory {
        let p = resolve_dir(&current_dir, dir);
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir.join(project_name)
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(project_name)
            .default_input(project_name)
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            resolve_dir(&current_dir, Path::new(&input))
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

fn select_options(args: &CreateArgs, project_name: String) -> Result<CompileOptions> {
    let mut options = CompileOptions::new(project_name);

    options.framework = match args.framework {
        Some(framework) => framework,
        None if args.yes => Framework::default(),
        None => cliclack::select("Framework")
            .item(Framework::React, Framework::React.display_name(), "")
            .item(Framework::Solid, Framework::Solid.display_name(), "")
            .interact()?,
    };

    options.mode = match args.mode {
        Some(mode) => mode,
        None if args.yes => RouterMode::default(),
        None => cliclack::select("Routing")
            .item(RouterMode::FileRouter, "File router", "routes from src/routes")
            .item(RouterMode::CodeRouter, "Code router", "routes declared in code")
            .interact()?,
    };

    options.typescript = match args.typescript {
        Some(typescript) => typescript,
        None if args.yes => true,
        None => cliclack::confirm("Use TypeScript?")
            .initial_value(true)
            .interact()?,
    };

    options.tailwind = match args.tailwind {
        Some(tailwind) => tailwind,
        None if args.yes => false,
        None => cliclack::confirm("Use Tailwind CSS?")
            .initial_value(false)
            .interact()?,
    };

    options.package_manager = match args.package_manager {
        Some(pm) => pm,
        None if args.yes => PackageManager::default(),
        None => {
            let mut select = cliclack::select("Package manager");
            for pm in PackageManager::ALL {
                select = select.item(pm, pm.as_str(), "");
            }
            select.interact()?
        }
    };

    Ok(options)
}

async fn select_template(
    fetcher: &IntegrationFetcher,
    manifest: &RegistryManifest,
    args: &CreateArgs,
) -> Result<Option<CustomTemplate>> {
    if let Some(id) = &args.template {
        if !manifest.templates.contains(id) {
            anyhow::bail!(
                "Template '{}' not found. Available templates: {}",
                id,
                manifest.templates.join(", ")
            );
        }
        let template = fetcher.fetch_template(id).await?;
        cliclack::log::info(format!("Using template: {}", template.name))?;
        return Ok(Some(template));
    }

    if args.yes || manifest.templates.is_empty() {
        return Ok(None);
    }

    let mut templates = Vec::new();
    for id in &manifest.templates {
        templates.push(fetcher.fetch_template(id).await?);
    }

    let mut select = cliclack::select("Start from a template?").item(None, "None", "");
    for (idx, template) in templates.iter().enumerate() {
        select = select.item(Some(idx), &template.name, &template.description);
    }
    let selected: Option<usize> = select.interact()?;

    Ok(selected.and_then(|idx| templates.into_iter().nth(idx)))
}

/// Template integrations first, then the rest, without duplicates
fn merge_integration_ids(template: Option<&CustomTemplate>, selected: Vec<String>) -> Vec<String> {
    let mut ids: Vec<String> = template
        .map(|t| t.integrations.clone())
        .unwrap_or_default();
    for id in selected {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

async fn select_integrations(
    fetcher: &IntegrationFetcher,
    manifest: &RegistryManifest,
    args: &CreateArgs,
    mode: RouterMode,
    template: Option<&CustomTemplate>,
) -> Result<Vec<Integration>> {
    if args.integrations.is_some() || args.yes {
        let ids = merge_integration_ids(template, args.integrations.clone().unwrap_or_default());
        let integrations = fetcher.resolve_integrations(&ids).await?;
        for unsupported in integrations.iter().filter(|i| !i.supports(mode)) {
            cliclack::log::warning(format!("{} does not declare support for {}", unsupported.name, mode))?;
        }
        return Ok(integrations);
    }

    let spinner = cliclack::spinner();
    spinner.start("Loading integration details...");
    let mut available = Vec::new();
    for id in &manifest.integrations {
        let integration = fetcher.fetch_integration(id).await?;
        if integration.supports(mode) {
            available.push(integration);
        }
    }
    spinner.stop(format!("{} integrations support {}", available.len(), mode));

    if available.is_empty() {
        let ids = merge_integration_ids(template, Vec::new());
        return fetcher.resolve_integrations(&ids).await;
    }

    let preselected: Vec<usize> = available
        .iter()
        .enumerate()
        .filter(|(_, i)| template.is_some_and(|t| t.integrations.contains(&i.id)))
        .map(|(idx, _)| idx)
        .collect();

    let mut multi = cliclack::multiselect("Add integrations");
    for (idx, integration) in available.iter().enumerate() {
        multi = multi.item(idx, &integration.name, &integration.description);
    }
    let selected: Vec<usize> = multi
        .initial_values(preselected)
        .required(false)
        .interact()?;

    let selected_ids: Vec<String> = selected
        .into_iter()
        .filter_map(|idx| available.get(idx).map(|i| i.id.clone()))
        .collect();
    let ids = merge_integration_ids(template, selected_ids);

    Ok(ids
        .iter()
        .filter_map(|id| available.iter().find(|i| &i.id == id).cloned())
        .collect())
}

async fn create_project(options: &CompileOptions, project_dir: &Path) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let output = match compile(options) {
        Ok(output) => output,
        Err(e) => {
            spinner.stop("Compilation failed");
            return Err(e.into());
        }
    };
    let written = write_project(&output, project_dir).await?;
    write_config(project_dir, &PersistedConfig::from_options(options)).await?;

    spinner.stop(format!(
        "Created {} files in {}",
        written.len() + 1,
        project_dir.display()
    ));

    for warning in &output.warnings {
        cliclack::log::warning(warning)?;
    }
    if let Some(summary) = env_var_summary(&output.env_vars) {
        cliclack::log::info(summary)?;
    }

    Ok(())
}

/// One-line listing of the environment variables the integrations expect
fn env_var_summary(vars: &[EnvVar]) -> Option<String> {
    if vars.is_empty() {
        return None;
    }
    let names: Vec<String> = vars
        .iter()
        .map(|v| {
            if v.required {
                format!("{} (required)", v.name)
            } else {
                v.name.clone()
            }
        })
        .collect();
    Some(format!("Set these environment variables: {}", names.join(", ")))
}

fn check_runtimes(package_manager: PackageManager) -> Result<()> {
    let runtimes = check::check_runtimes(package_manager);
    let runtime_info: Vec<String> = runtimes
        .iter()
        .map(|r| {
            if r.available {
                format!("{} ({})", r.name, r.version.as_deref().unwrap_or("unknown"))
            } else {
                format!("{} (not installed)", r.name)
            }
        })
        .collect();
    cliclack::log::info(format!("Detected runtimes: {}", runtime_info.join(", ")))?;

    for missing in runtimes.iter().filter(|r| !r.available) {
        cliclack::log::warning(format!(
            "{} was not found. Install it from {}",
            missing.name, missing.install_hint
        ))?;
    }

    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    package_manager: PackageManager,
) -> Result<()> {
    let steps = config.next_steps(project_dir, package_manager);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_integrations_come_first() {
        let template = CustomTemplate {
            id: "blog".to_string(),
            integrations: vec!["query".to_string(), "auth".to_string()],
            ..CustomTemplate::default()
        };
        let ids = merge_integration_ids(
            Some(&template),
            vec!["db".to_string(), "query".to_string()],
        );
        assert_eq!(ids, vec!["query", "auth", "db"]);
    }

    #[test]
    fn test_merge_without_template() {
        let ids = merge_integration_ids(None, vec!["db".to_string(), "db".to_string()]);
        assert_eq!(ids, vec!["db"]);
    }

    #[test]
    fn test_env_var_summary() {
        assert_eq!(env_var_summary(&[]), None);
        let vars = vec![
            EnvVar {
                name: "DATABASE_URL".to_string(),
                description: String::new(),
                required: true,
                example: None,
            },
            EnvVar {
                name: "API_KEY".to_string(),
                description: String::new(),
                required: false,
                example: None,
            },
        ];
        assert_eq!(
            env_var_summary(&vars).unwrap(),
            "Set these environment variables: DATABASE_URL (required), API_KEY"
        );
    }

    #[test]
    fn test_resolve_dir() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_dir(cwd, Path::new("app")), PathBuf::from("/work/app"));
        assert_eq!(resolve_dir(cwd, Path::new("/abs")), PathBuf::from("/abs"));
    }
}
