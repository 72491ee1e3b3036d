//! The compilation engine
//!
//! Merges the base files with every contributor's files, package additions,
//! env vars and warnings, in `(phase, priority)` order. A single merge pass
//! records who wrote what; `compile` drops that bookkeeping and
//! `compile_with_attribution` turns it into per-line ownership.

pub mod attribution;

use crate::error::Result;
use crate::generators::{get_base_files_with_attribution, package_json, BaseFiles};
use crate::model::{CompileOptions, CompileOutput, EnvVar, Integration, PackageAdditions, BASE_ID};
use crate::template::process_template_file;
use std::collections::{BTreeMap, HashSet};

pub use attribution::compile_with_attribution;

/// Path of the materialized package manifest
pub const PACKAGE_JSON: &str = "package.json";

/// A file in the tree and the contributor that last wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileEntry {
    pub content: String,
    pub integration_id: String,
}

/// Which contributor last set each package key
#[derive(Debug, Clone, Default)]
pub(crate) struct PackageOwners {
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
}

impl PackageOwners {
    fn record(&mut self, additions: &PackageAdditions, integration_id: &str) {
        let tag = |target: &mut BTreeMap<String, String>, source: &BTreeMap<String, String>| {
            for key in source.keys() {
                target.insert(key.clone(), integration_id.to_string());
            }
        };
        tag(&mut self.dependencies, &additions.dependencies);
        tag(&mut self.dev_dependencies, &additions.dev_dependencies);
        tag(&mut self.scripts, &additions.scripts);
    }

    /// Owner of a manifest key: dependencies, then devDependencies, then scripts
    pub fn owner_of(&self, key: &str) -> Option<&str> {
        self.dependencies
            .get(key)
            .or_else(|| self.dev_dependencies.get(key))
            .or_else(|| self.scripts.get(key))
            .map(String::as_str)
    }
}

/// Everything one merge pass produces
#[derive(Debug, Clone)]
pub(crate) struct Merged {
    pub base: BaseFiles,
    pub files: BTreeMap<String, FileEntry>,
    /// Path -> (1-indexed line -> owner) for lines added by appends
    pub append_owners: BTreeMap<String, BTreeMap<usize, String>>,
    pub packages: PackageAdditions,
    pub package_owners: PackageOwners,
    /// Deduplicated env vars with the contributor that declared them
    pub env_vars: Vec<(EnvVar, String)>,
    pub warnings: Vec<String>,
    /// Contributor id -> display name
    pub names: BTreeMap<String, String>,
}

impl Merged {
    fn into_output(self) -> CompileOutput {
        CompileOutput {
            files: self
                .files
                .into_iter()
                .map(|(path, entry)| (path, entry.content))
                .collect(),
            packages: self.packages,
            env_vars: self.env_vars.into_iter().map(|(var, _)| var).collect(),
            warnings: self.warnings,
        }
    }
}

/// Compile `options` into a project tree
pub fn compile(options: &CompileOptions) -> Result<CompileOutput> {
    Ok(merge(options)?.into_output())
}

/// Chosen integrations plus the custom template, stably sorted by `(phase, priority)`
pub fn sorted_contributors(options: &CompileOptions) -> Vec<Integration> {
    let mut contributors = options.chosen_integrations.clone();
    if let Some(template) = &options.custom_template {
        contributors.push(template.as_integration());
    }
    contributors.sort_by_key(Integration::sort_key);
    contributors
}

pub(crate) fn merge(options: &CompileOptions) -> Result<Merged> {
    let base = get_base_files_with_attribution(options);

    let mut files: BTreeMap<String, FileEntry> = base
        .files
        .iter()
        .map(|(path, content)| {
            (
                path.clone(),
                FileEntry {
                    content: content.clone(),
                    integration_id: BASE_ID.to_string(),
                },
            )
        })
        .collect();
    let mut appends: BTreeMap<String, Vec<FileEntry>> = BTreeMap::new();
    let mut packages = PackageAdditions::default();
    let mut package_owners = PackageOwners::default();
    let mut env_vars: Vec<(EnvVar, String)> = Vec::new();
    let mut warnings = Vec::new();
    let mut names = BTreeMap::new();
    let mut deleted: Vec<String> = Vec::new();

    let contributors = sorted_contributors(options);
    for integration in &contributors {
        tracing::debug!(
            "Applying {} (phase {:?}, priority {})",
            integration.id,
            integration.phase,
            integration.priority()
        );
        names.insert(integration.id.clone(), integration.name.clone());

        for (path, raw) in &integration.files {
            let processed = process_template_file(path, raw, options)
                .map_err(|e| e.with_integration(&integration.id))?;
            let Some(file) = processed else {
                continue;
            };

            let entry = FileEntry {
                content: file.content,
                integration_id: integration.id.clone(),
            };
            if file.append {
                appends.entry(file.path).or_default().push(entry);
            } else {
                if let Some(previous) = files.get(&file.path) {
                    tracing::debug!(
                        "{} overwrites {} (previously from {})",
                        integration.id,
                        file.path,
                        previous.integration_id
                    );
                }
                files.insert(file.path, entry);
            }
        }

        if let Some(additions) = &integration.package_additions {
            packages.merge(additions);
            package_owners.record(additions, &integration.id);
        }

        env_vars.extend(
            integration
                .env_vars
                .iter()
                .map(|var| (var.clone(), integration.id.clone())),
        );

        if let Some(warning) = &integration.warning {
            warnings.push(format!("{}: {}", integration.name, warning));
        }

        deleted.extend(integration.deleted_files.iter().cloned());
    }

    let mut append_owners = resolve_appends(&mut files, appends);
    for path in &deleted {
        if path != PACKAGE_JSON && files.remove(path).is_some() {
            tracing::debug!("Deleted {}", path);
        }
        append_owners.remove(path);
    }

    files.insert(
        PACKAGE_JSON.to_string(),
        FileEntry {
            content: package_json::render_package_json(options, &packages),
            integration_id: BASE_ID.to_string(),
        },
    );

    Ok(Merged {
        base,
        files,
        append_owners,
        packages,
        package_owners,
        env_vars: dedupe_env_vars(env_vars),
        warnings,
        names,
    })
}

/// Apply queued appends, returning the owner of every appended line
fn resolve_appends(
    files: &mut BTreeMap<String, FileEntry>,
    appends: BTreeMap<String, Vec<FileEntry>>,
) -> BTreeMap<String, BTreeMap<usize, String>> {
    let mut owners = BTreeMap::new();

    for (path, queue) in appends {
        let Some(first) = queue.first() else {
            continue;
        };
        let appended = queue
            .iter()
            .map(|e| e.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let (mut next_line, entry) = match files.remove(&path) {
            Some(existing) => {
                let existing_lines = existing.content.split('\n').count();
                (
                    existing_lines + 1,
                    FileEntry {
                        content: format!("{}\n{}", existing.content, appended),
                        integration_id: existing.integration_id,
                    },
                )
            }
            None => (
                1,
                FileEntry {
                    content: appended,
                    integration_id: first.integration_id.clone(),
                },
            ),
        };

        let mut line_owners = BTreeMap::new();
        for chunk in &queue {
            for _ in chunk.content.split('\n') {
                line_owners.insert(next_line, chunk.integration_id.clone());
                next_line += 1;
            }
        }

        owners.insert(path.clone(), line_owners);
        files.insert(path, entry);
    }

    owners
}

/// Keep the first env var of each name
fn dedupe_env_vars(vars: Vec<(EnvVar, String)>) -> Vec<(EnvVar, String)> {
    let mut seen = HashSet::new();
    vars.into_iter()
        .filter(|(var, _)| seen.insert(var.name.clone()))
        .collect()
}
