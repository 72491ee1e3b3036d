//! Per-line attribution of a compiled project

use super::{merge, FileEntry, Merged, PackageOwners, PACKAGE_JSON};
use crate::error::Result;
use crate::generators::{GeneratedFile, LineBuilder};
use crate::model::{
    AttributedCompileOutput, AttributedFile, CompileOptions, EnvVar, LineAttribution, BASE_ID,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Env listing added to attributed output when any env var is declared
pub const ENV_EXAMPLE: &str = ".env.example";

/// `"key": "value"` on one manifest line. Approximate: a value containing
/// `": "` can still confuse it.
static MANIFEST_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*"([^"]+)"\s*:\s*"([^"]*)""#).expect("manifest entry pattern is valid")
});

/// Compile `options` and attribute every output line to a contributor
pub fn compile_with_attribution(options: &CompileOptions) -> Result<AttributedCompileOutput> {
    let merged = merge(options)?;

    let mut attributed_files = BTreeMap::new();
    for (path, entry) in &merged.files {
        let owners = if path == PACKAGE_JSON {
            package_json_owners(&entry.content, &merged.package_owners)
        } else {
            file_line_owners(path, entry, &merged)
        };
        attributed_files.insert(
            path.clone(),
            attributed(&entry.content, owners, &merged.names),
        );
    }

    let env_listing = env_listing(options, &merged.env_vars, &merged.names);
    let names = merged.names.clone();
    let mut output = merged.into_output();

    if let Some(listing) = env_listing {
        let owners = listing
            .lines
            .iter()
            .map(|l| l.integration_id.clone())
            .collect();
        output
            .files
            .insert(ENV_EXAMPLE.to_string(), listing.content.clone());
        attributed_files.insert(
            ENV_EXAMPLE.to_string(),
            attributed(&listing.content, owners, &names),
        );
    }

    Ok(AttributedCompileOutput {
        output,
        attributed_files,
    })
}

fn attributed(content: &str, owners: Vec<String>, names: &BTreeMap<String, String>) -> AttributedFile {
    let attributions = owners
        .into_iter()
        .enumerate()
        .map(|(idx, feature_id)| LineAttribution {
            line_number: idx + 1,
            feature_name: names
                .get(&feature_id)
                .cloned()
                .unwrap_or_else(|| feature_id.clone()),
            feature_id,
        })
        .collect();
    AttributedFile {
        content: content.to_string(),
        attributions,
    }
}

/// Owner per line: appended region, then generator hook line, then file owner.
///
/// The generator's line map is applied by line number even when a contributor
/// overwrote the file. Approximate: such a file can inherit hook owners on
/// lines that no longer hold the hook's code.
fn file_line_owners(path: &str, entry: &FileEntry, merged: &Merged) -> Vec<String> {
    let appended = merged.append_owners.get(path);
    let generated = merged.base.attributions.get(path);

    entry
        .content
        .split('\n')
        .enumerate()
        .map(|(idx, _)| {
            let line = idx + 1;
            appended
                .and_then(|owners| owners.get(&line))
                .map(String::as_str)
                .or_else(|| {
                    generated
                        .and_then(|lines| lines.get(idx))
                        .map(|l| l.integration_id.as_str())
                        .filter(|id| *id != BASE_ID)
                })
                .unwrap_or(&entry.integration_id)
                .to_string()
        })
        .collect()
}

/// Owner per manifest line, looked up by the key on that line
fn package_json_owners(content: &str, owners: &PackageOwners) -> Vec<String> {
    content
        .split('\n')
        .map(|line| {
            MANIFEST_ENTRY
                .captures(line)
                .and_then(|caps| owners.owner_of(caps.get(1)?.as_str()))
                .unwrap_or(BASE_ID)
                .to_string()
        })
        .collect()
}

/// `.env.example` grouped by contributor, in first-seen order
fn env_listing(
    options: &CompileOptions,
    vars: &[(EnvVar, String)],
    names: &BTreeMap<String, String>,
) -> Option<GeneratedFile> {
    if vars.is_empty() {
        return None;
    }

    let mut groups: Vec<(&str, Vec<&EnvVar>)> = Vec::new();
    for (var, owner) in vars {
        match groups.iter_mut().find(|(id, _)| *id == owner.as_str()) {
            Some((_, group)) => group.push(var),
            None => groups.push((owner.as_str(), vec![var])),
        }
    }

    let mut out = LineBuilder::new();
    out.base(&format!(
        "# Environment variables for {}",
        options.project_name
    ));
    out.base("# Copy this file to .env.local and fill in the values");

    for (id, group) in groups {
        out.blank();
        let name = names.get(id).map(String::as_str).unwrap_or(id);
        out.push(&format!("# {}", name), id);
        for var in group {
            let required = if var.required { " (required)" } else { "" };
            if !var.description.is_empty() || var.required {
                out.push(&format!("# {}{}", var.description, required), id);
            }
            out.push(
                &format!("{}={}", var.name, var.example.as_deref().unwrap_or_default()),
                id,
            );
        }
    }
    out.blank();

    Some(out.finish())
}
