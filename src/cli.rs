//! Command-line interface over a manifest directory.

use crate::config::Config;
use crate::error::Result;
use crate::events::PackageEvent;
use crate::inspector::PackageInspector;
use crate::manager::SearchManager;
use crate::packages::InstalledPackages;
use crate::searchable::SearchableInfo;
use crate::tracing::LogFormat;
use crate::types::ComponentName;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Debug, Parser)]
#[command(name = "searchables")]
#[command(about = "Inspect the searchable components declared by installed packages", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the per-user config if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of package manifests, overriding the config
    #[arg(short, long, global = true)]
    pub manifests: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered searchables
    List {
        /// Only components included in global search
        #[arg(long, conflicts_with = "web")]
        global: bool,
        /// Only components that handle web searches
        #[arg(long)]
        web: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show one component's searchable configuration
    Show {
        /// Component as `package/class`
        component: ComponentName,
        #[arg(long)]
        json: bool,
    },
    /// Write a component's record in wire form
    Encode {
        component: ComponentName,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Read a wire-form record and print it
    Decode {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

/// Run a parsed command, writing its output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::List { global, web, json } => list(&load_manager(cli)?, *global, *web, *json, out),
        Commands::Show { component, json } => {
            let info = lookup(&load_manager(cli)?, component)?;
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(info.as_ref())?)?;
            } else {
                write_info(&info, out)?;
            }
            Ok(())
        }
        Commands::Encode { component, output } => {
            let info = lookup(&load_manager(cli)?, component)?;
            let bytes = info.to_bytes()?;
            std::fs::write(output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            writeln!(out, "Wrote {} bytes to {}", bytes.len(), output.display())?;
            Ok(())
        }
        Commands::Decode { file, json } => decode(file, *json, out),
    }
}

/// Build a manager over the configured manifest directory.
fn load_manager(cli: &Cli) -> Result<SearchManager> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let manifests = cli
        .manifests
        .as_deref()
        .or(config.manifests.as_deref())
        .context("No manifest directory: pass --manifests or set `manifests` in the config")?;

    let installed = InstalledPackages::load_dir(manifests)?;

    // Nothing publishes package events during a single command
    let (package_events, _) = broadcast::channel::<PackageEvent>(1);
    Ok(SearchManager::new(
        Arc::new(installed) as Arc<dyn PackageInspector>,
        package_events,
        config.registry,
    ))
}

fn lookup(manager: &SearchManager, component: &ComponentName) -> Result<Arc<SearchableInfo>> {
    manager
        .searchable_info(Some(component), false)
        .with_context(|| format!("{} is not a searchable component", component))
}

fn list(manager: &SearchManager, global: bool, web: bool, json: bool, out: &mut impl Write) -> Result<()> {
    // One snapshot so the default marker agrees with the listed records
    let registry = manager.snapshot();
    let infos: Vec<&SearchableInfo> = if global {
        registry.global_search_candidates().iter().map(AsRef::as_ref).collect()
    } else if web {
        registry.web_search_candidates().iter().map(AsRef::as_ref).collect()
    } else {
        registry.iter().map(AsRef::as_ref).collect()
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&infos)?)?;
        return Ok(());
    }

    let default = registry.default_web_search().map(|info| info.component());
    for info in infos {
        let mut tags = Vec::new();
        if info.include_in_global_search() {
            tags.push("global");
        }
        if registry.web_search_candidates().iter().any(|w| w.component() == info.component()) {
            tags.push("web");
        }
        if default == Some(info.component()) {
            tags.push("default");
        }
        writeln!(
            out,
            "{}  label={}{}{}",
            info.component().flatten_to_short_string(),
            info.label_id(),
            if tags.is_empty() { "" } else { "  " },
            tags.join(",")
        )?;
    }
    Ok(())
}

fn decode(file: &Path, json: bool, out: &mut impl Write) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let info = SearchableInfo::from_bytes(&bytes)
        .with_context(|| format!("Failed to decode {}", file.display()))?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
    } else {
        write_info(&info, out)?;
    }
    Ok(())
}

fn write_info(info: &SearchableInfo, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", info.component())?;
    writeln!(out, "  label: {}", info.label_id())?;
    writeln!(out, "  hint: {}", info.hint_id())?;
    writeln!(out, "  icon: {}", info.icon_id())?;
    writeln!(out, "  search mode: {:?}", info.search_mode())?;
    writeln!(out, "  input type: {:#x}", info.input_type())?;
    writeln!(out, "  ime options: {:#x}", info.ime_options())?;
    writeln!(out, "  global search: {}", info.include_in_global_search())?;

    if let Some(authority) = info.suggest_authority() {
        writeln!(out, "  suggestions: {}", authority)?;
        let details = [
            ("path", info.suggest_path()),
            ("selection", info.suggest_selection()),
            ("intent action", info.suggest_intent_action()),
            ("intent data", info.suggest_intent_data()),
            ("provider package", info.suggest_provider_package()),
        ];
        for (name, value) in details {
            if let Some(value) = value {
                writeln!(out, "    {}: {}", name, value)?;
            }
        }
        writeln!(out, "    threshold: {}", info.suggest_threshold())?;
    }

    if info.voice_search_enabled() {
        writeln!(out, "  voice search: {:?}", info.voice_search_mode())?;
        writeln!(out, "    max results: {}", info.voice_max_results())?;
    }

    for key in info.action_keys().iter() {
        write!(out, "  action key {}:", key.key_code)?;
        if let Some(msg) = &key.query_action_msg {
            write!(out, " query={}", msg)?;
        }
        if let Some(msg) = &key.suggest_action_msg {
            write!(out, " suggest={}", msg)?;
        }
        if let Some(column) = &key.suggest_action_msg_column {
            write!(out, " column={}", column)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use tempfile::TempDir;

    const NOTES: &str = r#"
        package = "com.example.notes"
        providers = ["com.example.notes.suggest"]

        [[activities]]
        name = ".Search"

        [[activities.metadata]]
        element = "searchable"
        label = 5
        includeInGlobalSearch = true
        searchSuggestAuthority = "com.example.notes.suggest"

        [[activities.metadata]]
        element = "actionkey"
        keycode = 5
        queryActionMsg = "call"
    "#;

    const BROWSER: &str = r#"
        package = "com.example.browser"

        [[activities]]
        name = ".WebSearch"
        web-search = true

        [[activities.metadata]]
        element = "searchable"
        label = 9
    "#;

    fn manifests() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.toml"), NOTES).unwrap();
        std::fs::write(temp.path().join("browser.toml"), BROWSER).unwrap();
        temp
    }

    fn run_args(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("searchables").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(&cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_list() {
        let temp = manifests();
        let dir = temp.path().to_str().unwrap();

        let_assert!(Ok(output) = run_args(&["--manifests", dir, "list"]));
        check!(output.contains("com.example.notes/.Search  label=5  global"));
        check!(output.contains("com.example.browser/.WebSearch  label=9  web,default"));

        let_assert!(Ok(output) = run_args(&["--manifests", dir, "list", "--web"]));
        check!(!output.contains("com.example.notes"));
    }

    #[test]
    fn test_show_json() {
        let temp = manifests();
        let dir = temp.path().to_str().unwrap();

        let_assert!(Ok(output) = run_args(&["--manifests", dir, "show", "com.example.notes/.Search", "--json"]));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        check!(value["label_id"] == 5);
        check!(value["suggest_provider_package"] == "com.example.notes");
    }

    #[test]
    fn test_show_unknown_component() {
        let temp = manifests();
        let dir = temp.path().to_str().unwrap();

        let_assert!(Err(err) = run_args(&["--manifests", dir, "show", "com.example.notes/.Missing"]));
        check!(err.to_string().contains("is not a searchable component"));
    }

    #[test]
    fn test_encode_then_decode() {
        let temp = manifests();
        let dir = temp.path().to_str().unwrap();
        let record = temp.path().join("notes.bin");
        let record = record.to_str().unwrap();

        let_assert!(Ok(_) = run_args(&["--manifests", dir, "encode", "com.example.notes/.Search", "-o", record]));
        let_assert!(Ok(output) = run_args(&["decode", record]));
        check!(output.starts_with("com.example.notes/com.example.notes.Search\n"));
        check!(output.contains("action key 5: query=call"));
    }

    #[test]
    fn test_missing_manifest_directory() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        std::fs::write(&config, "").unwrap();

        let_assert!(Err(err) = run_args(&["--config", config.to_str().unwrap(), "list"]));
        check!(err.to_string().contains("No manifest directory"));
    }
}
