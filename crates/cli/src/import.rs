//! `bbase import` — config-driven sheet import into a graph file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Deserialize;

use brokerbase_import::{FieldKey, ImportError, ImportMapping, ImportRow, SynonymCatalog};

use crate::exit_codes::{EXIT_IMPORT_CONFIG, EXIT_IMPORT_PARSE, EXIT_IMPORT_UNRUNNABLE};
use crate::store;
use crate::CliError;

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Run an import from a TOML config file
    #[command(after_help = "\
Examples:
  bbase import run import.toml
  bbase import run import.toml --json
  bbase import run import.toml --dry-run")]
    Run {
        /// Path to the .import.toml config file
        config: PathBuf,

        /// Output the run report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Merge and report, but do not write the graph back
        #[arg(long)]
        dry_run: bool,
    },

    /// Guess the header mapping and check runnability without importing
    #[command(after_help = "\
Examples:
  bbase import validate import.toml")]
    Validate {
        /// Path to the .import.toml config file
        config: PathBuf,
    },
}

pub fn cmd_import(cmd: ImportCommands) -> Result<(), CliError> {
    match cmd {
        ImportCommands::Run { config, json, dry_run } => cmd_import_run(config, json, dry_run),
        ImportCommands::Validate { config } => cmd_import_validate(config),
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Declarative import job. Paths are resolved relative to the config file.
#[derive(Debug, Deserialize)]
pub struct ImportConfig {
    /// Graph JSON file, created on first run.
    pub graph: PathBuf,
    /// Input sheet (CSV).
    pub sheet: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Per-field synonym overrides; unlisted fields keep the defaults.
    #[serde(default)]
    pub synonyms: BTreeMap<FieldKey, Vec<String>>,
    /// Manual field→header assignments, applied after guessing.
    #[serde(default)]
    pub mapping: BTreeMap<FieldKey, String>,
}

fn default_delimiter() -> char {
    ','
}

impl ImportConfig {
    pub fn from_toml(input: &str) -> Result<Self, ImportError> {
        let config: Self =
            toml::from_str(input).map_err(|e| ImportError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    // The csv reader takes a single byte, so a non-ASCII delimiter would be
    // silently truncated; reject it up front instead.
    fn validate(&self) -> Result<(), ImportError> {
        if !self.delimiter.is_ascii() {
            return Err(ImportError::ConfigValidation(format!(
                "delimiter must be a single ASCII character, got \"{}\"",
                self.delimiter
            )));
        }
        Ok(())
    }

    pub fn catalog(&self) -> Result<SynonymCatalog, ImportError> {
        let mut catalog = SynonymCatalog::default();
        for (key, synonyms) in &self.synonyms {
            catalog.set_synonyms(*key, synonyms.clone());
        }
        catalog.validate()?;
        Ok(catalog)
    }
}

fn load_config(path: &Path) -> Result<(ImportConfig, PathBuf), CliError> {
    let config_str = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_IMPORT_CONFIG,
        message: format!("cannot read config: {e}"),
        hint: None,
    })?;
    let config = ImportConfig::from_toml(&config_str).map_err(|e| CliError {
        code: EXIT_IMPORT_CONFIG,
        message: e.to_string(),
        hint: None,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    Ok((config, base_dir))
}

// ---------------------------------------------------------------------------
// Sheet loading
// ---------------------------------------------------------------------------

pub fn load_sheet(path: &Path, delimiter: char) -> Result<(Vec<String>, Vec<ImportRow>), CliError> {
    let parse_err = |msg: String| CliError {
        code: EXIT_IMPORT_PARSE,
        message: format!("{}: {msg}", path.display()),
        hint: None,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_path(path)
        .map_err(|e| parse_err(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_err(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| parse_err(e.to_string()))?;
        let row: ImportRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok((headers, rows))
}

fn build_mapping(config: &ImportConfig, headers: &[String]) -> Result<ImportMapping, CliError> {
    let catalog = config.catalog().map_err(|e| CliError {
        code: EXIT_IMPORT_CONFIG,
        message: e.to_string(),
        hint: None,
    })?;
    let mut mapping = ImportMapping::guess(headers, &catalog);
    for (key, header) in &config.mapping {
        if !headers.contains(header) {
            return Err(CliError {
                code: EXIT_IMPORT_CONFIG,
                message: format!("mapped column \"{header}\" not found in sheet"),
                hint: Some(format!("headers present: {}", headers.join(", "))),
            });
        }
        mapping.assign(*key, header.clone());
    }
    Ok(mapping)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_import_run(config_path: PathBuf, json_output: bool, dry_run: bool) -> Result<(), CliError> {
    let (config, base_dir) = load_config(&config_path)?;
    let (headers, rows) = load_sheet(&base_dir.join(&config.sheet), config.delimiter)?;
    let mapping = build_mapping(&config, &headers)?;

    let graph_path = base_dir.join(&config.graph);
    let mut graph = store::load_graph(&graph_path)?;

    let report = brokerbase_import::run(&mut graph, &mapping, &rows).map_err(|e| {
        let hint = match &e {
            ImportError::MappingNotRunnable { .. } => Some(
                "assign the missing columns under [mapping] in the config".to_string(),
            ),
            _ => None,
        };
        CliError { code: EXIT_IMPORT_UNRUNNABLE, message: e.to_string(), hint }
    })?;

    if !dry_run {
        store::save_graph(&graph_path, &graph)?;
    }

    if json_output {
        let json = serde_json::to_string_pretty(&report).map_err(|e| CliError {
            code: crate::exit_codes::EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json}");
    }

    let s = &report.summary;
    eprintln!(
        "import: {} rows — +{} brands, +{} companies, +{} agents, {} companies updated, {} agents updated, {} skipped{}",
        rows.len(),
        s.created_brands,
        s.created_companies,
        s.created_agents,
        s.updated_companies,
        s.updated_agents,
        s.skipped_rows,
        if dry_run { " (dry run, graph not written)" } else { "" },
    );
    Ok(())
}

fn cmd_import_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, base_dir) = load_config(&config_path)?;
    let (headers, rows) = load_sheet(&base_dir.join(&config.sheet), config.delimiter)?;
    let mapping = build_mapping(&config, &headers)?;

    for (key, header) in mapping.iter() {
        eprintln!("  {key} <- \"{header}\"");
    }
    let unmapped: Vec<&String> = headers
        .iter()
        .filter(|h| mapping.iter().all(|(_, mapped)| mapped != h.as_str()))
        .collect();
    for header in unmapped {
        eprintln!("  (unmapped) \"{header}\"");
    }

    let missing = mapping.missing_for_run();
    if missing.is_empty() {
        eprintln!("runnable: yes ({} data rows)", rows.len());
        Ok(())
    } else {
        let fields: Vec<String> = missing.iter().map(|k| k.to_string()).collect();
        Err(CliError {
            code: EXIT_IMPORT_UNRUNNABLE,
            message: format!("mapping not runnable: missing {}", fields.join(", ")),
            hint: Some("assign the missing columns under [mapping] in the config".to_string()),
        })
    }
}
