//! Validate command

use anyhow::Context;
use clap::Args;
use oncotree_core::pipeline::{run, Outcome, ReconcileRequest};
use oncotree_core::{AcceptedSink, CodeMappingSource, NoopSink, ReconcileConfig};
use std::path::{Path, PathBuf};

use super::{Status, UsageError};
use crate::fetch::{FileCodeMappingSource, HttpCodeMappingSource};
use crate::prompt::{AutoConfirmer, TerminalConfirmer};
use crate::sink::JsonFileSink;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Original csv file exported from Graphite
    #[arg(short = 'o', long)]
    pub original_file: PathBuf,

    /// Modified copy of the original csv file, with an additional column at
    /// the end called 'parent oncotree code'
    #[arg(short = 'm', long)]
    pub modified_file: PathBuf,

    /// URL of the internal id to oncotree code table (overrides the config file)
    #[arg(long, conflicts_with = "mapping_file")]
    pub mapping_url: Option<String>,

    /// Read the internal id to oncotree code table from a local file
    #[arg(long)]
    pub mapping_file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Accept the reported changes without prompting
    #[arg(long)]
    pub yes: bool,

    /// Also write the change report as JSON
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Write the accepted modified nodes as JSON
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ValidateArgs) -> anyhow::Result<Status> {
    require_file(&args.original_file, "original")?;
    require_file(&args.modified_file, "modified")?;

    let mut config = match &args.config {
        Some(path) => ReconcileConfig::load(path)
            .map_err(oncotree_core::ExError::from)
            .with_context(|| format!("loading config '{}'", path.display()))?,
        None => ReconcileConfig::default(),
    };
    if let Some(url) = &args.mapping_url {
        config.mapping_url = url.clone();
    }

    let mapping: Box<dyn CodeMappingSource> = match &args.mapping_file {
        Some(path) => Box::new(FileCodeMappingSource::new(
            path.clone(),
            config.has_code_predicate.clone(),
        )),
        None => Box::new(HttpCodeMappingSource::new(
            config.mapping_url.clone(),
            config.has_code_predicate.clone(),
        )),
    };

    let sink: Box<dyn AcceptedSink> = match &args.output {
        Some(path) => Box::new(JsonFileSink::new(path.clone())),
        None => Box::new(NoopSink),
    };

    let request = ReconcileRequest {
        original_path: args.original_file.clone(),
        modified_path: args.modified_file.clone(),
        config,
    };

    let outcome = if args.yes {
        run(&request, mapping.as_ref(), &AutoConfirmer::stdout(), sink.as_ref())?
    } else {
        run(
            &request,
            mapping.as_ref(),
            &TerminalConfirmer::stdio(),
            sink.as_ref(),
        )?
    };

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(outcome.report())?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to '{}'", path.display()))?;
    }

    match outcome {
        Outcome::Accepted(_) => {
            eprintln!("All changes confirmed as intentional.");
            Ok(Status::Accepted)
        }
        Outcome::Declined(_) => {
            eprintln!(
                "ERROR: You have said that not all changes are intentional. Please correct your input file and run this again."
            );
            Ok(Status::Declined)
        }
    }
}

fn require_file(path: &Path, which: &str) -> anyhow::Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(UsageError(format!("ERROR: cannot access {} file {}", which, path.display())).into())
    }
}
