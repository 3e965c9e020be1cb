//! Actions command
//!
//! Usage: refactorx actions <PATH> [--diagnostic-id <ID>...] [--file <FILE> --line <N> --column <N>]

use crate::session::{open, print_json};
use clap::Args;
use refactorx_core::model::SourceLocation;
use refactorx_engine::ActionQuery;
use std::path::{Path, PathBuf};

/// Selects which actions are discovered; shared with `apply`
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Only fixes for diagnostics with this id (repeatable)
    #[arg(long = "diagnostic-id")]
    pub diagnostic_ids: Vec<String>,

    /// Document for a location query
    #[arg(long, requires = "line", conflicts_with = "diagnostic_ids")]
    pub file: Option<PathBuf>,

    /// 1-based line of the location
    #[arg(long, requires = "file")]
    pub line: Option<u32>,

    /// 1-based column of the location
    #[arg(long, requires = "file", default_value_t = 1)]
    pub column: u32,
}

impl QueryArgs {
    /// Relative files are taken from the current directory
    pub fn to_query(&self) -> anyhow::Result<ActionQuery> {
        if let (Some(file), Some(line)) = (&self.file, self.line) {
            let file = if file.is_absolute() {
                file.clone()
            } else {
                std::env::current_dir()?.join(file)
            };
            return Ok(ActionQuery::at(SourceLocation::new(file, line, self.column)));
        }
        if self.diagnostic_ids.is_empty() {
            Ok(ActionQuery::all())
        } else {
            Ok(ActionQuery::for_diagnostics(self.diagnostic_ids.iter().cloned()))
        }
    }
}

#[derive(Debug, Args)]
pub struct ActionsArgs {
    pub path: PathBuf,

    #[command(flatten)]
    pub query: QueryArgs,
}

pub async fn execute(config: Option<&Path>, args: ActionsArgs) -> anyhow::Result<()> {
    let query = args.query.to_query()?;
    let session = open(config, &args.path).await?;
    let actions = session
        .workspace
        .list_actions(query, &session.cancel)
        .await?;
    print_json(&actions)
}
