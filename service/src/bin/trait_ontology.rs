//! `trait-ontology` command-line interface
//!
//! Converts crop trait ontologies between the Trait Workbook, the Trait
//! Dictionary and OBO.

use colored::Colorize;
use std::process::ExitCode;
use trait_ontology_service::cli;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
