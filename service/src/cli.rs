//! Command-line interface for trait ontology conversion.
//!
//! Three independent commands:
//! - `td2wb`: Trait Dictionary (file or registry) to Trait Workbook
//! - `wb2td`: Trait Workbook to Trait Dictionary and/or OBO
//! - `obo-namespace`: merge OBO namespaces into one

use crate::fetch::HttpFetcher;
use crate::pipeline::{self, DictionarySource};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use trait_ontology_core::config::ConverterConfig;
use trait_ontology_core::diagnostics::Diagnostics;
use trait_ontology_core::error::Result;
use tracing_subscriber::EnvFilter;

/// Convert crop trait ontologies between workbook, dictionary and OBO
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Ontology root overrides shared by the commands
#[derive(Args, Debug, Clone, Default)]
pub struct RootArgs {
    /// Ontology root id, e.g. `CO_360`
    #[arg(long = "root-id")]
    pub id: Option<String>,

    /// Ontology display name
    #[arg(long = "root-name")]
    pub name: Option<String>,

    /// Default OBO namespace
    #[arg(long)]
    pub namespace: Option<String>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a Trait Workbook from a Trait Dictionary
    Td2wb {
        /// Local dictionary file
        #[arg(short, long, conflicts_with = "remote", required_unless_present = "remote")]
        dictionary: Option<PathBuf>,

        /// Fetch the dictionary of this ontology root id from the registry
        #[arg(short, long)]
        remote: Option<String>,

        /// Workbook to write; defaults to `[output] workbook` of the config
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        root: RootArgs,
    },

    /// Build a Trait Dictionary and/or OBO file from a Trait Workbook
    Wb2td {
        /// Workbook to read
        input: PathBuf,

        /// Dictionary file to write
        #[arg(short, long)]
        dictionary: Option<PathBuf>,

        /// OBO file to write
        #[arg(short, long)]
        obo: Option<PathBuf>,

        /// Keep only variables of this institution
        #[arg(short, long)]
        institution: Option<String>,

        /// Skip required-field and uniqueness checks
        #[arg(short, long)]
        force: bool,

        /// Identity written as `saved-by`
        #[arg(short, long)]
        user: Option<String>,

        #[command(flatten)]
        root: RootArgs,
    },

    /// Merge namespaces of an OBO file into one
    OboNamespace {
        /// OBO file to read
        input: PathBuf,

        /// File to write; defaults to rewriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target namespace
        #[arg(short, long)]
        namespace: String,

        /// Namespaces to merge (repeatable)
        #[arg(short, long = "source", required = true)]
        sources: Vec<String>,
    },
}

impl Cli {
    fn init_logging(&self) {
        let level = if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    fn load_config(&self) -> Result<ConverterConfig> {
        match &self.config {
            Some(path) => ConverterConfig::from_toml_file(path),
            None => Ok(ConverterConfig::default()),
        }
    }
}

fn apply_root(config: &mut ConverterConfig, root: &RootArgs) {
    if root.id.is_some() {
        config.root.id.clone_from(&root.id);
    }
    if root.name.is_some() {
        config.root.name.clone_from(&root.name);
    }
    if root.namespace.is_some() {
        config.root.namespace.clone_from(&root.namespace);
    }
}

fn report(diagnostics: &Diagnostics) {
    if diagnostics.mismatches.is_empty() && diagnostics.conflicts.is_empty() {
        return;
    }
    eprintln!(
        "{} {} variables skipped, {} name conflicts",
        "warning:".yellow().bold(),
        diagnostics.mismatches.len(),
        diagnostics.conflicts.len()
    );
}

/// Parse arguments and run the selected command
///
/// # Errors
///
/// Returns the first fatal error of the command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    execute(&cli).await
}

/// Run an already parsed command line
///
/// # Errors
///
/// Returns the first fatal error of the command.
pub async fn execute(cli: &Cli) -> Result<()> {
    let mut config = cli.load_config()?;

    match &cli.command {
        Commands::Td2wb {
            dictionary,
            remote,
            output,
            root,
        } => {
            apply_root(&mut config, root);
            let source = match (dictionary, remote) {
                (Some(path), _) => DictionarySource::File(path.clone()),
                (None, Some(id)) => DictionarySource::Remote(id.clone()),
                (None, None) => {
                    return Err(trait_ontology_core::OntologyError::missing_input(
                        "a dictionary file or remote ontology id",
                    ));
                }
            };
            let output = workbook_output(output.as_ref(), &config)?;
            let fetcher = HttpFetcher::new(&config.fetch)?;
            let converted =
                pipeline::dictionary_to_workbook(&source, &output, &config, &fetcher).await?;
            report(&converted.diagnostics);
            println!("{} {}", "✓".green(), output.display());
        }
        Commands::Wb2td {
            input,
            dictionary,
            obo,
            institution,
            force,
            user,
            root,
        } => {
            apply_root(&mut config, root);
            if dictionary.is_some() {
                config.output.dictionary.clone_from(dictionary);
            }
            if obo.is_some() {
                config.output.obo.clone_from(obo);
            }
            if institution.is_some() {
                config.institution.clone_from(institution);
            }
            if user.is_some() {
                config.user.clone_from(user);
            }
            config.force |= *force;

            let conversion = pipeline::workbook_to_outputs(input, &config)?;
            report(&conversion.diagnostics);
            for path in [&config.output.dictionary, &config.output.obo]
                .into_iter()
                .flatten()
            {
                println!("{} {}", "✓".green(), path.display());
            }
        }
        Commands::OboNamespace {
            input,
            output,
            namespace,
            sources,
        } => {
            let output = output.as_ref().unwrap_or(input);
            pipeline::rewrite_namespaces(input, output, namespace, sources, &config)?;
            println!("{} {}", "✓".green(), output.display());
        }
    }
    Ok(())
}

/// Workbook path from the command line, else from the config
fn workbook_output(explicit: Option<&PathBuf>, config: &ConverterConfig) -> Result<PathBuf> {
    explicit
        .or(config.output.workbook.as_ref())
        .cloned()
        .ok_or_else(|| {
            trait_ontology_core::OntologyError::missing_input(
                "a workbook output path (--output or [output] workbook)",
            )
        })
}
