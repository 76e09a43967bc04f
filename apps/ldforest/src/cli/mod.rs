//! # ldforest CLI Module
//!
//! This module implements the CLI interface for ldforest.
//!
//! ## Available Commands
//!
//! - `resolve` - Resolve a graph into nested subjects
//! - `entity` - Parse a single-entity document
//! - `collection` - Normalize a collection document
//! - `nested` - Resolve a collection, optionally filtered by class
//! - `ordered` - List the members of an ordered collection
//! - `lift` - Parse an annotation and add its flat keys
//! - `lower` - Fold flat annotation keys into the nested shape
//! - `label` - Show glossary labels
//! - `record` - Show a record with its ontology fields

mod commands;

use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use ldforest_core::LdError;
use serde_json::Value;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// ldforest - JSON-LD graph resolver
///
/// Reads compacted JSON-LD documents and prints them as nested JSON.
#[derive(Parser, Debug)]
#[command(name = "ldforest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (default: ./ldforest.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Where a command reads its document from.
#[derive(Args, Debug, Clone, Default)]
pub struct Input {
    /// Input file (reads stdin when omitted)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl Input {
    fn read(&self, config: &Config) -> Result<Value, LdError> {
        read_document(self.file.as_deref(), config.max_input_size)
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve every subject of a graph
    Resolve {
        #[command(flatten)]
        input: Input,

        /// Keep only subjects no other subject references
        #[arg(short, long)]
        top_level: bool,
    },

    /// Parse a document holding exactly one top-level subject
    Entity {
        #[command(flatten)]
        input: Input,
    },

    /// Normalize a collection document without resolving it
    Collection {
        #[command(flatten)]
        input: Input,
    },

    /// Resolve a collection document
    Nested {
        #[command(flatten)]
        input: Input,

        /// Keep only subjects of this @type (default: config target_class)
        #[arg(short = 't', long)]
        class: Option<String>,
    },

    /// List the members of an ActivityStreams ordered collection
    Ordered {
        #[command(flatten)]
        input: Input,
    },

    /// Parse an annotation and add its flat keys
    Lift {
        #[command(flatten)]
        input: Input,
    },

    /// Fold flat annotation keys back into the nested shape
    Lower {
        #[command(flatten)]
        input: Input,
    },

    /// Show glossary labels
    Label {
        #[command(flatten)]
        input: Input,

        /// Subject id to look up (default: list every subject)
        #[arg(long)]
        id: Option<String>,
    },

    /// Show a record with the ontology fields that apply to it
    Record {
        #[command(flatten)]
        input: Input,

        /// Record ontology document
        #[arg(short, long)]
        ontology: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), LdError> {
    let config = Config::discover(cli.config.as_deref())?;
    let output = run(&cli.command, &config)?;
    println!("{}", render(&output, cli.pretty)?);
    Ok(())
}

/// Run one command and return its output value.
pub fn run(command: &Commands, config: &Config) -> Result<Value, LdError> {
    match command {
        Commands::Resolve { input, top_level } => {
            cmd_resolve(&input.read(config)?, *top_level, config.limits())
        }
        Commands::Entity { input } => cmd_entity(&input.read(config)?),
        Commands::Collection { input } => Ok(cmd_collection(&input.read(config)?)),
        Commands::Nested { input, class } => {
            let class = class.as_deref().or(config.target_class.as_deref());
            cmd_nested(&input.read(config)?, class)
        }
        Commands::Ordered { input } => {
            cmd_ordered(&input.read(config)?, &config.activity_streams_prefix)
        }
        Commands::Lift { input } => cmd_lift(&input.read(config)?),
        Commands::Lower { input } => cmd_lower(&input.read(config)?),
        Commands::Label { input, id } => Ok(cmd_label(
            &input.read(config)?,
            id.as_deref(),
            &config.preferred_language,
        )),
        Commands::Record { input, ontology } => {
            let ontology = read_document(Some(ontology.as_path()), config.max_input_size)?;
            cmd_record(&input.read(config)?, &ontology, &config.preferred_language)
        }
    }
}
