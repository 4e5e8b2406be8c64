//! CLI module - Command-line interface for StudyHub
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};

use crate::services::ScopeKind;

/// StudyHub - course content backend with cached web search
#[derive(Parser)]
#[command(name = "studyhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    #[command(alias = "web")]
    Serve,

    /// Run one cached search for an exercise or lecture
    #[command(alias = "s")]
    Search {
        /// What the id refers to
        #[arg(value_enum)]
        kind: OwnerKind,
        /// Exercise or lecture ID
        id: i32,
        /// Search query; derived from the owner when omitted
        query: Vec<String>,
    },

    /// Show the most recently stored results for an exercise or lecture
    #[command(alias = "r")]
    Recent {
        #[arg(value_enum)]
        kind: OwnerKind,
        id: i32,
        /// Number of results to show
        #[arg(long, short, default_value = "5")]
        limit: u64,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OwnerKind {
    Exercise,
    Lecture,
}

impl From<OwnerKind> for ScopeKind {
    fn from(kind: OwnerKind) -> Self {
        match kind {
            OwnerKind::Exercise => Self::Exercise,
            OwnerKind::Lecture => Self::Lecture,
        }
    }
}

pub use commands::*;
