//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lovescale")]
#[command(about = "Emotion journal for a relationship, with trend analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Journal profile (default: `default_user` from config)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new journal
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Score normalization (thirds, saturating)
        #[arg(short, long, default_value = "thirds")]
        normalization: String,
    },

    /// Score and save a day's entry
    Record {
        /// Day of the entry (today, yesterday, "3 days ago", 2025-01-17)
        #[arg(short, long, default_value = "today")]
        date: String,

        /// What went well (omit for "none / not sure")
        #[arg(short, long)]
        positive: Option<String>,

        /// What was difficult (omit for "none / not sure")
        #[arg(short, long)]
        negative: Option<String>,
    },

    /// Replace the texts of an existing entry and rescore it
    Edit {
        /// Day of the entry to edit
        #[arg(short, long)]
        date: String,

        #[arg(short, long)]
        positive: Option<String>,

        #[arg(short, long)]
        negative: Option<String>,
    },

    /// Delete the entry for a day
    Delete {
        #[arg(short, long)]
        date: String,
    },

    /// List recorded entries, oldest first
    List,

    /// Show trend analysis
    Trend {
        /// Number of latest entries compared against the rest
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Score a single text without saving
    Score {
        text: String,
    },

    /// List profiles with stored entries
    Users,

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}
