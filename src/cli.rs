use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::settings::{Density, Settings};

#[derive(Debug, Parser)]
#[command(
    name = "feedback-desk",
    version,
    about = "Submit customer feedback and watch the review dashboard"
)]
pub struct Cli {
    /// JSON settings file (api_base_url, request_timeout_secs, view)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL; overrides FEEDBACK_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Verbose logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one review and print the assistant's reply
    Submit {
        /// Star rating, 1 to 5
        #[arg(short, long, default_value_t = 0)]
        rating: u8,

        /// Review text; read from stdin when omitted or "-"
        #[arg(short = 'm', long)]
        review: Option<String>,
    },

    /// Poll the submission list and redraw it
    Dashboard {
        /// Seconds between refreshes
        #[arg(short, long)]
        interval: Option<u64>,

        #[arg(short, long, value_enum)]
        density: Option<Density>,

        /// Print a single snapshot and exit
        #[arg(long)]
        once: bool,
    },

    /// Check that the backend is reachable
    Ping,
}

impl Cli {
    /// Flags take precedence over file and environment values.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(url) = &self.api_url {
            settings.api_base_url = Some(url.clone());
        }
        if let Command::Dashboard {
            interval, density, ..
        } = &self.command
        {
            if let Some(secs) = interval {
                settings.view.poll_interval_secs = *secs;
            }
            if let Some(density) = density {
                settings.view.density = *density;
            }
        }
    }
}
