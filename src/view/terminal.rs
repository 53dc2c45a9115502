use std::io::{self, Write};

use log::error;

use crate::dashboard::{DashboardSink, DashboardSnapshot};
use crate::settings::Density;

use super::render::render_dashboard;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Redraws the dashboard on stdout after every update.
pub struct TerminalSink {
    density: Density,
    redraw: bool,
}

impl TerminalSink {
    /// `redraw` clears the screen before each frame (live mode).
    pub fn new(density: Density, redraw: bool) -> Self {
        Self { density, redraw }
    }

    pub fn print(&self, snapshot: &DashboardSnapshot) -> io::Result<()> {
        let frame = render_dashboard(snapshot, self.density);
        let mut stdout = io::stdout().lock();
        if self.redraw {
            stdout.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()
    }
}

impl DashboardSink for TerminalSink {
    fn dashboard_updated(&self, snapshot: &DashboardSnapshot) {
        if let Err(err) = self.print(snapshot) {
            error!("failed to draw dashboard: {err}");
        }
    }
}
