//! Upload progress bar and its simulated animation.
//!
//! The backend does not report upload progress, so while a request is in
//! flight the bar advances by random steps until it reaches 100%.
//!
//! # Examples
//!
//! ```
//! use pdfmerger::output::progress::{ProgressBar, SimulatedProgress};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut bar = ProgressBar::disabled();
//! bar.show();
//!
//! for percent in SimulatedProgress::new(StdRng::seed_from_u64(7)) {
//!     bar.set_width(percent);
//! }
//!
//! assert_eq!(bar.width_style(), "100%");
//! ```

use std::io::{self, Write};
use std::time::Duration;

use rand::Rng;
use tracing::trace;

/// Delay between two animation steps.
pub const DEFAULT_TICK: Duration = Duration::from_millis(200);

/// Largest random step, in percent.
pub const MAX_STEP: f64 = 30.0;

/// Steps after which the animation is forced to complete.
pub const MAX_TICKS: u32 = 1000;

const BAR_WIDTH: usize = 40;

/// A percentage bar drawn on stderr.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    /// Whether the bar is currently shown.
    visible: bool,
    /// Fill width in percent.
    width: f64,
    /// Whether anything is drawn to the terminal.
    enabled: bool,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    /// Create a hidden bar that draws when stderr is a terminal.
    pub fn new() -> Self {
        use std::io::IsTerminal;
        Self {
            visible: false,
            width: 0.0,
            enabled: io::stderr().is_terminal(),
        }
    }

    /// Create a bar that tracks state but never draws.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Make the bar visible and reset it to 0%.
    pub fn show(&mut self) {
        self.visible = true;
        self.width = 0.0;
        self.draw();
    }

    /// Hide the bar and clear its line.
    pub fn hide(&mut self) {
        self.visible = false;
        if self.enabled {
            eprint!("\r\x1b[K");
            io::stderr().flush().ok();
        }
    }

    /// Set the fill width, clamped to `0..=100`.
    pub fn set_width(&mut self, percent: f64) {
        self.width = percent.clamp(0.0, 100.0);
        self.draw();
    }

    /// Whether the bar is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Fill width in percent.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Width as a style value, e.g. `"42.5%"` or `"100%"`.
    pub fn width_style(&self) -> String {
        format!("{}%", self.width)
    }

    /// Render the bar, e.g. `[=======>      ] 42.0%`.
    pub fn render_bar(&self) -> String {
        let filled = ((self.width / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        let empty = BAR_WIDTH - filled;

        let head = if filled > 0 { ">" } else { "" };
        format!(
            "[{}{head}{}] {:.1}%",
            "=".repeat(filled.saturating_sub(1)),
            " ".repeat(empty),
            self.width
        )
    }

    /// End the bar's line.
    pub fn finish(&mut self) {
        if self.enabled && self.visible {
            eprintln!();
        }
    }

    fn draw(&self) {
        if self.enabled && self.visible {
            eprint!("\r{}", self.render_bar());
            io::stderr().flush().ok();
        }
    }
}

/// Random progress steps ending at exactly 100.
///
/// Each item is the progress after one step. The sequence ends with `100.0`
/// as soon as progress reaches 100, or after [`MAX_TICKS`] steps.
#[derive(Debug, Clone)]
pub struct SimulatedProgress<R> {
    rng: R,
    progress: f64,
    ticks: u32,
    done: bool,
}

impl<R: Rng> SimulatedProgress<R> {
    /// Start at 0%.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            progress: 0.0,
            ticks: 0,
            done: false,
        }
    }

    /// Progress reached so far.
    pub fn progress(&self) -> f64 {
        self.progress
    }
}

impl<R: Rng> Iterator for SimulatedProgress<R> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.done {
            return None;
        }

        self.ticks += 1;
        self.progress += self.rng.r#gen::<f64>() * MAX_STEP;

        if self.progress >= 100.0 || self.ticks >= MAX_TICKS {
            self.progress = 100.0;
            self.done = true;
        }

        Some(self.progress)
    }
}

/// Show `bar` and advance it one random step per `tick` until it is full.
///
/// Returns the final width style, which is always `"100%"`.
pub async fn animate<R: Rng>(bar: &mut ProgressBar, rng: R, tick: Duration) -> String {
    bar.show();

    let mut interval = tokio::time::interval(tick);
    // The first tick completes immediately.
    interval.tick().await;

    for percent in SimulatedProgress::new(rng) {
        interval.tick().await;
        bar.set_width(percent);
        trace!(percent, "Progress step");
    }

    bar.width_style()
}
