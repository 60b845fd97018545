//! Rate-limited scan progress reporting.
//!
//! The reporter is a small state machine (`Idle -> Scanning -> Finished`)
//! driven synchronously from the walk loop. Counters always advance;
//! rendering is coalesced so that at most one line is emitted per
//! `update_interval`, however many updates arrive in between.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use strum::{Display, EnumString};

/// How much detail to render. Affects display only, never the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProgressMode {
    /// No output at all.
    Silent,
    /// Single-line bar with percentage and ETA.
    #[default]
    Simple,
    /// File/dir counters and elapsed time.
    Detailed,
    /// Counters plus the entry currently being processed.
    Verbose,
}

/// Reporter lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Scanning,
    Finished,
}

/// Progress state machine consumed by the scanner and the dependency mapper.
#[derive(Debug)]
pub struct ProgressReporter {
    mode: ProgressMode,
    update_interval: Duration,
    show_eta: bool,

    phase: ScanPhase,
    files_processed: u64,
    dirs_processed: u64,
    total_files: u64,
    total_dirs: u64,
    current_path: PathBuf,

    started_at: Option<Instant>,
    last_render: Option<Instant>,
    renders: u64,
}

impl ProgressReporter {
    /// Create a reporter with the default half-second render interval.
    pub fn new(mode: ProgressMode) -> Self {
        Self {
            mode,
            update_interval: Duration::from_millis(500),
            show_eta: true,
            phase: ScanPhase::Idle,
            files_processed: 0,
            dirs_processed: 0,
            total_files: 0,
            total_dirs: 0,
            current_path: PathBuf::new(),
            started_at: None,
            last_render: None,
            renders: 0,
        }
    }

    /// A reporter that never renders.
    pub fn silent() -> Self {
        Self::new(ProgressMode::Silent)
    }

    /// Override the render coalescing interval.
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Enter the `Scanning` state and reset all counters.
    pub fn start_scan(&mut self, root: &Path) {
        self.phase = ScanPhase::Scanning;
        self.files_processed = 0;
        self.dirs_processed = 0;
        self.total_files = 0;
        self.total_dirs = 0;
        self.current_path = PathBuf::new();
        self.started_at = Some(Instant::now());
        self.last_render = None;
        self.renders = 0;

        if self.mode != ProgressMode::Silent {
            eprintln!("Scanning {}...", root.display());
        }
    }

    /// Announce known totals (e.g. when analyzing a pre-counted file list).
    pub fn set_totals(&mut self, files: u64, dirs: u64) {
        self.total_files = self.total_files.max(files);
        self.total_dirs = self.total_dirs.max(dirs);
    }

    /// Advance the counters and render if the interval elapsed.
    ///
    /// Counter updates take the max of old and new values, so interleaved
    /// or repeated calls can never move progress backwards.
    pub fn update_progress(&mut self, files: u64, dirs: u64, current: Option<&Path>) {
        if self.phase != ScanPhase::Scanning {
            return;
        }
        self.files_processed = self.files_processed.max(files);
        self.dirs_processed = self.dirs_processed.max(dirs);
        self.total_files = self.total_files.max(self.files_processed);
        self.total_dirs = self.total_dirs.max(self.dirs_processed);
        if let Some(path) = current {
            self.current_path = path.to_path_buf();
        }

        let now = Instant::now();
        let due = match self.last_render {
            None => true,
            Some(last) => now.duration_since(last) >= self.update_interval,
        };
        if due {
            self.render();
            self.last_render = Some(now);
        }
    }

    /// Enter the `Finished` state and print the closing summary.
    pub fn finish_scan(&mut self, total_files: u64, total_dirs: u64) {
        self.files_processed = self.files_processed.max(total_files);
        self.dirs_processed = self.dirs_processed.max(total_dirs);
        self.phase = ScanPhase::Finished;

        if self.mode != ProgressMode::Silent {
            eprintln!(
                "Scan completed in {:.2}s: {} files, {} directories",
                self.elapsed().as_secs_f64(),
                self.files_processed,
                self.dirs_processed
            );
        }
    }

    fn render(&mut self) {
        match self.mode {
            ProgressMode::Silent => return,
            ProgressMode::Simple => {
                let eta = match self.eta() {
                    _ if !self.show_eta => String::new(),
                    Some(eta) => format!(" | ETA: {}s", eta.as_secs()),
                    None => " | ETA: ∞".to_string(),
                };
                eprint!(
                    "\rProgress: {:.1}% ({}/{}){}",
                    self.percentage(),
                    self.processed_items(),
                    self.total_items(),
                    eta
                );
            }
            ProgressMode::Detailed => {
                eprint!(
                    "\rFiles: {} | Dirs: {} | Time: {:.1}s",
                    self.files_processed,
                    self.dirs_processed,
                    self.elapsed().as_secs_f64()
                );
            }
            ProgressMode::Verbose => {
                eprint!(
                    "\r[{:.1}s] Files: {} | Dirs: {} | Current: {}",
                    self.elapsed().as_secs_f64(),
                    self.files_processed,
                    self.dirs_processed,
                    self.current_path.display()
                );
            }
        }
        self.renders += 1;
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Files plus directories processed so far.
    pub fn processed_items(&self) -> u64 {
        self.files_processed + self.dirs_processed
    }

    /// Files plus directories known so far.
    pub fn total_items(&self) -> u64 {
        self.total_files + self.total_dirs
    }

    /// Progress as a percentage of known items; 0 when nothing is known.
    pub fn percentage(&self) -> f64 {
        let total = self.total_items();
        if total == 0 {
            0.0
        } else {
            (self.processed_items() as f64 / total as f64) * 100.0
        }
    }

    /// Estimated time remaining; `None` means infinite (nothing processed).
    pub fn eta(&self) -> Option<Duration> {
        let processed = self.processed_items();
        if processed == 0 {
            return None;
        }
        let elapsed = self.elapsed().as_secs_f64();
        let rate = processed as f64 / elapsed.max(f64::EPSILON);
        let remaining = self.total_items().saturating_sub(processed) as f64;
        Some(Duration::from_secs_f64(remaining / rate))
    }

    /// Time since `start_scan`.
    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Number of real renders emitted (rate-limited updates excluded).
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(ProgressMode::default())
    }
}
