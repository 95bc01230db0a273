use crate::error::{CloudFilterError, UserFriendlyError};
use crate::extractor::{FilterReport, SceneAction, SceneOutcome};
use console::{style, Emoji, Term};
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static SATELLITE: Emoji = Emoji("🛰️  ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
    status_on_stderr: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
            status_on_stderr: false,
        }
    }

    /// Sends progress, warnings and summaries of the human and plain modes
    /// to stderr, leaving stdout to the match lines.
    pub fn with_status_on_stderr(mut self, status_on_stderr: bool) -> Self {
        self.status_on_stderr = status_on_stderr;
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    // Core messaging methods
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => self.status(format_args!("WARNING: {}", message)),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => self.status(format_args!("INFO: {}", message)),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        self.status(format_args!("  {}", style(message).dim()));
                    } else {
                        self.status(format_args!("  DEBUG: {}", message));
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => self.status(format_args!("DEBUG: {}", message)),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        self.status(format_args!("{}{}", SATELLITE, style(operation).bold()));
                    } else {
                        self.status(format_args!("> {}", operation));
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => self.status(format_args!("STARTING: {}", operation)),
            }
        }
    }

    /// Prints a matching scene as `<data_dir>/<stem>*`.
    ///
    /// Matches are the product of the `report` operation, so they are printed
    /// unadorned and even in quiet mode.
    pub fn emit_match(&self, pattern: &Path, outcome: &SceneOutcome) {
        match self.mode {
            OutputMode::Human | OutputMode::Plain => println!("{}", pattern.display()),
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "match",
                "pattern": pattern.display().to_string(),
                "stem": outcome.stem,
                "cloud_coverage": outcome.cloud_coverage,
            })),
        }
    }

    pub fn print_scene_outcome(&self, outcome: &SceneOutcome, dry_run: bool) {
        let verb = match (outcome.action, dry_run) {
            (SceneAction::Deleted, false) => "deleted",
            (SceneAction::Deleted, true) => "would delete",
            (SceneAction::Extracted, false) => "extracted",
            (SceneAction::Extracted, true) => "would extract",
            (SceneAction::Reported, _) => "reported",
            (SceneAction::Kept, _) => "kept",
        };

        self.info(&format!(
            "{} ({}% cloud cover): {}",
            outcome.stem, outcome.cloud_coverage, verb
        ));

        for path in &outcome.paths {
            self.debug(&format!("{} {}", verb, path.display()));
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &CloudFilterError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Summary and reporting
    pub fn print_filter_report(&self, report: &FilterReport) {
        match self.mode {
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(report),
            OutputMode::Plain => self.print_plain_summary(report),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                self.status(format_args!(""));
                if self.use_colors {
                    self.status(format_args!("{} {}", SPARKLES, style(title).bold().cyan()));
                } else {
                    self.status(format_args!("=== {} ===", title));
                }
                self.status(format_args!(""));
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                self.status(format_args!("=== {} ===", title));
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    self.status(format_args!("{}", style("─".repeat(60)).dim()));
                } else {
                    self.status(format_args!("{}", "-".repeat(60)));
                }
            }
            OutputMode::Plain => {
                self.status(format_args!("{}", "-".repeat(60)));
            }
            OutputMode::Json => {}
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => self.status(format_args!("{}{}", emoji, color_fn(message))),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => self.status(format_args!("{} {}", prefix, message)),
            }
        }
    }

    fn status(&self, line: fmt::Arguments<'_>) {
        if self.status_on_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    // Timing is left out of the human and plain summaries so that repeated
    // report runs print identical output.
    fn print_human_summary(&self, report: &FilterReport) {
        self.print_separator();

        let title = if report.dry_run {
            format!("Dry run of {} completed", report.operation)
        } else {
            format!("Cloud coverage {} completed", report.operation)
        };

        if self.use_colors {
            self.status(format_args!("{} {}", style(title).green().bold(), CHECKMARK));
        } else {
            self.status(format_args!("✓ {}", title));
        }

        self.status(format_args!(""));
        self.status(format_args!(
            "  Window:          {}",
            self.highlight(report.window.to_string())
        ));
        self.status(format_args!(
            "  Scenes scanned:  {}",
            self.highlight(report.total_scenes().to_string())
        ));
        self.status(format_args!(
            "  Matching:        {}",
            self.highlight(report.matched_stems().len().to_string())
        ));

        for (label, action) in [
            ("Extracted", SceneAction::Extracted),
            ("Deleted", SceneAction::Deleted),
        ] {
            let count = report.count_action(action);
            if count > 0 {
                self.status(format_args!(
                    "  {:<16} {}",
                    format!("{}:", label),
                    self.highlight(count.to_string())
                ));
            }
        }

        self.print_separator();
    }

    fn print_plain_summary(&self, report: &FilterReport) {
        self.status(format_args!("COMPLETED: {}", report.operation));
        self.status(format_args!("Window: {}", report.window));
        self.status(format_args!("Scenes: {}", report.total_scenes()));
        self.status(format_args!("Matching: {}", report.matched_stems().len()));
        self.status(format_args!(
            "Extracted: {}",
            report.count_action(SceneAction::Extracted)
        ));
        self.status(format_args!(
            "Deleted: {}",
            report.count_action(SceneAction::Deleted)
        ));
        if report.dry_run {
            self.status(format_args!("Dry run: no files were changed"));
        }
    }

    fn highlight(&self, value: String) -> String {
        if self.use_colors {
            style(value).cyan().bold().to_string()
        } else {
            value
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Error,
    Warning,
    Info,
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
