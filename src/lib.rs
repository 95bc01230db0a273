pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod header;
pub mod scanner;
pub mod ui;
pub mod window;

// Public API re-exports
pub use cli::{Cli, Operation, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, HeaderConfig, SceneConfig};
pub use error::{CloudFilterError, Result, UserFriendlyError};
pub use window::CoverageWindow;

// Core functionality re-exports
pub use extractor::{ArchiveExtractor, FilterReport, SceneAction, SceneCleaner, SceneOutcome};
pub use header::CoverageReader;
pub use scanner::{HeaderFilter, Scene, SceneFiles, SceneScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// One filtering pass over a directory of scenes.
pub struct CloudFilter {
    config: Config,
    data_dir: PathBuf,
    operation: Operation,
    dry_run: bool,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl CloudFilter {
    pub fn new<P: Into<PathBuf>>(
        config: Config,
        data_dir: P,
        operation: Operation,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Self {
        // Report output is meant for pipes: only match lines go to stdout
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet)
            .with_status_on_stderr(operation == Operation::Report);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            data_dir: data_dir.into(),
            operation,
            dry_run: false,
            output_formatter,
            progress_manager,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create CloudFilter instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let data_dir = cli_args
            .data_dir
            .clone()
            .ok_or_else(|| CloudFilterError::InvalidPath {
                path: "no data directory given (use --data_dir)".to_string(),
            })?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            data_dir,
            cli_args.operation,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        )
        .with_dry_run(cli_args.dry_run))
    }

    pub fn window(&self) -> CoverageWindow {
        CoverageWindow::new(self.config.filter.cloud_min, self.config.filter.cloud_max)
    }

    /// Reads every scene header in the data directory and reports, deletes or
    /// extracts scenes according to the operation.
    ///
    /// The first failing scene aborts the run; scenes handled before it keep
    /// their side effects.
    pub fn run(&self) -> Result<FilterReport> {
        let window = self.window();
        let mut report =
            FilterReport::new(self.data_dir.clone(), self.operation, window, self.dry_run);

        if !window.is_ordered() {
            self.output_formatter.warning(&format!(
                "Cloud window {} is empty: cloud_min is greater than cloud_max",
                window
            ));
        } else if !window.is_within_percent_range() {
            self.output_formatter
                .warning(&format!("Cloud window {} reaches outside 0-100%", window));
        }

        if self.dry_run {
            self.output_formatter
                .info("DRY RUN MODE - no file will be deleted or extracted");
        }

        let scanner = SceneScanner::new(&self.config.scenes)?;
        let scenes = self.scan_scenes(&scanner)?;

        if scenes.is_empty() {
            self.output_formatter.warning(&format!(
                "No *{} header found in {}",
                self.config.scenes.header_suffix,
                self.data_dir.display()
            ));
            report.finish();
            return Ok(report);
        }

        self.output_formatter.start_operation(&format!(
            "Filtering {} scenes by cloud coverage {} ({})",
            scenes.len(),
            window,
            self.operation
        ));

        let stems: Vec<String> = scenes.iter().map(|files| files.stem.clone()).collect();
        let reader = CoverageReader::new(&self.config.header);
        let pb = self.progress_manager.create_scene_progress(scenes.len() as u64);

        for (index, files) in scenes.into_iter().enumerate() {
            ui::progress::update_scene_progress(&pb, &files.stem, index as u64);

            let cloud_coverage = match reader.read_coverage(&files.header_path) {
                Ok(coverage) => coverage,
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            };
            let scene = Scene::new(files, cloud_coverage);

            let outcome = match self.process_scene(&scanner, &scene, &stems, &window, &pb) {
                Ok(outcome) => outcome,
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            };

            ui::progress::suspend(&pb, || {
                self.output_formatter.print_scene_outcome(&outcome, self.dry_run)
            });
            report.record(outcome);
        }

        pb.set_position(report.total_scenes() as u64);
        ui::progress::finish_progress_with_summary(
            &pb,
            &format!("Processed {} scenes", report.total_scenes()),
            report.elapsed(),
        );

        report.finish();
        Ok(report)
    }

    fn scan_scenes(&self, scanner: &SceneScanner) -> Result<Vec<SceneFiles>> {
        let scenes = scanner.scan_directory(&self.data_dir)?;

        let stats = scanner.get_statistics(&scenes);
        self.output_formatter.debug(&stats.display_summary());

        Ok(scenes)
    }

    fn process_scene(
        &self,
        scanner: &SceneScanner,
        scene: &Scene,
        stems: &[String],
        window: &CoverageWindow,
        pb: &indicatif::ProgressBar,
    ) -> Result<SceneOutcome> {
        let matched = window.contains(scene.cloud_coverage);

        let (action, paths) = match (self.operation, matched) {
            (Operation::Report, true) => {
                let pattern = scene.files.wildcard_pattern();
                (SceneAction::Reported, vec![pattern])
            }
            (Operation::Extract, true) => {
                let extracted = ArchiveExtractor::new()
                    .with_dry_run(self.dry_run)
                    .extract_scene_archive(&scene.files.archive_path, &self.data_dir)?;
                let paths = extracted
                    .entries
                    .iter()
                    .map(|entry| self.data_dir.join(entry))
                    .collect();
                (SceneAction::Extracted, paths)
            }
            (Operation::Delete, false) => {
                (SceneAction::Deleted, self.remove_scene(scanner, scene, stems)?)
            }
            (Operation::Extract, false) if self.config.filter.delete_unmatched => {
                (SceneAction::Deleted, self.remove_scene(scanner, scene, stems)?)
            }
            _ => (SceneAction::Kept, Vec::new()),
        };

        let outcome = SceneOutcome {
            stem: scene.stem().to_string(),
            cloud_coverage: scene.cloud_coverage,
            matched,
            action,
            paths,
        };

        if action == SceneAction::Reported {
            if let Some(pattern) = outcome.paths.first() {
                ui::progress::suspend(pb, || self.output_formatter.emit_match(pattern, &outcome));
            }
        }

        Ok(outcome)
    }

    fn remove_scene(
        &self,
        scanner: &SceneScanner,
        scene: &Scene,
        stems: &[String],
    ) -> Result<Vec<PathBuf>> {
        let members = scanner.stem_members(&self.data_dir, scene.stem(), stems)?;
        SceneCleaner::new()
            .with_dry_run(self.dry_run)
            .remove_scene_files(&members)
    }

    /// Writes the default configuration as a starting point for editing.
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &CloudFilterError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Filters `data_dir` with default settings and no console chatter.
pub fn filter_cloud_coverage<P: AsRef<Path>>(
    data_dir: P,
    cloud_min: i64,
    cloud_max: i64,
    operation: Operation,
    delete_unmatched: bool,
) -> Result<FilterReport> {
    let mut config = Config::default();
    config.filter.cloud_min = cloud_min;
    config.filter.cloud_max = cloud_max;
    config.filter.delete_unmatched = delete_unmatched;

    CloudFilter::new(
        config,
        data_dir.as_ref(),
        operation,
        OutputMode::Plain,
        0,
        true,
    )
    .run()
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tar::{Builder, Header};
    use tempfile::TempDir;

    fn header_xml(coverage: i64) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Earth_Explorer_Header xmlns="http://eop-cfi.esa.int/CFI">
  <Variable_Header>
    <Specific_Product_Header>
      <Product_Information>
        <Cloud_Percentage>{}</Cloud_Percentage>
      </Product_Information>
    </Specific_Product_Header>
  </Variable_Header>
</Earth_Explorer_Header>"#,
            coverage
        )
    }

    /// Header, archive holding `<stem>DBL.DIR/band.TIF`, and a quicklook sidecar.
    fn create_scene(root: &Path, name: &str, coverage: i64) {
        fs::write(root.join(format!("{}.HDR", name)), header_xml(coverage)).unwrap();
        fs::write(root.join(format!("{}.QLK.jpg", name)), "jpeg").unwrap();

        let archive = File::create(root.join(format!("{}.DBL", name))).unwrap();
        let mut builder = Builder::new(archive);
        let mut header = Header::new_gnu();
        header.set_size(6);
        header.set_mode(0o644);
        builder
            .append_data(
                &mut header,
                format!("{}.DBL.DIR/band.TIF", name),
                "pixels".as_bytes(),
            )
            .unwrap();
        builder.finish().unwrap();
    }

    fn create_test_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        create_scene(temp_dir.path(), "SCENE_A", 30);
        create_scene(temp_dir.path(), "SCENE_B", 80);
        temp_dir
    }

    fn list_dir(root: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn filter(root: &Path, min: i64, max: i64, operation: Operation) -> CloudFilter {
        let mut config = Config::default();
        config.filter.cloud_min = min;
        config.filter.cloud_max = max;
        CloudFilter::new(config, root, operation, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_report_lists_matching_scenes_only() {
        let temp_dir = create_test_dir();
        let before = list_dir(temp_dir.path());

        let report = filter(temp_dir.path(), 0, 50, Operation::Report).run().unwrap();

        assert_eq!(report.matched_stems(), vec!["SCENE_A."]);
        assert_eq!(report.count_action(SceneAction::Reported), 1);
        assert_eq!(
            report.scenes[0].paths,
            vec![temp_dir.path().join("SCENE_A.*")]
        );
        assert_eq!(list_dir(temp_dir.path()), before);
    }

    #[test]
    fn test_report_is_repeatable() {
        let temp_dir = create_test_dir();

        let first = filter(temp_dir.path(), 20, 90, Operation::Report).run().unwrap();
        let second = filter(temp_dir.path(), 20, 90, Operation::Report).run().unwrap();

        assert_eq!(first.matched_stems(), vec!["SCENE_A.", "SCENE_B."]);
        assert_eq!(first.matched_stems(), second.matched_stems());
    }

    #[test]
    fn test_delete_removes_unmatched_scene_files() {
        let temp_dir = create_test_dir();

        let report = filter(temp_dir.path(), 0, 50, Operation::Delete).run().unwrap();

        assert_eq!(report.count_action(SceneAction::Deleted), 1);
        assert_eq!(report.removed_paths().len(), 3);
        assert_eq!(
            list_dir(temp_dir.path()),
            vec!["SCENE_A.DBL", "SCENE_A.HDR", "SCENE_A.QLK.jpg"]
        );
    }

    #[test]
    fn test_delete_spares_scene_with_longer_stem() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("S1HDR"), header_xml(80)).unwrap();
        fs::write(root.join("S1DBL"), "").unwrap();
        fs::write(root.join("S10HDR"), header_xml(10)).unwrap();
        fs::write(root.join("S10DBL"), "").unwrap();

        let report = filter(root, 0, 50, Operation::Delete).run().unwrap();

        assert_eq!(report.matched_stems(), vec!["S10"]);
        assert_eq!(list_dir(root), vec!["S10DBL", "S10HDR"]);
    }

    #[test]
    fn test_extract_unpacks_and_deletes_the_rest() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();

        let report = filter(root, 0, 50, Operation::Extract).run().unwrap();

        assert_eq!(report.count_action(SceneAction::Extracted), 1);
        assert_eq!(report.count_action(SceneAction::Deleted), 1);
        assert!(!root.join("SCENE_A.DBL").exists());
        assert_eq!(
            fs::read_to_string(root.join("SCENE_A.DBL.DIR/band.TIF")).unwrap(),
            "pixels"
        );
        assert_eq!(
            list_dir(root),
            vec!["SCENE_A.DBL.DIR", "SCENE_A.HDR", "SCENE_A.QLK.jpg"]
        );
    }

    #[test]
    fn test_extract_without_delete_keeps_unmatched() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();

        let report = filter_cloud_coverage(root, 0, 50, Operation::Extract, false).unwrap();

        assert_eq!(report.count_action(SceneAction::Kept), 1);
        assert!(root.join("SCENE_B.DBL").exists());
        assert!(root.join("SCENE_B.HDR").exists());
        assert!(!root.join("SCENE_A.DBL").exists());
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let temp_dir = create_test_dir();
        let before = list_dir(temp_dir.path());

        let report = filter(temp_dir.path(), 0, 50, Operation::Extract)
            .with_dry_run(true)
            .run()
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.count_action(SceneAction::Extracted), 1);
        assert_eq!(report.count_action(SceneAction::Deleted), 1);
        assert_eq!(list_dir(temp_dir.path()), before);
    }

    #[test]
    fn test_out_of_order_window_matches_nothing() {
        let temp_dir = create_test_dir();

        let report = filter(temp_dir.path(), 90, 10, Operation::Report).run().unwrap();

        assert!(report.matched_stems().is_empty());
        assert_eq!(report.total_scenes(), 2);
    }

    #[test]
    fn test_malformed_header_aborts_run() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("SCENE_0.HDR"), "<broken").unwrap();

        let result = filter(temp_dir.path(), 0, 50, Operation::Delete).run();

        assert!(matches!(result, Err(CloudFilterError::MalformedHeader { .. })));
        // SCENE_0 sorts first, so nothing was deleted
        assert!(temp_dir.path().join("SCENE_B.HDR").exists());
    }

    #[test]
    fn test_missing_archive_aborts_extract() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("LONELY.HDR"), header_xml(10)).unwrap();

        let result = filter(temp_dir.path(), 0, 50, Operation::Extract).run();
        assert!(matches!(result, Err(CloudFilterError::MissingArchive { .. })));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let report = filter(temp_dir.path(), 0, 100, Operation::Report).run().unwrap();
        assert_eq!(report.total_scenes(), 0);
    }

    #[test]
    fn test_missing_data_dir() {
        let result = filter(Path::new("/nonexistent/venus"), 0, 100, Operation::Report).run();
        assert!(matches!(result, Err(CloudFilterError::InvalidPath { .. })));
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        CloudFilter::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[scenes]"));
        assert!(content.contains("[header]"));
        assert!(content.contains("[filter]"));
    }

    #[test]
    fn test_from_cli() {
        let cli = <Cli as clap::Parser>::try_parse_from([
            "cloud-filter",
            "--data_dir",
            "/data",
            "--cloud_max",
            "40",
            "--operation",
            "delete",
            "--dry-run",
        ])
        .unwrap();

        let cloud_filter = CloudFilter::from_cli(&cli).unwrap();
        assert_eq!(cloud_filter.data_dir(), Path::new("/data"));
        assert_eq!(cloud_filter.operation(), Operation::Delete);
        assert_eq!(cloud_filter.window(), CoverageWindow::new(0, 40));
        assert!(cloud_filter.is_dry_run());
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
