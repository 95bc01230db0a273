use clap::Parser;
use cloud_filter::{
    Cli, CloudFilter, CloudFilterError, Operation, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let cloud_filter = match CloudFilter::from_cli(&cli) {
        Ok(cloud_filter) => cloud_filter,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        print_dry_run_plan(&cloud_filter);
    }

    match cloud_filter.run() {
        Ok(report) => {
            cloud_filter.output_formatter().print_filter_report(&report);
            0
        }
        Err(e) => {
            cloud_filter.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &CloudFilterError) -> i32 {
    match error {
        CloudFilterError::Config { .. } => 2,
        CloudFilterError::MalformedHeader { .. }
        | CloudFilterError::MissingElement { .. }
        | CloudFilterError::InvalidCoverage { .. } => 3,
        CloudFilterError::PathTraversal { .. } => 4,
        CloudFilterError::MissingArchive { .. } | CloudFilterError::InvalidPath { .. } => 5,
        _ => 1, // General error
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "cloud-filter.toml".to_string());

    match CloudFilter::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  cloud-filter --data_dir <DIR> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_dry_run_plan(cloud_filter: &CloudFilter) {
    let formatter = cloud_filter.output_formatter();
    let config = cloud_filter.config();

    formatter.print_header("Dry run");
    formatter.info(&format!("Data directory: {}", cloud_filter.data_dir().display()));
    formatter.info(&format!("Operation: {}", cloud_filter.operation()));
    formatter.info(&format!("Cloud window: {}", cloud_filter.window()));
    formatter.info(&format!(
        "Scene files: *{} headers, *{} archives",
        config.scenes.header_suffix, config.scenes.archive_suffix
    ));
    formatter.info(&format!(
        "Coverage element: {{{}}}{}",
        config.header.namespace,
        config.header.coverage_path.join("/")
    ));

    if cloud_filter.operation() == Operation::Extract {
        formatter.info(&format!(
            "Delete scenes outside the window: {}",
            config.filter.delete_unmatched
        ));
    }

    formatter.print_separator();
}

fn print_startup_error(error: &CloudFilterError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
