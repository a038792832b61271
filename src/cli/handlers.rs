use crate::cli::commands::CliArgs;
use crate::config::Toolchain;
use crate::pipeline::{PipelineContext, PipelineOrchestrator};
use crate::process::ProcessRunner;
use crate::util::{init_logging, LoggingConfig, RunLog};
use crate::VERSION;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Runs the whole procedure and returns the process exit code
pub fn handle_run(args: CliArgs) -> i32 {
    // Nothing is touched before the environment checks out
    let toolchain = match Toolchain::from_env() {
        Ok(toolchain) => toolchain,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let logging = LoggingConfig::from_flags(args.log_level.as_deref(), args.verbose, args.quiet);
    let mut config = match args.into_config(toolchain) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    // The run log is only created for a configuration that checks out
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return 1;
    }

    let run_log = match RunLog::open(&config.log_file()) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("{:#}", e);
            return 1;
        }
    };
    let file_layer_handle = match run_log.handle() {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Could not attach the log file to the logger: {}", e);
            None
        }
    };
    init_logging(logging, file_layer_handle);

    config.target_dir = absolute(&config.target_dir);
    config.output_dir = absolute(&config.output_dir);

    info!("Version {}", VERSION);
    if config.testing_mode {
        warn!("The program is running in testing mode. No benchmark will be executed.");
    }
    info!(
        log = %run_log.path().display(),
        output = %config.output_dir.display(),
        "Files to remove: {:?}",
        config.files_to_remove
    );
    info!("Additional dependencies: {:?}", config.extra_dependencies);
    info!("Additional properties: {:?}", config.extra_properties);
    info!("Resources folder: {}", config.resources_name);
    info!(
        "Default Java version (if not specified): {}",
        config.default_java_version
    );
    debug!("Configuration: {:?}", config);

    let runner = match run_log.handle() {
        Ok(handle) => ProcessRunner::new(Some(handle)),
        Err(e) => {
            warn!(error = %e, "Child processes will write to the terminal");
            ProcessRunner::default()
        }
    };

    let mut context = PipelineContext::new(config, runner);
    match PipelineOrchestrator.execute(&mut context) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            error!("Aborting...");
            1
        }
    }
}

/// Children run in other directories, so relative paths are resolved up front
fn absolute(path: &Path) -> std::path::PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}
