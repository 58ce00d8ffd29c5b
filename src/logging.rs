use flexi_logger::{
    colored_default_format, opt_format, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger,
    LoggerHandle, Naming,
};

/// Starts the global logger.
///
/// The level comes from `RUST_LOG` when set, `default_level` otherwise. With a
/// `log_dir`, output goes to size-rotated files in that directory instead of
/// stderr. Keep the returned handle alive for the duration of the program.
pub fn setup_logging(
    default_level: &str,
    log_dir: Option<&str>,
) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(default_level)?;
    match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .format(opt_format)
            .rotate(
                Criterion::Size(10 * 1024 * 1024), // 10 MB per file
                Naming::Numbers,
                Cleanup::KeepLogFiles(7),
            )
            .start(),
        None => logger.format(colored_default_format).start(),
    }
}
