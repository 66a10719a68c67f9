mod error;
mod info;
mod result;
mod session;
mod validation;

// Re-export public types
pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use result::{PipelineResult, SessionOutcome};
pub use session::{process_source, run_session};
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::{FileProcessor, OpenedFile};
use crate::logging::{self, codes};
use crate::tokens::{dump_path_for, DumpError, DumpWriter, Token};
use crate::{log_error, log_info, log_success};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

/// Process a single file through the complete pipeline (file -> scanner -> dump -> rule walker)
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(Path::new(file_path), &RuntimeConfig::default())
}

/// Process a single file with explicit runtime preferences
pub fn process_file_with_config(
    file_path: &Path,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    process_file_with_observer(file_path, config, &mut |_| {})
}

/// Process a single file, handing every accepted token to `observer`
pub fn process_file_with_observer(
    file_path: &Path,
    config: &RuntimeConfig,
    observer: &mut dyn FnMut(&Token),
) -> Result<PipelineResult, PipelineError> {
    process_file_in_context(file_path, 0, config, observer)
}

pub(crate) fn process_file_in_context(
    file_path: &Path,
    file_id: usize,
    config: &RuntimeConfig,
    observer: &mut dyn FnMut(&Token),
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    // Set up file context for global logging
    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        let display_path = file_path.display().to_string();
        log_info!("Starting box file processing pipeline",
            "file" => display_path.as_str(),
            "write_token_dump" => config.lexical.write_token_dump
        );

        // Stage 1: File processing
        let OpenedFile {
            reader, metadata, ..
        } = FileProcessor::from_preferences(&config.file_processor).open_file(file_path)?;

        // Stages 2-4: scanning, dump persistence and rule validation in lock step
        let (outcome, dump_path) = if config.lexical.write_token_dump {
            let dump_path = dump_path_for(&metadata.path);
            let mut writer = DumpWriter::new(BufWriter::new(create_dump_file(&dump_path)?));
            let outcome = session::run_session(reader, Some(&mut writer), config, observer)?;
            finish_dump(writer, &dump_path)?;
            (outcome, Some(dump_path))
        } else {
            let outcome = session::run_session(
                reader,
                None::<&mut DumpWriter<BufWriter<File>>>,
                config,
                observer,
            )?;
            (outcome, None)
        };

        let result = PipelineResult::new(metadata, outcome, dump_path, start_time.elapsed());
        result.log_success(&display_path);

        Ok(result)
    })
}

fn create_dump_file(dump_path: &Path) -> Result<File, DumpError> {
    File::create(dump_path).map_err(|e| {
        let error = DumpError::Write(e);
        log_error!(error.error_code(), "Failed to create token dump file",
            "path" => dump_path.display(),
            "io_error" => &error
        );
        error
    })
}

fn finish_dump(writer: DumpWriter<BufWriter<File>>, dump_path: &Path) -> Result<(), DumpError> {
    let records = writer.records_written();
    writer.finish().map_err(|error| {
        log_error!(error.error_code(), "Failed to flush token dump",
            "path" => dump_path.display(),
            "io_error" => &error
        );
        error
    })?;

    log_success!(
        codes::success::TOKEN_DUMP_WRITTEN,
        "Token dump written",
        "path" => dump_path.display(),
        "records" => records
    );
    Ok(())
}
