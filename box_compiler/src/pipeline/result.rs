use crate::file_processor::FileMetadata;
use crate::lexical::LexicalMetrics;
use crate::logging::codes;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one scan-and-validate session over a rune source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub metrics: LexicalMetrics,
    /// Complete `package` declarations accepted
    pub declarations: usize,
    /// Tokens accepted by the rule walker
    pub accepted_tokens: usize,
    pub dump_records: usize,
}

/// Complete pipeline result for one file
#[derive(Debug)]
pub struct PipelineResult {
    pub file_metadata: FileMetadata,
    pub lexical_metrics: LexicalMetrics,
    pub declarations: usize,
    pub token_count: usize,
    /// Where the token dump was written, if dumping was enabled
    pub dump_path: Option<PathBuf>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        file_metadata: FileMetadata,
        outcome: SessionOutcome,
        dump_path: Option<PathBuf>,
        processing_duration: Duration,
    ) -> Self {
        Self {
            file_metadata,
            lexical_metrics: outcome.metrics,
            declarations: outcome.declarations,
            token_count: outcome.accepted_tokens,
            dump_path,
            processing_duration,
        }
    }

    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        let rate = |amount: f64| {
            if seconds > 0.0 {
                format!("{:.0}", amount / seconds)
            } else {
                "n/a".to_string()
            }
        };

        crate::log_success!(
            codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "Box file processing pipeline succeeded",
            "file" => file_path,
            "declarations" => self.declarations,
            "tokens" => self.token_count,
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_bytes_per_sec" => rate(self.file_metadata.size as f64),
            "processing_rate_tokens_per_sec" => rate(self.token_count as f64)
        );
    }
}
