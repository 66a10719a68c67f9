use crate::config::build_info;
use crate::config::compile_time::file_processing::MAX_FILE_SIZE;
use crate::config::compile_time::lexical::{MAX_TOKEN_COUNT, MAX_WORD_LENGTH};
use crate::file_processor::BOX_EXTENSION;
use crate::grammar::rules::PACKAGE_DECLARATION;
use crate::tokens::dump::DUMP_EXTENSION;

/// Information about pipeline capabilities
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub pipeline_stages: usize,
    pub max_file_size: u64,
    pub max_word_length: usize,
    pub max_token_count: usize,
    pub source_extension: &'static str,
    pub dump_extension: &'static str,
    /// Rendered rule chain, e.g. `Keyword("package") -> Identifier -> Identifier`
    pub declaration_pattern: String,
    pub build_profile: &'static str,
    pub global_logging_enabled: bool,
    pub cargo_style_output: bool,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "Box Processing Pipeline:\n\
             - Pipeline Stages: {}\n\
             - Declaration Pattern: {}\n\
             - Max File Size: {} MB\n\
             - Max Word Length: {}\n\
             - Max Token Count: {}\n\
             - Source Extension: .{}\n\
             - Dump Extension: .{}\n\
             - Build Profile: {}\n\
             - Global Logging: {}\n\
             - Cargo-style Output: {}",
            self.pipeline_stages,
            self.declaration_pattern,
            self.max_file_size / (1024 * 1024),
            self.max_word_length,
            self.max_token_count,
            self.source_extension,
            self.dump_extension,
            self.build_profile,
            self.global_logging_enabled,
            self.cargo_style_output
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage box front end validating `{}` declarations in .{} files",
            self.pipeline_stages, self.declaration_pattern, self.source_extension
        )
    }
}

/// Get pipeline capabilities information
pub fn get_pipeline_info() -> PipelineInfo {
    let declaration_pattern = PACKAGE_DECLARATION
        .iter()
        .map(|rule| rule.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");

    PipelineInfo {
        // file processing, scanning, token dump, rule validation
        pipeline_stages: 4,
        max_file_size: MAX_FILE_SIZE,
        max_word_length: MAX_WORD_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
        source_extension: BOX_EXTENSION,
        dump_extension: DUMP_EXTENSION,
        declaration_pattern,
        build_profile: build_info::profile(),
        global_logging_enabled: crate::logging::is_initialized(),
        cargo_style_output: crate::logging::config::use_cargo_style_output(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_info() {
        let info = get_pipeline_info();
        assert_eq!(
            info.declaration_pattern,
            "Keyword(\"package\") -> Identifier -> Identifier"
        );
        assert!(info.report().contains("Dump Extension: .bo"));
        assert!(info.summary().starts_with("4-stage"));
    }
}
