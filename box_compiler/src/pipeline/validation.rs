use crate::grammar::rules::{declaration_length, PACKAGE_DECLARATION};

/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating complete pipeline configuration");

    // Validate file processor integration
    crate::file_processor::init_file_processor_logging()?;

    // Validate lexical analyzer integration
    crate::lexical::init_lexical_analysis_logging()?;

    // Validate syntax walker integration
    crate::syntax::init_syntax_logging()?;

    // The chain must be non-empty and end in a terminal descriptor
    let terminal = PACKAGE_DECLARATION
        .iter()
        .last()
        .ok_or_else(|| "Rule chain is empty".to_string())?;
    if !terminal.is_terminal() {
        return Err("Rule chain does not end in a terminal descriptor".to_string());
    }

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Complete pipeline validation succeeded",
        "stages_validated" => 4,
        "declaration_length" => declaration_length()
    );

    Ok(())
}
