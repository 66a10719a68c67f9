use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::SyntaxError;
use crate::tokens::DumpError;
use crate::utils::Position;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax validation failed: {0}")]
    SyntaxValidation(#[from] SyntaxError),

    #[error("Token dump failed: {0}")]
    TokenDump(#[from] DumpError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::LexicalAnalysis(e) => e.error_code(),
            Self::SyntaxValidation(e) => e.error_code(),
            Self::TokenDump(e) => e.error_code(),
            Self::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// Source position of the failure, when the failing stage knows one
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::SyntaxValidation(e) => e.position(),
            Self::LexicalAnalysis(LexerError::WordTooLong { position }) => Some(*position),
            _ => None,
        }
    }

    pub fn is_file_not_found(&self) -> bool {
        matches!(
            self,
            Self::FileProcessing(FileProcessorError::FileNotFound { .. })
        )
    }
}
