use thiserror::Error;

/// Fatal errors raised while transforming a batch
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required field `{field}` in {context}")]
    SchemaMismatch { field: String, context: String },

    #[error("Field `{field}` in {context} is not a {expected}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
        context: String,
    },

    #[error("Officer field `{field}` collides with an inherited company field")]
    ConflictingField { field: String },
}

impl PipelineError {
    pub fn missing(field: &str, context: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            field: field.to_string(),
            context: context.into(),
        }
    }

    pub fn wrong_type(field: &str, expected: &'static str, context: impl Into<String>) -> Self {
        Self::UnexpectedType {
            field: field.to_string(),
            expected,
            context: context.into(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
