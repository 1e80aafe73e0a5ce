use thiserror::Error;

use super::todo::TodoId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    #[error("Validation error: {0}")]
    Validation(String),
}
