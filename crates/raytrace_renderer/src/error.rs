use thiserror::Error;

/// Errors that can occur while building or rendering a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Cannot build a BVH over an empty scene")]
    EmptyScene,

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Render cancelled")]
    Cancelled,
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
