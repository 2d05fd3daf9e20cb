/// Convenience result type used across panelcraft.
pub type PanelResult<T> = Result<T, PanelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PanelError {
    /// Invalid user-provided data (config, documents, arguments).
    #[error("validation error: {0}")]
    Validation(String),

    /// Layout catalog or template problems (unknown id, malformed polygons).
    #[error("layout error: {0}")]
    Layout(String),

    /// A panel image could not be decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// The export sequence could not complete.
    #[error("export error: {0}")]
    Export(String),

    /// Placement editing was attempted while the session is exporting.
    #[error("session busy: {0}")]
    Busy(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanelError {
    /// Build a [`PanelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PanelError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`PanelError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`PanelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PanelError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`PanelError::Busy`] value.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    /// Build a [`PanelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether retrying the same operation later can succeed without changing inputs.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Render(_) | Self::Export(_) | Self::Busy(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
