/// Errors reported by the cube widget
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CubeError {
    /// Fewer than six face textures were supplied
    #[error("at least 6 face textures are required, got {supplied}")]
    NotEnoughFaces { supplied: usize },
    /// A configuration value is out of range
    #[error("invalid configuration: {field} must be finite and positive, got {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}
