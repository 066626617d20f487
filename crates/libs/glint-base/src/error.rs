//! Errors reported by the shading model.

/// Failure of a single shading evaluation.
///
/// Both variants are deterministic: calling again with the same inputs fails
/// the same way, so callers either fix the inputs or skip the sample.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ShadingError {
    /// A material parameter is outside its valid domain.
    #[error("Invalid parameter `{name}`: {value}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// The incidence vector has zero length (or is not finite), e.g. the eye
    /// sits exactly on the shaded point.
    #[error("Degenerate geometry: the incidence direction cannot be normalised")]
    DegenerateGeometry,
}
