use thiserror::Error;

use crate::math::tensor::TdSize;

/// Failure raised by a layer's backward pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    /// The upstream gradient does not have the layer's input extents.
    #[error("mismatched input: expected {expected}, got {actual}")]
    MismatchedShape { expected: TdSize, actual: TdSize },
}

/// Failure raised while building or driving a `Network`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("network has no layers")]
    Empty,
    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// Rejected tensor or layer data, e.g. from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("tensor extents must be positive, got {x}x{y}x{z}")]
    ZeroExtent { x: usize, y: usize, z: usize },
    #[error("tensor of size {size} needs {} values, got {actual}", .size.len())]
    DataLength { size: TdSize, actual: usize },
    #[error("layer tensors disagree: in {input}, out {out}, grads_in {grads_in}")]
    StateMismatch { input: TdSize, out: TdSize, grads_in: TdSize },
}
