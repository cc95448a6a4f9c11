pub mod math;
pub mod error;
pub mod layers;
pub mod network;
pub mod verify;

// Convenience re-exports
pub use math::tensor::{TdSize, Tensor};
pub use error::{LayerError, NetworkError, ShapeError};
pub use layers::layer::{Layer, LayerState};
pub use layers::softmax::{SoftmaxLayer, OptimizedSoftmaxLayer};
pub use network::{Network, NetworkSpec, LayerSpec, LayerKind};
pub use verify::equivalence::{compare_variants, VariantCheck, DEFAULT_CHECK_SIZES};
