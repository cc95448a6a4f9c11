use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::error::LayerError;
use crate::layers::layer::Layer;
use crate::layers::softmax::{OptimizedSoftmaxLayer, SoftmaxLayer};
use crate::math::tensor::{TdSize, Tensor};

/// Widths checked by default, as `n×1×1` shapes. Includes the degenerate
/// single-element case and a non-power-of-two width.
pub const DEFAULT_CHECK_SIZES: [usize; 3] = [1, 16, 47];

/// Outcome of driving the reference and optimized softmax layers with the
/// same data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantCheck {
    pub size: TdSize,
    /// Layer equality: `in`, `out` and `grads_in` all element-wise equal.
    pub equal: bool,
    pub max_out_diff: f64,
    pub max_grad_diff: f64,
}

/// Runs `activate`, `calc_grads`, `fix_weights` on both variants with one
/// random input and one random upstream gradient and compares the results.
pub fn compare_variants<R: Rng + ?Sized>(size: TdSize, rng: &mut R) -> Result<VariantCheck, LayerError> {
    let input = Tensor::random_with(size, rng);
    let next_grads = Tensor::random_with(size, rng);

    let mut optimized = OptimizedSoftmaxLayer::new(size);
    optimized.activate(&input);
    optimized.calc_grads(&next_grads)?;
    optimized.fix_weights();

    let mut reference = SoftmaxLayer::new(size);
    reference.activate(&input);
    reference.calc_grads(&next_grads)?;
    reference.fix_weights();

    let check = VariantCheck {
        size,
        equal: reference == optimized,
        max_out_diff: max_abs_diff(reference.output(), optimized.output()),
        max_grad_diff: max_abs_diff(reference.grads_in(), optimized.grads_in()),
    };
    info!(size = %size, equal = check.equal, "softmax variant check");
    Ok(check)
}

fn max_abs_diff(a: &Tensor, b: &Tensor) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
