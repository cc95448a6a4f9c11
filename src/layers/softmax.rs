use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::error::LayerError;
use crate::layers::layer::{Layer, LayerState};
use crate::math::tensor::{TdSize, Tensor};

/// Softmax over every element of the input tensor, with the full O(n²)
/// Jacobian backward pass. Has no trainable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxLayer {
    state: LayerState,
}

impl SoftmaxLayer {
    pub fn new(in_size: TdSize) -> SoftmaxLayer {
        SoftmaxLayer {
            state: LayerState::new(in_size),
        }
    }
}

impl Layer for SoftmaxLayer {
    fn kind_str(&self) -> &'static str {
        "softmax"
    }

    fn param_str(&self) -> String {
        String::new()
    }

    fn state(&self) -> &LayerState {
        &self.state
    }

    /// `out[i] = exp(in[i]) / Σ_j exp(in[j])`, summed over the flattened tensor.
    ///
    /// The maximum is not subtracted first: large inputs overflow `exp` and
    /// yield NaN/zero outputs. That is logged, not corrected.
    fn activate(&mut self, input: &Tensor) {
        self.state.copy_input(input);

        let s: f64 = input.iter().map(|v| v.exp()).sum();
        if !s.is_finite() {
            warn!(size = %input.size(), sum = s, "softmax exponential sum overflowed");
        }

        for (o, v) in self.state.out.iter_mut().zip(input.iter()) {
            *o = v.exp() / s;
        }
        debug!(n = input.len(), "softmax forward");
    }

    /// `grads_in[i] = Σ_j out[i] * (δ_ij - out[j]) * grad_next[i]`.
    ///
    /// The upstream term is indexed by `i`, not `j`, so this is not the
    /// textbook vector-Jacobian product: it reduces to
    /// `out[i] * grad_next[i] * (1 - Σ_j out[j])`, which is ~0.
    fn calc_grads(&mut self, grad_next_layer: &Tensor) -> Result<(), LayerError> {
        self.state.check_grad_shape(grad_next_layer)?;

        let out = self.state.out.as_slice();
        let grad_next = grad_next_layer.as_slice();
        let n = out.len();

        for (i, g) in self.state.grads_in.iter_mut().enumerate() {
            let mut acc = 0.0;
            for j in 0..n {
                let k = if i == j { 1.0 } else { 0.0 };
                acc += out[i] * (k - out[j]) * grad_next[i];
            }
            *g = acc;
        }
        debug!(n, "softmax backward");
        Ok(())
    }

    fn fix_weights(&mut self) {}
}

/// Drop-in replacement for `SoftmaxLayer` reserved for a faster algorithm.
///
/// Must stay equal to the reference on every shape; today it runs the
/// reference computation unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedSoftmaxLayer {
    inner: SoftmaxLayer,
}

impl OptimizedSoftmaxLayer {
    pub fn new(in_size: TdSize) -> OptimizedSoftmaxLayer {
        OptimizedSoftmaxLayer {
            inner: SoftmaxLayer::new(in_size),
        }
    }
}

impl Layer for OptimizedSoftmaxLayer {
    fn kind_str(&self) -> &'static str {
        self.inner.kind_str()
    }

    fn param_str(&self) -> String {
        self.inner.param_str()
    }

    fn state(&self) -> &LayerState {
        self.inner.state()
    }

    fn activate(&mut self, input: &Tensor) {
        self.inner.activate(input)
    }

    fn calc_grads(&mut self, grad_next_layer: &Tensor) -> Result<(), LayerError> {
        self.inner.calc_grads(grad_next_layer)
    }

    fn fix_weights(&mut self) {
        self.inner.fix_weights()
    }
}

impl PartialEq<OptimizedSoftmaxLayer> for SoftmaxLayer {
    fn eq(&self, other: &OptimizedSoftmaxLayer) -> bool {
        self.state == other.inner.state
    }
}

impl PartialEq<SoftmaxLayer> for OptimizedSoftmaxLayer {
    fn eq(&self, other: &SoftmaxLayer) -> bool {
        other == self
    }
}
