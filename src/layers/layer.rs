use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::{LayerError, ShapeError};
use crate::math::tensor::{TdSize, Tensor};

/// Tensors owned by every layer: the last input (copied, never aliased),
/// the forward output and the gradient with respect to the input.
///
/// All three keep the extents given at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayerState")]
pub struct LayerState {
    pub(crate) input: Tensor,
    pub(crate) out: Tensor,
    pub(crate) grads_in: Tensor,
}

#[derive(Deserialize)]
struct RawLayerState {
    input: Tensor,
    out: Tensor,
    grads_in: Tensor,
}

impl TryFrom<RawLayerState> for LayerState {
    type Error = ShapeError;

    fn try_from(raw: RawLayerState) -> Result<LayerState, ShapeError> {
        let (input, out, grads_in) = (raw.input.size(), raw.out.size(), raw.grads_in.size());
        if input != out || input != grads_in {
            return Err(ShapeError::StateMismatch { input, out, grads_in });
        }
        Ok(LayerState { input: raw.input, out: raw.out, grads_in: raw.grads_in })
    }
}

impl LayerState {
    pub fn new(in_size: TdSize) -> LayerState {
        LayerState {
            input: Tensor::zeros(in_size),
            out: Tensor::zeros(in_size),
            grads_in: Tensor::zeros(in_size),
        }
    }

    pub fn size(&self) -> TdSize {
        self.input.size()
    }

    pub fn input(&self) -> &Tensor {
        &self.input
    }

    pub fn out(&self) -> &Tensor {
        &self.out
    }

    pub fn grads_in(&self) -> &Tensor {
        &self.grads_in
    }

    /// Panics if `input` does not have the layer's extents.
    pub fn copy_input(&mut self, input: &Tensor) {
        assert_eq!(
            input.size(), self.size(),
            "activate called with {} input on a {} layer", input.size(), self.size()
        );
        self.input.clone_from(input);
    }

    /// Fails without touching any tensor if `grad` has other extents than the input.
    pub fn check_grad_shape(&self, grad: &Tensor) -> Result<(), LayerError> {
        if grad.size() != self.size() {
            return Err(LayerError::MismatchedShape {
                expected: self.size(),
                actual: grad.size(),
            });
        }
        Ok(())
    }
}

/// Uniform interface the network driver uses for every layer kind.
///
/// Call order per training step is `activate`, then `calc_grads` with the
/// gradient from the next layer, then `fix_weights`. `calc_grads` always
/// differentiates the output of the most recent `activate`.
pub trait Layer: fmt::Debug {
    /// Short label used in diagnostics, e.g. `"softmax"`.
    fn kind_str(&self) -> &'static str;

    /// Hyperparameter description; empty for layers without any.
    fn param_str(&self) -> String;

    fn state(&self) -> &LayerState;

    fn input(&self) -> &Tensor {
        self.state().input()
    }

    fn output(&self) -> &Tensor {
        self.state().out()
    }

    fn grads_in(&self) -> &Tensor {
        self.state().grads_in()
    }

    fn in_size(&self) -> TdSize {
        self.state().size()
    }

    /// Forward pass. Overwrites the stored input and the output.
    fn activate(&mut self, input: &Tensor);

    /// Backward pass. Overwrites `grads_in` from `grad_next_layer` and the
    /// current output.
    fn calc_grads(&mut self, grad_next_layer: &Tensor) -> Result<(), LayerError>;

    /// Applies accumulated parameter updates.
    fn fix_weights(&mut self);
}

impl PartialEq for dyn Layer {
    fn eq(&self, other: &Self) -> bool {
        self.state() == other.state()
    }
}
