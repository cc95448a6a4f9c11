use tracing::debug;

use crate::error::{LayerError, NetworkError};
use crate::layers::layer::Layer;
use crate::math::tensor::Tensor;
use crate::network::spec::NetworkSpec;

/// Ordered chain of layers driven uniformly through the `Layer` trait.
#[derive(Debug)]
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
}

impl Network {
    /// Builds a network from already-constructed layers, checking that each
    /// layer accepts the previous layer's output extents.
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Result<Network, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::Empty);
        }
        for pair in layers.windows(2) {
            let produced = pair[0].output().size();
            let expected = pair[1].in_size();
            if produced != expected {
                return Err(LayerError::MismatchedShape { expected, actual: produced }.into());
            }
        }
        Ok(Network { layers })
    }

    /// Instantiates every layer named in `spec` and validates the chain.
    pub fn from_spec(spec: &NetworkSpec) -> Result<Network, NetworkError> {
        debug!(name = %spec.name, layers = spec.layers.len(), "building network");
        Network::new(spec.layers.iter().map(|l| l.build()).collect())
    }

    /// Forward pass; each layer keeps its input and output for backprop.
    /// Returns the last layer's output.
    pub fn forward(&mut self, input: &Tensor) -> &Tensor {
        self.layers[0].activate(input);
        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            rest[0].activate(done[i - 1].output());
        }
        self.output()
    }

    /// Backward pass from the gradient w.r.t. the network output down to
    /// the first layer's `grads_in`.
    pub fn backward(&mut self, grad: &Tensor) -> Result<(), NetworkError> {
        let last = self.layers.len() - 1;
        self.layers[last].calc_grads(grad)?;
        for i in (0..last).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            head[i].calc_grads(tail[0].grads_in())?;
        }
        Ok(())
    }

    /// Parameter update step; forwarded to every layer in order.
    pub fn fix_weights(&mut self) {
        for layer in &mut self.layers {
            layer.fix_weights();
        }
    }

    /// Layers in input → output order, for inspecting their tensors.
    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Output of the last layer from the most recent `forward`.
    pub fn output(&self) -> &Tensor {
        self.layers[self.layers.len() - 1].output()
    }

    /// Gradient w.r.t. the network input from the last `backward`.
    pub fn grads_in(&self) -> &Tensor {
        self.layers[0].grads_in()
    }
}
