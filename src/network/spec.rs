use serde::de::DeserializeOwned;
use serde::{Serialize, Deserialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use crate::layers::layer::Layer;
use crate::layers::softmax::{OptimizedSoftmaxLayer, SoftmaxLayer};
use crate::math::tensor::TdSize;

/// Closed set of layer implementations a spec can name.
///
/// - `Softmax`    — reference softmax layer
/// - `SoftmaxOpt` — optimized drop-in with identical results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Softmax,
    SoftmaxOpt,
}

/// Describes one layer in a network specification.
///
/// Fields:
/// - `kind`    — which implementation to instantiate
/// - `in_size` — input extents; fixed for the layer's lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub kind: LayerKind,
    pub in_size: TdSize,
}

impl LayerSpec {
    pub fn new(kind: LayerKind, in_size: TdSize) -> LayerSpec {
        LayerSpec { kind, in_size }
    }

    pub fn build(&self) -> Box<dyn Layer> {
        match self.kind {
            LayerKind::Softmax => Box::new(SoftmaxLayer::new(self.in_size)),
            LayerKind::SoftmaxOpt => Box::new(OptimizedSoftmaxLayer::new(self.in_size)),
        }
    }
}

/// A serializable description of a network: an ordered list of layers
/// (input → output) and a name used as the file stem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// Writes the spec as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        write_json(path.as_ref(), self)
    }

    /// Reads a spec written by `save_json`. Zero extents are rejected with
    /// `ErrorKind::InvalidData`.
    pub fn load_json(path: impl AsRef<Path>) -> io::Result<NetworkSpec> {
        read_json(path.as_ref())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value).map_err(io::Error::from)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> io::Result<T> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(io::Error::from)
}
