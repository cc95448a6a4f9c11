pub mod layer;
pub mod softmax;
