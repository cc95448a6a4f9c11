// Integration tests for the network driver and its JSON specs.

use approx::assert_abs_diff_eq;
use cnn_softmax::{
    LayerError, LayerKind, LayerSpec, Network, NetworkError, NetworkSpec, SoftmaxLayer, TdSize,
    Tensor,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn two_layer_spec(size: TdSize) -> NetworkSpec {
    NetworkSpec {
        name: "double_softmax".to_string(),
        layers: vec![
            LayerSpec::new(LayerKind::Softmax, size),
            LayerSpec::new(LayerKind::SoftmaxOpt, size),
        ],
    }
}

#[test]
fn test_forward_chains_layers() {
    let size = TdSize::new(8, 1, 1);
    let mut network = Network::from_spec(&two_layer_spec(size)).unwrap();
    let input = Tensor::random_with(size, &mut StdRng::seed_from_u64(21));

    let out = network.forward(&input).clone();
    assert_abs_diff_eq!(out.sum(), 1.0, epsilon = 1e-6);

    let layers = network.layers();
    assert_eq!(layers[0].input(), &input);
    assert_eq!(layers[1].input(), layers[0].output());
    assert_eq!(&out, layers[1].output());
}

#[test]
fn test_backward_reaches_first_layer() {
    let size = TdSize::new(6, 1, 1);
    let mut rng = StdRng::seed_from_u64(17);
    let mut network = Network::from_spec(&two_layer_spec(size)).unwrap();

    network.forward(&Tensor::random_with(size, &mut rng));
    network.backward(&Tensor::random_with(size, &mut rng)).unwrap();
    network.fix_weights();

    assert_eq!(network.grads_in().size(), size);
    assert_eq!(network.grads_in(), network.layers()[0].grads_in());
}

#[test]
fn test_backward_rejects_wrong_gradient() {
    let size = TdSize::new(3, 1, 1);
    let mut network = Network::from_spec(&two_layer_spec(size)).unwrap();
    network.forward(&Tensor::zeros(size));

    let err = network.backward(&Tensor::zeros(TdSize::new(3, 2, 1))).unwrap_err();
    assert_eq!(
        err,
        NetworkError::Layer(LayerError::MismatchedShape {
            expected: size,
            actual: TdSize::new(3, 2, 1),
        })
    );
}

#[test]
fn test_mismatched_chain_is_rejected() {
    let layers: Vec<Box<dyn cnn_softmax::Layer>> = vec![
        Box::new(SoftmaxLayer::new(TdSize::new(4, 1, 1))),
        Box::new(SoftmaxLayer::new(TdSize::new(2, 2, 1))),
    ];
    let err = Network::new(layers).unwrap_err();
    assert_eq!(
        err,
        NetworkError::Layer(LayerError::MismatchedShape {
            expected: TdSize::new(2, 2, 1),
            actual: TdSize::new(4, 1, 1),
        })
    );
}

#[test]
fn test_empty_network_is_rejected() {
    let spec = NetworkSpec { name: "empty".to_string(), layers: vec![] };
    assert_eq!(Network::from_spec(&spec).unwrap_err(), NetworkError::Empty);
}

#[test]
fn test_spec_json_file() {
    let spec = two_layer_spec(TdSize::new(5, 2, 1));
    let path = std::env::temp_dir().join(format!("cnn_softmax_spec_{}.json", std::process::id()));
    let path = path.to_str().unwrap();

    spec.save_json(path).unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.contains("\"softmax_opt\""));

    let loaded = NetworkSpec::load_json(path).unwrap();
    std::fs::remove_file(path).unwrap();
    assert_eq!(loaded, spec);
}

#[test]
fn test_spec_rejects_unknown_kind() {
    let json = r#"{"name":"bad","layers":[{"kind":"relu","in_size":{"x":1,"y":1,"z":1}}]}"#;
    assert!(serde_json::from_str::<NetworkSpec>(json).is_err());
}
