use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::loss::learning_error::LearningError;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of nodes in this layer
/// - `activation` — activation function applied to the layer's summed
///                  inputs (ignored for the input layer's forward values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
}

/// Architecture configuration: the layer chain plus the cost to train it
/// against. Trained weights are not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used in log output.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub learning_error: LearningError,
}

impl NetworkSpec {
    /// Builds a zero-initialized network with this topology.
    pub fn build(&self) -> Result<Network> {
        let pairs: Vec<_> = self.layers.iter().map(|l| (l.size, l.activation)).collect();
        Network::new(&pairs)
    }

    pub fn from_json(json: &str) -> Result<NetworkSpec> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::{NodeCost, Reduction};

    const SPEC: &str = r#"{
        "name": "xor",
        "layers": [
            { "size": 2, "activation": "linear" },
            { "size": 3, "activation": "leakyRelu" },
            { "size": 1, "activation": "sigmoid" }
        ],
        "learning_error": {
            "node_cost": "binary_cross_entropy",
            "vector_cost": "sum",
            "total_cost": "mean"
        }
    }"#;

    #[test]
    fn parses_and_builds() {
        let spec = NetworkSpec::from_json(SPEC).unwrap();
        assert_eq!(spec.layers[1].activation, ActivationFunction::LeakyRelu);
        assert_eq!(spec.learning_error.node_cost, NodeCost::BinaryCrossEntropy);
        assert_eq!(spec.learning_error.vector_cost, Reduction::Sum);
        let net = spec.build().unwrap();
        assert_eq!(net.len(), 3);
        assert_eq!(net.output_size(), 1);
    }

    #[test]
    fn learning_error_defaults_to_mean_squared() {
        let spec = NetworkSpec::from_json(r#"{"name":"n","layers":[{"size":1,"activation":"linear"},{"size":1,"activation":"linear"}]}"#).unwrap();
        assert_eq!(spec.learning_error, LearningError::mean_squared());
    }

    #[test]
    fn save_and_load_round_trip() {
        let spec = NetworkSpec::from_json(SPEC).unwrap();
        let path = std::env::temp_dir().join("gradient_nn_spec_round_trip.json");
        let path = path.to_str().unwrap();
        spec.save_json(path).unwrap();
        assert_eq!(NetworkSpec::load_json(path).unwrap(), spec);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(NetworkSpec::from_json("{"), Err(crate::error::Error::Json(_))));
    }
}
