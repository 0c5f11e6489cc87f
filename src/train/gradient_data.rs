use crate::{
    error::{Error, Result},
    math::{matrix::check_dimensions, mutable::MutableMatrix},
    network::network::Network,
};

/// Per-layer scratch state for backpropagation.
///
/// Holds, for trainable layer `layer_index`, the accumulated weight and bias
/// gradients and each node's cost differential (∂cost/∂summed input) from
/// the most recent backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientData {
    layer_index: usize,
    weight_gradients: MutableMatrix,
    bias_gradients: MutableMatrix,
    node_cost_differentials: MutableMatrix,
}

impl GradientData {
    /// Zeroed state for a layer of `size` nodes fed by `previous_size`
    /// nodes; either being 0 is a ShapeError.
    pub fn new(layer_index: usize, size: usize, previous_size: usize) -> Result<GradientData> {
        check_dimensions("gradient data", size, previous_size)?;
        Ok(GradientData::zeroed(layer_index, size, previous_size))
    }

    fn zeroed(layer_index: usize, size: usize, previous_size: usize) -> GradientData {
        GradientData {
            layer_index,
            weight_gradients: MutableMatrix::zeroed(size, previous_size),
            bias_gradients: MutableMatrix::zeroed(size, 1),
            node_cost_differentials: MutableMatrix::zeroed(size, 1),
        }
    }

    /// One entry per trainable layer; entry `k` belongs to layer `k + 1`.
    pub fn for_network(network: &Network) -> Vec<GradientData> {
        network
            .layers()
            .windows(2)
            .enumerate()
            .map(|(k, pair)| GradientData::zeroed(k + 1, pair[1].size(), pair[0].size()))
            .collect()
    }

    pub fn layer_index(&self) -> usize {
        self.layer_index
    }

    pub fn size(&self) -> usize {
        self.bias_gradients.rows()
    }

    pub fn weight_gradients(&self) -> &MutableMatrix {
        &self.weight_gradients
    }

    pub fn weight_gradients_mut(&mut self) -> &mut MutableMatrix {
        &mut self.weight_gradients
    }

    pub fn bias_gradients(&self) -> &MutableMatrix {
        &self.bias_gradients
    }

    pub fn bias_gradients_mut(&mut self) -> &mut MutableMatrix {
        &mut self.bias_gradients
    }

    pub fn node_cost_differentials(&self) -> &MutableMatrix {
        &self.node_cost_differentials
    }

    pub fn node_cost_differential(&self, node: usize) -> Result<f64> {
        self.node_cost_differentials.get(node, 0)
    }

    pub fn set_node_cost_differential(&mut self, node: usize, value: f64) -> Result<()> {
        self.node_cost_differentials.set(node, 0, value)?;
        Ok(())
    }

    /// Zeroes gradients and differentials before a new batch.
    pub fn reset(&mut self) {
        self.weight_gradients.fill(0.0);
        self.bias_gradients.fill(0.0);
        self.node_cost_differentials.fill(0.0);
    }

    /// Adds another worker's accumulated gradients to this one.
    pub fn merge(&mut self, other: &GradientData) -> Result<()> {
        if other.layer_index != self.layer_index {
            return Err(Error::index("gradient layer", other.layer_index, self.layer_index + 1));
        }
        self.weight_gradients.add_in_place(&other.weight_gradients)?;
        self.bias_gradients.add_in_place(&other.bias_gradients)?;
        Ok(())
    }

    /// Turns accumulated sums into means over `batch_size` data points.
    pub fn average(&mut self, batch_size: usize) {
        let inv_batch = 1.0 / batch_size as f64;
        self.weight_gradients.scale_in_place(inv_batch);
        self.bias_gradients.scale_in_place(inv_batch);
    }
}

/// Merges each worker-local set into `into`, layer by layer.
pub fn merge_all(into: &mut [GradientData], other: &[GradientData]) -> Result<()> {
    if into.len() != other.len() {
        return Err(Error::index("gradient layer", other.len(), into.len()));
    }
    for (a, b) in into.iter_mut().zip(other) {
        a.merge(b)?;
    }
    Ok(())
}
