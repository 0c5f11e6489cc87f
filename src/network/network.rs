use rand::Rng;

use crate::{
    activation::activation::ActivationFunction,
    error::{Error, Result},
    init::initializer::draw_weights,
    layers::dense::Layer,
    math::{matrix::Matrix, mutable::MutableMatrix},
};

/// An ordered chain of layers, input first, plus the weight matrices
/// between adjacent layers.
///
/// `weights[k]` connects layer `k` to layer `k + 1` and has shape
/// `(layers[k + 1].size(), layers[k].size())`. Use
/// [`incoming_weights`](Self::incoming_weights) to address a matrix by the
/// layer it feeds. The topology is fixed once built; only weight and bias
/// values change.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    weights: Vec<MutableMatrix>,
}

impl Network {
    /// Builds a network from `(size, activation)` pairs, input layer first.
    /// Weights and biases start at zero.
    pub fn new(layer_specs: &[(usize, ActivationFunction)]) -> Result<Network> {
        if layer_specs.len() < 2 {
            return Err(Error::InvalidTopology(format!(
                "a network needs an input and an output layer, got {} layer(s)",
                layer_specs.len()
            )));
        }
        let layers = layer_specs
            .iter()
            .map(|&(size, activation)| Layer::new(size, activation))
            .collect::<Result<Vec<_>>>()?;
        let weights = layers
            .windows(2)
            .map(|pair| MutableMatrix::zeroed(pair[1].size(), pair[0].size()))
            .collect();
        Ok(Network { layers, weights })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Result<&Layer> {
        self.layers
            .get(index)
            .ok_or_else(|| Error::index("layer", index, self.layers.len()))
    }

    pub fn layer_mut(&mut self, index: usize) -> Result<&mut Layer> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or_else(|| Error::index("layer", index, len))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].size()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer().size()
    }

    pub fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn output_index(&self) -> usize {
        self.layers.len() - 1
    }

    /// All connecting weight matrices, in layer order.
    pub fn weights(&self) -> &[MutableMatrix] {
        &self.weights
    }

    /// Weights feeding layer `index` (from layer `index - 1`).
    pub fn incoming_weights(&self, index: usize) -> Result<&MutableMatrix> {
        self.check_trainable(index)?;
        Ok(&self.weights[index - 1])
    }

    pub fn incoming_weights_mut(&mut self, index: usize) -> Result<&mut MutableMatrix> {
        self.check_trainable(index)?;
        Ok(&mut self.weights[index - 1])
    }

    /// Weights leaving layer `index` (towards layer `index + 1`).
    pub fn outgoing_weights(&self, index: usize) -> Result<&MutableMatrix> {
        if index + 1 >= self.layers.len() {
            return Err(Error::index("layer with outgoing weights", index, self.layers.len() - 1));
        }
        Ok(&self.weights[index])
    }

    /// Layer `index` together with its previous layer and the weights
    /// between them.
    pub fn previous(&self, index: usize) -> Result<(&Layer, &MutableMatrix)> {
        self.check_trainable(index)?;
        Ok((&self.layers[index - 1], &self.weights[index - 1]))
    }

    /// The layer after `index` and the weights leading to it.
    pub fn next(&self, index: usize) -> Result<(&Layer, &MutableMatrix)> {
        let w = self.outgoing_weights(index)?;
        Ok((&self.layers[index + 1], w))
    }

    /// Replaces the weights feeding layer `index`; the shape must match.
    pub fn set_incoming_weights(&mut self, index: usize, weights: Matrix) -> Result<()> {
        self.incoming_weights_mut(index)?.assign(weights)?;
        Ok(())
    }

    pub fn set_biases(&mut self, index: usize, biases: Matrix) -> Result<()> {
        self.layer_mut(index)?.set_biases(biases)
    }

    /// Weights and biases of trainable layer `index`, mutably, for the
    /// optimizer.
    pub fn parameters_mut(&mut self, index: usize) -> Result<(&mut MutableMatrix, &mut MutableMatrix)> {
        self.check_trainable(index)?;
        Ok((&mut self.weights[index - 1], &mut self.layers[index].biases))
    }

    /// Redraws every weight matrix with the initializer matched to the
    /// activation of the layer it feeds.
    pub fn randomize_weights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for k in 0..self.weights.len() {
            let (fan_in, fan_out) = (self.layers[k].size(), self.layers[k + 1].size());
            let activation = self.layers[k + 1].activator;
            self.weights[k] = draw_weights(fan_in, fan_out, activation, rng).into();
        }
    }

    /// Forward pass; stores activations and summed inputs in each layer for
    /// backprop. `input` may hold several data points, one per column.
    pub fn forward(&mut self, input: &Matrix) -> Result<&Matrix> {
        self.layers[0].set_activations(input.clone())?;
        for k in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(k);
            let previous = done[k - 1].activations();
            rest[0].feed_from(&self.weights[k - 1], previous)?;
        }
        Ok(self.output_layer().activations())
    }

    /// Clears every layer's retained forward-pass state.
    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.reset();
        }
    }

    /// Layers `1..len` are trainable; layer 0 is the input.
    pub fn check_trainable(&self, index: usize) -> Result<()> {
        if index == 0 || index >= self.layers.len() {
            return Err(Error::index("trainable layer", index, self.layers.len()));
        }
        Ok(())
    }
}
