use crate::{
    activation::activation::ActivationFunction,
    error::{Error, Result},
    math::{matrix::Matrix, mutable::MutableMatrix},
};

/// One stage of the network: its activations, biases and activation function.
///
/// Layers are plain records; the network owns them in order together with
/// the connecting weight matrices, so a layer's neighbours are found by
/// index rather than by reference.
#[derive(Debug, Clone)]
pub struct Layer {
    size: usize,
    activations: Matrix,
    /// Pre-activation values (z = Wx + b), retained for the backward pass.
    summed_inputs: Option<Matrix>,
    pub biases: MutableMatrix,
    pub activator: ActivationFunction,
}

impl Layer {
    pub fn new(size: usize, activation: ActivationFunction) -> Result<Layer> {
        if size == 0 {
            return Err(Error::InvalidTopology("layers must have at least one node".into()));
        }
        Ok(Layer {
            size,
            activations: Matrix::zeroed(size, 1),
            summed_inputs: None,
            biases: MutableMatrix::zeroed(size, 1),
            activator: activation,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Current activations, one column per data point last propagated.
    pub fn activations(&self) -> &Matrix {
        &self.activations
    }

    /// Summed inputs from the last forward pass, if one has happened.
    pub fn summed_inputs(&self) -> Option<&Matrix> {
        self.summed_inputs.as_ref()
    }

    /// Like [`summed_inputs`](Self::summed_inputs) but a missing forward
    /// pass is an error.
    pub fn require_summed_inputs(&self) -> Result<&Matrix> {
        self.summed_inputs
            .as_ref()
            .ok_or_else(|| Error::State("summed inputs are missing; run a forward pass first".into()))
    }

    /// Sets this layer's activations directly (input layer).
    pub fn set_activations(&mut self, values: Matrix) -> Result<()> {
        if values.rows() != self.size {
            return Err(Error::shape("set_activations", (self.size, values.cols()), values.shape()));
        }
        self.activations = values;
        Ok(())
    }

    pub fn set_biases(&mut self, biases: Matrix) -> Result<()> {
        self.biases.assign(biases)?;
        Ok(())
    }

    /// Computes `z = W·a + b` (bias broadcast over every column of `a`),
    /// keeps `z`, and stores `activator(z)` as the new activations.
    pub fn feed_from(&mut self, weights: &Matrix, previous_activations: &Matrix) -> Result<&Matrix> {
        if weights.rows() != self.size {
            return Err(Error::shape("feed_from", (self.size, weights.cols()), weights.shape()));
        }
        let z = weights
            .multiply(previous_activations)?
            .add_column_broadcast(&self.biases)?;
        let activator = self.activator;
        self.activations = z.map(|x| activator.calculate(x));
        self.summed_inputs = Some(z);
        Ok(&self.activations)
    }

    /// Drops retained forward-pass state and zeroes activations.
    pub fn reset(&mut self) {
        self.activations = Matrix::zeroed(self.size, 1);
        self.summed_inputs = None;
    }
}
