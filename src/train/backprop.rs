use crate::{
    error::{Error, Result},
    loss::learning_error::LearningError,
    math::matrix::Matrix,
    network::network::Network,
    train::gradient_data::GradientData,
};

/// Fills the output layer's node cost differentials from the last forward
/// pass:
///
/// `δ_i = cost'(expected_i, activation_i) · f'(z_i)`
///
/// The forward pass must have propagated exactly one data point.
///
/// `cost'` is the raw node-cost derivative; `vector_cost` is not applied.
/// The resulting gradients are those of the summed node costs, so with
/// `Reduction::Mean` over `O` output nodes they are `O` times the gradient
/// of [`LearningError::cost`].
pub fn set_output_layer_differential(
    network: &Network,
    learning_error: &LearningError,
    expected: &Matrix,
    data: &mut GradientData,
) -> Result<()> {
    let output_index = network.output_index();
    if data.layer_index() != output_index {
        return Err(Error::index("output layer", data.layer_index(), output_index + 1));
    }
    let layer = network.output_layer();
    let summed = single_column(layer.require_summed_inputs()?)?;
    if expected.shape() != (layer.size(), 1) {
        return Err(Error::shape("set_output_layer_differential", (layer.size(), 1), expected.shape()));
    }
    check_size("set_output_layer_differential", data, layer.size())?;

    let activations = layer.activations();
    for i in 0..layer.size() {
        let cost_slope = learning_error.node_cost_derivative(expected.at(i, 0), activations.at(i, 0));
        let local = layer.activator.derivative(summed.at(i, 0));
        data.set_node_cost_differential(i, cost_slope * local)?;
    }
    Ok(())
}

/// Fills hidden layer `layer_index`'s differentials from those of the
/// layer after it:
///
/// `δ_i = f'(z_i) · Σ_j W_out[j][i] · δ_next[j]`
///
/// Only layers strictly between the input and the output qualify.
pub fn set_hidden_layer_differential(
    network: &Network,
    layer_index: usize,
    data: &mut GradientData,
    next: &GradientData,
) -> Result<()> {
    let output_index = network.output_index();
    if layer_index == 0 || layer_index >= output_index {
        return Err(Error::index("hidden layer", layer_index, output_index));
    }
    if data.layer_index() != layer_index || next.layer_index() != layer_index + 1 {
        return Err(Error::State(format!(
            "gradient data for layers {} and {} does not match hidden layer {}",
            data.layer_index(),
            next.layer_index(),
            layer_index
        )));
    }

    let layer = network.layer(layer_index)?;
    let summed = single_column(layer.require_summed_inputs()?)?;
    let (_, outgoing) = network.next(layer_index)?;
    check_size("set_hidden_layer_differential", data, layer.size())?;
    check_size("set_hidden_layer_differential", next, outgoing.rows())?;
    let next_diffs = next.node_cost_differentials();

    for i in 0..layer.size() {
        let weighted: f64 = (0..outgoing.rows())
            .map(|j| outgoing.at(j, i) * next_diffs.at(j, 0))
            .sum();
        data.set_node_cost_differential(i, weighted * layer.activator.derivative(summed.at(i, 0)))?;
    }
    Ok(())
}

/// Adds this data point's contribution to the layer's gradients:
/// `∂W[i][j] += a_prev[j] · δ_i` and `∂b[i] += δ_i`.
pub fn accumulate_gradients(network: &Network, data: &mut GradientData) -> Result<()> {
    let (previous, weights) = network.previous(data.layer_index())?;
    if weights.shape() != data.weight_gradients().shape() {
        return Err(Error::shape("accumulate_gradients", weights.shape(), data.weight_gradients().shape()));
    }
    let previous_activations = single_column(previous.activations())?;

    let (rows, cols) = weights.shape();
    for i in 0..rows {
        let diff = data.node_cost_differentials().at(i, 0);
        for j in 0..cols {
            let current = data.weight_gradients().at(i, j);
            data.weight_gradients_mut().put(i, j, current + previous_activations.at(j, 0) * diff);
        }
        let bias = data.bias_gradients().at(i, 0);
        data.bias_gradients_mut().put(i, 0, bias + diff);
    }
    Ok(())
}

/// Full backward pass for the data point last fed through `network`.
///
/// `gradients[k]` belongs to layer `k + 1`. Differentials are overwritten;
/// gradients accumulate on top of whatever the slice already holds.
pub fn backpropagate(
    network: &Network,
    learning_error: &LearningError,
    expected: &Matrix,
    gradients: &mut [GradientData],
) -> Result<()> {
    let trainable = network.len() - 1;
    if gradients.len() != trainable {
        return Err(Error::State(format!(
            "expected gradient data for {} layers, got {}",
            trainable,
            gradients.len()
        )));
    }

    set_output_layer_differential(network, learning_error, expected, &mut gradients[trainable - 1])?;
    for k in (0..trainable - 1).rev() {
        let (head, tail) = gradients.split_at_mut(k + 1);
        set_hidden_layer_differential(network, k + 1, &mut head[k], &tail[0])?;
    }
    for data in gradients.iter_mut() {
        accumulate_gradients(network, data)?;
    }
    Ok(())
}

/// `data` must hold one differential per node of a `size`-node layer.
fn check_size(op: &'static str, data: &GradientData, size: usize) -> Result<()> {
    let found = data.node_cost_differentials().shape();
    if found != (size, 1) {
        return Err(Error::shape(op, (size, 1), found));
    }
    Ok(())
}

fn single_column(values: &Matrix) -> Result<&Matrix> {
    if values.cols() != 1 {
        return Err(Error::State(format!(
            "backpropagation needs a single data point per forward pass, found {} columns",
            values.cols()
        )));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use approx::assert_relative_eq;

    fn linear_chain() -> Network {
        let mut net = Network::new(&[
            (1, ActivationFunction::Linear),
            (1, ActivationFunction::Linear),
            (1, ActivationFunction::Linear),
        ])
        .unwrap();
        net.set_incoming_weights(1, Matrix::column(vec![2.0]).unwrap()).unwrap();
        net.set_incoming_weights(2, Matrix::column(vec![3.0]).unwrap()).unwrap();
        net
    }

    #[test]
    fn linear_chain_gradients() {
        // y = 3·(2·x); squared error with x = 1, e = 0: y = 6, dC/dy = 12
        let mut net = linear_chain();
        net.forward(&Matrix::column(vec![1.0]).unwrap()).unwrap();
        let mut grads = GradientData::for_network(&net);
        let expected = Matrix::column(vec![0.0]).unwrap();
        backpropagate(&net, &LearningError::mean_squared(), &expected, &mut grads).unwrap();

        assert_relative_eq!(grads[1].node_cost_differential(0).unwrap(), 12.0);
        assert_relative_eq!(grads[0].node_cost_differential(0).unwrap(), 36.0);
        // dC/dW2 = a1 · δ2 = 2 · 12
        assert_relative_eq!(grads[1].weight_gradients().get(0, 0).unwrap(), 24.0);
        assert_relative_eq!(grads[0].weight_gradients().get(0, 0).unwrap(), 36.0);
        assert_relative_eq!(grads[0].bias_gradients().get(0, 0).unwrap(), 36.0);
    }

    #[test]
    fn gradients_accumulate_across_points() {
        let mut net = linear_chain();
        let mut grads = GradientData::for_network(&net);
        let expected = Matrix::column(vec![0.0]).unwrap();
        for _ in 0..2 {
            net.forward(&Matrix::column(vec![1.0]).unwrap()).unwrap();
            backpropagate(&net, &LearningError::mean_squared(), &expected, &mut grads).unwrap();
        }
        assert_relative_eq!(grads[1].weight_gradients().get(0, 0).unwrap(), 48.0);
    }

    #[test]
    fn missing_forward_pass_is_a_state_error() {
        let net = linear_chain();
        let mut grads = GradientData::for_network(&net);
        let err = backpropagate(
            &net,
            &LearningError::mean_squared(),
            &Matrix::column(vec![0.0]).unwrap(),
            &mut grads,
        )
        .unwrap_err();
        assert!(matches!(err, Error::State(_)));
    }

    #[test]
    fn batched_forward_pass_is_rejected() {
        let mut net = linear_chain();
        net.forward(&Matrix::row(vec![1.0, 2.0]).unwrap()).unwrap();
        let mut grads = GradientData::for_network(&net);
        let err = set_output_layer_differential(
            &net,
            &LearningError::mean_squared(),
            &Matrix::column(vec![0.0]).unwrap(),
            &mut grads[1],
        )
        .unwrap_err();
        assert!(matches!(err, Error::State(_)));
    }

    #[test]
    fn hidden_differential_rejects_input_and_output_layers() {
        let mut net = linear_chain();
        net.forward(&Matrix::column(vec![1.0]).unwrap()).unwrap();
        let mut grads = GradientData::for_network(&net);
        let next = grads[1].clone();
        for index in [0, 2, 3] {
            let err = set_hidden_layer_differential(&net, index, &mut grads[0], &next).unwrap_err();
            assert!(matches!(err, Error::Index { .. }), "index {index}");
        }
    }

    #[test]
    fn hidden_differential_checks_gradient_sizes() {
        let mut net = Network::new(&[
            (2, ActivationFunction::Linear),
            (3, ActivationFunction::Tanh),
            (2, ActivationFunction::Linear),
        ])
        .unwrap();
        net.forward(&Matrix::column(vec![0.5, -0.5]).unwrap()).unwrap();

        let mut data = GradientData::new(1, 3, 2).unwrap();
        let short_next = GradientData::new(2, 1, 3).unwrap();
        let err = set_hidden_layer_differential(&net, 1, &mut data, &short_next).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));

        let mut short_data = GradientData::new(1, 2, 2).unwrap();
        let next = GradientData::new(2, 2, 3).unwrap();
        let err = set_hidden_layer_differential(&net, 1, &mut short_data, &next).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));

        assert!(set_hidden_layer_differential(&net, 1, &mut data, &next).is_ok());
    }

    #[test]
    fn output_differential_checks_gradient_size() {
        let mut net = linear_chain();
        net.forward(&Matrix::column(vec![1.0]).unwrap()).unwrap();
        let mut wide = GradientData::new(2, 2, 1).unwrap();
        let err = set_output_layer_differential(
            &net,
            &LearningError::mean_squared(),
            &Matrix::column(vec![0.0]).unwrap(),
            &mut wide,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn expected_shape_is_checked() {
        let mut net = linear_chain();
        net.forward(&Matrix::column(vec![1.0]).unwrap()).unwrap();
        let mut grads = GradientData::for_network(&net);
        let err = backpropagate(
            &net,
            &LearningError::mean_squared(),
            &Matrix::column(vec![0.0, 1.0]).unwrap(),
            &mut grads,
        )
        .unwrap_err();
        assert!(err.is_precondition());
    }
}
