use approx::assert_abs_diff_eq;
use gradient_nn::train::backprop::backpropagate;
use gradient_nn::{ActivationFunction, Error, GradientData, LearningError, Matrix, Network, NodeCost, Reduction};

const H: f64 = 1e-5;

fn small_network() -> Network {
    let mut net = Network::new(&[
        (2, ActivationFunction::Linear),
        (3, ActivationFunction::Sigmoid),
        (1, ActivationFunction::Linear),
    ])
    .unwrap();
    net.set_incoming_weights(
        1,
        Matrix::from_data(vec![vec![0.15, -0.2], vec![0.4, 0.25], vec![-0.35, 0.1]]).unwrap(),
    )
    .unwrap();
    net.set_biases(1, Matrix::column(vec![0.05, -0.1, 0.2]).unwrap()).unwrap();
    net.set_incoming_weights(2, Matrix::row(vec![0.3, -0.5, 0.45]).unwrap()).unwrap();
    net.set_biases(2, Matrix::column(vec![0.1]).unwrap()).unwrap();
    net
}

fn cost(net: &mut Network, input: &Matrix, expected: &Matrix, le: &LearningError) -> f64 {
    let actual = net.forward(input).unwrap().clone();
    le.cost(expected, &actual).unwrap()
}

#[test]
fn analytic_gradients_match_central_differences() {
    let le = LearningError::mean_squared();
    let input = Matrix::column(vec![0.7, -0.3]).unwrap();
    let expected = Matrix::column(vec![0.9]).unwrap();

    let mut net = small_network();
    let mut grads = GradientData::for_network(&net);
    net.forward(&input).unwrap();
    backpropagate(&net, &le, &expected, &mut grads).unwrap();

    for layer in 1..net.len() {
        let analytic = &grads[layer - 1];
        let (rows, cols) = net.incoming_weights(layer).unwrap().shape();

        for i in 0..rows {
            for j in 0..cols {
                let w = net.incoming_weights(layer).unwrap().get(i, j).unwrap();
                let mut plus = net.clone();
                plus.incoming_weights_mut(layer).unwrap().set(i, j, w + H).unwrap();
                let mut minus = net.clone();
                minus.incoming_weights_mut(layer).unwrap().set(i, j, w - H).unwrap();
                let numeric = (cost(&mut plus, &input, &expected, &le) - cost(&mut minus, &input, &expected, &le)) / (2.0 * H);
                assert_abs_diff_eq!(analytic.weight_gradients().get(i, j).unwrap(), numeric, epsilon = 1e-4);
            }

            let b = net.layer(layer).unwrap().biases.get(i, 0).unwrap();
            let mut plus = net.clone();
            plus.layer_mut(layer).unwrap().biases.set(i, 0, b + H).unwrap();
            let mut minus = net.clone();
            minus.layer_mut(layer).unwrap().biases.set(i, 0, b - H).unwrap();
            let numeric = (cost(&mut plus, &input, &expected, &le) - cost(&mut minus, &input, &expected, &le)) / (2.0 * H);
            assert_abs_diff_eq!(analytic.bias_gradients().get(i, 0).unwrap(), numeric, epsilon = 1e-4);
        }
    }
}

#[test]
fn backward_pass_without_forward_pass_fails() {
    let net = small_network();
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
fn gradient_data_must_cover_every_trainable_layer() {
    let mut net = small_network();
    net.forward(&Matrix::column(vec![0.1, 0.2]).unwrap()).unwrap();
    let mut grads = GradientData::for_network(&net);
    grads.pop();
    assert!(backpropagate(&net, &LearningError::mean_squared(), &Matrix::column(vec![0.0]).unwrap(), &mut grads).is_err());
}

fn two_output_network() -> Network {
    let mut net = Network::new(&[
        (2, ActivationFunction::Linear),
        (2, ActivationFunction::Tanh),
        (2, ActivationFunction::Sigmoid),
    ])
    .unwrap();
    net.set_incoming_weights(1, Matrix::from_data(vec![vec![0.3, -0.1], vec![0.2, 0.5]]).unwrap()).unwrap();
    net.set_incoming_weights(2, Matrix::from_data(vec![vec![-0.4, 0.6], vec![0.25, 0.15]]).unwrap()).unwrap();
    net
}

/// Analytic and numeric gradient of output-layer weight (0, 1).
fn output_weight_gradients(le: &LearningError) -> (f64, f64) {
    let input = Matrix::column(vec![0.4, 0.8]).unwrap();
    let expected = Matrix::column(vec![1.0, 0.0]).unwrap();

    let mut net = two_output_network();
    let mut grads = GradientData::for_network(&net);
    net.forward(&input).unwrap();
    backpropagate(&net, le, &expected, &mut grads).unwrap();
    let analytic = grads[1].weight_gradients().get(0, 1).unwrap();

    let w = net.incoming_weights(2).unwrap().get(0, 1).unwrap();
    let mut plus = net.clone();
    plus.incoming_weights_mut(2).unwrap().set(0, 1, w + H).unwrap();
    let mut minus = net.clone();
    minus.incoming_weights_mut(2).unwrap().set(0, 1, w - H).unwrap();
    let numeric = (cost(&mut plus, &input, &expected, le) - cost(&mut minus, &input, &expected, le)) / (2.0 * H);
    (analytic, numeric)
}

#[test]
fn multi_output_gradients_follow_summed_node_costs() {
    let summed = LearningError::new(NodeCost::SquaredError, Reduction::Sum, Reduction::Sum);
    let (analytic, numeric) = output_weight_gradients(&summed);
    assert_abs_diff_eq!(analytic, numeric, epsilon = 1e-6);

    // a mean over two output nodes halves the cost but not the backpropagated gradient
    let (analytic, numeric) = output_weight_gradients(&LearningError::mean_squared());
    assert_abs_diff_eq!(analytic, 2.0 * numeric, epsilon = 1e-6);
}
