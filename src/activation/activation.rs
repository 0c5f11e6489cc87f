use serde::{Serialize, Deserialize};
use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

const SELU_SCALE: f64 = 1.050_700_987_355_480_5;
const LEAKY_SLOPE: f64 = 0.01;

/// The fixed catalog of node-wise activation functions.
///
/// Every variant is a pure, total function over the reals together with
/// its closed-form derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivationFunction {
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
    Linear,
    /// Node-wise approximation: `calculate` is `e^x` and `derivative` is the
    /// constant `1`. The normalising denominator and the full Jacobian are
    /// not modelled, so softmax cannot be fused with categorical
    /// cross-entropy (the trainer rejects that pairing).
    Softmax,
    Softplus,
    HardSigmoid,
    Elu,
    Selu,
    SoftExponential,
    SoftShrink,
    SoftSign,
    HardTanh,
    HardShrink,
    Gelu,
    Swish,
}

/// Which weight-initialization heuristic suits a layer's activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    He,
    NormalizedXavier,
    Xavier,
}

impl ActivationFunction {
    pub const ALL: [ActivationFunction; 17] = [
        ActivationFunction::Sigmoid,
        ActivationFunction::Tanh,
        ActivationFunction::Relu,
        ActivationFunction::LeakyRelu,
        ActivationFunction::Linear,
        ActivationFunction::Softmax,
        ActivationFunction::Softplus,
        ActivationFunction::HardSigmoid,
        ActivationFunction::Elu,
        ActivationFunction::Selu,
        ActivationFunction::SoftExponential,
        ActivationFunction::SoftShrink,
        ActivationFunction::SoftSign,
        ActivationFunction::HardTanh,
        ActivationFunction::HardShrink,
        ActivationFunction::Gelu,
        ActivationFunction::Swish,
    ];

    pub fn calculate(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Relu => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyRelu => if x > 0.0 { x } else { LEAKY_SLOPE * x },
            ActivationFunction::Linear => x,
            ActivationFunction::Softmax => E.powf(x),
            ActivationFunction::Softplus => (1.0 + E.powf(x)).ln(),
            ActivationFunction::HardSigmoid => (0.2 * x + 0.5).clamp(0.0, 1.0),
            ActivationFunction::Elu => if x > 0.0 { x } else { E.powf(x) - 1.0 },
            ActivationFunction::Selu => {
                if x > 0.0 { SELU_SCALE * x } else { SELU_SCALE * (E.powf(x) - 1.0) }
            }
            ActivationFunction::SoftExponential => {
                if x > 0.0 { E.powf(-x) } else { -E.powf(x) }
            }
            ActivationFunction::SoftShrink => {
                if x > 0.5 { x - 0.5 } else if x < -0.5 { x + 0.5 } else { 0.0 }
            }
            ActivationFunction::SoftSign => x / (1.0 + x.abs()),
            ActivationFunction::HardTanh => x.clamp(-1.0, 1.0),
            ActivationFunction::HardShrink => if x.abs() > 0.5 { x } else { 0.0 },
            ActivationFunction::Gelu => {
                let c = (2.0_f64 / PI).sqrt();
                0.5 * x * (1.0 + (c * (x + 0.044715 * x.powi(3))).tanh())
            }
            ActivationFunction::Swish => x * sigmoid(x),
        }
    }

    /// Derivative with respect to the summed input `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = sigmoid(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::Relu => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyRelu => if x > 0.0 { 1.0 } else { LEAKY_SLOPE },
            ActivationFunction::Linear => 1.0,
            ActivationFunction::Softmax => 1.0,
            ActivationFunction::Softplus => sigmoid(x),
            ActivationFunction::HardSigmoid => if x > -2.5 && x < 2.5 { 0.2 } else { 0.0 },
            ActivationFunction::Elu => if x > 0.0 { 1.0 } else { E.powf(x) },
            ActivationFunction::Selu => if x > 0.0 { SELU_SCALE } else { SELU_SCALE * E.powf(x) },
            ActivationFunction::SoftExponential => {
                if x > 0.0 { -E.powf(-x) } else { -E.powf(x) }
            }
            ActivationFunction::SoftShrink => if x.abs() > 0.5 { 1.0 } else { 0.0 },
            ActivationFunction::SoftSign => 1.0 / (1.0 + x.abs()).powi(2),
            ActivationFunction::HardTanh => if x > -1.0 && x < 1.0 { 1.0 } else { 0.0 },
            ActivationFunction::HardShrink => if x.abs() > 0.5 { 1.0 } else { 0.0 },
            ActivationFunction::Gelu => {
                let c = (2.0_f64 / PI).sqrt();
                let inner = c * (x + 0.044715 * x.powi(3));
                let tanh_inner = inner.tanh();
                let sech2 = 1.0 - tanh_inner * tanh_inner;
                let d_inner = c * (1.0 + 3.0 * 0.044715 * x.powi(2));
                0.5 * tanh_inner + 0.5 * x * sech2 * d_inner + 0.5
            }
            ActivationFunction::Swish => {
                let sig = sigmoid(x);
                sig + x * sig * (1.0 - sig)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::Relu => "relu",
            ActivationFunction::LeakyRelu => "leakyRelu",
            ActivationFunction::Linear => "linear",
            ActivationFunction::Softmax => "softmax",
            ActivationFunction::Softplus => "softplus",
            ActivationFunction::HardSigmoid => "hardSigmoid",
            ActivationFunction::Elu => "elu",
            ActivationFunction::Selu => "selu",
            ActivationFunction::SoftExponential => "softExponential",
            ActivationFunction::SoftShrink => "softShrink",
            ActivationFunction::SoftSign => "softSign",
            ActivationFunction::HardTanh => "hardTanh",
            ActivationFunction::HardShrink => "hardShrink",
            ActivationFunction::Gelu => "gelu",
            ActivationFunction::Swish => "swish",
        }
    }

    /// He for the ReLU family, normalized Xavier for sigmoid/tanh, plain
    /// Xavier for everything else.
    pub fn initializer_kind(&self) -> InitializerKind {
        match self {
            ActivationFunction::Relu
            | ActivationFunction::LeakyRelu
            | ActivationFunction::Elu
            | ActivationFunction::Selu
            | ActivationFunction::Softplus
            | ActivationFunction::SoftSign
            | ActivationFunction::Gelu
            | ActivationFunction::Swish => InitializerKind::He,
            ActivationFunction::Sigmoid | ActivationFunction::Tanh => InitializerKind::NormalizedXavier,
            _ => InitializerKind::Xavier,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivationFunction::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidOptions(format!("unknown activation function `{s}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const H: f64 = 1e-6;

    /// Points away from every kink so the numeric derivative is meaningful.
    const SAMPLES: [f64; 8] = [-3.1, -1.7, -0.8, -0.2, 0.3, 0.9, 1.6, 3.3];

    #[test]
    fn derivatives_match_central_differences() {
        for act in ActivationFunction::ALL {
            if act == ActivationFunction::Softmax {
                continue;
            }
            for &x in &SAMPLES {
                let numeric = (act.calculate(x + H) - act.calculate(x - H)) / (2.0 * H);
                assert_abs_diff_eq!(act.derivative(x), numeric, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn softmax_is_node_wise_exponential() {
        let act = ActivationFunction::Softmax;
        assert_abs_diff_eq!(act.calculate(1.0), E, epsilon = 1e-12);
        assert_eq!(act.derivative(42.0), 1.0);
    }

    #[test]
    fn known_values() {
        assert_eq!(ActivationFunction::Relu.calculate(-2.0), 0.0);
        assert_eq!(ActivationFunction::LeakyRelu.calculate(-2.0), -0.02);
        assert_eq!(ActivationFunction::HardTanh.calculate(3.0), 1.0);
        assert_eq!(ActivationFunction::HardSigmoid.calculate(10.0), 1.0);
        assert_eq!(ActivationFunction::SoftShrink.calculate(0.2), 0.0);
        assert_abs_diff_eq!(ActivationFunction::Sigmoid.calculate(0.0), 0.5);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for act in ActivationFunction::ALL {
            assert_eq!(act.name().parse::<ActivationFunction>().unwrap(), act);
        }
        assert!("swishy".parse::<ActivationFunction>().is_err());
    }

    #[test]
    fn initializer_families() {
        assert_eq!(ActivationFunction::Relu.initializer_kind(), InitializerKind::He);
        assert_eq!(ActivationFunction::Tanh.initializer_kind(), InitializerKind::NormalizedXavier);
        assert_eq!(ActivationFunction::Linear.initializer_kind(), InitializerKind::Xavier);
    }
}
