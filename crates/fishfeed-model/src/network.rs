//! Dense feedforward network evaluated with `ndarray`.

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::Deserialize;
use tracing::debug;

use crate::error::ModelError;

/// Number of features the feed model takes: amount, temperature, size.
pub const FEATURES: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Identity,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn f(&self, x: f64) -> f64 {
        match self {
            Activation::Identity => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
        }
    }
}

#[derive(Deserialize)]
struct ModelFile {
    #[serde(default = "default_inputs")]
    inputs: usize,
    layers: Vec<LayerFile>,
}

#[derive(Deserialize)]
struct LayerFile {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    #[serde(default)]
    activation: Activation,
}

fn default_inputs() -> usize {
    FEATURES
}

#[derive(Debug, Clone)]
struct Dense {
    /// `out × in`
    w: Array2<f64>,
    b: Array1<f64>,
    act_fn: Activation,
}

impl Dense {
    fn forward(&self, x: &Array1<f64>) -> Array1<f64> {
        let mut z = self.w.dot(x) + &self.b;
        z.mapv_inplace(|v| self.act_fn.f(v));
        z
    }
}

/// A loaded, shape-checked regression network with one output.
#[derive(Debug, Clone)]
pub struct FeedModel {
    layers: Vec<Dense>,
}

impl FeedModel {
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let model = Self::from_json_str(&content)?;
        debug!(?path, layers = model.layers.len(), "feed model loaded");
        Ok(model)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        let file: ModelFile =
            serde_json::from_str(content).map_err(|e| ModelError::Parse(e.to_string()))?;
        if file.inputs != FEATURES {
            return Err(ModelError::Parse(format!(
                "model expects {} inputs, feed model needs {FEATURES}",
                file.inputs
            )));
        }
        if file.layers.is_empty() {
            return Err(ModelError::Parse("model has no layers".to_string()));
        }

        let mut width = file.inputs;
        let mut layers = Vec::with_capacity(file.layers.len());
        for (i, layer) in file.layers.into_iter().enumerate() {
            let rows = layer.weights.len();
            if rows == 0 {
                return Err(ModelError::Shape {
                    layer: i,
                    reason: "no output units".to_string(),
                });
            }
            if let Some(row) = layer.weights.iter().find(|r| r.len() != width) {
                return Err(ModelError::Shape {
                    layer: i,
                    reason: format!("expected {width} weights per unit, found {}", row.len()),
                });
            }
            if layer.bias.len() != rows {
                return Err(ModelError::Shape {
                    layer: i,
                    reason: format!("{rows} units but {} biases", layer.bias.len()),
                });
            }

            let flat: Vec<f64> = layer.weights.into_iter().flatten().collect();
            let w = Array2::from_shape_vec((rows, width), flat).map_err(|e| ModelError::Shape {
                layer: i,
                reason: e.to_string(),
            })?;
            layers.push(Dense {
                w,
                b: Array1::from(layer.bias),
                act_fn: layer.activation,
            });
            width = rows;
        }

        if width != 1 {
            return Err(ModelError::Shape {
                layer: layers.len() - 1,
                reason: format!("final layer must have 1 output, has {width}"),
            });
        }
        Ok(Self { layers })
    }

    /// Predict from feeding amount, water temperature and fish size.
    pub fn predict(&self, amount: f64, temper: f64, size: f64) -> Result<f64, ModelError> {
        let input = [amount, temper, size];
        if input.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Input(format!(
                "inputs must be finite, got {input:?}"
            )));
        }

        let mut x = Array1::from(input.to_vec());
        for layer in &self.layers {
            x = layer.forward(&x);
        }
        Ok(x[0])
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}
