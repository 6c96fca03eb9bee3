// ============================================================
// Layer 5 — Projection Head
// ============================================================
// Optional H → D remap applied after pooling.
//
//   D == H → no layer at all, vectors pass through untouched
//   D != H → learned affine map y = W·x + b, W: [D, H], b: [D]
//
// The choice is made once in `init`; an identity head never
// carries an untrained transform.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
};

#[derive(Config, Debug)]
pub struct ProjectionHeadConfig {
    pub input_dim:  usize,
    pub output_dim: usize,
}

impl ProjectionHeadConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ProjectionHead<B> {
        let linear = (self.output_dim != self.input_dim)
            .then(|| LinearConfig::new(self.input_dim, self.output_dim).init(device));
        ProjectionHead { linear, output_dim: self.output_dim }
    }
}

#[derive(Module, Debug)]
pub struct ProjectionHead<B: Backend> {
    linear:     Option<Linear<B>>,
    output_dim: usize,
}

impl<B: Backend> ProjectionHead<B> {
    /// x: [batch, H] → [batch, D]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        match &self.linear {
            Some(linear) => linear.forward(x),
            None         => x,
        }
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    pub fn is_identity(&self) -> bool {
        self.linear.is_none()
    }
}
