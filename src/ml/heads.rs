// ============================================================
// Layer 5 — Task Heads
// ============================================================
// Two stateless readers of the shared encoder output:
//
//   ClassificationHead  pooled_summary [batch, H]   → [batch, C]
//                       dropout (training only) + Linear(H → C)
//
//   TokenLabelingHead   hidden_states [batch, L, H] → [batch, L, K]
//                       Linear(H → K) at every position, padding included

use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
};

use crate::domain::RunMode;

// ─── Sentence Classification (task A) ─────────────────────────────────────────
#[derive(Config, Debug)]
pub struct ClassificationHeadConfig {
    pub hidden_size: usize,
    pub num_classes: usize,
    #[config(default = 0.1)]
    pub dropout:     f64,
}

impl ClassificationHeadConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ClassificationHead<B> {
        ClassificationHead {
            dropout: DropoutConfig::new(self.dropout).init(),
            linear:  LinearConfig::new(self.hidden_size, self.num_classes).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct ClassificationHead<B: Backend> {
    pub dropout: Dropout,
    pub linear:  Linear<B>,
}

impl<B: Backend> ClassificationHead<B> {
    /// pooled: [batch, H] → logits [batch, C]
    ///
    /// Dropout runs only in `RunMode::Training`. Burn additionally
    /// skips it on backends without autodiff.
    pub fn forward(&self, pooled: Tensor<B, 2>, mode: RunMode) -> Tensor<B, 2> {
        let x = if mode.is_training() {
            self.dropout.forward(pooled)
        } else {
            pooled
        };
        self.linear.forward(x)
    }
}

// ─── Token Labeling (task B) ──────────────────────────────────────────────────
#[derive(Config, Debug)]
pub struct TokenLabelingHeadConfig {
    pub hidden_size: usize,
    pub num_labels:  usize,
}

impl TokenLabelingHeadConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TokenLabelingHead<B> {
        TokenLabelingHead {
            linear: LinearConfig::new(self.hidden_size, self.num_labels).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct TokenLabelingHead<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> TokenLabelingHead<B> {
    /// hidden: [batch, L, H] → logits [batch, L, K]
    pub fn forward(&self, hidden: Tensor<B, 3>) -> Tensor<B, 3> {
        self.linear.forward(hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = NdArray;
    type TestAutodiffBackend = Autodiff<NdArray>;

    #[test]
    fn test_classification_head_shape() {
        let device = Default::default();
        let head: ClassificationHead<TestBackend> = ClassificationHeadConfig::new(8, 3).init(&device);
        let out = head.forward(Tensor::ones([2, 8], &device), RunMode::Inference);
        assert_eq!(out.dims(), [2, 3]);
    }

    #[test]
    fn test_inference_mode_skips_dropout_under_autodiff() {
        let device = Default::default();
        let head: ClassificationHead<TestAutodiffBackend> =
            ClassificationHeadConfig::new(16, 4).with_dropout(0.5).init(&device);
        let x = Tensor::<TestAutodiffBackend, 2>::ones([3, 16], &device);

        let a: Vec<f32> = head.forward(x.clone(), RunMode::Inference).into_data().to_vec().unwrap();
        let b: Vec<f32> = head.forward(x.clone(), RunMode::Inference).into_data().to_vec().unwrap();
        let plain: Vec<f32> = head.linear.forward(x).into_data().to_vec().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, plain);
    }

    #[test]
    fn test_training_mode_is_noop_without_autodiff() {
        let device = Default::default();
        let head: ClassificationHead<TestBackend> =
            ClassificationHeadConfig::new(16, 4).with_dropout(0.5).init(&device);
        let x = Tensor::<TestBackend, 2>::ones([3, 16], &device);

        let train: Vec<f32> = head.forward(x.clone(), RunMode::Training).into_data().to_vec().unwrap();
        let infer: Vec<f32> = head.forward(x, RunMode::Inference).into_data().to_vec().unwrap();
        assert_eq!(train, infer);
    }

    #[test]
    fn test_token_head_applies_per_position() {
        let device = Default::default();
        let head: TokenLabelingHead<TestBackend> = TokenLabelingHeadConfig::new(8, 5).init(&device);

        // Two identical positions must get identical logits
        let hidden = Tensor::<TestBackend, 3>::ones([2, 6, 8], &device);
        let out = head.forward(hidden);
        assert_eq!(out.dims(), [2, 6, 5]);

        let values: Vec<f32> = out.into_data().to_vec().unwrap();
        for row in values.chunks(5) {
            assert_eq!(row, &values[..5]);
        }
    }
}
