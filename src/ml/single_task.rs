// ============================================================
// Layer 5 — Single-Task Sentence Encoder
// ============================================================
// Sentence embeddings:
//
//   Encoder → SentencePooler → ProjectionHead → [batch, D]
//
// Built with SingleTaskEncoderConfig(encoder, output_dim, pooling),
// or around an existing encoder with `from_encoder`.
// The pooling name is parsed and checked against the encoder
// inside `init`, before any weights exist, so a bad strategy
// never reaches a forward call.
//
// Inference without autodiff bookkeeping: build the model on an
// inner backend directly, or call `.valid()` on an autodiff model.

use burn::{module::Ignored, prelude::*};

use crate::data::TokenBatch;
use crate::domain::PoolingStrategy;
use crate::error::{self, EncoderError};
use crate::ml::{
    encoder::{Encoder, TransformerEncoder, TransformerEncoderConfig},
    pooler::SentencePooler,
    projection::{ProjectionHead, ProjectionHeadConfig},
    shapes,
};

#[derive(Config, Debug)]
pub struct SingleTaskEncoderConfig {
    pub encoder:    TransformerEncoderConfig,
    /// Embedding size D; equal to the encoder hidden size means no projection
    pub output_dim: usize,
    /// "cls" or "mean"
    pub pooling:    String,
}

impl SingleTaskEncoderConfig {
    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> error::Result<SingleTaskEncoder<B, TransformerEncoder<B>>> {
        let strategy: PoolingStrategy = self.pooling.parse()?;
        self.encoder.validate()?;
        if self.output_dim == 0 {
            return Err(EncoderError::shape("output_dim must be non-zero"));
        }

        SingleTaskEncoder::from_encoder(self.encoder.init(device), self.output_dim, strategy, device)
    }
}

/// `E` is the backbone; `SingleTaskEncoderConfig::init` builds a
/// `TransformerEncoder`, `from_encoder` accepts any `Encoder`.
#[derive(Module, Debug)]
pub struct SingleTaskEncoder<B: Backend, E> {
    pub backbone:   E,
    pub pooler:     Ignored<SentencePooler>,
    pub projection: ProjectionHead<B>,
}

impl<B: Backend, E: Encoder<B>> SingleTaskEncoder<B, E> {
    /// Wrap an already-built encoder. Fails when the encoder cannot
    /// serve the strategy or output_dim is zero.
    pub fn from_encoder(
        backbone:   E,
        output_dim: usize,
        strategy:   PoolingStrategy,
        device:     &B::Device,
    ) -> error::Result<Self> {
        if output_dim == 0 {
            return Err(EncoderError::shape("output_dim must be non-zero"));
        }

        let pooler     = SentencePooler::new(strategy, &backbone)?;
        let projection = ProjectionHeadConfig::new(backbone.hidden_size(), output_dim).init(device);

        tracing::info!(
            "SingleTaskEncoder: pooling={}, hidden={}, output_dim={} ({})",
            strategy,
            backbone.hidden_size(),
            output_dim,
            if projection.is_identity() { "identity" } else { "projected" }
        );

        Ok(Self { backbone, pooler: Ignored(pooler), projection })
    }

    /// token_ids, attention_mask: [batch, L] → embeddings [batch, D]
    pub fn embed(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> error::Result<Tensor<B, 2>> {
        let pooled    = self.pool(token_ids, attention_mask)?;
        let embedding = self.projection.forward(pooled);
        tracing::debug!("embed → {:?}", embedding.dims());
        Ok(embedding)
    }

    /// Sentence vectors before projection — shape: [batch, H]
    pub fn pool(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> error::Result<Tensor<B, 2>> {
        shapes::validate_batch(
            &token_ids,
            &attention_mask,
            self.backbone.max_seq_len(),
            self.backbone.vocab_size(),
        )?;
        tracing::debug!("encode {:?} with {} pooling", token_ids.dims(), self.strategy());

        let output = self.backbone.encode(token_ids, attention_mask.clone());
        self.pooler.0.pool(&output, attention_mask)
    }

    /// Embed a validated TokenBatch on the given device
    pub fn embed_batch(&self, batch: &TokenBatch, device: &B::Device) -> error::Result<Tensor<B, 2>> {
        let (token_ids, attention_mask) = batch.to_tensors::<B>(device);
        self.embed(token_ids, attention_mask)
    }

    pub fn strategy(&self) -> PoolingStrategy {
        self.pooler.0.strategy()
    }

    pub fn output_dim(&self) -> usize {
        self.projection.output_dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::encoder::tests::{sample_inputs, tiny_config, FixedEncoder, TestBackend};
    use burn::{
        backend::{Autodiff, NdArray},
        module::AutodiffModule,
    };

    type Model = SingleTaskEncoder<TestBackend, TransformerEncoder<TestBackend>>;

    fn build(output_dim: usize, pooling: &str) -> error::Result<Model> {
        SingleTaskEncoderConfig::new(tiny_config(), output_dim, pooling.to_string())
            .init(&Default::default())
    }

    fn values(t: Tensor<TestBackend, 2>) -> Vec<f32> {
        t.into_data().to_vec().unwrap()
    }

    #[test]
    fn test_embed_shape_for_each_strategy() {
        let device = Default::default();
        for pooling in ["cls", "mean"] {
            for output_dim in [8, 4, 12] {
                let model = build(output_dim, pooling).unwrap();
                let (ids, mask) = sample_inputs(&device);
                let out = model.embed(ids, mask).unwrap();
                assert_eq!(out.dims(), [2, output_dim], "pooling={pooling}");
            }
        }
    }

    #[test]
    fn test_unknown_strategy_fails_at_construction() {
        let err = build(8, "max").unwrap_err();
        assert_eq!(err, EncoderError::InvalidPoolingStrategy("max".into()));
    }

    #[test]
    fn test_cls_needs_encoder_summary() {
        let cfg = SingleTaskEncoderConfig::new(
            tiny_config().with_pooler(false), 8, "cls".to_string(),
        );
        let err = cfg.init::<TestBackend>(&Default::default()).unwrap_err();
        assert!(matches!(err, EncoderError::UnsupportedPooling { .. }));
    }

    #[test]
    fn test_zero_output_dim_rejected() {
        assert!(matches!(build(0, "mean"), Err(EncoderError::ShapeMismatch(_))));
    }

    #[test]
    fn test_identity_projection_returns_pooled_vector() {
        let device = Default::default();
        for pooling in ["cls", "mean"] {
            let model = build(8, pooling).unwrap();
            assert!(model.projection.is_identity());

            let (ids, mask) = sample_inputs(&device);
            let pooled   = model.pool(ids.clone(), mask.clone()).unwrap();
            let embedded = model.embed(ids, mask).unwrap();
            assert_eq!(values(pooled), values(embedded));
        }
    }

    #[test]
    fn test_cls_embedding_is_encoder_summary() {
        let device = Default::default();
        let model = build(8, "cls").unwrap();
        let (ids, mask) = sample_inputs(&device);

        let summary  = model.backbone.encode(ids.clone(), mask.clone()).pooled_summary.unwrap();
        let embedded = model.embed(ids, mask).unwrap();
        assert_eq!(values(summary), values(embedded));
    }

    #[test]
    fn test_embed_is_deterministic() {
        let device = Default::default();
        let model = build(4, "mean").unwrap();
        let (ids, mask) = sample_inputs(&device);

        let a = values(model.embed(ids.clone(), mask.clone()).unwrap());
        let b = values(model.embed(ids, mask).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_mismatched_mask_is_shape_error() {
        let device = Default::default();
        let model = build(8, "mean").unwrap();
        let ids  = Tensor::<TestBackend, 2, Int>::from_ints([[2, 5, 9], [2, 7, 3]], &device);
        let mask = Tensor::<TestBackend, 2, Int>::from_ints([[1, 1], [1, 1]], &device);

        let err = model.embed(ids, mask).unwrap_err();
        assert!(matches!(err, EncoderError::ShapeMismatch(_)));
    }

    #[test]
    fn test_embed_batch_from_token_batch() {
        let device = Default::default();
        let model = build(6, "mean").unwrap();
        let batch = TokenBatch::new(
            vec![vec![2, 10, 11, 3], vec![2, 12, 3, 0], vec![2, 3, 0, 0]],
            vec![vec![1, 1, 1, 1],   vec![1, 1, 1, 0],  vec![1, 1, 0, 0]],
        ).unwrap();

        let out = model.embed_batch(&batch, &device).unwrap();
        assert_eq!(out.dims(), [3, 6]);
    }

    #[test]
    fn test_valid_model_matches_autodiff_model() {
        type TrainBackend = Autodiff<NdArray>;
        let device = Default::default();

        let model = SingleTaskEncoderConfig::new(tiny_config(), 4, "mean".to_string())
            .init::<TrainBackend>(&device)
            .unwrap();
        let inference = model.valid();

        let ids  = Tensor::<TrainBackend, 2, Int>::from_ints([[2, 5, 9, 3]], &device);
        let mask = Tensor::<TrainBackend, 2, Int>::from_ints([[1, 1, 1, 1]], &device);
        let tracked: Vec<f32> = model.embed(ids, mask).unwrap().into_data().to_vec().unwrap();

        let ids  = Tensor::<NdArray, 2, Int>::from_ints([[2, 5, 9, 3]], &device);
        let mask = Tensor::<NdArray, 2, Int>::from_ints([[1, 1, 1, 1]], &device);
        let untracked = values(inference.embed(ids, mask).unwrap());

        for (a, b) in tracked.iter().zip(&untracked) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_mask_values_outside_zero_one_rejected() {
        let device = Default::default();
        let model = build(8, "mean").unwrap();
        let ids  = Tensor::<TestBackend, 2, Int>::from_ints([[2, 5, 9]], &device);
        let mask = Tensor::<TestBackend, 2, Int>::from_ints([[5, 1, -3]], &device);

        let err = model.embed(ids, mask).unwrap_err();
        assert!(matches!(err, EncoderError::ShapeMismatch(_)));
    }

    fn fixed_encoder(device: &<TestBackend as Backend>::Device) -> FixedEncoder<TestBackend> {
        // batch 2, L 3, H 2
        let hidden = Tensor::<TestBackend, 3>::from_floats(
            [
                [[1.0, 2.0], [3.0, 4.0], [100.0, 100.0]],
                [[5.0, 6.0], [100.0, 100.0], [100.0, 100.0]],
            ],
            device,
        );
        let summary = Tensor::<TestBackend, 2>::from_floats([[0.5, -0.5], [0.25, 0.75]], device);
        FixedEncoder::new(hidden, Some(summary))
    }

    fn fixed_inputs(
        device: &<TestBackend as Backend>::Device,
    ) -> (Tensor<TestBackend, 2, Int>, Tensor<TestBackend, 2, Int>) {
        (
            Tensor::from_ints([[2, 5, 0], [2, 0, 0]], device),
            Tensor::from_ints([[1, 1, 0], [1, 0, 0]], device),
        )
    }

    #[test]
    fn test_any_encoder_can_back_the_model() {
        let device = Default::default();

        let model: SingleTaskEncoder<TestBackend, _> =
            SingleTaskEncoder::from_encoder(fixed_encoder(&device), 2, PoolingStrategy::Mean, &device)
                .unwrap();
        let (ids, mask) = fixed_inputs(&device);
        assert_eq!(values(model.embed(ids, mask).unwrap()), vec![2.0, 3.0, 5.0, 6.0]);
        assert_eq!(model.backbone.calls(), 1);

        let model: SingleTaskEncoder<TestBackend, _> =
            SingleTaskEncoder::from_encoder(fixed_encoder(&device), 2, PoolingStrategy::Cls, &device)
                .unwrap();
        let (ids, mask) = fixed_inputs(&device);
        assert_eq!(values(model.embed(ids, mask).unwrap()), vec![0.5, -0.5, 0.25, 0.75]);
        assert_eq!(model.backbone.calls(), 1);
    }

    #[test]
    fn test_cls_rejected_for_encoder_without_summary() {
        let device = Default::default();
        let hidden = Tensor::<TestBackend, 3>::zeros([1, 2, 4], &device);
        let result: error::Result<SingleTaskEncoder<TestBackend, _>> = SingleTaskEncoder::from_encoder(
            FixedEncoder::new(hidden, None), 4, PoolingStrategy::Cls, &device,
        );
        assert!(matches!(result, Err(EncoderError::UnsupportedPooling { .. })));
    }
}
