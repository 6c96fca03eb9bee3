// ============================================================
// Layer 5 — Encoder Backbone
// ============================================================
// The shared upstream computation:
//
//   (token_ids [batch, L], attention_mask [batch, L])
//       │
//       ▼
//   hidden_states  [batch, L, H]   one vector per token
//   pooled_summary [batch, H]      one vector per sequence
//
// Everything downstream (pooling, projection, task heads) talks
// to the backbone only through the `Encoder` trait, so any
// pretrained model with this interface can be dropped in.
//
// `TransformerEncoder` is the in-crate backbone:
//   • Token embeddings + learned positional embeddings
//   • N post-norm encoder blocks (self-attention + GELU FFN)
//   • Padding positions masked out of attention
//   • Final layer norm
//   • Optional BERT-style summary head: tanh(W · h[:, 0] + b)
//
// Its weights are randomly initialised; filling them from a
// pretrained checkpoint is not this crate's job.

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation,
};

use crate::error::{self, EncoderError};

// ─── Encoder Interface ────────────────────────────────────────────────────────
/// Output of one encoder call. Owned by the caller, never mutated
/// by the components that read it.
#[derive(Debug, Clone)]
pub struct EncoderOutput<B: Backend> {
    /// Per-token hidden states — shape: [batch, L, H]
    pub hidden_states: Tensor<B, 3>,

    /// Encoder-native sequence summary — shape: [batch, H].
    /// None when the encoder has no summary head.
    pub pooled_summary: Option<Tensor<B, 2>>,
}

/// Anything that maps token ids + mask to hidden states.
pub trait Encoder<B: Backend> {
    fn encode(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> EncoderOutput<B>;

    /// Hidden size H, fixed for the lifetime of the encoder
    fn hidden_size(&self) -> usize;

    /// Longest sequence the encoder accepts
    fn max_seq_len(&self) -> usize;

    /// Number of rows in the token embedding table
    fn vocab_size(&self) -> usize;

    /// Whether `encode` fills `pooled_summary`
    fn has_pooled_summary(&self) -> bool;
}

// ─── Configuration ────────────────────────────────────────────────────────────
// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct TransformerEncoderConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub hidden_size: usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
    /// Stands in for a pretrained, frozen backbone, so 0 by default
    #[config(default = 0.0)]
    pub dropout:     f64,
    /// Build the summary head that produces `pooled_summary`
    #[config(default = true)]
    pub pooler:      bool,
}

impl TransformerEncoderConfig {
    /// Small backbone used by the CLI when no config file is given
    pub fn small(vocab_size: usize) -> Self {
        Self::new(vocab_size, 128, 128, 4, 2, 512)
    }

    /// Reject dimension combinations the attention blocks cannot be built with.
    pub fn validate(&self) -> error::Result<()> {
        let dims = [
            ("vocab_size",  self.vocab_size),
            ("max_seq_len", self.max_seq_len),
            ("hidden_size", self.hidden_size),
            ("num_heads",   self.num_heads),
            ("d_ff",        self.d_ff),
        ];
        if let Some((name, _)) = dims.iter().find(|(_, v)| *v == 0) {
            return Err(EncoderError::shape(format!("encoder {name} must be non-zero")));
        }
        if self.hidden_size % self.num_heads != 0 {
            return Err(EncoderError::shape(format!(
                "hidden_size {} is not divisible by num_heads {}",
                self.hidden_size, self.num_heads
            )));
        }
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> TransformerEncoder<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.hidden_size).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.hidden_size).init(device);
        let layers: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.hidden_size).init(device);
        let pooler     = self
            .pooler
            .then(|| LinearConfig::new(self.hidden_size, self.hidden_size).init(device));
        let dropout    = DropoutConfig::new(self.dropout).init();

        tracing::debug!(
            "Encoder: {} layers, hidden={}, heads={}, pooler={}",
            self.num_layers, self.hidden_size, self.num_heads, self.pooler
        );

        TransformerEncoder {
            token_embedding, position_embedding, layers,
            final_norm, pooler, dropout,
            hidden_size: self.hidden_size,
            max_seq_len: self.max_seq_len,
            vocab_size:  self.vocab_size,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.hidden_size, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.hidden_size, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.hidden_size).init(device);
        let norm1   = LayerNormConfig::new(self.hidden_size).init(device);
        let norm2   = LayerNormConfig::new(self.hidden_size).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }
}

// ─── Encoder Block ────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    /// x: [batch, L, H], pad_mask: [batch, L] (true = padding)
    pub fn forward(&self, x: Tensor<B, 3>, pad_mask: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        let attn_input  = MhaInput::self_attn(x.clone()).mask_pad(pad_mask);
        let attn_output = self.self_attn.forward(attn_input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

// ─── Transformer Encoder ──────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct TransformerEncoder<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub final_norm:         LayerNorm<B>,
    pub pooler:             Option<Linear<B>>,
    pub dropout:            Dropout,
    pub hidden_size:        usize,
    pub max_seq_len:        usize,
    pub vocab_size:         usize,
}

impl<B: Backend> TransformerEncoder<B> {
    /// token_ids, attention_mask: [batch, L] → hidden states [batch, L, H]
    pub fn forward_hidden(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Tensor<B, 3> {
        let [batch_size, seq_len] = token_ids.dims();

        let tok_emb = self.token_embedding.forward(token_ids);

        // Self-attention is permutation-invariant, so position must be injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        let pad_mask = attention_mask.equal_elem(0);

        let mut x = self.dropout.forward(tok_emb + pos_emb);
        for layer in &self.layers {
            x = layer.forward(x, pad_mask.clone());
        }
        self.final_norm.forward(x)
    }

    /// First-position summary: tanh(W · h[:, 0] + b) → [batch, H]
    fn summarise(&self, pooler: &Linear<B>, hidden: &Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, _, hidden_size] = hidden.dims();
        let first = hidden
            .clone()
            .slice([0..batch_size, 0..1, 0..hidden_size])
            .reshape([batch_size, hidden_size]);
        activation::tanh(pooler.forward(first))
    }
}

impl<B: Backend> Encoder<B> for TransformerEncoder<B> {
    fn encode(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> EncoderOutput<B> {
        let hidden_states  = self.forward_hidden(token_ids, attention_mask);
        let pooled_summary = self
            .pooler
            .as_ref()
            .map(|pooler| self.summarise(pooler, &hidden_states));
        EncoderOutput { hidden_states, pooled_summary }
    }

    fn hidden_size(&self) -> usize { self.hidden_size }

    fn max_seq_len(&self) -> usize { self.max_seq_len }

    fn vocab_size(&self) -> usize { self.vocab_size }

    fn has_pooled_summary(&self) -> bool { self.pooler.is_some() }
}
