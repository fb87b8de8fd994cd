//! Candle-based backend for pretrained sequence-classification checkpoints
//!
//! Downloads the checkpoint through hf-hub (cached locally on first use),
//! runs the encoder with candle, and applies the checkpoint's classification
//! head to produce per-class scores. CPU only; the deployed function does not
//! request a GPU.

use crate::classifier::{Classifier, Prediction};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::{api::sync::Api, Repo, RepoType};
use sentiscope_core::{Error, Result};
use std::path::PathBuf;
use tokenizers::{Tokenizer, TruncationParams};

const MAX_SEQ_LEN: usize = 512;

/// Files required from the checkpoint repository.
const CHECKPOINT_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];

/// Sequence-classification backend over a RoBERTa/BERT encoder.
pub struct RobertaClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: BertModel,
    head: ClassificationHead,
    labels: Vec<String>,
    device: Device,
}

impl RobertaClassifier {
    /// Download and load the pretrained checkpoint for `model_id`.
    ///
    /// Weights are fetched through hf-hub and reused from its cache on
    /// subsequent loads.
    pub fn load(model_id: &str) -> Result<Self> {
        let files = Self::fetch_checkpoint(model_id)?;
        Self::from_files(model_id, &files)
    }

    fn fetch_checkpoint(model_id: &str) -> Result<Vec<PathBuf>> {
        let api = Api::new()
            .map_err(|e| Error::model(format!("failed to initialize hub API: {e}")))?;

        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            "main".to_string(),
        ));

        CHECKPOINT_FILES
            .iter()
            .map(|&file| {
                tracing::debug!(model_id, file, "fetching checkpoint file");
                repo.get(file)
                    .map_err(|e| Error::model(format!("failed to download {file}: {e}")))
            })
            .collect()
    }

    fn from_files(model_id: &str, files: &[PathBuf]) -> Result<Self> {
        let [config_path, tokenizer_path, weights_path] = files else {
            return Err(Error::model("incomplete checkpoint file set"));
        };

        let raw_config = std::fs::read_to_string(config_path)
            .map_err(|e| Error::model(format!("failed to read model config: {e}")))?;

        let bert_config: BertConfig = serde_json::from_str(&raw_config)
            .map_err(|e| Error::model(format!("failed to parse model config: {e}")))?;

        let labels = parse_labels(&raw_config)?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| Error::model(format!("failed to load tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| Error::model(format!("failed to configure truncation: {e}")))?;

        let device = Device::Cpu;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
                .map_err(|e| Error::model(format!("failed to load weights: {e}")))?
        };

        // Encoder weights live under the architecture prefix; the
        // classification head sits at the checkpoint root.
        let model = BertModel::load(vb.pp("roberta"), &bert_config)
            .or_else(|_| BertModel::load(vb.pp("bert"), &bert_config))
            .map_err(|e| Error::model(format!("failed to load encoder: {e}")))?;

        let head = ClassificationHead::load(&vb, bert_config.hidden_size, labels.len())?;

        tracing::info!(model_id, num_labels = labels.len(), "loaded classifier");

        Ok(Self {
            name: model_id.to_string(),
            tokenizer,
            model,
            head,
            labels,
            device,
        })
    }

    fn forward(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::model(format!("tokenization failed: {e}")))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::model(format!("failed to build input tensor: {e}")))?;

        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::model(format!("failed to build token type tensor: {e}")))?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, None)
            .map_err(|e| Error::model(format!("encoder forward pass failed: {e}")))?;

        // First-token pooling, then the classification head and softmax.
        let scores = hidden
            .i((.., 0))
            .and_then(|cls| self.head.forward(&cls))
            .and_then(|logits| candle_nn::ops::softmax_last_dim(&logits))
            .and_then(|probs| probs.squeeze(0))
            .and_then(|probs| probs.to_vec1::<f32>())
            .map_err(|e| Error::model(format!("classification head failed: {e}")))?;

        Ok(scores)
    }

    fn label_name(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{index}"))
    }
}

#[async_trait::async_trait]
impl Classifier for RobertaClassifier {
    async fn classify(&self, text: &str) -> Result<Prediction> {
        let scores = self.forward(text)?;

        let all_scores = scores
            .iter()
            .enumerate()
            .map(|(i, score)| (self.label_name(i), *score))
            .collect();

        Prediction::from_scores(all_scores)
            .ok_or_else(|| Error::model("model produced no class scores"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Classification head read from the checkpoint.
///
/// RoBERTa checkpoints carry a two-layer head (`classifier.dense` +
/// `classifier.out_proj`); BERT checkpoints a single `classifier` layer.
enum ClassificationHead {
    Roberta { dense: Linear, out_proj: Linear },
    Bert { classifier: Linear },
}

impl ClassificationHead {
    fn load(vb: &VarBuilder, hidden_size: usize, num_labels: usize) -> Result<Self> {
        if vb.contains_tensor("classifier.out_proj.weight") {
            let dense = candle_nn::linear(hidden_size, hidden_size, vb.pp("classifier.dense"))
                .map_err(|e| Error::model(format!("failed to load head dense layer: {e}")))?;
            let out_proj = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier.out_proj"))
                .map_err(|e| Error::model(format!("failed to load head projection: {e}")))?;
            Ok(Self::Roberta { dense, out_proj })
        } else {
            let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))
                .map_err(|e| Error::model(format!("failed to load classifier layer: {e}")))?;
            Ok(Self::Bert { classifier })
        }
    }

    fn forward(&self, cls: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Self::Roberta { dense, out_proj } => out_proj.forward(&dense.forward(cls)?.tanh()?),
            Self::Bert { classifier } => classifier.forward(cls),
        }
    }
}

/// Read the `id2label` table from the checkpoint config, ordered by index.
fn parse_labels(raw_config: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(raw_config)?;

    let Some(id2label) = value.get("id2label").and_then(|v| v.as_object()) else {
        return Err(Error::model("model config carries no id2label table"));
    };

    let mut labels: Vec<(usize, String)> = id2label
        .iter()
        .filter_map(|(id, label)| {
            let index = id.parse().ok()?;
            Some((index, label.as_str()?.to_string()))
        })
        .collect();

    if labels.is_empty() {
        return Err(Error::model("model config id2label table is empty"));
    }

    labels.sort_by_key(|(index, _)| *index);
    Ok(labels.into_iter().map(|(_, label)| label).collect())
}
