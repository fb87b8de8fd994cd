//! Sentiscope Model
//!
//! Classification backends and the lazy analyzer:
//! - [`Classifier`]: the backend trait (top class + all class scores)
//! - [`RobertaClassifier`]: candle-based backend for the pretrained checkpoint
//! - [`LexiconClassifier`]: offline keyword fallback, no weights to download
//! - [`SentimentAnalyzer`]: once-initialized shared handle plus the
//!   normalization that turns raw predictions into stable wire records

pub mod analyzer;
pub mod classifier;
pub mod lexicon;
pub mod roberta;

pub use analyzer::{ClassifierLoader, SentimentAnalyzer};
pub use classifier::{Classifier, Prediction};
pub use lexicon::LexiconClassifier;
pub use roberta::RobertaClassifier;
