// Social-political name classifier: lexical similarity to a reference word
// list, fed to a pre-trained model.
//
// A name is tokenized, every token is compared against the lexicon, and the
// closest match (by Jaccard and by Levenshtein) becomes the feature vector
// together with the name's character count.

pub mod lexicon;
pub mod model;
pub mod similarity;
pub mod tokenizer;

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;

use self::lexicon::Lexicon;
use self::model::{Classifier, ModelArtifact, FEATURE_COUNT};

#[derive(Debug, Error, PartialEq)]
pub enum SocialPoliticalError {
    #[error("'{0}' contains no word-like tokens")]
    NoTokens(String),

    #[error("malformed classifier: {0}")]
    MalformedModel(String),
}

/// The three features the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    /// Smallest Jaccard distance between a token and a lexicon word
    pub jaccard_sim: f64,
    /// Smallest Levenshtein distance between a token and a lexicon word
    pub levenshtein_dist: usize,
    /// Characters in the untokenized text
    pub char_count: usize,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.jaccard_sim,
            self.levenshtein_dist as f64,
            self.char_count as f64,
        ]
    }
}

pub struct SocialPoliticalModel {
    classifier: Box<dyn Classifier>,
    lexicon: Lexicon,
}

impl std::fmt::Debug for SocialPoliticalModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialPoliticalModel")
            .field("lexicon", &self.lexicon)
            .finish_non_exhaustive()
    }
}

impl SocialPoliticalModel {
    pub fn new(classifier: Box<dyn Classifier>, lexicon: Lexicon) -> Self {
        Self {
            classifier,
            lexicon,
        }
    }

    /// Load the model artifact (JSON) and the lexicon (CSV).
    pub fn load(model_path: &Path, lexicon_path: &Path) -> Result<Self> {
        let artifact = ModelArtifact::load(model_path)?;
        let lexicon = Lexicon::load_csv(lexicon_path)?;
        Ok(Self::new(Box::new(artifact), lexicon))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn features(&self, text: &str) -> Result<FeatureVector, SocialPoliticalError> {
        let tokens = tokenizer::tokenize(text);
        let words = self.lexicon.words();

        // The lexicon is never empty, so both minimums exist once there is a token.
        let (Some(jaccard_sim), Some(levenshtein_dist)) = (
            similarity::min_jaccard(&tokens, words),
            similarity::min_levenshtein(&tokens, words),
        ) else {
            return Err(SocialPoliticalError::NoTokens(text.to_string()));
        };

        Ok(FeatureVector {
            jaccard_sim,
            levenshtein_dist,
            char_count: text.chars().count(),
        })
    }

    /// Classify a name: `true` when it reads as social-political.
    pub fn predict(&self, text: &str) -> Result<bool, SocialPoliticalError> {
        let features = self.features(text)?;
        self.classifier.predict(&features.as_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social_political::model::TreeNode;

    fn model() -> SocialPoliticalModel {
        let tree = ModelArtifact::Tree {
            nodes: vec![
                TreeNode::Split {
                    feature: 1,
                    threshold: 1.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { label: true },
                TreeNode::Leaf { label: false },
            ],
        };
        let lexicon = Lexicon::from_words(["Partai", "Rakyat", "Politik"]).unwrap();
        SocialPoliticalModel::new(Box::new(tree), lexicon)
    }

    #[test]
    fn test_features_exact_token_match() {
        let features = model().features("@Partai_Kita").unwrap();
        assert_eq!(features.jaccard_sim, 0.0);
        assert_eq!(features.levenshtein_dist, 0);
        assert_eq!(features.char_count, 12);
    }

    #[test]
    fn test_char_count_uses_characters_not_bytes() {
        let features = model().features("Rakyat 🇮🇩").unwrap();
        assert_eq!(features.char_count, 9);
    }

    #[test]
    fn test_predict_uses_classifier() {
        let model = model();
        assert!(model.predict("RakyatBersatu").unwrap());
        assert!(!model.predict("kucing_lucu").unwrap());
    }

    #[test]
    fn test_empty_name_is_an_error() {
        assert_eq!(
            model().features("___"),
            Err(SocialPoliticalError::NoTokens("___".to_string()))
        );
    }
}
