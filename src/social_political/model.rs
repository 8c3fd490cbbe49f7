// Persisted classifier artifacts for the social-political label.
//
// The model is trained offline on three features (jaccard_sim,
// levenshtein_dist, char_count) and exported as JSON. Two shapes are
// supported: a logistic regression and a flattened binary decision tree.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::SocialPoliticalError;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 3;

/// Anything that can turn a feature vector into a binary label.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<bool, SocialPoliticalError>;
}

/// A node of a flattened decision tree. The root is node 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum TreeNode {
    /// Go `left` when `features[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelArtifact {
    /// Positive when `intercept + coefficients · x > 0`
    Logistic {
        coefficients: [f64; FEATURE_COUNT],
        intercept: f64,
    },
    Tree {
        nodes: Vec<TreeNode>,
    },
}

impl ModelArtifact {
    /// Load and validate an artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model {}", path.display()))?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model {}", path.display()))?;
        artifact.validate()?;

        info!(kind = artifact.kind_name(), "Loaded social-political classifier");
        Ok(artifact)
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ModelArtifact::Logistic { .. } => "logistic",
            ModelArtifact::Tree { .. } => "tree",
        }
    }

    /// Check that a tree is walkable: non-empty, feature indices in range,
    /// and every child placed after its parent so a walk always terminates.
    pub fn validate(&self) -> Result<()> {
        let ModelArtifact::Tree { nodes } = self else {
            return Ok(());
        };
        if nodes.is_empty() {
            anyhow::bail!("Decision tree has no nodes");
        }
        for (index, node) in nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= FEATURE_COUNT {
                    anyhow::bail!("Tree node {index} splits on unknown feature {feature}");
                }
                for child in [left, right] {
                    if child <= index || child >= nodes.len() {
                        anyhow::bail!("Tree node {index} has invalid child {child}");
                    }
                }
            }
        }
        Ok(())
    }
}

impl Classifier for ModelArtifact {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<bool, SocialPoliticalError> {
        match self {
            ModelArtifact::Logistic {
                coefficients,
                intercept,
            } => {
                let z: f64 = intercept
                    + coefficients
                        .iter()
                        .zip(features)
                        .map(|(w, x)| w * x)
                        .sum::<f64>();
                Ok(z > 0.0)
            }
            ModelArtifact::Tree { nodes } => walk_tree(nodes, features),
        }
    }
}

/// Walk a tree from the root. Trees built in memory skip `validate`, so a
/// missing node, an unknown feature, or a walk longer than the tree (a
/// cycle) is an error.
fn walk_tree(
    nodes: &[TreeNode],
    features: &[f64; FEATURE_COUNT],
) -> Result<bool, SocialPoliticalError> {
    let malformed = SocialPoliticalError::MalformedModel;
    let mut index = 0;

    for _ in 0..nodes.len() {
        match nodes.get(index) {
            Some(TreeNode::Leaf { label }) => return Ok(*label),
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let value = features.get(*feature).ok_or_else(|| {
                    malformed(format!("node {index} splits on unknown feature {feature}"))
                })?;
                index = if value <= threshold { *left } else { *right };
            }
            None => return Err(malformed(format!("node {index} does not exist"))),
        }
    }

    Err(malformed(format!(
        "no leaf reached within {} steps",
        nodes.len()
    )))
}
