// Unit tests for the social-political name classifier.
//
// Covers tokenization of screen names, loading the model artifact and the
// lexicon from disk, and end-to-end predictions through both artifact kinds.

use std::path::Path;

use buzzer::social_political::model::ModelArtifact;
use buzzer::social_political::tokenizer::tokenize;
use buzzer::social_political::{SocialPoliticalError, SocialPoliticalModel};

const LEXICON_CSV: &str = "id,social political,source\n\
                           1,partai,kbbi\n\
                           2,rakyat,kbbi\n\
                           3,,kbbi\n\
                           4,presiden,kbbi\n";

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================
// tokenize
// ============================================================

#[test]
fn tokenize_camel_case_screen_name() {
    assert_eq!(tokenize("PartaiRakyat"), vec!["Partai", "Rakyat"]);
}

#[test]
fn tokenize_caps_run_splits_from_word() {
    assert_eq!(tokenize("DPRKita"), vec!["DPR", "Kita"]);
}

#[test]
fn tokenize_only_separators_is_empty() {
    assert!(tokenize("___").is_empty());
    assert!(tokenize("").is_empty());
}

#[test]
fn tokenize_plain_lowercase_is_one_token() {
    assert_eq!(tokenize("relawan"), vec!["relawan"]);
}

// ============================================================
// Loading
// ============================================================

#[test]
fn load_logistic_model_and_lexicon() {
    let dir = tempfile::tempdir().unwrap();
    // Positive when levenshtein_dist < 2.
    let model_path = write(
        dir.path(),
        "clf.json",
        r#"{"kind": "logistic", "coefficients": [0.0, -1.0, 0.0], "intercept": 1.5}"#,
    );
    let lexicon_path = write(dir.path(), "SPWD.csv", LEXICON_CSV);

    let model = SocialPoliticalModel::load(&model_path, &lexicon_path).unwrap();
    assert_eq!(model.lexicon().words(), ["partai", "rakyat", "presiden"]);

    assert!(model.predict("partai_kita").unwrap());
    assert!(model.predict("Presiden").unwrap());
    assert!(!model.predict("BudiSantoso").unwrap());
}

#[test]
fn load_tree_model() {
    let dir = tempfile::tempdir().unwrap();
    // Positive when jaccard_sim <= 0.2.
    let model_path = write(
        dir.path(),
        "clf.json",
        r#"{"kind": "tree", "nodes": [
            {"node": "split", "feature": 0, "threshold": 0.2, "left": 1, "right": 2},
            {"node": "leaf", "label": true},
            {"node": "leaf", "label": false}
        ]}"#,
    );
    let lexicon_path = write(dir.path(), "SPWD.csv", LEXICON_CSV);

    let model = SocialPoliticalModel::load(&model_path, &lexicon_path).unwrap();
    assert!(model.predict("rakyat").unwrap());
    assert!(!model.predict("zzz").unwrap());
}

#[test]
fn tree_with_backward_child_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write(
        dir.path(),
        "clf.json",
        r#"{"kind": "tree", "nodes": [
            {"node": "split", "feature": 0, "threshold": 0.5, "left": 0, "right": 1},
            {"node": "leaf", "label": true}
        ]}"#,
    );
    assert!(ModelArtifact::load(&model_path).is_err());
}

#[test]
fn unknown_model_kind_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write(dir.path(), "clf.json", r#"{"kind": "svm"}"#);
    assert!(ModelArtifact::load(&model_path).is_err());
}

#[test]
fn lexicon_without_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write(
        dir.path(),
        "clf.json",
        r#"{"kind": "logistic", "coefficients": [0.0, 0.0, 0.0], "intercept": 1.0}"#,
    );
    let lexicon_path = write(dir.path(), "SPWD.csv", "id,word\n1,partai\n");
    let err = SocialPoliticalModel::load(&model_path, &lexicon_path).unwrap_err();
    assert!(err.to_string().contains("social political"));
}

// ============================================================
// Features
// ============================================================

#[test]
fn features_of_exact_match() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write(
        dir.path(),
        "clf.json",
        r#"{"kind": "logistic", "coefficients": [0.0, 0.0, 0.0], "intercept": -1.0}"#,
    );
    let lexicon_path = write(dir.path(), "SPWD.csv", LEXICON_CSV);
    let model = SocialPoliticalModel::load(&model_path, &lexicon_path).unwrap();

    let features = model.features("@rakyat").unwrap();
    assert_eq!(features.jaccard_sim, 0.0);
    assert_eq!(features.levenshtein_dist, 0);
    // Counted on the raw text, `@` included.
    assert_eq!(features.char_count, 7);
    assert!(!model.predict("@rakyat").unwrap());
}

#[test]
fn tokenless_text_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write(
        dir.path(),
        "clf.json",
        r#"{"kind": "logistic", "coefficients": [0.0, 0.0, 0.0], "intercept": 1.0}"#,
    );
    let lexicon_path = write(dir.path(), "SPWD.csv", LEXICON_CSV);
    let model = SocialPoliticalModel::load(&model_path, &lexicon_path).unwrap();

    assert_eq!(
        model.predict("__"),
        Err(SocialPoliticalError::NoTokens("__".to_string()))
    );
}

#[test]
fn unvalidated_empty_tree_reports_error() {
    let tree: ModelArtifact = serde_json::from_str(r#"{"kind": "tree", "nodes": []}"#).unwrap();
    let lexicon = buzzer::social_political::lexicon::Lexicon::from_words(["partai"]).unwrap();
    let model = SocialPoliticalModel::new(Box::new(tree), lexicon);

    assert!(matches!(
        model.predict("partai"),
        Err(SocialPoliticalError::MalformedModel(_))
    ));
}
