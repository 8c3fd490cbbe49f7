// Unit tests for buzzer feature extraction.
//
// Exercises BuzzerFeatures::extract against hand-built timeline records:
// the unavailable-account null row, zero-tweet ratios, name and bio
// resolution, media counting, the optional cleaning pass, and the batch
// driver writing one file per batch.

use buzzer::features::clean::TextCleaner;
use buzzer::features::extractor::BuzzerFeatures;
use buzzer::features::profile::{ProfileDirectory, ProfileEntry};
use buzzer::features::record::FeatureRecord;
use buzzer::features::timeline::TimelineRecord;
use buzzer::social_political::lexicon::Lexicon;
use buzzer::social_political::model::{ModelArtifact, TreeNode};
use buzzer::social_political::SocialPoliticalModel;
use serde_json::json;

/// Labels a name social-political when some token is within one edit of a
/// lexicon word.
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
    let lexicon = Lexicon::from_words(["partai", "rakyat", "politik"]).unwrap();
    SocialPoliticalModel::new(Box::new(tree), lexicon)
}

fn profiles() -> ProfileDirectory {
    ProfileDirectory::from_entries(vec![ProfileEntry {
        screen_name: "relawan_rakyat".to_string(),
        name: Some("Relawan Rakyat".to_string()),
        description: Some("Suara rakyat untuk negeri".to_string()),
    }])
}

fn record(value: serde_json::Value) -> TimelineRecord {
    serde_json::from_value(value).unwrap()
}

// ============================================================
// Unavailable accounts
// ============================================================

#[test]
fn suspended_account_gives_all_null_row() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);

    let row = extractor.extract(
        "relawan_rakyat",
        &record(json!({"error_code": "401 : account_suspended_or_locked", "tweets": [{"full_text": "x"}]})),
    );
    assert_eq!(row, FeatureRecord::unavailable());

    let value = serde_json::to_value(&row).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 15);
    assert!(object.values().all(serde_json::Value::is_null));
}

#[test]
fn not_found_account_gives_null_row() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract(
        "hilang",
        &record(json!({"error_code": "404 : account_not_found"})),
    );
    assert!(row.username.is_none());
}

#[test]
fn zero_status_count_gives_null_row() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract("sepi", &record(json!({"status_count": 0})));
    assert_eq!(row, FeatureRecord::unavailable());
}

#[test]
fn other_error_codes_are_not_unavailable() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract("lambat", &record(json!({"error_code": "500 : server_error"})));
    assert_eq!(row.username.as_deref(), Some("lambat"));
}

// ============================================================
// Counting features
// ============================================================

#[test]
fn zero_tweets_gives_zero_ratios() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract("relawan_rakyat", &record(json!({"status_count": 12})));

    assert_eq!(row.n_tweet, Some(0));
    assert_eq!(row.n_tweet_use_hashtag, Some(0));
    assert_eq!(row.ratio_tweets_use_hashtag, Some(0.0));
    assert_eq!(row.ratio_tweets_use_mention, Some(0.0));
    assert_eq!(row.hashtag, Some(Vec::new()));
    // No media anywhere leaves the media fields null.
    assert!(row.n_photo.is_none());
    assert!(row.n_video.is_none());
    assert!(row.content_url.is_none());
}

#[test]
fn hashtag_and_mention_usage() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract(
        "relawan_rakyat",
        &record(json!({
            "tweets": [
                {"full_text": "Ayo #Pemilu2024 #Coblos"},
                {"full_text": "Halo @kawan"},
                {"full_text": "biasa saja"},
                {"full_text": "#Pemilu2024 bareng @kawan"}
            ]
        })),
    );

    assert_eq!(row.n_tweet, Some(4));
    assert_eq!(
        row.hashtag,
        Some(vec![
            "#Pemilu2024".to_string(),
            "#Coblos".to_string(),
            "#Pemilu2024".to_string()
        ])
    );
    assert_eq!(row.n_tweet_use_hashtag, Some(2));
    assert_eq!(row.ratio_tweets_use_hashtag, Some(0.5));
    assert_eq!(row.n_tweet_use_mention, Some(2));
    assert_eq!(row.ratio_tweets_use_mention, Some(0.5));
}

#[test]
fn non_ascii_hashtags_and_emails() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract(
        "relawan_rakyat",
        &record(json!({
            "tweets": [
                {"full_text": "dukung #日本"},
                {"full_text": "kirim ke budi@mail.com"}
            ]
        })),
    );
    assert_eq!(row.hashtag, Some(vec!["#日本".to_string()]));
    assert_eq!(row.n_tweet_use_hashtag, Some(1));
    assert_eq!(row.n_tweet_use_mention, Some(0));
}

#[test]
fn quoted_tweets_are_separated() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract(
        "relawan_rakyat",
        &record(json!({
            "tweets": [
                {"full_text": "setuju", "quoted_status": {"full_text": "pendapat asli"}},
                {"full_text": "tanpa kutipan"}
            ]
        })),
    );
    assert_eq!(row.tweets.as_ref().map(Vec::len), Some(2));
    assert_eq!(row.quoted_tweets, Some(vec!["pendapat asli".to_string()]));
}

#[test]
fn media_counts_and_urls() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract(
        "relawan_rakyat",
        &record(json!({
            "tweets": [
                {"full_text": "foto", "extended_entities": {"media": [{"type": "photo"}]}},
                {"full_text": "video", "extended_entities": {"media": [{"type": "video"}]}},
                {"full_text": "tautan", "entities": {"urls": [{"expanded_url": "https://berita.example/a"}]}}
            ]
        })),
    );
    assert_eq!(row.n_photo, Some(1));
    assert_eq!(row.n_video, Some(1));
    assert_eq!(
        row.content_url,
        Some(vec!["https://berita.example/a".to_string()])
    );
}

// ============================================================
// Name and bio resolution
// ============================================================

#[test]
fn name_and_bio_come_from_profile_directory() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract(
        "relawan_rakyat",
        &record(json!({"tweets": [{"full_text": "x", "user": {"name": "Nama Lain"}}]})),
    );
    assert_eq!(row.name.as_deref(), Some("Relawan Rakyat"));
    assert_eq!(row.desc.as_deref(), Some("Suara rakyat untuk negeri"));
    assert_eq!(row.is_name_social_political, Some(1));
}

#[test]
fn name_falls_back_to_tweet_then_retweet_author() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);

    let from_tweet = extractor.extract(
        "asing",
        &record(json!({"tweets": [{"full_text": "x", "user": {"name": "Budi Santoso"}}]})),
    );
    assert_eq!(from_tweet.name.as_deref(), Some("Budi Santoso"));
    assert_eq!(from_tweet.is_name_social_political, Some(0));

    let from_retweet = extractor.extract(
        "asing",
        &record(json!({"retweets": [{"full_text": "RT", "user": {"name": "Sari"}}]})),
    );
    assert_eq!(from_retweet.name.as_deref(), Some("Sari"));
}

#[test]
fn unresolvable_name_leaves_label_null() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract("asing", &record(json!({"tweets": [{"full_text": "x"}]})));
    assert!(row.name.is_none());
    assert!(row.is_name_social_political.is_none());
    assert_eq!(row.desc.as_deref(), Some(""));
}

#[test]
fn tokenless_name_leaves_label_null() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract(
        "asing",
        &record(json!({"tweets": [{"full_text": "x", "user": {"name": "___"}}]})),
    );
    assert_eq!(row.name.as_deref(), Some("___"));
    assert!(row.is_name_social_political.is_none());
}

#[test]
fn at_prefixed_username_reads_bio_from_record() {
    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract(
        "@relawan_rakyat",
        &record(json!({"description": "bio dari berkas", "tweets": [{"full_text": "x"}]})),
    );
    assert_eq!(row.desc.as_deref(), Some("bio dari berkas"));
}

// ============================================================
// Cleaning pass
// ============================================================

#[test]
fn cleaning_pass_rewrites_text_fields() {
    let (profiles, model) = (profiles(), model());
    let cleaner = TextCleaner::indonesian();
    let extractor = BuzzerFeatures::new(&profiles, &model).with_cleaner(&cleaner);

    let row = extractor.extract(
        "relawan_rakyat",
        &record(json!({
            "tweets": [
                {"full_text": "Cek https://t.co/abc GAK KORUPSI!!! #Hoaks"},
                {"full_text": "https://t.co/only"}
            ]
        })),
    );

    let tweets = row.tweets.unwrap();
    assert_eq!(tweets.len(), 1);
    assert!(!tweets[0].contains("http"));
    assert!(!tweets[0].contains('!'));
    assert_eq!(tweets[0], tweets[0].to_lowercase());
    assert!(tweets[0].contains("korupsi"));
    // Counts are taken before cleaning.
    assert_eq!(row.n_tweet, Some(2));
    assert_eq!(row.hashtag, Some(vec!["#Hoaks".to_string()]));
}

// ============================================================
// Files and batches
// ============================================================

#[test]
fn extract_file_uses_file_stem_as_username() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relawan_rakyat.json");
    std::fs::write(&path, r#"{"tweets": [{"full_text": "halo"}]}"#).unwrap();

    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let row = extractor.extract_file(&path).unwrap();
    assert_eq!(row.username.as_deref(), Some("relawan_rakyat"));
}

#[test]
fn batch_run_writes_one_file_per_batch_and_skips_bad_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for i in 0..5 {
        std::fs::write(
            input.path().join(format!("user{i}.json")),
            r#"{"tweets": [{"full_text": "halo"}]}"#,
        )
        .unwrap();
    }
    std::fs::write(input.path().join("user5.json"), "not json").unwrap();

    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let files = buzzer::pipeline::batch::list_json_files(input.path()).unwrap();
    assert_eq!(files.len(), 6);

    let reports = buzzer::pipeline::batch::run(&extractor, &files, 4, None, output.path()).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].rows, 4);
    assert_eq!(reports[1].files, 2);
    assert_eq!(reports[1].rows, 1);

    let rows: Vec<FeatureRecord> = buzzer::store::read_json(&reports[1].output).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username.as_deref(), Some("user4"));
}

#[test]
fn batch_run_single_batch_only() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for i in 0..3 {
        std::fs::write(input.path().join(format!("u{i}.json")), "{}").unwrap();
    }

    let (profiles, model) = (profiles(), model());
    let extractor = BuzzerFeatures::new(&profiles, &model);
    let files = buzzer::pipeline::batch::list_json_files(input.path()).unwrap();

    let reports = buzzer::pipeline::batch::run(&extractor, &files, 2, Some(1), output.path()).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].batch, 1);
    assert!(!output.path().join("buzzer_features_batch_0.json").exists());

    assert!(buzzer::pipeline::batch::run(&extractor, &files, 2, Some(2), output.path()).is_err());
}
