// Colored terminal output for collection and extraction summaries.
//
// main.rs delegates all human-facing result display here; progress and
// diagnostics go through tracing instead.

use colored::Colorize;

use crate::features::record::FeatureRecord;
use crate::features::stats::TimelineStats;
use crate::pipeline::batch::BatchReport;
use crate::pipeline::collect::CollectSummary;
use crate::pipeline::following::FollowingSummary;
use crate::social_political::FeatureVector;

pub fn display_collect_summary(summary: &CollectSummary) {
    println!("\n{}", "Timeline collection complete.".bold());
    println!("  Users processed:  {}", summary.users());
    println!("  Complete:         {}", summary.complete.to_string().green());
    if summary.unavailable > 0 {
        println!(
            "  Unavailable:      {}",
            summary.unavailable.to_string().yellow()
        );
    }
    if summary.abandoned > 0 {
        println!("  Abandoned:        {}", summary.abandoned.to_string().red());
    }
    if summary.write_failed > 0 {
        println!(
            "  Write failures:   {}",
            summary.write_failed.to_string().red().bold()
        );
    }
    println!("  Statuses saved:   {}", summary.tweets);
}

pub fn display_following_summary(summary: &FollowingSummary) {
    println!("\n{}", "Following collection complete.".bold());
    println!("  Users processed:  {}", summary.users);
    println!("  Profiles written: {}", summary.profiles_written);
    if summary.abandoned > 0 {
        println!("  Abandoned:        {}", summary.abandoned.to_string().red());
    }
}

pub fn display_batch_reports(reports: &[BatchReport]) {
    println!(
        "\n{}",
        format!("=== Feature extraction ({} batches) ===", reports.len()).bold()
    );
    for report in reports {
        println!(
            "  Batch {:>3}: {:>5} files -> {:>5} rows ({} unavailable)  {}",
            report.batch,
            report.files,
            report.rows,
            report.unavailable,
            report.output.display().to_string().dimmed()
        );
    }
}

/// Show a few feature rows, mostly for eyeballing a fresh batch.
pub fn display_feature_preview(rows: &[FeatureRecord], limit: usize) {
    for row in rows.iter().take(limit) {
        let Some(username) = &row.username else {
            println!("  {}", "(unavailable account)".dimmed());
            continue;
        };
        let label = match row.is_name_social_political {
            Some(1) => "social-political".red().to_string(),
            Some(_) => "neutral".green().to_string(),
            None => "unknown".dimmed().to_string(),
        };
        println!(
            "  {:<24} {:<32} {:<18} tweets: {:>3}  hashtag ratio: {:.2}",
            username,
            super::truncate_chars(row.name.as_deref().unwrap_or(""), 30),
            label,
            row.n_tweet.unwrap_or(0),
            row.ratio_tweets_use_hashtag.unwrap_or(0.0),
        );
    }
}

pub fn display_stats_summary(stats: &[TimelineStats]) {
    let users = stats.len();
    let tweets: usize = stats.iter().map(|s| s.id_tweet).sum();
    let hashtags: usize = stats.iter().map(|s| s.hashtags).sum();
    let mentions: usize = stats.iter().map(|s| s.user_mentions).sum();

    println!("\n{}", format!("=== Timeline stats ({users} users) ===").bold());
    println!("  Tweets:   {tweets}");
    println!("  Hashtags: {hashtags}");
    println!("  Mentions: {mentions}");
}

pub fn display_classification(text: &str, features: &FeatureVector, label: bool) {
    println!("\n{}", format!("=== {text} ===").bold());
    println!("  Jaccard distance:     {:.3}", features.jaccard_sim);
    println!("  Levenshtein distance: {}", features.levenshtein_dist);
    println!("  Characters:           {}", features.char_count);
    let verdict = if label {
        "social-political".red().bold()
    } else {
        "not social-political".green()
    };
    println!("  Label:                {verdict}");
}
