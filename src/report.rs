//! Console output and CSV export of rules and recommendations

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use tracing::info;

use crate::data::TransactionMatrix;
use crate::error::Error;
use crate::recommend::{Recommendation, ScoreMode};
use crate::rules::{join_items, Rule};

/// One-line description of a rule
pub fn format_rule(rule: &Rule) -> String {
    format!(
        "{} → {} (confidence: {:.2}%, lift: {:.2})",
        join_items(&rule.antecedent),
        join_items(&rule.consequent),
        rule.confidence * 100.0,
        rule.lift
    )
}

/// Print basket and item counts of the loaded dataset
pub fn print_dataset_summary(matrix: &TransactionMatrix) {
    println!(
        "✓ Dataset loaded: {} baskets, {} unique items",
        matrix.n_transactions(),
        matrix.n_items()
    );
}

/// The `top` most confident rules; equal confidence keeps ranked order
pub fn top_rules_by_confidence(rules: &[Rule], top: usize) -> Vec<&Rule> {
    let mut by_confidence: Vec<&Rule> = rules.iter().collect();
    by_confidence.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    by_confidence.truncate(top);
    by_confidence
}

/// Print the `top` most confident rules
pub fn print_top_rules(rules: &[Rule], top: usize) {
    if rules.is_empty() {
        println!("No association rules generated. Please check your dataset.");
        return;
    }

    let shown = top_rules_by_confidence(rules, top);
    println!(
        "\n=== Top {} Association Rules (by confidence) ===",
        shown.len()
    );
    for rule in shown {
        println!("  {}", format_rule(rule));
    }
}

/// Comma-separated list of the first `limit` items of the dataset
pub fn available_items_hint(matrix: &TransactionMatrix, limit: usize) -> String {
    let mut hint = matrix
        .items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if matrix.n_items() > limit {
        hint.push_str(", ...");
    }
    hint
}

/// Print recommendations for a query basket
pub fn print_recommendations(
    query: &BTreeSet<String>,
    recommendations: &[Recommendation],
    mode: ScoreMode,
) {
    println!("\n=== Recommendations for {} ===", join_items(query));
    let Some(best) = recommendations.first() else {
        println!("No recommendation available for the given item set.");
        return;
    };

    println!("Maybe you would also like to purchase {}", best.item);
    let label = match mode {
        ScoreMode::Confidence => "confidence",
        ScoreMode::Lift => "lift",
    };
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "  {}. {} ({}: {:.4}, support: {:.4})",
            rank + 1,
            rec.item,
            label,
            rec.score,
            rec.support
        );
    }
}

/// Write all rules, in ranked order, to a CSV file
pub fn write_rules_csv(rules: &[Rule], output_path: &Path) -> crate::Result<()> {
    let column = |name: &str, metric: fn(&Rule) -> f64| {
        Series::new(name, rules.iter().map(metric).collect::<Vec<f64>>())
    };
    let items = |name: &str, side: fn(&Rule) -> &BTreeSet<String>| {
        Series::new(name, rules.iter().map(|r| join_items(side(r))).collect::<Vec<_>>())
    };

    let mut table = DataFrame::new(vec![
        items("antecedents", |r| &r.antecedent),
        items("consequents", |r| &r.consequent),
        column("antecedent_support", |r| r.antecedent_support),
        column("consequent_support", |r| r.consequent_support),
        column("support", |r| r.support),
        column("confidence", |r| r.confidence),
        column("lift", |r| r.lift),
        column("leverage", |r| r.leverage),
        column("conviction", |r| r.conviction),
    ])
    .map_err(|e| Error::export(output_path, e))?;

    let mut file = File::create(output_path).map_err(|e| Error::export(output_path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut table)
        .map_err(|e| Error::export(output_path, e))?;

    info!(rules = rules.len(), path = %output_path.display(), "exported rules");
    Ok(())
}
