//! BasketForge: association-rule recommendations over purchase baskets
//!
//! This is the main entrypoint that orchestrates loading, mining, ranking
//! and presenting recommendations.

use anyhow::{Context, Result};
use basketforge::{
    load_baskets_with_layout, mine_with_fallback, recommend, report, rules_with_fallback, Apriori,
    Args, Rule, TransactionMatrix,
};
use clap::Parser;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        println!("BasketForge - Purchase Recommendations from Association Rules");
        println!("=============================================================\n");
    }

    run_pipeline(&args)
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked by `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load, mine, rank and optionally answer a query
fn run_pipeline(args: &Args) -> Result<()> {
    let start_time = Instant::now();
    let config = args.mining_config().context("invalid mining thresholds")?;

    // Step 1: Load baskets
    if args.verbose {
        println!("Step 1: Loading baskets");
        println!("  Input file: {}", args.input.display());
    }
    let baskets = load_baskets_with_layout(&args.input, args.format, &args.csv_layout())?;
    let matrix = TransactionMatrix::from_baskets(&baskets);
    report::print_dataset_summary(&matrix);

    // Step 2: Mine frequent itemsets
    if args.verbose {
        println!("\nStep 2: Mining frequent itemsets");
        println!("  Support ladder: {:?}", config.support_ladder);
        println!("  Max itemset size: {:?}", config.max_len);
    }
    let mine_start = Instant::now();
    let miner = Apriori::new().with_max_len(config.max_len);
    let (min_support, itemsets) =
        mine_with_fallback(&miner, &baskets, &matrix, &config.support_ladder)?;
    println!(
        "✓ Found {} frequent itemsets (min support: {})",
        itemsets.len(),
        min_support
    );
    if args.verbose {
        println!("  Mining time: {:.2}s", mine_start.elapsed().as_secs_f64());
    }

    // Step 3: Derive and rank rules
    if args.verbose {
        println!("\nStep 3: Generating association rules");
        println!("  Confidence ladder: {:?}", config.confidence_ladder);
        println!("  Min lift: {}", config.min_lift);
    }
    let (thresholds, rules) = rules_with_fallback(
        &itemsets,
        min_support,
        &config.confidence_ladder,
        config.min_lift,
    )?;
    println!(
        "✓ Generated {} association rules (min confidence: {})",
        rules.len(),
        thresholds.min_confidence
    );
    report::print_top_rules(&rules, args.show_rules);

    if let Some(path) = &args.export {
        report::write_rules_csv(&rules, path)?;
        println!("\nRules saved to: {}", path.display());
    }

    // Step 4: Recommend
    match args.parse_query() {
        Some(query) if query.is_empty() => println!("\nPlease enter at least one item."),
        Some(query) => answer_query(&matrix, &rules, &query, args),
        None => {}
    }

    if args.verbose {
        println!("\n=== Pipeline Complete ===");
        println!(
            "Total processing time: {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Recommend items for a parsed, non-empty query basket
fn answer_query(
    matrix: &TransactionMatrix,
    rules: &[Rule],
    query: &BTreeSet<String>,
    args: &Args,
) {
    let known: BTreeSet<String> = query
        .iter()
        .filter(|item| matrix.contains_item(item))
        .cloned()
        .collect();
    let unknown: Vec<&str> = query
        .iter()
        .filter(|item| !known.contains(*item))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        println!("\nNote: Items not found in dataset: {}", unknown.join(", "));
    }
    if known.is_empty() {
        println!(
            "Available items include: {}",
            report::available_items_hint(matrix, 10)
        );
    }

    let recommendations = recommend(rules, &known, args.top, args.score);
    report::print_recommendations(query, &recommendations, args.score);
}
