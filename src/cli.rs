//! Command-line interface definitions and argument parsing

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::config::MiningConfig;
use crate::data::{normalize_item, CsvLayout, InputFormat};
use crate::recommend::ScoreMode;

/// Largest query basket considered; further items are dropped
pub const MAX_QUERY_ITEMS: usize = 3;

/// Purchase recommendations from association rules mined over grocery baskets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the transaction file
    #[arg(short, long, default_value = "Groceries_dataset.csv")]
    pub input: PathBuf,

    /// Layout of the transaction file
    #[arg(long, value_enum, default_value_t = InputFormat::Grouped)]
    pub format: InputFormat,

    /// Column holding the customer id (grouped format)
    #[arg(long, default_value = "Member_number")]
    pub member_column: String,

    /// Column holding the purchase date (grouped format)
    #[arg(long, default_value = "Date")]
    pub date_column: String,

    /// Column holding the item name (grouped format)
    #[arg(long, default_value = "itemDescription")]
    pub item_column: String,

    /// Minimum itemset support; falls back 0.005 -> 0.002 -> 0.001 when omitted
    #[arg(long)]
    pub min_support: Option<f64>,

    /// Minimum rule confidence; falls back 0.01 -> 0.005 -> 0.001 when omitted
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Minimum rule lift (0 disables the filter)
    #[arg(long, default_value = "0")]
    pub min_lift: f64,

    /// Largest itemset size to mine
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Items already in the basket, comma-separated (at most 3)
    /// Example: --query "whole milk, rolls/buns"
    #[arg(short, long)]
    pub query: Option<String>,

    /// Number of items to recommend
    #[arg(short = 'n', long, default_value = "5")]
    pub top: usize,

    /// Metric used to score recommended items
    #[arg(long, value_enum, default_value_t = ScoreMode::Confidence)]
    pub score: ScoreMode,

    /// Number of top-ranked rules to print
    #[arg(long, default_value = "5")]
    pub show_rules: usize,

    /// Write the full ranked rule table to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build and validate the mining thresholds
    pub fn mining_config(&self) -> crate::Result<MiningConfig> {
        let mut config = MiningConfig::default()
            .with_min_lift(self.min_lift)
            .with_max_len(self.max_len);
        if let Some(min_support) = self.min_support {
            config = config.with_min_support(min_support);
        }
        if let Some(min_confidence) = self.min_confidence {
            config = config.with_min_confidence(min_confidence);
        }
        config.validate()?;
        Ok(config)
    }

    /// Column names used to group the grouped CSV format into baskets
    pub fn csv_layout(&self) -> CsvLayout {
        CsvLayout {
            member_column: self.member_column.clone(),
            date_column: self.date_column.clone(),
            item_column: self.item_column.clone(),
        }
    }

    /// Parse the query basket from the comma-separated query string
    pub fn parse_query(&self) -> Option<BTreeSet<String>> {
        self.query.as_deref().map(parse_query_items)
    }
}

/// Split, trim and lowercase query items, keeping at most `MAX_QUERY_ITEMS`
pub fn parse_query_items(input: &str) -> BTreeSet<String> {
    let mut items: Vec<String> = Vec::new();
    for item in input.split(',').filter_map(normalize_item) {
        if !items.contains(&item) {
            items.push(item);
        }
    }

    if items.len() > MAX_QUERY_ITEMS {
        warn!(
            kept = ?&items[..MAX_QUERY_ITEMS],
            "only the first {MAX_QUERY_ITEMS} query items are considered"
        );
        items.truncate(MAX_QUERY_ITEMS);
    }
    items.into_iter().collect()
}
