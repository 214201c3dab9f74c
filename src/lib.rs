//! BasketForge: purchase recommendations from association rules
//!
//! This library loads grocery transactions into baskets, mines frequent
//! itemsets, derives ranked association rules from them, and recommends items
//! that co-occur with a query basket.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod miner;
pub mod recommend;
pub mod report;
pub mod rules;

// Re-export public items for easier access
pub use cli::Args;
pub use config::MiningConfig;
pub use data::{load_baskets, load_baskets_with_layout, Basket, CsvLayout, InputFormat, TransactionMatrix};
pub use error::Error;
pub use miner::{mine_with_fallback, Apriori, Itemset, ItemsetMiner};
pub use recommend::{recommend, Recommendation, ScoreMode};
pub use rules::{generate_rules, rules_with_fallback, Rule, RuleThresholds};

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
