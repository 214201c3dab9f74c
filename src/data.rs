//! Basket loading and one-hot transaction encoding using Polars

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use ndarray::Array2;
use polars::prelude::{col, LazyCsvReader, LazyFileListReader};
use tracing::{debug, info, warn};

use crate::error::Error;

/// One transaction's set of purchased items.
pub type Basket = BTreeSet<String>;

/// Layout of the transaction file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputFormat {
    /// One row per purchased item, grouped into baskets by member and date
    #[default]
    Grouped,
    /// One basket per line, items separated by commas
    Lines,
}

/// Column names of the grouped CSV layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvLayout {
    pub member_column: String,
    pub date_column: String,
    pub item_column: String,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            member_column: "Member_number".to_string(),
            date_column: "Date".to_string(),
            item_column: "itemDescription".to_string(),
        }
    }
}

/// One-hot encoded baskets: rows are baskets, columns are distinct items
#[derive(Debug, Clone)]
pub struct TransactionMatrix {
    /// Item names in lexical order, one per column
    pub items: Vec<String>,
    /// `presence[[row, col]]` is true when basket `row` contains item `col`
    pub presence: Array2<bool>,
}

impl TransactionMatrix {
    /// Encode baskets into a boolean matrix
    pub fn from_baskets(baskets: &[Basket]) -> Self {
        let items: Vec<String> = baskets
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut presence = Array2::from_elem((baskets.len(), items.len()), false);
        for (row, basket) in baskets.iter().enumerate() {
            for item in basket {
                if let Ok(col) = items.binary_search(item) {
                    presence[[row, col]] = true;
                }
            }
        }

        Self { items, presence }
    }

    pub fn n_transactions(&self) -> usize {
        self.presence.nrows()
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// Column of an item, if any basket contains it
    pub fn column_index(&self, item: &str) -> Option<usize> {
        self.items
            .binary_search_by(|known| known.as_str().cmp(item))
            .ok()
    }

    pub fn contains_item(&self, item: &str) -> bool {
        self.column_index(item).is_some()
    }

    /// Number of baskets containing every column in `columns`
    pub fn count(&self, columns: &[usize]) -> usize {
        self.presence
            .outer_iter()
            .filter(|row| columns.iter().all(|&col| row[col]))
            .count()
    }
}

/// Trim and lowercase an item name, dropping blanks
pub fn normalize_item(raw: &str) -> Option<String> {
    let item = raw.trim().to_lowercase();
    (!item.is_empty()).then_some(item)
}

/// Load baskets from a transaction file with the default Groceries columns
pub fn load_baskets(path: &Path, format: InputFormat) -> crate::Result<Vec<Basket>> {
    load_baskets_with_layout(path, format, &CsvLayout::default())
}

/// Load baskets from a transaction file
///
/// # Arguments
/// * `path` - Path to the transaction file
/// * `format` - Grouped CSV or one basket per line
/// * `layout` - Column names used by the grouped format
///
/// # Returns
/// * Non-empty list of non-empty baskets
pub fn load_baskets_with_layout(
    path: &Path,
    format: InputFormat,
    layout: &CsvLayout,
) -> crate::Result<Vec<Basket>> {
    if !path.exists() {
        return Err(Error::input_load(path, "file not found"));
    }

    let baskets = match format {
        InputFormat::Grouped => load_grouped_csv(path, layout)?,
        InputFormat::Lines => load_basket_lines(path)?,
    };

    if baskets.is_empty() {
        return Err(Error::input_load(path, "no baskets found"));
    }

    info!(baskets = baskets.len(), path = %path.display(), "loaded transactions");
    Ok(baskets)
}

/// Load the grouped layout: items of one member on one date form a basket
pub fn load_grouped_csv(path: &Path, layout: &CsvLayout) -> crate::Result<Vec<Basket>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .and_then(|lf| {
            lf.filter(col(layout.item_column.as_str()).is_not_null())
                .group_by_stable([
                    col(layout.member_column.as_str()),
                    col(layout.date_column.as_str()),
                ])
                .agg([col(layout.item_column.as_str()).alias("items")])
                .collect()
        })
        .map_err(|e| Error::input_load(path, e))?;

    debug!(groups = df.height(), "grouped rows into baskets");

    let groups = df
        .column("items")
        .and_then(|s| s.list())
        .map_err(|e| Error::input_load(path, e))?;

    let mut baskets = Vec::with_capacity(groups.len());
    for (idx, group) in groups.into_iter().enumerate() {
        let Some(series) = group else {
            continue;
        };
        let names = series
            .str()
            .map_err(|e| Error::input_load(path, format!("item column is not text: {e}")))?;
        let basket: Basket = names.into_iter().flatten().filter_map(normalize_item).collect();

        if basket.is_empty() {
            warn!(group = idx, "skipping basket with no usable items");
            continue;
        }
        baskets.push(basket);
    }

    Ok(baskets)
}

/// Load one basket per line; blank lines are ignored
pub fn load_basket_lines(path: &Path) -> crate::Result<Vec<Basket>> {
    let content = fs::read_to_string(path).map_err(|e| Error::input_load(path, e))?;
    parse_basket_lines(&content).map_err(|reason| Error::input_load(path, reason))
}

fn parse_basket_lines(content: &str) -> Result<Vec<Basket>, String> {
    let mut baskets = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let basket: Basket = line.split(',').filter_map(normalize_item).collect();
        if basket.is_empty() {
            return Err(format!("empty basket on line {}", line_no + 1));
        }
        baskets.push(basket);
    }
    Ok(baskets)
}
