//! Sort policy: derives a column's display order from the catalog.
//!
//! Orders are lists of catalog insertion positions. Both modes use a stable
//! sort over members taken in insertion order, so ties always fall back to
//! ingestion order and re-sorting never shuffles untouched articles.
use std::cmp::Ordering;

use super::catalog::Catalog;
use super::types::{Article, SortMode, Status};

/// Compare two articles under `mode`. Ties compare `Equal`.
pub fn compare(mode: SortMode, a: &Article, b: &Article) -> Ordering {
    match mode {
        SortMode::ByRecency => b.published.cmp(&a.published),
        SortMode::BySource => a.channel.source_url.cmp(&b.channel.source_url),
    }
}

/// Ordered insertion positions of `column` under `mode`.
pub fn order(catalog: &Catalog, column: Status, mode: SortMode) -> Vec<usize> {
    let mut positions = catalog.positions_in(column);
    // slice::sort_by is stable; positions start in insertion order.
    positions.sort_by(|&a, &b| compare(mode, catalog.at(a), catalog.at(b)));
    positions
}
