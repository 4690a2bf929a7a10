//! On-disk fixture loading.
//!
//! The fixture is a JSON array of wire items (`{x, y, name?}`). Items are
//! validated up front so a bad fixture fails the run before any request is
//! issued.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use shortlist_types::Item;

pub fn load_fixture(path: &Path) -> Result<Vec<Item>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    let items: Vec<Item> = serde_json::from_str(&content)
        .with_context(|| format!("fixture {} is not a JSON array of items", path.display()))?;
    for (index, item) in items.iter().enumerate() {
        item.validate()
            .with_context(|| format!("fixture item {index} is invalid"))?;
    }
    Ok(items)
}
