use std::path::Path;

use anyhow::Context;
use serde_yaml::Value;
use tracing::info;

use crate::errors::ReportError;
use crate::format::scalar_text;

use super::repo_types::{Genre, ShoppingList};

pub fn load_shopping_list(path: &Path) -> anyhow::Result<ShoppingList> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read shopping list {}", path.display()))?;
    let list = parse_shopping_list(&text)
        .with_context(|| format!("parse shopping list {}", path.display()))?;
    info!(path = %path.display(), genres = list.genres.len(), "shopping list loaded");
    Ok(list)
}

/// `genre: [item, ...]` mapping, genres kept in document order.
pub fn parse_shopping_list(text: &str) -> Result<ShoppingList, ReportError> {
    if text.trim().is_empty() {
        return Ok(ShoppingList::default());
    }
    let doc = match serde_yaml::from_str::<Value>(text)? {
        Value::Null => return Ok(ShoppingList::default()),
        Value::Mapping(doc) => doc,
        other => return Err(ReportError::Shape(format!("shopping list root {other:?}"))),
    };

    let mut genres = Vec::with_capacity(doc.len());
    for (name, items) in doc {
        let name = scalar_text(&name)
            .ok_or_else(|| ReportError::Shape(format!("genre name {name:?}")))?;
        let items = match items {
            Value::Null => Vec::new(),
            Value::Sequence(items) => items
                .iter()
                .map(|item| scalar_text(item).ok_or_else(|| ReportError::InvalidItem(format!("{item:?}"))))
                .collect::<Result<Vec<_>, _>>()?,
            other => return Err(ReportError::Shape(format!("items of {name}: {other:?}"))),
        };
        genres.push(Genre { name, items });
    }
    Ok(ShoppingList { genres })
}
