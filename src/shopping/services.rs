use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::ReportError;
use crate::nutrition::NutritionReference;

use super::ShoppingList;

const DIM_COLOR: &str = "#ccc";
const RATE_COLOR: &str = "gray";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemModifiers {
    /// `!`
    pub important: bool,
    /// `()`
    pub weakly_recommended: bool,
}

impl ItemModifiers {
    pub fn parse(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut modifiers = Self::default();
        let mut i = 0;
        while i < chars.len() {
            match (chars[i], chars.get(i + 1)) {
                ('!', _) => {
                    modifiers.important = true;
                    i += 1;
                }
                ('(', Some(')')) => {
                    modifiers.weakly_recommended = true;
                    i += 2;
                }
                _ => i += 1,
            }
        }
        modifiers
    }
}

/// Splits `rice!()` into its key and modifiers.
pub fn split_item(item: &str) -> Result<(&str, ItemModifiers), ReportError> {
    lazy_static! {
        static ref ITEM_RE: Regex = Regex::new(r"^([\w-]+)(.*)$").unwrap();
    }
    let caps = ITEM_RE
        .captures(item)
        .ok_or_else(|| ReportError::InvalidItem(item.to_string()))?;
    let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    Ok((key, ItemModifiers::parse(rest)))
}

pub fn format_item(reference: &NutritionReference, item: &str) -> Result<String, ReportError> {
    let (key, modifiers) = split_item(item)?;
    let (Some(title), Some(rate)) = (reference.title(key), reference.rate_display(key)) else {
        return Err(ReportError::UnknownItemKey(key.to_string()));
    };

    let mut label = format!(r#"<span class="title">{title}</span>"#);
    let mut rate_color = RATE_COLOR;
    if modifiers.important {
        label = format!("__{label}__");
    }
    if modifiers.weakly_recommended {
        rate_color = DIM_COLOR;
        label = format!(r#"<span style="color:{DIM_COLOR};">{label}</span>"#);
    }
    Ok(format!(
        r#"{label} <span style="color:{rate_color};">{rate}</span>"#
    ))
}

impl ShoppingList {
    /// Markdown lines of the checklist. Stops at the first bad item.
    pub fn lines<'a>(
        &'a self,
        reference: &'a NutritionReference,
    ) -> impl Iterator<Item = Result<String, ReportError>> + 'a {
        std::iter::once(Ok("# かいものリスト".to_string())).chain(
            self.genres
                .iter()
                .enumerate()
                .flat_map(move |(genre_id, genre)| {
                    let heading = [Ok(String::new()), Ok(format!("## {}", genre.name))];
                    heading.into_iter().chain(genre.items.iter().enumerate().map(
                        move |(item_id, item)| {
                            let checkbox = format!(
                                r#"<input type="checkbox" name="chk_{genre_id}_{item_id}"> "#
                            );
                            format_item(reference, item).map(|text| format!("- {checkbox}{text}"))
                        },
                    ))
                }),
        )
        .scan(false, |failed, line| {
            if *failed {
                return None;
            }
            *failed = line.is_err();
            Some(line)
        })
    }
}
