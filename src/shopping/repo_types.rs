#[derive(Debug, Clone, Default, PartialEq)]
pub struct Genre {
    pub name: String,
    /// `<key><modifiers>`, e.g. `oats!()`
    pub items: Vec<String>,
}

/// Genres in document order; a genre's id is its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingList {
    pub genres: Vec<Genre>,
}
