use crate::domain::model::{format_amount, Recipe, RecipeBook};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

pub fn search_by_name<'a>(book: &'a RecipeBook, query: &str) -> Vec<&'a Recipe> {
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();
    book.iter()
        .filter(|r| r.name().to_lowercase().contains(&query))
        .collect()
}

pub fn search_by_ingredient<'a>(book: &'a RecipeBook, query: &str) -> Vec<&'a Recipe> {
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();
    book.iter()
        .filter(|r| contains_ingredient(r, &query))
        .collect()
}

/// Every whitespace-separated token must match the recipe name or one of its
/// ingredient names.
pub fn search_multi_token<'a>(book: &'a RecipeBook, query: &str) -> Vec<&'a Recipe> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    book.iter()
        .filter(|r| {
            tokens.iter().all(|token| {
                r.name().to_lowercase().contains(token.as_str()) || contains_ingredient(r, token)
            })
        })
        .collect()
}

/// First recipe whose name contains `query`, with the total number of matches.
pub struct NameLookup<'a> {
    pub recipe: &'a Recipe,
    pub matches: usize,
}

pub fn find_recipe<'a>(book: &'a RecipeBook, query: &str) -> Option<NameLookup<'a>> {
    let found = search_by_name(book, query);
    found.first().map(|recipe| NameLookup {
        recipe,
        matches: found.len(),
    })
}

fn contains_ingredient(recipe: &Recipe, lower_query: &str) -> bool {
    recipe
        .ingredients()
        .iter()
        .any(|i| i.name().to_lowercase().contains(lower_query))
}

/// Case-insensitive name order with a case-sensitive tie-break. The input is
/// left untouched.
pub fn sorted_by_name<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Vec<&'a Recipe> {
    let mut sorted: Vec<&Recipe> = recipes.into_iter().collect();
    sorted.sort_by(|a, b| compare_names(a.name(), b.name()));
    sorted
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingItem {
    pub name: String,
    pub amount: f64,
}

/// Ingredient totals across several recipes, keyed by trimmed lowercase name.
#[derive(Debug, Clone, Default)]
pub struct ShoppingList {
    totals: HashMap<String, f64>,
}

impl ShoppingList {
    pub fn from_recipes<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Self {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for recipe in recipes {
            for ingredient in recipe.ingredients() {
                *totals.entry(normalize(ingredient.name())).or_insert(0.0) += ingredient.amount();
            }
        }
        Self { totals }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Total for `name` (matched case-insensitively), 0 when absent.
    pub fn amount(&self, name: &str) -> f64 {
        self.totals.get(&normalize(name)).copied().unwrap_or(0.0)
    }

    pub fn items(&self) -> Vec<ShoppingItem> {
        let mut items: Vec<ShoppingItem> = self
            .totals
            .iter()
            .map(|(name, amount)| ShoppingItem {
                name: name.clone(),
                amount: *amount,
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }
}

impl fmt::Display for ShoppingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items() {
            writeln!(f, "- {} {}", format_amount(item.amount), item.name)?;
        }
        Ok(())
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
