use crate::utils::error::{RecipeError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    name: String,
    amount: f64,
}

impl Ingredient {
    /// Builds an ingredient, rejecting blank names and amounts that are not
    /// finite and strictly positive.
    pub fn new(name: impl Into<String>, amount: f64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeError::invalid_recipe("ingredient name must be non-blank"));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RecipeError::invalid_recipe(format!(
                "ingredient amount must be a finite number greater than 0, got {amount}"
            )));
        }
        Ok(Self { name, amount })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    name: String,
    servings: u32,
    ingredients: Vec<Ingredient>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, servings: u32) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeError::invalid_recipe("recipe name must be non-blank"));
        }
        if servings == 0 {
            return Err(RecipeError::invalid_recipe("servings must be greater than 0"));
        }
        Ok(Self {
            name,
            servings,
            ingredients: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn servings(&self) -> u32 {
        self.servings
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn total_ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn add_ingredient(&mut self, name: impl Into<String>, amount: f64) -> Result<()> {
        self.ingredients.push(Ingredient::new(name, amount)?);
        Ok(())
    }

    pub fn push_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredients.push(ingredient);
    }

    /// Scales every amount proportionally so the recipe serves `new_servings`.
    ///
    /// Leaves the recipe untouched if any scaled amount would overflow or
    /// round down to zero.
    pub fn scale_to_servings(&mut self, new_servings: u32) -> Result<()> {
        if new_servings == 0 {
            return Err(RecipeError::invalid_recipe("servings must be greater than 0"));
        }
        let factor = f64::from(new_servings) / f64::from(self.servings);
        let scaled = self
            .ingredients
            .iter()
            .map(|ingredient| {
                let amount = ingredient.amount * factor;
                if amount.is_finite() && amount > 0.0 {
                    Ok(amount)
                } else {
                    Err(RecipeError::invalid_recipe(format!(
                        "scaling '{}' to {new_servings} servings gives an unrepresentable amount ({amount})",
                        ingredient.name
                    )))
                }
            })
            .collect::<Result<Vec<f64>>>()?;

        for (ingredient, amount) in self.ingredients.iter_mut().zip(scaled) {
            ingredient.amount = amount;
        }
        self.servings = new_servings;
        Ok(())
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (serves {})", self.name, self.servings)?;
        for ingredient in &self.ingredients {
            writeln!(f, "- {} {}", format_amount(ingredient.amount), ingredient.name)?;
        }
        Ok(())
    }
}

/// Display formatting for amounts: whole numbers print without decimals,
/// everything else with at most two decimals and trailing zeros trimmed.
///
/// Presentation only. The JSON writer always emits full precision.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    if (amount - rounded).abs() < 1e-9 {
        return format!("{rounded:.0}");
    }
    // Half-up to two places before formatting; `{:.2}` alone rounds ties to even.
    let hundredths = (amount * 100.0).round() / 100.0;
    let fixed = format!("{hundredths:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Insertion-ordered recipe collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// Removes the first recipe whose name matches exactly (case-sensitive).
    pub fn remove_recipe(&mut self, name: &str) -> bool {
        match self.recipes.iter().position(|r| r.name() == name) {
            Some(index) => {
                self.recipes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe_mut(&mut self, name: &str) -> Option<&mut Recipe> {
        self.recipes.iter_mut().find(|r| r.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl FromIterator<Recipe> for RecipeBook {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        Self {
            recipes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecipeBook {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}
