//! Recipe document reader.
//!
//! Walks `{"recipes": [...]}` with the scanning primitives, validates every
//! record in source order and only builds the [`RecipeBook`] once nothing has
//! failed. The first failure ends the load; no partial collection escapes.

use crate::core::extract::{self, Member, NumberError, StringError, ValueKind};
use crate::core::scan::{self, Span};
use crate::domain::model::{Ingredient, Recipe, RecipeBook};
use crate::utils::error::{Location, RecipeError, Result};

const RECIPES_KEY: &str = "recipes";
const NAME_KEY: &str = "name";
const SERVINGS_KEY: &str = "servings";
const INGREDIENTS_KEY: &str = "ingredients";
const AMOUNT_KEY: &str = "amount";

/// Parses and validates a recipe document.
pub fn deserialize(text: &str) -> Result<RecipeBook> {
    match parse_document(text) {
        Ok(book) => {
            tracing::debug!(recipes = book.len(), "recipe document accepted");
            Ok(book)
        }
        Err(e) => {
            tracing::warn!(error = %e, "recipe document rejected");
            Err(e)
        }
    }
}

fn parse_document(text: &str) -> Result<RecipeBook> {
    let doc = Location::document();
    let bytes = text.as_bytes();

    let start = scan::skip_whitespace(text, 0);
    match bytes.get(start) {
        None => return Err(RecipeError::structural(doc, "document is empty")),
        Some(b'{') => {}
        Some(_) => {
            return Err(RecipeError::structural(
                doc.with_offset(start),
                format!(
                    "root must be an object, found {}",
                    ValueKind::of(&text[start..]).describe()
                ),
            ))
        }
    }

    let close = scan::find_matching(text, start).map_err(|e| extract::scan_error(doc, e))?;
    let trailing = scan::skip_whitespace(text, close + 1);
    if trailing < bytes.len() {
        return Err(RecipeError::structural(
            doc.with_offset(trailing),
            "unexpected content after the root object",
        ));
    }

    let members = extract::object_members(text, Span::new(start, close + 1), doc)?;
    let recipes = extract::find_member(&members, RECIPES_KEY).ok_or_else(|| {
        RecipeError::structural(doc, format!("missing '{RECIPES_KEY}' field"))
    })?;
    let elements = array_elements(text, recipes, doc)?;

    let mut parsed = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let recipe = parse_recipe(text, element, index)?;
        tracing::debug!(
            index,
            name = recipe.name(),
            ingredients = recipe.total_ingredient_count(),
            "recipe validated"
        );
        parsed.push(recipe);
    }

    Ok(parsed.into_iter().collect())
}

/// Element spans of the array held by `member`, each guaranteed non-empty.
fn array_elements(text: &str, member: &Member, location: Location) -> Result<Vec<Span>> {
    let raw = member.value.of(text);
    if ValueKind::of(raw) != ValueKind::Array {
        return Err(RecipeError::structural(
            location.with_offset(member.value.start),
            format!(
                "'{}' must be an array, found {}",
                member.key,
                ValueKind::of(raw).describe()
            ),
        ));
    }

    // object_members already checked the brackets balance to the value's end.
    let inner = Span::new(member.value.start + 1, member.value.end - 1);
    let elements = scan::split_top_level(text, inner).map_err(|e| extract::scan_error(location, e))?;
    if let Some(index) = elements.iter().position(Span::is_empty) {
        return Err(RecipeError::structural(
            location.with_offset(elements[index].start),
            format!("'{}' has an empty element at index {index}", member.key),
        ));
    }
    Ok(elements)
}

/// Members of an array element that must be an object.
fn element_members(text: &str, element: Span, location: Location, what: &str) -> Result<Vec<Member>> {
    let raw = element.of(text);
    let kind = ValueKind::of(raw);
    if kind != ValueKind::Object {
        return Err(RecipeError::structural(
            location.with_offset(element.start),
            format!("{what} must be an object, found {}", kind.describe()),
        ));
    }
    let close = scan::find_matching(text, element.start).map_err(|e| extract::scan_error(location, e))?;
    if close + 1 != element.end {
        return Err(RecipeError::structural(
            location.with_offset(close + 1),
            format!("unexpected content after {what} object"),
        ));
    }
    extract::object_members(text, element, location)
}

fn parse_recipe(text: &str, element: Span, index: usize) -> Result<Recipe> {
    let location = Location::recipe(index);
    let members = element_members(text, element, location, "recipe")?;

    let name = required_name(text, &members, location)?;
    let servings = required_servings(text, &members, location)?;

    let mut ingredients = Vec::new();
    if let Some(member) = extract::find_member(&members, INGREDIENTS_KEY) {
        if member.value.of(text) != "null" {
            for (i, element) in array_elements(text, member, location)?.into_iter().enumerate() {
                ingredients.push(parse_ingredient(text, element, index, i)?);
            }
        }
    }

    let mut recipe = Recipe::new(name, servings)?;
    for ingredient in ingredients {
        recipe.push_ingredient(ingredient);
    }
    Ok(recipe)
}

fn parse_ingredient(text: &str, element: Span, recipe: usize, index: usize) -> Result<Ingredient> {
    let location = Location::ingredient(recipe, index);
    let members = element_members(text, element, location, "ingredient")?;

    let name = required_name(text, &members, location)?;
    let amount = required_amount(text, &members, location)?;
    Ingredient::new(name, amount)
}

fn required<'m>(members: &'m [Member], key: &str, location: Location) -> Result<&'m Member> {
    extract::find_member(members, key)
        .ok_or_else(|| RecipeError::validation(location, format!("missing '{key}' field")))
}

fn required_name(text: &str, members: &[Member], location: Location) -> Result<String> {
    let member = required(members, NAME_KEY, location)?;
    let at = location.with_offset(member.value.start);
    let name = extract::decode_string(member.value.of(text)).map_err(|e| match e {
        StringError::NotAString(kind) => RecipeError::validation(
            at,
            format!("'{NAME_KEY}' must be a string, found {}", kind.describe()),
        ),
        StringError::InvalidEscape(reason) => {
            RecipeError::structural(at, format!("invalid string for '{NAME_KEY}': {reason}"))
        }
    })?;
    if name.trim().is_empty() {
        return Err(RecipeError::validation(
            at,
            format!("'{NAME_KEY}' must be non-blank"),
        ));
    }
    Ok(name)
}

fn required_servings(text: &str, members: &[Member], location: Location) -> Result<u32> {
    let member = required(members, SERVINGS_KEY, location)?;
    let at = location.with_offset(member.value.start);
    let raw = member.value.of(text);
    let value = extract::parse_integer(raw).map_err(|e| {
        let reason = match e {
            NumberError::OutOfRange => "is out of range".to_string(),
            NumberError::NotAnInteger => "must be a whole number".to_string(),
            NumberError::NotANumber => {
                format!("must be a valid integer, found {}", ValueKind::of(raw).describe())
            }
        };
        RecipeError::validation(at, format!("'{SERVINGS_KEY}' {reason}"))
    })?;
    if value <= 0 {
        return Err(RecipeError::validation(
            at,
            format!("'{SERVINGS_KEY}' must be greater than 0, got {value}"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| RecipeError::validation(at, format!("'{SERVINGS_KEY}' is out of range")))
}

fn required_amount(text: &str, members: &[Member], location: Location) -> Result<f64> {
    let member = required(members, AMOUNT_KEY, location)?;
    let at = location.with_offset(member.value.start);
    let raw = member.value.of(text);
    let value = extract::parse_number(raw).map_err(|e| {
        let reason = match e {
            NumberError::OutOfRange => "is out of range".to_string(),
            _ => format!("must be a valid number, found {}", ValueKind::of(raw).describe()),
        };
        RecipeError::validation(at, format!("'{AMOUNT_KEY}' {reason}"))
    })?;
    if value <= 0.0 {
        return Err(RecipeError::validation(
            at,
            format!("'{AMOUNT_KEY}' must be greater than 0, got {raw}"),
        ));
    }
    Ok(value)
}
