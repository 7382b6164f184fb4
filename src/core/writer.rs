use crate::domain::model::{Recipe, RecipeBook};
use std::fmt;

const INDENT: &str = "  ";

/// Renders `book` as a canonical recipe document.
///
/// Recipe and ingredient order follow the book. Amounts use the shortest
/// decimal text that parses back to the same `f64`, never an exponent.
pub fn serialize(book: &RecipeBook) -> String {
    JsonDocument(book).to_string()
}

/// `Display` adapter producing the document text.
pub struct JsonDocument<'a>(pub &'a RecipeBook);

impl fmt::Display for JsonDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{\n")?;
        indent(f, 1)?;
        f.write_str("\"recipes\": ")?;
        if self.0.is_empty() {
            f.write_str("[]\n}")?;
            return Ok(());
        }

        f.write_str("[\n")?;
        for (i, recipe) in self.0.iter().enumerate() {
            write_recipe(f, recipe)?;
            f.write_str(if i + 1 < self.0.len() { ",\n" } else { "\n" })?;
        }
        indent(f, 1)?;
        f.write_str("]\n}")
    }
}

fn write_recipe(f: &mut fmt::Formatter<'_>, recipe: &Recipe) -> fmt::Result {
    indent(f, 2)?;
    f.write_str("{\n")?;
    indent(f, 3)?;
    writeln!(f, "\"name\": {},", escape_json_string(recipe.name()))?;
    indent(f, 3)?;
    writeln!(f, "\"servings\": {},", recipe.servings())?;
    indent(f, 3)?;
    f.write_str("\"ingredients\": ")?;

    let ingredients = recipe.ingredients();
    if ingredients.is_empty() {
        f.write_str("[]\n")?;
    } else {
        f.write_str("[\n")?;
        for (i, ingredient) in ingredients.iter().enumerate() {
            indent(f, 4)?;
            f.write_str("{\n")?;
            indent(f, 5)?;
            writeln!(f, "\"name\": {},", escape_json_string(ingredient.name()))?;
            indent(f, 5)?;
            writeln!(f, "\"amount\": {}", ingredient.amount())?;
            indent(f, 4)?;
            f.write_str(if i + 1 < ingredients.len() { "},\n" } else { "}\n" })?;
        }
        indent(f, 3)?;
        f.write_str("]\n")?;
    }

    indent(f, 2)?;
    f.write_str("}")
}

fn indent(f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
    for _ in 0..level {
        f.write_str(INDENT)?;
    }
    Ok(())
}

/// Quotes `value`, escaping `"`, `\`, newline, carriage return, tab and any
/// other control character.
pub fn escape_json_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
