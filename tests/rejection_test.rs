use recipe_store::{deserialize, RecipeError};

fn doc(recipes: &str) -> String {
    format!(r#"{{"recipes": [{recipes}]}}"#)
}

fn assert_validation(text: &str, recipe: usize, ingredient: Option<usize>, needle: &str) {
    match deserialize(text) {
        Err(RecipeError::ValidationError { location, message }) => {
            assert_eq!(location.recipe, Some(recipe), "{text}: {message}");
            assert_eq!(location.ingredient, ingredient, "{text}: {message}");
            assert!(message.contains(needle), "{text}: {message}");
        }
        other => panic!("expected validation error for {text}, got {other:?}"),
    }
}

fn assert_structural(text: &str, needle: &str) {
    match deserialize(text) {
        Err(e @ RecipeError::StructuralError { .. }) => {
            assert!(e.to_string().contains(needle), "{text}: {e}");
        }
        other => panic!("expected structural error for {text}, got {other:?}"),
    }
}

#[test]
fn test_blank_name_on_first_recipe() {
    assert_validation(
        r#"{"recipes":[{"name":"","servings":2,"ingredients":[]}]}"#,
        0,
        None,
        "'name' must be non-blank",
    );
    assert_validation(&doc(r#"{"name": "  \t ", "servings": 2}"#), 0, None, "non-blank");
}

#[test]
fn test_invalid_second_recipe_rejects_whole_document() {
    let text = doc(
        r#"{"name": "Good", "servings": 2, "ingredients": [{"name": "x", "amount": 1}]},
           {"name": "", "servings": 2}"#,
    );
    let result = deserialize(&text);
    assert!(result.is_err(), "a document with an invalid recipe must not load");
    assert_validation(&text, 1, None, "non-blank");
}

#[test]
fn test_servings_must_be_positive_integers() {
    assert_validation(&doc(r#"{"name": "A", "servings": 0}"#), 0, None, "greater than 0");
    assert_validation(&doc(r#"{"name": "A", "servings": -1}"#), 0, None, "greater than 0");
    assert_validation(&doc(r#"{"name": "A", "servings": 1.5}"#), 0, None, "whole number");
    assert_validation(&doc(r#"{"name": "A", "servings": "two"}"#), 0, None, "valid integer");
    assert_validation(&doc(r#"{"name": "A"}"#), 0, None, "missing 'servings'");
}

#[test]
fn test_missing_or_mistyped_name() {
    assert_validation(&doc(r#"{"servings": 2}"#), 0, None, "missing 'name'");
    assert_validation(&doc(r#"{"name": 5, "servings": 2}"#), 0, None, "must be a string");
    assert_validation(&doc(r#"{"name": null, "servings": 2}"#), 0, None, "must be a string");
}

#[test]
fn test_ingredient_rules() {
    let with = |ingredients: &str| {
        doc(&format!(
            r#"{{"name": "A", "servings": 1}}, {{"name": "B", "servings": 1, "ingredients": [{ingredients}]}}"#
        ))
    };

    assert_validation(&with(r#"{"name": "x", "amount": 0}"#), 1, Some(0), "greater than 0");
    assert_validation(&with(r#"{"name": "x", "amount": -2}"#), 1, Some(0), "greater than 0");
    assert_validation(&with(r#"{"name": "x"}"#), 1, Some(0), "missing 'amount'");
    assert_validation(&with(r#"{"amount": 1}"#), 1, Some(0), "missing 'name'");
    assert_validation(&with(r#"{"name": " ", "amount": 1}"#), 1, Some(0), "non-blank");
    assert_validation(
        &with(r#"{"name": "x", "amount": 1}, {"name": "y", "amount": "lots"}"#),
        1,
        Some(1),
        "valid number",
    );
    assert_validation(
        &with(r#"{"name": "x", "amount": 1e400}"#),
        1,
        Some(0),
        "out of range",
    );
    assert_validation(
        &with(r#"{"name": "x", "amount": 1e-400}"#),
        1,
        Some(0),
        "out of range",
    );
}

#[test]
fn test_keys_are_not_case_normalized() {
    let text = r#"{"Recipes": [{"name": "A", "servings": 1}]}"#;
    assert_structural(text, "missing 'recipes'");

    let text = doc(r#"{"Name": "A", "Servings": 1}"#);
    assert_validation(&text, 0, None, "missing 'name'");
    let err = deserialize(&text).unwrap_err();
    assert_eq!(err.exit_code(), 5);

    let text = doc(r#"{"name": "A", "servings": 1, "ingredients": [{"name": "x", "Amount": 1}]}"#);
    assert_validation(&text, 0, Some(0), "missing 'amount'");
}

#[test]
fn test_recipes_key_must_hold_an_array() {
    assert_structural(r#"{}"#, "missing 'recipes'");
    assert_structural(r#"{"recipes": "none"}"#, "must be an array");
    assert_structural(r#"{"recipes": {"name": "A"}}"#, "must be an array");
    assert_structural(r#"{"recipes": null}"#, "must be an array");
}

#[test]
fn test_malformed_documents() {
    assert_structural("   ", "document is empty");
    assert_structural(r#"["recipes"]"#, "root must be an object");
    assert_structural(r#"{"recipes": [{"name": "A", "servings": 1}]"#, "never closed");
    assert_structural(r#"{"recipes": [{"name": "A, "servings": 1}]}"#, "");
    assert_structural(r#"{"recipes": [{"name": "A" "servings": 1}]}"#, "missing comma");
    assert_structural(r#"{"recipes": [,]}"#, "empty element at index 0");
    assert_structural(r#"{"recipes": []}{"recipes": []}"#, "after the root object");
    assert_structural(r#"{"recipes": ["Soup"]}"#, "recipe must be an object");
}

#[test]
fn test_nested_name_does_not_stand_in_for_missing_recipe_name() {
    let text = doc(r#"{"servings": 1, "ingredients": [{"name": "salt", "amount": 1}]}"#);
    assert_validation(&text, 0, None, "missing 'name'");
}
