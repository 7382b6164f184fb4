use recipe_store::{LocalStorage, Recipe, RecipeBook, RecipeError, RecipeStore};
use std::fs;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> RecipeStore<LocalStorage> {
    RecipeStore::new(LocalStorage::new(dir.path().to_string_lossy().into_owned()))
}

fn sample_book() -> RecipeBook {
    let mut soup = Recipe::new("Garlic Soup", 4).unwrap();
    soup.add_ingredient("garlic", 4.0).unwrap();
    soup.add_ingredient("broth", 1000.0).unwrap();

    let mut toast = Recipe::new("Toast", 1).unwrap();
    toast.add_ingredient("bread", 2.0).unwrap();
    toast.add_ingredient("butter", 0.5).unwrap();

    [soup, toast].into_iter().collect()
}

#[test]
fn test_save_then_load_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let book = sample_book();

    store.save(&book, "book.json").unwrap();

    // File lands under the base directory
    let on_disk = fs::read_to_string(temp_dir.path().join("book.json")).unwrap();
    assert!(on_disk.starts_with("{\n  \"recipes\": [\n"));
    assert!(on_disk.ends_with("  ]\n}"));

    let loaded = store.load("book.json").unwrap();
    assert_eq!(loaded, book);
}

#[test]
fn test_saving_twice_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    store.save(&sample_book(), "a.json").unwrap();
    let reloaded = store.load("a.json").unwrap();
    store.save(&reloaded, "b.json").unwrap();

    let a = fs::read(temp_dir.path().join("a.json")).unwrap();
    let b = fs::read(temp_dir.path().join("b.json")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_overwrite_leaves_only_destination() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    store.save(&sample_book(), "book.json").unwrap();
    store.save(&RecipeBook::new(), "book.json").unwrap();

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, ["book.json"]);
    assert!(store.load("book.json").unwrap().is_empty());
}

#[test]
fn test_failed_load_keeps_previous_collection() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    store.save(&sample_book(), "good.json").unwrap();

    let mut current = store.load("good.json").unwrap();

    fs::write(
        temp_dir.path().join("bad.json"),
        r#"{"recipes": [{"name": "Fine", "servings": 2}, {"name": "Broken", "servings": 0}]}"#,
    )
    .unwrap();

    match store.load("bad.json") {
        Ok(book) => current = book,
        Err(e) => {
            assert!(matches!(e, RecipeError::ValidationError { .. }), "{e}");
            assert_eq!(e.location().and_then(|l| l.recipe), Some(1));
        }
    }
    assert_eq!(current, sample_book());
}

#[test]
fn test_load_tolerates_byte_order_mark() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    fs::write(
        temp_dir.path().join("bom.json"),
        "\u{feff}{\"recipes\": [{\"name\": \"Tea\", \"servings\": 1}]}",
    )
    .unwrap();

    let book = store.load("bom.json").unwrap();
    assert_eq!(book.recipes()[0].name(), "Tea");
}

#[test]
fn test_load_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    let err = store.load("nowhere.json").unwrap_err();
    assert!(matches!(err, RecipeError::IoError(_)), "{err}");
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_load_rejects_invalid_utf8() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    fs::write(temp_dir.path().join("latin1.json"), b"{\"recipes\": [\xff]}").unwrap();

    let err = store.load("latin1.json").unwrap_err();
    assert!(matches!(err, RecipeError::StructuralError { .. }), "{err}");
    assert_eq!(err.location().and_then(|l| l.offset), Some(13));
}

#[test]
fn test_blank_paths_are_rejected_before_touching_disk() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    assert!(store.save(&sample_book(), "  ").is_err());
    assert!(store.load("").is_err());
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
