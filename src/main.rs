use anyhow::{bail, Context};
use clap::Parser;
use recipe_store::config::cli::{Command, SearchMode};
use recipe_store::core::ConfigProvider;
use recipe_store::domain::services::{self, ShoppingList};
use recipe_store::utils::logger;
use recipe_store::{CliConfig, LocalStorage, Recipe, RecipeBook, RecipeError, RecipeStore, Settings};

fn main() {
    let cli = CliConfig::parse();

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, None);
            let code = e.exit_code();
            report(&anyhow::Error::new(e));
            std::process::exit(code);
        }
    };

    if settings.log_json {
        logger::init_json_logger(settings.verbose, settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(settings.verbose, settings.log_level.as_deref());
    }
    tracing::debug!("Settings: {:?}", settings);

    if let Err(err) = run(&cli.command, &settings) {
        let code = err
            .downcast_ref::<RecipeError>()
            .map_or(1, RecipeError::exit_code);
        report(&err);
        std::process::exit(code);
    }
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<RecipeError>() {
        Some(e) => {
            tracing::error!("❌ {:#} (Category: {:?})", err, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
        }
        None => {
            tracing::error!("❌ {:#}", err);
            eprintln!("❌ {err:#}");
        }
    }
}

fn run(command: &Command, settings: &Settings) -> anyhow::Result<()> {
    let store = RecipeStore::new(LocalStorage::new(settings.base_dir().to_string()));
    let file = settings.recipe_file()?;
    let book = store
        .load(file)
        .with_context(|| format!("failed to load '{file}'"))?;

    match command {
        Command::Validate => {
            let ingredients: usize = book.iter().map(Recipe::total_ingredient_count).sum();
            println!(
                "✅ {file}: {} recipes, {ingredients} ingredients, all valid",
                book.len()
            );
        }
        Command::Show {
            name: Some(name),
            ..
        } => show_one(&book, name)?,
        Command::Show { name: None, sorted } => show(&book, *sorted),
        Command::Search { query, by } => {
            let found = match by {
                SearchMode::Name => services::search_by_name(&book, query),
                SearchMode::Ingredient => services::search_by_ingredient(&book, query),
                SearchMode::All => services::search_multi_token(&book, query),
            };
            if found.is_empty() {
                println!("No recipes match \"{query}\".");
            }
            for recipe in found {
                println!("{} (serves {})", recipe.name(), recipe.servings());
            }
        }
        Command::Shop { recipes } => shop(&book, recipes)?,
        Command::Normalize { output } => {
            let destination = output.as_deref().unwrap_or(file);
            store
                .save(&book, destination)
                .with_context(|| format!("failed to save '{destination}'"))?;
            println!("📁 Wrote {} recipes to {destination}", book.len());
        }
        Command::Scale {
            recipe,
            servings,
            output,
        } => {
            let mut book = book;
            let Some(target) = book.recipe_mut(recipe) else {
                bail!("recipe '{recipe}' not found in '{file}'");
            };
            target.scale_to_servings(*servings)?;
            print!("{target}");

            let destination = output.as_deref().unwrap_or(file);
            store
                .save(&book, destination)
                .with_context(|| format!("failed to save '{destination}'"))?;
            println!("📁 Saved to {destination}");
        }
    }

    Ok(())
}

fn show(book: &RecipeBook, sorted: bool) {
    if book.is_empty() {
        println!("No recipes in the collection.");
        return;
    }
    let recipes: Vec<&Recipe> = if sorted {
        services::sorted_by_name(book)
    } else {
        book.iter().collect()
    };
    for (i, recipe) in recipes.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{recipe}");
    }
}

fn show_one(book: &RecipeBook, query: &str) -> anyhow::Result<()> {
    let query = query.trim();
    let Some(lookup) = services::find_recipe(book, query) else {
        bail!("no recipe found matching '{query}'");
    };
    if lookup.matches > 1 {
        println!("Multiple recipes found ({}). Showing first match:", lookup.matches);
        println!();
    }
    println!("=== {} ===", lookup.recipe.name());
    print!("{}", lookup.recipe);
    Ok(())
}

fn shop(book: &RecipeBook, names: &[String]) -> anyhow::Result<()> {
    let mut selected = Vec::new();
    for name in names {
        let name = name.trim();
        match services::search_by_name(book, name).first() {
            Some(recipe) => selected.push(*recipe),
            None => tracing::warn!("Recipe '{}' not found", name),
        }
    }
    if selected.is_empty() {
        bail!("none of the requested recipes were found");
    }

    let list = ShoppingList::from_recipes(selected.iter().copied());
    println!("Selected recipes: {}", selected.len());
    println!("Total ingredients: {}", list.len());
    println!();
    print!("{list}");
    Ok(())
}
