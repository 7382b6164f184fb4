use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "recipe-store")]
#[command(about = "Validate, inspect and rewrite recipe collection files")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Recipe file to operate on (overrides storage.default_file)
    #[arg(short, long, global = true)]
    pub file: Option<String>,

    /// Directory relative file paths are resolved against
    #[arg(long, global = true)]
    pub base_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check that the file loads without errors
    Validate,

    /// Print every recipe, or the first one whose name contains NAME
    Show {
        name: Option<String>,

        /// Order by name instead of file order
        #[arg(long)]
        sorted: bool,
    },

    /// Find recipes by name and/or ingredient
    Search {
        query: String,

        #[arg(long, value_enum, default_value_t = SearchMode::All)]
        by: SearchMode,
    },

    /// Aggregate the ingredients of the named recipes
    Shop {
        #[arg(required = true)]
        recipes: Vec<String>,
    },

    /// Rewrite the file in canonical form
    Normalize {
        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Scale one recipe to a new serving count and save the collection
    Scale {
        recipe: String,

        servings: u32,

        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchMode {
    Name,
    Ingredient,
    /// Every word must match the name or an ingredient
    All,
}
