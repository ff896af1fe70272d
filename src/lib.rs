//! In-memory recipe provider backed by TheMealDB.
//!
//! [`RecipeProvider`] pulls categories and recipe details from the API once,
//! then serves the list to views and accepts local additions and deletions.
//! Nothing is written back to the API and nothing survives the process.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod mobile;
pub mod model;
pub mod normalize;
pub mod provider;

pub use crate::config::{load_config, ProviderConfig, DEFAULT_BASE_URL};
pub use error::ProviderError;
pub use fetcher::{FetchedRecords, MealDbClient, RecipeSource};
pub use model::{
    Category, IngredientEntry, MealSummary, NewRecipe, Recipe, RecipeDraft, RecipeFilter,
    DEFAULT_COOK_TIME, DEFAULT_SERVINGS,
};
pub use normalize::normalize_recipe;
pub use provider::{LoadOptions, RecipeProvider};

/// Build a provider from `config.toml` / `MEALDB__*` settings and run its
/// initial load.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = mealdb_provider::load_provider().await?;
/// for recipe in provider.recipes() {
///     println!("{} ({})", recipe.name, recipe.category);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn load_provider() -> Result<RecipeProvider, ProviderError> {
    let config = ProviderConfig::load()?;
    let provider = RecipeProvider::from_config(&config)?;
    provider.init().await;
    Ok(provider)
}
