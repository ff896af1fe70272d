//! UniFFI bindings for mealdb-provider
//!
//! This module provides FFI-compatible types and a `RecipeStore` object for use with
//! iOS and Android. The store owns its tokio runtime and blocks on async provider calls.

use std::fmt;
use std::sync::Arc;

use crate::{
    Category, IngredientEntry, NewRecipe, ProviderConfig, ProviderError, Recipe, RecipeFilter,
    RecipeProvider,
};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible ingredient entry
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiIngredient {
    pub name: String,
    pub measurement: String,
}

/// FFI-compatible recipe structure
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub id: String,
    pub name: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub thumbnail: String,
    pub cook_time: String,
    pub servings: String,
    pub ingredients: Vec<FfiIngredient>,
}

/// FFI-compatible category
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiCategory {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub description: String,
}

/// Fields for a recipe added from the app; anything unset gets a default
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiNewRecipe {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<String>,
    pub ingredients: Option<Vec<FfiIngredient>>,
}

impl From<IngredientEntry> for FfiIngredient {
    fn from(entry: IngredientEntry) -> Self {
        FfiIngredient {
            name: entry.name,
            measurement: entry.measurement,
        }
    }
}

impl From<FfiIngredient> for IngredientEntry {
    fn from(ffi: FfiIngredient) -> Self {
        IngredientEntry {
            name: ffi.name,
            measurement: ffi.measurement,
        }
    }
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            id: recipe.id,
            name: recipe.name,
            category: recipe.category,
            area: recipe.area,
            instructions: recipe.instructions,
            thumbnail: recipe.thumbnail,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Category> for FfiCategory {
    fn from(category: Category) -> Self {
        FfiCategory {
            id: category.id,
            name: category.name,
            thumbnail: category.thumbnail,
            description: category.description,
        }
    }
}

impl From<FfiNewRecipe> for NewRecipe {
    fn from(ffi: FfiNewRecipe) -> Self {
        NewRecipe {
            id: ffi.id,
            name: ffi.name,
            category: ffi.category,
            area: ffi.area,
            instructions: ffi.instructions,
            thumbnail: ffi.thumbnail,
            cook_time: ffi.cook_time,
            servings: ffi.servings,
            ingredients: ffi
                .ingredients
                .map(|entries| entries.into_iter().map(Into::into).collect()),
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiProviderError {
    /// Building the HTTP client or a request failed
    FetchError { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiProviderError::FetchError { message } => write!(f, "Fetch error: {}", message),
            FfiProviderError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiProviderError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiProviderError {}

impl From<ProviderError> for FfiProviderError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Config(e) => FfiProviderError::ConfigError {
                message: e.to_string(),
            },
            ProviderError::Runtime(message) => FfiProviderError::RuntimeError { message },
            other => FfiProviderError::FetchError {
                message: other.to_string(),
            },
        }
    }
}

/// Recipe provider handle for the app's views
#[cfg_attr(feature = "uniffi", derive(uniffi::Object))]
pub struct RecipeStore {
    runtime: tokio::runtime::Runtime,
    provider: RecipeProvider,
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiProviderError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiProviderError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Create a store from `config.toml` / `MEALDB__*` settings.
///
/// # Arguments
/// * `base_url` - Optional API root overriding the configured one
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn create_recipe_store(base_url: Option<String>) -> Result<Arc<RecipeStore>, FfiProviderError> {
    let mut config = ProviderConfig::load().map_err(ProviderError::from)?;
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    RecipeStore::with_config(&config).map(Arc::new)
}

impl RecipeStore {
    pub fn with_config(config: &ProviderConfig) -> Result<Self, FfiProviderError> {
        Ok(RecipeStore {
            runtime: create_runtime()?,
            provider: RecipeProvider::from_config(config)?,
        })
    }

    pub fn provider(&self) -> &RecipeProvider {
        &self.provider
    }
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
impl RecipeStore {
    /// Run the initial load; blocks until every category has been processed
    pub fn load(&self) {
        self.runtime.block_on(self.provider.init());
    }

    pub fn teardown(&self) {
        self.provider.teardown();
    }

    pub fn is_loading(&self) -> bool {
        self.provider.is_loading()
    }

    pub fn recipes(&self) -> Vec<FfiRecipe> {
        self.provider.recipes().into_iter().map(Into::into).collect()
    }

    pub fn categories(&self) -> Vec<FfiCategory> {
        self.provider
            .categories()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    pub fn find_recipe(&self, id: String) -> Option<FfiRecipe> {
        self.provider.find_recipe(&id).map(Into::into)
    }

    /// Recipes in `category` (all when `None`) whose name contains `query`
    pub fn filter_recipes(&self, category: Option<String>, query: String) -> Vec<FfiRecipe> {
        self.provider
            .filter_recipes(&RecipeFilter { category, query })
            .into_iter()
            .map(Into::into)
            .collect()
    }

    pub fn add_recipe(&self, recipe: FfiNewRecipe) -> FfiRecipe {
        self.provider.add_recipe(recipe.into()).into()
    }

    pub fn delete_recipe(&self, id: String) -> bool {
        self.provider.delete_recipe(&id)
    }
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
