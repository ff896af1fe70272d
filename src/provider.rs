use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::join_all;
use log::{debug, error, info, warn};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::fetcher::{MealDbClient, RecipeSource};
use crate::model::{Category, MealSummary, NewRecipe, Recipe, RecipeFilter};
use crate::normalize::normalize_recipe;

/// How much of the remote catalogue [`RecipeProvider::init`] pulls in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Number of leading categories whose meals are loaded
    pub category_limit: usize,
    /// Number of leading meals loaded per category
    pub meals_per_category: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            category_limit: 5,
            meals_per_category: 10,
        }
    }
}

impl From<&ProviderConfig> for LoadOptions {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            category_limit: config.category_limit,
            meals_per_category: config.meals_per_category,
        }
    }
}

#[derive(Debug)]
struct ProviderState {
    recipes: Vec<Recipe>,
    categories: Vec<Category>,
    is_loading: bool,
    /// Bumped by every `init` and `teardown`; a load only publishes while
    /// its generation is current.
    generation: u64,
}

/// In-memory recipe list fed by a [`RecipeSource`].
///
/// Cloning gives another handle to the same state, so one provider can be
/// shared between every view that reads it.
#[derive(Clone)]
pub struct RecipeProvider {
    source: Arc<dyn RecipeSource>,
    options: LoadOptions,
    state: Arc<RwLock<ProviderState>>,
}

impl RecipeProvider {
    /// Create a provider that has not loaded yet. It reports `is_loading`
    /// until [`init`](Self::init) completes or [`teardown`](Self::teardown) runs.
    pub fn new(source: Arc<dyn RecipeSource>, options: LoadOptions) -> Self {
        Self {
            source,
            options,
            state: Arc::new(RwLock::new(ProviderState {
                recipes: Vec::new(),
                categories: Vec::new(),
                is_loading: true,
                generation: 0,
            })),
        }
    }

    /// Provider backed by [`MealDbClient`] using the configured endpoint and limits
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = MealDbClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), LoadOptions::from(config)))
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load categories and recipes from the source.
    ///
    /// Categories are walked in order; each category's detail lookups run
    /// concurrently and finish before the next category starts. Failed
    /// lookups and failed categories are logged and skipped. A failed
    /// category list leaves the provider empty. Never returns an error.
    pub async fn init(&self) {
        let generation = {
            let mut state = self.write();
            state.generation += 1;
            state.is_loading = true;
            state.generation
        };

        let loaded = self.load(generation).await;

        let mut state = self.write();
        if state.generation != generation {
            debug!("Discarding results of superseded load {}", generation);
            return;
        }

        match loaded {
            Ok(recipes) => {
                info!("Loaded {} recipes", recipes.len());
                state.recipes = dedup_by_id(recipes);
            }
            Err(e) => {
                error!("Error fetching data: {}", e);
                state.recipes.clear();
                state.categories.clear();
            }
        }
        state.is_loading = false;
    }

    /// Drop all state and invalidate any load still running
    pub fn teardown(&self) {
        let mut state = self.write();
        state.generation += 1;
        state.recipes.clear();
        state.categories.clear();
        state.is_loading = false;
        debug!("Provider torn down");
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.read().recipes.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.read().categories.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn len(&self) -> usize {
        self.read().recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().recipes.is_empty()
    }

    pub fn find_recipe(&self, id: &str) -> Option<Recipe> {
        self.read().recipes.iter().find(|r| r.id == id).cloned()
    }

    pub fn filter_recipes(&self, filter: &RecipeFilter) -> Vec<Recipe> {
        self.read()
            .recipes
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Normalize `record` and append it. Returns the stored recipe.
    pub fn add_recipe(&self, record: NewRecipe) -> Recipe {
        let mut state = self.write();

        let recipe = {
            let recipes = &state.recipes;
            if let Some(id) = record.id.as_deref().map(str::trim) {
                if !id.is_empty() && recipes.iter().any(|r| r.id == id) {
                    warn!("Recipe id {} already in use, assigning a new one", id);
                }
            }
            normalize_recipe(record, |id| recipes.iter().any(|r| r.id == id))
        };

        debug!("Adding recipe {} ({})", recipe.id, recipe.name);
        state.recipes.push(recipe.clone());
        recipe
    }

    /// Remove the recipe with `id`. Returns whether anything was removed.
    pub fn delete_recipe(&self, id: &str) -> bool {
        let mut state = self.write();
        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);
        let removed = state.recipes.len() != before;
        if removed {
            debug!("Deleted recipe {}", id);
        }
        removed
    }

    /// Replace the whole list, normalizing each record
    pub fn replace_recipes(&self, records: Vec<NewRecipe>) {
        let mut recipes: Vec<Recipe> = Vec::with_capacity(records.len());
        for record in records {
            let recipe = normalize_recipe(record, |id| recipes.iter().any(|r| r.id == id));
            recipes.push(recipe);
        }
        self.write().recipes = recipes;
    }

    async fn load(&self, generation: u64) -> Result<Vec<Recipe>, ProviderError> {
        let categories = self.source.categories().await?;
        info!("Fetched {} categories", categories.len());

        let names: Vec<String> = categories
            .iter()
            .take(self.options.category_limit)
            .map(|c| c.name.clone())
            .collect();

        {
            let mut state = self.write();
            if state.generation == generation {
                state.categories = categories;
            }
        }

        let mut all_recipes = Vec::new();
        for name in &names {
            match self.load_category(name).await {
                Ok(recipes) => {
                    debug!("Category {} contributed {} recipes", name, recipes.len());
                    all_recipes.extend(recipes);
                }
                Err(e) => warn!("No meals found for category {}: {}", name, e),
            }
        }

        Ok(all_recipes)
    }

    async fn load_category(&self, category: &str) -> Result<Vec<Recipe>, ProviderError> {
        let meals = self.source.meals_in_category(category).await?;

        let lookups = meals
            .iter()
            .take(self.options.meals_per_category)
            .map(|meal| self.fetch_full_recipe(meal));

        Ok(join_all(lookups).await.into_iter().flatten().collect())
    }

    async fn fetch_full_recipe(&self, meal: &MealSummary) -> Option<Recipe> {
        match self.source.lookup_meal(&meal.id).await {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                error!("Error fetching meal details for {}: {}", meal.id, e);
                None
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ProviderState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProviderState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keep the first recipe for every identifier
fn dedup_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|recipe| {
            let fresh = seen.insert(recipe.id.clone());
            if !fresh {
                warn!("Dropping duplicate recipe id {}", recipe.id);
            }
            fresh
        })
        .collect()
}
