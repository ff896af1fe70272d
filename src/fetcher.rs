use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::model::{Category, MealSummary, Recipe};
use crate::normalize::recipe_from_meal;

/// Where the provider gets its recipe data from
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Every category the API knows about, in API order
    async fn categories(&self) -> Result<Vec<Category>, ProviderError>;

    /// The meal listing for one category
    async fn meals_in_category(&self, category: &str) -> Result<Vec<MealSummary>, ProviderError>;

    /// Full details for one meal
    async fn lookup_meal(&self, id: &str) -> Result<Recipe, ProviderError>;
}

/// Records produced by [`MealDbClient::fetch_records`]
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedRecords {
    Categories(Vec<Category>),
    Meals(Vec<Recipe>),
    Empty,
}

impl FetchedRecords {
    pub fn len(&self) -> usize {
        match self {
            FetchedRecords::Categories(categories) => categories.len(),
            FetchedRecords::Meals(meals) => meals.len(),
            FetchedRecords::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize)]
struct CategoriesResponse {
    categories: Option<Vec<Category>>,
}

#[derive(Deserialize)]
struct MealsResponse<T> {
    meals: Option<Vec<T>>,
}

/// HTTP client for TheMealDB-style JSON API
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Create a client rooted at `base_url`, e.g. `https://www.themealdb.com/api/json/v1/1`.
    /// Requests have no timeout unless one is given.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::new(config.base_url.clone(), config.timeout_duration())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn categories_url(&self) -> Result<Url, ProviderError> {
        self.endpoint("categories.php", &[])
    }

    pub fn category_meals_url(&self, category: &str) -> Result<Url, ProviderError> {
        self.endpoint("filter.php", &[("c", category)])
    }

    pub fn lookup_url(&self, id: &str) -> Result<Url, ProviderError> {
        self.endpoint("lookup.php", &[("i", id)])
    }

    /// Fetch `url` and normalize whichever of `categories` or `meals` it
    /// carries. Failures are logged and reported as [`FetchedRecords::Empty`].
    pub async fn fetch_records(&self, url: &str) -> FetchedRecords {
        let body = match Url::parse(url)
            .map_err(|e| ProviderError::InvalidUrl(e.to_string()))
        {
            Ok(url) => self.get_json(url).await,
            Err(e) => Err(e),
        };

        match body {
            Ok(body) => records_from_body(body),
            Err(e) => {
                error!("Fetch error for {}: {}", url, e);
                FetchedRecords::Empty
            }
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let raw = format!("{}/{}", self.base_url, path);
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        url.map_err(|e| ProviderError::InvalidUrl(format!("{raw}: {e}")))
    }

    async fn get_json(&self, url: Url) -> Result<Value, ProviderError> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn categories(&self) -> Result<Vec<Category>, ProviderError> {
        let body = self.get_json(self.categories_url()?).await?;
        let response: CategoriesResponse = serde_json::from_value(body)?;
        response
            .categories
            .ok_or(ProviderError::MissingField("categories"))
    }

    async fn meals_in_category(&self, category: &str) -> Result<Vec<MealSummary>, ProviderError> {
        let body = self.get_json(self.category_meals_url(category)?).await?;
        let response: MealsResponse<MealSummary> = serde_json::from_value(body)?;
        response.meals.ok_or(ProviderError::MissingField("meals"))
    }

    async fn lookup_meal(&self, id: &str) -> Result<Recipe, ProviderError> {
        let body = self.get_json(self.lookup_url(id)?).await?;
        let response: MealsResponse<Value> = serde_json::from_value(body)?;

        let meal = response
            .meals
            .and_then(|meals| meals.into_iter().next())
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))?;

        recipe_from_meal(&meal)
    }
}

/// `meals` wins over `categories` when a body somehow carries both
fn records_from_body(body: Value) -> FetchedRecords {
    if let Some(meals) = body.get("meals").and_then(Value::as_array) {
        let recipes = meals
            .iter()
            .filter_map(|meal| match recipe_from_meal(meal) {
                Ok(recipe) => Some(recipe),
                Err(e) => {
                    warn!("Skipping meal record: {}", e);
                    None
                }
            })
            .collect();
        return FetchedRecords::Meals(recipes);
    }

    if let Some(categories) = body.get("categories").filter(|c| c.is_array()) {
        match serde_json::from_value::<Vec<Category>>(categories.clone()) {
            Ok(categories) => return FetchedRecords::Categories(categories),
            Err(e) => error!("Invalid categories data: {}", e),
        }
    }

    FetchedRecords::Empty
}
