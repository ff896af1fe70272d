use serde::{Deserialize, Deserializer, Serialize};

/// Cook time used when a record does not carry one
pub const DEFAULT_COOK_TIME: &str = "45 mins";
/// Servings used when a record does not carry them
pub const DEFAULT_SERVINGS: &str = "4";
/// Area assigned to recipes entered through the add form without one
pub const DEFAULT_AREA: &str = "Unknown";
/// Thumbnail assigned to recipes entered through the add form without one
pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/300";

/// A recipe category as published by the recipe API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "idCategory", default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(rename = "strCategory", default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(
        rename = "strCategoryThumb",
        default,
        deserialize_with = "string_or_empty"
    )]
    pub thumbnail: String,
    #[serde(
        rename = "strCategoryDescription",
        default,
        deserialize_with = "string_or_empty"
    )]
    pub description: String,
}

/// One (name, measurement) pair of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub name: String,
    pub measurement: String,
}

impl IngredientEntry {
    pub fn new(name: impl Into<String>, measurement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurement: measurement.into(),
        }
    }
}

/// A fully normalized recipe held by the provider.
///
/// Serializes with the API's field names so views can consume it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strCategory")]
    pub category: String,
    #[serde(rename = "strArea")]
    pub area: String,
    #[serde(rename = "strInstructions")]
    pub instructions: String,
    #[serde(rename = "strMealThumb")]
    pub thumbnail: String,
    #[serde(rename = "cookTime")]
    pub cook_time: String,
    pub servings: String,
    pub ingredients: Vec<IngredientEntry>,
}

/// Row returned by the per-category meal listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal", default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(rename = "strMeal", default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "string_or_empty")]
    pub thumbnail: String,
}

/// Caller-supplied recipe fields. Anything left out is filled in by
/// [`crate::normalize::normalize_recipe`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipe {
    #[serde(rename = "idMeal", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "strCategory", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "strArea", default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(
        rename = "strInstructions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub instructions: Option<String>,
    #[serde(rename = "strMealThumb", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "cookTime", default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<IngredientEntry>>,
}

impl From<Recipe> for NewRecipe {
    fn from(recipe: Recipe) -> Self {
        NewRecipe {
            id: Some(recipe.id),
            name: Some(recipe.name),
            category: Some(recipe.category),
            area: Some(recipe.area),
            instructions: Some(recipe.instructions),
            thumbnail: Some(recipe.thumbnail),
            cook_time: Some(recipe.cook_time),
            servings: Some(recipe.servings),
            ingredients: Some(recipe.ingredients),
        }
    }
}

/// Raw text of the "add recipe" form, before validation
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub name: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub image_link: String,
    pub cook_time: String,
    pub servings: String,
    pub ingredients: Vec<IngredientEntry>,
}

impl RecipeDraft {
    /// Labels of the required fields that are still blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Recipe Name");
        }
        if self.category.trim().is_empty() {
            missing.push("Category");
        }
        if self.instructions.trim().is_empty() {
            missing.push("Instructions");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Trims every field and drops ingredient rows left entirely blank.
    /// The identifier is left for the provider to assign.
    pub fn into_new_recipe(self) -> NewRecipe {
        let ingredients = self
            .ingredients
            .into_iter()
            .filter(|i| !i.name.trim().is_empty() || !i.measurement.trim().is_empty())
            .map(|i| IngredientEntry::new(i.name.trim(), i.measurement.trim()))
            .collect();

        NewRecipe {
            id: None,
            name: Some(self.name.trim().to_string()),
            category: Some(self.category.trim().to_string()),
            area: Some(non_blank_or(&self.area, DEFAULT_AREA)),
            instructions: Some(self.instructions.trim().to_string()),
            thumbnail: Some(non_blank_or(&self.image_link, PLACEHOLDER_THUMBNAIL)),
            cook_time: Some(non_blank_or(&self.cook_time, DEFAULT_COOK_TIME)),
            servings: Some(non_blank_or(&self.servings, DEFAULT_SERVINGS)),
            ingredients: Some(ingredients),
        }
    }
}

/// Category and name filter applied to the recipe list
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Exact category name; `None` matches every category
    pub category: Option<String>,
    /// Case-insensitive substring of the recipe name
    pub query: String,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| recipe.category == category);

        category_ok
            && recipe
                .name
                .to_lowercase()
                .contains(&self.query.to_lowercase())
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
