//! Recipe normalization shared by every ingress point.
//!
//! Records from the API and records added locally both pass through
//! [`normalize_recipe`], so the defaults for cook time, servings,
//! ingredients and identifiers are applied in exactly one place.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::model::{IngredientEntry, NewRecipe, Recipe, DEFAULT_COOK_TIME, DEFAULT_SERVINGS};

/// Number of indexed `strIngredientN` / `strMeasureN` slots in a meal payload
pub const MAX_INGREDIENTS: usize = 20;

/// Build a complete [`Recipe`] from caller-supplied fields.
///
/// `is_taken` reports whether an identifier is already in use. A missing,
/// blank or taken identifier is replaced by a timestamp-based one that
/// `is_taken` rejects.
pub fn normalize_recipe(record: NewRecipe, is_taken: impl Fn(&str) -> bool) -> Recipe {
    let id = match non_blank(record.id) {
        Some(id) if !is_taken(&id) => id,
        _ => generate_id(&is_taken),
    };

    Recipe {
        id,
        name: record.name.unwrap_or_default(),
        category: record.category.unwrap_or_default(),
        area: record.area.unwrap_or_default(),
        instructions: record.instructions.unwrap_or_default(),
        thumbnail: record.thumbnail.unwrap_or_default(),
        cook_time: non_blank(record.cook_time).unwrap_or_else(|| DEFAULT_COOK_TIME.to_string()),
        servings: non_blank(record.servings).unwrap_or_else(|| DEFAULT_SERVINGS.to_string()),
        ingredients: record.ingredients.unwrap_or_default(),
    }
}

/// Normalize one raw `meals` entry from the API.
///
/// Fails when the entry has no `idMeal`; API records are never given a
/// synthetic identifier.
pub fn recipe_from_meal(meal: &Value) -> Result<Recipe, ProviderError> {
    let fields = meal
        .as_object()
        .ok_or(ProviderError::MissingField("idMeal"))?;

    let id = non_blank(text_field(fields, "idMeal")).ok_or(ProviderError::MissingField("idMeal"))?;

    let record = NewRecipe {
        id: Some(id),
        name: text_field(fields, "strMeal"),
        category: text_field(fields, "strCategory"),
        area: text_field(fields, "strArea"),
        instructions: text_field(fields, "strInstructions"),
        thumbnail: text_field(fields, "strMealThumb"),
        cook_time: None,
        servings: None,
        ingredients: Some(extract_ingredients(fields)),
    };

    Ok(normalize_recipe(record, |_| false))
}

/// Scan `strIngredient1..=20` / `strMeasure1..=20`, keeping pairs where
/// both values are non-empty, in index order. Values are stored as sent;
/// the API uses `" "` as a measure for "to taste" style entries.
pub fn extract_ingredients(fields: &Map<String, Value>) -> Vec<IngredientEntry> {
    (1..=MAX_INGREDIENTS)
        .filter_map(|i| {
            let name = non_empty(text_field(fields, &format!("strIngredient{i}")))?;
            let measurement = non_empty(text_field(fields, &format!("strMeasure{i}")))?;
            Some(IngredientEntry { name, measurement })
        })
        .collect()
}

/// Milliseconds since the epoch, bumped until `is_taken` accepts it
fn generate_id(is_taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    loop {
        let id = candidate.to_string();
        if !is_taken(&id) {
            return id;
        }
        candidate += 1;
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_fills_defaults() {
        let recipe = normalize_recipe(
            NewRecipe {
                name: Some("Toast".to_string()),
                cook_time: Some("  ".to_string()),
                ..Default::default()
            },
            |_| false,
        );

        assert!(!recipe.id.is_empty());
        assert_eq!(recipe.name, "Toast");
        assert_eq!(recipe.cook_time, DEFAULT_COOK_TIME);
        assert_eq!(recipe.servings, DEFAULT_SERVINGS);
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_normalize_keeps_supplied_values() {
        let recipe = normalize_recipe(
            NewRecipe {
                id: Some("abc".to_string()),
                cook_time: Some("10 mins".to_string()),
                servings: Some("2".to_string()),
                ingredients: Some(vec![IngredientEntry::new("Bread", "2 slices")]),
                ..Default::default()
            },
            |_| false,
        );

        assert_eq!(recipe.id, "abc");
        assert_eq!(recipe.cook_time, "10 mins");
        assert_eq!(recipe.servings, "2");
        assert_eq!(recipe.ingredients.len(), 1);
    }

    #[test]
    fn test_generated_id_skips_taken_values() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        // Reserve a window wide enough to cover the clock moving during the test
        let taken = |id: &str| {
            id.parse::<u128>()
                .map(|n| n >= now && n < now + 1_000)
                .unwrap_or(false)
        };

        let id = generate_id(taken);
        assert!(!taken(&id));
        assert!(id.parse::<u128>().unwrap() >= now + 1_000);
    }

    #[test]
    fn test_taken_supplied_id_is_replaced() {
        let recipe = normalize_recipe(
            NewRecipe {
                id: Some("52772".to_string()),
                ..Default::default()
            },
            |id| id == "52772",
        );

        assert_ne!(recipe.id, "52772");
        assert!(!recipe.id.is_empty());
    }

    #[test]
    fn test_extract_ingredients_keeps_complete_pairs_in_order() {
        let meal = json!({
            "strIngredient1": "Chicken",
            "strMeasure1": "1 whole",
            "strIngredient2": "Salt",
            "strMeasure2": "",
            "strIngredient3": "",
            "strMeasure3": "1 tsp",
            "strIngredient4": null,
            "strMeasure4": null,
            "strIngredient5": " Garlic ",
            "strMeasure5": "3 cloves",
            "strIngredient20": "Parsley",
            "strMeasure20": "To serve",
            "strIngredient21": "Ignored",
            "strMeasure21": "Ignored"
        });

        let ingredients = extract_ingredients(meal.as_object().unwrap());
        assert_eq!(
            ingredients,
            vec![
                IngredientEntry::new("Chicken", "1 whole"),
                IngredientEntry::new(" Garlic ", "3 cloves"),
                IngredientEntry::new("Parsley", "To serve"),
            ]
        );
    }

    #[test]
    fn test_whitespace_values_count_as_present() {
        let meal = json!({
            "strIngredient1": "Rapeseed Oil",
            "strMeasure1": " ",
            "strIngredient2": " Garlic ",
            "strMeasure2": "3 cloves"
        });

        let ingredients = extract_ingredients(meal.as_object().unwrap());
        assert_eq!(
            ingredients,
            vec![
                IngredientEntry::new("Rapeseed Oil", " "),
                IngredientEntry::new(" Garlic ", "3 cloves"),
            ]
        );
    }

    #[test]
    fn test_recipe_from_meal() {
        let meal = json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350F.",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "",
            "strMeasure2": ""
        });

        let recipe = recipe_from_meal(&meal).unwrap();
        assert_eq!(recipe.id, "52772");
        assert_eq!(recipe.area, "Japanese");
        assert_eq!(recipe.cook_time, DEFAULT_COOK_TIME);
        assert_eq!(recipe.servings, DEFAULT_SERVINGS);
        assert_eq!(
            recipe.ingredients,
            vec![IngredientEntry::new("soy sauce", "3/4 cup")]
        );
    }

    #[test]
    fn test_recipe_from_meal_requires_id() {
        let result = recipe_from_meal(&json!({ "strMeal": "Nameless" }));
        assert!(matches!(result, Err(ProviderError::MissingField("idMeal"))));

        let result = recipe_from_meal(&json!("not an object"));
        assert!(result.is_err());
    }
}
