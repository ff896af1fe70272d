use mealdb_provider::{FetchedRecords, IngredientEntry, MealDbClient, RecipeSource};
use mockito::Matcher;

const CATEGORIES_JSON: &str = r#"{
    "categories": [
        {
            "idCategory": "1",
            "strCategory": "Beef",
            "strCategoryThumb": "https://www.themealdb.com/images/category/beef.png",
            "strCategoryDescription": "Beef is the culinary name for meat from cattle."
        },
        {
            "idCategory": "2",
            "strCategory": "Chicken",
            "strCategoryThumb": "https://www.themealdb.com/images/category/chicken.png",
            "strCategoryDescription": "Chicken is a type of domesticated fowl."
        },
        {
            "idCategory": "3",
            "strCategory": "Dessert",
            "strCategoryThumb": "https://www.themealdb.com/images/category/dessert.png",
            "strCategoryDescription": "Dessert is a course that concludes a meal."
        }
    ]
}"#;

const LOOKUP_JSON: &str = r#"{
    "meals": [
        {
            "idMeal": "52874",
            "strMeal": "Beef and Mustard Pie",
            "strCategory": "Beef",
            "strArea": "British",
            "strInstructions": "Preheat the oven to 150C/300F/Gas 2.",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/sytuqu1511553755.jpg",
            "strIngredient1": "Beef",
            "strMeasure1": "1kg",
            "strIngredient2": "Plain Flour",
            "strMeasure2": "2 tbs",
            "strIngredient3": "Rapeseed Oil",
            "strMeasure3": " ",
            "strIngredient4": "Red Wine",
            "strMeasure4": "200ml",
            "strIngredient5": "",
            "strMeasure5": "",
            "strIngredient6": null,
            "strMeasure6": null
        }
    ]
}"#;

fn client(server: &mockito::Server) -> MealDbClient {
    MealDbClient::new(server.url(), None).unwrap()
}

#[tokio::test]
async fn test_categories_keep_api_count_and_order() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/categories.php")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CATEGORIES_JSON)
        .create_async()
        .await;

    let client = client(&server);
    let url = format!("{}/categories.php", server.url());

    match client.fetch_records(&url).await {
        FetchedRecords::Categories(categories) => {
            let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["Beef", "Chicken", "Dessert"]);
        }
        other => panic!("Expected categories, got {:?}", other),
    }

    let categories = client.categories().await.unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[2].id, "3");
}

#[tokio::test]
async fn test_meals_are_normalized_with_ingredients() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "52874".into()))
        .with_status(200)
        .with_body(LOOKUP_JSON)
        .create_async()
        .await;

    let client = client(&server);
    let url = format!("{}/lookup.php?i=52874", server.url());

    let meals = match client.fetch_records(&url).await {
        FetchedRecords::Meals(meals) => meals,
        other => panic!("Expected meals, got {:?}", other),
    };
    assert_eq!(meals.len(), 1);

    let recipe = &meals[0];
    assert_eq!(recipe.name, "Beef and Mustard Pie");
    assert_eq!(recipe.cook_time, "45 mins");
    assert_eq!(recipe.servings, "4");
    assert_eq!(
        recipe.ingredients,
        vec![
            IngredientEntry::new("Beef", "1kg"),
            IngredientEntry::new("Plain Flour", "2 tbs"),
            IngredientEntry::new("Rapeseed Oil", " "),
            IngredientEntry::new("Red Wine", "200ml"),
        ]
    );

    let looked_up = client.lookup_meal("52874").await.unwrap();
    assert_eq!(&looked_up, recipe);
}

#[tokio::test]
async fn test_category_name_is_percent_encoded() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("c".into(), "Side & Starter".into()))
        .with_status(200)
        .with_body(r#"{"meals": [{"strMeal": "Bread", "strMealThumb": "x.jpg", "idMeal": "7"}]}"#)
        .create_async()
        .await;

    let meals = client(&server)
        .meals_in_category("Side & Starter")
        .await
        .unwrap();

    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0].id, "7");
    m.assert_async().await;
}

#[tokio::test]
async fn test_failures_yield_empty_records() {
    let mut server = mockito::Server::new_async().await;
    let _error = server
        .mock("GET", "/categories.php")
        .with_status(500)
        .create_async()
        .await;
    let _garbage = server
        .mock("GET", "/filter.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = client(&server);

    let records = client
        .fetch_records(&format!("{}/categories.php", server.url()))
        .await;
    assert_eq!(records, FetchedRecords::Empty);

    let records = client
        .fetch_records(&format!("{}/filter.php?c=Beef", server.url()))
        .await;
    assert!(records.is_empty());

    let records = client.fetch_records("not a url").await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_lookup_without_meals_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"meals": null}"#)
        .create_async()
        .await;

    let result = client(&server).lookup_meal("1").await;
    assert!(result.is_err());
}
