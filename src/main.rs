use clap::Parser;
use log::info;

use mealdb_provider::{ProviderConfig, RecipeFilter, RecipeProvider};

#[derive(Parser, Debug)]
#[command(name = "mealdb-provider")]
#[command(about = "Load recipes from TheMealDB and list them")]
#[command(version)]
struct Args {
    /// API root, overrides config.toml / MEALDB__BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Number of leading categories to load
    #[arg(long)]
    category_limit: Option<usize>,

    /// Number of meals to load per category
    #[arg(long)]
    meals: Option<usize>,

    /// Only list recipes in this category
    #[arg(long)]
    category: Option<String>,

    /// Only list recipes whose name contains this text
    #[arg(long, default_value = "")]
    search: String,

    /// Print recipes as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = ProviderConfig::load()?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(limit) = args.category_limit {
        config.category_limit = limit;
    }
    if let Some(meals) = args.meals {
        config.meals_per_category = meals;
    }
    info!("config: {:?}", config);

    let provider = RecipeProvider::from_config(&config)?;
    provider.init().await;

    let recipes = provider.filter_recipes(&RecipeFilter {
        category: args.category,
        query: args.search,
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        for recipe in &recipes {
            println!(
                "{}\t{}\t{}\t{} ingredients",
                recipe.id,
                recipe.name,
                recipe.category,
                recipe.ingredients.len()
            );
        }
        eprintln!(
            "{} recipes across {} categories",
            recipes.len(),
            provider.categories().len()
        );
    }

    Ok(())
}
