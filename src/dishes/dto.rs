use serde::{Deserialize, Serialize};

use super::repo::Dish;
use crate::catalog::repo::Product;

#[derive(Debug, Clone, Deserialize)]
pub struct NewDish {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub ingredients: Vec<NewDishIngredient>,
}

/// Ingredient mass is taken as given, already in grams; no unit conversion
/// happens at the dish layer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDishIngredient {
    pub product_name: String,
    pub weight_g: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientLink {
    pub product: Product,
    pub weight_g: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DishWithIngredients {
    #[serde(flatten)]
    pub dish: Dish,
    pub ingredients: Vec<IngredientLink>,
}
