use serde::{Deserialize, Serialize};

/// Macro profile per 100 g (or 100 ml for liquids). Always present on a
/// product; placeholders carry the all-zero profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl NutrientProfile {
    pub const ZERO: NutrientProfile = NutrientProfile {
        calories: 0.0,
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductState {
    Solid,
    Liquid,
}

impl ProductState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductState::Solid => "solid",
            ProductState::Liquid => "liquid",
        }
    }

    pub fn parse(raw: &str) -> ProductState {
        if raw.eq_ignore_ascii_case("liquid") {
            ProductState::Liquid
        } else {
            ProductState::Solid
        }
    }
}

/// Curated creation / seeding input.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub nutrients: NutrientProfile,
    pub state: ProductState,
    #[serde(default)]
    pub average_unit_g: f64,
}
