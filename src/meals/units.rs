//! Standardization of entered quantities into mass-equivalent grams.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Grams,
    Kilograms,
    Milliliters,
    Liters,
    Piece,
    Cup,
    Tablespoon,
    Teaspoon,
    Slice,
    Unknown,
}

impl Unit {
    pub fn parse(raw: &str) -> Unit {
        match raw.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Unit::Grams,
            "kg" | "kilogram" | "kilograms" => Unit::Kilograms,
            "ml" | "milliliter" | "milliliters" => Unit::Milliliters,
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liters,
            "piece" | "pieces" | "pc" | "pcs" | "szt" => Unit::Piece,
            "cup" | "cups" => Unit::Cup,
            "tbsp" | "tablespoon" | "tablespoons" => Unit::Tablespoon,
            "tsp" | "teaspoon" | "teaspoons" => Unit::Teaspoon,
            "slice" | "slices" => Unit::Slice,
            _ => Unit::Unknown,
        }
    }
}

const CUP_G: f64 = 240.0;
const TBSP_G: f64 = 15.0;
const TSP_G: f64 = 5.0;
const SLICE_G: f64 = 25.0;

/// Converts an entered quantity into mass-equivalent grams. Milliliters
/// count 1:1. Piece units need the product's average single-unit mass; when
/// the product is unknown or has none recorded, the raw amount passes
/// through, as it does for units we do not recognize.
pub fn standardized_grams(amount: f64, unit: &str, average_unit_g: Option<f64>) -> f64 {
    match Unit::parse(unit) {
        Unit::Grams | Unit::Milliliters => amount,
        Unit::Kilograms | Unit::Liters => amount * 1000.0,
        Unit::Cup => amount * CUP_G,
        Unit::Tablespoon => amount * TBSP_G,
        Unit::Teaspoon => amount * TSP_G,
        Unit::Slice => amount * SLICE_G,
        Unit::Piece => match average_unit_g {
            Some(g) if g > 0.0 => amount * g,
            _ => amount,
        },
        Unit::Unknown => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grams_and_milliliters_pass_through() {
        assert_eq!(standardized_grams(150.0, "g", None), 150.0);
        assert_eq!(standardized_grams(250.0, "ml", None), 250.0);
    }

    #[test]
    fn metric_multiples_scale_to_grams() {
        assert_eq!(standardized_grams(1.5, "kg", None), 1500.0);
        assert_eq!(standardized_grams(0.5, "l", None), 500.0);
    }

    #[test]
    fn kitchen_measures_use_fixed_masses() {
        assert_eq!(standardized_grams(2.0, "cup", None), 480.0);
        assert_eq!(standardized_grams(3.0, "tbsp", None), 45.0);
        assert_eq!(standardized_grams(1.0, "tsp", None), 5.0);
        assert_eq!(standardized_grams(2.0, "slice", None), 50.0);
    }

    #[test]
    fn piece_uses_average_unit_mass() {
        assert_eq!(standardized_grams(2.0, "piece", Some(180.0)), 360.0);
    }

    #[test]
    fn piece_without_average_mass_falls_back_to_raw_amount() {
        assert_eq!(standardized_grams(2.0, "piece", None), 2.0);
        assert_eq!(standardized_grams(2.0, "piece", Some(0.0)), 2.0);
    }

    #[test]
    fn unrecognized_units_pass_through() {
        assert_eq!(standardized_grams(120.0, "portion", None), 120.0);
    }

    #[test]
    fn unit_parsing_ignores_case_and_whitespace() {
        assert_eq!(Unit::parse("  Grams "), Unit::Grams);
        assert_eq!(Unit::parse("PCS"), Unit::Piece);
        assert_eq!(Unit::parse("Tablespoons"), Unit::Tablespoon);
    }
}
