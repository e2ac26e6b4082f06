use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Constraints applied to any passenger travelling with an animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetPolicy {
    pub max_weight_kg: f64,
    pub allowed_types: Vec<String>,
    pub surcharge: Decimal,
    pub certificate_required: bool,
}

impl Default for PetPolicy {
    fn default() -> Self {
        Self {
            max_weight_kg: 8.0,
            allowed_types: vec!["Perro".to_string(), "Gato".to_string()],
            surcharge: Decimal::new(1500, 2),
            certificate_required: true,
        }
    }
}

impl PetPolicy {
    pub fn allows_type(&self, pet_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == pet_type)
    }

    pub fn allows_weight(&self, weight_kg: f64) -> bool {
        weight_kg > 0.0 && weight_kg <= self.max_weight_kg
    }
}
