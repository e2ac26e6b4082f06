use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "origen")]
    pub origin: String,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "costo_referencial")]
    pub fare: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "placa", default)]
    pub plate: String,
    #[serde(rename = "num_asientos")]
    pub seat_count: u32,
    #[serde(rename = "petFriendly", default)]
    pub pet_friendly: bool,
}

/// A scheduled journey. Immutable for the duration of a booking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "ruta")]
    pub route: Route,
    pub bus: Bus,
    #[serde(rename = "fecha_hora_salida")]
    pub departure: DateTime<Utc>,
    #[serde(rename = "fecha_hora_llegada_estimada")]
    pub arrival: DateTime<Utc>,
}

impl Trip {
    pub fn fare(&self) -> Decimal {
        self.route.fare
    }

    pub fn seat_count(&self) -> u32 {
        self.bus.seat_count
    }
}

/// Filters chosen on the search step. `passengers` bounds the seat selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(rename = "origen")]
    pub origin: String,
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "pasajeros")]
    pub passengers: usize,
    #[serde(rename = "conMascota", default)]
    pub with_pet: bool,
}

impl SearchFilters {
    /// The pet section is offered when the search asked for it or the bus allows pets.
    pub fn pets_allowed_on(&self, trip: &Trip) -> bool {
        self.with_pet || trip.bus.pet_friendly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_from_backend_json() {
        let json = r#"{
            "codigo": 7,
            "ruta": {"codigo": 1, "origen": "Trujillo", "destino": "Lima", "costo_referencial": 25.5},
            "bus": {"codigo": 3, "placa": "T1A-123", "num_asientos": 40},
            "fecha_hora_salida": "2026-11-02T22:00:00Z",
            "fecha_hora_llegada_estimada": "2026-11-03T06:30:00Z"
        }"#;

        let trip: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.seat_count(), 40);
        assert_eq!(trip.fare(), Decimal::new(255, 1));
        assert!(!trip.bus.pet_friendly);
    }
}
