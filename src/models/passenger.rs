use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::seat::Sex;
use crate::services::passenger_rules::ADULT_AGE;

/// Person as resolved by the national identity registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub dni: String,
    pub nombres: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub fecha_nacimiento: NaiveDate,
    pub sexo: Sex,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetDetails {
    pub pet_type: Option<String>,
    pub name: String,
    pub weight_kg: Option<f64>,
}

/// Form state for one passenger, keyed by seat number in the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassengerRecord {
    pub name: String,
    pub surnames: String,
    pub national_id: String,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub phone: String,
    pub minor: bool,
    pub guardian_name: String,
    pub guardian_id: String,
    pub notarial_permission: bool,
    pub travels_with_pet: bool,
    pub pet: PetDetails,
}

/// A single field change coming from the passenger form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PassengerEdit {
    Name(String),
    Surnames(String),
    NationalId(String),
    Age(Option<u32>),
    Sex(Sex),
    Phone(String),
    GuardianName(String),
    GuardianId(String),
    NotarialPermission(bool),
    TravelsWithPet(bool),
    PetType(String),
    PetName(String),
    PetWeight(f64),
}

impl PassengerRecord {
    /// Returns the record with `edit` applied. Age edits re-derive the minor flag.
    pub fn apply(&self, edit: PassengerEdit) -> Self {
        let mut next = self.clone();
        match edit {
            PassengerEdit::Name(v) => next.name = v,
            PassengerEdit::Surnames(v) => next.surnames = v,
            PassengerEdit::NationalId(v) => next.national_id = v,
            PassengerEdit::Age(age) => next.set_age(age),
            PassengerEdit::Sex(v) => next.sex = Some(v),
            PassengerEdit::Phone(v) => next.phone = v,
            PassengerEdit::GuardianName(v) => next.guardian_name = v,
            PassengerEdit::GuardianId(v) => next.guardian_id = v,
            PassengerEdit::NotarialPermission(v) => next.notarial_permission = v,
            PassengerEdit::TravelsWithPet(v) => next.travels_with_pet = v,
            PassengerEdit::PetType(v) => next.pet.pet_type = Some(v),
            PassengerEdit::PetName(v) => next.pet.name = v,
            PassengerEdit::PetWeight(v) => next.pet.weight_kg = Some(v),
        }
        next
    }

    pub(crate) fn set_age(&mut self, age: Option<u32>) {
        self.age = age;
        self.minor = age.is_some_and(|a| a < ADULT_AGE);
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surnames).trim().to_string()
    }

    pub fn has_phone(&self) -> bool {
        !self.phone.trim().is_empty()
    }
}
