//! Completeness rules for passenger records and the mapping from a registry
//! record onto the passenger form.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{PassengerRecord, PersonRecord, PetPolicy};

pub const ADULT_AGE: u32 = 18;
pub const MAX_AGE: u32 = 120;

/// Requirement a record does not yet satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Name,
    Surnames,
    NationalId,
    Age,
    Sex,
    Phone,
    /// Guardian name and ID, or a notarial permit.
    GuardianOrPermit,
    PetsNotOffered,
    PetType,
    PetName,
    PetWeight,
}

/// Uppercases the first letter of every space-delimited token and lowercases the rest.
pub fn format_name(raw: &str) -> String {
    raw.split(' ')
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Whole years elapsed between `birth` and `today`.
pub fn whole_years(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Applies a registry record on top of `record`, keeping contact, guardian and pet fields.
pub fn derive_from_lookup(record: &PassengerRecord, person: &PersonRecord, today: NaiveDate) -> PassengerRecord {
    let mut next = record.clone();
    next.name = format_name(&person.nombres);
    next.surnames = format!(
        "{} {}",
        format_name(&person.apellido_paterno),
        format_name(&person.apellido_materno)
    );
    next.national_id = person.dni.clone();
    next.sex = Some(person.sexo);
    next.set_age(Some(whole_years(person.fecha_nacimiento, today)));
    next
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn missing_fields(record: &PassengerRecord, policy: &PetPolicy, pets_allowed: bool) -> Vec<MissingField> {
    let mut missing = Vec::new();

    if blank(&record.name) {
        missing.push(MissingField::Name);
    }
    if blank(&record.surnames) {
        missing.push(MissingField::Surnames);
    }
    if blank(&record.national_id) {
        missing.push(MissingField::NationalId);
    }
    if !record.age.is_some_and(|age| age <= MAX_AGE) {
        missing.push(MissingField::Age);
    }
    if record.sex.is_none() {
        missing.push(MissingField::Sex);
    }
    if blank(&record.phone) {
        missing.push(MissingField::Phone);
    }

    if record.minor {
        let guardian = !blank(&record.guardian_name) && !blank(&record.guardian_id);
        if !guardian && !record.notarial_permission {
            missing.push(MissingField::GuardianOrPermit);
        }
    }

    if record.travels_with_pet {
        if !pets_allowed {
            missing.push(MissingField::PetsNotOffered);
        }
        if !record.pet.pet_type.as_deref().is_some_and(|t| policy.allows_type(t)) {
            missing.push(MissingField::PetType);
        }
        if blank(&record.pet.name) {
            missing.push(MissingField::PetName);
        }
        if !record.pet.weight_kg.is_some_and(|w| policy.allows_weight(w)) {
            missing.push(MissingField::PetWeight);
        }
    }

    missing
}

pub fn is_complete(record: &PassengerRecord, policy: &PetPolicy, pets_allowed: bool) -> bool {
    missing_fields(record, policy, pets_allowed).is_empty()
}
