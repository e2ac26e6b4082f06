use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::PassengerRecord;

pub const CURRENCY_PREFIX: &str = "S/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

impl LineItem {
    fn new(label: &str, quantity: u32, unit_price: Decimal) -> Result<Self, ValidationError> {
        let amount = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or(ValidationError::AmountOverflow)?;
        Ok(Self { label: label.to_string(), quantity, unit_price, amount })
    }
}

/// Price breakdown. `total` is the exact sum of the line amounts; rounding happens
/// only when formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub lines: Vec<LineItem>,
    pub total: Decimal,
}

impl Quote {
    pub fn display_total(&self) -> String {
        format_amount(self.total)
    }
}

/// Rounds half away from zero to two decimals, e.g. `S/ 0.01` for `0.005`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{} {:.2}", CURRENCY_PREFIX, rounded)
}

pub fn count_with_pet<'a>(passengers: impl IntoIterator<Item = &'a PassengerRecord>) -> u32 {
    passengers.into_iter().filter(|p| p.travels_with_pet).count() as u32
}

/// `seats × fare + pets × surcharge`, or `AmountOverflow` past the decimal range.
pub fn total(seats: u32, fare: Decimal, pets: u32, pet_surcharge: Decimal) -> Result<Decimal, ValidationError> {
    quote(seats, fare, pets, pet_surcharge).map(|q| q.total)
}

pub fn quote(seats: u32, fare: Decimal, pets: u32, pet_surcharge: Decimal) -> Result<Quote, ValidationError> {
    let mut lines = vec![LineItem::new("Pasajes", seats, fare)?];
    if pets > 0 {
        lines.push(LineItem::new("Mascotas", pets, pet_surcharge)?);
    }
    let total = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.amount))
        .ok_or(ValidationError::AmountOverflow)?;
    Ok(Quote { lines, total })
}
