pub mod seat_map;
pub mod passenger_rules;
pub mod pricing;
pub mod notification;
pub mod gateway;
pub mod workflow;
