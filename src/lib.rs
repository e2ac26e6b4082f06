pub mod config;
pub mod controllers;
pub mod error;
pub mod identity_client;
pub mod models;
pub mod services;

use std::sync::Arc;

use identity_client::{IdentityLookup, ReniecClient};
use models::PetPolicy;
use services::gateway::{BookingGateway, HttpBookingGateway};

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub gateway: Arc<dyn BookingGateway>,
    pub identity: Arc<dyn IdentityLookup>,
    pub pet_policy: PetPolicy,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let gateway = Arc::new(HttpBookingGateway::from_config(&config.backend));
        let identity = Arc::new(ReniecClient::from_config(&config.identity));
        Arc::new(Self::with_collaborators(config, gateway, identity))
    }

    pub fn with_collaborators(
        config: config::Config,
        gateway: Arc<dyn BookingGateway>,
        identity: Arc<dyn IdentityLookup>,
    ) -> Self {
        Self { config, gateway, identity, pet_policy: PetPolicy::default() }
    }
}
