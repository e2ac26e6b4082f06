//! gateway.rs
//!
//! REST client for the booking backend.
//!
//! Every call is a single request/response exchange: no retry and no backoff.
//! The bearer token is injected at construction and attached when present;
//! without one the calls go out unauthenticated and the backend decides.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{error, info, warn};
use validator::Validate;

use crate::config::BackendConfig;
use crate::error::{GatewayError, ValidationError};
use crate::models::{
    BookingDraft, CustomerProfile, DashboardStatistics, PassengerRecord, PaymentMethod, Route,
    SearchFilters, SeatNumber, Sex, Trip,
};

const SUBMIT_FALLBACK_MESSAGE: &str = "Error al guardar pasaje";
const REGISTER_FALLBACK_MESSAGE: &str = "Error al registrar cliente";

#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Persists the booking and returns the ids of the created tickets.
    async fn submit(&self, draft: &BookingDraft) -> Result<Vec<i64>, GatewayError>;
    async fn search_trips(&self, filters: &SearchFilters) -> Result<Vec<Trip>, GatewayError>;
    async fn fetch_occupied_seats(&self, trip_id: i64) -> Result<BTreeSet<SeatNumber>, GatewayError>;
    async fn fetch_routes(&self) -> Result<Vec<Route>, GatewayError>;
    async fn register_customer(&self, customer: &CustomerProfile) -> Result<i64, GatewayError>;
    async fn fetch_statistics(&self) -> Result<DashboardStatistics, GatewayError>;
}

// --- Wire models ---

/// One passenger of `POST /pasajes`.
#[derive(Debug, Serialize)]
struct PassengerPayload<'a> {
    asiento: SeatNumber,
    nombre: &'a str,
    apellidos: &'a str,
    dni: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    edad: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    genero: Option<Sex>,
    telefono: &'a str,
    #[serde(flatten)]
    pet: PetFields<'a>,
    #[serde(flatten)]
    guardian: GuardianFields<'a>,
}

#[derive(Debug, Default, Serialize)]
struct PetFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    viaja_con_mascota: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tipo_mascota: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nombre_mascota: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peso_mascota: Option<f64>,
}

impl<'a> PetFields<'a> {
    fn of(p: &'a PassengerRecord) -> Self {
        if !p.travels_with_pet {
            return Self::default();
        }
        Self {
            viaja_con_mascota: Some(true),
            tipo_mascota: p.pet.pet_type.as_deref(),
            nombre_mascota: Some(p.pet.name.as_str()),
            peso_mascota: p.pet.weight_kg,
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct GuardianFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tutor_nombre: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tutor_dni: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permiso_notarial: Option<bool>,
}

impl<'a> GuardianFields<'a> {
    fn of(p: &'a PassengerRecord) -> Self {
        if !p.minor {
            return Self::default();
        }
        if p.notarial_permission {
            Self { permiso_notarial: Some(true), ..Self::default() }
        } else {
            Self {
                tutor_nombre: Some(p.guardian_name.as_str()),
                tutor_dni: Some(p.guardian_id.as_str()),
                permiso_notarial: Some(false),
            }
        }
    }
}

/// Body of `POST /pasajes`. The top-level customer, contact, pet and guardian
/// fields come from the first passenger (in seat order) they apply to; the full
/// per-seat detail travels in `pasajeros`.
#[derive(Debug, Serialize)]
pub(crate) struct BookingRequest<'a> {
    viaje_codigo: i64,
    cliente: CustomerProfile,
    asientos: &'a [SeatNumber],
    metodo_pago: PaymentMethod,
    telefono_contacto: &'a str,
    #[serde(flatten)]
    pet: PetFields<'a>,
    #[serde(flatten)]
    guardian: GuardianFields<'a>,
    pasajeros: Vec<PassengerPayload<'a>>,
}

impl<'a> BookingRequest<'a> {
    pub(crate) fn from_draft(draft: &'a BookingDraft) -> Result<Self, ValidationError> {
        let passengers: Vec<(SeatNumber, &PassengerRecord)> = draft.passengers_in_seat_order().collect();
        let (_, primary) = passengers
            .first()
            .copied()
            .ok_or(ValidationError::SelectionSize { selected: 0, required: draft.seats.len().max(1) })?;

        let pet = passengers
            .iter()
            .copied()
            .find(|(_, p)| p.travels_with_pet)
            .map(|(_, p)| PetFields::of(p))
            .unwrap_or_default();
        let guardian = passengers
            .iter()
            .copied()
            .find(|(_, p)| p.minor)
            .map(|(_, p)| GuardianFields::of(p))
            .unwrap_or_default();

        let pasajeros = passengers
            .iter()
            .copied()
            .map(|(seat, p)| PassengerPayload {
                asiento: seat,
                nombre: &p.name,
                apellidos: &p.surnames,
                dni: &p.national_id,
                edad: p.age,
                genero: p.sex,
                telefono: &p.phone,
                pet: PetFields::of(p),
                guardian: GuardianFields::of(p),
            })
            .collect();

        Ok(Self {
            viaje_codigo: draft.trip.code,
            cliente: CustomerProfile::from_passenger(primary),
            asientos: &draft.seats,
            metodo_pago: draft.payment_method,
            telefono_contacto: &primary.phone,
            pet,
            guardian,
            pasajeros,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BookingResponse {
    pasajes: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct CustomerResponse {
    #[serde(rename = "clienteId")]
    cliente_id: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct TripQuery<'a> {
    origen: &'a str,
    destino: &'a str,
    fecha: String,
}

/// HTTP implementation of [`BookingGateway`].
#[derive(Clone)]
pub struct HttpBookingGateway {
    base_url: String,
    auth_token: Option<String>,
    http_client: reqwest::Client,
}

impl HttpBookingGateway {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.base_url.clone(), config.auth_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, GatewayError> {
        self.authorized(request).send().await.map_err(|e| {
            error!("Backend request '{}' failed: {:?}", what, e);
            GatewayError::Transport(e)
        })
    }

    /// Decodes a 2xx body, or turns the backend's `{message}` into `Rejected`.
    async fn read<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.json::<ErrorResponse>().await.unwrap_or_default();
        let message = body.message.unwrap_or_else(|| fallback.to_string());
        warn!("Backend rejected request: status={}, message={}", status, message);
        Err(GatewayError::Rejected { status: status.as_u16(), message })
    }
}

#[async_trait]
impl BookingGateway for HttpBookingGateway {
    async fn submit(&self, draft: &BookingDraft) -> Result<Vec<i64>, GatewayError> {
        let body = BookingRequest::from_draft(draft)?;
        info!("Submitting booking: trip={}, seats={:?}", draft.trip.code, draft.seats);

        let response = self.send(self.http_client.post(self.url("/pasajes")).json(&body), "pasajes").await?;
        let saved: BookingResponse = Self::read(response, SUBMIT_FALLBACK_MESSAGE).await?;

        info!("Booking saved: pasajes={:?}", saved.pasajes);
        Ok(saved.pasajes)
    }

    async fn search_trips(&self, filters: &SearchFilters) -> Result<Vec<Trip>, GatewayError> {
        let query = TripQuery {
            origen: &filters.origin,
            destino: &filters.destination,
            fecha: filters.date.format("%Y-%m-%d").to_string(),
        };
        let request = self.http_client.get(self.url("/viajes/buscar")).query(&query);
        let response = self.send(request, "viajes/buscar").await?;
        Self::read(response, "Error obteniendo viajes").await
    }

    async fn fetch_occupied_seats(&self, trip_id: i64) -> Result<BTreeSet<SeatNumber>, GatewayError> {
        let request = self.http_client.get(self.url(&format!("/viajes/{}/asientos", trip_id)));
        let response = self.send(request, "viajes/asientos").await?;
        let seats: Vec<SeatNumber> = Self::read(response, "Error obteniendo asientos").await?;
        Ok(seats.into_iter().collect())
    }

    async fn fetch_routes(&self) -> Result<Vec<Route>, GatewayError> {
        let response = self.send(self.http_client.get(self.url("/rutas")), "rutas").await?;
        Self::read(response, "Error obteniendo rutas").await
    }

    async fn register_customer(&self, customer: &CustomerProfile) -> Result<i64, GatewayError> {
        customer
            .validate()
            .map_err(|e| ValidationError::InvalidCustomer(e.to_string()))?;

        info!("Registering customer dni={}", customer.dni);
        let request = self.http_client.post(self.url("/clientes")).json(customer);
        let response = self.send(request, "clientes").await?;
        let created: CustomerResponse = Self::read(response, REGISTER_FALLBACK_MESSAGE).await?;
        Ok(created.cliente_id)
    }

    async fn fetch_statistics(&self) -> Result<DashboardStatistics, GatewayError> {
        let request = self.http_client.get(self.url("/dashboard/estadisticas"));
        let response = self.send(request, "dashboard/estadisticas").await?;
        Self::read(response, "Error obteniendo estadísticas").await
    }
}
