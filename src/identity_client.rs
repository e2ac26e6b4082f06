//! identity_client.rs
//!
//! Client for the national identity registry (RENIEC) and the indicator state
//! shown next to the lookup button.
//!
//! The indicator has exactly three states {idle, success, error}. Not-found and
//! transport failures both render as `Error`. Every finished lookup starts its own
//! 3 second timer that returns the indicator to idle; timers are never cancelled,
//! so an older timer may clear the message of a newer lookup.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{error, info, warn};

use crate::config::IdentityConfig;
use crate::error::{LookupError, ValidationError};
use crate::models::PersonRecord;

pub const DNI_LENGTH: usize = 8;
pub const MESSAGE_WINDOW: Duration = Duration::from_millis(3000);

/// Format check only, no network.
pub fn validate_dni(dni: &str) -> bool {
    dni.len() == DNI_LENGTH && dni.bytes().all(|b| b.is_ascii_digit())
}

#[async_trait]
pub trait IdentityLookup: Send + Sync {
    fn validate(&self, dni: &str) -> bool {
        validate_dni(dni)
    }

    /// Resolves `dni` to a person. Callers must validate first.
    async fn lookup(&self, dni: &str) -> Result<PersonRecord, LookupError>;
}

/// HTTP client for the registry service.
#[derive(Clone)]
pub struct ReniecClient {
    base_url: String,
    api_token: Option<String>,
    http_client: reqwest::Client,
}

impl ReniecClient {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_token.clone())
    }
}

#[async_trait]
impl IdentityLookup for ReniecClient {
    async fn lookup(&self, dni: &str) -> Result<PersonRecord, LookupError> {
        if !validate_dni(dni) {
            return Err(ValidationError::MalformedNationalId.into());
        }

        let mut request = self.http_client.get(format!("{}/dni/{}", self.base_url, dni));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!("Identity lookup failed: {:?}", e);
            LookupError::Transport(e)
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            info!("No registry record for dni={}", dni);
            return Err(LookupError::NotFound);
        }

        let person = response
            .error_for_status()?
            .json::<PersonRecord>()
            .await?;
        Ok(person)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    Idle,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorState {
    pub status: LookupStatus,
    pub message: String,
    pub loading: bool,
}

impl Default for IndicatorState {
    fn default() -> Self {
        Self { status: LookupStatus::Idle, message: String::new(), loading: false }
    }
}

/// Lookup button state. The rendering layer subscribes and re-reads the latest value.
#[derive(Clone)]
pub struct LookupIndicator {
    state: Arc<watch::Sender<IndicatorState>>,
    clear_after: Duration,
}

impl Default for LookupIndicator {
    fn default() -> Self {
        Self::new(MESSAGE_WINDOW)
    }
}

impl LookupIndicator {
    pub fn new(clear_after: Duration) -> Self {
        let (tx, _) = watch::channel(IndicatorState::default());
        Self { state: Arc::new(tx), clear_after }
    }

    pub fn subscribe(&self) -> watch::Receiver<IndicatorState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> IndicatorState {
        self.state.borrow().clone()
    }

    /// Runs one lookup and updates the indicator. A malformed DNI is reported at
    /// once, without a network call and without starting the clear timer.
    pub async fn consult(
        &self,
        client: &dyn IdentityLookup,
        dni: &str,
    ) -> Result<PersonRecord, LookupError> {
        if !client.validate(dni) {
            let err = ValidationError::MalformedNationalId;
            self.set(LookupStatus::Error, err.to_string(), false);
            return Err(err.into());
        }

        self.set(LookupStatus::Idle, String::new(), true);

        let result = client.lookup(dni).await;
        match &result {
            Ok(_) => self.set(LookupStatus::Success, "Datos obtenidos correctamente".into(), false),
            Err(LookupError::NotFound) => {
                self.set(LookupStatus::Error, "No se encontraron datos para este DNI".into(), false)
            }
            Err(e) => {
                warn!("Registry lookup error for dni={}: {}", dni, e);
                self.set(LookupStatus::Error, "Error al consultar RENIEC".into(), false)
            }
        }

        self.schedule_clear();
        result
    }

    fn set(&self, status: LookupStatus, message: String, loading: bool) {
        self.state.send_replace(IndicatorState { status, message, loading });
    }

    fn schedule_clear(&self) {
        let state = self.state.clone();
        let delay = self.clear_after;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_modify(|s| {
                s.status = LookupStatus::Idle;
                s.message.clear();
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::models::Sex;

    fn person() -> PersonRecord {
        PersonRecord {
            dni: "45678912".into(),
            nombres: "ROSA ELENA".into(),
            apellido_paterno: "TORRES".into(),
            apellido_materno: "VEGA".into(),
            fecha_nacimiento: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            sexo: Sex::Female,
        }
    }

    struct StubLookup {
        found: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityLookup for StubLookup {
        async fn lookup(&self, _dni: &str) -> Result<PersonRecord, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.found {
                Ok(person())
            } else {
                Err(LookupError::NotFound)
            }
        }
    }

    #[test]
    fn test_validate_dni() {
        assert!(validate_dni("45678912"));
        assert!(!validate_dni("4567891"));
        assert!(!validate_dni("456789123"));
        assert!(!validate_dni("4567891a"));
        assert!(!validate_dni(""));
    }

    #[tokio::test]
    async fn test_malformed_dni_never_calls_lookup() {
        let stub = StubLookup { found: true, calls: AtomicUsize::new(0) };
        let indicator = LookupIndicator::default();

        let result = indicator.consult(&stub, "1234567").await;

        assert!(matches!(result, Err(LookupError::Invalid(ValidationError::MalformedNationalId))));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
        assert_eq!(indicator.current().status, LookupStatus::Error);
        assert_eq!(indicator.current().message, "DNI debe tener 8 dígitos");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_clears_after_three_seconds() {
        let stub = StubLookup { found: true, calls: AtomicUsize::new(0) };
        let indicator = LookupIndicator::default();

        indicator.consult(&stub, "45678912").await.unwrap();
        assert_eq!(indicator.current().status, LookupStatus::Success);
        assert!(!indicator.current().loading);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(indicator.current().status, LookupStatus::Success);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(indicator.current(), IndicatorState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_renders_as_error() {
        let stub = StubLookup { found: false, calls: AtomicUsize::new(0) };
        let indicator = LookupIndicator::default();

        let result = indicator.consult(&stub, "45678912").await;
        assert!(matches!(result, Err(LookupError::NotFound)));
        assert_eq!(indicator.current().status, LookupStatus::Error);
        assert_eq!(indicator.current().message, "No se encontraron datos para este DNI");
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_timer_is_not_cancelled_by_second_lookup() {
        let stub = StubLookup { found: true, calls: AtomicUsize::new(0) };
        let indicator = LookupIndicator::default();

        indicator.consult(&stub, "45678912").await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        indicator.consult(&stub, "45678912").await.unwrap();

        // First timer fires at t=3s and clears the second lookup's message too.
        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert_eq!(indicator.current().status, LookupStatus::Idle);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reniec_client_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dni/45678912"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "dni": "45678912",
                "nombres": "ROSA ELENA",
                "apellidoPaterno": "TORRES",
                "apellidoMaterno": "VEGA",
                "fechaNacimiento": "1990-04-12",
                "sexo": "F"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReniecClient::new(server.uri(), Some("secret".into()));
        let found = client.lookup("45678912").await.unwrap();
        assert_eq!(found, person());
    }

    #[tokio::test]
    async fn test_reniec_client_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dni/11111111"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ReniecClient::new(server.uri(), None);
        assert!(matches!(client.lookup("11111111").await, Err(LookupError::NotFound)));
    }
}
