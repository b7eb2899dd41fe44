//! HTTP client for the Amadeus flight-offers search API
//!
//! Handles the OAuth2 client-credentials handshake, keeps the access token
//! cached until shortly before it expires, and exposes a single
//! [`AmadeusClient::search_offers`] call returning typed offers.

use crate::{SearchError, SearchPassengers};
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Sandbox host: limited inventory, free request quota.
pub const TEST_BASE_URL: &str = "https://test.api.amadeus.com";
/// Live host.
pub const PRODUCTION_BASE_URL: &str = "https://api.amadeus.com";

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const OFFER_SEARCH_PATH: &str = "/v2/shopping/flight-offers";

/// Parameters for one one-leg offer search.
///
/// Every field the API call needs is spelled out here; the query string is
/// built from these and nothing else.
#[derive(Debug, Clone)]
pub struct OfferSearchRequest {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub currency: String,
    pub limit: u32,
    pub passengers: SearchPassengers,
}

impl OfferSearchRequest {
    /// New request with the default currency (EUR) and result cap (10).
    pub fn new(
        origin: &str,
        destination: &str,
        date: NaiveDate,
        passengers: SearchPassengers,
    ) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date,
            currency: "EUR".to_string(),
            limit: 10,
            passengers,
        }
    }

    /// Cap the number of offers the API returns.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    fn query_params(&self) -> [(&'static str, String); 8] {
        [
            ("originLocationCode", self.origin.clone()),
            ("destinationLocationCode", self.destination.clone()),
            ("departureDate", self.date.format("%Y-%m-%d").to_string()),
            ("currencyCode", self.currency.clone()),
            ("max", self.limit.to_string()),
            ("adults", self.passengers.adults.to_string()),
            ("children", self.passengers.children.to_string()),
            ("infants", self.passengers.infants.to_string()),
        ]
    }
}

/// One priced offer returned by the search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOffer {
    pub price: OfferPrice,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

impl FlightOffer {
    /// First segment of the first itinerary. Only the first itinerary is
    /// ever consulted; offers without one yield `None`.
    pub fn first_segment(&self) -> Option<&FlightSegment> {
        self.itineraries.first()?.segments.first()
    }

    /// Last segment of the first itinerary.
    pub fn last_segment(&self) -> Option<&FlightSegment> {
        self.itineraries.first()?.segments.last()
    }
}

/// Offer price total. The API quotes totals as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferPrice {
    pub total: Decimal,
    pub currency: String,
}

/// One stop-chain within a leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub segments: Vec<FlightSegment>,
}

/// A single flight within an itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegment {
    pub carrier_code: String,
    pub departure: SegmentPoint,
    pub arrival: SegmentPoint,
}

/// Airport and local timestamp at one end of a segment.
///
/// The API emits offset-less local times (`2024-06-01T09:35:00`); they are
/// kept and compared as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPoint {
    pub iata_code: String,
    pub at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct OfferSearchResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    title: Option<String>,
    detail: Option<String>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Client for the Amadeus self-service APIs.
pub struct AmadeusClient {
    http: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    /// Create a client against the sandbox host.
    pub fn new(client_id: String, client_secret: String) -> Result<Self, SearchError> {
        Self::with_base_url(client_id, client_secret, TEST_BASE_URL)
    }

    /// Create a client against a specific API host.
    pub fn with_base_url(
        client_id: String,
        client_secret: String,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        debug!(base_url, "Creating Amadeus client");
        let http = Client::builder()
            .user_agent(concat!("farehopper/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
            token: Mutex::new(None),
        })
    }

    /// Create a client from `AMADEUS_CLIENT_ID` / `AMADEUS_CLIENT_SECRET`.
    pub fn from_env(base_url: &str) -> Result<Self, SearchError> {
        let client_id =
            std::env::var("AMADEUS_CLIENT_ID").map_err(|_| SearchError::MissingCredentials)?;
        let client_secret =
            std::env::var("AMADEUS_CLIENT_SECRET").map_err(|_| SearchError::MissingCredentials)?;
        Self::with_base_url(client_id, client_secret, base_url)
    }

    /// Return a valid access token, fetching a fresh one when the cached
    /// token is missing or about to expire.
    async fn access_token(&self) -> Result<String, SearchError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting fresh access token");
        let response = self
            .http
            .post(format!("{}{}", self.base_url, TOKEN_PATH))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Token(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body_preview(&body)
            )));
        }

        let token: TokenResponse = response.json().await?;
        let value = token.access_token.clone();
        // Refresh 30s early so a token never dies mid-search.
        let expires_at = Instant::now() + Duration::from_secs(token.expires_in.saturating_sub(30));
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at,
        });
        Ok(value)
    }

    /// Run one flight-offers search.
    ///
    /// Returns the offers in API order (cheapest first). Non-success
    /// responses become [`SearchError::Api`] with whatever detail the error
    /// body carries.
    #[instrument(
        level = "info",
        skip(self, request),
        fields(
            origin = %request.origin,
            destination = %request.destination,
            date = %request.date,
        )
    )]
    pub async fn search_offers(
        &self,
        request: &OfferSearchRequest,
    ) -> Result<Vec<FlightOffer>, SearchError> {
        let token = self.access_token().await?;

        debug!(limit = request.limit, "Requesting flight offers");
        let start_time = Instant::now();
        let response = self
            .http
            .get(format!("{}{}", self.base_url, OFFER_SEARCH_PATH))
            .bearer_auth(token)
            .query(&request.query_params())
            .send()
            .await?;

        let status = response.status();
        info!(
            status = %status,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Offer search completed"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(&body);
            error!(status = %status, detail = %detail, "Offer search rejected");
            return Err(SearchError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: OfferSearchResponse = response.json().await?;
        debug!(offers = parsed.data.len(), "Parsed offer search response");
        Ok(parsed.data)
    }
}

/// Pull the human-readable detail out of an API error body, falling back to
/// a preview of the raw payload.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .into_iter()
            .map(|e| {
                e.detail
                    .or(e.title)
                    .unwrap_or_else(|| "unknown error".to_string())
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => body_preview(body),
    }
}

fn body_preview(body: &str) -> String {
    body.chars().take(200).collect()
}
