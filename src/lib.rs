//! # Farehopper
//!
//! A flight-itinerary search assistant built on the Amadeus flight-offers
//! search API. Supports single-date and date-range searches, optional
//! two-leg itineraries synthesized through a stopover city, price-ordered
//! results, and Kayak deep links for booking.

pub mod amadeus;
pub mod link;
pub mod ranking;
pub mod search;
pub mod synthesis;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export main types for convenience
pub use amadeus::{AmadeusClient, FlightOffer, FlightSegment, Itinerary, OfferSearchRequest};
pub use link::kayak_link;
pub use ranking::{rank, RankedOption, TripOption};
pub use search::FlightSearch;
pub use synthesis::{synthesize, MultiLegOption};

/// Error types for the farehopper library
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Amadeus API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Token request rejected: {0}")]
    Token(String),

    #[error("AMADEUS_CLIENT_ID / AMADEUS_CLIENT_SECRET must be set")]
    MissingCredentials,
}

/// Full passenger composition as collected from the user.
///
/// Kayak distinguishes seniors, students, infants (lap or seated) and two
/// child age bands; the Amadeus search API only knows adults, children and
/// infants. [`PassengerBreakdown::normalize`] folds the former into the
/// latter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerBreakdown {
    pub adults: u32,
    pub seniors: u32,
    pub students: u32,
    pub infants_lap: u32,
    pub infants_seat: u32,
    pub children_under_11: u32,
    pub children_under_17: u32,
}

impl Default for PassengerBreakdown {
    fn default() -> Self {
        Self {
            adults: 1,
            seniors: 0,
            students: 0,
            infants_lap: 0,
            infants_seat: 0,
            children_under_11: 0,
            children_under_17: 0,
        }
    }
}

impl PassengerBreakdown {
    /// Total number of travelers across every category.
    pub fn total(&self) -> u32 {
        self.adults
            + self.seniors
            + self.students
            + self.infants_lap
            + self.infants_seat
            + self.children_under_11
            + self.children_under_17
    }

    /// Collapse the full breakdown into the coarse counts the search API
    /// accepts. Pure and total: seniors and students fly as adults, both
    /// child age bands count as children, and infants are infants whether
    /// seated or on a lap.
    pub fn normalize(&self) -> SearchPassengers {
        SearchPassengers {
            adults: self.adults + self.seniors + self.students,
            children: self.children_under_11 + self.children_under_17,
            infants: self.infants_lap + self.infants_seat,
        }
    }
}

/// Coarse passenger counts accepted by the flight-offers search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPassengers {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}
