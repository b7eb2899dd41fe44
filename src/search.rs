//! Search driver
//!
//! Runs the per-day pipeline (direct or stopover), pools date-range results,
//! and contains every fetch failure at the smallest enclosing unit: a failed
//! leg or day is logged and contributes no options, never an error.

use crate::amadeus::{AmadeusClient, OfferSearchRequest};
use crate::ranking::{pool_days, rank, RankedOption};
use crate::synthesis::{layover_window, pair_offers, MultiLegOption};
use crate::PassengerBreakdown;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

/// Result cap for a plain origin→destination search.
const DIRECT_RESULT_LIMIT: u32 = 10;
/// Result cap per leg when synthesizing through a stopover.
const LEG_RESULT_LIMIT: u32 = 5;

/// A configured search: route, passengers, and optional stopover and price
/// cap. Drives the client one call at a time; nothing runs in parallel.
pub struct FlightSearch {
    client: AmadeusClient,
    pub origin: String,
    pub destination: String,
    pub stopover: Option<String>,
    pub passengers: PassengerBreakdown,
    pub max_price: Option<Decimal>,
}

impl FlightSearch {
    pub fn new(
        client: AmadeusClient,
        origin: String,
        destination: String,
        passengers: PassengerBreakdown,
    ) -> Self {
        Self {
            client,
            origin,
            destination,
            stopover: None,
            passengers,
            max_price: None,
        }
    }

    /// Synthesize two-leg itineraries through this city instead of
    /// searching the route directly.
    pub fn with_stopover(mut self, stopover: Option<String>) -> Self {
        self.stopover = stopover;
        self
    }

    /// Drop options costing more than this (inclusive cap).
    pub fn with_max_price(mut self, max_price: Option<Decimal>) -> Self {
        self.max_price = max_price;
        self
    }

    /// Run the whole pipeline for one departure date and return the ranked
    /// options, cheapest first.
    pub async fn search_date(&self, date: NaiveDate) -> Vec<RankedOption> {
        if let Some(stopover) = self.stopover.clone() {
            let multi_leg = self.multi_leg_options(&stopover, date).await;
            rank(Vec::new(), multi_leg, self.max_price)
        } else {
            let request = OfferSearchRequest::new(
                &self.origin,
                &self.destination,
                date,
                self.passengers.normalize(),
            )
            .with_limit(DIRECT_RESULT_LIMIT);

            let offers = match self.client.search_offers(&request).await {
                Ok(offers) => offers,
                Err(err) => {
                    error!(%date, error = %err, "Direct offer search failed");
                    Vec::new()
                }
            };
            rank(offers, Vec::new(), self.max_price)
        }
    }

    /// Search every day in `[start, end]` and pool the results into one
    /// globally price-ordered list. Each option keeps the date it was found
    /// on. Days run strictly one after another.
    pub async fn search_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<RankedOption> {
        let mut days = Vec::new();
        let mut date = start;
        while date <= end {
            info!(%date, "Searching flights");
            days.push((date, self.search_date(date).await));
            date = date + Duration::days(1);
        }
        pool_days(days)
    }

    /// Fetch both legs and synthesize the valid connections.
    ///
    /// The second leg is fetched once per first-leg candidate, dated by the
    /// calendar day on which that candidate's layover window opens. A window
    /// crossing midnight is still queried under the opening day only, so
    /// next-day departures inside the window can be missed.
    async fn multi_leg_options(&self, stopover: &str, date: NaiveDate) -> Vec<MultiLegOption> {
        let first_request =
            OfferSearchRequest::new(&self.origin, stopover, date, self.passengers.normalize())
                .with_limit(LEG_RESULT_LIMIT);

        let first_legs = match self.client.search_offers(&first_request).await {
            Ok(offers) => offers,
            Err(err) => {
                error!(%date, stopover, error = %err, "First-leg search failed");
                return Vec::new();
            }
        };

        let mut options = Vec::new();
        for first in &first_legs {
            // Offers without itinerary data cannot anchor a window.
            let Some(arrival) = first.last_segment().map(|segment| segment.arrival.at) else {
                continue;
            };
            let (window_start, _) = layover_window(arrival);

            let second_request = OfferSearchRequest::new(
                stopover,
                &self.destination,
                window_start.date(),
                self.passengers.normalize(),
            )
            .with_limit(LEG_RESULT_LIMIT);

            let second_legs = match self.client.search_offers(&second_request).await {
                Ok(offers) => offers,
                Err(err) => {
                    warn!(
                        stopover,
                        error = %err,
                        "Second-leg search failed, skipping this candidate"
                    );
                    continue;
                }
            };

            options.extend(pair_offers(first, &second_legs));
        }
        options
    }
}
