//! Multi-leg itinerary synthesis
//!
//! Combines two independently fetched one-leg offer sets into connecting
//! itineraries through a stopover city. A pairing is valid when the second
//! leg departs inside the layover window opened by the first leg's arrival.

use crate::amadeus::FlightOffer;
use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

/// Connections tighter than this risk a missed second leg.
pub const MIN_LAYOVER_HOURS: i64 = 2;
/// Anything longer than this no longer counts as a same-trip connection.
pub const MAX_LAYOVER_HOURS: i64 = 8;

/// A two-leg connection priced as the sum of its legs.
///
/// Only produced by [`synthesize`] / [`pair_offers`], which guarantee the
/// second leg departs inside the first leg's layover window.
#[derive(Debug, Clone)]
pub struct MultiLegOption {
    pub first_leg: FlightOffer,
    pub second_leg: FlightOffer,
    pub total_price: Decimal,
}

/// The window of acceptable second-leg departures after a first-leg
/// arrival, both ends inclusive.
pub fn layover_window(arrival: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    (
        arrival + Duration::hours(MIN_LAYOVER_HOURS),
        arrival + Duration::hours(MAX_LAYOVER_HOURS),
    )
}

/// Cross-join two one-leg offer sets into every valid connection.
///
/// Offers missing itinerary or segment data are skipped on either side.
/// All valid pairings are kept, including several sharing the same first or
/// second leg.
pub fn synthesize(
    first_legs: &[FlightOffer],
    second_legs: &[FlightOffer],
) -> Vec<MultiLegOption> {
    let mut options = Vec::new();
    for first in first_legs {
        options.extend(pair_offers(first, second_legs));
    }
    options
}

/// Pair one first-leg candidate against a second-leg offer set.
pub fn pair_offers(first: &FlightOffer, second_legs: &[FlightOffer]) -> Vec<MultiLegOption> {
    let Some(arrival) = first.last_segment().map(|segment| segment.arrival.at) else {
        return Vec::new();
    };
    let (window_start, window_end) = layover_window(arrival);

    second_legs
        .iter()
        .filter_map(|second| {
            let departure = second.first_segment()?.departure.at;
            if (window_start..=window_end).contains(&departure) {
                Some(MultiLegOption {
                    first_leg: first.clone(),
                    second_leg: second.clone(),
                    total_price: first.price.total + second.price.total,
                })
            } else {
                None
            }
        })
        .collect()
}
