//! Price ranking and filtering of search results

use crate::amadeus::FlightOffer;
use crate::synthesis::MultiLegOption;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A single bookable search result.
#[derive(Debug, Clone)]
pub enum TripOption {
    /// One offer straight from the search API.
    Direct(FlightOffer),
    /// Two independently priced legs through a stopover.
    MultiLeg(MultiLegOption),
}

/// A trip option annotated with its price, ordered among its peers.
#[derive(Debug, Clone)]
pub struct RankedOption {
    pub option: TripOption,
    pub price: Decimal,
    /// The day this option was found on; set when pooling a range search.
    pub search_date: Option<NaiveDate>,
}

/// Merge direct and multi-leg results into one price-ordered list.
///
/// With `max_price` set, options costing more are dropped; an option at
/// exactly `max_price` is kept. The sort is stable, so equal prices keep
/// their relative order.
pub fn rank(
    direct: Vec<FlightOffer>,
    multi_leg: Vec<MultiLegOption>,
    max_price: Option<Decimal>,
) -> Vec<RankedOption> {
    let mut options: Vec<RankedOption> = direct
        .into_iter()
        .map(|offer| {
            let price = offer.price.total;
            RankedOption {
                option: TripOption::Direct(offer),
                price,
                search_date: None,
            }
        })
        .chain(multi_leg.into_iter().map(|multi| {
            let price = multi.total_price;
            RankedOption {
                option: TripOption::MultiLeg(multi),
                price,
                search_date: None,
            }
        }))
        .collect();

    if let Some(cap) = max_price {
        options.retain(|option| option.price <= cap);
    }
    sort_by_price(&mut options);
    options
}

/// Stable ascending price sort; also used for the pooled multi-day re-rank.
pub fn sort_by_price(options: &mut [RankedOption]) {
    options.sort_by(|a, b| a.price.cmp(&b.price));
}

/// Pool per-day ranked lists into one globally price-ordered list, tagging
/// every option with the day it was found on.
pub fn pool_days(days: Vec<(NaiveDate, Vec<RankedOption>)>) -> Vec<RankedOption> {
    let mut pooled: Vec<RankedOption> = days
        .into_iter()
        .flat_map(|(date, mut options)| {
            for option in &mut options {
                option.search_date = Some(date);
            }
            options
        })
        .collect();
    sort_by_price(&mut pooled);
    pooled
}
