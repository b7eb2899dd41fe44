//! End-to-end pipeline tests over canned API responses
//!
//! Exercises the pure half of the search flow — wire parsing, multi-leg
//! synthesis, ranking, link formatting — on fixtures shaped like real
//! flight-offers responses. No network involved.

use chrono::NaiveDate;
use farehopper::{kayak_link, rank, synthesize, FlightOffer, PassengerBreakdown, TripOption};
use rust_decimal::Decimal;

/// JFK → LHR candidates for 2024-06-01. The second offer arrives late in
/// the evening; the third is malformed (no itineraries).
const FIRST_LEG_FIXTURE: &str = r#"{
    "data": [
        {
            "price": { "total": "320.40", "currency": "EUR" },
            "itineraries": [
                {
                    "segments": [
                        {
                            "carrierCode": "VS",
                            "departure": { "iataCode": "JFK", "at": "2024-06-01T08:30:00" },
                            "arrival": { "iataCode": "LHR", "at": "2024-06-01T20:25:00" }
                        }
                    ]
                }
            ]
        },
        {
            "price": { "total": "289.99", "currency": "EUR" },
            "itineraries": [
                {
                    "segments": [
                        {
                            "carrierCode": "BA",
                            "departure": { "iataCode": "JFK", "at": "2024-06-01T09:00:00" },
                            "arrival": { "iataCode": "LHR", "at": "2024-06-01T21:00:00" }
                        }
                    ]
                }
            ]
        },
        {
            "price": { "total": "199.00", "currency": "EUR" },
            "itineraries": []
        }
    ]
}"#;

/// LHR → ATH candidates. Departures at 22:30 (fits only the 20:25
/// arrival), 23:59 (fits both arrivals) and 09:00 next morning (fits
/// neither).
const SECOND_LEG_FIXTURE: &str = r#"{
    "data": [
        {
            "price": { "total": "110.00", "currency": "EUR" },
            "itineraries": [
                {
                    "segments": [
                        {
                            "carrierCode": "A3",
                            "departure": { "iataCode": "LHR", "at": "2024-06-01T22:30:00" },
                            "arrival": { "iataCode": "ATH", "at": "2024-06-02T04:10:00" }
                        }
                    ]
                }
            ]
        },
        {
            "price": { "total": "95.50", "currency": "EUR" },
            "itineraries": [
                {
                    "segments": [
                        {
                            "carrierCode": "BA",
                            "departure": { "iataCode": "LHR", "at": "2024-06-01T23:59:00" },
                            "arrival": { "iataCode": "ATH", "at": "2024-06-02T05:40:00" }
                        }
                    ]
                }
            ]
        },
        {
            "price": { "total": "60.00", "currency": "EUR" },
            "itineraries": [
                {
                    "segments": [
                        {
                            "carrierCode": "EZY",
                            "departure": { "iataCode": "LHR", "at": "2024-06-02T09:00:00" },
                            "arrival": { "iataCode": "ATH", "at": "2024-06-02T14:45:00" }
                        }
                    ]
                }
            ]
        }
    ]
}"#;

fn offers_from(fixture: &str) -> Vec<FlightOffer> {
    let envelope: serde_json::Value = serde_json::from_str(fixture).unwrap();
    serde_json::from_value(envelope["data"].clone()).unwrap()
}

fn price(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn synthesis_pairs_only_window_compatible_legs() {
    let first_legs = offers_from(FIRST_LEG_FIXTURE);
    let second_legs = offers_from(SECOND_LEG_FIXTURE);

    let options = synthesize(&first_legs, &second_legs);

    // 20:25 arrival connects to 22:30 and 23:59; 21:00 arrival only to
    // 23:59 (22:30 is under two hours, 09:00 next day is past eight).
    // The malformed offer contributes nothing.
    assert_eq!(options.len(), 3);
    for option in &options {
        assert_eq!(
            option.total_price,
            option.first_leg.price.total + option.second_leg.price.total
        );
    }
}

#[test]
fn ranked_pipeline_orders_by_combined_price() {
    let first_legs = offers_from(FIRST_LEG_FIXTURE);
    let second_legs = offers_from(SECOND_LEG_FIXTURE);

    let options = synthesize(&first_legs, &second_legs);
    let ranked = rank(Vec::new(), options, None);

    let prices: Vec<Decimal> = ranked.iter().map(|o| o.price).collect();
    assert_eq!(
        prices,
        vec![price("385.49"), price("415.90"), price("430.40")]
    );
    assert!(ranked
        .iter()
        .all(|o| matches!(o.option, TripOption::MultiLeg(_))));
    assert!(ranked.iter().all(|o| o.search_date.is_none()));
}

#[test]
fn max_price_cap_is_inclusive_end_to_end() {
    let first_legs = offers_from(FIRST_LEG_FIXTURE);
    let second_legs = offers_from(SECOND_LEG_FIXTURE);
    let options = synthesize(&first_legs, &second_legs);

    // Cheapest combination costs exactly 385.49.
    let ranked = rank(Vec::new(), options.clone(), Some(price("385.49")));
    assert_eq!(ranked.len(), 1);

    let ranked = rank(Vec::new(), options, Some(price("385.48")));
    assert!(ranked.is_empty());
}

#[test]
fn direct_offers_rank_against_multi_leg() {
    let direct = offers_from(FIRST_LEG_FIXTURE);
    let second_legs = offers_from(SECOND_LEG_FIXTURE);
    let multi_leg = synthesize(&offers_from(FIRST_LEG_FIXTURE), &second_legs);

    let ranked = rank(direct, multi_leg, None);
    assert_eq!(ranked.len(), 6);

    // The malformed direct offer still ranks (199.00, cheapest); synthesis
    // is the only stage that drops it.
    assert_eq!(ranked[0].price, price("199.00"));
    assert!(matches!(ranked[0].option, TripOption::Direct(_)));

    let mut previous = ranked[0].price;
    for option in &ranked[1..] {
        assert!(option.price >= previous);
        previous = option.price;
    }
}

#[test]
fn booking_links_for_a_synthesized_trip() {
    let passengers = PassengerBreakdown {
        adults: 2,
        infants_lap: 1,
        children_under_11: 1,
        ..Default::default()
    };
    let depart = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let first_legs = offers_from(FIRST_LEG_FIXTURE);
    let second_legs = offers_from(SECOND_LEG_FIXTURE);
    let options = synthesize(&first_legs, &second_legs);
    let cheapest = options
        .iter()
        .min_by_key(|option| option.total_price)
        .unwrap();

    let leg1 = kayak_link("JFK", "LHR", depart, &passengers, None);
    assert_eq!(
        leg1,
        "https://www.kayak.com/flights/JFK-LHR/2024-06-01/2adults/children-L-11"
    );

    // Second-leg link is dated by the leg's actual departure day.
    let second_departure = cheapest
        .second_leg
        .first_segment()
        .map(|segment| segment.departure.at.date())
        .unwrap();
    let leg2 = kayak_link("LHR", "ATH", second_departure, &passengers, None);
    assert_eq!(
        leg2,
        "https://www.kayak.com/flights/LHR-ATH/2024-06-01/2adults/children-L-11"
    );
}
