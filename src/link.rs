//! Kayak deep-link construction

use crate::PassengerBreakdown;
use chrono::NaiveDate;

const KAYAK_BASE_URL: &str = "https://www.kayak.com/flights";

/// Build a Kayak results-page link for the given trip parameters.
///
/// Path shape: `/{origin}-{destination}/{date}[/{return}]/{pax…}`. The
/// passenger segments are `{n}adults`, then `{n}seniors` and `{n}students`
/// when nonzero, then a single `children-…` token carrying one `L` per lap
/// infant, one `S` per seated infant, one `11` per child under 11 and one
/// `17` per child under 17, omitted entirely when empty.
pub fn kayak_link(
    origin: &str,
    destination: &str,
    departure_date: NaiveDate,
    passengers: &PassengerBreakdown,
    return_date: Option<NaiveDate>,
) -> String {
    let mut pax_parts = vec![format!("{}adults", passengers.adults)];
    if passengers.seniors > 0 {
        pax_parts.push(format!("{}seniors", passengers.seniors));
    }
    if passengers.students > 0 {
        pax_parts.push(format!("{}students", passengers.students));
    }

    let mut child_parts: Vec<&str> = Vec::new();
    for _ in 0..passengers.infants_lap {
        child_parts.push("L");
    }
    for _ in 0..passengers.infants_seat {
        child_parts.push("S");
    }
    for _ in 0..passengers.children_under_11 {
        child_parts.push("11");
    }
    for _ in 0..passengers.children_under_17 {
        child_parts.push("17");
    }
    if !child_parts.is_empty() {
        pax_parts.push(format!("children-{}", child_parts.join("-")));
    }

    let mut url = format!(
        "{}/{}-{}/{}",
        KAYAK_BASE_URL,
        origin,
        destination,
        departure_date.format("%Y-%m-%d")
    );
    if let Some(return_date) = return_date {
        url.push_str(&format!("/{}", return_date.format("%Y-%m-%d")));
    }
    url.push('/');
    url.push_str(&pax_parts.join("/"));
    url
}
