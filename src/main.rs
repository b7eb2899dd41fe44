//! CLI interface for farehopper

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use farehopper::amadeus::{PRODUCTION_BASE_URL, TEST_BASE_URL};
use farehopper::{
    kayak_link, AmadeusClient, FlightOffer, FlightSearch, PassengerBreakdown, RankedOption,
    TripOption,
};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "farehopper")]
#[command(about = "Search flight itineraries, with stopover synthesis and Kayak booking links")]
#[command(version)]
struct Cli {
    /// Origin airport code (e.g., JFK)
    #[arg(short, long)]
    from: String,
    /// Destination airport code (e.g., ATH)
    #[arg(short, long)]
    to: String,
    /// Departure date (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,
    /// Last departure date for a range search (YYYY-MM-DD)
    #[arg(short, long)]
    end_date: Option<String>,
    /// Stopover airport code for two-leg itineraries (e.g., LHR)
    #[arg(short, long)]
    stopover: Option<String>,
    /// Drop options costing more than this (EUR)
    #[arg(short, long)]
    max_price: Option<Decimal>,
    /// Number of adults
    #[arg(long, default_value = "1")]
    adults: u32,
    /// Number of seniors
    #[arg(long, default_value = "0")]
    seniors: u32,
    /// Number of students
    #[arg(long, default_value = "0")]
    students: u32,
    /// Infants on lap, under 2
    #[arg(long, default_value = "0")]
    infants_lap: u32,
    /// Infants under 2 with their own seat
    #[arg(long, default_value = "0")]
    infants_seat: u32,
    /// Children under 11
    #[arg(long, default_value = "0")]
    children_under_11: u32,
    /// Children under 17
    #[arg(long, default_value = "0")]
    children_under_17: u32,
    /// Query the production Amadeus host instead of the sandbox
    #[arg(long)]
    production: bool,
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {}. Use YYYY-MM-DD", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let passengers = PassengerBreakdown {
        adults: cli.adults,
        seniors: cli.seniors,
        students: cli.students,
        infants_lap: cli.infants_lap,
        infants_seat: cli.infants_seat,
        children_under_11: cli.children_under_11,
        children_under_17: cli.children_under_17,
    };
    if passengers.total() == 0 {
        bail!("at least one traveler is required");
    }

    let start = parse_date(&cli.date)?;
    let end = match &cli.end_date {
        Some(end_date) => parse_date(end_date)?,
        None => start,
    };
    if end < start {
        bail!("end date {} is before start date {}", end, start);
    }

    let base_url = if cli.production {
        PRODUCTION_BASE_URL
    } else {
        TEST_BASE_URL
    };
    let client = AmadeusClient::from_env(base_url)?;

    let search = FlightSearch::new(
        client,
        cli.from.to_uppercase(),
        cli.to.to_uppercase(),
        passengers,
    )
    .with_stopover(cli.stopover.map(|code| code.to_uppercase()))
    .with_max_price(cli.max_price);

    if start == end {
        let options = search.search_date(start).await;
        print_day_options(&options, &search, start);
    } else {
        let options = search.search_range(start, end).await;
        if options.is_empty() {
            println!("No flight options found between {} and {}", start, end);
            return Ok(());
        }
        for (idx, option) in options.iter().enumerate() {
            let found_on = option.search_date.unwrap_or(start);
            println!("\n=== Option {} | Search Date: {} ===", idx + 1, found_on);
            print_option(option, &search, found_on);
        }
    }

    Ok(())
}

fn print_day_options(options: &[RankedOption], search: &FlightSearch, date: NaiveDate) {
    if options.is_empty() {
        println!("No flight options found for {}", date);
        return;
    }
    for (idx, option) in options.iter().enumerate() {
        let kind = match option.option {
            TripOption::Direct(_) => "direct",
            TripOption::MultiLeg(_) => "multi-leg",
        };
        println!("\n// {} | Option {}", kind, idx + 1);
        print_option(option, search, date);
    }
}

fn print_option(option: &RankedOption, search: &FlightSearch, date: NaiveDate) {
    match &option.option {
        TripOption::Direct(offer) => {
            print_segments(offer);
            println!("💰 Price: €{:.2}", option.price);
            println!(
                "🔗 Kayak Link: {}",
                kayak_link(&search.origin, &search.destination, date, &search.passengers, None)
            );
        }
        TripOption::MultiLeg(multi_leg) => {
            let stopover = search.stopover.as_deref().unwrap_or("???");

            println!("Leg 1: {} → {}", search.origin, stopover);
            print_segments(&multi_leg.first_leg);
            println!(
                "🔗 Kayak Link (Leg 1): {}",
                kayak_link(&search.origin, stopover, date, &search.passengers, None)
            );

            println!("Leg 2: {} → {}", stopover, search.destination);
            print_segments(&multi_leg.second_leg);
            // The second leg may depart a calendar day later than the search
            // date; the link follows its actual departure day.
            let second_date = multi_leg
                .second_leg
                .first_segment()
                .map(|segment| segment.departure.at.date())
                .unwrap_or(date);
            println!(
                "🔗 Kayak Link (Leg 2): {}",
                kayak_link(stopover, &search.destination, second_date, &search.passengers, None)
            );

            println!("💰 Combined Price: €{:.2}", option.price);
        }
    }
}

fn print_segments(offer: &FlightOffer) {
    if let Some(itinerary) = offer.itineraries.first() {
        for segment in &itinerary.segments {
            println!(
                "  {}: {} → {} | {} → {}",
                segment.carrier_code,
                segment.departure.iata_code,
                segment.arrival.iata_code,
                segment.departure.at.format("%Y-%m-%dT%H:%M:%S"),
                segment.arrival.at.format("%Y-%m-%dT%H:%M:%S"),
            );
        }
    }
}
