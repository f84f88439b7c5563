use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use xplorer_client::itinerary::Itinerary;
use xplorer_client::models::{
    DisplayContent, DisplayMessage, HotelBookingRequest, Role, TransportBookingRequest,
};
use xplorer_client::{AppError, ChatState, ChatStore, ClientConfig, HttpTravelApi, RouteSource};

const HELP: &str = "\
Commands:
  sessions                 list recent conversations
  more                     load older conversations
  open <id>                open a conversation
  new                      start a fresh conversation
  delete <id>              delete a conversation
  itinerary                show the current itinerary
  confirm <a; b; c> [@ h]  plan a route through the places, staying at h
                           (default: the itinerary's first hotel)
  route                    show the confirmed route
  back                     leave the trip view
  bookings                 reload and list bookings
  book-hotel name|location|room|check-in|check-out
  book-cab agency|category|type|model|date
  cancel-hotel <id>        cancel a hotel booking
  cancel-cab <id>          cancel a transport booking
  help                     show this text
  quit                     exit
Anything else is sent to the assistant.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xplorer_client=info".into()),
        )
        .init();

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let config = ClientConfig::from_env().context("reading client configuration")?;
    let api = HttpTravelApi::new(&config).context("building HTTP client")?;
    let store = ChatStore::new(Arc::new(api)).with_page_size(config.session_page_size);
    info!(api = %config.api_base_url, "xplorer client ready");

    if let Err(e) = store.bootstrap().await {
        eprintln!("Could not load sessions or bookings: {}", e.display_message());
    }
    print_sessions(&store.snapshot());
    println!("{HELP}");

    // ── Command loop ──────────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "sessions" => {
                report(store.fetch_sessions(store.page_size()).await);
                print_sessions(&store.snapshot());
            }
            "more" => {
                report(store.fetch_more_sessions(store.page_size()).await);
                print_sessions(&store.snapshot());
            }
            "open" if !rest.is_empty() => {
                report(store.set_current_session(Some(rest)).await);
                print_conversation(&store.snapshot());
            }
            "new" => {
                report(store.set_current_session(None).await);
                println!("Started a new conversation.");
            }
            "delete" if !rest.is_empty() => {
                report(store.delete_session(rest).await);
                print_sessions(&store.snapshot());
            }
            "itinerary" => match &store.snapshot().current_itinerary {
                Some(itinerary) => print_itinerary(itinerary),
                None => println!("No itinerary yet."),
            },
            "confirm" if !rest.is_empty() => {
                let (places, hotel) = parse_confirm(rest, store.snapshot().current_itinerary.as_ref());
                match store.confirm_itinerary(places, hotel).await {
                    RouteSource::Planned => println!("Route planned."),
                    RouteSource::Fallback => println!("Route planner unavailable; showing places in order."),
                    RouteSource::Superseded => println!("Conversation changed; route discarded."),
                }
                print_route(&store.snapshot());
            }
            "route" => print_route(&store.snapshot()),
            "back" => {
                store.clear_confirmed_trip();
                println!("Back to chat.");
            }
            "bookings" => {
                report(store.fetch_bookings().await);
                print_bookings(&store.snapshot());
            }
            "book-hotel" => match fields::<5>(rest) {
                Some([hotel_name, location, room_type, check_in_date, check_out_date]) => {
                    let request = HotelBookingRequest {
                        hotel_id: None,
                        hotel_name,
                        location,
                        room_type,
                        check_in_date,
                        check_out_date,
                    };
                    if let Some(booking) = report(store.book_hotel(&request).await) {
                        println!("Booked {} ({}).", booking.hotel_name, booking.booking_id);
                    }
                }
                None => println!("usage: book-hotel name|location|room|check-in|check-out"),
            },
            "book-cab" => match fields::<5>(rest) {
                Some([agency_name, vehicle_category, vehicle_type, model, trip_date]) => {
                    let request = TransportBookingRequest {
                        agency_name,
                        vehicle_category,
                        vehicle_type,
                        model,
                        trip_date,
                    };
                    if let Some(booking) = report(store.book_transport(&request).await) {
                        println!("Booked {} ({}).", booking.model, booking.booking_id);
                    }
                }
                None => println!("usage: book-cab agency|category|type|model|date"),
            },
            "cancel-hotel" if !rest.is_empty() => {
                report(store.cancel_hotel_booking(rest).await);
            }
            "cancel-cab" if !rest.is_empty() => {
                report(store.cancel_transport_booking(rest).await);
            }
            "open" | "delete" | "confirm" | "cancel-hotel" | "cancel-cab" => {
                println!("`{command}` needs an argument; see `help`.");
            }
            _ => {
                if report(store.send_message(line, None).await).is_some() {
                    print_latest_reply(&store.snapshot());
                }
            }
        }
    }

    Ok(())
}

fn report<T>(result: Result<T, AppError>) -> Option<T> {
    result
        .map_err(|e| eprintln!("Error: {}", e.display_message()))
        .ok()
}

/// `a; b; c @ hotel` → places and optional hotel. Without `@`, the
/// itinerary's first hotel is used.
fn parse_confirm(input: &str, itinerary: Option<&Itinerary>) -> (Vec<String>, Option<String>) {
    let (places, hotel) = match input.split_once('@') {
        Some((places, hotel)) => (places, Some(hotel.trim().to_string())),
        None => (input, None),
    };
    let places = places
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    let hotel = hotel
        .filter(|h| !h.is_empty())
        .or_else(|| itinerary.and_then(Itinerary::first_hotel_name));
    (places, hotel)
}

fn fields<const N: usize>(input: &str) -> Option<[String; N]> {
    let parts: Vec<String> = input.split('|').map(|p| p.trim().to_string()).collect();
    parts.try_into().ok()
}

// ── Rendering ────────────────────────────────────────────────────────────────

fn print_sessions(state: &ChatState) {
    if state.sessions.is_empty() {
        println!("No conversations yet.");
        return;
    }
    for session in &state.sessions {
        let marker = if state.current_session_id.as_deref() == Some(session.id.as_str()) { "*" } else { " " };
        let title = if session.title.is_empty() { "Untitled chat" } else { session.title.as_str() };
        println!("{marker} {}  {title}  ({} messages, {})", session.id, session.message_count, session.updated_at);
    }
    if state.has_more_sessions {
        println!("  … `more` for older conversations");
    }
}

fn print_message(message: &DisplayMessage) {
    let who = match message.role {
        Role::User => "you",
        Role::Ai => "xplorer",
    };
    println!("[{who}] {}", message.text());
    if let DisplayContent::Ai(ai) = &message.content {
        for element in ai.ui_elements() {
            let options = if element.options.is_empty() {
                String::new()
            } else {
                format!(" [{}]", element.options.join(" / "))
            };
            println!("    ? {} ({}){options}", element.label, element.kind.as_str());
        }
    }
}

fn print_conversation(state: &ChatState) {
    state.current_messages.iter().for_each(print_message);
    if state.current_itinerary.is_some() {
        println!("(an itinerary is available: `itinerary`)");
    }
}

fn print_latest_reply(state: &ChatState) {
    if let Some(last) = state.current_messages.last() {
        print_message(last);
    }
    if let Some(itinerary) = &state.current_itinerary {
        if !itinerary.is_empty() {
            println!("(itinerary: {} days, `itinerary` to view)", itinerary.days.len());
        }
    }
}

fn print_itinerary(itinerary: &Itinerary) {
    for day in &itinerary.days {
        println!("Day {}: {}", day.day_number, day.theme);
        for activity in &day.activities {
            println!("  - {}", activity.label());
        }
        if let Some(hotel) = &day.hotel {
            println!("  hotel: {}", hotel.label());
        }
        if let Some(transport) = &day.transport {
            println!("  transport: {}", transport.label());
        }
    }
}

fn print_route(state: &ChatState) {
    let Some(route) = &state.route_data else {
        println!("No confirmed trip.");
        return;
    };
    println!("Route: {}", route.ordered_route.join(" → "));
    for leg in &route.legs {
        match leg.road_time_mins {
            Some(mins) => println!("  {} → {}  {mins:.0} min", leg.from, leg.to),
            None => println!("  {} → {}", leg.from, leg.to),
        }
    }
    if let Some(total) = route.total_road_time_mins {
        println!("Total road time: {total:.0} min");
    }
    for hotel in &route.hotels_detail {
        println!("Stay: {}", hotel.name);
    }
}

fn print_bookings(state: &ChatState) {
    let ledger = &state.bookings;
    if ledger.hotels.is_empty() && ledger.transport.is_empty() {
        println!("No bookings.");
        return;
    }
    for hotel in &ledger.hotels {
        println!(
            "hotel {}  {} ({}) {} → {}",
            hotel.booking_id, hotel.hotel_name, hotel.room_type, hotel.check_in_date, hotel.check_out_date
        );
    }
    for cab in &ledger.transport {
        println!(
            "cab   {}  {} {} ({}) on {}",
            cab.booking_id, cab.agency_name, cab.model, cab.vehicle_type, cab.trip_date
        );
    }
}
