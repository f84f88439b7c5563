//! Client-side state core for the Xplorer trip-planning assistant: session
//! directory, active conversation with optimistic sends, itinerary
//! normalization, route confirmation and the booking ledger.

pub mod api;
pub mod config;
pub mod errors;
pub mod itinerary;
pub mod models;
pub mod store;

pub use api::{HttpTravelApi, TravelApi};
pub use config::ClientConfig;
pub use errors::AppError;
pub use store::{ChatState, ChatStore, RouteSource};
