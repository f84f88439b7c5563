use tracing::{debug, info, warn};

use super::ChatStore;
use crate::models::{RouteData, TripPlanRequest};

/// Where the route shown after confirmation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSource {
    /// Computed by the route planner.
    Planned,
    /// Built locally from the place names after the planner failed.
    Fallback,
    /// The active conversation changed before the planner answered; nothing
    /// was applied.
    Superseded,
}

impl ChatStore {
    /// Freezes the current itinerary and switches to the trip view with a
    /// planned route. A planner failure still switches, using a route built
    /// from `place_names` alone.
    pub async fn confirm_itinerary(
        &self,
        place_names: Vec<String>,
        hotel_name: Option<String>,
    ) -> RouteSource {
        let generation = {
            let mut inner = self.lock();
            inner.begin();
            inner.generation
        };

        let request = TripPlanRequest { place_names, hotel_name };
        let result = self.api.plan_trip(&request).await;

        let mut inner = self.lock();
        inner.finish();
        if inner.generation != generation {
            debug!("active conversation changed while planning; route dropped");
            return RouteSource::Superseded;
        }

        let (route, source) = match result {
            Ok(route) => {
                info!(stops = route.ordered_route.len(), "route planned");
                (route, RouteSource::Planned)
            }
            Err(e) => {
                inner.note_error("plan route", &e);
                warn!("showing unplanned route for {} places", request.place_names.len());
                (
                    RouteData::fallback(&request.place_names, request.hotel_name.as_deref()),
                    RouteSource::Fallback,
                )
            }
        };

        inner.view.confirmed_trip = inner.view.current_itinerary.clone();
        inner.view.route_data = Some(route);
        source
    }

    /// Leaves the trip view. Safe to call when not in it.
    pub fn clear_confirmed_trip(&self) {
        let mut inner = self.lock();
        inner.view.confirmed_trip = None;
        inner.view.route_data = None;
    }
}
