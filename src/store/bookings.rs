use tracing::info;

use super::ChatStore;
use crate::errors::AppError;
use crate::models::{HotelBooking, HotelBookingRequest, TransportBooking, TransportBookingRequest};

impl ChatStore {
    /// Books a hotel and puts the confirmation at the top of the ledger.
    /// Identical requests produce separate entries.
    pub async fn book_hotel(&self, request: &HotelBookingRequest) -> Result<HotelBooking, AppError> {
        let result = self.api.book_hotel(request).await;

        let mut inner = self.lock();
        match result {
            Ok(booking) => {
                info!(booking_id = %booking.booking_id, hotel = %booking.hotel_name, "hotel booked");
                inner.view.bookings.hotels.insert(0, booking.clone());
                Ok(booking)
            }
            Err(e) => {
                inner.note_error("book hotel", &e);
                Err(e)
            }
        }
    }

    pub async fn book_transport(
        &self,
        request: &TransportBookingRequest,
    ) -> Result<TransportBooking, AppError> {
        let result = self.api.book_transport(request).await;

        let mut inner = self.lock();
        match result {
            Ok(booking) => {
                info!(booking_id = %booking.booking_id, model = %booking.model, "transport booked");
                inner.view.bookings.transport.insert(0, booking.clone());
                Ok(booking)
            }
            Err(e) => {
                inner.note_error("book transport", &e);
                Err(e)
            }
        }
    }

    pub async fn cancel_hotel_booking(&self, booking_id: &str) -> Result<(), AppError> {
        let result = self.api.cancel_hotel_booking(booking_id).await;

        let mut inner = self.lock();
        match result {
            Ok(()) => {
                inner.view.bookings.hotels.retain(|b| b.booking_id != booking_id);
                info!(booking_id, "hotel booking cancelled");
                Ok(())
            }
            Err(e) => {
                inner.note_error("cancel hotel booking", &e);
                Err(e)
            }
        }
    }

    pub async fn cancel_transport_booking(&self, booking_id: &str) -> Result<(), AppError> {
        let result = self.api.cancel_transport_booking(booking_id).await;

        let mut inner = self.lock();
        match result {
            Ok(()) => {
                inner.view.bookings.transport.retain(|b| b.booking_id != booking_id);
                info!(booking_id, "transport booking cancelled");
                Ok(())
            }
            Err(e) => {
                inner.note_error("cancel transport booking", &e);
                Err(e)
            }
        }
    }

    /// Replaces both ledgers with the backend's copy.
    pub async fn fetch_bookings(&self) -> Result<(), AppError> {
        let result = self.api.list_bookings().await;

        let mut inner = self.lock();
        match result {
            Ok(ledger) => {
                info!(
                    hotels = ledger.hotels.len(),
                    transport = ledger.transport.len(),
                    "loaded bookings"
                );
                inner.view.bookings = ledger;
                Ok(())
            }
            Err(e) => {
                inner.note_error("fetch bookings", &e);
                Err(e)
            }
        }
    }
}
