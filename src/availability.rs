// Availability engine: the coarse per-vehicle listing flag and the exact
// date-range conflict query against the booking ledger. Both are linear
// scans; the ledger is small and local.

use chrono::NaiveDate;
use tracing::debug;

use crate::catalog::CatalogStore;
use crate::ledger::{BookingRecord, BookingStatus};

// Two rentals conflict only when their ranges properly overlap. Touching
// endpoints are free: a return on the morning a new pickup happens is a
// valid same-day turnover.
pub fn ranges_overlap(
    pickup_a: NaiveDate,
    return_a: NaiveDate,
    pickup_b: NaiveDate,
    return_b: NaiveDate,
) -> bool {
    pickup_a < return_b && pickup_b < return_a
}

// Recompute every vehicle's coarse listing flag from the ledger. A vehicle
// is flagged unavailable while any confirmed rental for it has not yet
// ended as of `as_of`. This is display-grade only; range queries go through
// `is_available_for_range`.
pub fn recompute_availability(catalog: &CatalogStore, ledger: &[BookingRecord], as_of: NaiveDate) {
    for vehicle in catalog.vehicles() {
        let rented = ledger.iter().any(|r| {
            r.vehicle_id == vehicle.id
                && r.status == BookingStatus::Confirmed
                && r.return_date >= as_of
        });
        catalog.set_available(vehicle.id, !rented);
    }
    debug!(records = ledger.len(), %as_of, "availability recomputed");
}

// Whether the vehicle can be booked for the exact range. Short-circuits on
// the coarse flag, then scans the vehicle's confirmed rentals for overlap.
pub fn is_available_for_range(
    catalog: &CatalogStore,
    vehicle_id: u32,
    pickup: NaiveDate,
    ret: NaiveDate,
    ledger: &[BookingRecord],
) -> bool {
    if !catalog.is_listed_available(vehicle_id) {
        return false;
    }

    !ledger.iter().any(|r| {
        r.vehicle_id == vehicle_id
            && r.status == BookingStatus::Confirmed
            && ranges_overlap(r.pickup_date, r.return_date, pickup, ret)
    })
}
