// Browser-style car rental storefront core: catalog browsing, availability
// checks against a local booking ledger, and the three-step booking flow.

pub mod addons;
pub mod availability;
pub mod booking;
pub mod catalog;
pub mod ledger;
pub mod validation;

// Re-export key types for convenience
pub use addons::{find_service, seed_services, AdditionalService};
pub use availability::{is_available_for_range, ranges_overlap, recompute_availability};
pub use booking::{
    BookingError, BookingService, BookingSession, ChargeOutcome, Clock, FixedClock,
    PaymentGateway, PaymentMethod, SimulatedGateway, Step, SystemClock,
};
pub use catalog::{
    seed_catalog, CatalogStore, ComparisonTray, FilterCriteria, SortKey, Vehicle,
};
pub use ledger::{
    BookingRecord, BookingStatus, CustomerProfile, JsonFileStore, LedgerStore, MemoryStore,
    StoreError,
};
pub use validation::{
    validate_date_range, CustomerError, CustomerValidator, DateRangeError, MAX_RENTAL_DAYS,
    MIN_RENTAL_DAYS,
};
