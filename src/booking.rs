// The booking flow: a three-step session state machine that ends in a
// confirmed, persisted ledger record. All collaborators (catalog, ledger
// store, payment gateway, clock) are injected so the machine itself stays
// deterministic and testable.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::addons::{find_service, AdditionalService};
use crate::availability::{is_available_for_range, recompute_availability};
use crate::catalog::CatalogStore;
use crate::ledger::{
    BookingRecord, BookingStatus, CustomerProfile, LedgerStore, StoreError,
};
use crate::validation::{validate_date_range, CustomerError, CustomerValidator, DateRangeError};

#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    Dates(#[from] DateRangeError),

    #[error(transparent)]
    Customer(#[from] CustomerError),

    #[error("vehicle {0} is not available")]
    VehicleUnavailable(u32),

    #[error("the vehicle is no longer available for the selected dates")]
    AvailabilityLost,

    #[error("select a payment method first")]
    NoPaymentMethodSelected,

    #[error("payment was declined, try another method")]
    PaymentDeclined,

    #[error("no booking is in progress")]
    NoActiveSession,

    #[error("that action is not valid at the current step")]
    WrongStep,

    #[error(transparent)]
    Store(#[from] StoreError),
}

// The three interactive steps of the flow. `Committed` and `Cancelled` are
// not steps: committing consumes the session and hands back the record,
// cancelling discards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    RentalDetails,
    CustomerInfo,
    Payment,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::RentalDetails => 1,
            Step::CustomerInfo => 2,
            Step::Payment => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Gcash,
    Maya,
}

impl PaymentMethod {
    pub fn tag(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::Gcash => "gcash",
            PaymentMethod::Maya => "maya",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeOutcome {
    Approved,
    Declined,
}

// Settlement is a single synchronous decision. Anything pointed at real
// payment rails would instead await an external call carrying the
// confirmation number as an idempotency key.
pub trait PaymentGateway {
    fn charge(&self, amount: u32, method: PaymentMethod) -> ChargeOutcome;
}

// The stand-in gateway: approves a fixed fraction of charges at random.
pub struct SimulatedGateway {
    success_rate: f64,
}

impl SimulatedGateway {
    pub fn new(success_rate: f64) -> Self {
        Self { success_rate }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self { success_rate: 0.9 }
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, _amount: u32, _method: PaymentMethod) -> ChargeOutcome {
        if rand::thread_rng().gen_bool(self.success_rate) {
            ChargeOutcome::Approved
        } else {
            ChargeOutcome::Declined
        }
    }
}

// Source of the current date and time, injectable so tests can pin "today".
pub trait Clock {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// A clock pinned to one date; midnight UTC stands in for the time of day.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }

    fn now(&self) -> DateTime<Utc> {
        self.0.and_hms_opt(0, 0, 0).unwrap().and_utc()
    }
}

// The in-progress draft. Staged inputs stay editable until the step that
// owns them advances; back-navigation changes only the step pointer.
#[derive(Debug, Clone)]
pub struct BookingSession {
    vehicle_id: u32,
    step: Step,
    pickup_input: Option<String>,
    return_input: Option<String>,
    pickup_location: String,
    services: Vec<String>,
    customer: Option<CustomerProfile>,
    payment_method: Option<PaymentMethod>,
    // Locked in when step 1 advances.
    pickup_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    rental_days: i64,
    total_cost: u32,
}

impl BookingSession {
    fn new(vehicle_id: u32) -> Self {
        Self {
            vehicle_id,
            step: Step::RentalDetails,
            pickup_input: None,
            return_input: None,
            pickup_location: String::new(),
            services: Vec::new(),
            customer: None,
            payment_method: None,
            pickup_date: None,
            return_date: None,
            rental_days: 0,
            total_cost: 0,
        }
    }

    pub fn vehicle_id(&self) -> u32 {
        self.vehicle_id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub fn rental_days(&self) -> i64 {
        self.rental_days
    }

    pub fn total_cost(&self) -> u32 {
        self.total_cost
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    // Locked dates; `None` until step 1 has advanced.
    pub fn dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.pickup_date.zip(self.return_date)
    }
}

// Owns the live state of the storefront core: the catalog with its derived
// flags, the in-memory ledger mirror, and at most one draft session.
pub struct BookingService {
    catalog: CatalogStore,
    services: Vec<AdditionalService>,
    store: Box<dyn LedgerStore>,
    gateway: Box<dyn PaymentGateway>,
    clock: Box<dyn Clock>,
    ledger: Vec<BookingRecord>,
    session: Option<BookingSession>,
    validator: CustomerValidator,
}

impl BookingService {
    pub fn new(
        catalog: CatalogStore,
        services: Vec<AdditionalService>,
        store: Box<dyn LedgerStore>,
        gateway: Box<dyn PaymentGateway>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let ledger = store.load()?;
        let service = Self {
            catalog,
            services,
            store,
            gateway,
            clock,
            ledger,
            session: None,
            validator: CustomerValidator::new(),
        };
        recompute_availability(&service.catalog, &service.ledger, service.clock.today());
        info!(records = service.ledger.len(), "booking service ready");
        Ok(service)
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn additional_services(&self) -> &[AdditionalService] {
        &self.services
    }

    pub fn ledger(&self) -> &[BookingRecord] {
        &self.ledger
    }

    pub fn session(&self) -> Option<&BookingSession> {
        self.session.as_ref()
    }

    pub fn current_step(&self) -> Option<Step> {
        self.session.as_ref().map(|s| s.step)
    }

    // Open a draft for the given vehicle. Only coarsely-available vehicles
    // can enter the flow; an existing draft is discarded first.
    pub fn start(&mut self, vehicle_id: u32) -> Result<(), BookingError> {
        if !self.catalog.is_listed_available(vehicle_id) {
            return Err(BookingError::VehicleUnavailable(vehicle_id));
        }
        if self.session.is_some() {
            debug!("discarding previous draft session");
        }
        self.session = Some(BookingSession::new(vehicle_id));
        debug!(vehicle_id, "booking session started");
        Ok(())
    }

    // Stage the step-1 inputs. Nothing is validated until `advance`.
    pub fn set_rental_details(
        &mut self,
        pickup: &str,
        ret: &str,
        location: &str,
    ) -> Result<(), BookingError> {
        let session = self.session.as_mut().ok_or(BookingError::NoActiveSession)?;
        if session.step != Step::RentalDetails {
            return Err(BookingError::WrongStep);
        }
        session.pickup_input = Some(pickup.to_string());
        session.return_input = Some(ret.to_string());
        session.pickup_location = location.to_string();
        Self::refresh_total(session, &self.catalog, &self.services, self.clock.today());
        Ok(())
    }

    // Add or remove an add-on. Unknown ids are ignored; toggling twice
    // restores the set and the running total exactly.
    pub fn toggle_service(&mut self, service_id: &str) -> Result<(), BookingError> {
        let session = self.session.as_mut().ok_or(BookingError::NoActiveSession)?;
        if session.step != Step::RentalDetails {
            return Err(BookingError::WrongStep);
        }
        if find_service(&self.services, service_id).is_none() {
            debug!(service_id, "ignoring unknown add-on");
            return Ok(());
        }
        if let Some(pos) = session.services.iter().position(|s| s == service_id) {
            session.services.remove(pos);
        } else {
            session.services.push(service_id.to_string());
        }
        Self::refresh_total(session, &self.catalog, &self.services, self.clock.today());
        Ok(())
    }

    // Stage the step-2 profile. Validated on `advance`.
    pub fn set_customer(&mut self, customer: CustomerProfile) -> Result<(), BookingError> {
        let session = self.session.as_mut().ok_or(BookingError::NoActiveSession)?;
        if session.step != Step::CustomerInfo {
            return Err(BookingError::WrongStep);
        }
        session.customer = Some(customer);
        Ok(())
    }

    pub fn select_payment(&mut self, method: PaymentMethod) -> Result<(), BookingError> {
        let session = self.session.as_mut().ok_or(BookingError::NoActiveSession)?;
        if session.step != Step::Payment {
            return Err(BookingError::WrongStep);
        }
        session.payment_method = Some(method);
        Ok(())
    }

    // Move the session forward one step, enforcing the gate for the step
    // being left. A failed gate leaves the session where it is.
    pub fn advance(&mut self) -> Result<Step, BookingError> {
        let today = self.clock.today();
        let session = self.session.as_mut().ok_or(BookingError::NoActiveSession)?;

        match session.step {
            Step::RentalDetails => {
                let pickup_raw = session.pickup_input.as_deref().unwrap_or("");
                let return_raw = session.return_input.as_deref().unwrap_or("");
                let days = validate_date_range(pickup_raw, return_raw, today)?;

                // The raw inputs parsed inside the validator; unwrap is safe.
                let pickup = crate::validation::parse_date(pickup_raw).unwrap();
                let ret = crate::validation::parse_date(return_raw).unwrap();

                if !is_available_for_range(
                    &self.catalog,
                    session.vehicle_id,
                    pickup,
                    ret,
                    &self.ledger,
                ) {
                    return Err(BookingError::VehicleUnavailable(session.vehicle_id));
                }

                session.pickup_date = Some(pickup);
                session.return_date = Some(ret);
                session.rental_days = days;
                session.total_cost =
                    Self::cost_for(&self.catalog, &self.services, session, days);
                session.step = Step::CustomerInfo;
                debug!(days, total = session.total_cost, "rental details locked");
            }
            Step::CustomerInfo => {
                let customer = session.customer.as_ref().ok_or(CustomerError {
                    field: "customer",
                    reason: "must not be empty",
                })?;
                self.validator.validate(customer)?;
                session.step = Step::Payment;
                debug!("customer info attached");
            }
            // Step 3 only moves forward through `pay`.
            Step::Payment => {}
        }
        Ok(session.step)
    }

    // Step back without losing anything already entered.
    pub fn back(&mut self) -> Result<Step, BookingError> {
        let session = self.session.as_mut().ok_or(BookingError::NoActiveSession)?;
        session.step = match session.step {
            Step::RentalDetails => Step::RentalDetails,
            Step::CustomerInfo => Step::RentalDetails,
            Step::Payment => Step::CustomerInfo,
        };
        Ok(session.step)
    }

    // Final commit: re-check availability against the freshly loaded ledger,
    // settle, then append and persist. The session survives a declined
    // charge (retry with another method) and a failed save (ledger and
    // durable state are left untouched).
    pub fn pay(&mut self) -> Result<BookingRecord, BookingError> {
        let today = self.clock.today();
        let now = self.clock.now();

        let session = self.session.as_mut().ok_or(BookingError::NoActiveSession)?;
        if session.step != Step::Payment {
            return Err(BookingError::WrongStep);
        }
        let method = session
            .payment_method
            .ok_or(BookingError::NoPaymentMethodSelected)?;
        let pickup = session.pickup_date.expect("locked at step 1");
        let ret = session.return_date.expect("locked at step 1");

        // Another session may have committed a conflicting rental since
        // step 1; reload and re-check before touching the gateway.
        self.ledger = self.store.load()?;
        recompute_availability(&self.catalog, &self.ledger, today);
        if !is_available_for_range(&self.catalog, session.vehicle_id, pickup, ret, &self.ledger)
        {
            warn!(vehicle_id = session.vehicle_id, "availability lost before commit");
            session.step = Step::RentalDetails;
            return Err(BookingError::AvailabilityLost);
        }

        if self.gateway.charge(session.total_cost, method) == ChargeOutcome::Declined {
            warn!(method = method.tag(), "charge declined");
            return Err(BookingError::PaymentDeclined);
        }

        let record = BookingRecord {
            confirmation_number: confirmation_number(now),
            vehicle_id: session.vehicle_id,
            pickup_date: pickup,
            return_date: ret,
            pickup_location: session.pickup_location.clone(),
            services: session.services.clone(),
            total_cost: session.total_cost,
            customer: session.customer.clone().expect("attached at step 2"),
            payment_method: method.tag().to_string(),
            status: BookingStatus::Confirmed,
            created_at: now,
        };

        let mut committed = self.ledger.clone();
        committed.push(record.clone());
        self.store.save(&committed)?;

        self.ledger = committed;
        recompute_availability(&self.catalog, &self.ledger, today);
        self.session = None;
        info!(
            confirmation = %record.confirmation_number,
            vehicle_id = record.vehicle_id,
            total = record.total_cost,
            "booking committed"
        );
        Ok(record)
    }

    // Discard the draft from any step. The ledger is untouched.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("booking session cancelled");
        }
    }

    fn cost_for(
        catalog: &CatalogStore,
        services: &[AdditionalService],
        session: &BookingSession,
        days: i64,
    ) -> u32 {
        let daily_rate = catalog
            .get(session.vehicle_id)
            .map(|v| v.daily_rate)
            .unwrap_or(0);
        let addons: u32 = session
            .services
            .iter()
            .filter_map(|id| find_service(services, id))
            .map(|s| s.daily_rate)
            .sum();
        (daily_rate + addons) * days as u32
    }

    // Keep the running total current while step 1 is being edited. With no
    // valid range staged yet the total reads zero.
    fn refresh_total(
        session: &mut BookingSession,
        catalog: &CatalogStore,
        services: &[AdditionalService],
        today: NaiveDate,
    ) {
        let days = match (
            session.pickup_input.as_deref(),
            session.return_input.as_deref(),
        ) {
            (Some(pickup), Some(ret)) => {
                validate_date_range(pickup, ret, today).unwrap_or(0)
            }
            _ => 0,
        };
        session.rental_days = days;
        session.total_cost = Self::cost_for(catalog, services, session, days);
    }
}

// Prefix tag, millisecond timestamp, four random digits. Unique enough per
// process run; an external identifier, not a security token.
fn confirmation_number(now: DateTime<Utc>) -> String {
    format!(
        "CR{}{:04}",
        now.timestamp_millis(),
        rand::thread_rng().gen_range(0..10_000)
    )
}
