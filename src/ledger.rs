// Booking ledger: the append-only collection of confirmed rentals and the
// persistence contract it is saved through. The store semantics are
// deliberately blunt: load the whole collection, replace the whole
// collection, keyed under a single named slot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger format error: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    // The only terminal status reachable in the current flow; records are
    // immutable once written, so there is no cancelled or amended state.
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub license_number: String,
    pub license_expiry: NaiveDate,
}

// A confirmed rental. Created only at successful payment commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub confirmation_number: String,
    pub vehicle_id: u32,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub pickup_location: String,
    // Selected add-on service ids, in selection order.
    pub services: Vec<String>,
    pub total_cost: u32,
    pub customer: CustomerProfile,
    pub payment_method: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn rental_days(&self) -> i64 {
        (self.return_date - self.pickup_date).num_days()
    }
}

// Whole-collection read/replace. No partial update protocol exists: a save
// rewrites everything under the slot.
pub trait LedgerStore {
    fn load(&self) -> Result<Vec<BookingRecord>, StoreError>;
    fn save(&self, records: &[BookingRecord]) -> Result<(), StoreError>;
}

pub const DEFAULT_SLOT: &str = "carRentalBookings";

// File-backed store. The file holds one JSON object mapping slot names to
// record arrays; a missing file reads as an empty ledger.
pub struct JsonFileStore {
    path: PathBuf,
    slot: String,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_slot(path, DEFAULT_SLOT)
    }

    pub fn with_slot(path: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            slot: slot.to_string(),
        }
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Vec<BookingRecord>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "ledger file absent, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut slots: BTreeMap<String, Vec<BookingRecord>> = serde_json::from_str(&raw)?;
        Ok(slots.remove(&self.slot).unwrap_or_default())
    }

    fn save(&self, records: &[BookingRecord]) -> Result<(), StoreError> {
        let mut slots = BTreeMap::new();
        slots.insert(self.slot.clone(), records);
        let raw = serde_json::to_string_pretty(&slots)?;
        std::fs::write(&self.path, raw)?;
        debug!(
            path = %self.path.display(),
            count = records.len(),
            "ledger saved"
        );
        Ok(())
    }
}

// In-process store. Clones share the same backing slot, which lets tests
// model two booking sessions racing over one ledger.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<BookingRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Vec<BookingRecord>, StoreError> {
        Ok(self.records.read().clone())
    }

    fn save(&self, records: &[BookingRecord]) -> Result<(), StoreError> {
        *self.records.write() = records.to_vec();
        Ok(())
    }
}
