// Vehicle catalog: static reference data plus the derived availability flag
// and the browsing helpers (search, filter, sort, comparison tray).

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// A vehicle in the rental fleet. Seeded once at startup; `available` is
// recomputed from the booking ledger, never hand-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    pub brand: String,
    pub model: String,
    pub vehicle_type: String,
    pub year: u16,
    // Daily rate in whole pesos.
    pub daily_rate: u32,
    pub transmission: String,
    pub fuel_type: String,
    pub mileage_km: u32,
    pub seats: u8,
    pub features: Vec<String>,
    pub description: String,
    pub available: bool,
}

// Criteria for narrowing the catalog listing. All fields are optional and
// combined with AND; `None` means "no restriction".
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub vehicle_type: Option<String>,
    pub brand: Option<String>,
    pub min_daily_rate: Option<u32>,
    pub max_daily_rate: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceLowToHigh,
    PriceHighToLow,
    YearNewest,
    YearOldest,
}

// The catalog store. Reads hand out cloned snapshots so callers never hold
// the lock across their own logic; only the availability engine mutates the
// cached flags.
pub struct CatalogStore {
    vehicles: RwLock<Vec<Vehicle>>,
}

impl CatalogStore {
    pub fn new(seed: Vec<Vehicle>) -> Self {
        Self {
            vehicles: RwLock::new(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.vehicles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.read().is_empty()
    }

    // Snapshot of the full listing in seed order.
    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles.read().clone()
    }

    pub fn get(&self, id: u32) -> Option<Vehicle> {
        self.vehicles.read().iter().find(|v| v.id == id).cloned()
    }

    // The coarse listing flag. A missing vehicle is simply not bookable.
    pub fn is_listed_available(&self, id: u32) -> bool {
        self.vehicles
            .read()
            .iter()
            .any(|v| v.id == id && v.available)
    }

    pub(crate) fn set_available(&self, id: u32, available: bool) {
        let mut vehicles = self.vehicles.write();
        if let Some(vehicle) = vehicles.iter_mut().find(|v| v.id == id) {
            vehicle.available = available;
        }
    }

    // Case-insensitive substring search over brand, model and type.
    pub fn search(&self, term: &str) -> Vec<Vehicle> {
        let term = term.to_lowercase();
        self.vehicles
            .read()
            .iter()
            .filter(|v| {
                v.brand.to_lowercase().contains(&term)
                    || v.model.to_lowercase().contains(&term)
                    || v.vehicle_type.to_lowercase().contains(&term)
            })
            .cloned()
            .collect()
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Vehicle> {
        self.vehicles
            .read()
            .iter()
            .filter(|v| {
                criteria
                    .vehicle_type
                    .as_ref()
                    .map_or(true, |t| &v.vehicle_type == t)
                    && criteria.brand.as_ref().map_or(true, |b| &v.brand == b)
                    && criteria.min_daily_rate.map_or(true, |min| v.daily_rate >= min)
                    && criteria.max_daily_rate.map_or(true, |max| v.daily_rate <= max)
            })
            .cloned()
            .collect()
    }

    // Stable sort over a snapshot; the stored order is untouched.
    pub fn sorted(&self, key: SortKey) -> Vec<Vehicle> {
        let mut vehicles = self.vehicles();
        match key {
            SortKey::PriceLowToHigh => vehicles.sort_by_key(|v| v.daily_rate),
            SortKey::PriceHighToLow => {
                vehicles.sort_by(|a, b| b.daily_rate.cmp(&a.daily_rate))
            }
            SortKey::YearNewest => vehicles.sort_by(|a, b| b.year.cmp(&a.year)),
            SortKey::YearOldest => vehicles.sort_by_key(|v| v.year),
        }
        vehicles
    }
}

// Side-by-side comparison tray, capped at three vehicles.
pub const COMPARISON_LIMIT: usize = 3;

#[derive(Debug, Default)]
pub struct ComparisonTray {
    slots: Vec<Vehicle>,
}

impl ComparisonTray {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns false when the tray is full. Adding a vehicle that is already
    // in the tray is a no-op and counts as success.
    pub fn add(&mut self, vehicle: Vehicle) -> bool {
        if self.slots.iter().any(|v| v.id == vehicle.id) {
            return true;
        }
        if self.slots.len() >= COMPARISON_LIMIT {
            return false;
        }
        self.slots.push(vehicle);
        true
    }

    pub fn remove(&mut self, id: u32) {
        self.slots.retain(|v| v.id != id);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// The stock fleet for the storefront. Rates are whole pesos per day.
pub fn seed_catalog() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: 1,
            brand: "Toyota".to_string(),
            model: "Vios".to_string(),
            vehicle_type: "Sedan".to_string(),
            year: 2022,
            daily_rate: 1500,
            transmission: "Automatic".to_string(),
            fuel_type: "Gasoline".to_string(),
            mileage_km: 28_000,
            seats: 5,
            features: vec![
                "Air Conditioning".to_string(),
                "Bluetooth".to_string(),
                "Backup Camera".to_string(),
            ],
            description: "Reliable and fuel-efficient city sedan, ideal for daily errands."
                .to_string(),
            available: true,
        },
        Vehicle {
            id: 2,
            brand: "Honda".to_string(),
            model: "Civic".to_string(),
            vehicle_type: "Sedan".to_string(),
            year: 2023,
            daily_rate: 2200,
            transmission: "CVT".to_string(),
            fuel_type: "Gasoline".to_string(),
            mileage_km: 15_000,
            seats: 5,
            features: vec![
                "Air Conditioning".to_string(),
                "Apple CarPlay".to_string(),
                "Cruise Control".to_string(),
                "Lane Assist".to_string(),
            ],
            description: "Sporty compact sedan with a modern cabin and driver aids.".to_string(),
            available: true,
        },
        Vehicle {
            id: 3,
            brand: "Toyota".to_string(),
            model: "Fortuner".to_string(),
            vehicle_type: "SUV".to_string(),
            year: 2022,
            daily_rate: 3500,
            transmission: "Automatic".to_string(),
            fuel_type: "Diesel".to_string(),
            mileage_km: 35_000,
            seats: 7,
            features: vec![
                "4x4".to_string(),
                "Leather Seats".to_string(),
                "Hill Start Assist".to_string(),
            ],
            description: "Seven-seater SUV built for provincial trips and rough roads."
                .to_string(),
            available: true,
        },
        Vehicle {
            id: 4,
            brand: "Mitsubishi".to_string(),
            model: "Montero Sport".to_string(),
            vehicle_type: "SUV".to_string(),
            year: 2021,
            daily_rate: 3200,
            transmission: "Automatic".to_string(),
            fuel_type: "Diesel".to_string(),
            mileage_km: 42_000,
            seats: 7,
            features: vec![
                "4x4".to_string(),
                "Rear Entertainment".to_string(),
                "Paddle Shifters".to_string(),
            ],
            description: "Comfortable midsize SUV with strong diesel torque.".to_string(),
            available: true,
        },
        Vehicle {
            id: 5,
            brand: "Ford".to_string(),
            model: "Ranger".to_string(),
            vehicle_type: "Pickup".to_string(),
            year: 2023,
            daily_rate: 3000,
            transmission: "Automatic".to_string(),
            fuel_type: "Diesel".to_string(),
            mileage_km: 18_000,
            seats: 5,
            features: vec![
                "4x4".to_string(),
                "Tow Hitch".to_string(),
                "Bed Liner".to_string(),
            ],
            description: "Capable pickup for cargo runs and out-of-town hauls.".to_string(),
            available: true,
        },
        Vehicle {
            id: 6,
            brand: "Toyota".to_string(),
            model: "Hiace".to_string(),
            vehicle_type: "Van".to_string(),
            year: 2020,
            daily_rate: 4000,
            transmission: "Manual".to_string(),
            fuel_type: "Diesel".to_string(),
            mileage_km: 65_000,
            seats: 12,
            features: vec![
                "Dual Air Conditioning".to_string(),
                "High Roof".to_string(),
            ],
            description: "Twelve-seater van for group outings and airport transfers."
                .to_string(),
            available: true,
        },
        Vehicle {
            id: 7,
            brand: "Suzuki".to_string(),
            model: "Ertiga".to_string(),
            vehicle_type: "MPV".to_string(),
            year: 2022,
            daily_rate: 1800,
            transmission: "Automatic".to_string(),
            fuel_type: "Gasoline".to_string(),
            mileage_km: 22_000,
            seats: 7,
            features: vec![
                "Air Conditioning".to_string(),
                "Foldable Third Row".to_string(),
            ],
            description: "Budget-friendly seven-seater for small families.".to_string(),
            available: true,
        },
        Vehicle {
            id: 8,
            brand: "Honda".to_string(),
            model: "CR-V".to_string(),
            vehicle_type: "SUV".to_string(),
            year: 2023,
            daily_rate: 2800,
            transmission: "CVT".to_string(),
            fuel_type: "Gasoline".to_string(),
            mileage_km: 12_000,
            seats: 5,
            features: vec![
                "Sunroof".to_string(),
                "Honda Sensing".to_string(),
                "Power Tailgate".to_string(),
            ],
            description: "Refined crossover with a full suite of safety features.".to_string(),
            available: true,
        },
    ]
}
