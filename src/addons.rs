// Additional rental services: fixed, read-only reference data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalService {
    pub id: String,
    pub name: String,
    // Per-day rate in whole pesos.
    pub daily_rate: u32,
    pub description: String,
}

pub fn seed_services() -> Vec<AdditionalService> {
    vec![
        AdditionalService {
            id: "child-seat".to_string(),
            name: "Child Seat".to_string(),
            daily_rate: 150,
            description: "ISOFIX-compatible child seat for ages 1-6.".to_string(),
        },
        AdditionalService {
            id: "gps".to_string(),
            name: "GPS Unit".to_string(),
            daily_rate: 200,
            description: "Dash-mounted navigation unit with offline maps.".to_string(),
        },
        AdditionalService {
            id: "extra-driver".to_string(),
            name: "Additional Driver".to_string(),
            daily_rate: 300,
            description: "Registers a second licensed driver on the rental.".to_string(),
        },
        AdditionalService {
            id: "full-insurance".to_string(),
            name: "Full Coverage Insurance".to_string(),
            daily_rate: 500,
            description: "Zero-deductible coverage for collision and theft.".to_string(),
        },
        AdditionalService {
            id: "pocket-wifi".to_string(),
            name: "Pocket WiFi".to_string(),
            daily_rate: 250,
            description: "Portable LTE hotspot, up to 10 devices.".to_string(),
        },
    ]
}

pub fn find_service<'a>(
    services: &'a [AdditionalService],
    id: &str,
) -> Option<&'a AdditionalService> {
    services.iter().find(|s| s.id == id)
}
