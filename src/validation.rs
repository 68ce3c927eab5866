// Pure validation predicates for the booking flow: the pickup/return date
// gate and the customer profile checks. No vehicle or ledger state is
// consulted here; everything is deterministic given its inputs.

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::ledger::CustomerProfile;

pub const MIN_RENTAL_DAYS: i64 = 1;
pub const MAX_RENTAL_DAYS: i64 = 30;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("enter valid pickup and return dates")]
    InvalidDate,

    #[error("pickup date cannot be in the past")]
    PickupInPast,

    #[error("return date must be after the pickup date")]
    ReturnBeforePickup,

    #[error("rental must be at least {MIN_RENTAL_DAYS} day")]
    RangeTooShort,

    #[error("rental cannot exceed {MAX_RENTAL_DAYS} days, got {0}")]
    RangeTooLong(i64),
}

// Gate a candidate pickup/return pair. Rules run in order and the first
// failure wins; success yields the rental day count.
pub fn validate_date_range(
    pickup: &str,
    ret: &str,
    today: NaiveDate,
) -> Result<i64, DateRangeError> {
    let pickup = parse_date(pickup).ok_or(DateRangeError::InvalidDate)?;
    let ret = parse_date(ret).ok_or(DateRangeError::InvalidDate)?;

    if pickup < today {
        return Err(DateRangeError::PickupInPast);
    }
    if ret <= pickup {
        return Err(DateRangeError::ReturnBeforePickup);
    }

    let days = (ret - pickup).num_days();
    if days < MIN_RENTAL_DAYS {
        // Unreachable at whole-day granularity, but the rule stands on its
        // own should the inputs ever carry finer resolution.
        return Err(DateRangeError::RangeTooShort);
    }
    if days > MAX_RENTAL_DAYS {
        return Err(DateRangeError::RangeTooLong(days));
    }

    Ok(days)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct CustomerError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl CustomerError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            reason: "must not be empty",
        }
    }
}

// Customer profile validator. The patterns compile once at construction,
// same as the address validators elsewhere in the stack.
pub struct CustomerValidator {
    email_re: Regex,
    // Philippine mobile numbers: 09XXXXXXXXX or +639XXXXXXXXX.
    phone_re: Regex,
}

impl Default for CustomerValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerValidator {
    pub fn new() -> Self {
        Self {
            email_re: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap(),
            phone_re: Regex::new(r"^(09\d{9}|\+639\d{9})$").unwrap(),
        }
    }

    // Checks run field by field in form order; the first failing field is
    // reported so the UI can point at it.
    pub fn validate(&self, customer: &CustomerProfile) -> Result<(), CustomerError> {
        if customer.full_name.trim().is_empty() {
            return Err(CustomerError::required("full_name"));
        }
        if customer.email.trim().is_empty() {
            return Err(CustomerError::required("email"));
        }
        if !self.email_re.is_match(customer.email.trim()) {
            return Err(CustomerError {
                field: "email",
                reason: "must be a valid email address",
            });
        }
        if customer.phone.trim().is_empty() {
            return Err(CustomerError::required("phone"));
        }
        if !self.phone_re.is_match(customer.phone.trim()) {
            return Err(CustomerError {
                field: "phone",
                reason: "must be a valid mobile number (09XXXXXXXXX or +639XXXXXXXXX)",
            });
        }
        if customer.address.trim().is_empty() {
            return Err(CustomerError::required("address"));
        }
        if customer.license_number.trim().is_empty() {
            return Err(CustomerError::required("license_number"));
        }
        Ok(())
    }
}
