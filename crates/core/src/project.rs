//! Project catalog rules: status values, pricing, and counters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Rupees;

pub const PROJECT_STATUS_ACTIVE: &str = "active";
pub const PROJECT_STATUS_INACTIVE: &str = "inactive";

pub const VALID_PROJECT_STATUSES: &[&str] = &[PROJECT_STATUS_ACTIVE, PROJECT_STATUS_INACTIVE];

pub fn validate_project_status(status: &str) -> Result<(), CoreError> {
    if VALID_PROJECT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid project status '{status}'. Must be one of: {}",
            VALID_PROJECT_STATUSES.join(", ")
        )))
    }
}

/// Validate a listing's price pair.
pub fn validate_pricing(price: Rupees, discounted_price: Option<Rupees>) -> Result<(), CoreError> {
    if price < 0 {
        return Err(CoreError::Validation("Price must not be negative".into()));
    }
    if let Some(d) = discounted_price {
        if d < 0 || d > price {
            return Err(CoreError::Validation(
                "Discounted price must be between 0 and the price".into(),
            ));
        }
    }
    Ok(())
}

/// The price a buyer pays: the discounted price when set.
pub fn effective_price(price: Rupees, discounted_price: Option<Rupees>) -> Rupees {
    discounted_price.unwrap_or(price)
}

/// Per-project counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCounter {
    Views,
    Requests,
    Sales,
    Revenue,
}

impl ProjectCounter {
    /// Column holding the counter in the `projects` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Requests => "requests",
            Self::Sales => "sales",
            Self::Revenue => "revenue",
        }
    }
}

impl FromStr for ProjectCounter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "views" => Ok(Self::Views),
            "requests" => Ok(Self::Requests),
            "sales" => Ok(Self::Sales),
            "revenue" => Ok(Self::Revenue),
            other => Err(CoreError::Validation(format!(
                "Unknown project counter '{other}'"
            ))),
        }
    }
}

/// Counters only grow.
pub fn validate_counter_delta(delta: i64) -> Result<(), CoreError> {
    if delta < 0 {
        return Err(CoreError::Validation(
            "Counter increments must not be negative".into(),
        ));
    }
    Ok(())
}
