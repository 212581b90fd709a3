//! Order update records and field-level validation

use crate::Result;
use crate::config::ValidationConfig;
use crate::state_machine::{StateName, normalize};
use regex::Regex;
use std::fmt;

pub type OrderId = String;
pub type CustomerId = String;

/// One order-state update, as decoded from a single input line
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub timestamp: i64,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    /// Lowercased on construction
    pub state: StateName,
    pub description: String,
    pub quantity: i64,
    pub cost: f64,
    pub flagged: bool,
}

impl OrderRecord {
    pub fn new(
        timestamp: i64,
        order_id: impl Into<OrderId>,
        customer_id: impl Into<CustomerId>,
        state: &str,
        description: impl Into<String>,
        quantity: i64,
        cost: f64,
    ) -> Self {
        Self {
            timestamp,
            order_id: order_id.into(),
            customer_id: customer_id.into(),
            state: normalize(state),
            description: description.into(),
            quantity,
            cost,
            flagged: false,
        }
    }
}

/// A single failed field rule
#[derive(Debug, Clone, PartialEq)]
pub enum FieldIssue {
    TimestampBelowMinimum { timestamp: i64, minimum: i64 },
    Empty(&'static str),
    PatternMismatch { field: &'static str, value: String },
    QuantityNotPositive(i64),
    QuantityAboveMaximum { quantity: i64, maximum: i64 },
    CostNotFinite,
    CostNegative(f64),
    CostAboveMaximum { cost: f64, maximum: f64 },
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldIssue::TimestampBelowMinimum { timestamp, minimum } => {
                write!(f, "timestamp {} is below {}", timestamp, minimum)
            }
            FieldIssue::Empty(field) => write!(f, "{} is empty", field),
            FieldIssue::PatternMismatch { field, value } => {
                write!(f, "{} '{}' does not match the required pattern", field, value)
            }
            FieldIssue::QuantityNotPositive(q) => write!(f, "quantity {} is not positive", q),
            FieldIssue::QuantityAboveMaximum { quantity, maximum } => {
                write!(f, "quantity {} exceeds {}", quantity, maximum)
            }
            FieldIssue::CostNotFinite => write!(f, "cost is not a finite number"),
            FieldIssue::CostNegative(c) => write!(f, "cost {} is negative", c),
            FieldIssue::CostAboveMaximum { cost, maximum } => {
                write!(f, "cost {} exceeds {}", cost, maximum)
            }
        }
    }
}

/// Field-level admissibility check run before any transition logic
pub trait FieldValidator {
    /// Every rule the record breaks; empty when the record is valid
    fn check(&self, record: &OrderRecord) -> Vec<FieldIssue>;

    fn is_valid(&self, record: &OrderRecord) -> bool {
        self.check(record).is_empty()
    }
}

/// Default validator driven by the `[validation]` config section
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub min_timestamp: i64,
    pub max_quantity: Option<i64>,
    pub max_cost: Option<f64>,
    pub require_description: bool,
    pub order_id_pattern: Option<Regex>,
    pub customer_id_pattern: Option<Regex>,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            min_timestamp: 0,
            max_quantity: None,
            max_cost: None,
            require_description: true,
            order_id_pattern: None,
            customer_id_pattern: None,
        }
    }
}

impl FieldRules {
    /// Compile rules from configuration
    pub fn from_config(config: &ValidationConfig) -> Result<Self> {
        let compile = |pattern: &Option<String>| -> Result<Option<Regex>> {
            pattern
                .as_deref()
                .map(|p| Regex::new(&format!("^(?:{})$", p)))
                .transpose()
                .map_err(Into::into)
        };

        Ok(Self {
            min_timestamp: config.min_timestamp,
            max_quantity: config.max_quantity,
            max_cost: config.max_cost,
            require_description: config.require_description,
            order_id_pattern: compile(&config.order_id_pattern)?,
            customer_id_pattern: compile(&config.customer_id_pattern)?,
        })
    }
}

impl FieldValidator for FieldRules {
    fn check(&self, record: &OrderRecord) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        if record.timestamp < self.min_timestamp {
            issues.push(FieldIssue::TimestampBelowMinimum {
                timestamp: record.timestamp,
                minimum: self.min_timestamp,
            });
        }

        let required = [
            ("order id", &record.order_id, true),
            ("customer id", &record.customer_id, true),
            ("state", &record.state, true),
            ("description", &record.description, self.require_description),
        ];
        for (field, value, needed) in required {
            if needed && value.is_empty() {
                issues.push(FieldIssue::Empty(field));
            }
        }

        let patterns = [
            ("order id", &record.order_id, &self.order_id_pattern),
            ("customer id", &record.customer_id, &self.customer_id_pattern),
        ];
        for (field, value, pattern) in patterns {
            if let Some(re) = pattern
                && !value.is_empty()
                && !re.is_match(value)
            {
                issues.push(FieldIssue::PatternMismatch {
                    field,
                    value: value.clone(),
                });
            }
        }

        if record.quantity <= 0 {
            issues.push(FieldIssue::QuantityNotPositive(record.quantity));
        } else if let Some(maximum) = self.max_quantity
            && record.quantity > maximum
        {
            issues.push(FieldIssue::QuantityAboveMaximum {
                quantity: record.quantity,
                maximum,
            });
        }

        if !record.cost.is_finite() {
            issues.push(FieldIssue::CostNotFinite);
        } else if record.cost < 0.0 {
            issues.push(FieldIssue::CostNegative(record.cost));
        } else if let Some(maximum) = self.max_cost
            && record.cost > maximum
        {
            issues.push(FieldIssue::CostAboveMaximum {
                cost: record.cost,
                maximum,
            });
        }

        issues
    }
}
