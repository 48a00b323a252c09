//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  ├── ValidationError  - Single-field input failures                    │
//! │  └── LineItemError    - One row of a sale that cannot be saved         │
//! │                                                                         │
//! │  till-db errors (separate crate)                                       │
//! │  └── DbError          - Blob store failures                            │
//! │                                                                         │
//! │  till-remote errors (separate crate)                                   │
//! │  └── RemoteError      - HTTP failures                                  │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → printed notice         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, row, ID)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are caught at the
/// command boundary and shown to the user; none of them is fatal.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale must name the salesperson who made it.
    #[error("Please select a salesperson")]
    MissingSalesperson,

    /// A sale must carry at least one line item.
    #[error("Please add at least one product")]
    EmptySale,

    /// One or more line items cannot be saved.
    ///
    /// ## User Workflow
    /// ```text
    /// Save sale with 3 rows
    ///      │
    ///      ▼
    /// Row 2: qty 0, Row 3: price 0
    ///      │
    ///      ▼
    /// InvalidLineItems([Row 2 .., Row 3 ..])   ← every problem, not just the first
    ///      │
    ///      ▼
    /// UI shows all rows at once
    /// ```
    #[error("{}", join_lines(.0))]
    InvalidLineItems(Vec<LineItemError>),

    /// The lines add up to more than can be stored.
    #[error("Total sale amount is too large")]
    TotalTooLarge,

    /// The computed sale total is zero or negative.
    #[error("Total sale amount must be greater than zero")]
    NonPositiveTotal,

    /// The referenced salesperson does not exist in the roster.
    #[error("Salesperson not found: {0}")]
    SalespersonNotFound(String),

    /// No product matched the picker query.
    #[error("No product matches '{0}'")]
    ProductNotFound(String),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// The line to change is not part of the sale.
    #[error("Product {0} is not in this sale")]
    LineNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn join_lines(errors: &[LineItemError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Line Item Error
// =============================================================================

/// What is wrong with a single sale row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemProblem {
    /// Quantity below 1.
    Quantity,
    /// Discount outside 0..=100%.
    Discount,
    /// Unit price zero or negative.
    Price,
    /// The discounted amount is zero or negative.
    Amount,
    /// The discounted amount does not fit in cents.
    TooLarge,
}

impl fmt::Display for LineItemProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LineItemProblem::Quantity => "Quantity must be at least 1",
            LineItemProblem::Discount => "Discount must be between 0% and 100%",
            LineItemProblem::Price => "Invalid retail price",
            LineItemProblem::Amount => "Item amount cannot be zero or negative",
            LineItemProblem::TooLarge => "Item amount is too large",
        };
        f.write_str(text)
    }
}

/// A problem found on one row of a sale, numbered from 1 as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Row {row}: {problem}")]
pub struct LineItemError {
    pub row: usize,
    pub problem: LineItemProblem,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., bad amount, bad code characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product code).
    #[error("{field} \"{value}\" already exists. Please use a different code.")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_error_message() {
        let err = LineItemError {
            row: 2,
            problem: LineItemProblem::Quantity,
        };
        assert_eq!(err.to_string(), "Row 2: Quantity must be at least 1");
    }

    #[test]
    fn test_invalid_line_items_lists_every_row() {
        let err = CoreError::InvalidLineItems(vec![
            LineItemError {
                row: 1,
                problem: LineItemProblem::Price,
            },
            LineItemError {
                row: 3,
                problem: LineItemProblem::Amount,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Row 1: Invalid retail price\nRow 3: Item amount cannot be zero or negative"
        );
    }

    #[test]
    fn test_duplicate_message() {
        let err = ValidationError::Duplicate {
            field: "Product code".to_string(),
            value: "BEV-001".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Product code \"BEV-001\" already exists. Please use a different code."
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
