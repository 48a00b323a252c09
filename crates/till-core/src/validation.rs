//! # Validation Module
//!
//! Field validation for user-entered values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI parsing (clap)                                           │
//! │  ├── Types: numbers are numbers, amounts parse as Money                │
//! │  └── Immediate usage errors                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, code characters                         │
//! │  └── Code uniqueness within a collection                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: pricing::validate_sale                                       │
//! │  └── Whole-sale rules (salesperson, lines, total)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators return the cleaned value (trimmed, empty optional text turned
//! into `None`) so callers store exactly what was checked.

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CODE_LEN, MAX_COMMENTS_LEN, MAX_NAME_LEN, PAGE_SIZES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or salesperson code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, numbers, hyphens and underscores
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_code;
///
/// assert_eq!(validate_code("Product code", " BEV-001 ").unwrap(), "BEV-001");
/// assert!(validate_code("Product code", "").is_err());
/// assert!(validate_code("Product code", "BEV 001").is_err());
/// ```
pub fn validate_code(field: &str, code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_string())
}

/// Validates a display name (product or salesperson).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates free-text sale comments. Blank comments become `None`.
pub fn validate_comments(comments: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(comments) = comments.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };

    if comments.chars().count() > MAX_COMMENTS_LEN {
        return Err(ValidationError::TooLong {
            field: "Comments".to_string(),
            max: MAX_COMMENTS_LEN,
        });
    }

    Ok(Some(comments.to_string()))
}

/// Validates an optional image URL. Blank becomes `None`.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_image_url;
///
/// assert_eq!(validate_image_url(Some("  ")).unwrap(), None);
/// assert!(validate_image_url(Some("https://cdn.example.com/a.png")).is_ok());
/// assert!(validate_image_url(Some("a.png")).is_err());
/// ```
pub fn validate_image_url(url: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ValidationError::InvalidFormat {
            field: "Image URL".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    Ok(Some(url.to_string()))
}

/// Validates a search query. Returns the trimmed, lowercased needle.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_lowercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed here; a zero retail price is caught per line when sold
pub fn validate_price(field: &str, price: Money) -> ValidationResult<Money> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(price)
}

/// Validates a list page size against the offered sizes.
pub fn validate_page_size(per_page: usize) -> ValidationResult<usize> {
    if PAGE_SIZES.contains(&per_page) {
        return Ok(per_page);
    }
    Err(ValidationError::InvalidFormat {
        field: "page size".to_string(),
        reason: format!("must be one of {:?}", PAGE_SIZES),
    })
}

// =============================================================================
// Uniqueness
// =============================================================================

/// Rejects a code that already exists in the collection, ignoring case.
///
/// ## User Workflow
/// ```text
/// product add --code bev-001
///      │
///      ▼
/// existing codes: ["BEV-001", "SNK-002"]
///      │
///      ▼
/// ensure_unique_code ← THIS FUNCTION
///      │
///      ▼
/// Err: Product code "bev-001" already exists. Please use a different code.
/// ```
pub fn ensure_unique_code<'a>(
    field: &str,
    code: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> ValidationResult<()> {
    let wanted = code.to_lowercase();
    if existing.into_iter().any(|c| c.to_lowercase() == wanted) {
        return Err(ValidationError::Duplicate {
            field: field.to_string(),
            value: code.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert_eq!(validate_code("code", "BEV-001").unwrap(), "BEV-001");
        assert_eq!(validate_code("code", "sp_12").unwrap(), "sp_12");
        assert!(validate_code("code", "   ").is_err());
        assert!(validate_code("code", &"A".repeat(51)).is_err());
        assert!(validate_code("code", "BEV.001").is_err());
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("name", "  Cola 330ml ").unwrap(), "Cola 330ml");
        assert!(matches!(
            validate_name("name", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_name("name", &"n".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_comments() {
        assert_eq!(validate_comments(None).unwrap(), None);
        assert_eq!(validate_comments(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_comments(Some(" paid cash ")).unwrap(),
            Some("paid cash".to_string())
        );
        assert!(validate_comments(Some(&"x".repeat(1001))).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("Cost price", Money::zero()).is_ok());
        assert!(validate_price("Cost price", Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_page_size() {
        assert_eq!(validate_page_size(25).unwrap(), 25);
        assert!(validate_page_size(7).is_err());
    }

    #[test]
    fn test_search_query_is_lowercased() {
        assert_eq!(validate_search_query("  BEV ").unwrap(), "bev");
    }

    #[test]
    fn test_unique_code_ignores_case() {
        let existing = ["BEV-001", "SNK-002"];
        let err = ensure_unique_code("Product code", "bev-001", existing).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Product code \"bev-001\" already exists. Please use a different code."
        );
        assert!(ensure_unique_code("Product code", "BEV-002", existing).is_ok());
    }
}
