//! # Commands
//!
//! One async function per user intent. Each takes the [`App`] state, does
//! its work through the stores and returns either a [`Reply`] or an
//! [`ApiError`]. Nothing in here prints.
//!
//! ## Command Map
//! ```text
//! product      list | add | edit | delete | stats
//! salesperson  list | add | edit | delete | stats
//! sale         list | show | record | edit | delete | stats
//! ```
//!
//! [`App`]: crate::state::App
//! [`Reply`]: crate::notice::Reply
//! [`ApiError`]: crate::error::ApiError

pub mod product;
pub mod sale;
pub mod salesperson;

use std::str::FromStr;

/// One `--item` argument: `TEXT[:QTY[:DISCOUNT]]`.
///
/// `TEXT` is run through the product picker (exact code first, then the
/// newest partial match). Empty parts are left unset, so `COLA::10` sets
/// only the discount.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub product: String,
    pub quantity: Option<f64>,
    pub discount: Option<f64>,
}

impl ItemSpec {
    pub fn new(product: impl Into<String>) -> Self {
        ItemSpec {
            product: product.into(),
            quantity: None,
            discount: None,
        }
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn discount(mut self, discount: f64) -> Self {
        self.discount = Some(discount);
        self
    }
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let product = parts.next().unwrap_or_default().trim();
        if product.is_empty() {
            return Err("item needs a product code or name".to_string());
        }

        let number = |part: Option<&str>, what: &str| -> Result<Option<f64>, String> {
            match part.map(str::trim).filter(|p| !p.is_empty()) {
                None => Ok(None),
                Some(p) => p
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| format!("{what} '{p}' is not a number")),
            }
        };

        Ok(ItemSpec {
            product: product.to_string(),
            quantity: number(parts.next(), "quantity")?,
            discount: number(parts.next(), "discount")?,
        })
    }
}

#[cfg(test)]
pub(crate) async fn test_app() -> crate::state::App {
    use crate::state::{App, Persistence, TillConfig};
    use till_db::{Database, DbConfig};

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    App::with_backend(TillConfig::default(), Persistence::Local(db.blobs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_spec_parsing() {
        assert_eq!("COLA".parse::<ItemSpec>().unwrap(), ItemSpec::new("COLA"));
        assert_eq!(
            "COLA:2".parse::<ItemSpec>().unwrap(),
            ItemSpec::new("COLA").quantity(2.0)
        );
        assert_eq!(
            "COLA::12.5".parse::<ItemSpec>().unwrap(),
            ItemSpec::new("COLA").discount(12.5)
        );
        assert_eq!(
            "diet cola:-3:150".parse::<ItemSpec>().unwrap(),
            ItemSpec::new("diet cola").quantity(-3.0).discount(150.0)
        );
    }

    #[test]
    fn test_item_spec_errors() {
        assert!(":2".parse::<ItemSpec>().is_err());
        assert!("COLA:two".parse::<ItemSpec>().is_err());
    }
}
