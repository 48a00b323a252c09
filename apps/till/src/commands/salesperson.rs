//! # Salesperson Commands
//!
//! Roster maintenance. Only the name is editable; the code is fixed at
//! creation.

use chrono::Utc;
use tracing::info;

use till_core::validation::ensure_unique_code;
use till_core::{
    Change, CollectionStats, CoreError, ListQuery, Page, Salesperson, SalespersonInput,
};

use crate::error::ApiError;
use crate::notice::{Notice, Reply};
use crate::state::App;

/// Finds a salesperson by id, or by code ignoring case.
pub fn find_salesperson<'a>(roster: &'a [Salesperson], key: &str) -> Option<&'a Salesperson> {
    let key = key.trim();
    roster
        .iter()
        .find(|s| s.id == key)
        .or_else(|| roster.iter().find(|s| s.code.eq_ignore_ascii_case(key)))
}

pub async fn list_salespersons(
    app: &mut App,
    query: &ListQuery,
) -> Result<Page<Salesperson>, ApiError> {
    app.salespersons.refresh().await?;
    Ok(app.salespersons.list(query))
}

pub async fn add_salesperson(
    app: &mut App,
    input: SalespersonInput,
) -> Result<Reply<Salesperson>, ApiError> {
    app.salespersons.refresh().await?;

    let salesperson = Salesperson::create(input, Utc::now())?;
    ensure_unique_code(
        "Salesperson code",
        &salesperson.code,
        app.salespersons.items().iter().map(|s| s.code.as_str()),
    )?;

    let stored = app.salespersons.create(salesperson).await?;
    info!(code = %stored.code, "Salesperson added");
    Ok(Reply::new(stored)
        .with_notice(Notice::success("Success!", "Salesperson added successfully")))
}

pub async fn rename_salesperson(
    app: &mut App,
    key: &str,
    name: &str,
) -> Result<Reply<Salesperson>, ApiError> {
    app.salespersons.refresh().await?;
    let current = find_salesperson(app.salespersons.items(), key)
        .cloned()
        .ok_or_else(|| CoreError::SalespersonNotFound(key.to_string()))?;

    match current.apply_edit(name, Utc::now())? {
        Change::Unchanged => Ok(Reply::new(current).with_notice(Notice::no_changes("salesperson"))),
        Change::Updated(updated) => {
            let stored = app.salespersons.update(updated).await?;
            info!(code = %stored.code, "Salesperson renamed");
            Ok(Reply::new(stored)
                .with_notice(Notice::success("Updated!", "Salesperson updated successfully")))
        }
    }
}

/// Deletes a salesperson. Their past sales keep the id and show it instead
/// of a name.
pub async fn delete_salesperson(
    app: &mut App,
    key: &str,
) -> Result<Reply<Salesperson>, ApiError> {
    app.salespersons.refresh().await?;
    let target = find_salesperson(app.salespersons.items(), key)
        .cloned()
        .ok_or_else(|| CoreError::SalespersonNotFound(key.to_string()))?;

    app.salespersons.delete(&target.id).await?;
    info!(code = %target.code, "Salesperson deleted");
    Ok(Reply::new(target)
        .with_notice(Notice::success("Deleted!", "Salesperson has been deleted.")))
}

pub async fn salesperson_stats(app: &mut App) -> Result<CollectionStats, ApiError> {
    app.salespersons.refresh().await?;
    Ok(app.salespersons.stats(Utc::now()))
}
