//! Store name suggestion.
//!
//! # Usage
//!
//! ```bash
//! cotd pick-store
//! ```
//!
//! Prints a name such as `gorgeous-smoky-trout`. Pass it to `cotd store` to
//! open the store.

use catch_of_the_day_core::StoreId;
use catch_of_the_day_storefront::picker;
use tokio::io::AsyncWriteExt;

/// Print a suggested store name.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub async fn pick_store() -> Result<(), Box<dyn std::error::Error>> {
    let name = StoreId::parse(&picker::fun_name())?;
    tracing::debug!(store_id = %name, "Suggested store name");

    let mut out = tokio::io::stdout();
    out.write_all(format!("{name}\n").as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
