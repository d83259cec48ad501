//! Report output: print first, then optionally deliver.

use std::io::Write;

use crate::delivery::{Envelope, Mailer};
use crate::error::RunError;

/// Write `report` to `out`, then send it when `delivery` is given.
///
/// The report is always written before delivery is attempted, so a
/// delivery failure leaves it on the terminal. Returns the provider's
/// message id when a send succeeded.
pub async fn emit_report(
    report: &str,
    out: &mut (dyn Write + Send),
    delivery: Option<(&dyn Mailer, &Envelope)>,
) -> Result<Option<String>, RunError> {
    writeln!(out, "{}", report)?;
    out.flush()?;

    let Some((mailer, envelope)) = delivery else {
        return Ok(None);
    };
    let id = mailer.send(envelope).await?;
    log::info!("digest sent to {}", envelope.to);
    Ok(id)
}
