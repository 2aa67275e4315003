//! PIN challenge in front of export and print.

use dialoguer::Password;
use flood_map_municipality::{ExportPin, MunicipalityConfig};

use crate::CliError;

/// Interactive attempts allowed before giving up.
const MAX_ATTEMPTS: u32 = 3;

/// Checks the export PIN if the municipality requires one.
///
/// A PIN passed on the command line is checked once; otherwise the user is
/// prompted up to [`MAX_ATTEMPTS`] times.
pub fn require_pin(config: &MunicipalityConfig, provided: Option<&str>) -> Result<(), CliError> {
    let Some(pin) = &config.export_pin else {
        return Ok(());
    };

    if let Some(attempt) = provided {
        return check(pin, attempt);
    }

    for attempt in 1..=MAX_ATTEMPTS {
        let entered = Password::new()
            .with_prompt(format!("Export PIN ({attempt}/{MAX_ATTEMPTS})"))
            .interact()?;
        if pin.verify(&entered) {
            return Ok(());
        }
        log::warn!("Incorrect PIN");
    }

    Err(CliError::PinRejected)
}

fn check(pin: &ExportPin, attempt: &str) -> Result<(), CliError> {
    if pin.verify(attempt) {
        Ok(())
    } else {
        Err(CliError::PinRejected)
    }
}
