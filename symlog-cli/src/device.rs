//! Target reset via the vendor flash tool.

use std::process::Command;
use std::thread::sleep;
use std::time::Duration;

/// How long the target needs after a reset before it starts logging.
const RESET_SETTLE: Duration = Duration::from_millis(500);

/// Reset the target with `commander device reset`.
///
/// Failures are reported but never fatal: the console is still useful
/// against a board that is already running.
pub fn reset_device() {
    println!("Resetting device using commander...");
    match Command::new("commander").args(["device", "reset"]).status() {
        Ok(status) if status.success() => {
            println!("Device reset complete.");
        }
        Ok(status) => {
            log::warn!("commander device reset exited with {status}");
            println!("Warning: device reset failed, continuing anyway.");
        }
        Err(err) => {
            log::warn!("could not run commander: {err}");
            println!("Warning: commander not found, skipping device reset.");
        }
    }
    // Give the target time to boot before we start listening.
    sleep(RESET_SETTLE);
}
