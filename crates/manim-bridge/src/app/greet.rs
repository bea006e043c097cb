//! Greeter command.

use crate::host::Notifier;

/// Fixed text shown by the `hello-data` command.
pub const GREETING: &str = "Hello Data from manim-bridge!";

/// Show the static greeting notification.
pub fn hello_data(notifier: &mut dyn Notifier) {
    notifier.info(GREETING);
}
