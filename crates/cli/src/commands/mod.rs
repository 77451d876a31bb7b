//! CLI command implementations.
//!
//! Each command renders its output to a `String` first so the text can be
//! checked in tests; [`emit`] is the only place that writes to stdout.

pub mod cart;
pub mod catalog;
pub mod checkout;

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{}", text.trim_end());
}
