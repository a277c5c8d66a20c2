//! Human-facing request codes of the form `REQ-<year>-<4 digits>`.
//!
//! Codes are random and can collide; the `requests.request_code` column is
//! unique and callers regenerate up to [`MAX_CODE_ATTEMPTS`] times.

use std::sync::LazyLock;

use chrono::Datelike;
use rand::Rng;
use regex::Regex;

/// Number of codes to try before giving up on an insert.
pub const MAX_CODE_ATTEMPTS: usize = 5;

static REQUEST_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^REQ-\d{4}-\d{4}$").expect("valid request code regex"));

/// Generate a code for the current UTC year.
pub fn generate_request_code() -> String {
    generate_for_year(chrono::Utc::now().year(), &mut rand::rng())
}

/// Generate a code for `year` using the given RNG.
pub fn generate_for_year<R: Rng + ?Sized>(year: i32, rng: &mut R) -> String {
    let suffix: u32 = rng.random_range(0..10_000);
    format!("REQ-{year}-{suffix:04}")
}

/// Whether `code` has the `REQ-YYYY-NNNN` shape.
pub fn is_valid_request_code(code: &str) -> bool {
    REQUEST_CODE_RE.is_match(code)
}
