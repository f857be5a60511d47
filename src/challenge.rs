//! The 52 week savings challenge: save `k` more every week than the week
//! before and see how much that adds up to.

use crate::{Error, alert::Alert};

/// The title of the challenge result notice.
pub const CHALLENGE_TITLE: &str = "52 Week Challenge";

/// The last week counted by [total_savings].
pub const CHALLENGE_WEEKS: u64 = 52;

/// Parse the weekly increment entered by the user.
///
/// # Errors
/// Returns [Error::InvalidIncrement] if the text is empty, not a whole number
/// or negative. Missing input is not treated as zero.
pub fn parse_increment(text: &str) -> Result<u64, Error> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidIncrement(text.to_owned()))
}

/// The total saved when week `count` puts away `increment * count`.
///
/// Weeks are counted from 0 up to and including [CHALLENGE_WEEKS], so the
/// sum has 53 terms, e.g. an increment of 10 saves 13780.
///
/// # Errors
/// Returns [Error::IncrementTooLarge] if the total overflows.
pub fn total_savings(increment: u64) -> Result<u64, Error> {
    let mut total: u64 = 0;

    for count in 0..=CHALLENGE_WEEKS {
        total = increment
            .checked_mul(count)
            .and_then(|saved| total.checked_add(saved))
            .ok_or(Error::IncrementTooLarge(increment))?;
    }

    Ok(total)
}

/// The message shown with the result.
pub fn challenge_message(total: u64) -> String {
    format!("You would save a total of ${total}")
}

/// Parse `text` and return the result notice, titled [CHALLENGE_TITLE].
///
/// # Errors
/// Returns the errors of [parse_increment] and [total_savings].
pub fn run_challenge(text: &str) -> Result<Alert, Error> {
    let increment = parse_increment(text)?;
    let total = total_savings(increment)?;
    tracing::debug!("Savings challenge with increment {increment} totals {total}");

    Ok(Alert::success(CHALLENGE_TITLE, &challenge_message(total)))
}
