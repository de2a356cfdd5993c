//! Reply formatting for roll results.

use crate::core::config::RollApi;
use crate::core::models::{RollResult, display_number};

/// Reply sent when the dice service failed without a message for the user.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't reach the dice roller right now. Please try again later.";

/// Renders a roll result as chat text.
///
/// `TotalOnly` replies with the bare total. The other variants list every die
/// as `d{size}: {value}` and close with `{instruction}: {total}`.
#[must_use]
pub fn format_reply(result: &RollResult, api: RollApi) -> String {
    match api {
        RollApi::TotalOnly => display_number(&result.total),
        RollApi::Breakdown | RollApi::Structured => format_breakdown(result),
    }
}

fn format_breakdown(result: &RollResult) -> String {
    let mut lines: Vec<String> = result
        .rolls
        .iter()
        .map(|roll| {
            format!(
                "d{}: {}",
                display_number(&roll.dice),
                display_number(&roll.value)
            )
        })
        .collect();

    lines.push(match &result.instruction {
        Some(instruction) => format!("{instruction}: {}", display_number(&result.total)),
        None => display_number(&result.total),
    });

    lines.join("\n")
}
