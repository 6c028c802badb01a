use std::sync::LazyLock;

use regex::Regex;

use super::errors::ParseError;
use super::value_objects::MenuIndication;

// ============================================================================
// Order-Line Grammar
// ============================================================================
//
// Parses the payload of an `update order` directive:
//
//   simple:   N:amount                 e.g. 9:12
//   options:  N:OxA(,OxA)*             e.g. 10: 1x3, 3x2, 2x1
//
// Both forms may be mixed in one payload. Option runs are pulled out first
// (in the order they appear), the remainder is then split on commas into
// simple segments. Parsing is fail-fast.
//
// ============================================================================

const KEYWORD: &str = "update order";

static OPTION_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+:\s*(?:\d+x\d+(?:,\s*)?)+").expect("option run pattern is valid")
});

/// Parse an order-update payload into menu indications.
///
/// The leading `update order` keyword and its optional colon are accepted but
/// not required. Empty input yields an empty list.
pub fn parse_update_order(command_text: &str) -> Result<Vec<MenuIndication>, ParseError> {
    let text = command_text.strip_prefix(KEYWORD).unwrap_or(command_text);
    let text = text.strip_prefix(':').unwrap_or(text);
    let text = text.trim().replacen(' ', "", 1);

    let runs: Vec<&str> = OPTION_RUN.find_iter(&text).map(|m| m.as_str()).collect();

    // First occurrence only: a run is removed once per match, so a repeated
    // literal is consumed by its own match rather than all at once.
    let mut remainder = text.clone();
    for run in &runs {
        remainder = remainder.replacen(run, "", 1);
    }

    let mut order_items = Vec::with_capacity(runs.len());

    for run in &runs {
        let run = run.trim();
        let run = run.strip_suffix(',').unwrap_or(run);
        let mut item = parse_order_item(run)?;
        item.item_amount = join_options(&item.item_amount);
        order_items.push(item);
    }

    for segment in remainder.trim_matches(',').split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        order_items.push(parse_order_item(segment)?);
    }

    Ok(order_items)
}

/// Parse one `N:amount` segment, splitting on the first colon.
pub fn parse_order_item(segment: &str) -> Result<MenuIndication, ParseError> {
    let Some((number, amount)) = segment.split_once(':') else {
        return Err(ParseError::MissingSeparator {
            segment: segment.to_string(),
        });
    };

    let item_menu_number = number
        .trim()
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidItemNumber {
            segment: segment.to_string(),
        })?;

    let amount = amount.trim();
    let amount = amount.strip_suffix(',').unwrap_or(amount);

    Ok(MenuIndication::new(item_menu_number, amount))
}

/// `1x3, 3x2,2x1` -> `1x3,3x2,2x1`
fn join_options(amount: &str) -> String {
    amount
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split an option amount into `(option, amount)` pairs.
///
/// Returns `None` when any token is not `<digits>x<digits>`.
pub fn split_options(item_amount: &str) -> Option<Vec<(u32, u32)>> {
    item_amount
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let (option, amount) = token.split_once('x')?;
            Some((option.trim().parse().ok()?, amount.trim().parse().ok()?))
        })
        .collect()
}
