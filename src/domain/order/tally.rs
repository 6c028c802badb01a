use std::fmt::Write as _;

use crate::domain::catalogue::{Catalogue, CatalogueItem};

use super::errors::TallyError;
use super::grammar::split_options;
use super::value_objects::{CustomerOrder, MenuIndication};

// ============================================================================
// Order Tally - prices a pending order against the catalogue
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyLine {
    pub item_menu_number: u32,
    pub description: String,
    pub quantity: u64,
    pub line_total_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub order_id: String,
    pub lines: Vec<TallyLine>,
    pub total_cents: u64,
}

impl Tally {
    pub fn summary(&self, catalogue: &Catalogue) -> String {
        let mut out = format!("Order {} summary:\n", self.order_id);
        for line in &self.lines {
            let _ = writeln!(
                out,
                "{} x {} = {}",
                line.quantity,
                line.description,
                catalogue.format_price(line.line_total_cents)
            );
        }
        let _ = write!(out, "Total: {}", catalogue.format_price(self.total_cents));
        out
    }
}

pub fn tally_order(order: &CustomerOrder, catalogue: &Catalogue) -> Result<Tally, TallyError> {
    if order.order_items.is_empty() {
        return Err(TallyError::EmptyOrder);
    }

    let mut lines = Vec::new();
    for indication in &order.order_items.menu_indications {
        let item = catalogue
            .item(indication.item_menu_number)
            .ok_or(TallyError::UnknownItem(indication.item_menu_number))?;
        lines.extend(price_indication(item, indication)?);
    }

    let total_cents = lines
        .iter()
        .try_fold(0u64, |acc, l| acc.checked_add(l.line_total_cents))
        .ok_or(TallyError::TotalOverflow)?;

    Ok(Tally {
        order_id: order.order_id.clone(),
        lines,
        total_cents,
    })
}

fn price_indication(item: &CatalogueItem, indication: &MenuIndication) -> Result<Vec<TallyLine>, TallyError> {
    let invalid = || TallyError::InvalidAmount {
        item: indication.item_menu_number,
        amount: indication.item_amount.clone(),
    };

    if !indication.has_options() {
        let quantity: u64 = indication.item_amount.trim().parse().map_err(|_| invalid())?;
        return Ok(vec![TallyLine {
            item_menu_number: item.menu_number,
            description: format!("{} ({})", item.name, item.unit),
            quantity,
            line_total_cents: quantity.checked_mul(item.unit_price_cents).ok_or_else(invalid)?,
        }]);
    }

    let selections = split_options(&indication.item_amount).ok_or_else(invalid)?;
    selections
        .into_iter()
        .map(|(position, amount)| -> Result<TallyLine, TallyError> {
            let option = item.option(position).ok_or(TallyError::UnknownOption {
                item: item.menu_number,
                option: position,
            })?;
            let quantity = u64::from(amount);
            Ok(TallyLine {
                item_menu_number: item.menu_number,
                description: format!("{} - {}", item.name, option.name),
                quantity,
                line_total_cents: quantity.checked_mul(option.price_cents).ok_or_else(|| {
                    TallyError::InvalidAmount {
                        item: item.menu_number,
                        amount: indication.item_amount.clone(),
                    }
                })?,
            })
        })
        .collect()
}

/// Human-readable view of a pending order. Never fails: lines that do not
/// resolve against the catalogue are shown raw.
pub fn describe_order(order: &CustomerOrder, catalogue: &Catalogue) -> String {
    if order.order_items.is_empty() {
        return "You have no pending order.".to_string();
    }

    let mut out = if order.is_persisted() {
        format!("Your current order ({}):\n", order.order_id)
    } else {
        "Your current order:\n".to_string()
    };

    for indication in &order.order_items.menu_indications {
        let line = match catalogue.item(indication.item_menu_number) {
            Some(item) if indication.has_options() => {
                let chosen = split_options(&indication.item_amount)
                    .map(|selections| {
                        selections
                            .iter()
                            .map(|(pos, amount)| match item.option(*pos) {
                                Some(option) => format!("{} x{}", option.name, amount),
                                None => format!("option {} x{}", pos, amount),
                            })
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_else(|| indication.item_amount.clone());
                format!("{}: {} - {}", item.menu_number, item.name, chosen)
            }
            Some(item) => format!("{}: {} - {} {}", item.menu_number, item.name, indication.item_amount, item.unit),
            None => format!("{}: {} (not on the price list)", indication.item_menu_number, indication.item_amount),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out.trim_end().to_string()
}
