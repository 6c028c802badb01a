use serde::{Deserialize, Serialize};

// ============================================================================
// Order Value Objects
// ============================================================================

/// One parsed order line: a catalogue position plus the requested amount.
///
/// `item_amount` is kept as text. It is either a plain quantity (`"12"`) or a
/// comma-joined list of `option x amount` tokens (`"1x3,3x2"`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MenuIndication {
    pub item_menu_number: u32,
    pub item_amount: String,
}

impl MenuIndication {
    pub fn new(item_menu_number: u32, item_amount: impl Into<String>) -> Self {
        Self {
            item_menu_number,
            item_amount: item_amount.into(),
        }
    }

    /// True when the amount uses the option sub-grammar.
    pub fn has_options(&self) -> bool {
        self.item_amount.contains('x')
    }

    /// An amount of zero asks for the item to be dropped from the order.
    pub fn is_removal(&self) -> bool {
        self.item_amount.trim().parse::<u64>() == Ok(0)
    }

    pub fn render(&self) -> String {
        format!("{}:{}", self.item_menu_number, self.item_amount)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderItems {
    pub menu_indications: Vec<MenuIndication>,
}

impl OrderItems {
    pub fn new(menu_indications: Vec<MenuIndication>) -> Self {
        Self { menu_indications }
    }

    pub fn is_empty(&self) -> bool {
        self.menu_indications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.menu_indications.len()
    }

    pub fn get(&self, item_menu_number: u32) -> Option<&MenuIndication> {
        self.menu_indications
            .iter()
            .find(|m| m.item_menu_number == item_menu_number)
    }

    /// Fold a batch of updates into the current items.
    ///
    /// Existing item numbers get their amount replaced in place, unknown ones
    /// are appended, and zero amounts remove the item.
    pub fn merge(&mut self, updates: &[MenuIndication]) {
        for update in updates {
            let existing = self
                .menu_indications
                .iter()
                .position(|m| m.item_menu_number == update.item_menu_number);

            match (existing, update.is_removal()) {
                (Some(idx), true) => {
                    self.menu_indications.remove(idx);
                }
                (Some(idx), false) => {
                    self.menu_indications[idx].item_amount = update.item_amount.clone();
                }
                (None, true) => {}
                (None, false) => self.menu_indications.push(update.clone()),
            }
        }
    }
}

/// A user's pending order against one catalogue.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerOrder {
    /// Empty until a store has assigned an identifier.
    pub order_id: String,
    pub cell_number: String,
    pub catalogue_id: i64,
    pub order_items: OrderItems,
}

impl CustomerOrder {
    pub fn new(cell_number: impl Into<String>, catalogue_id: i64, order_items: OrderItems) -> Self {
        Self {
            order_id: String::new(),
            cell_number: cell_number.into(),
            catalogue_id,
            order_items,
        }
    }

    pub fn is_persisted(&self) -> bool {
        !self.order_id.is_empty()
    }

    /// Name shown on the payment page for this order.
    pub fn build_item_name(&self, prefix: &str) -> String {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            format!("order {}", self.order_id)
        } else {
            format!("{} order {}", prefix, self.order_id)
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
