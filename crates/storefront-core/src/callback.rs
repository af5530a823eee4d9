//! Callback-data codec.
//!
//! Inline buttons carry a short string back to the bot. Navigation keeps the
//! `{view}_left` / `{view}_right` strings already present on rendered
//! controls, so controls sent before an upgrade keep working.

use crate::{
    identifiers::{Direction, ItemId, ViewKind},
    StorefrontError,
};
use std::fmt;

const BASKET_ADD_PREFIX: &str = "basket:add:";
const BASKET_REMOVE_PREFIX: &str = "basket:remove:";
const PAGE_INDICATOR: &str = "page:noop";

/// Action requested by an inline button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackAction {
    /// Move a browsing view one page
    Navigate {
        /// View being browsed
        view: ViewKind,
        /// Direction to move in
        direction: Direction,
    },
    /// Put an item into the basket
    AddToBasket {
        /// Item to add
        item: ItemId,
    },
    /// Take an item out of the basket
    RemoveFromBasket {
        /// Item to remove
        item: ItemId,
    },
    /// The "N/M" indicator between the arrows; pressing it does nothing
    PageIndicator,
}

impl CallbackAction {
    /// Encode into button callback data
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Navigate { view, direction } => {
                let side = match direction {
                    Direction::Forward => "right",
                    Direction::Backward => "left",
                };
                format!("{}_{side}", view.slug())
            }
            CallbackAction::AddToBasket { item } => format!("{BASKET_ADD_PREFIX}{item}"),
            CallbackAction::RemoveFromBasket { item } => format!("{BASKET_REMOVE_PREFIX}{item}"),
            CallbackAction::PageIndicator => PAGE_INDICATOR.to_string(),
        }
    }

    /// Decode button callback data
    pub fn parse(data: &str) -> Result<Self, StorefrontError> {
        if data == PAGE_INDICATOR {
            return Ok(CallbackAction::PageIndicator);
        }
        if let Some(id) = data.strip_prefix(BASKET_ADD_PREFIX) {
            return Ok(CallbackAction::AddToBasket {
                item: parse_item_id(id)?,
            });
        }
        if let Some(id) = data.strip_prefix(BASKET_REMOVE_PREFIX) {
            return Ok(CallbackAction::RemoveFromBasket {
                item: parse_item_id(id)?,
            });
        }
        if let Some((slug, side)) = data.rsplit_once('_') {
            let direction = match side {
                "left" => Some(Direction::Backward),
                "right" => Some(Direction::Forward),
                _ => None,
            };
            if let (Some(view), Some(direction)) = (ViewKind::from_slug(slug), direction) {
                return Ok(CallbackAction::Navigate { view, direction });
            }
        }
        Err(StorefrontError::invalid(format!(
            "unrecognised callback data: {data:?}"
        )))
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Only the canonical decimal form is accepted, so parsing and encoding agree.
fn parse_item_id(raw: &str) -> Result<ItemId, StorefrontError> {
    let id = raw
        .parse::<u64>()
        .map_err(|e| StorefrontError::invalid(format!("bad item id {raw:?} in callback: {e}")))?;
    if id.to_string() != raw {
        return Err(StorefrontError::invalid(format!(
            "non-canonical item id {raw:?} in callback"
        )));
    }
    Ok(ItemId(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_uses_legacy_strings() {
        let action = CallbackAction::Navigate {
            view: ViewKind::Basket,
            direction: Direction::Backward,
        };
        assert_eq!(action.encode(), "basket_left");
        assert_eq!(CallbackAction::parse("product_right").unwrap(), CallbackAction::Navigate {
            view: ViewKind::Catalog,
            direction: Direction::Forward,
        });
    }

    #[test]
    fn test_basket_actions() {
        assert_eq!(
            CallbackAction::parse("basket:add:42").unwrap(),
            CallbackAction::AddToBasket { item: ItemId(42) }
        );
        assert_eq!(
            CallbackAction::RemoveFromBasket { item: ItemId(7) }.encode(),
            "basket:remove:7"
        );
    }

    #[test]
    fn test_rejects_garbage() {
        for data in [
            "",
            "product_up",
            "shelf_left",
            "basket:add:x",
            "basket:add:",
            "basket:add:01",
            "basket:remove:+7",
        ] {
            assert!(CallbackAction::parse(data).is_err(), "{data:?} should be rejected");
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_action() -> impl Strategy<Value = CallbackAction> {
            let view = prop_oneof![
                Just(ViewKind::Catalog),
                Just(ViewKind::Basket),
                Just(ViewKind::Search),
            ];
            let direction = prop_oneof![Just(Direction::Forward), Just(Direction::Backward)];
            prop_oneof![
                (view, direction)
                    .prop_map(|(view, direction)| CallbackAction::Navigate { view, direction }),
                any::<u64>().prop_map(|id| CallbackAction::AddToBasket { item: ItemId(id) }),
                any::<u64>().prop_map(|id| CallbackAction::RemoveFromBasket { item: ItemId(id) }),
                Just(CallbackAction::PageIndicator),
            ]
        }

        proptest! {
            #[test]
            fn encoded_actions_parse_back(action in arb_action()) {
                prop_assert_eq!(CallbackAction::parse(&action.encode()).unwrap(), action);
            }

            #[test]
            fn accepted_strings_reencode_unchanged(
                data in prop_oneof![
                    "basket:(add|remove):[+0-9]{0,4}",
                    "(product|basket|search|shelf)_(left|right|up)",
                    "page:noop",
                    ".{0,16}",
                ]
            ) {
                if let Ok(action) = CallbackAction::parse(&data) {
                    prop_assert_eq!(action.encode(), data);
                }
            }
        }
    }
}
