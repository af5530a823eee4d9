//! Card Renderer
//!
//! Pure mapping from an item and a card variant to the payload sent to the
//! surface. The only outside dependency is the media resolver, which must be
//! deterministic, so rendering the same item twice yields identical payloads
//! and the reconciliation engine can re-render on every navigation step.

use storefront_core::callback::CallbackAction;
use storefront_core::effects::{MediaResolver, RenderError};
use storefront_core::{
    Button, CardPayload, CardVariant, ControlPayload, Direction, Item, Keyboard, ViewKind,
};

/// Label of the add-to-basket action button
pub const ADD_TO_BASKET_LABEL: &str = "🛒 Add to basket";
/// Label of the remove-from-basket action button
pub const REMOVE_FROM_BASKET_LABEL: &str = "❌ Remove from basket";

/// Renders items into product cards and page numbers into navigation controls
#[derive(Debug, Clone)]
pub struct CardRenderer<R> {
    resolver: R,
}

impl<R: MediaResolver> CardRenderer<R> {
    /// Create a renderer resolving pictures through `resolver`
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Render one product card
    pub fn render(&self, item: &Item, variant: CardVariant) -> Result<CardPayload, RenderError> {
        let media = self.resolver.resolve(&item.media)?;
        Ok(CardPayload {
            media,
            caption: caption(item),
            keyboard: action_keyboard(item, variant),
        })
    }

    /// Render the navigation control for `page_index` (zero-based) of `page_count`
    pub fn control(
        &self,
        text: &str,
        view: ViewKind,
        page_index: usize,
        page_count: usize,
    ) -> ControlPayload {
        control_payload(text, view, page_index, page_count)
    }
}

/// HTML caption: bold name, description on the next line
pub fn caption(item: &Item) -> String {
    format!(
        "<b>{}</b>\n{}",
        escape_html(&item.name),
        escape_html(&item.description)
    )
}

/// Action buttons for `variant`; [`CardVariant::Omitted`] has none
pub fn action_keyboard(item: &Item, variant: CardVariant) -> Keyboard {
    let button = match variant {
        CardVariant::Omitted => return Keyboard::empty(),
        CardVariant::OfferAdd => Button::new(
            ADD_TO_BASKET_LABEL,
            CallbackAction::AddToBasket {
                item: item.item_id,
            }
            .encode(),
        ),
        CardVariant::OfferRemove => Button::new(
            REMOVE_FROM_BASKET_LABEL,
            CallbackAction::RemoveFromBasket {
                item: item.item_id,
            }
            .encode(),
        ),
    };
    Keyboard::single_row(vec![button])
}

/// Control message with `<`, `N/M` and `>` buttons
pub fn control_payload(
    text: &str,
    view: ViewKind,
    page_index: usize,
    page_count: usize,
) -> ControlPayload {
    let nav = |direction| CallbackAction::Navigate { view, direction }.encode();
    ControlPayload {
        text: text.to_string(),
        keyboard: Keyboard::single_row(vec![
            Button::new("<", nav(Direction::Backward)),
            Button::new(
                format!("{}/{}", page_index + 1, page_count),
                CallbackAction::PageIndicator.encode(),
            ),
            Button::new(">", nav(Direction::Forward)),
        ]),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{MediaRef, ResolvedMedia};

    struct Prefix;

    impl MediaResolver for Prefix {
        fn resolve(&self, media: &MediaRef) -> Result<ResolvedMedia, RenderError> {
            if media.as_str().is_empty() {
                return Err(RenderError::MediaUnavailable {
                    media: media.clone(),
                    reason: "empty".into(),
                });
            }
            Ok(ResolvedMedia(format!("/srv/{media}")))
        }
    }

    #[test]
    fn test_caption_escapes_markup() {
        let item = Item::new(1, "Fish & <Chips>", "a > b");
        assert_eq!(
            caption(&item),
            "<b>Fish &amp; &lt;Chips&gt;</b>\na &gt; b"
        );
    }

    #[test]
    fn test_variants_select_buttons() {
        let renderer = CardRenderer::new(Prefix);
        let item = Item::new(7, "Tea", "Green");

        let plain = renderer.render(&item, CardVariant::Omitted).unwrap();
        assert!(plain.keyboard.is_empty());

        let add = renderer.render(&item, CardVariant::OfferAdd).unwrap();
        let button = add.keyboard.buttons().next().unwrap();
        assert_eq!(button.text, ADD_TO_BASKET_LABEL);
        assert_eq!(button.callback_data, "basket:add:7");

        let remove = renderer.render(&item, CardVariant::OfferRemove).unwrap();
        let button = remove.keyboard.buttons().next().unwrap();
        assert_eq!(button.callback_data, "basket:remove:7");
    }

    #[test]
    fn test_media_failure_is_render_error() {
        let renderer = CardRenderer::new(Prefix);
        let item = Item::new(1, "Tea", "").with_media("");
        assert!(matches!(
            renderer.render(&item, CardVariant::Omitted),
            Err(RenderError::MediaUnavailable { .. })
        ));
    }

    #[test]
    fn test_control_layout() {
        let control = control_payload("Pages", ViewKind::Catalog, 1, 3);
        let labels: Vec<&str> = control.keyboard.buttons().map(|b| b.text.as_str()).collect();
        let data: Vec<&str> = control
            .keyboard
            .buttons()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(control.text, "Pages");
        assert_eq!(labels, vec!["<", "2/3", ">"]);
        assert_eq!(data, vec!["product_left", "page:noop", "product_right"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_variant() -> impl Strategy<Value = CardVariant> {
            prop_oneof![
                Just(CardVariant::Omitted),
                Just(CardVariant::OfferAdd),
                Just(CardVariant::OfferRemove),
            ]
        }

        proptest! {
            #[test]
            fn render_is_deterministic(
                id in any::<u64>(),
                name in ".{0,40}",
                description in ".{0,80}",
                variant in arb_variant(),
            ) {
                let renderer = CardRenderer::new(Prefix);
                let item = Item::new(id, name, description);
                let first = renderer.render(&item, variant).unwrap();
                let second = renderer.render(&item.clone(), variant).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn caption_never_carries_raw_markup(name in ".{0,40}") {
                let item = Item::new(1, name, "");
                let text = caption(&item);
                let inner = &text["<b>".len()..text.len() - "</b>\n".len()];
                prop_assert!(!inner.contains('<') && !inner.contains('>'));
            }
        }
    }
}
