//! Reconciliation Engine
//!
//! Turns the cards rendered for the current page into a plan for the target
//! page. Slots are paired with items by position over the longer of the two
//! sequences:
//!
//! | rendered slot | target item | operation |
//! |---------------|-------------|-----------|
//! | live handle   | present     | edit in place, keep the handle |
//! | live handle   | absent      | delete |
//! | empty         | present     | create |
//! | empty         | absent      | nothing |
//!
//! Creates land at the bottom of the chat, so whenever a plan creates cards
//! the navigation control is deleted first and posted again after them.
//! Without creates the control is edited in place.
//!
//! An empty slot in the middle of the page (left by a failed create, or by an
//! edit that found its card gone) is filled by a create like any other. The
//! new card lands below the cards of later slots, so until a later shrink
//! deletes them the chat shows that page out of item order. Live cards are
//! never deleted to restore the order.
//!
//! Planning never touches the surface; executing the plan is the view
//! controller's job.

use crate::error::ViewError;
use crate::page_state::{PageState, Slot};
use crate::render::CardRenderer;
use storefront_core::effects::{MediaResolver, RenderError};
use storefront_core::{CardHandle, CardPayload, ControlPayload, Direction, Item, ViewKind};

/// Pairing of one rendered slot with one target item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// A live card and an item: edit
    Both(CardHandle),
    /// A live card with no item left for it: delete
    CardOnly(CardHandle),
    /// An item with no card yet: create
    ItemOnly,
    /// Neither side present
    Neither,
}

/// Pair `rendered` with `target_len` items by position
pub fn align(rendered: &[Slot], target_len: usize) -> Vec<Alignment> {
    let width = rendered.len().max(target_len);
    (0..width)
        .map(|slot| {
            let card = rendered.get(slot).copied().flatten();
            match (card, slot < target_len) {
                (Some(handle), true) => Alignment::Both(handle),
                (Some(handle), false) => Alignment::CardOnly(handle),
                (None, true) => Alignment::ItemOnly,
                (None, false) => Alignment::Neither,
            }
        })
        .collect()
}

/// A single card operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOp {
    /// Replace the content of a live card
    Edit {
        /// Position on the target page
        slot: usize,
        /// Card kept at that position
        handle: CardHandle,
        /// New content
        payload: CardPayload,
    },
    /// Remove a card that has no item left
    Delete {
        /// Position on the current page
        slot: usize,
        /// Card to remove
        handle: CardHandle,
    },
    /// Post a card for an item that has none
    Create {
        /// Position on the target page
        slot: usize,
        /// Card content
        payload: CardPayload,
    },
}

impl CardOp {
    /// Position the operation applies to
    pub fn slot(&self) -> usize {
        match self {
            CardOp::Edit { slot, .. } | CardOp::Delete { slot, .. } | CardOp::Create { slot, .. } => {
                *slot
            }
        }
    }
}

/// What happens to the navigation control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlUpdate {
    /// Edit the existing control in place
    EditInPlace(CardHandle),
    /// Delete the existing control before the creates and post a new one after them
    Recreate(CardHandle),
    /// No control exists yet; post one after the creates
    Create,
}

/// Ordered operations moving the view to `to_page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Page the rendered cards were aligned with
    pub from_page: usize,
    /// Page the plan renders
    pub to_page: usize,
    /// Pages in the session
    pub page_count: usize,
    /// Items on the target page
    pub target_len: usize,
    /// Card operations: edits, then deletes, then creates
    pub ops: Vec<CardOp>,
    /// Navigation control handling
    pub control: ControlUpdate,
    /// Content of the navigation control for the target page
    pub control_payload: ControlPayload,
    /// Positions of the target page whose item could not be rendered
    pub render_failures: Vec<(usize, RenderError)>,
}

impl ReconcilePlan {
    /// Edit operations
    pub fn edits(&self) -> impl Iterator<Item = &CardOp> {
        self.ops.iter().filter(|op| matches!(op, CardOp::Edit { .. }))
    }

    /// Delete operations
    pub fn deletes(&self) -> impl Iterator<Item = &CardOp> {
        self.ops.iter().filter(|op| matches!(op, CardOp::Delete { .. }))
    }

    /// Create operations
    pub fn creates(&self) -> impl Iterator<Item = &CardOp> {
        self.ops.iter().filter(|op| matches!(op, CardOp::Create { .. }))
    }

    /// Whether any card is created, which forces the control to be recreated
    pub fn has_creates(&self) -> bool {
        self.creates().next().is_some()
    }

    /// Slots of the target page before any operation runs: edited positions
    /// keep their handle, everything else starts empty
    pub fn initial_slots(&self) -> Vec<Slot> {
        let mut slots = vec![None; self.target_len];
        for op in &self.ops {
            if let CardOp::Edit { slot, handle, .. } = op {
                if let Some(entry) = slots.get_mut(*slot) {
                    *entry = Some(*handle);
                }
            }
        }
        slots
    }

    /// Render failures as view errors
    pub fn render_errors(&self) -> impl Iterator<Item = ViewError> + '_ {
        self.render_failures
            .iter()
            .map(|(slot, source)| ViewError::Render {
                slot: *slot,
                source: source.clone(),
            })
    }
}

/// Plan the transition from the rendered cards of `state` to `target_page`
///
/// `target_page` may equal the current page, which re-renders it in place;
/// with nothing rendered yet the plan is all creates. A position whose item
/// fails to render becomes an empty slot: its live card, if any, is deleted.
pub fn plan_page<R: MediaResolver>(
    state: &PageState,
    target_page: usize,
    view: ViewKind,
    renderer: &CardRenderer<R>,
    control_text: &str,
) -> ReconcilePlan {
    let items: &[Item] = state.page(target_page).unwrap_or_default();
    let mut edits = Vec::new();
    let mut deletes = Vec::new();
    let mut creates = Vec::new();
    let mut render_failures = Vec::new();

    for (slot, alignment) in align(state.rendered_cards(), items.len())
        .into_iter()
        .enumerate()
    {
        match alignment {
            Alignment::Both(handle) => match renderer.render(&items[slot], state.variant()) {
                Ok(payload) => edits.push(CardOp::Edit {
                    slot,
                    handle,
                    payload,
                }),
                Err(e) => {
                    render_failures.push((slot, e));
                    deletes.push(CardOp::Delete { slot, handle });
                }
            },
            Alignment::CardOnly(handle) => deletes.push(CardOp::Delete { slot, handle }),
            Alignment::ItemOnly => match renderer.render(&items[slot], state.variant()) {
                Ok(payload) => creates.push(CardOp::Create { slot, payload }),
                Err(e) => render_failures.push((slot, e)),
            },
            Alignment::Neither => {}
        }
    }

    let control = match (state.summary_handle(), creates.is_empty()) {
        (Some(handle), true) => ControlUpdate::EditInPlace(handle),
        (Some(handle), false) => ControlUpdate::Recreate(handle),
        (None, _) => ControlUpdate::Create,
    };

    let mut ops = edits;
    ops.append(&mut deletes);
    ops.append(&mut creates);

    ReconcilePlan {
        from_page: state.current_page(),
        to_page: target_page,
        page_count: state.page_count(),
        target_len: items.len(),
        ops,
        control,
        control_payload: renderer.control(control_text, view, target_page, state.page_count()),
        render_failures,
    }
}

/// Plan one step in `direction`, or report that there is no such page
pub fn plan_navigation<R: MediaResolver>(
    state: &PageState,
    direction: Direction,
    view: ViewKind,
    renderer: &CardRenderer<R>,
    control_text: &str,
) -> Result<ReconcilePlan, ViewError> {
    let target = state
        .target_page(direction)
        .ok_or(ViewError::BoundaryReached { direction })?;
    Ok(plan_page(state, target, view, renderer, control_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{CardVariant, ChatId, MediaRef, ResolvedMedia};

    struct Plain;

    impl MediaResolver for Plain {
        fn resolve(&self, media: &MediaRef) -> Result<ResolvedMedia, RenderError> {
            if media.as_str() == "missing.png" {
                return Err(RenderError::MediaUnavailable {
                    media: media.clone(),
                    reason: "no such file".into(),
                });
            }
            Ok(ResolvedMedia(media.to_string()))
        }
    }

    fn items(ids: &[u64]) -> Vec<Item> {
        ids.iter()
            .map(|&id| Item::new(id, format!("item {id}"), ""))
            .collect()
    }

    fn rendered(state: &mut PageState, page: usize, handles: &[Slot], control: Option<i64>) {
        state.commit(page, handles.to_vec());
        state.set_summary_handle(control.map(CardHandle));
    }

    fn h(n: i64) -> Slot {
        Some(CardHandle(n))
    }

    #[test]
    fn test_align_covers_longer_side() {
        assert_eq!(
            align(&[h(1), h(2), h(3)], 1),
            vec![
                Alignment::Both(CardHandle(1)),
                Alignment::CardOnly(CardHandle(2)),
                Alignment::CardOnly(CardHandle(3)),
            ]
        );
        assert_eq!(
            align(&[h(1), None], 3),
            vec![
                Alignment::Both(CardHandle(1)),
                Alignment::ItemOnly,
                Alignment::ItemOnly,
            ]
        );
        assert_eq!(align(&[None], 0), vec![Alignment::Neither]);
    }

    #[test]
    fn test_tail_shrink_edits_then_deletes() {
        let pages = vec![items(&[1, 2, 3]), items(&[4])];
        let mut state = PageState::new(ChatId(1), pages, CardVariant::OfferAdd).unwrap();
        rendered(&mut state, 0, &[h(1), h(2), h(3)], Some(9));

        let plan = plan_navigation(
            &state,
            Direction::Forward,
            ViewKind::Catalog,
            &CardRenderer::new(Plain),
            "Pages",
        )
        .unwrap();

        let kinds: Vec<(char, usize)> = plan
            .ops
            .iter()
            .map(|op| match op {
                CardOp::Edit { slot, .. } => ('e', *slot),
                CardOp::Delete { slot, .. } => ('d', *slot),
                CardOp::Create { slot, .. } => ('c', *slot),
            })
            .collect();
        assert_eq!(kinds, vec![('e', 0), ('d', 1), ('d', 2)]);
        assert_eq!(plan.control, ControlUpdate::EditInPlace(CardHandle(9)));
        assert_eq!(plan.initial_slots(), vec![h(1)]);
    }

    #[test]
    fn test_tail_grow_recreates_control() {
        let pages = vec![items(&[1, 2, 3]), items(&[4])];
        let mut state = PageState::new(ChatId(1), pages, CardVariant::OfferAdd).unwrap();
        rendered(&mut state, 1, &[h(1)], Some(9));

        let plan = plan_navigation(
            &state,
            Direction::Backward,
            ViewKind::Catalog,
            &CardRenderer::new(Plain),
            "Pages",
        )
        .unwrap();

        assert_eq!(plan.edits().count(), 1);
        assert_eq!(plan.deletes().count(), 0);
        let created: Vec<usize> = plan.creates().map(CardOp::slot).collect();
        assert_eq!(created, vec![1, 2]);
        assert_eq!(plan.control, ControlUpdate::Recreate(CardHandle(9)));
        assert_eq!(plan.initial_slots(), vec![h(1), None, None]);
    }

    #[test]
    fn test_middle_hole_is_filled_without_touching_later_cards() {
        let pages = vec![items(&[1, 2, 3]), items(&[4, 5, 6])];
        let mut state = PageState::new(ChatId(1), pages, CardVariant::Omitted).unwrap();
        rendered(&mut state, 0, &[h(1), None, h(3)], Some(9));

        let plan = plan_navigation(
            &state,
            Direction::Forward,
            ViewKind::Catalog,
            &CardRenderer::new(Plain),
            "Pages",
        )
        .unwrap();

        let edited: Vec<usize> = plan.edits().map(CardOp::slot).collect();
        let created: Vec<usize> = plan.creates().map(CardOp::slot).collect();
        assert_eq!(edited, vec![0, 2]);
        assert_eq!(plan.deletes().count(), 0);
        assert_eq!(created, vec![1]);
        assert_eq!(plan.control, ControlUpdate::Recreate(CardHandle(9)));
        assert_eq!(plan.initial_slots(), vec![h(1), None, h(3)]);
    }

    #[test]
    fn test_boundary_is_reported() {
        let state =
            PageState::new(ChatId(1), vec![items(&[1])], CardVariant::Omitted).unwrap();
        let err = plan_navigation(
            &state,
            Direction::Backward,
            ViewKind::Basket,
            &CardRenderer::new(Plain),
            "Pages",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ViewError::BoundaryReached {
                direction: Direction::Backward
            }
        );
    }

    #[test]
    fn test_initial_render_is_all_creates() {
        let state =
            PageState::new(ChatId(1), vec![items(&[1, 2])], CardVariant::Omitted).unwrap();
        let plan = plan_page(&state, 0, ViewKind::Search, &CardRenderer::new(Plain), "Pages");
        assert_eq!(plan.creates().count(), 2);
        assert_eq!(plan.control, ControlUpdate::Create);
        assert_eq!(plan.control_payload.keyboard.rows[0][1].text, "1/1");
    }

    #[test]
    fn test_render_failure_frees_the_slot() {
        let mut second = items(&[4, 5]);
        second[0] = second[0].clone().with_media("missing.png");
        let pages = vec![items(&[1, 2]), second];
        let mut state = PageState::new(ChatId(1), pages, CardVariant::Omitted).unwrap();
        rendered(&mut state, 0, &[h(1), h(2)], Some(9));

        let plan = plan_navigation(
            &state,
            Direction::Forward,
            ViewKind::Catalog,
            &CardRenderer::new(Plain),
            "Pages",
        )
        .unwrap();

        assert_eq!(plan.render_failures.len(), 1);
        assert_eq!(plan.render_failures[0].0, 0);
        assert!(plan.ops.contains(&CardOp::Delete {
            slot: 0,
            handle: CardHandle(1)
        }));
        assert_eq!(plan.initial_slots(), vec![None, h(2)]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use storefront_testkit::strategies::{arb_direction, arb_page_sizes, arb_rendered};

        proptest! {
            #[test]
            fn plan_realigns_to_target_page(
                sizes in arb_page_sizes(5, 4),
                rendered_slots in arb_rendered(4),
                start in 0usize..5,
                direction in arb_direction(),
            ) {
                let current = start % sizes.len();
                let mut state = PageState::new(
                    ChatId(1),
                    storefront_testkit::pages(&sizes),
                    CardVariant::OfferAdd,
                ).unwrap();
                let mut slots = rendered_slots;
                slots.truncate(sizes[current]);
                state.commit(current, slots.clone());
                let slots = state.rendered_cards().to_vec();

                let renderer = CardRenderer::new(Plain);
                let Ok(plan) = plan_navigation(&state, direction, ViewKind::Catalog, &renderer, "Pages") else {
                    prop_assert!(state.target_page(direction).is_none());
                    return Ok(());
                };
                let target_len = sizes[plan.to_page];

                let live_kept = slots.iter().take(target_len).flatten().count();
                let live_dropped = slots.iter().skip(target_len).flatten().count();
                prop_assert_eq!(plan.edits().count(), live_kept);
                prop_assert_eq!(plan.deletes().count(), live_dropped);
                prop_assert_eq!(plan.creates().count(), target_len - live_kept);

                for op in plan.edits() {
                    if let CardOp::Edit { slot, handle, .. } = op {
                        prop_assert_eq!(slots[*slot], Some(*handle));
                    }
                }

                let mut after = plan.initial_slots();
                prop_assert_eq!(after.len(), target_len);
                for op in plan.creates() {
                    after[op.slot()] = Some(CardHandle(1000 + op.slot() as i64));
                }
                prop_assert!(after.iter().all(Option::is_some));

                let control_recreated = matches!(plan.control, ControlUpdate::Recreate(_));
                prop_assert!(!control_recreated || plan.has_creates());
            }
        }
    }
}
