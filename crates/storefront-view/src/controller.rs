//! View Controller
//!
//! Sole writer of page state. Every request follows the same shape:
//! load → plan → execute against the surface → save. Saving happens even when
//! individual operations failed, because the stored slots then describe what
//! is really on screen and the next navigation repairs the rest.
//!
//! There is no lock around a session. Two navigations racing on the same key
//! may both load the same state and the later save wins.

use crate::error::{SurfaceOp, ViewError};
use crate::page_state::{PageState, PageStateStore};
use crate::reconcile::{plan_navigation, plan_page, CardOp, ControlUpdate, ReconcilePlan};
use crate::render::CardRenderer;
use storefront_core::effects::{CacheEffects, MediaResolver, SurfaceEffects};
use storefront_core::{
    CardHandle, CardVariant, ChatId, Direction, Item, SessionKey, StorefrontConfig,
};
use tracing::{debug, info, warn};

/// Outcome of executing one plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationReport {
    /// Zero-based page now shown
    pub page: usize,
    /// Pages in the session
    pub page_count: usize,
    /// Cards edited in place
    pub edited: usize,
    /// Cards deleted
    pub deleted: usize,
    /// Cards created
    pub created: usize,
    /// Navigation control after the update
    pub control: Option<CardHandle>,
    /// Per-card failures; the rest of the plan still ran
    pub failures: Vec<ViewError>,
}

impl NavigationReport {
    /// Whether every operation succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of starting a browsing session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartReport {
    /// Cards and control of the first page
    pub rendered: NavigationReport,
    /// Messages of a previous session on the same key that were removed
    pub superseded: usize,
}

/// Drives browsing sessions against the cache and the messaging surface
#[derive(Debug, Clone)]
pub struct ViewController<R> {
    renderer: CardRenderer<R>,
    control_text: String,
    clear_superseded_views: bool,
}

impl<R: MediaResolver> ViewController<R> {
    /// Create a controller from the storefront configuration
    pub fn new(config: &StorefrontConfig, resolver: R) -> Self {
        Self {
            renderer: CardRenderer::new(resolver),
            control_text: config.control_text.clone(),
            clear_superseded_views: config.clear_superseded_views,
        }
    }

    /// The card renderer in use
    pub fn renderer(&self) -> &CardRenderer<R> {
        &self.renderer
    }

    /// Start a browsing session on `key` showing the first of `pages`
    ///
    /// Any state already stored under `key` is replaced. With
    /// `clear_superseded_views` set, its cards and control are deleted first.
    pub async fn start_browsing<E>(
        &self,
        effects: &E,
        key: &SessionKey,
        chat: ChatId,
        pages: Vec<Vec<Item>>,
        variant: CardVariant,
    ) -> Result<StartReport, ViewError>
    where
        E: CacheEffects + SurfaceEffects,
    {
        let mut state = PageState::new(chat, pages, variant)?;

        let superseded = match PageStateStore::load(effects, key).await? {
            Some(previous) if self.clear_superseded_views => {
                self.clear_messages(effects, key, &previous).await
            }
            _ => 0,
        };

        let plan = plan_page(&state, 0, key.view, &self.renderer, &self.control_text);
        let rendered = self.execute(effects, &mut state, &plan).await;
        PageStateStore::save(effects, key, &state).await?;

        info!(
            session = %key,
            pages = rendered.page_count,
            cards = rendered.created,
            superseded,
            "browsing session started"
        );
        Ok(StartReport {
            rendered,
            superseded,
        })
    }

    /// Move the session on `key` one page in `direction`
    ///
    /// A missing session or a step past either end returns the matching
    /// no-op error without touching the surface or the stored state.
    pub async fn navigate<E>(
        &self,
        effects: &E,
        key: &SessionKey,
        direction: Direction,
    ) -> Result<NavigationReport, ViewError>
    where
        E: CacheEffects + SurfaceEffects,
    {
        let Some(mut state) = PageStateStore::load(effects, key).await? else {
            debug!(session = %key, "navigation without an active session");
            return Err(ViewError::NoActiveSession {
                key: key.cache_key(),
            });
        };

        let plan = match plan_navigation(
            &state,
            direction,
            key.view,
            &self.renderer,
            &self.control_text,
        ) {
            Ok(plan) => plan,
            Err(e) => {
                debug!(session = %key, %direction, page = state.current_page(), "{e}");
                return Err(e);
            }
        };

        let report = self.execute(effects, &mut state, &plan).await;
        PageStateStore::save(effects, key, &state).await?;

        info!(
            session = %key,
            from = plan.from_page + 1,
            to = report.page + 1,
            of = report.page_count,
            edited = report.edited,
            deleted = report.deleted,
            created = report.created,
            failures = report.failures.len(),
            "page changed"
        );
        Ok(report)
    }

    /// Delete every message of the session on `key` and forget its state
    ///
    /// Returns whether a session existed.
    pub async fn close<E>(&self, effects: &E, key: &SessionKey) -> Result<bool, ViewError>
    where
        E: CacheEffects + SurfaceEffects,
    {
        let Some(state) = PageStateStore::load(effects, key).await? else {
            return Ok(false);
        };
        let removed = self.clear_messages(effects, key, &state).await;
        PageStateStore::discard(effects, key).await?;
        debug!(session = %key, removed, "browsing session closed");
        Ok(true)
    }

    /// Best-effort removal of the cards and control of `state`
    async fn clear_messages<E>(&self, effects: &E, key: &SessionKey, state: &PageState) -> usize
    where
        E: SurfaceEffects,
    {
        let handles = state.live_handles().chain(state.summary_handle());
        let mut removed = 0;
        for handle in handles {
            match effects.delete_card(state.chat(), handle).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(session = %key, %handle, error = %e, "could not remove old message"),
            }
        }
        removed
    }

    /// Run `plan` against the surface and commit the resulting slots into `state`
    async fn execute<E>(
        &self,
        effects: &E,
        state: &mut PageState,
        plan: &ReconcilePlan,
    ) -> NavigationReport
    where
        E: SurfaceEffects,
    {
        let chat = state.chat();
        let mut slots = plan.initial_slots();
        let mut report = NavigationReport {
            page: plan.to_page,
            page_count: plan.page_count,
            failures: plan.render_errors().collect(),
            ..NavigationReport::default()
        };
        for failure in &report.failures {
            warn!(%chat, error = %failure, "card skipped");
        }

        for op in plan.edits() {
            let CardOp::Edit {
                slot,
                handle,
                payload,
            } = op
            else {
                continue;
            };
            match effects.edit_card(chat, *handle, payload).await {
                Ok(()) => report.edited += 1,
                Err(e) => {
                    warn!(%chat, %handle, error = %e, "card edit failed");
                    if e.is_not_found() {
                        slots[*slot] = None;
                    }
                    report
                        .failures
                        .push(ViewError::surface(SurfaceOp::EditCard, Some(*handle), e));
                }
            }
        }

        for op in plan.deletes() {
            let CardOp::Delete { handle, .. } = op else {
                continue;
            };
            match effects.delete_card(chat, *handle).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    warn!(%chat, %handle, error = %e, "card delete failed");
                    report
                        .failures
                        .push(ViewError::surface(SurfaceOp::DeleteCard, Some(*handle), e));
                }
            }
        }

        // A control that refuses to go is reused below rather than orphaned.
        let mut stuck_control = None;
        if let ControlUpdate::Recreate(old) = plan.control {
            if let Err(e) = effects.delete_card(chat, old).await {
                warn!(%chat, handle = %old, error = %e, "control delete failed");
                if !e.is_not_found() {
                    stuck_control = Some(old);
                }
                report
                    .failures
                    .push(ViewError::surface(SurfaceOp::DeleteControl, Some(old), e));
            }
        }

        for op in plan.creates() {
            let CardOp::Create { slot, payload } = op else {
                continue;
            };
            match effects.create_card(chat, payload).await {
                Ok(handle) => {
                    slots[*slot] = Some(handle);
                    report.created += 1;
                }
                Err(e) => {
                    warn!(%chat, slot, error = %e, "card create failed");
                    report
                        .failures
                        .push(ViewError::surface(SurfaceOp::CreateCard, None, e));
                }
            }
        }

        report.control = match (plan.control, stuck_control) {
            (ControlUpdate::EditInPlace(handle), _) | (_, Some(handle)) => {
                self.edit_control(effects, chat, handle, plan, &mut report)
                    .await
            }
            (ControlUpdate::Recreate(_) | ControlUpdate::Create, None) => {
                self.create_control(effects, chat, plan, &mut report).await
            }
        };

        state.commit(plan.to_page, slots);
        state.set_summary_handle(report.control);
        report
    }

    /// Edit the control in place, posting a new one if it is gone
    async fn edit_control<E>(
        &self,
        effects: &E,
        chat: ChatId,
        handle: CardHandle,
        plan: &ReconcilePlan,
        report: &mut NavigationReport,
    ) -> Option<CardHandle>
    where
        E: SurfaceEffects,
    {
        match effects
            .edit_control(chat, handle, &plan.control_payload)
            .await
        {
            Ok(handle) => Some(handle),
            Err(e) if e.is_not_found() => {
                debug!(%chat, %handle, "control gone, posting a new one");
                self.create_control(effects, chat, plan, report).await
            }
            Err(e) => {
                warn!(%chat, %handle, error = %e, "control edit failed");
                report
                    .failures
                    .push(ViewError::surface(SurfaceOp::EditControl, Some(handle), e));
                Some(handle)
            }
        }
    }

    async fn create_control<E>(
        &self,
        effects: &E,
        chat: ChatId,
        plan: &ReconcilePlan,
        report: &mut NavigationReport,
    ) -> Option<CardHandle>
    where
        E: SurfaceEffects,
    {
        match effects.create_control(chat, &plan.control_payload).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(%chat, error = %e, "control create failed");
                report
                    .failures
                    .push(ViewError::surface(SurfaceOp::CreateControl, None, e));
                None
            }
        }
    }
}
