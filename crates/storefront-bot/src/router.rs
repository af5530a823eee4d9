//! Update routing
//!
//! The bot is stateless between updates: everything that must survive one
//! lives in the cache (page states, scratch ledger, search prompt).

use crate::prompt::SearchPrompt;
use crate::replies;
use crate::scratch::ScratchLedger;
use crate::update::{Command, Update};
use storefront_core::effects::{
    BasketChange, CacheEffects, CatalogEffects, CatalogScope, MediaResolver, SurfaceEffects,
    UserProfile,
};
use storefront_core::{
    Button, CallbackAction, CallbackId, CardHandle, CardVariant, ChatId, Direction, Keyboard, Result,
    SessionKey, StorefrontConfig, StorefrontError, UserId, ViewKind,
};
use storefront_view::{ViewController, ViewError};
use tracing::{debug, info, warn};

/// What handling an update did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `/start` answered; `registered` is true for a first contact
    Greeted {
        /// Whether the user was new
        registered: bool,
    },
    /// A browsing session was started
    ViewStarted {
        /// Which view
        view: ViewKind,
        /// Pages in the session
        pages: usize,
    },
    /// The listing for a view was empty and a notice was sent instead
    NothingToShow {
        /// Which view
        view: ViewKind,
    },
    /// A browsing session moved
    Navigated {
        /// Which view
        view: ViewKind,
        /// Zero-based page now shown
        page: usize,
    },
    /// `/find` is waiting for a query
    AwaitingQuery,
    /// A basket button was handled
    Basket(BasketChange),
    /// Nothing to do (boundary, stale session, page indicator, bad data)
    Ignored,
    /// The text was not understood
    Unknown,
}

/// Routes updates to the catalog, the basket and the view controller
#[derive(Debug, Clone)]
pub struct StorefrontBot<R> {
    config: StorefrontConfig,
    views: ViewController<R>,
}

impl<R: MediaResolver> StorefrontBot<R> {
    /// Create a bot from configuration and a media resolver
    pub fn new(config: StorefrontConfig, resolver: R) -> Self {
        let views = ViewController::new(&config, resolver);
        Self { config, views }
    }

    /// The view controller used for browsing sessions
    pub fn views(&self) -> &ViewController<R> {
        &self.views
    }

    /// Handle one update
    pub async fn handle<E>(&self, effects: &E, update: Update) -> Result<Outcome>
    where
        E: CacheEffects + SurfaceEffects + CatalogEffects,
    {
        match update {
            Update::Message {
                from,
                chat,
                message,
                text,
            } => match Command::parse(&text) {
                Some(command) => self.handle_command(effects, from, chat, command).await,
                None => self.handle_text(effects, &from.user, chat, message, &text).await,
            },
            Update::Callback {
                from,
                chat,
                callback,
                data,
            } => self.handle_callback(effects, from, chat, &callback, &data).await,
        }
    }

    async fn handle_command<E>(
        &self,
        effects: &E,
        from: UserProfile,
        chat: ChatId,
        command: Command,
    ) -> Result<Outcome>
    where
        E: CacheEffects + SurfaceEffects + CatalogEffects,
    {
        let user = from.user.clone();
        ScratchLedger::flush(effects, &user).await?;
        if SearchPrompt::cancel(effects, &user).await? {
            debug!(%user, "search prompt cancelled by command");
        }

        match command {
            Command::Start => {
                let (profile, registered) = effects.ensure_user(from).await?;
                let greeting = self.config.greeting_for(profile.display_name());
                effects
                    .send_text(chat, &greeting, Some(&menu_keyboard()))
                    .await?;
                Ok(Outcome::Greeted { registered })
            }
            Command::ShowProducts => {
                self.open_view(effects, &user, chat, ViewKind::Catalog, CatalogScope::AllProducts)
                    .await
            }
            Command::Basket => {
                let scope = CatalogScope::Basket(user.clone());
                self.open_view(effects, &user, chat, ViewKind::Basket, scope)
                    .await
            }
            Command::Find => {
                let handle = effects
                    .send_text(chat, replies::SEARCH_PROMPT, None)
                    .await?;
                ScratchLedger::track(effects, &user, chat, handle).await?;
                SearchPrompt::arm(effects, &user, chat).await?;
                Ok(Outcome::AwaitingQuery)
            }
            Command::Unknown(name) => {
                debug!(%user, command = %name, "unknown command");
                self.scratch_reply(effects, &user, chat, replies::UNKNOWN_COMMAND)
                    .await?;
                Ok(Outcome::Unknown)
            }
        }
    }

    async fn handle_text<E>(
        &self,
        effects: &E,
        user: &UserId,
        chat: ChatId,
        message: Option<CardHandle>,
        text: &str,
    ) -> Result<Outcome>
    where
        E: CacheEffects + SurfaceEffects + CatalogEffects,
    {
        if !SearchPrompt::take(effects, user, chat).await? {
            self.scratch_reply(effects, user, chat, replies::UNKNOWN_COMMAND)
                .await?;
            return Ok(Outcome::Unknown);
        }

        if let Some(handle) = message {
            ScratchLedger::track(effects, user, chat, handle).await?;
        }
        let query = text.trim().to_string();
        info!(%user, %query, "search");
        self.open_view(effects, user, chat, ViewKind::Search, CatalogScope::Search(query))
            .await
    }

    async fn handle_callback<E>(
        &self,
        effects: &E,
        from: UserId,
        chat: ChatId,
        callback: &CallbackId,
        data: &str,
    ) -> Result<Outcome>
    where
        E: CacheEffects + SurfaceEffects + CatalogEffects,
    {
        let user = &from;
        let action = match CallbackAction::parse(data) {
            Ok(action) => action,
            Err(e) => {
                answer(effects, callback, "", false).await;
                // Menu buttons carry the command they stand for.
                if let Some(command) = Command::parse(data) {
                    debug!(%user, data, "menu button");
                    let profile = UserProfile {
                        user: from.clone(),
                        first_name: None,
                        last_name: None,
                    };
                    return self.handle_command(effects, profile, chat, command).await;
                }
                warn!(%user, data, error = %e, "unrecognised button");
                return Ok(Outcome::Ignored);
            }
        };

        match action {
            CallbackAction::Navigate { view, direction } => {
                let result = self.navigate(effects, user, view, direction).await;
                answer(effects, callback, "", false).await;
                result
            }
            CallbackAction::AddToBasket { item } => {
                let change = match effects.add_to_basket(user, item).await {
                    Ok(change) => change,
                    Err(e) => {
                        answer(effects, callback, "", false).await;
                        return Err(e.into());
                    }
                };
                answer(effects, callback, basket_notice(change), true).await;
                info!(%user, %item, ?change, "basket add");
                Ok(Outcome::Basket(change))
            }
            CallbackAction::RemoveFromBasket { item } => {
                let change = match effects.remove_from_basket(user, item).await {
                    Ok(change) => change,
                    Err(e) => {
                        answer(effects, callback, "", false).await;
                        return Err(e.into());
                    }
                };
                answer(effects, callback, basket_notice(change), true).await;
                info!(%user, %item, ?change, "basket remove");
                Ok(Outcome::Basket(change))
            }
            CallbackAction::PageIndicator => {
                answer(effects, callback, "", false).await;
                Ok(Outcome::Ignored)
            }
        }
    }

    async fn navigate<E>(
        &self,
        effects: &E,
        user: &UserId,
        view: ViewKind,
        direction: Direction,
    ) -> Result<Outcome>
    where
        E: CacheEffects + SurfaceEffects,
    {
        let key = SessionKey::new(user.clone(), view);
        match self.views.navigate(effects, &key, direction).await {
            Ok(report) => Ok(Outcome::Navigated {
                view,
                page: report.page,
            }),
            Err(e) if e.is_noop() => Ok(Outcome::Ignored),
            Err(e) => Err(e.into()),
        }
    }

    async fn open_view<E>(
        &self,
        effects: &E,
        user: &UserId,
        chat: ChatId,
        view: ViewKind,
        scope: CatalogScope,
    ) -> Result<Outcome>
    where
        E: CacheEffects + SurfaceEffects + CatalogEffects,
    {
        let pages = effects
            .list_items_paginated(&scope, self.config.page_size)
            .await?;
        let variant = match view {
            ViewKind::Basket => CardVariant::OfferRemove,
            ViewKind::Catalog | ViewKind::Search => CardVariant::OfferAdd,
        };
        let key = SessionKey::new(user.clone(), view);

        match self
            .views
            .start_browsing(effects, &key, chat, pages, variant)
            .await
        {
            Ok(report) => Ok(Outcome::ViewStarted {
                view,
                pages: report.rendered.page_count,
            }),
            Err(ViewError::NothingToShow) => {
                let notice = match view {
                    ViewKind::Catalog => replies::NO_PRODUCTS,
                    ViewKind::Basket => replies::EMPTY_BASKET,
                    ViewKind::Search => replies::NOTHING_FOUND,
                };
                self.scratch_reply(effects, user, chat, notice).await?;
                Ok(Outcome::NothingToShow { view })
            }
            Err(e) => Err(StorefrontError::from(e)),
        }
    }

    async fn scratch_reply<E>(
        &self,
        effects: &E,
        user: &UserId,
        chat: ChatId,
        text: &str,
    ) -> Result<()>
    where
        E: CacheEffects + SurfaceEffects,
    {
        let handle = effects.send_text(chat, text, None).await?;
        ScratchLedger::track(effects, user, chat, handle).await
    }
}

/// Acknowledge a button press; failures are only logged
async fn answer<E>(effects: &E, callback: &CallbackId, text: &str, alert: bool)
where
    E: SurfaceEffects,
{
    if let Err(e) = effects.answer_callback(callback, text, alert).await {
        warn!(%callback, error = %e, "callback answer failed");
    }
}

fn basket_notice(change: BasketChange) -> &'static str {
    match change {
        BasketChange::Added => replies::ADDED_TO_BASKET,
        BasketChange::AlreadyPresent => replies::ALREADY_IN_BASKET,
        BasketChange::Removed => replies::REMOVED_FROM_BASKET,
        BasketChange::NotPresent => replies::NOT_IN_BASKET,
        BasketChange::UnknownItem => replies::UNKNOWN_PRODUCT,
    }
}

fn menu_keyboard() -> Keyboard {
    Keyboard::single_row(vec![
        Button::new(replies::MENU_PRODUCTS, "/show_products"),
        Button::new(replies::MENU_BASKET, "/basket"),
        Button::new(replies::MENU_FIND, "/find"),
    ])
}
