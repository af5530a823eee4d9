#![allow(missing_docs, clippy::unwrap_used)]
//! End-to-end routing against the mock effects

use storefront_bot::replies::*;
use storefront_bot::{Outcome, ScratchLedger, StorefrontBot, Update};
use storefront_core::effects::BasketChange;
use storefront_core::{CallbackId, CardHandle, ViewKind};
use storefront_testkit::*;

fn bot() -> StorefrontBot<StaticMediaResolver> {
    StorefrontBot::new(test_config(3), StaticMediaResolver::new())
}

fn text(body: &str) -> Update {
    Update::Message {
        from: profile("ann", "Ann"),
        chat: test_chat(),
        message: None,
        text: body.to_string(),
    }
}

fn press(data: &str) -> Update {
    Update::Callback {
        from: user("ann"),
        chat: test_chat(),
        callback: CallbackId(format!("cb-{data}")),
        data: data.to_string(),
    }
}

#[tokio::test]
async fn start_greets_and_registers_once() {
    let effects = MockEffects::new();
    let bot = bot();

    assert_eq!(
        bot.handle(&effects, text("/start")).await.unwrap(),
        Outcome::Greeted { registered: true }
    );
    assert_eq!(
        bot.handle(&effects, text("/start")).await.unwrap(),
        Outcome::Greeted { registered: false }
    );
    assert_eq!(
        effects.surface().sent_texts()[0],
        "Hello, Ann, welcome to the store"
    );
}

#[tokio::test]
async fn catalog_browsing_and_paging() {
    let effects = MockEffects::with_items(sample_catalog());
    let bot = bot();

    assert_eq!(
        bot.handle(&effects, text("/show_products")).await.unwrap(),
        Outcome::ViewStarted {
            view: ViewKind::Catalog,
            pages: 3
        }
    );
    assert_eq!(effects.surface().live_cards(test_chat()).len(), 3);

    assert_eq!(
        bot.handle(&effects, press("product_right")).await.unwrap(),
        Outcome::Navigated {
            view: ViewKind::Catalog,
            page: 1
        }
    );
    assert_eq!(
        bot.handle(&effects, press("product_right")).await.unwrap(),
        Outcome::Navigated {
            view: ViewKind::Catalog,
            page: 2
        }
    );
    assert_eq!(effects.surface().live_cards(test_chat()).len(), 1);

    assert_eq!(
        bot.handle(&effects, press("product_right")).await.unwrap(),
        Outcome::Ignored
    );
    assert_eq!(effects.surface().answers().len(), 3);
}

#[tokio::test]
async fn navigation_without_session_is_answered() {
    let effects = MockEffects::with_items(sample_catalog());
    assert_eq!(
        bot().handle(&effects, press("basket_left")).await.unwrap(),
        Outcome::Ignored
    );
    assert_eq!(effects.surface().answers(), vec![String::new()]);
}

#[tokio::test]
async fn basket_buttons_answer_with_alerts() {
    let effects = MockEffects::with_items(sample_catalog());
    let bot = bot();

    let outcomes = [
        bot.handle(&effects, press("basket:add:3")).await.unwrap(),
        bot.handle(&effects, press("basket:add:3")).await.unwrap(),
        bot.handle(&effects, press("basket:add:99")).await.unwrap(),
        bot.handle(&effects, press("basket:remove:3")).await.unwrap(),
        bot.handle(&effects, press("basket:remove:3")).await.unwrap(),
    ];
    assert_eq!(
        outcomes,
        [
            Outcome::Basket(BasketChange::Added),
            Outcome::Basket(BasketChange::AlreadyPresent),
            Outcome::Basket(BasketChange::UnknownItem),
            Outcome::Basket(BasketChange::Removed),
            Outcome::Basket(BasketChange::NotPresent),
        ]
    );
    assert_eq!(
        effects.surface().answers(),
        vec![
            ADDED_TO_BASKET,
            ALREADY_IN_BASKET,
            UNKNOWN_PRODUCT,
            REMOVED_FROM_BASKET,
            NOT_IN_BASKET
        ]
    );
}

#[tokio::test]
async fn basket_view_uses_remove_buttons() {
    let effects = MockEffects::with_items(sample_catalog());
    let bot = bot();

    assert_eq!(
        bot.handle(&effects, text("/basket")).await.unwrap(),
        Outcome::NothingToShow {
            view: ViewKind::Basket
        }
    );
    assert_eq!(effects.surface().sent_texts(), vec![EMPTY_BASKET]);

    bot.handle(&effects, press("basket:add:5")).await.unwrap();
    assert_eq!(
        bot.handle(&effects, text(MENU_BASKET)).await.unwrap(),
        Outcome::ViewStarted {
            view: ViewKind::Basket,
            pages: 1
        }
    );
    let cards = effects.surface().live_cards(test_chat());
    assert_eq!(cards.len(), 1);
    assert_eq!(
        cards[0].1.keyboard.rows[0][0].callback_data,
        "basket:remove:5"
    );
    // the empty-basket notice went with the next command
    assert!(effects.surface().live_texts(test_chat()).is_empty());
}

#[tokio::test]
async fn find_prompt_then_query() {
    let effects = MockEffects::with_items(sample_catalog());
    let bot = bot();

    assert_eq!(
        bot.handle(&effects, text("/find")).await.unwrap(),
        Outcome::AwaitingQuery
    );
    let query = Update::Message {
        from: profile("ann", "Ann"),
        chat: test_chat(),
        message: Some(CardHandle(500)),
        text: "tea".to_string(),
    };
    assert_eq!(
        bot.handle(&effects, query).await.unwrap(),
        Outcome::ViewStarted {
            view: ViewKind::Search,
            pages: 2
        }
    );

    let names: Vec<String> = effects
        .surface()
        .live_cards(test_chat())
        .into_iter()
        .map(|(_, card)| card.caption)
        .collect();
    assert!(names[0].starts_with("<b>Teapot</b>"));

    let tracked = ScratchLedger::tracked(&effects, &user("ann")).await.unwrap();
    assert_eq!(tracked.len(), 2);

    // a second plain text is no longer a query
    assert_eq!(
        bot.handle(&effects, text("coffee")).await.unwrap(),
        Outcome::Unknown
    );
}

#[tokio::test]
async fn search_without_results() {
    let effects = MockEffects::with_items(sample_catalog());
    let bot = bot();
    bot.handle(&effects, text("/find")).await.unwrap();
    assert_eq!(
        bot.handle(&effects, text("chocolate")).await.unwrap(),
        Outcome::NothingToShow {
            view: ViewKind::Search
        }
    );
    assert!(effects.surface().sent_texts().contains(&NOTHING_FOUND.to_string()));
}

#[tokio::test]
async fn command_cancels_prompt_and_clears_scratch() {
    let effects = MockEffects::with_items(sample_catalog());
    let bot = bot();
    bot.handle(&effects, text("/find")).await.unwrap();
    assert_eq!(effects.surface().live_texts(test_chat()).len(), 1);

    bot.handle(&effects, text("/show_products")).await.unwrap();
    assert!(effects.surface().live_texts(test_chat()).is_empty());

    assert_eq!(
        bot.handle(&effects, text("tea")).await.unwrap(),
        Outcome::Unknown
    );
}

#[tokio::test]
async fn empty_catalog_notice() {
    let effects = MockEffects::new();
    assert_eq!(
        bot().handle(&effects, text("/show_products")).await.unwrap(),
        Outcome::NothingToShow {
            view: ViewKind::Catalog
        }
    );
    assert_eq!(effects.surface().sent_texts(), vec![NO_PRODUCTS]);
}

#[tokio::test]
async fn odd_buttons_are_answered() {
    let effects = MockEffects::new();
    let bot = bot();
    assert_eq!(
        bot.handle(&effects, press("page:noop")).await.unwrap(),
        Outcome::Ignored
    );
    assert_eq!(
        bot.handle(&effects, press("garbage")).await.unwrap(),
        Outcome::Ignored
    );
    assert_eq!(effects.surface().answers().len(), 2);
}

#[tokio::test]
async fn unknown_command_reply_is_scratch() {
    let effects = MockEffects::new();
    let bot = bot();
    assert_eq!(
        bot.handle(&effects, text("/create_product")).await.unwrap(),
        Outcome::Unknown
    );
    assert_eq!(effects.surface().sent_texts(), vec![UNKNOWN_COMMAND]);
    bot.handle(&effects, text("/start")).await.unwrap();
    assert_eq!(effects.surface().live_texts(test_chat()).len(), 1);
}

#[tokio::test]
async fn greeting_menu_buttons_run_their_commands() {
    let effects = MockEffects::with_items(sample_catalog());
    let bot = bot();
    bot.handle(&effects, text("/start")).await.unwrap();

    assert_eq!(
        bot.handle(&effects, press("/show_products")).await.unwrap(),
        Outcome::ViewStarted {
            view: ViewKind::Catalog,
            pages: 3
        }
    );
    assert_eq!(effects.surface().live_cards(test_chat()).len(), 3);

    assert_eq!(
        bot.handle(&effects, press("/basket")).await.unwrap(),
        Outcome::NothingToShow {
            view: ViewKind::Basket
        }
    );

    assert_eq!(
        bot.handle(&effects, press("/find")).await.unwrap(),
        Outcome::AwaitingQuery
    );
    assert_eq!(
        bot.handle(&effects, text("tea")).await.unwrap(),
        Outcome::ViewStarted {
            view: ViewKind::Search,
            pages: 2
        }
    );

    assert_eq!(effects.surface().answers(), vec![""; 3]);
}

#[tokio::test]
async fn basket_press_is_answered_when_the_store_fails() {
    let effects = MockEffects::with_items(sample_catalog());
    effects.set_basket_offline(true);
    let bot = bot();

    assert!(bot.handle(&effects, press("basket:add:1")).await.is_err());
    assert!(bot.handle(&effects, press("basket:remove:1")).await.is_err());
    assert_eq!(effects.surface().count(CallKind::AnswerCallback), 2);

    effects.set_basket_offline(false);
    assert_eq!(
        bot.handle(&effects, press("basket:add:1")).await.unwrap(),
        Outcome::Basket(BasketChange::Added)
    );
}
