// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end workflow tests over mock adapters: registration approval,
//! drafting, correction, customer confirmation, and admin confirmation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use brewline_agent::session::OrderState;
use brewline_agent::{Dispatcher, texts};
use brewline_catalog::CatalogCache;
use brewline_core::traits::{ChannelAdapter, LedgerAdapter, ParserAdapter, StorageAdapter};
use brewline_core::types::{
    ChannelUpdate, ChatRef, DraftEntry, OrderStatus, Product, PromptRef, Sender, UnitKind, User,
};
use brewline_test_utils::{MemoryStorage, MockChannel, MockLedger, MockParser, ScriptedParse};

const CUSTOMER: i64 = 42;
const ADMIN_A: i64 = 100;
const ADMIN_B: i64 = 200;

struct World {
    dispatcher: Dispatcher,
    storage: Arc<MemoryStorage>,
    channel: Arc<MockChannel>,
    parser: Arc<MockParser>,
    ledger: Arc<MockLedger>,
}

async fn world() -> World {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .seed_products(vec![
            Product {
                good_id: 1,
                name: "Гаус".into(),
                unit_kind: UnitKind::VolumeLiters,
                price_cash: 95.0,
                price_cashless: 100.0,
                min_size: 30.0,
            },
            Product {
                good_id: 2,
                name: "Сидр яблочный".into(),
                unit_kind: UnitKind::Piece,
                price_cash: 120.0,
                price_cashless: 130.0,
                min_size: 1.0,
            },
        ])
        .await;

    let channel = Arc::new(MockChannel::new());
    let parser = Arc::new(MockParser::new());
    let ledger = Arc::new(MockLedger::new());
    let catalog = Arc::new(CatalogCache::new(
        storage.clone() as Arc<dyn StorageAdapter>
    ));

    let dispatcher = Dispatcher::new(
        storage.clone() as Arc<dyn StorageAdapter>,
        channel.clone() as Arc<dyn ChannelAdapter>,
        parser.clone() as Arc<dyn ParserAdapter>,
        Some(ledger.clone() as Arc<dyn LedgerAdapter>),
        catalog,
        vec![ADMIN_A, ADMIN_B],
        Duration::from_secs(5),
    );

    World {
        dispatcher,
        storage,
        channel,
        parser,
        ledger,
    }
}

async fn seed_approved_customer(world: &World) {
    world
        .storage
        .save_user(&User {
            user_id: CUSTOMER,
            display_name: "Иван".into(),
            username: Some("ivan".into()),
            organization: Some("ООО Ромашка".into()),
            phone: None,
            approved: true,
            registered_at: "2026-08-01T00:00:00Z".into(),
        })
        .await
        .unwrap();
}

fn sender(user_id: i64) -> Sender {
    Sender {
        user_id,
        username: Some(format!("user{user_id}")),
        first_name: Some("Тест".into()),
    }
}

fn message(user_id: i64, text: &str) -> ChannelUpdate {
    ChannelUpdate::Message {
        sender: sender(user_id),
        chat: ChatRef(user_id),
        text: text.to_string(),
    }
}

fn control(user_id: i64, prompt: &PromptRef, payload: &str) -> ChannelUpdate {
    ChannelUpdate::Control {
        sender: sender(user_id),
        chat: ChatRef(user_id),
        prompt: prompt.clone(),
        control_id: format!("cbq-{user_id}-{payload}"),
        payload: payload.to_string(),
    }
}

fn draft_entry(address: &str, goods: &[(&str, f64)]) -> DraftEntry {
    DraftEntry {
        address: Some(address.to_string()),
        goods: goods
            .iter()
            .map(|(id, n)| (id.to_string(), *n))
            .collect::<BTreeMap<_, _>>(),
        ..DraftEntry::default()
    }
}

/// Latest confirmation prompt sent to a chat (the one carrying controls).
async fn last_prompt(channel: &MockChannel, chat: ChatRef) -> PromptRef {
    channel
        .sent_to(chat)
        .await
        .iter()
        .rev()
        .find(|s| s.message.controls.is_some())
        .expect("no prompt with controls sent")
        .prompt
        .clone()
}

#[tokio::test]
async fn text_from_idle_lands_in_awaiting_confirmation_with_one_draft() {
    let w = world().await;
    seed_approved_customer(&w).await;

    // Two delivery addresses still make exactly one active draft.
    w.parser
        .script(ScriptedParse::immediate(vec![
            draft_entry("Ленина 4", &[("1", 2.0)]),
            draft_entry("Мира 12", &[("2", 3.0)]),
        ]))
        .await;

    w.dispatcher
        .dispatch(message(CUSTOMER, "Гаус 2 кеги на Ленина, сидр 3 на Мира"))
        .await;

    let session = w.dispatcher.sessions().snapshot(CUSTOMER).await;
    assert_eq!(session.order, OrderState::AwaitingConfirmation);
    let draft = session.active_draft.expect("draft must be installed");
    assert_eq!(draft.len(), 2);

    // The confirmation prompt went out with a confirm control.
    let prompt_msg = w.channel.sent_to(ChatRef(CUSTOMER)).await;
    let with_controls: Vec<_> = prompt_msg
        .iter()
        .filter(|s| s.message.controls.is_some())
        .collect();
    assert_eq!(with_controls.len(), 1);
    assert!(with_controls[0].message.text.contains("Заказ #1"));
    assert!(with_controls[0].message.text.contains("Заказ #2"));
}

#[tokio::test]
async fn correction_replaces_draft_without_merging() {
    let w = world().await;
    seed_approved_customer(&w).await;

    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Ленина 4",
            &[("1", 2.0)],
        )]))
        .await;
    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;

    let first_prompt = last_prompt(&w.channel, ChatRef(CUSTOMER)).await;

    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Мира 12",
            &[("2", 5.0)],
        )]))
        .await;
    w.dispatcher
        .dispatch(message(CUSTOMER, "нет, сидр 5 штук на Мира 12"))
        .await;

    let session = w.dispatcher.sessions().snapshot(CUSTOMER).await;
    assert_eq!(session.order, OrderState::AwaitingConfirmation);
    let draft = session.active_draft.expect("corrected draft installed");
    assert_eq!(draft.len(), 1);
    assert_eq!(draft[0].address.as_deref(), Some("Мира 12"));
    assert!(
        !draft[0].goods.contains_key("1"),
        "previous draft's goods must not leak into the correction"
    );

    // The first prompt was visibly superseded.
    let edits = w.channel.edited().await;
    assert!(
        edits
            .iter()
            .any(|e| e.prompt == first_prompt && e.text == texts::ORDER_SUPERSEDED)
    );
}

#[tokio::test]
async fn unknown_user_never_reaches_parser_or_mutates_state() {
    let w = world().await;

    w.dispatcher.dispatch(message(77, "Гаус 2 кеги")).await;

    assert_eq!(w.parser.call_count().await, 0);
    assert!(w.storage.get_user(77).await.unwrap().is_none());
    assert!(w.storage.orders().await.is_empty());

    let sent = w.channel.sent_to(ChatRef(77)).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message.text, texts::NOT_REGISTERED);
}

#[tokio::test]
async fn unapproved_user_never_reaches_parser() {
    let w = world().await;
    w.storage
        .save_user(&User {
            user_id: CUSTOMER,
            display_name: "Иван".into(),
            username: None,
            organization: Some("ООО Ромашка".into()),
            phone: None,
            approved: false,
            registered_at: "2026-08-01T00:00:00Z".into(),
        })
        .await
        .unwrap();

    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;

    assert_eq!(w.parser.call_count().await, 0);
    let sent = w.channel.sent_to(ChatRef(CUSTOMER)).await;
    assert_eq!(sent[0].message.text, texts::NOT_REGISTERED);
}

#[tokio::test]
async fn registration_flow_fans_out_and_approval_unlocks_orders() {
    let w = world().await;

    // /start greets and asks for the organization.
    w.dispatcher.dispatch(message(77, "/start")).await;
    let greeting = w.channel.sent_to(ChatRef(77)).await;
    assert_eq!(greeting[0].message.text, texts::REGISTRATION_GREETING);

    // The next message is captured as the organization.
    w.dispatcher.dispatch(message(77, "ООО Василёк")).await;

    let user = w.storage.get_user(77).await.unwrap().expect("user created");
    assert!(!user.approved);
    assert_eq!(user.organization.as_deref(), Some("ООО Василёк"));

    // Both admins got the approval request with controls.
    for admin in [ADMIN_A, ADMIN_B] {
        let sent = w.channel.sent_to(ChatRef(admin)).await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].message.text.contains("ООО Василёк"));
        assert!(sent[0].message.controls.is_some());
    }

    // Admin approves.
    let admin_prompt = w.channel.sent_to(ChatRef(ADMIN_A)).await[0].prompt.clone();
    w.channel.clear().await;
    w.dispatcher
        .dispatch(control(ADMIN_A, &admin_prompt, "approve_user:77"))
        .await;

    assert!(w.storage.get_user(77).await.unwrap().unwrap().approved);
    let notices = w.channel.sent_to(ChatRef(77)).await;
    assert_eq!(notices[0].message.text, texts::READY_FOR_ORDERS);

    let edits = w.channel.edited().await;
    assert!(edits[0].text.contains(texts::ADMIN_USER_APPROVED_BANNER));
}

#[tokio::test]
async fn rejection_keeps_user_out_of_the_order_flow() {
    let w = world().await;

    w.dispatcher.dispatch(message(77, "/start")).await;
    w.dispatcher.dispatch(message(77, "ООО Василёк")).await;
    let admin_prompt = w.channel.sent_to(ChatRef(ADMIN_A)).await[0].prompt.clone();
    w.channel.clear().await;

    w.dispatcher
        .dispatch(control(ADMIN_A, &admin_prompt, "reject_user:77"))
        .await;

    assert!(!w.storage.get_user(77).await.unwrap().unwrap().approved);
    let notices = w.channel.sent_to(ChatRef(77)).await;
    assert_eq!(notices[0].message.text, texts::REGISTRATION_REJECTED);

    // A later message still cannot order.
    w.channel.clear().await;
    w.dispatcher.dispatch(message(77, "Гаус 2 кеги")).await;
    assert_eq!(w.parser.call_count().await, 0);
}

#[tokio::test]
async fn user_confirm_persists_order_and_fans_out_with_order_id() {
    let w = world().await;
    seed_approved_customer(&w).await;

    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Ленина 4",
            &[("1", 2.0)],
        )]))
        .await;
    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;
    let prompt = last_prompt(&w.channel, ChatRef(CUSTOMER)).await;
    w.channel.clear().await;

    w.dispatcher
        .dispatch(control(CUSTOMER, &prompt, "confirm_order"))
        .await;

    // Order persisted as pending_admin.
    let orders = w.storage.orders().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::PendingAdmin);
    let order_id = orders[0].order_id;

    // Fan-out carries the order id in the control payload.
    for admin in [ADMIN_A, ADMIN_B] {
        let sent = w.channel.sent_to(ChatRef(admin)).await;
        assert_eq!(sent.len(), 1);
        let controls = sent[0].message.controls.as_ref().unwrap();
        assert_eq!(
            controls.rows[0][0].payload,
            format!("admin_confirm:{CUSTOMER}:{order_id}")
        );
        assert!(sent[0].message.text.contains("НОВЫЙ ЗАКАЗ"));
    }

    // The customer's prompt shows the confirmed state and the draft is gone.
    let edits = w.channel.edited().await;
    assert!(edits.iter().any(|e| e.text.contains(texts::ORDER_SENT_TO_MANAGER)));
    let session = w.dispatcher.sessions().snapshot(CUSTOMER).await;
    assert_eq!(session.order, OrderState::Idle);
    assert!(session.active_draft.is_none());
}

#[tokio::test]
async fn second_confirmation_supersedes_prior_pending_order() {
    let w = world().await;
    seed_approved_customer(&w).await;

    for goods in [("1", 1.0), ("2", 2.0)] {
        w.parser
            .script(ScriptedParse::immediate(vec![draft_entry(
                "Ленина 4",
                &[goods],
            )]))
            .await;
        w.dispatcher.dispatch(message(CUSTOMER, "заказ")).await;
        let prompt = last_prompt(&w.channel, ChatRef(CUSTOMER)).await;
        w.dispatcher
            .dispatch(control(CUSTOMER, &prompt, "confirm_order"))
            .await;
    }

    let orders = w.storage.orders().await;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].status, OrderStatus::Superseded);
    assert_eq!(orders[1].status, OrderStatus::PendingAdmin);
}

#[tokio::test]
async fn admin_confirm_finalizes_records_and_notifies() {
    let w = world().await;
    seed_approved_customer(&w).await;

    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Ленина 4",
            &[("1", 2.0)],
        )]))
        .await;
    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;
    let prompt = last_prompt(&w.channel, ChatRef(CUSTOMER)).await;
    w.dispatcher
        .dispatch(control(CUSTOMER, &prompt, "confirm_order"))
        .await;

    let order_id = w.storage.orders().await[0].order_id;
    let admin_prompt = w.channel.sent_to(ChatRef(ADMIN_A)).await[0].prompt.clone();
    w.channel.clear().await;

    w.dispatcher
        .dispatch(control(
            ADMIN_A,
            &admin_prompt,
            &format!("admin_confirm:{CUSTOMER}:{order_id}"),
        ))
        .await;

    // Confirmed in storage and recorded externally.
    assert_eq!(w.storage.orders().await[0].status, OrderStatus::Confirmed);
    let appended = w.ledger.appended().await;
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].user_id, CUSTOMER);
    assert_eq!(appended[0].organization.as_deref(), Some("ООО Ромашка"));

    // Customer notified, admin message rewritten.
    let notices = w.channel.sent_to(ChatRef(CUSTOMER)).await;
    assert_eq!(notices[0].message.text, texts::ORDER_CONFIRMED_BY_ADMIN);
    let edits = w.channel.edited().await;
    assert!(
        edits
            .iter()
            .any(|e| e.text.contains(texts::ADMIN_ORDER_CONFIRMED_BANNER))
    );
}

#[tokio::test]
async fn non_admin_confirm_is_denied_without_mutation() {
    let w = world().await;
    seed_approved_customer(&w).await;

    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Ленина 4",
            &[("1", 2.0)],
        )]))
        .await;
    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;
    let prompt = last_prompt(&w.channel, ChatRef(CUSTOMER)).await;
    w.dispatcher
        .dispatch(control(CUSTOMER, &prompt, "confirm_order"))
        .await;
    let order_id = w.storage.orders().await[0].order_id;
    w.channel.clear().await;

    // The customer presses the admin control on a forwarded message.
    w.dispatcher
        .dispatch(control(
            CUSTOMER,
            &PromptRef("999".into()),
            &format!("admin_confirm:{CUSTOMER}:{order_id}"),
        ))
        .await;

    assert_eq!(w.storage.orders().await[0].status, OrderStatus::PendingAdmin);
    assert!(w.ledger.appended().await.is_empty());

    let answers = w.channel.answers().await;
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].text, texts::ACTION_DENIED);
    assert!(answers[0].alert);
}

#[tokio::test]
async fn double_admin_confirm_is_idempotent() {
    let w = world().await;
    seed_approved_customer(&w).await;

    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Ленина 4",
            &[("1", 2.0)],
        )]))
        .await;
    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;
    let prompt = last_prompt(&w.channel, ChatRef(CUSTOMER)).await;
    w.dispatcher
        .dispatch(control(CUSTOMER, &prompt, "confirm_order"))
        .await;
    let order_id = w.storage.orders().await[0].order_id;
    let admin_prompt = w.channel.sent_to(ChatRef(ADMIN_A)).await[0].prompt.clone();

    let payload = format!("admin_confirm:{CUSTOMER}:{order_id}");
    w.dispatcher
        .dispatch(control(ADMIN_A, &admin_prompt, &payload))
        .await;
    w.dispatcher
        .dispatch(control(ADMIN_B, &admin_prompt, &payload))
        .await;

    // Only one ledger row; the second press is answered, not re-applied.
    assert_eq!(w.ledger.appended().await.len(), 1);
    let answers = w.channel.answers().await;
    assert!(
        answers
            .iter()
            .any(|a| a.text == texts::ORDER_ALREADY_HANDLED)
    );
}

#[tokio::test]
async fn ledger_failure_keeps_order_confirmed() {
    let w = world().await;
    seed_approved_customer(&w).await;
    w.ledger.fail_appends();

    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Ленина 4",
            &[("1", 2.0)],
        )]))
        .await;
    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;
    let prompt = last_prompt(&w.channel, ChatRef(CUSTOMER)).await;
    w.dispatcher
        .dispatch(control(CUSTOMER, &prompt, "confirm_order"))
        .await;
    let order_id = w.storage.orders().await[0].order_id;
    let admin_prompt = w.channel.sent_to(ChatRef(ADMIN_A)).await[0].prompt.clone();

    w.dispatcher
        .dispatch(control(
            ADMIN_A,
            &admin_prompt,
            &format!("admin_confirm:{CUSTOMER}:{order_id}"),
        ))
        .await;

    // The failure is logged only: order stays confirmed, flow completed.
    assert_eq!(w.storage.orders().await[0].status, OrderStatus::Confirmed);
    assert!(w.ledger.appended().await.is_empty());
    let notices = w.channel.sent_to(ChatRef(CUSTOMER)).await;
    assert!(
        notices
            .iter()
            .any(|s| s.message.text == texts::ORDER_CONFIRMED_BY_ADMIN)
    );
}

#[tokio::test]
async fn unreachable_admin_does_not_block_fanout() {
    let w = world().await;
    seed_approved_customer(&w).await;
    w.channel.make_unreachable(ChatRef(ADMIN_A)).await;

    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Ленина 4",
            &[("1", 2.0)],
        )]))
        .await;
    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;
    let prompt = last_prompt(&w.channel, ChatRef(CUSTOMER)).await;
    w.dispatcher
        .dispatch(control(CUSTOMER, &prompt, "confirm_order"))
        .await;

    // The order still persisted and the reachable admin was notified.
    assert_eq!(w.storage.orders().await.len(), 1);
    assert!(w.channel.sent_to(ChatRef(ADMIN_A)).await.is_empty());
    assert_eq!(w.channel.sent_to(ChatRef(ADMIN_B)).await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_parse_completion_cannot_overwrite_newer_draft() {
    let w = world().await;
    seed_approved_customer(&w).await;

    // The first message's parse is slow; the correction's is instant.
    w.parser
        .script(ScriptedParse::delayed(
            vec![draft_entry("Ленина 4", &[("1", 2.0)])],
            Duration::from_millis(200),
        ))
        .await;
    w.parser
        .script(ScriptedParse::immediate(vec![draft_entry(
            "Мира 12",
            &[("2", 5.0)],
        )]))
        .await;

    tokio::join!(
        w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")),
        w.dispatcher.dispatch(message(CUSTOMER, "нет, сидр 5 на Мира"))
    );

    assert_eq!(w.parser.call_count().await, 2);

    // The slow (stale) result lost: the newer draft survives.
    let session = w.dispatcher.sessions().snapshot(CUSTOMER).await;
    let draft = session.active_draft.expect("draft installed");
    assert_eq!(draft[0].address.as_deref(), Some("Мира 12"));

    // The stale prompt was visibly cancelled.
    let edits = w.channel.edited().await;
    assert!(edits.iter().any(|e| e.text == texts::ORDER_SUPERSEDED));
}

#[tokio::test(start_paused = true)]
async fn hung_parser_degrades_to_timeout_note() {
    let storage = Arc::new(MemoryStorage::new());
    storage.seed_products(vec![]).await;
    let channel = Arc::new(MockChannel::new());
    let parser = Arc::new(MockParser::new());
    let catalog = Arc::new(CatalogCache::new(
        storage.clone() as Arc<dyn StorageAdapter>
    ));
    let dispatcher = Dispatcher::new(
        storage.clone() as Arc<dyn StorageAdapter>,
        channel.clone() as Arc<dyn ChannelAdapter>,
        parser.clone() as Arc<dyn ParserAdapter>,
        None,
        catalog,
        vec![ADMIN_A],
        Duration::from_millis(50),
    );

    storage
        .save_user(&User {
            user_id: CUSTOMER,
            display_name: "Иван".into(),
            username: None,
            organization: None,
            phone: None,
            approved: true,
            registered_at: "2026-08-01T00:00:00Z".into(),
        })
        .await
        .unwrap();

    parser
        .script(ScriptedParse::delayed(
            vec![draft_entry("Ленина 4", &[("1", 1.0)])],
            Duration::from_secs(600),
        ))
        .await;

    dispatcher.dispatch(message(CUSTOMER, "Гаус 1 кега")).await;

    // The user still got an answer: the timeout note rendered verbatim.
    let prompt = last_prompt(&channel, ChatRef(CUSTOMER)).await;
    let sent = channel.sent_to(ChatRef(CUSTOMER)).await;
    let prompt_text = &sent
        .iter()
        .find(|s| s.prompt == prompt)
        .unwrap()
        .message
        .text;
    assert!(prompt_text.contains(texts::PARSER_TIMED_OUT_NOTE));
}

#[tokio::test]
async fn storage_failure_still_answers_the_user() {
    let w = world().await;
    w.storage.fail_all();

    w.dispatcher.dispatch(message(CUSTOMER, "Гаус 2 кеги")).await;

    let sent = w.channel.sent_to(ChatRef(CUSTOMER)).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message.text, texts::RETRY_LATER);
}

#[tokio::test]
async fn confirm_without_draft_is_answered() {
    let w = world().await;
    seed_approved_customer(&w).await;

    w.dispatcher
        .dispatch(control(CUSTOMER, &PromptRef("5".into()), "confirm_order"))
        .await;

    let answers = w.channel.answers().await;
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].text, texts::DRAFT_NOT_FOUND);
    assert!(w.storage.orders().await.is_empty());
}
