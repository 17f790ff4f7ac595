//! End-to-end integration tests
//!
//! These tests drive complete command flows through the dispatcher against a
//! file-backed store, the same path the running bot takes after the transport
//! has converted an update. Covered:
//!
//! - The full lifecycle: add credits, inspect stats, settle the bill, undo
//! - Netting across members and mention forms
//! - Error replies (missing mention, bad formats, wrong owner, unknown ids)
//! - Persistence of the ledger across a restart

use credits_bot::core::{Dispatcher, LedgerStore};
use credits_bot::store::JsonFileStore;
use credits_bot::types::{InboundMessage, Mention, User, UserId};
use rstest::rstest;
use tempfile::TempDir;

const CHAT_ID: i64 = -1001;

fn bot() -> User {
    User {
        id: UserId::Id(9000),
        first_name: "CreditsBot".to_string(),
        username: Some("creditsbot".to_string()),
    }
}

fn member(id: i64, name: &str, username: &str) -> User {
    User {
        id: UserId::Id(id),
        first_name: name.to_string(),
        username: Some(username.to_string()),
    }
}

fn dispatcher_at(dir: &TempDir) -> Dispatcher {
    let store = JsonFileStore::open(&dir.path().join("credits.json")).expect("open store");
    Dispatcher::new(LedgerStore::new(Box::new(store)), bot())
}

fn command(id: i64, sender: &User, text: &str) -> InboundMessage {
    let mentions = if text.split_whitespace().any(|token| token.starts_with('@')) {
        vec![Mention::Handle]
    } else {
        Vec::new()
    };
    InboundMessage {
        id,
        chat_id: CHAT_ID,
        sender: sender.clone(),
        text: Some(text.to_string()),
        mentions,
        new_member: None,
        left_member: None,
    }
}

#[test]
fn test_full_credit_lifecycle() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = dispatcher_at(&dir);
    let anna = member(1, "Anna", "anna");
    let ben = member(2, "Ben", "ben");

    // Anna lends to Ben twice, Ben lends back once
    let reply = dispatcher
        .dispatch(&command(1, &anna, "/add @ben 10 pizza"))
        .unwrap();
    assert!(reply.contains("Alright Anna!"));
    dispatcher
        .dispatch(&command(2, &anna, "/add @ben 5 beer"))
        .unwrap();
    dispatcher
        .dispatch(&command(3, &ben, "/add @anna 4 breakfast"))
        .unwrap();

    // Stats list all three credits
    let stats = dispatcher.dispatch(&command(4, &anna, "/stats")).unwrap();
    assert_eq!(stats.lines().count(), 3);
    assert!(stats.contains("Anna -> ben 10.00 \"pizza\" (#1)"));

    // The bill nets to a single transfer: Ben pays Anna 11
    let bill = dispatcher.dispatch(&command(5, &anna, "/bill")).unwrap();
    assert_eq!(bill, "ben -> Anna 11.00");

    // Undoing the beer credit changes the bill
    let undo = dispatcher.dispatch(&command(6, &anna, "/undo 2")).unwrap();
    assert!(undo.contains("crossed out"));
    let bill = dispatcher.dispatch(&command(7, &anna, "/bill")).unwrap();
    assert_eq!(bill, "ben -> Anna 6.00");
}

#[test]
fn test_bill_covers_multiple_pairs() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = dispatcher_at(&dir);
    let anna = member(1, "Anna", "anna");
    let cleo = member(3, "Cleo", "cleo");

    dispatcher
        .dispatch(&command(1, &anna, "/add @ben 10 pizza"))
        .unwrap();
    dispatcher
        .dispatch(&command(2, &cleo, "/add @ben 3 coffee"))
        .unwrap();
    dispatcher
        .dispatch(&command(3, &anna, "/add @cleo 2 snacks"))
        .unwrap();

    let bill = dispatcher.dispatch(&command(4, &anna, "/bill")).unwrap();
    let blocks: Vec<&str> = bill.split("\n\n").collect();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0], "ben -> Anna 10.00");
    assert_eq!(blocks[1], "ben -> Cleo 3.00");
    assert_eq!(blocks[2], "cleo -> Anna 2.00");
}

#[test]
fn test_exactly_settled_pair_disappears_from_bill() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = dispatcher_at(&dir);
    let anna = member(1, "Anna", "anna");
    let ben = member(2, "Ben", "ben");

    dispatcher
        .dispatch(&command(1, &anna, "/add @ben 7.50 cinema"))
        .unwrap();
    dispatcher
        .dispatch(&command(2, &ben, "/add @anna 7.50 dinner"))
        .unwrap();

    let bill = dispatcher.dispatch(&command(3, &anna, "/bill")).unwrap();
    assert!(bill.contains("settled up"));
}

#[test]
fn test_ledger_survives_restart() {
    let dir = TempDir::new().unwrap();
    let anna = member(1, "Anna", "anna");

    {
        let mut dispatcher = dispatcher_at(&dir);
        dispatcher
            .dispatch(&command(1, &anna, "/add @ben 10 pizza"))
            .unwrap();
    }

    // A fresh dispatcher over the same file sees the credit
    let mut dispatcher = dispatcher_at(&dir);
    let stats = dispatcher.dispatch(&command(2, &anna, "/stats")).unwrap();
    assert!(stats.contains("\"pizza\" (#1)"));
}

#[test]
fn test_undo_is_donor_only_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = dispatcher_at(&dir);
    let anna = member(1, "Anna", "anna");
    let ben = member(2, "Ben", "ben");

    dispatcher
        .dispatch(&command(1, &anna, "/add @ben 10 pizza"))
        .unwrap();

    // Ben (the debtor) may not undo Anna's credit
    let reply = dispatcher.dispatch(&command(2, &ben, "/undo 1")).unwrap();
    assert!(reply.contains("doesn't belong to you"));
    assert!(reply.contains("Ask Anna"));

    // Anna may
    let reply = dispatcher.dispatch(&command(3, &anna, "/undo 1")).unwrap();
    assert!(reply.contains("crossed out"));
}

#[rstest]
#[case::add_no_mention("/add ben 10 pizza", "you didn't mention a user")]
#[case::add_bad_format("/add @ben pizza ten", "format you used is incorrect")]
#[case::add_credit_bot("/add @creditsbot 10 pizza", "you cannot lend me money")]
#[case::add_credit_self("/add @anna 10 pizza", "you cannot lend money to yourself")]
#[case::undo_bad_format("/undo first", "format you used is incorrect")]
#[case::undo_unknown_id("/undo 404", "this credit doesn't exist")]
#[case::unrelated_chatter("hello there", "didn't understand your request")]
fn test_error_replies(#[case] text: &str, #[case] expected_fragment: &str) {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = dispatcher_at(&dir);
    let anna = member(1, "Anna", "anna");

    let reply = dispatcher.dispatch(&command(1, &anna, text)).unwrap();
    assert!(
        reply.contains(expected_fragment),
        "reply {:?} does not contain {:?}",
        reply,
        expected_fragment
    );
    assert!(reply.contains("Anna"));

    // None of these may leave a record behind
    let stats = dispatcher.dispatch(&command(2, &anna, "/stats")).unwrap();
    assert!(stats.contains("don't have any credits"));
}

#[test]
fn test_rich_mention_flow() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = dispatcher_at(&dir);
    let anna = member(1, "Anna", "anna");
    let ben = member(2, "Ben", "ben");

    // Rich mentions carry the user record instead of an @handle token
    let msg = InboundMessage {
        id: 1,
        chat_id: CHAT_ID,
        sender: anna.clone(),
        text: Some("/add Ben 12.50 groceries".to_string()),
        mentions: vec![Mention::Embedded(ben.clone())],
        new_member: None,
        left_member: None,
    };
    let reply = dispatcher.dispatch(&msg).unwrap();
    assert!(reply.contains("lent 12.50 Euros to Ben"));

    let bill = dispatcher.dispatch(&command(2, &anna, "/bill")).unwrap();
    assert_eq!(bill, "Ben -> Anna 12.50");
}
