//! Request dispatcher
//!
//! Classifies inbound messages into intents, routes them to the ledger and
//! the netting engine, and produces the reply text. Dispatching is stateless
//! per message: every inbound message is classified and handled on its own,
//! with no session state carried between messages.
//!
//! Recoverable problems (bad format, unknown credit, wrong owner) become
//! specific replies addressed to the sender. Internal faults (store I/O,
//! netting invariant violations) are logged and answered with the generic
//! fallback so no internals leak into the chat.

use crate::core::ledger::LedgerStore;
use crate::core::{netting, replies};
use crate::parse;
use crate::types::{BotError, InboundMessage, User};
use tracing::{debug, error, warn};

/// Classified intent of an inbound message
///
/// Command intents are recognized by prefix; group events by their event
/// markers. Anything else is [`Intent::Unknown`] and earns the fallback
/// reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// `/add` — register a credit
    AddCredit,
    /// `/undo` — remove a credit by id
    Undo,
    /// `/stats` — list credits, optionally filtered by user
    Stats,
    /// `/bill` — net all credits into minimal transfers
    Bill,
    /// `/help` — usage help
    Help,
    /// A member joined the group
    UserJoined,
    /// A member left the group
    UserLeft,
    /// Anything else
    Unknown,
}

impl Intent {
    /// Classify a message by command prefix or event marker
    pub fn of(msg: &InboundMessage) -> Intent {
        if msg.has_command(parse::ADD) {
            Intent::AddCredit
        } else if msg.has_command(parse::UNDO) {
            Intent::Undo
        } else if msg.has_command(parse::STATS) {
            Intent::Stats
        } else if msg.has_command(parse::BILL) {
            Intent::Bill
        } else if msg.has_command(parse::HELP) {
            Intent::Help
        } else if msg.new_member.is_some() {
            Intent::UserJoined
        } else if msg.left_member.is_some() {
            Intent::UserLeft
        } else {
            Intent::Unknown
        }
    }
}

/// Routes classified messages to the ledger and netting engine
///
/// Owns the [`LedgerStore`] for the lifetime of the process; all mutations
/// are serialized through the single dispatcher, so the check-then-act
/// operations of the ledger need no further locking.
pub struct Dispatcher {
    ledger: LedgerStore,
    bot: User,
}

impl Dispatcher {
    /// Create a dispatcher over the given ledger
    ///
    /// `bot` is the bot's own user record (resolved at startup); it backs
    /// the guard that refuses credits naming the bot as debtor.
    pub fn new(ledger: LedgerStore, bot: User) -> Self {
        Dispatcher { ledger, bot }
    }

    /// Handle one inbound message and produce the reply text
    ///
    /// Returns `None` when no reply should be sent (a member leaving the
    /// group is acknowledged silently).
    pub fn dispatch(&mut self, msg: &InboundMessage) -> Option<String> {
        match Intent::of(msg) {
            Intent::AddCredit => {
                debug!(message_id = msg.id, "received credit");
                Some(self.handle_add(msg))
            }
            Intent::Undo => {
                debug!(message_id = msg.id, "received undo request");
                Some(self.handle_undo(msg))
            }
            Intent::Stats => {
                debug!(message_id = msg.id, "received stats request");
                Some(self.handle_stats(msg))
            }
            Intent::Bill => {
                debug!(message_id = msg.id, "received bill request");
                Some(self.handle_bill(msg))
            }
            Intent::Help => {
                debug!(message_id = msg.id, "received help request");
                Some(replies::help(&msg.sender.first_name))
            }
            Intent::UserJoined => msg
                .new_member
                .as_ref()
                .map(|member| {
                    debug!(member = %member.first_name, "new user joined group");
                    replies::greeting(&member.first_name)
                }),
            Intent::UserLeft => {
                if let Some(member) = &msg.left_member {
                    debug!(member = %member.first_name, "user left group");
                }
                None
            }
            Intent::Unknown => {
                debug!(message_id = msg.id, "unknown command");
                Some(replies::unknown(&msg.sender.first_name))
            }
        }
    }

    fn handle_add(&mut self, msg: &InboundMessage) -> String {
        let result = parse::parse_add(msg, &self.bot).and_then(|credit| {
            let reply = replies::credit_added(&msg.sender.first_name, &credit);
            self.ledger.add_if_missing(credit)?;
            Ok(reply)
        });

        match result {
            Ok(reply) => reply,
            Err(err) => self.reply_for_error(err, msg),
        }
    }

    fn handle_undo(&mut self, msg: &InboundMessage) -> String {
        let result = parse::parse_undo(msg)
            .and_then(|id| self.ledger.remove_if_owned_by(id, &msg.sender))
            .map(|removed| replies::undo_done(&msg.sender.first_name, &removed));

        match result {
            Ok(reply) => reply,
            Err(err) => self.reply_for_error(err, msg),
        }
    }

    fn handle_stats(&mut self, msg: &InboundMessage) -> String {
        let user = match parse::parse_stats(msg) {
            Ok(user) => user,
            Err(err) => return self.reply_for_error(err, msg),
        };

        let credits = self.ledger.get_all(user.as_ref());
        if credits.is_empty() {
            replies::no_credits_for(user.as_ref())
        } else {
            replies::stats_listing(&credits)
        }
    }

    fn handle_bill(&mut self, msg: &InboundMessage) -> String {
        let credits = self.ledger.get_all(None);
        match netting::net_credits(&credits) {
            Ok(transfers) if transfers.is_empty() => replies::all_settled(),
            Ok(transfers) => replies::bill_listing(&transfers),
            Err(err) => self.reply_for_error(err, msg),
        }
    }

    /// Turn an error into its reply, falling back for internal faults
    fn reply_for_error(&self, err: BotError, msg: &InboundMessage) -> String {
        match replies::for_error(&err, &msg.sender) {
            Some(text) => {
                warn!(message_id = msg.id, %err, "request rejected");
                text
            }
            None => {
                error!(message_id = msg.id, %err, "internal error while handling request");
                replies::unknown(&msg.sender.first_name)
            }
        }
    }
}
