//! Reply texts
//!
//! Every string the bot sends into the chat is produced here, keeping tone
//! and formatting in one place. Listing formats:
//!
//! - stats: one credit per line, `donor -> debtor amount "description" (#id)`
//! - bill: one transfer per block, `payer -> payee amount`

use crate::types::{BotError, Credit, Transfer, User};

/// Usage help, sent for `/help`
pub fn help(name: &str) -> String {
    format!(
        "Hi {}!\nYou can send me credits via the \"/add\" command. \
         The format is /add <debtor> <amount> <description>.",
        name
    )
}

/// Greeting for a member who just joined the group
pub fn greeting(name: &str) -> String {
    format!("Hi {}!\nTry /help for more infos.", name)
}

/// Fallback for anything the bot did not understand
pub fn unknown(name: &str) -> String {
    format!(
        "Sorry {}, I didn't understand your request. Try /help for more infos.",
        name
    )
}

/// Confirmation after a credit was registered, with the undo hint
pub fn credit_added(name: &str, credit: &Credit) -> String {
    format!(
        "Alright {}! I noted down that you have lent {:.2} Euros to {} for {}.\n\
         If you want to undo this credit just tell me \"/undo {}\".",
        name, credit.amount, credit.debtor.first_name, credit.description, credit.id
    )
}

/// Confirmation after a credit was undone
pub fn undo_done(name: &str, credit: &Credit) -> String {
    format!(
        "Alright {}! I crossed out the line indicating that you have lent {:.2} Euros to {}.",
        name, credit.amount, credit.debtor.first_name
    )
}

/// Listing of credits for a stats request
pub fn stats_listing(credits: &[Credit]) -> String {
    let lines: Vec<String> = credits
        .iter()
        .map(|credit| {
            format!(
                "{} -> {} {:.2} \"{}\" (#{})",
                credit.donor.first_name,
                credit.debtor.first_name,
                credit.amount,
                credit.description,
                credit.id
            )
        })
        .collect();
    lines.join("\n")
}

/// Listing of netted transfers for a bill request
pub fn bill_listing(transfers: &[Transfer]) -> String {
    let blocks: Vec<String> = transfers
        .iter()
        .map(|transfer| {
            format!(
                "{} -> {} {:.2}",
                transfer.from.first_name, transfer.to.first_name, transfer.amount
            )
        })
        .collect();
    blocks.join("\n\n")
}

/// Answer for a stats request that matched no credits
pub fn no_credits_for(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            "I don't have any credits that involve {}.",
            user.first_name
        ),
        None => "I don't have any credits on record yet.".to_string(),
    }
}

/// Answer for a bill request when everything nets to zero
pub fn all_settled() -> String {
    "Everybody is settled up, nothing to transfer.".to_string()
}

/// Farewell sent to the group chat on shutdown
pub fn farewell() -> String {
    "Good night folks! I'm going to bed, see you tomorrow!".to_string()
}

/// User-facing reply for a recoverable error
///
/// Returns `None` for internal errors (store, transport, netting invariant,
/// configuration); those are logged and answered with [`unknown`] instead of
/// leaking details into the chat.
pub fn for_error(error: &BotError, requester: &User) -> Option<String> {
    let name = &requester.first_name;
    let text = match error {
        BotError::NoUserMentioned => format!(
            "{}, you didn't mention a user whom you credited. Use @<user> to mention a user.",
            name
        ),
        BotError::InvalidCreditFormat { .. } => format!(
            "{}, the format you used is incorrect. \
             Please use the following format: /add <debtor> <amount> <description>.",
            name
        ),
        BotError::InvalidUndoFormat { .. } => format!(
            "{}, the format you used is incorrect. \
             Please use the following format: /undo <credit id>.",
            name
        ),
        BotError::InvalidStatsFormat { .. } => format!(
            "{}, the format you used is incorrect. \
             Please use the following format: /stats <user>.",
            name
        ),
        BotError::CannotCreditBot => format!(
            "Sorry {},\nyou cannot lend me money. I don't need any :)",
            name
        ),
        BotError::CannotCreditSelf => {
            format!("Sorry {},\nyou cannot lend money to yourself.", name)
        }
        BotError::CreditNotFound { .. } => {
            format!("Sorry {},\nbut this credit doesn't exist.", name)
        }
        BotError::NotCreditOwner { owner, .. } => format!(
            "Sorry {},\nbut this credit doesn't belong to you. Ask {} to undo it for you.",
            name, owner
        ),
        BotError::PairMismatch
        | BotError::Store { .. }
        | BotError::Transport { .. }
        | BotError::Config { .. } => return None,
    };
    Some(text)
}
