//! Line-oriented command shell over an `AccountService`.
//!
//! One command per line, one JSON document per reply:
//!
//! ```text
//! create <user-id|new> <account-number> [--default]
//! get <account-id>
//! update <account-id> <user-id> <account-number> <true|false> <status>
//! delete <account-id>
//! apply <account-id> <command>
//! append <account-id> <event-type>
//! events <account-id>
//! help [verb]
//! quit
//! ```

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use serde_json::{json, Value as JsonValue};

use acctlog_accounts::{AccountEvent, AccountEventType, AccountNumber, AccountPatch, AccountStatus, NewAccount};
use acctlog_core::{AccountId, DomainError, UserId};
use acctlog_infra::{AccountCache, AccountService, ServiceError, UnitOfWork};

/// One shell line.
#[derive(Debug, Parser)]
#[command(name = "acctlog", no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Open an account in ACCOUNT_PENDING status
    Create {
        /// Owning user id, or `new` for a fresh one
        user: String,
        account_number: String,
        /// Mark the account as the user's default
        #[arg(long)]
        default: bool,
    },
    /// Fetch an account
    Get { account_id: String },
    /// Overwrite an account's fields, status included (no event recorded)
    Update {
        account_id: String,
        user_id: String,
        account_number: String,
        #[arg(action = ArgAction::Set)]
        default_account: bool,
        status: String,
    },
    /// Remove an account record
    Delete { account_id: String },
    /// Run a lifecycle command (CONFIRM_ACCOUNT, activate, ...)
    Apply { account_id: String, command: String },
    /// Append a custom event to an account's log
    Append { account_id: String, event_type: String },
    /// List an account's events in sequence order
    Events { account_id: String },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

pub struct Shell<S, C> {
    service: AccountService<S, C>,
}

/// What the caller should do after a line has been handled.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Output(JsonValue),
    Quit,
}

impl<S, C> Shell<S, C>
where
    S: UnitOfWork,
    C: AccountCache,
{
    pub fn new(service: AccountService<S, C>) -> Self {
        Self { service }
    }

    /// Handle one input line. Blank lines and `#` comments yield `None`.
    pub fn handle(&self, line: &str) -> Option<Reply> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.first()?.starts_with('#') {
            return None;
        }

        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                return Some(Reply::Output(json!({ "help": err.render().to_string() })));
            }
            Err(err) => return Some(Reply::Output(error_json(&err.into()))),
        };

        if let ShellCommand::Quit = command {
            return Some(Reply::Quit);
        }

        let reply = self.execute(command).unwrap_or_else(|err| error_json(&err));
        Some(Reply::Output(reply))
    }

    fn execute(&self, command: ShellCommand) -> anyhow::Result<JsonValue> {
        match command {
            ShellCommand::Create {
                user,
                account_number,
                default,
            } => {
                let user_id = if user.eq_ignore_ascii_case("new") {
                    UserId::new()
                } else {
                    user.parse()?
                };
                let account = self.service.create_account(NewAccount {
                    user_id,
                    account_number: AccountNumber::new(account_number)?,
                    default_account: default,
                })?;
                Ok(serde_json::to_value(account)?)
            }
            ShellCommand::Get { account_id } => {
                let account = self.service.get_account(account_id.parse()?)?;
                Ok(serde_json::to_value(account)?)
            }
            ShellCommand::Update {
                account_id,
                user_id,
                account_number,
                default_account,
                status,
            } => {
                let patch = AccountPatch {
                    account_id: None,
                    user_id: user_id.parse()?,
                    account_number: AccountNumber::new(account_number)?,
                    default_account,
                    status: status.parse::<AccountStatus>()?,
                };
                let account = self.service.update_account(account_id.parse()?, patch)?;
                Ok(serde_json::to_value(account)?)
            }
            ShellCommand::Delete { account_id } => {
                let account_id: AccountId = account_id.parse()?;
                self.service.delete_account(account_id)?;
                Ok(json!({ "deleted": account_id }))
            }
            ShellCommand::Apply {
                account_id,
                command,
            } => {
                let account = self
                    .service
                    .apply_command_token(account_id.parse()?, &command)?;
                Ok(serde_json::to_value(account)?)
            }
            ShellCommand::Append {
                account_id,
                event_type,
            } => {
                let event = AccountEvent::new(AccountEventType::custom(event_type)?);
                let record = self.service.append_event(account_id.parse()?, event)?;
                Ok(serde_json::to_value(record)?)
            }
            ShellCommand::Events { account_id } => {
                let records = self.service.account_events(account_id.parse()?)?;
                Ok(serde_json::to_value(records)?)
            }
            ShellCommand::Quit => Ok(JsonValue::Null),
        }
    }
}

fn error_json(err: &anyhow::Error) -> JsonValue {
    let domain = err
        .downcast_ref::<ServiceError>()
        .and_then(ServiceError::as_domain)
        .or_else(|| err.downcast_ref::<DomainError>());

    let code = match domain {
        Some(DomainError::DuplicateKey(_)) => "duplicate_key",
        Some(DomainError::NotFound) => "not_found",
        Some(DomainError::Conflict(_)) => "conflict",
        Some(DomainError::InvalidTransition { .. }) => "invalid_transition",
        Some(DomainError::InvalidCommand(_)) => "invalid_command",
        Some(DomainError::Validation(_)) => "validation_error",
        None if err.downcast_ref::<ServiceError>().is_some() => "store_error",
        None => "usage_error",
    };

    json!({ "error": code, "message": format!("{err:#}") })
}

#[cfg(test)]
mod tests {
    use super::*;
    use acctlog_infra::{InMemoryStore, NoCache};

    fn shell() -> Shell<InMemoryStore, NoCache> {
        Shell::new(AccountService::new(InMemoryStore::new(), NoCache))
    }

    fn output(reply: Option<Reply>) -> JsonValue {
        match reply {
            Some(Reply::Output(v)) => v,
            other => panic!("expected output, got {other:?}"),
        }
    }

    #[test]
    fn create_then_apply_reports_new_status() {
        let sh = shell();
        let created = output(sh.handle("create new N-1 --default"));
        assert_eq!(created["status"], "ACCOUNT_PENDING");
        assert_eq!(created["default_account"], true);

        let id = created["account_id"].as_str().unwrap().to_string();
        let confirmed = output(sh.handle(&format!("apply {id} confirm")));
        assert_eq!(confirmed["status"], "ACCOUNT_CONFIRMED");

        let events = output(sh.handle(&format!("events {id}")));
        assert_eq!(events.as_array().unwrap().len(), 2);
    }

    #[test]
    fn update_parses_flag_and_status_arguments() {
        let sh = shell();
        let created = output(sh.handle("create new N-1"));
        assert_eq!(created["default_account"], false);
        let id = created["account_id"].as_str().unwrap();
        let user = created["user_id"].as_str().unwrap();

        let updated = output(sh.handle(&format!("update {id} {user} N-2 true suspended")));
        assert_eq!(updated["status"], "ACCOUNT_SUSPENDED");
        assert_eq!(updated["default_account"], true);
        assert_eq!(updated["account_number"], "N-2");
    }

    #[test]
    fn domain_failures_are_reported_with_a_code() {
        let sh = shell();
        let created = output(sh.handle("create new N-1"));
        let id = created["account_id"].as_str().unwrap().to_string();

        let err = output(sh.handle(&format!("apply {id} suspend")));
        assert_eq!(err["error"], "invalid_transition");

        let err = output(sh.handle(&format!("apply {id} close")));
        assert_eq!(err["error"], "invalid_command");

        let err = output(sh.handle(&format!("append {id} ACCOUNT_ACTIVATED")));
        assert_eq!(err["error"], "validation_error");

        let err = output(sh.handle("create new N-1"));
        assert_eq!(err["error"], "duplicate_key");

        let err = output(sh.handle(&format!("get {}", AccountId::new())));
        assert_eq!(err["error"], "not_found");
    }

    #[test]
    fn usage_errors_come_from_the_argument_parser() {
        let sh = shell();
        assert_eq!(output(sh.handle("get"))["error"], "usage_error");
        assert_eq!(output(sh.handle("frobnicate 1"))["error"], "usage_error");
        assert_eq!(output(sh.handle("update x y z maybe active"))["error"], "usage_error");
        assert_eq!(output(sh.handle("get nope"))["error"], "validation_error");
    }

    #[test]
    fn help_and_control_lines() {
        let sh = shell();
        let help = output(sh.handle("help"));
        let text = help["help"].as_str().unwrap();
        assert!(text.contains("create"));
        assert!(text.contains("events"));

        assert_eq!(sh.handle("   "), None);
        assert_eq!(sh.handle("# comment"), None);
        assert_eq!(sh.handle("quit"), Some(Reply::Quit));
        assert_eq!(sh.handle("exit"), Some(Reply::Quit));
    }
}
