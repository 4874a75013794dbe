//! Account status state machine.
//!
//! The whole transition matrix lives in [`transition`]: one `match` over
//! `(status, command)`. Anything not listed there is rejected.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use acctlog_core::{DomainError, DomainResult};

use crate::event::AccountEventType;

/// Account status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "ACCOUNT_PENDING")]
    Pending,
    #[serde(rename = "ACCOUNT_CONFIRMED")]
    Confirmed,
    #[serde(rename = "ACCOUNT_ACTIVE")]
    Active,
    #[serde(rename = "ACCOUNT_SUSPENDED")]
    Suspended,
    #[serde(rename = "ACCOUNT_ARCHIVED")]
    Archived,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 5] = [
        AccountStatus::Pending,
        AccountStatus::Confirmed,
        AccountStatus::Active,
        AccountStatus::Suspended,
        AccountStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "ACCOUNT_PENDING",
            AccountStatus::Confirmed => "ACCOUNT_CONFIRMED",
            AccountStatus::Active => "ACCOUNT_ACTIVE",
            AccountStatus::Suspended => "ACCOUNT_SUSPENDED",
            AccountStatus::Archived => "ACCOUNT_ARCHIVED",
        }
    }
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        let token = token.strip_prefix("ACCOUNT_").unwrap_or(&token);
        match token {
            "PENDING" => Ok(AccountStatus::Pending),
            "CONFIRMED" => Ok(AccountStatus::Confirmed),
            "ACTIVE" => Ok(AccountStatus::Active),
            "SUSPENDED" => Ok(AccountStatus::Suspended),
            "ARCHIVED" => Ok(AccountStatus::Archived),
            _ => Err(DomainError::validation(format!("unknown account status '{}'", s.trim()))),
        }
    }
}

/// Commands that drive an account through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountCommand {
    #[serde(rename = "CONFIRM_ACCOUNT")]
    Confirm,
    #[serde(rename = "ACTIVATE_ACCOUNT")]
    Activate,
    #[serde(rename = "SUSPEND_ACCOUNT")]
    Suspend,
    #[serde(rename = "ARCHIVE_ACCOUNT")]
    Archive,
}

impl AccountCommand {
    pub const ALL: [AccountCommand; 4] = [
        AccountCommand::Confirm,
        AccountCommand::Activate,
        AccountCommand::Suspend,
        AccountCommand::Archive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountCommand::Confirm => "CONFIRM_ACCOUNT",
            AccountCommand::Activate => "ACTIVATE_ACCOUNT",
            AccountCommand::Suspend => "SUSPEND_ACCOUNT",
            AccountCommand::Archive => "ARCHIVE_ACCOUNT",
        }
    }
}

impl core::fmt::Display for AccountCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses command tokens (`CONFIRM_ACCOUNT` or the short `confirm`).
///
/// Unknown tokens fail with [`DomainError::InvalidCommand`].
impl FromStr for AccountCommand {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        let token = token.strip_suffix("_ACCOUNT").unwrap_or(&token);
        match token {
            "CONFIRM" => Ok(AccountCommand::Confirm),
            "ACTIVATE" => Ok(AccountCommand::Activate),
            "SUSPEND" => Ok(AccountCommand::Suspend),
            "ARCHIVE" => Ok(AccountCommand::Archive),
            _ => Err(DomainError::invalid_command(s.trim())),
        }
    }
}

/// An accepted edge of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: AccountStatus,
    pub to: AccountStatus,
    pub event_type: AccountEventType,
}

/// Evaluate `command` against the account's current `status`.
///
/// Pure and total: every `(status, command)` pair either yields the target
/// status plus the event to record, or [`DomainError::InvalidTransition`].
pub fn transition(status: AccountStatus, command: AccountCommand) -> DomainResult<Transition> {
    use AccountCommand as C;
    use AccountStatus as S;

    let (to, event_type) = match (status, command) {
        (S::Pending, C::Confirm) => (S::Confirmed, AccountEventType::AccountConfirmed),
        (S::Confirmed | S::Suspended | S::Archived, C::Activate) => {
            (S::Active, AccountEventType::AccountActivated)
        }
        (S::Active, C::Suspend) => (S::Suspended, AccountEventType::AccountSuspended),
        (S::Active, C::Archive) => (S::Archived, AccountEventType::AccountArchived),
        (status, command) => return Err(DomainError::invalid_transition(status, command)),
    };

    Ok(Transition {
        from: status,
        to,
        event_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn expected(status: AccountStatus, command: AccountCommand) -> Option<AccountStatus> {
        use AccountCommand as C;
        use AccountStatus as S;
        match command {
            C::Confirm if status == S::Pending => Some(S::Confirmed),
            C::Activate
                if status != S::Active
                    && [S::Confirmed, S::Suspended, S::Archived].contains(&status) =>
            {
                Some(S::Active)
            }
            C::Suspend if status == S::Active => Some(S::Suspended),
            C::Archive if status == S::Active => Some(S::Archived),
            _ => None,
        }
    }

    #[test]
    fn confirm_moves_pending_to_confirmed() {
        let t = transition(AccountStatus::Pending, AccountCommand::Confirm).unwrap();
        assert_eq!(t.to, AccountStatus::Confirmed);
        assert_eq!(t.event_type, AccountEventType::AccountConfirmed);
    }

    #[test]
    fn activate_is_rejected_when_already_active() {
        let err = transition(AccountStatus::Active, AccountCommand::Activate).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                status: "ACCOUNT_ACTIVE".to_string(),
                command: "ACTIVATE_ACCOUNT".to_string(),
            }
        );
    }

    #[test]
    fn pending_account_cannot_be_activated() {
        assert!(transition(AccountStatus::Pending, AccountCommand::Activate).is_err());
    }

    #[test]
    fn command_tokens_parse_long_and_short_forms() {
        assert_eq!("CONFIRM_ACCOUNT".parse::<AccountCommand>().unwrap(), AccountCommand::Confirm);
        assert_eq!("suspend".parse::<AccountCommand>().unwrap(), AccountCommand::Suspend);
        assert_eq!(" archive_account ".parse::<AccountCommand>().unwrap(), AccountCommand::Archive);
    }

    #[test]
    fn unknown_command_token_is_invalid_command() {
        let err = "CLOSE_ACCOUNT".parse::<AccountCommand>().unwrap_err();
        assert_eq!(err, DomainError::InvalidCommand("CLOSE_ACCOUNT".to_string()));
    }

    #[test]
    fn status_serializes_with_account_prefix() {
        let json = serde_json::to_string(&AccountStatus::Suspended).unwrap();
        assert_eq!(json, "\"ACCOUNT_SUSPENDED\"");
        assert_eq!("active".parse::<AccountStatus>().unwrap(), AccountStatus::Active);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: the transition function agrees with the lifecycle table for
        /// every (status, command) pair and never leaves the five-state domain.
        #[test]
        fn transition_matches_table(
            status in proptest::sample::select(AccountStatus::ALL.to_vec()),
            command in proptest::sample::select(AccountCommand::ALL.to_vec()),
        ) {
            match (transition(status, command), expected(status, command)) {
                (Ok(t), Some(to)) => {
                    prop_assert_eq!(t.from, status);
                    prop_assert_eq!(t.to, to);
                    prop_assert!(AccountStatus::ALL.contains(&t.to));
                }
                (Err(DomainError::InvalidTransition { status: s, command: c }), None) => {
                    prop_assert_eq!(s, status.to_string());
                    prop_assert_eq!(c, command.to_string());
                }
                (got, want) => prop_assert!(false, "got {:?}, want {:?}", got, want),
            }
        }

        /// Property: any accepted sequence of commands only ever visits states
        /// reachable through the table, one event per accepted command.
        #[test]
        fn command_sequences_emit_one_event_per_accepted_command(
            commands in prop::collection::vec(proptest::sample::select(AccountCommand::ALL.to_vec()), 0..32)
        ) {
            let mut status = AccountStatus::Pending;
            let mut events = Vec::new();
            let mut accepted = 0usize;

            for command in commands {
                if let Ok(t) = transition(status, command) {
                    status = t.to;
                    events.push(t.event_type);
                    accepted += 1;
                }
            }

            prop_assert_eq!(events.len(), accepted);
            if accepted == 0 {
                prop_assert_eq!(status, AccountStatus::Pending);
            } else {
                prop_assert_ne!(status, AccountStatus::Pending);
            }
        }
    }
}
