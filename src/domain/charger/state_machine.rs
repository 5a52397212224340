//! Charger control state machine
//!
//! The single authority on which control actions are legal for a given
//! charger status, and which status results once the device accepts the
//! action. Everything here is pure and total over status × action.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::ChargerStatus;

/// Remote control action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargerAction {
    TurnOn,
    TurnOff,
}

impl ChargerAction {
    pub const ALL: [ChargerAction; 2] = [Self::TurnOn, Self::TurnOff];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TurnOn => "TURN_ON",
            Self::TurnOff => "TURN_OFF",
        }
    }
}

impl fmt::Display for ChargerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargerAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid charger action: {}", s))
    }
}

/// Actions permitted while a charger is in `status`.
pub fn permitted_actions(status: ChargerStatus) -> &'static [ChargerAction] {
    use ChargerAction::*;
    match status {
        ChargerStatus::Available => &[TurnOn, TurnOff],
        ChargerStatus::Charging => &[TurnOff],
        ChargerStatus::Blocked => &[TurnOff],
        ChargerStatus::Reserved => &[TurnOn],
        ChargerStatus::Inoperative => &[],
        ChargerStatus::Removed => &[],
        ChargerStatus::Unknown => &[TurnOn, TurnOff],
    }
}

pub fn is_action_allowed(status: ChargerStatus, action: ChargerAction) -> bool {
    permitted_actions(status).contains(&action)
}

/// Status the charger is in after the device has accepted `action`.
pub fn resulting_status(action: ChargerAction) -> ChargerStatus {
    match action {
        ChargerAction::TurnOn => ChargerStatus::Charging,
        ChargerAction::TurnOff => ChargerStatus::Available,
    }
}

/// Outcome of consulting the state machine.
///
/// `next_status` is set only when the action is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDecision {
    pub allowed: bool,
    pub next_status: Option<ChargerStatus>,
}

impl TransitionDecision {
    pub fn decide(status: ChargerStatus, action: ChargerAction) -> Self {
        if is_action_allowed(status, action) {
            Self {
                allowed: true,
                next_status: Some(resulting_status(action)),
            }
        } else {
            Self {
                allowed: false,
                next_status: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ChargerAction::*;
    use ChargerStatus::*;

    #[test]
    fn allow_table_matches_contract() {
        let expected: [(ChargerStatus, &[ChargerAction]); 7] = [
            (Available, &[TurnOn, TurnOff]),
            (Charging, &[TurnOff]),
            (Blocked, &[TurnOff]),
            (Reserved, &[TurnOn]),
            (Inoperative, &[]),
            (Removed, &[]),
            (Unknown, &[TurnOn, TurnOff]),
        ];

        for (status, allowed) in expected {
            for action in ChargerAction::ALL {
                assert_eq!(
                    is_action_allowed(status, action),
                    allowed.contains(&action),
                    "{} + {}",
                    status,
                    action
                );
            }
        }
    }

    #[test]
    fn decision_is_total_and_only_carries_status_when_allowed() {
        for status in ChargerStatus::ALL {
            for action in ChargerAction::ALL {
                let decision = TransitionDecision::decide(status, action);
                assert_eq!(decision.allowed, decision.next_status.is_some());
            }
        }
    }

    #[test]
    fn turn_on_charges_and_turn_off_frees() {
        assert_eq!(
            TransitionDecision::decide(Available, TurnOn).next_status,
            Some(Charging)
        );
        assert_eq!(
            TransitionDecision::decide(Charging, TurnOff).next_status,
            Some(Available)
        );
        assert_eq!(
            TransitionDecision::decide(Reserved, TurnOn).next_status,
            Some(Charging)
        );
    }

    #[test]
    fn terminal_statuses_reject_everything() {
        for action in ChargerAction::ALL {
            assert!(!TransitionDecision::decide(Inoperative, action).allowed);
            assert!(!TransitionDecision::decide(Removed, action).allowed);
        }
    }

    #[test]
    fn action_parses_wire_names() {
        assert_eq!("TURN_ON".parse::<ChargerAction>(), Ok(TurnOn));
        assert_eq!("turn_off".parse::<ChargerAction>(), Ok(TurnOff));
        assert!("REBOOT".parse::<ChargerAction>().is_err());
        assert_eq!(serde_json::to_string(&TurnOff).unwrap(), "\"TURN_OFF\"");
    }
}
