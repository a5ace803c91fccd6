use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Sentinel frame the server sends while no poll is running.
pub const INACTIVE_SENTINEL: &str = "inactive";
/// Sentinel frame the server sends when it failed to produce an update.
pub const UPDATE_ERR_SENTINEL: &str = "uperr";
/// Periodic poll/keep-alive token.
pub const POLL_FRAME: &str = "u";
/// Prefix byte for outbound vote frames.
pub const VOTE_PREFIX: char = 'v';
/// Condition string the server uses for fainted combatants.
pub const FAINTED_CONDITION: &str = "0 fnt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Move,
    Switch,
}

/// A player's chosen action, relayed to the poll server on click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "type")]
    pub kind: VoteKind,
    pub idx: usize,
    pub tera: bool,
}

/// Outbound message envelope. The server still speaks the original
/// single-character framing, so all prefix handling lives in [`encode`].
///
/// [`encode`]: ClientMessage::encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Poll,
    Vote(Vote),
}

impl ClientMessage {
    pub fn vote(kind: VoteKind, idx: usize) -> Self {
        // The tera flag exists on the wire but no client surface ever
        // toggles it; it is always sent as false.
        Self::Vote(Vote {
            kind,
            idx,
            tera: false,
        })
    }

    /// Encodes the message into the text frame the server expects:
    /// `u` for a poll token, `v{json}` for a vote.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        match self {
            Self::Poll => Ok(POLL_FRAME.to_string()),
            Self::Vote(vote) => {
                let body = serde_json::to_string(vote).map_err(ProtocolError::Encode)?;
                Ok(format!("{VOTE_PREFIX}{body}"))
            }
        }
    }
}

/// One move slot of the active combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOption {
    #[serde(rename = "move")]
    pub name: String,
    #[serde(default)]
    pub id: String,
    pub pp: u8,
    #[serde(rename = "maxpp")]
    pub max_pp: u8,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCombatant {
    pub moves: Vec<MoveOption>,
    #[serde(rename = "canTerastallize", default)]
    pub can_terastallize: Option<String>,
}

/// One owned party member, switchable unless active or fainted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideCombatant {
    #[serde(default)]
    pub ident: String,
    pub details: String,
    pub condition: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub ability: String,
    #[serde(rename = "teraType", default)]
    pub tera_type: String,
}

impl SideCombatant {
    pub fn is_fainted(&self) -> bool {
        self.condition == FAINTED_CONDITION
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    pub pokemon: Vec<SideCombatant>,
}

/// A full battle-state update pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    #[serde(rename = "forceSwitch", default)]
    pub force_switch: Vec<bool>,
    #[serde(default)]
    pub active: Vec<ActiveCombatant>,
    pub side: SideInfo,
    #[serde(default)]
    pub rqid: Option<u8>,
}

impl BattleSnapshot {
    /// The player must pick a replacement this turn; only the first slot
    /// matters and only an exact `true` counts.
    pub fn forced_switch(&self) -> bool {
        self.force_switch.first().copied().unwrap_or(false)
    }
}

/// Inbound frame, discriminated by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerUpdate {
    /// No poll is running; show the wait text.
    Inactive,
    /// The server failed to fetch an update.
    UpdateError,
    /// Battle log lines; the raw frame text is kept verbatim for display.
    Log(String),
    /// The server is waiting on the opponent; leave the UI untouched.
    Wait,
    Snapshot(BattleSnapshot),
}

impl ServerUpdate {
    /// Parses a text frame. Cases are matched in priority order: the two
    /// sentinel strings, then a JSON array, then an object with a truthy
    /// `wait` field, then a full snapshot.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        match frame {
            INACTIVE_SENTINEL => return Ok(Self::Inactive),
            UPDATE_ERR_SENTINEL => return Ok(Self::UpdateError),
            _ => {}
        }
        let value: Value = serde_json::from_str(frame).map_err(ProtocolError::MalformedFrame)?;
        if value.is_array() {
            return Ok(Self::Log(frame.to_string()));
        }
        if value.get("wait").is_some_and(is_truthy) {
            return Ok(Self::Wait);
        }
        let snapshot =
            serde_json::from_value(value).map_err(ProtocolError::UnrecognizedSnapshot)?;
        Ok(Self::Snapshot(snapshot))
    }
}

// The original client checked `recv.wait` with JS truthiness.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
