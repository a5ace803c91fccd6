//! Framework-independent render model. Both the CLI and the GUI rebuild
//! their option lists from a [`BattleBoard`] after every applicable update.

use shared::protocol::{BattleSnapshot, MoveOption, ServerUpdate, SideCombatant};

/// Shown while no poll is running.
pub const WAIT_TEXT: &str = "Please wait...";
/// Shown when the server signals it failed to fetch an update.
pub const UPDATE_ERR_TEXT: &str = "Error getting update from server.";

#[derive(Debug, Clone, PartialEq)]
pub struct MoveChoice {
    pub idx: usize,
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchChoice {
    pub idx: usize,
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleBoard {
    pub moves: Vec<MoveChoice>,
    pub switches: Vec<SwitchChoice>,
    pub message: String,
}

pub fn move_label(option: &MoveOption) -> String {
    format!("{}\n{}/{}", option.name, option.pp, option.max_pp)
}

pub fn switch_label(member: &SideCombatant) -> String {
    format!("{} {}", member.details, member.condition)
}

impl BattleBoard {
    /// Applies one inbound update. Regions are torn down and rebuilt rather
    /// than patched; a `Wait` update leaves everything untouched.
    pub fn apply(&mut self, update: &ServerUpdate) {
        match update {
            ServerUpdate::Inactive => {
                self.clear();
                self.message = WAIT_TEXT.to_string();
            }
            ServerUpdate::UpdateError => {
                self.message = UPDATE_ERR_TEXT.to_string();
            }
            ServerUpdate::Log(raw) => {
                self.message = raw.clone();
            }
            ServerUpdate::Wait => {}
            ServerUpdate::Snapshot(snapshot) => {
                self.clear();
                self.rebuild(snapshot);
            }
        }
    }

    fn rebuild(&mut self, snapshot: &BattleSnapshot) {
        // A forced switch means there is no move choice this turn.
        if !snapshot.forced_switch() {
            if let Some(active) = snapshot.active.first() {
                self.moves = active
                    .moves
                    .iter()
                    .enumerate()
                    .map(|(idx, option)| MoveChoice {
                        idx,
                        label: move_label(option),
                        disabled: option.disabled,
                    })
                    .collect();
            }
        }
        self.switches = snapshot
            .side
            .pokemon
            .iter()
            .enumerate()
            .map(|(idx, member)| SwitchChoice {
                idx,
                label: switch_label(member),
                disabled: member.active || member.is_fainted(),
            })
            .collect();
    }

    fn clear(&mut self) {
        self.moves.clear();
        self.switches.clear();
        self.message.clear();
    }
}
