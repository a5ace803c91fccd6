//! Commands queued from UI clicks to the backend worker.

use crossbeam_channel::{Sender, TrySendError};
use shared::protocol::VoteKind;

pub enum BackendCommand {
    CastVote { kind: VoteKind, idx: usize },
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::CastVote {
            kind: VoteKind::Move,
            ..
        } => "cast_move_vote",
        BackendCommand::CastVote {
            kind: VoteKind::Switch,
            ..
        } => "cast_switch_vote",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected; restart the app".to_string();
        }
    }
}
