//! Events flowing from the backend worker into the UI.

use client_core::SessionEvent;

pub enum UiEvent {
    Session(SessionEvent),
    VoteFailed(String),
    BackendFailed(String),
}
