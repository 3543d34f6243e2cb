//! Binding and session state of a [`Dispatcher`](super::Dispatcher), kept
//! apart from any I/O so each transition can be checked on its own.

use crate::server::ServerName;

/// Server a dispatcher talks to, with its live connection handle `C`.
pub enum Binding<C> {
    Unbound,
    Bound { server: ServerName, connection: C },
}

/// Server-assigned session carried on every request once known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    None,
    Active(String),
}

pub struct DispatchState<C> {
    binding: Binding<C>,
    session: Session,
}

impl<C> DispatchState<C> {
    pub fn new(session_id: Option<String>) -> Self {
        Self {
            binding: Binding::Unbound,
            session: session_from(session_id.as_deref()),
        }
    }

    /// Whether `bind(force_rebind)` has to pick a server.
    pub fn needs_binding(&self, force_rebind: bool) -> bool {
        force_rebind || matches!(self.binding, Binding::Unbound)
    }

    /// Replace the binding. The previous handle is dropped.
    pub fn bound(&mut self, server: ServerName, connection: C) {
        self.binding = Binding::Bound { server, connection };
    }

    pub fn server(&self) -> Option<&ServerName> {
        match &self.binding {
            Binding::Bound { server, .. } => Some(server),
            Binding::Unbound => None,
        }
    }

    pub fn connection(&self) -> Option<&C> {
        match &self.binding {
            Binding::Bound { connection, .. } => Some(connection),
            Binding::Unbound => None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match &self.session {
            Session::Active(id) => Some(id),
            Session::None => None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Adopt the session id from a response. The server's value always wins,
    /// including an empty one.
    pub fn observe_response(&mut self, session_id: Option<&str>) {
        self.session = session_from(session_id);
    }

    /// Forget the session after it has been closed on the server.
    pub fn end_session(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.session, Session::None) {
            Session::Active(id) => Some(id),
            Session::None => None,
        }
    }
}

fn session_from(id: Option<&str>) -> Session {
    match id {
        Some(id) if !id.is_empty() => Session::Active(id.to_string()),
        _ => Session::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unbound_without_session() {
        let state = DispatchState::<&str>::new(None);
        assert!(state.needs_binding(false));
        assert!(state.server().is_none());
        assert_eq!(state.session(), &Session::None);
    }

    #[test]
    fn binding_is_reused_unless_forced() {
        let mut state = DispatchState::new(None);
        state.bound(ServerName::new("a", 1), "conn-a");
        assert!(!state.needs_binding(false));
        assert!(state.needs_binding(true));

        state.bound(ServerName::new("b", 2), "conn-b");
        assert_eq!(state.server(), Some(&ServerName::new("b", 2)));
        assert_eq!(state.connection(), Some(&"conn-b"));
    }

    #[test]
    fn session_is_last_write_wins() {
        let mut state = DispatchState::<()>::new(Some("S0".to_string()));
        state.observe_response(Some("S1"));
        assert_eq!(state.session_id(), Some("S1"));
        state.observe_response(Some("S2"));
        assert_eq!(state.session_id(), Some("S2"));
        state.observe_response(Some(""));
        assert_eq!(state.session_id(), None);
    }

    #[test]
    fn end_session_is_idempotent() {
        let mut state = DispatchState::<()>::new(Some("S1".to_string()));
        assert_eq!(state.end_session().as_deref(), Some("S1"));
        assert_eq!(state.end_session(), None);
    }
}
