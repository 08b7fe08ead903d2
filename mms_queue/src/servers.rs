use crate::ServerState;

/// Occupancy flags for a fixed number of servers
#[derive(Debug, Clone, PartialEq)]
pub struct ServerBank {
    states: Vec<ServerState>,
}

impl ServerBank {
    pub fn new(server_count: usize) -> ServerBank {
        ServerBank {
            states: vec![ServerState::Idle; server_count],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn is_idle(&self, server: usize) -> bool {
        self.states[server].is_idle()
    }

    /// Lowest-indexed idle server
    pub fn first_idle(&self) -> Option<usize> {
        self.states.iter().position(ServerState::is_idle)
    }

    pub fn occupy(&mut self, server: usize) {
        self.states[server] = ServerState::Busy;
    }

    pub fn release(&mut self, server: usize) {
        self.states[server] = ServerState::Idle;
    }

    pub fn busy_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_busy()).count()
    }

    pub fn states(&self) -> &[ServerState] {
        &self.states
    }
}
