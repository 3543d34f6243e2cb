use fsql_client::ServerName;

/// Placement strategy the master consults when choosing a server.
pub trait LoadBalancer: Send + Sync {
    /// Identifier the strategy is registered under.
    fn name(&self) -> &'static str;

    fn pick_server(&self, servers: &[ServerName]) -> Option<ServerName>;

    // Optional debug info to be logged per decision
    fn debug_snapshot(&self) -> Option<String> {
        None
    }
}
