//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use vetdesk::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) sequence_clock_fallback: bool,
}

impl ServerConfig {
    /// Construct a server configuration.
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            sequence_clock_fallback: false,
        }
    }

    /// Enable the allocator's degraded clock fallback (off by default).
    ///
    /// When enabled, record-number allocation keeps working through storage
    /// read failures by deriving a value from the wall clock, at the cost
    /// of the uniqueness guarantee. Every firing is logged.
    pub fn with_sequence_clock_fallback(mut self, enabled: bool) -> Self {
        self.sequence_clock_fallback = enabled;
        self
    }
}
