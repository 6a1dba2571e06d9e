//! Session transport: dialing a target with the resolved methods
//!
//! A dial that fails only because the server refused every method gets one
//! more attempt with a password typed at the terminal, unless a password was
//! already among the refused methods.

mod ciphers;
mod client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::cipher::Name;
use sshw_core::Target;

use crate::auth::{AuthMethod, Prompter};
use crate::error::DialError;
use crate::pty::KEEPALIVE_INTERVAL;

pub use ciphers::{client_ciphers, LEGACY_CIPHERS};
pub use client::{RusshChannel, RusshConnection, RusshDialer, TrustingHandler};

/// Time allowed for TCP connect plus key exchange
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration negotiated for one connection attempt
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub user: String,
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub keepalive_interval: Duration,
    pub ciphers: Vec<Name>,
}

impl ClientSettings {
    pub fn for_target(target: &Target) -> Self {
        Self {
            user: target.effective_user().to_string(),
            host: target.host.clone(),
            port: target.effective_port(),
            timeout: CONNECT_TIMEOUT,
            keepalive_interval: KEEPALIVE_INTERVAL,
            ciphers: client_ciphers(),
        }
    }

    /// `host:port` for messages
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Everything needed for one connection attempt. Built fresh per attempt.
#[derive(Debug)]
pub struct SessionContext {
    pub target: Target,
    pub methods: Vec<AuthMethod>,
    pub settings: ClientSettings,
}

impl SessionContext {
    pub fn new(target: &Target, methods: Vec<AuthMethod>) -> Self {
        Self {
            target: target.clone(),
            methods,
            settings: ClientSettings::for_target(target),
        }
    }

    /// Whether a password method is among those offered
    pub fn offers_password(&self) -> bool {
        self.methods
            .iter()
            .any(|m| matches!(m, AuthMethod::Password(_)))
    }

    /// Fresh context offering the same methods plus `password`
    fn with_password(&self, password: String) -> Self {
        let mut methods = self.methods.clone();
        methods.push(AuthMethod::Password(password));
        Self::new(&self.target, methods)
    }
}

/// Performs the TCP connect, handshake and authentication
#[async_trait]
pub trait Dialer: Send + Sync {
    type Conn: Send;

    /// One connection attempt
    async fn dial(&self, ctx: &SessionContext) -> Result<Self::Conn, DialError>;
}

/// Connect to `target` offering `methods` in order.
///
/// When the first attempt fails with [`DialError::AuthExhausted`] and no
/// password was offered, prompt for one (masked) and retry exactly once with
/// it appended. An empty entry or a prompt failure returns the original error.
pub async fn connect<D: Dialer>(
    dialer: &D,
    target: &Target,
    methods: Vec<AuthMethod>,
    prompter: Arc<dyn Prompter>,
) -> Result<D::Conn, DialError> {
    let ctx = SessionContext::new(target, methods);
    tracing::debug!(
        "Dialing {}@{} with {} method(s)",
        ctx.settings.user,
        ctx.settings.address(),
        ctx.methods.len()
    );

    let err = match dialer.dial(&ctx).await {
        Ok(conn) => return Ok(conn),
        Err(err) if err.wants_password_retry() => err,
        Err(err) => return Err(err),
    };

    tracing::debug!("{}; asking for a password", err);
    let prompt = format!("{}@{}'s password:", ctx.settings.user, ctx.settings.host);
    let password = match tokio::task::spawn_blocking(move || prompter.read_secret(&prompt)).await {
        Ok(Ok(password)) if !password.is_empty() => password,
        Ok(Ok(_)) => return Err(err),
        Ok(Err(e)) => {
            tracing::warn!("Failed to read password: {}", e);
            return Err(err);
        }
        Err(e) => {
            tracing::warn!("Password prompt task failed: {}", e);
            return Err(err);
        }
    };

    let retry = ctx.with_password(password);
    dialer.dial(&retry).await
}
