//! russh-backed dialer, connection and shell channel

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle, KeyboardInteractiveAuthResponse, Msg};
use russh::{Channel, ChannelMsg, Disconnect, Preferred, Pty};
use russh_keys::key::PublicKey;

use super::{ClientSettings, Dialer, SessionContext};
use crate::auth::{answer_challenges, AuthMethod, Challenge, Prompter};
use crate::error::{DialError, SessionError};
use crate::pty::{Connection, ShellChannel, ShellOutput, TerminalSize, TERMINAL_SPEED};

/// Modes sent with every PTY request
const TERMINAL_MODES: &[(Pty, u32)] = &[
    (Pty::ECHO, 1),
    (Pty::TTY_OP_ISPEED, TERMINAL_SPEED),
    (Pty::TTY_OP_OSPEED, TERMINAL_SPEED),
];

/// Client handler that accepts every server host key.
///
/// There is no known-hosts store and no fingerprint pinning: a server that
/// changes its key, or an impostor, is accepted silently. The fingerprint is
/// logged at debug level only.
pub struct TrustingHandler;

#[async_trait]
impl client::Handler for TrustingHandler {
    type Error = anyhow::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        tracing::debug!(
            "Server host key {} accepted without verification",
            server_public_key.fingerprint()
        );
        Ok(true)
    }
}

/// russh client configuration for one attempt.
///
/// russh's session loop sends `keepalive@openssh.com` on its own once
/// `keepalive_interval` passes without traffic. It asks for a reply and drops
/// the connection after `keepalive_max` unanswered requests.
fn client_config(settings: &ClientSettings) -> client::Config {
    client::Config {
        preferred: Preferred {
            cipher: Cow::Owned(settings.ciphers.clone()),
            ..Preferred::default()
        },
        keepalive_interval: Some(settings.keepalive_interval),
        ..client::Config::default()
    }
}

/// Dials targets over TCP with russh
pub struct RusshDialer {
    prompter: Arc<dyn Prompter>,
}

impl RusshDialer {
    /// `prompter` answers keyboard-interactive questions
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self { prompter }
    }

    async fn try_method(
        &self,
        handle: &mut Handle<TrustingHandler>,
        user: &str,
        method: &AuthMethod,
    ) -> Result<bool, DialError> {
        tracing::debug!("Trying {} authentication", method.kind());
        let accepted = match method {
            AuthMethod::PublicKey(key) => {
                handle
                    .authenticate_publickey(user, Arc::clone(key))
                    .await?
            }
            AuthMethod::Password(password) => handle.authenticate_password(user, password).await?,
            AuthMethod::KeyboardInteractive => self.keyboard_interactive(handle, user).await?,
        };
        if !accepted {
            tracing::debug!("{} authentication rejected", method.kind());
        }
        Ok(accepted)
    }

    async fn keyboard_interactive(
        &self,
        handle: &mut Handle<TrustingHandler>,
        user: &str,
    ) -> Result<bool, DialError> {
        let mut response = handle
            .authenticate_keyboard_interactive_start(user, None::<String>)
            .await?;

        loop {
            match response {
                KeyboardInteractiveAuthResponse::Success => return Ok(true),
                KeyboardInteractiveAuthResponse::Failure { .. } => return Ok(false),
                KeyboardInteractiveAuthResponse::InfoRequest { prompts, .. } => {
                    let challenges: Vec<Challenge> = prompts
                        .into_iter()
                        .map(|p| Challenge {
                            prompt: p.prompt,
                            echo: p.echo,
                        })
                        .collect();

                    let prompter = Arc::clone(&self.prompter);
                    let answers = tokio::task::spawn_blocking(move || {
                        answer_challenges(prompter.as_ref(), &challenges)
                    })
                    .await
                    .map_err(|e| DialError::Transport(format!("Prompt task failed: {}", e)))?
                    .map_err(|e| {
                        DialError::Transport(format!("keyboard-interactive aborted: {}", e))
                    })?;

                    response = handle
                        .authenticate_keyboard_interactive_respond(answers)
                        .await?;
                }
            }
        }
    }
}

#[async_trait]
impl Dialer for RusshDialer {
    type Conn = RusshConnection;

    async fn dial(&self, ctx: &SessionContext) -> Result<RusshConnection, DialError> {
        let settings = &ctx.settings;
        let config = Arc::new(client_config(settings));

        let mut handle = tokio::time::timeout(
            settings.timeout,
            client::connect(config, (settings.host.as_str(), settings.port), TrustingHandler),
        )
        .await
        .map_err(|_| DialError::Timeout(settings.address()))?
        .map_err(|e| DialError::classify(format!("ssh: handshake failed: {}", e)))?;

        for method in &ctx.methods {
            if self.try_method(&mut handle, &settings.user, method).await? {
                tracing::info!("Authenticated to {} as {}", settings.address(), settings.user);
                return Ok(RusshConnection { handle });
            }
        }

        if let Err(e) = handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
        {
            tracing::debug!("Disconnect after failed auth: {}", e);
        }
        Err(DialError::AuthExhausted {
            password_offered: ctx.offers_password(),
        })
    }
}

/// Authenticated russh connection
pub struct RusshConnection {
    handle: Handle<TrustingHandler>,
}

#[async_trait]
impl Connection for RusshConnection {
    type Channel = RusshChannel;

    async fn open_session(&self) -> Result<RusshChannel, SessionError> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| SessionError::ChannelOpen(e.to_string()))?;
        Ok(RusshChannel { channel })
    }

    fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(|e| SessionError::Write(e.to_string()))
    }
}

/// Session channel on a [`RusshConnection`]
pub struct RusshChannel {
    channel: Channel<Msg>,
}

impl RusshChannel {
    /// Wait for the reply to a request sent with `want_reply`
    async fn await_reply(&mut self) -> Result<bool, SessionError> {
        while let Some(msg) = self.channel.wait().await {
            match msg {
                ChannelMsg::Success => return Ok(true),
                ChannelMsg::Failure => return Ok(false),
                ChannelMsg::Close => break,
                other => tracing::trace!("Ignoring {:?} while awaiting reply", other),
            }
        }
        Err(SessionError::Closed)
    }
}

#[async_trait]
impl ShellChannel for RusshChannel {
    async fn request_pty(&mut self, term: &str, size: TerminalSize) -> Result<(), SessionError> {
        self.channel
            .request_pty(
                true,
                term,
                u32::from(size.cols),
                u32::from(size.rows),
                0,
                0,
                TERMINAL_MODES,
            )
            .await
            .map_err(|e| SessionError::PtyRequest(e.to_string()))?;

        match self.await_reply().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(SessionError::PtyRequest("request refused by server".into())),
            Err(e) => Err(SessionError::PtyRequest(e.to_string())),
        }
    }

    async fn request_shell(&mut self) -> Result<(), SessionError> {
        self.channel
            .request_shell(true)
            .await
            .map_err(|e| SessionError::ShellStart(e.to_string()))?;

        match self.await_reply().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(SessionError::ShellStart("request refused by server".into())),
            Err(e) => Err(SessionError::ShellStart(e.to_string())),
        }
    }

    async fn send_data(&mut self, data: &[u8]) -> Result<(), SessionError> {
        self.channel
            .data(data)
            .await
            .map_err(|e| SessionError::Write(e.to_string()))
    }

    async fn window_change(&mut self, size: TerminalSize) -> Result<(), SessionError> {
        self.channel
            .window_change(u32::from(size.cols), u32::from(size.rows), 0, 0)
            .await
            .map_err(|e| SessionError::Write(e.to_string()))
    }

    async fn next_output(&mut self) -> Option<ShellOutput> {
        loop {
            let output = match self.channel.wait().await? {
                ChannelMsg::Data { data } => ShellOutput::Stdout(data.to_vec()),
                ChannelMsg::ExtendedData { data, .. } => ShellOutput::Stderr(data.to_vec()),
                ChannelMsg::ExitStatus { exit_status } => ShellOutput::ExitStatus(exit_status),
                ChannelMsg::Eof => ShellOutput::Eof,
                ChannelMsg::Close => ShellOutput::Closed,
                other => {
                    tracing::trace!("Ignoring channel message {:?}", other);
                    continue;
                }
            };
            return Some(output);
        }
    }

    async fn eof(&mut self) -> Result<(), SessionError> {
        self.channel
            .eof()
            .await
            .map_err(|e| SessionError::Write(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.channel
            .close()
            .await
            .map_err(|e| SessionError::Write(e.to_string()))
    }
}
