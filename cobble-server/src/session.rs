use crate::error::SessionError;
use crate::server::Shared;
use crate::status::{self, StatusDocument};

use cobble_packet::frame::{self, InitialFrame};
use cobble_packet::v765::config::{ClientboundConfig, ConfigDisconnect, ServerboundConfig};
use cobble_packet::v765::handshake::ServerboundHandshake;
use cobble_packet::v765::login::{
    ClientboundLogin, LoginDisconnect, LoginSuccess, ServerboundLogin,
};
use cobble_packet::v765::play::ServerboundPlay;
use cobble_packet::v765::status::{
    ClientboundStatus, PingResponse, ServerboundStatus, StatusResponse,
};
use cobble_packet::v765::ProtocolState;
use cobble_packet::PacketError;
use cobble_protocol::id::offline_uuid;
use cobble_protocol::types::VarString;

use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

///
/// The per-connection protocol state machine.
///
/// A session owns its socket and a scratch buffer that is cleared between packets, so per-packet
/// transient allocations never accumulate. Anything that must outlive a single packet (the
/// player name, the derived identifier) is moved into dedicated session fields before the next
/// read reuses the buffer.
///
/// [`Session::tick`] reads and handles exactly one packet. The login phase runs the tick loop
/// synchronously on the accepting thread via [`Session::login`]; after that the session sits in
/// the client registry and its ticks are scheduled onto the worker pool.
pub struct Session {
    shared: Arc<Shared>,
    stream: TcpStream,
    peer: SocketAddr,
    state: ProtocolState,
    scratch: Vec<u8>,
    name: Option<String>,
    uuid: Option<Uuid>,
    registered: bool,
}

impl Session {
    pub(crate) fn new(shared: Arc<Shared>, stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            shared,
            stream,
            peer,
            state: ProtocolState::Handshake,
            scratch: Vec::new(),
            name: None,
            uuid: None,
            registered: false,
        }
    }

    ///
    /// The peer's remote address.
    #[must_use]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    ///
    /// The current protocol state.
    #[must_use]
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    ///
    /// The player name, present once a `login_start` has been handled.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    ///
    /// The player identifier, derived from the name during login.
    #[must_use]
    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    fn send_status(&mut self, packet: ClientboundStatus) -> Result<(), PacketError> {
        packet.write(&mut self.stream, &mut self.scratch)
    }

    fn send_login(&mut self, packet: ClientboundLogin) -> Result<(), PacketError> {
        packet.write(&mut self.stream, &mut self.scratch)
    }

    fn send_config(&mut self, packet: ClientboundConfig) -> Result<(), PacketError> {
        packet.write(&mut self.stream, &mut self.scratch)
    }

    ///
    /// Reads and handles exactly one packet, per the current state's transition table.
    ///
    /// # Errors
    /// [`SessionError::Disconnected`] and [`SessionError::LegacyClient`] signal a finished
    /// exchange rather than a failure; everything else aborts the session. Either way the caller
    /// is expected to stop ticking and [`release`](Session::release) the session.
    pub fn tick(&mut self) -> Result<(), SessionError> {
        match self.state {
            ProtocolState::Handshake => {
                let initial =
                    frame::read_frame_or_legacy(&mut self.stream, &mut self.scratch)?;

                if initial == InitialFrame::Legacy {
                    return Err(SessionError::LegacyClient);
                }

                let packet = ServerboundHandshake::read(&mut &self.scratch[..])?;
                match packet {
                    ServerboundHandshake::Handshake(handshake) => {
                        tracing::debug!(
                            peer = %self.peer,
                            version = *handshake.protocol_version,
                            next = ?handshake.next_state,
                            "handshake"
                        );

                        self.state = handshake.next_state.into();
                    }

                    ServerboundHandshake::Legacy => return Err(SessionError::LegacyClient),
                }

                Ok(())
            }

            ProtocolState::Status => {
                frame::read_frame(&mut self.stream, &mut self.scratch)?;

                let packet = ServerboundStatus::read(&mut &self.scratch[..])?;
                match packet {
                    ServerboundStatus::StatusRequest(_) => {
                        let json = StatusDocument::new(
                            &self.shared.properties,
                            self.shared.favicon.as_deref(),
                            self.shared.registry.len(),
                        )
                        .to_json();

                        self.send_status(ClientboundStatus::StatusResponse(StatusResponse {
                            json: VarString(json),
                        }))?;

                        Ok(())
                    }

                    ServerboundStatus::PingRequest(ping) => {
                        self.send_status(ClientboundStatus::PingResponse(PingResponse {
                            payload: ping.payload,
                        }))?;

                        // the server list ping is over; the connection closes after the pong
                        Err(SessionError::Disconnected)
                    }
                }
            }

            ProtocolState::Login => {
                frame::read_frame(&mut self.stream, &mut self.scratch)?;

                let packet = ServerboundLogin::read(&mut &self.scratch[..])?;
                match packet {
                    ServerboundLogin::LoginStart(login_start) => {
                        let name = login_start.name.0;
                        let uuid = offline_uuid(name.as_bytes());

                        let response = ClientboundLogin::LoginSuccess(LoginSuccess {
                            uuid,
                            username: VarString(name.clone()),
                        });

                        // the name must outlive this tick; it moves into the session before
                        // the scratch buffer is reused
                        self.name = Some(name);
                        self.uuid = Some(uuid);

                        self.send_login(response)?;
                        Ok(())
                    }

                    ServerboundLogin::LoginAcknowledged(_) => {
                        self.state = ProtocolState::Config;
                        Ok(())
                    }

                    // encryption and plugin responses are accepted silently: this core never
                    // solicits either
                    ServerboundLogin::EncryptionResponse(_)
                    | ServerboundLogin::LoginPluginResponse(_) => Ok(()),
                }
            }

            ProtocolState::Config | ProtocolState::Play => {
                frame::read_frame(&mut self.stream, &mut self.scratch)?;

                let err = if self.state == ProtocolState::Config {
                    match ServerboundConfig::read(&mut &self.scratch[..]) {
                        Ok(packet) => match packet {},
                        Err(err) => err,
                    }
                } else {
                    match ServerboundPlay::read(&mut &self.scratch[..]) {
                        Ok(packet) => match packet {},
                        Err(err) => err,
                    }
                };

                match err {
                    PacketError::UnknownId { state, id } => {
                        tracing::debug!(peer = %self.peer, %state, id, "unimplemented packet");

                        self.send_config(ClientboundConfig::Disconnect(ConfigDisconnect {
                            reason: VarString(status::text_component("Unimplemented")),
                        }))?;

                        Err(SessionError::Disconnected)
                    }

                    err => Err(err.into()),
                }
            }
        }
    }

    ///
    /// Runs the login phase: ticks until the session reaches the configuration state, then
    /// registers it in the client registry under its derived identifier.
    ///
    /// A finished exchange ([`SessionError::Disconnected`], from e.g. a status ping, or
    /// [`SessionError::LegacyClient`]) is a graceful ending and yields `Ok`; the session is
    /// simply never registered.
    ///
    /// # Errors
    /// Returns `Err` when the session aborted on a transport, framing, or protocol error. The
    /// session is released either way.
    pub fn login(session: &Arc<Mutex<Session>>) -> Result<(), SessionError> {
        let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);

        while guard.state != ProtocolState::Config {
            match guard.tick() {
                Ok(()) => {}

                Err(SessionError::Disconnected | SessionError::LegacyClient) => {
                    guard.release();
                    return Ok(());
                }

                Err(err) => {
                    tracing::debug!(peer = %guard.peer, %err, "session aborted before login");
                    guard.release();
                    return Err(err);
                }
            }
        }

        let Some(uuid) = guard.uuid else {
            // login-acknowledged without login-start; nobody to register
            tracing::warn!(peer = %guard.peer, "login acknowledged without identity");
            guard.release();
            return Ok(());
        };

        guard.registered = true;
        guard
            .shared
            .registry
            .insert(uuid, Arc::clone(session));

        tracing::info!(peer = %guard.peer, name = guard.name(), %uuid, "player joined");
        Ok(())
    }

    ///
    /// Disconnects the peer with a reason, then releases the session.
    ///
    /// If the current state has a disconnect packet, it is written (best-effort) and the
    /// session closes. From the handshake state, the session first ticks forward to learn which
    /// disconnect form applies; from the status state there is none, and the socket just
    /// closes.
    pub fn disconnect(&mut self, reason: &str) {
        loop {
            match self.state {
                ProtocolState::Login => {
                    let _ = self.send_login(ClientboundLogin::Disconnect(LoginDisconnect {
                        reason: VarString(status::text_component(reason)),
                    }));
                    break;
                }

                ProtocolState::Config | ProtocolState::Play => {
                    let _ =
                        self.send_config(ClientboundConfig::Disconnect(ConfigDisconnect {
                            reason: VarString(status::text_component(reason)),
                        }));
                    break;
                }

                ProtocolState::Status => break,

                ProtocolState::Handshake => {
                    if self.tick().is_err() {
                        break;
                    }
                }
            }
        }

        self.release();
    }

    ///
    /// Deregisters the session (exactly once, if it was registered) and shuts the socket down.
    /// Idempotent; also run on drop.
    pub(crate) fn release(&mut self) {
        if self.registered {
            self.registered = false;

            if let Some(uuid) = self.uuid {
                self.shared.registry.remove(&uuid);
                tracing::info!(peer = %self.peer, name = self.name(), %uuid, "player left");
            }
        }

        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}
