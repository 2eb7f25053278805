use cobble_packet::PacketError;
use std::fmt;
use std::fmt::{Display, Formatter};

///
/// Fatal errors during server initialization. Anything here means the process should exit
/// nonzero; there is no server to run.
#[derive(Debug)]
pub enum ServerError {
    ///
    /// `server.properties` existed but could not be read.
    Properties(std::io::Error),

    ///
    /// The configured `server-port` does not fit a TCP port.
    InvalidPort(u32),

    ///
    /// The listening socket could not be bound.
    Bind(std::io::Error),

    ///
    /// Accepting connections failed in a way that isn't attributable to a single peer.
    Accept(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Properties(err) => write!(f, "failed to read server.properties: {err}"),
            ServerError::InvalidPort(port) => write!(f, "server-port {port} out of range"),
            ServerError::Bind(err) => write!(f, "failed to bind listening socket: {err}"),
            ServerError::Accept(err) => write!(f, "failed to accept connection: {err}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Properties(err) | ServerError::Bind(err) | ServerError::Accept(err) => {
                Some(err)
            }
            ServerError::InvalidPort(_) => None,
        }
    }
}

///
/// The ways a session stops making progress.
///
/// The first two are not failures: [`SessionError::Disconnected`] covers both sides deciding the
/// exchange is over (the server after answering a ping or sending a disconnect packet, the peer
/// by closing), and [`SessionError::LegacyClient`] is a pre-Netty probe that gets silently
/// dropped. [`SessionError::Packet`] is a real transport, framing, or protocol failure.
#[derive(Debug)]
pub enum SessionError {
    ///
    /// Transport, framing, or protocol failure; the session is aborted.
    Packet(PacketError),

    ///
    /// The exchange completed or the peer is gone; close without fuss.
    Disconnected,

    ///
    /// The connection opened with the legacy ping sentinel; close without a reply.
    LegacyClient,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Packet(err) => Display::fmt(err, f),
            SessionError::Disconnected => f.write_str("disconnected"),
            SessionError::LegacyClient => f.write_str("legacy client"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Packet(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PacketError> for SessionError {
    fn from(value: PacketError) -> Self {
        SessionError::Packet(value)
    }
}
