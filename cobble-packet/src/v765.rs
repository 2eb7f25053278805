use core::fmt::{Display, Formatter};

///
/// Packets of the handshake state.
pub mod handshake;

///
/// Packets of the status (server list ping) state.
pub mod status;

///
/// Packets of the login state.
pub mod login;

///
/// Packets of the configuration state.
pub mod config;

///
/// Packets of the play state.
pub mod play;

///
/// The protocol version implemented by this module tree.
pub const PROTOCOL_VERSION: i32 = 765;

///
/// The game version corresponding to [`PROTOCOL_VERSION`].
pub const GAME_VERSION: &str = "1.20.4";

///
/// One of the five connection states of the protocol. The state governs which packet identifiers
/// are valid and how their bodies decode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolState {
    ///
    /// The initial state. A single serverbound packet selects the next state.
    Handshake,

    ///
    /// Server list ping: status request/response and ping/pong.
    Status,

    ///
    /// Authentication and identity exchange.
    Login,

    ///
    /// Configuration: registries, resource packs, feature flags.
    Config,

    ///
    /// The game proper.
    Play,
}

impl Display for ProtocolState {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ProtocolState::Handshake => "handshake",
            ProtocolState::Status => "status",
            ProtocolState::Login => "login",
            ProtocolState::Config => "config",
            ProtocolState::Play => "play",
        })
    }
}
