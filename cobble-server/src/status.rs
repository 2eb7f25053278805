use crate::properties::ServerProperties;
use cobble_packet::v765::{GAME_VERSION, PROTOCOL_VERSION};
use serde::Serialize;

///
/// The status document sent in answer to a status request, in the shape the notchian client
/// expects:
/// `{ version: { name, protocol }, players: { max, online }, description: { text }, favicon }`.
#[derive(Debug, Serialize)]
pub struct StatusDocument<'a> {
    version: Version,
    players: Players,
    description: Description<'a>,
    favicon: &'a str,
}

#[derive(Debug, Serialize)]
struct Version {
    name: &'static str,
    protocol: i32,
}

#[derive(Debug, Serialize)]
struct Players {
    max: u32,
    online: usize,
}

#[derive(Debug, Serialize)]
struct Description<'a> {
    text: &'a str,
}

impl<'a> StatusDocument<'a> {
    ///
    /// Assembles the document from the server's configuration and current player count. A
    /// missing favicon becomes the empty string, which clients tolerate.
    #[must_use]
    pub fn new(
        properties: &'a ServerProperties,
        favicon: Option<&'a str>,
        online: usize,
    ) -> Self {
        Self {
            version: Version {
                name: GAME_VERSION,
                protocol: PROTOCOL_VERSION,
            },
            players: Players {
                max: properties.max_players,
                online,
            },
            description: Description {
                text: &properties.motd,
            },
            favicon: favicon.unwrap_or_default(),
        }
    }

    ///
    /// Serializes the document to the JSON string carried by the status response packet.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("status document serialization cannot fail")
    }
}

///
/// Renders a plain-text chat component, `{"text":"<text>"}`: the reason format for disconnect
/// packets.
#[must_use]
pub fn text_component(text: &str) -> String {
    serde_json::json!({ "text": text }).to_string()
}
