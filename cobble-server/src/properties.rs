use crate::error::ServerError;
use std::path::Path;

///
/// The file name the server reads and writes in its working directory.
pub const PROPERTIES_PATH: &str = "server.properties";

///
/// The comment line heading every written properties file.
const HEADER: &str = "#Minecraft server properties";

///
/// A value type that can live in `server.properties`.
trait PropertyValue: Sized {
    ///
    /// Parses a trimmed value string. `None` leaves the field at its previous (default) value.
    fn parse(value: &str) -> Option<Self>;

    ///
    /// Appends the normalized textual form.
    fn format(&self, out: &mut String);
}

impl PropertyValue for bool {
    fn parse(value: &str) -> Option<Self> {
        // only the two canonical spellings; anything else is ignored
        match value {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn format(&self, out: &mut String) {
        out.push_str(if *self { "true" } else { "false" });
    }
}

///
/// Base-0 unsigned integer parsing: a `0x`, `0o` or `0b` prefix selects the radix, no prefix
/// means decimal.
fn parse_uint(value: &str) -> Option<u64> {
    let digits = value.strip_prefix('+').unwrap_or(value);

    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
        u64::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2).ok()
    } else {
        digits.parse().ok()
    }
}

impl PropertyValue for u32 {
    fn parse(value: &str) -> Option<Self> {
        parse_uint(value).and_then(|val| u32::try_from(val).ok())
    }

    fn format(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl PropertyValue for u64 {
    fn parse(value: &str) -> Option<Self> {
        parse_uint(value)
    }

    fn format(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl PropertyValue for String {
    fn parse(value: &str) -> Option<Self> {
        Some(String::from(value))
    }

    fn format(&self, out: &mut String) {
        out.push_str(self);
    }
}

macro_rules! properties_schema {
    ( $( $key:literal => $field:ident : $ty:ty = $default:expr ),* $(,)? ) => {
        ///
        /// The `server.properties` document: every option the vanilla server recognizes, with
        /// vanilla defaults. Owned by the server for its lifetime; there is no hot reload.
        ///
        /// Booleans accept only `true`/`false`; integers parse base-0 (`0x`, `0o`, `0b`
        /// prefixes allowed); strings are taken verbatim after whitespace trimming.
        #[derive(Clone, Debug, PartialEq)]
        pub struct ServerProperties {
            $(
                #[doc = concat!("`", $key, "`")]
                pub $field: $ty,
            )*
        }

        impl Default for ServerProperties {
            fn default() -> Self {
                Self {
                    $( $field: <$ty>::from($default), )*
                }
            }
        }

        impl ServerProperties {
            ///
            /// Applies one `key=value` pair. Returns `false` for unrecognized keys; recognized
            /// keys whose value fails to parse keep their current value.
            fn apply(&mut self, key: &str, value: &str) -> bool {
                match key {
                    $(
                        $key => {
                            match <$ty as PropertyValue>::parse(value) {
                                Some(parsed) => self.$field = parsed,
                                None => tracing::warn!(key, value, "ignoring unparseable property value"),
                            }

                            true
                        }
                    )*
                    _ => false,
                }
            }

            ///
            /// Renders the normalized file: the header comment, then every recognized key in
            /// schema order.
            #[must_use]
            pub fn render(&self) -> String {
                let mut out = String::new();
                out.push_str(HEADER);
                out.push('\n');

                $(
                    out.push_str($key);
                    out.push('=');
                    PropertyValue::format(&self.$field, &mut out);
                    out.push('\n');
                )*

                out
            }
        }
    };
}

properties_schema! {
    "enable-jmx-monitoring" => enable_jmx_monitoring: bool = false,
    "rcon.port" => rcon_port: u32 = 25575u32,
    "level-seed" => level_seed: String = "",
    "gamemode" => gamemode: String = "survival",
    "enable-command-block" => enable_command_block: bool = false,
    "enable-query" => enable_query: bool = false,
    "generator-settings" => generator_settings: String = "{}",
    "enforce-secure-profile" => enforce_secure_profile: bool = true,
    "level-name" => level_name: String = "world",
    "motd" => motd: String = "A Minecraft Server",
    "query.port" => query_port: u32 = 25565u32,
    "pvp" => pvp: bool = true,
    "generate-structures" => generate_structures: bool = true,
    "max-chained-neighbor-updates" => max_chained_neighbor_updates: u32 = 1_000_000u32,
    "difficulty" => difficulty: String = "easy",
    "network-compression-threshold" => network_compression_threshold: u32 = 256u32,
    "max-tick-time" => max_tick_time: u64 = 60_000u64,
    "require-resource-pack" => require_resource_pack: bool = false,
    "use-native-transport" => use_native_transport: bool = true,
    "max-players" => max_players: u32 = 20u32,
    "online-mode" => online_mode: bool = true,
    "enable-status" => enable_status: bool = true,
    "allow-flight" => allow_flight: bool = false,
    "initial-disabled-packs" => initial_disabled_packs: String = "",
    "broadcast-rcon-to-ops" => broadcast_rcon_to_ops: bool = true,
    "view-distance" => view_distance: u32 = 10u32,
    "server-ip" => server_ip: String = "",
    "resource-pack-prompt" => resource_pack_prompt: String = "",
    "allow-nether" => allow_nether: bool = true,
    "server-port" => server_port: u32 = 25565u32,
    "enable-rcon" => enable_rcon: bool = false,
    "sync-chunk-writes" => sync_chunk_writes: bool = true,
    "op-permission-level" => op_permission_level: u32 = 4u32,
    "prevent-proxy-connections" => prevent_proxy_connections: bool = false,
    "hide-online-players" => hide_online_players: bool = false,
    "resource-pack" => resource_pack: String = "",
    "entity-broadcast-range-percentage" => entity_broadcast_range_percentage: u32 = 100u32,
    "simulation-distance" => simulation_distance: u32 = 10u32,
    "rcon.password" => rcon_password: String = "",
    "player-idle-timeout" => player_idle_timeout: u32 = 0u32,
    "debug" => debug: bool = false,
    "force-gamemode" => force_gamemode: bool = false,
    "rate-limit" => rate_limit: u32 = 0u32,
    "hardcore" => hardcore: bool = false,
    "white-list" => white_list: bool = false,
    "broadcast-console-to-ops" => broadcast_console_to_ops: bool = true,
    "spawn-npcs" => spawn_npcs: bool = true,
    "spawn-animals" => spawn_animals: bool = true,
    "log-ips" => log_ips: bool = true,
    "function-permission-level" => function_permission_level: u32 = 2u32,
    "initial-enabled-packs" => initial_enabled_packs: String = "vanilla",
    "level-type" => level_type: String = "minecraft:normal",
    "text-filtering-config" => text_filtering_config: String = "",
    "spawn-monsters" => spawn_monsters: bool = true,
    "enforce-whitelist" => enforce_whitelist: bool = false,
    "spawn-protection" => spawn_protection: u32 = 16u32,
    "resource-pack-sha1" => resource_pack_sha1: String = "",
    "max-world-size" => max_world_size: u32 = 29_999_984u32,
}

impl ServerProperties {
    ///
    /// Parses properties from file contents. Lines whose first non-whitespace character is `#`
    /// are comments; empty lines are skipped; keys and values are trimmed of surrounding ASCII
    /// whitespace. Unrecognized keys are ignored (and thus dropped by [`Self::render`]).
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let mut properties = Self::default();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line, "ignoring malformed property line");
                continue;
            };

            let key = key.trim();
            if !properties.apply(key, value.trim()) {
                tracing::debug!(key, "ignoring unrecognized property");
            }
        }

        properties
    }

    ///
    /// Loads properties from `path`. A missing file is not an error: every option falls back to
    /// its default, and the normalized write-back will create the file.
    ///
    /// # Errors
    /// Returns `Err` only if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(?path, "no server.properties, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(ServerError::Properties(err)),
        }
    }

    ///
    /// Writes the normalized form of these properties to `path`.
    ///
    /// # Errors
    /// Returns `Err` if the file cannot be written.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_vanilla() {
        let properties = ServerProperties::default();

        assert_eq!(properties.server_port, 25565);
        assert_eq!(properties.max_players, 20);
        assert_eq!(properties.motd, "A Minecraft Server");
        assert_eq!(properties.level_type, "minecraft:normal");
        assert!(properties.online_mode);
        assert!(!properties.hardcore);
        assert_eq!(properties.max_world_size, 29_999_984);
    }

    #[test]
    fn single_key_round_trip() {
        let loaded = ServerProperties::parse("motd=Hi");

        assert_eq!(loaded.motd, "Hi");

        // everything else stays at its default
        let mut expected = ServerProperties::default();
        expected.motd = String::from("Hi");
        assert_eq!(loaded, expected);

        // and survives a save/load cycle
        let reloaded = ServerProperties::parse(&loaded.render());
        assert_eq!(reloaded, loaded);
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let loaded = ServerProperties::parse(
            "#Minecraft server properties\n\n  # indented comment\nmax-players=64\n",
        );

        assert_eq!(loaded.max_players, 64);
    }

    #[test]
    fn whitespace_trimmed() {
        let loaded = ServerProperties::parse("  motd  =  spaced out  \n");
        assert_eq!(loaded.motd, "spaced out");
    }

    #[test]
    fn unrecognized_keys_dropped_on_save() {
        let loaded = ServerProperties::parse("not-a-real-key=42\nmotd=Hi\n");
        let rendered = loaded.render();

        assert!(!rendered.contains("not-a-real-key"));
        assert!(rendered.contains("motd=Hi"));
        assert!(rendered.starts_with(HEADER));
    }

    #[test]
    fn strict_booleans() {
        let loaded = ServerProperties::parse("pvp=True\nhardcore=1\nenable-rcon=true\n");

        // bad spellings keep the default
        assert!(loaded.pvp);
        assert!(!loaded.hardcore);
        assert!(loaded.enable_rcon);
    }

    #[test]
    fn base_zero_integers() {
        let loaded =
            ServerProperties::parse("server-port=0x63DD\nview-distance=0o17\nrate-limit=0b101\n");

        assert_eq!(loaded.server_port, 0x63DD);
        assert_eq!(loaded.view_distance, 0o17);
        assert_eq!(loaded.rate_limit, 0b101);
    }

    #[test]
    fn out_of_range_integer_keeps_default() {
        let loaded = ServerProperties::parse("view-distance=99999999999999999999\n");
        assert_eq!(loaded.view_distance, 10);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let mut path = std::env::temp_dir();
        path.push(format!("cobble-properties-missing-{}", std::process::id()));

        let loaded = ServerProperties::load(&path).expect("missing file is not an error");
        assert_eq!(loaded, ServerProperties::default());
    }

    #[test]
    fn save_then_load_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("cobble-properties-roundtrip-{}", std::process::id()));

        let mut properties = ServerProperties::default();
        properties.motd = String::from("Hi");
        properties.save(&path).expect("save should succeed");

        let loaded = ServerProperties::load(&path).expect("load should succeed");
        assert_eq!(loaded, properties);

        std::fs::remove_file(&path).expect("cleanup should succeed");
    }

    #[test]
    fn render_is_ordered_and_complete() {
        let rendered = ServerProperties::default().render();
        let lines: Vec<&str> = rendered.lines().collect();

        // header plus one line per schema key
        assert_eq!(lines.len(), 59);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "enable-jmx-monitoring=false");
        assert_eq!(lines[58], "max-world-size=29999984");
    }
}
