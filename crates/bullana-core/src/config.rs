use serde::de::DeserializeOwned;

/// Environment-backed configuration.
///
/// Services define a `Deserialize` struct whose field names map to env vars
/// (envy matches them case-insensitively) and pull it in once at startup via
/// [`EnvConfig::load`]. A missing or malformed value aborts startup; there is
/// no point serving requests with half a config.
pub trait EnvConfig: DeserializeOwned {
    fn load() -> Self {
        match envy::from_env() {
            Ok(config) => config,
            Err(e) => panic!("configuration error: {e}"),
        }
    }
}
