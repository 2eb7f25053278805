use cobble_server::{favicon, properties, Server, ServerError, ServerProperties};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "fatal");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ServerError> {
    let properties_path = Path::new(properties::PROPERTIES_PATH);
    let properties = ServerProperties::load(properties_path)?;

    // write back the normalized form; failing to is not fatal
    if let Err(err) = properties.save(properties_path) {
        tracing::warn!(%err, "could not write back server.properties");
    }

    let favicon = favicon::load(Path::new(favicon::FAVICON_PATH));

    let mut server = Server::bind(properties, favicon)?;
    server.run()
}
