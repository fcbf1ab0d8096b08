use std::path::PathBuf;

use konfig::Manager;

pub use self::client::ClientConfiguration;
pub use self::logging::LoggingConfiguration;
pub use self::server::ServerConfiguration;

mod client;
mod logging;
mod server;



/// The entire configuration.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Server-related configuration (`[server]` and `[server.tls]`).
    pub server: ServerConfiguration,

    /// Client-related configuration.
    pub client: ClientConfiguration,

    /// Logging-related configuration.
    pub logging: LoggingConfiguration,
}


/// Builds a manager for `configuration_file_path` with every section of
/// [`Configuration`] registered, in the order they appear in the file.
pub fn configuration_manager<P: Into<PathBuf>>(
    configuration_file_path: P,
) -> Manager<Configuration> {
    let mut manager = Manager::new(configuration_file_path);

    manager.section("server", |pass, configuration: &mut Configuration| {
        configuration.server.fields(pass)
    });
    manager.section("client", |pass, configuration: &mut Configuration| {
        configuration.client.fields(pass)
    });
    manager.fallible_section("logging", |pass, configuration: &mut Configuration| {
        configuration.logging.fields(pass)
    });

    manager
}
