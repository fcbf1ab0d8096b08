use std::path::PathBuf;

use konfig::Pass;


#[derive(Debug, Clone)]
pub struct ServerConfiguration {
    pub port: u16,

    pub host: String,

    /// Whether TLS is enabled (`[server.tls]`).
    pub tls_enabled: bool,

    pub tls_certificate_path: PathBuf,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "localhost".to_string(),
            tls_enabled: false,
            tls_certificate_path: PathBuf::from("data/certificates/server.pem"),
        }
    }
}

impl ServerConfiguration {
    pub(super) fn fields(&mut self, pass: &mut Pass<'_>) {
        pass.field("port", &mut self.port);
        pass.field("host", &mut self.host);

        pass.scope("tls", |pass| {
            pass.field("enabled", &mut self.tls_enabled);
            pass.field("certificate_path", &mut self.tls_certificate_path);
        });
    }

    /// `host:port`, as it would be passed to a socket bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
