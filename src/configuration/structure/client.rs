use chrono::{DateTime, Utc};
use konfig::{fields, Pass};


#[derive(Debug, Clone, Default)]
pub struct ClientConfiguration {
    pub age: f64,

    /// When the demo last ran with this configuration file.
    /// Defaults to the Unix epoch.
    pub last_seen: DateTime<Utc>,
}

impl ClientConfiguration {
    pub(super) fn fields(&mut self, pass: &mut Pass<'_>) {
        fields!(pass, self => age, last_seen);
    }
}
