use super::*;

/// Per-collector options, also used for the `[defaults]` table.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Collector {
    #[serde(default)]
    enabled: Option<bool>,
}

impl Collector {
    pub fn enabled(&self) -> Option<bool> {
        self.enabled
    }
}
