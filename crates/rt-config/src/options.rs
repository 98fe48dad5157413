//! Persisted user preferences.

use rt_common::FORMAT_VERSION;
use serde::{Deserialize, Serialize};

/// User-togglable options stored alongside the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Accept k/m/b shorthand (1.5k, 2m, 3b) for amounts.
    #[serde(default = "default_true")]
    pub kmb_input: bool,

    /// Fit gain as a straight line against level.
    #[serde(default = "default_true")]
    pub linear_gain: bool,

    #[serde(default = "default_schema_ver")]
    pub schema_ver: u32,
}

fn default_true() -> bool {
    true
}

fn default_schema_ver() -> u32 {
    FORMAT_VERSION
}

impl Default for Options {
    fn default() -> Self {
        Self {
            kmb_input: true,
            linear_gain: true,
            schema_ver: FORMAT_VERSION,
        }
    }
}
