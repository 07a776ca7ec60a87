use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableOrigin {
    Auto,
    Manual,
}

impl ReceivableOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceivableOrigin::Auto => "auto",
            ReceivableOrigin::Manual => "manual",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ReceivableOrigin::Auto),
            "manual" => Some(ReceivableOrigin::Manual),
            _ => None,
        }
    }
}

impl Display for ReceivableOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
