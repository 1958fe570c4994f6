use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Terminal verdict of one audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditStatus {
    Pass,
    Fail,
    Unknown,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Pass => "PASS",
            AuditStatus::Fail => "FAIL",
            AuditStatus::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PASS" => Ok(AuditStatus::Pass),
            "FAIL" => Ok(AuditStatus::Fail),
            "UNKNOWN" => Ok(AuditStatus::Unknown),
            other => Err(format!("Invalid audit status: {}", other)),
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
