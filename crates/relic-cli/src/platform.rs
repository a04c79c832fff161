//! Host platform readiness.
//!
//! The host signals readiness through `RELIC_PLATFORM_READY`. It is read
//! once at startup and only ever displayed; no progression operation
//! consults it.

/// Environment variable carrying the readiness flag.
pub const READY_VAR: &str = "RELIC_PLATFORM_READY";

/// Whether the host environment reported itself ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformStatus {
    /// `true` once the host has signalled readiness.
    pub ready: bool,
}

impl PlatformStatus {
    /// Read the flag from the environment. Unset means not ready.
    pub fn from_env() -> Self {
        Self {
            ready: std::env::var(READY_VAR).is_ok_and(|value| parse_flag(&value)),
        }
    }

    /// Short label for status output.
    pub const fn label(self) -> &'static str {
        if self.ready { "ready" } else { "waiting" }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
