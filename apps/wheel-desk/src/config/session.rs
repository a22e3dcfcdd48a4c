//! Dashboard session defaults and pacing.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::services::{PollerConfig, SessionDefaults};
use crate::domain::allocation::TickerSettings;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pause between items of a bulk operation, in milliseconds.
    #[serde(default = "default_bulk_delay_ms")]
    pub bulk_delay_ms: u64,
    /// Order status polling interval in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub order_poll_interval_secs: u64,
    /// Call OTM target for newly tracked tickers.
    #[serde(default = "default_otm_pct")]
    pub default_call_otm_pct: Decimal,
    /// Put OTM target for newly tracked tickers.
    #[serde(default = "default_otm_pct")]
    pub default_put_otm_pct: Decimal,
    /// Days added to the held expiration when the roll target is not listed.
    #[serde(default = "default_offset_days")]
    pub rollover_expiration_offset_days: i64,
    /// Initial OTM target of a roll.
    #[serde(default = "default_otm_pct")]
    pub default_rollover_otm_pct: Decimal,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bulk_delay_ms: default_bulk_delay_ms(),
            order_poll_interval_secs: default_poll_interval_secs(),
            default_call_otm_pct: default_otm_pct(),
            default_put_otm_pct: default_otm_pct(),
            rollover_expiration_offset_days: default_offset_days(),
            default_rollover_otm_pct: default_otm_pct(),
        }
    }
}

impl SessionConfig {
    /// Delay between bulk items.
    #[must_use]
    pub const fn bulk_delay(&self) -> Duration {
        Duration::from_millis(self.bulk_delay_ms)
    }

    /// Poller configuration.
    #[must_use]
    pub const fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(self.order_poll_interval_secs),
        }
    }

    /// Session defaults.
    #[must_use]
    pub const fn to_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            ticker_settings: TickerSettings::new(
                self.default_call_otm_pct,
                self.default_put_otm_pct,
            ),
            rollover_otm_pct: self.default_rollover_otm_pct,
            rollover_offset_days: self.rollover_expiration_offset_days,
        }
    }
}

const fn default_bulk_delay_ms() -> u64 {
    500
}

const fn default_poll_interval_secs() -> u64 {
    10
}

const fn default_otm_pct() -> Decimal {
    Decimal::TEN
}

const fn default_offset_days() -> i64 {
    7
}
