use crate::conf::ConfigError;

#[derive(Debug, Clone)]
pub struct RangeConstraint {
    pub min: u64,
    pub max: u64,
    pub label: &'static str,
    pub units: Option<&'static str>,
}

impl RangeConstraint {
    pub fn check(&self, value: u64) -> Result<(), ConfigError> {
        if (self.min..=self.max).contains(&value) {
            return Ok(());
        }
        Err(ConfigError::OutOfRange {
            label: self.label,
            value,
            min: self.min,
            max: self.max,
            units: self.units.unwrap_or(""),
        })
    }
}

pub const LINE_WINDOW_SECONDS: RangeConstraint = RangeConstraint {
    min: 1,
    max: 60,
    label: "line_window_seconds",
    units: Some("s"),
};

pub const EVENT_WINDOW_SECONDS: RangeConstraint = RangeConstraint {
    min: 1,
    max: 60,
    label: "event_window_seconds",
    units: Some("s"),
};

pub const OUTPUT_INTERVAL_SECONDS: RangeConstraint = RangeConstraint {
    min: 1,
    max: 24 * 60 * 60,
    label: "output_interval_seconds",
    units: Some("s"),
};

pub const REQUEST_LIFETIME_SECONDS: RangeConstraint = RangeConstraint {
    min: 1,
    max: 24 * 60 * 60,
    label: "request_lifetime_seconds",
    units: Some("s"),
};

pub const CLEANUP_PERIOD_MS: RangeConstraint = RangeConstraint {
    min: 10,
    max: 60 * 60 * 1000,
    label: "cleanup_period_ms",
    units: Some("ms"),
};

pub const OUTPUT_TICK_MS: RangeConstraint = RangeConstraint {
    min: 1,
    max: 60 * 1000,
    label: "output_tick_ms",
    units: Some("ms"),
};

pub const WAIT_TIMEOUT_MS: RangeConstraint = RangeConstraint {
    min: 1,
    max: 60 * 1000,
    label: "wait_timeout_ms",
    units: Some("ms"),
};
