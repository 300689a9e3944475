use std::time::Duration;

pub const MONEY_PRECISION: usize = 2;
pub const ELAPSED_PRECISION: usize = 6;

pub fn fixed(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

pub fn money(value: f64) -> String {
    fixed(value, MONEY_PRECISION)
}

pub fn seconds(elapsed: Duration) -> String {
    fixed(elapsed.as_secs_f64(), ELAPSED_PRECISION)
}

/// Drops a trailing `.0` so whole quantities print as integers.
pub fn quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
