use std::time::Instant;

pub struct IntegerUtils;

impl IntegerUtils {
    /// Random integer in [min, max] inclusive.
    pub fn random(min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        rand::random_range(min..=max)
    }
}

pub struct FloatUtils;

impl FloatUtils {
    pub fn random(min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        rand::random_range(min..max)
    }
}

pub struct TimeEstimation;

impl TimeEstimation {
    pub fn estimate<T, F: FnOnce() -> T>(action: F) -> (T, u32) {
        let now = Instant::now();
        let result = action();
        (result, now.elapsed().as_millis() as u32)
    }
}

pub struct FormattingUtils;

impl FormattingUtils {
    pub fn format_money(amount: i64) -> String {
        let abs = amount.abs();
        let formatted = if abs >= 1_000_000 {
            format!("{:.1}M", abs as f64 / 1_000_000.0)
        } else if abs >= 1_000 {
            format!("{:.0}K", abs as f64 / 1_000.0)
        } else {
            format!("{}", abs)
        };

        if amount < 0 {
            format!("-${}", formatted)
        } else {
            format!("${}", formatted)
        }
    }
}
