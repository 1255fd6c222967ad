//! This module provides observability and diagnostics for the aggregation core.
//!
//! Grouping decisions (how many rows went in, how many groups came out, which
//! presentation policy was picked) are reported as structured key-value metrics
//! through the `log` facade at debug level, so they cost a level check when
//! logging is off. The `log_metric!` macro is the primary tool.

/// Logs a structured key-value metric line at debug level.
///
/// # Example
/// ```
/// use tambak_analyze::log_metric;
/// let groups = 4;
/// log_metric!("event"="group_min", "groups"=&groups);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if ::log::log_enabled!(::log::Level::Debug) {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            ::log::debug!("TAMBAK_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
