const ZERO_HOURS: &str = "0.00";

/// Minutes since midnight for an `HH:MM` string. Anything after a second
/// colon (seconds) is ignored. `None` when a part does not parse or the
/// total does not fit.
fn minutes_since_midnight(time: &str) -> Option<i64> {
    let mut parts = time.split(':');
    let hours: i64 = parts.next()?.trim().parse().ok()?;
    let minutes: i64 = parts.next()?.trim().parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Decimal hours between check-in and check-out with two fractional digits.
///
/// Missing, malformed or non-increasing times give `"0.00"`. There is no
/// wrap-around past midnight: a check-out earlier than the check-in counts
/// as zero.
pub fn hours_worked(check_in: Option<&str>, check_out: Option<&str>) -> String {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return ZERO_HOURS.to_string();
    };

    match (
        minutes_since_midnight(check_in),
        minutes_since_midnight(check_out),
    ) {
        (Some(start), Some(end)) if end > start => match end.checked_sub(start) {
            Some(span) => format!("{:.2}", span as f64 / 60.0),
            None => ZERO_HOURS.to_string(),
        },
        _ => ZERO_HOURS.to_string(),
    }
}
