use time::{Date, Duration, OffsetDateTime};

/// Estimated calendar date at which the weight trend reaches the target.
///
/// `None` when no rate is configured or the configured rate moves away from
/// the goal; a target already reached projects to `today`.
pub fn projected_goal_date(
    today: Date,
    current_kg: f64,
    target_kg: f64,
    weekly_rate_kg: f64,
) -> Option<Date> {
    if weekly_rate_kg == 0.0 {
        return None;
    }
    let remaining = target_kg - current_kg;
    if remaining == 0.0 {
        return Some(today);
    }
    if (remaining > 0.0) != (weekly_rate_kg > 0.0) {
        return None;
    }

    let weeks_needed = remaining / weekly_rate_kg;
    let days = (weeks_needed * 7.0).ceil() as i64;
    today.checked_add(Duration::days(days))
}

pub fn goal_achievement_date(
    current_kg: f64,
    target_kg: f64,
    weekly_rate_kg: f64,
) -> Option<Date> {
    projected_goal_date(
        OffsetDateTime::now_utc().date(),
        current_kg,
        target_kg,
        weekly_rate_kg,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 08 - 06);

    #[test]
    fn losing_five_kilos_at_half_a_kilo_per_week_takes_ten_weeks() {
        let projected = projected_goal_date(TODAY, 80.0, 75.0, -0.5);
        assert_eq!(projected, Some(TODAY + Duration::days(70)));
    }

    #[test]
    fn gaining_toward_a_higher_target_projects_forward() {
        let projected = projected_goal_date(TODAY, 70.0, 75.0, 0.5);
        assert_eq!(projected, Some(TODAY + Duration::days(70)));
    }

    #[test]
    fn rate_pointing_away_from_the_goal_has_no_projection() {
        assert_eq!(projected_goal_date(TODAY, 80.0, 85.0, -0.5), None);
        assert_eq!(projected_goal_date(TODAY, 80.0, 75.0, 0.5), None);
    }

    #[test]
    fn zero_rate_has_no_projection() {
        assert_eq!(projected_goal_date(TODAY, 80.0, 75.0, 0.0), None);
    }

    #[test]
    fn target_already_reached_projects_today() {
        assert_eq!(projected_goal_date(TODAY, 75.0, 75.0, -0.5), Some(TODAY));
    }

    #[test]
    fn partial_weeks_round_up_to_whole_days() {
        // 1.2 kg at 0.5 kg/week = 2.4 weeks -> 16.8 days -> 17
        let projected = projected_goal_date(TODAY, 76.2, 75.0, -0.5);
        assert_eq!(projected, Some(TODAY + Duration::days(17)));
    }
}
