use super::domain::Goal;

/// Priority assumed for goals that carry none; outranked by every explicit priority.
pub const NO_PRIORITY: i32 = i32::MAX;

/// Funding order: dated goals first (earliest deadline leading), then ascending priority,
/// then smallest remaining balance. Ties keep their input order.
pub fn sort_goals(goals: &[Goal]) -> Vec<Goal> {
    let mut ordered = goals.to_vec();
    // `sort_by_key` is stable, which keeps identical keys in input order.
    ordered.sort_by_key(|goal| {
        (
            goal.deadline.is_none(),
            goal.deadline,
            goal.priority.unwrap_or(NO_PRIORITY),
            goal.remaining(),
        )
    });
    ordered
}
