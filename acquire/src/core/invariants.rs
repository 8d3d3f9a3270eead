//! Run-state invariants of a pickup task instance.

use crate::task::PickupState;

/// Check invariants that selection and stall handling must uphold:
/// - The current target is never blacklisted
/// - The approach sub-task, if any, targets the current target
/// - While recovering, nothing is being pursued
/// - A reported stall never stays latched past the tick that reported it
pub fn validate_invariants(state: &PickupState) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(current) = state.current_target() {
        if state.blacklist().contains(current) {
            errors.push(format!("current target {} is blacklisted", current));
        }
    }

    if let Some(approach) = state.approach_target() {
        if state.current_target() != Some(approach) {
            errors.push(format!(
                "approach targets {} but current target is {:?}",
                approach,
                state.current_target()
            ));
        }
    }

    if state.is_recovering()
        && (state.current_target().is_some() || state.approach_target().is_some())
    {
        errors.push("recovery is active while a target is pursued".to_string());
    }

    if state.progress.is_stalled() {
        errors.push("progress stall is still latched".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::approach::GetToEntity;
    use crate::core::types::{EntityId, ProgressSample, Vec3};
    use crate::task::PickupDroppedItemTask;
    use crate::test_support::{fast_config, pickup};

    fn state() -> PickupState {
        PickupDroppedItemTask::new(pickup("x", 1, false), &fast_config())
            .state()
            .clone()
    }

    #[test]
    fn fresh_state_is_valid() {
        assert!(validate_invariants(&state()).is_empty());
    }

    #[test]
    fn reports_blacklisted_current_target() {
        let mut state = state();
        state.current = Some(EntityId(3));
        state.blacklist.insert(EntityId(3));
        let errors = validate_invariants(&state);
        assert!(errors.iter().any(|err| err.contains("is blacklisted")));
    }

    #[test]
    fn reports_mismatched_approach_and_pursuit_during_recovery() {
        let mut state = state();
        state.current = Some(EntityId(1));
        state.approach = Some(GetToEntity::new(EntityId(2), 1.0));
        state.wander.activate(ProgressSample::new(0, Vec3::ZERO));

        let errors = validate_invariants(&state);
        assert!(errors.iter().any(|err| err.contains("approach targets #2")));
        assert!(errors.iter().any(|err| err.contains("recovery is active")));
    }

    #[test]
    fn reports_latched_stall() {
        let mut state = state();
        for tick in [0, 3, 6] {
            state.progress.check(ProgressSample::new(tick, Vec3::ZERO));
        }
        let errors = validate_invariants(&state);
        assert_eq!(errors, vec!["progress stall is still latched".to_string()]);

        state.progress.reset();
        assert!(validate_invariants(&state).is_empty());
    }
}
