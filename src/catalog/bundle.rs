//! Bundle Composer
//!
//! Normalizes a submitted component list into the `(component_id,
//! quantity)` rows to persist. Entries with a non-positive id or
//! quantity are dropped silently; duplicates merge by summing their
//! quantities, keeping first-seen order.

use crate::db::models::ComponentInput;
use crate::utils::{AppError, AppResult};

/// Plan the component set for a bundle.
///
/// An empty input is a valid detach request and yields an empty plan.
/// A non-empty input that filters down to nothing is rejected, as is
/// any entry that references the bundle itself.
pub fn plan_components(bundle_id: i64, components: &[ComponentInput]) -> AppResult<Vec<(i64, i64)>> {
    if components.is_empty() {
        return Ok(Vec::new());
    }

    let mut plan: Vec<(i64, i64)> = Vec::new();
    for input in components {
        if input.menu_item_id <= 0 || input.quantity <= 0 {
            continue;
        }
        if input.menu_item_id == bundle_id {
            return Err(AppError::SelfReference);
        }

        match plan.iter_mut().find(|(id, _)| *id == input.menu_item_id) {
            Some((_, quantity)) => *quantity += input.quantity,
            None => plan.push((input.menu_item_id, input.quantity)),
        }
    }

    if plan.is_empty() {
        return Err(AppError::InvalidComposition(
            "Bundle components must contain at least one valid entry".to_string(),
        ));
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(menu_item_id: i64, quantity: i64) -> ComponentInput {
        ComponentInput {
            menu_item_id,
            quantity,
        }
    }

    #[test]
    fn test_empty_input_is_detach() {
        assert_eq!(plan_components(1, &[]).unwrap(), Vec::<(i64, i64)>::new());
    }

    #[test]
    fn test_duplicates_merge_in_order() {
        let plan =
            plan_components(1, &[input(5, 2), input(7, 1), input(5, 3)]).unwrap();
        assert_eq!(plan, vec![(5, 5), (7, 1)]);
    }

    #[test]
    fn test_invalid_entries_dropped() {
        let plan =
            plan_components(1, &[input(0, 2), input(5, 0), input(5, -1), input(9, 2)]).unwrap();
        assert_eq!(plan, vec![(9, 2)]);
    }

    #[test]
    fn test_all_entries_invalid_rejected() {
        let err = plan_components(1, &[input(0, 2), input(5, 0)]).unwrap_err();
        assert!(matches!(err, AppError::InvalidComposition(_)));
    }

    #[test]
    fn test_self_reference_rejected() {
        let err = plan_components(7, &[input(5, 1), input(7, 1)]).unwrap_err();
        assert!(matches!(err, AppError::SelfReference));
    }

    #[test]
    fn test_self_reference_with_invalid_quantity_still_skipped() {
        // A self-reference with quantity 0 is filtered out before the check
        let plan = plan_components(7, &[input(7, 0), input(5, 1)]).unwrap();
        assert_eq!(plan, vec![(5, 1)]);
    }
}
