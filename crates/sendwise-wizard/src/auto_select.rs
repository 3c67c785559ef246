//! Chained auto-selection over cascading categories.
//!
//! Once upstream choices narrow a category down to a single eligible item
//! (a school with one grade, a grade with one class) that item is picked
//! automatically, which may in turn narrow the next level.  Passes repeat
//! until nothing changes.

use crate::category::{CategoryConfig, EligibilityFilter};
use tracing::{trace, warn};

/// Passes allowed on top of one per category.
pub const EXTRA_PASSES: usize = 2;

/// Auto-select every unselected category that has exactly one eligible item,
/// propagating until a fixed point.
///
/// Bounded to `categories.len() + EXTRA_PASSES` passes, saturating at
/// `usize::MAX`.  Categories that already have a selection, or whose eligible
/// count is 0 or at least 2, come back unchanged.
pub fn apply_chained_auto_selection<F>(
    categories: &[CategoryConfig],
    filter: &F,
) -> Vec<CategoryConfig>
where
    F: EligibilityFilter + ?Sized,
{
    let max_passes = categories.len().saturating_add(EXTRA_PASSES);
    apply_chained_auto_selection_with(categories, filter, max_passes)
}

/// [`apply_chained_auto_selection`] with an explicit pass bound.
///
/// Each pass evaluates every category against the selections held at the
/// start of that pass.  If the bound is reached before a pass comes back
/// unchanged, the partially propagated state is returned as is.
pub fn apply_chained_auto_selection_with<F>(
    categories: &[CategoryConfig],
    filter: &F,
    max_passes: usize,
) -> Vec<CategoryConfig>
where
    F: EligibilityFilter + ?Sized,
{
    let mut current = categories.to_vec();

    for pass in 1..=max_passes {
        let picks = pending_picks(&current, filter);
        if picks.is_empty() {
            trace!(pass, "auto-selection stable");
            return current;
        }

        trace!(pass, picked = picks.len(), "auto-selection pass");
        let mut next = current.clone();
        for (index, id) in picks {
            next[index].selected_ids = Some(vec![id]);
        }
        current = next;
    }

    // The last allowed pass may have landed exactly on the fixed point.
    if pending_picks(&current, filter).is_empty() {
        trace!(max_passes, "auto-selection stable at its pass bound");
    } else {
        warn!(max_passes, "auto-selection hit its pass bound before stabilizing");
    }
    current
}

/// Unselected categories with exactly one eligible item, as
/// `(index, item id)`, judged against `current`.
fn pending_picks<F>(current: &[CategoryConfig], filter: &F) -> Vec<(usize, String)>
where
    F: EligibilityFilter + ?Sized,
{
    current
        .iter()
        .enumerate()
        .filter(|(_, category)| !category.has_selection())
        .filter_map(|(index, category)| {
            let mut eligible = filter.eligible_items(category, current);
            if eligible.len() == 1 {
                eligible.pop().map(|item| (index, item.id))
            } else {
                None
            }
        })
        .collect()
}
