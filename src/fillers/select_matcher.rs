//! Closest-option matching for select controls
//!
//! Pass 1 looks for an exact (case-insensitive) value or text match. Pass 2
//! accepts containment in either direction. Ties go to the first option in
//! declared order.

use crate::model::FieldOption;

/// Index of the option `value` should select, if any
pub fn match_option(options: &[FieldOption], value: &str) -> Option<usize> {
    let wanted = value.trim().to_lowercase();
    let lowered: Vec<(String, String)> = options
        .iter()
        .map(|o| (o.value.to_lowercase(), o.text.to_lowercase()))
        .collect();

    lowered
        .iter()
        .position(|(v, t)| *v == wanted || *t == wanted)
        .or_else(|| {
            lowered.iter().position(|(v, t)| {
                v.contains(&wanted)
                    || t.contains(&wanted)
                    || wanted.contains(v.as_str())
                    || wanted.contains(t.as_str())
            })
        })
}
