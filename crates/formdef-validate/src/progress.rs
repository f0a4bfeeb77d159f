//! Completion percentage for the progress bar
use formdef_core::{is_filled, EmptyProgressPolicy, FormDefinition, SubmissionValueMap};
use serde::{Deserialize, Serialize};

/// Required-field fill state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub required: usize,
    pub filled: usize,
    /// 0-100
    pub percent: u8,
}

impl Progress {
    pub fn measure(form: &FormDefinition, values: &SubmissionValueMap, policy: EmptyProgressPolicy) -> Self {
        let required = form.required_fields().count();
        let filled = form
            .required_fields()
            .filter(|f| is_filled(values, &f.id))
            .count();

        let percent = if required == 0 {
            match policy {
                EmptyProgressPolicy::Zero => 0,
                EmptyProgressPolicy::Full => 100,
            }
        } else {
            (100.0 * filled as f64 / required as f64).round() as u8
        };

        Self { required, filled, percent }
    }

    pub fn is_complete(&self) -> bool {
        self.filled == self.required
    }
}

/// `round(100 * filled_required / required)`
pub fn completion_percentage(
    form: &FormDefinition,
    values: &SubmissionValueMap,
    policy: EmptyProgressPolicy,
) -> u8 {
    Progress::measure(form, values, policy).percent
}
