use serde::Serialize;

use crate::models::{Submission, MAX_RATING, MIN_RATING};

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_submissions: usize,
    /// Rounded to one decimal; 0.0 when there are no submissions.
    pub average_rating: f64,
    /// Count per star, index 0 is one star. Out-of-range ratings are not counted.
    pub rating_distribution: [usize; MAX_RATING as usize],
}

impl DashboardStats {
    pub fn compute(submissions: &[Submission]) -> Self {
        let total_submissions = submissions.len();
        if total_submissions == 0 {
            return Self::default();
        }

        let sum: u64 = submissions.iter().map(|s| u64::from(s.rating)).sum();
        let average_rating = round_to_tenth(sum as f64 / total_submissions as f64);

        let mut rating_distribution = [0usize; MAX_RATING as usize];
        for submission in submissions.iter().filter(|s| s.has_valid_rating()) {
            rating_distribution[usize::from(submission.rating - MIN_RATING)] += 1;
        }

        Self {
            total_submissions,
            average_rating,
            rating_distribution,
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
