/// Aggregated view of quiz progress, useful for UI.
///
/// `position` is one-based for display ("question 2 of 5"); `answered`
/// counts recorded selections, `skipped` explicit skips, and `remaining`
/// questions with no record at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub position: usize,
    pub answered: usize,
    pub skipped: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
