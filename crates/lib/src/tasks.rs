//! # Task Rewards
//!
//! Points and daily streaks for completed tasks. Days are UTC calendar days.

use crate::types::TaskProgress;
use chrono::NaiveDate;

impl TaskProgress {
    /// Credits a completion worth `points` made on `today`.
    ///
    /// A completion on the day after the last one extends the current streak,
    /// a second completion on the same day leaves it as is, and anything else
    /// starts a new streak of one.
    pub fn record_completion(&mut self, points: i64, today: NaiveDate) {
        self.points += points;
        self.current_streak = match self.last_task_date {
            Some(last) if last == today => self.current_streak,
            Some(last) if today.pred_opt() == Some(last) => self.current_streak + 1,
            _ => 1,
        };
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_task_date = Some(today);
    }
}
