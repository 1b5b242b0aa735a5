//! Bill selection for the briefing's reminder window.

use assistant_core::Bill;
use chrono::NaiveDate;

/// Select the bills whose per-bill reminder window covers today.
///
/// A bill is included only if `0 <= days_until_due <= reminder_days_before`.
/// A `reminder_days_before` of 0 means "never remind", not "remind today";
/// overdue bills are excluded. Results are sorted by due date, soonest first.
pub fn due_within_window(bills: Vec<Bill>, today: NaiveDate) -> Vec<Bill> {
    let mut due: Vec<Bill> = bills
        .into_iter()
        .filter(|bill| {
            if bill.reminder_days_before <= 0 {
                return false;
            }
            let days_until_due = (bill.due_date - today).num_days();
            (0..=bill.reminder_days_before).contains(&days_until_due)
        })
        .collect();

    due.sort_by_key(|bill| bill.due_date);
    due
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(name: &str, due_in_days: i64, reminder_days_before: i64) -> Bill {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        Bill {
            id: format!("bill-{}", name),
            name: name.to_string(),
            amount: 42.0,
            due_date: today + chrono::Duration::days(due_in_days),
            recurrence: None,
            reminder_days_before,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    #[test]
    fn test_bill_inside_window_included() {
        let due = due_within_window(vec![bill("rent", 2, 3)], today());
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn test_zero_reminder_means_never() {
        let due = due_within_window(vec![bill("rent", 2, 0)], today());
        assert!(due.is_empty());

        // Even on the due date itself
        let due = due_within_window(vec![bill("rent", 0, 0)], today());
        assert!(due.is_empty());
    }

    #[test]
    fn test_bill_outside_window_excluded() {
        let due = due_within_window(vec![bill("rent", 5, 3)], today());
        assert!(due.is_empty());
    }

    #[test]
    fn test_overdue_bill_excluded() {
        let due = due_within_window(vec![bill("rent", -1, 3)], today());
        assert!(due.is_empty());
    }

    #[test]
    fn test_due_today_included() {
        let due = due_within_window(vec![bill("rent", 0, 3)], today());
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn test_sorted_by_due_date() {
        let due = due_within_window(
            vec![bill("later", 3, 7), bill("sooner", 1, 7)],
            today(),
        );
        assert_eq!(due[0].name, "sooner");
        assert_eq!(due[1].name, "later");
    }
}
