//! Membership status derivation. Pure functions over membership and payment
//! rows; the SQL in the membership and stats services mirrors these rules,
//! and the tests there check both stay in agreement.

use chrono::{Duration, NaiveDate};

use crate::models::membership::MembershipStatus;

/// Days before the end date during which a membership counts as expiring
/// soon. End date inclusive.
pub const EXPIRING_WINDOW_DAYS: i64 = 7;

/// Aggregate settlement rule: a membership counts as paid when any of its
/// payment rows is settled; the empty set derives false. A single settled
/// installment marks the whole membership paid even when other installments
/// are outstanding; partial-payment tracking is intentionally not modeled.
/// Every settlement decision in the crate goes through this rule.
pub fn any_row_settled<I>(settled_flags: I) -> bool
where
    I: IntoIterator<Item = bool>,
{
    settled_flags.into_iter().any(|settled| settled)
}

/// Lifecycle classification for the membership a customer currently holds.
/// `None` means the customer has no active membership row. A membership
/// ending exactly today is already expired.
pub fn classify(end_date: Option<NaiveDate>, today: NaiveDate) -> MembershipStatus {
    let Some(end) = end_date else {
        return MembershipStatus::NoMembership;
    };
    if end <= today {
        MembershipStatus::Expired
    } else if end <= today + Duration::days(EXPIRING_WINDOW_DAYS) {
        MembershipStatus::ExpiringSoon
    } else {
        MembershipStatus::Active
    }
}

/// Outstanding-payment predicate: active membership, still in term, and no
/// settled payment row. Inactive memberships are never unpaid regardless of
/// payment state.
pub fn is_unpaid(
    membership_active: bool,
    settled: bool,
    end_date: NaiveDate,
    today: NaiveDate,
) -> bool {
    membership_active && !settled && end_date >= today
}

/// Month-over-month delta formatted the way the dashboard shows it.
/// Both metrics zero reads "0%"; growth from a zero baseline is pinned at
/// "+100%"; non-negative deltas carry an explicit plus sign.
pub fn percent_change(current: f64, previous: f64) -> String {
    if previous == 0.0 {
        return if current > 0.0 {
            "+100%".to_string()
        } else {
            "0%".to_string()
        };
    }
    let change = (current - previous) / previous * 100.0;
    let rounded = change.round() as i64;
    if change >= 0.0 {
        format!("+{rounded}%")
    } else {
        format!("{rounded}%")
    }
}

/// Previous calendar month for a 1-based (month, year) pair, January
/// wrapping to December of the prior year.
pub fn previous_month(month: u32, year: i32) -> (u32, i32) {
    if month == 1 {
        (12, year - 1)
    } else {
        (month - 1, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn settlement_derives_false_for_empty_row_set() {
        assert!(!any_row_settled(std::iter::empty()));
    }

    #[test]
    fn settlement_requires_at_least_one_settled_row() {
        assert!(!any_row_settled([false, false, false]));
        assert!(any_row_settled([false, true, false]));
        assert!(any_row_settled([true]));
    }

    #[test]
    fn classify_boundaries() {
        let today = date(2024, 6, 15);
        assert_eq!(classify(None, today), MembershipStatus::NoMembership);
        assert_eq!(
            classify(Some(date(2024, 6, 14)), today),
            MembershipStatus::Expired
        );
        // Ending exactly today is already expired.
        assert_eq!(
            classify(Some(today), today),
            MembershipStatus::Expired
        );
        assert_eq!(
            classify(Some(date(2024, 6, 16)), today),
            MembershipStatus::ExpiringSoon
        );
        assert_eq!(
            classify(Some(date(2024, 6, 22)), today),
            MembershipStatus::ExpiringSoon
        );
        assert_eq!(
            classify(Some(date(2024, 6, 23)), today),
            MembershipStatus::Active
        );
    }

    #[test]
    fn inactive_membership_is_never_unpaid() {
        let today = date(2024, 6, 15);
        let end = date(2024, 7, 1);
        assert!(!is_unpaid(false, false, end, today));
        assert!(!is_unpaid(false, true, end, today));
    }

    #[test]
    fn unpaid_requires_in_term_and_unsettled() {
        let today = date(2024, 6, 15);
        assert!(is_unpaid(true, false, date(2024, 7, 1), today));
        // End date today still counts as in term for the unpaid view.
        assert!(is_unpaid(true, false, today, today));
        assert!(!is_unpaid(true, false, date(2024, 6, 14), today));
        assert!(!is_unpaid(true, true, date(2024, 7, 1), today));
    }

    #[test]
    fn percent_change_formatting() {
        assert_eq!(percent_change(0.0, 0.0), "0%");
        assert_eq!(percent_change(5.0, 0.0), "+100%");
        assert_eq!(percent_change(15.0, 10.0), "+50%");
        assert_eq!(percent_change(5.0, 10.0), "-50%");
        assert_eq!(percent_change(10.0, 10.0), "+0%");
        assert_eq!(percent_change(0.0, 8.0), "-100%");
    }

    #[test]
    fn previous_month_wraps_january() {
        assert_eq!(previous_month(1, 2024), (12, 2023));
        assert_eq!(previous_month(8, 2026), (7, 2026));
    }
}
