use crate::db::models::{
    ClinicalSession, ClinicalStaffRates, MeetingType, ServiceAgeGroup, ShowStatus,
};

/// Unset, zero and NaN rates all count as missing.
fn usable(rate: Option<f64>) -> Option<f64> {
    rate.filter(|value| *value != 0.0 && !value.is_nan())
}

/// Per-unit rate for a (show status, meeting type, age group) combination,
/// falling back to the age-agnostic legacy field when the primary is missing.
pub fn unit_rate(
    rates: &ClinicalStaffRates,
    show_status: ShowStatus,
    meeting_type: MeetingType,
    age_group: ServiceAgeGroup,
) -> f64 {
    use MeetingType::{FollowUp, Intake};
    use ServiceAgeGroup::{Adult, Child};
    use ShowStatus::{NoShow, Show};

    let (primary, legacy) = match (show_status, meeting_type, age_group) {
        (Show, Intake, Adult) => (rates.adult_intake_rate, rates.intake_session_rate),
        (Show, Intake, Child) => (rates.child_intake_rate, rates.intake_session_rate),
        (Show, FollowUp, Adult) => (rates.adult_follow_up_rate, rates.follow_up_session_rate),
        (Show, FollowUp, Child) => (rates.child_follow_up_rate, rates.follow_up_session_rate),
        (NoShow, Intake, Adult) => (rates.adult_no_show_intake_rate, rates.no_show_intake_rate),
        (NoShow, Intake, Child) => (rates.child_no_show_intake_rate, rates.no_show_intake_rate),
        (NoShow, FollowUp, Adult) => (
            rates.adult_no_show_follow_up_rate,
            rates.no_show_follow_up_rate,
        ),
        (NoShow, FollowUp, Child) => (
            rates.child_no_show_follow_up_rate,
            rates.no_show_follow_up_rate,
        ),
    };

    usable(primary).or(usable(legacy)).unwrap_or(0.0)
}

/// Cost of a session under a staff member's rates.
///
/// Returns 0 when `rates` is absent; callers that need to tell "no rates" apart
/// from a genuine zero must check `rates` themselves.
pub fn session_cost(session: &ClinicalSession, rates: Option<&ClinicalStaffRates>) -> f64 {
    let Some(rates) = rates else {
        return 0.0;
    };
    if session.count <= 0 {
        return 0.0;
    }

    let rate = unit_rate(
        rates,
        session.show_status,
        session.meeting_type,
        session.service_age_group,
    );
    (rate * session.count as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ClinicType;
    use chrono::NaiveDate;

    fn rates() -> ClinicalStaffRates {
        ClinicalStaffRates {
            staff_id: "s1".into(),
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ..Default::default()
        }
    }

    fn session(
        meeting_type: MeetingType,
        show_status: ShowStatus,
        count: i64,
        age_group: ServiceAgeGroup,
    ) -> ClinicalSession {
        ClinicalSession {
            staff_id: "s1".into(),
            clinic_type: ClinicType::Tlv,
            meeting_type,
            show_status,
            service_age_group: age_group,
            count,
            duration_minutes: 60,
            month: 3,
            year: 2024,
        }
    }

    #[test]
    fn adult_intake_show() {
        let rates = ClinicalStaffRates {
            adult_intake_rate: Some(600.0),
            ..rates()
        };
        let s = session(MeetingType::Intake, ShowStatus::Show, 2, ServiceAgeGroup::Adult);
        assert_eq!(session_cost(&s, Some(&rates)), 1200.0);
    }

    #[test]
    fn child_follow_up_show() {
        let rates = ClinicalStaffRates {
            child_follow_up_rate: Some(450.0),
            ..rates()
        };
        let s = session(MeetingType::FollowUp, ShowStatus::Show, 3, ServiceAgeGroup::Child);
        assert_eq!(session_cost(&s, Some(&rates)), 1350.0);
    }

    #[test]
    fn adult_intake_no_show() {
        let rates = ClinicalStaffRates {
            adult_no_show_intake_rate: Some(300.0),
            ..rates()
        };
        let s = session(MeetingType::Intake, ShowStatus::NoShow, 1, ServiceAgeGroup::Adult);
        assert_eq!(session_cost(&s, Some(&rates)), 300.0);
    }

    #[test]
    fn child_follow_up_no_show() {
        let rates = ClinicalStaffRates {
            child_no_show_follow_up_rate: Some(225.0),
            ..rates()
        };
        let s = session(MeetingType::FollowUp, ShowStatus::NoShow, 2, ServiceAgeGroup::Child);
        assert_eq!(session_cost(&s, Some(&rates)), 450.0);
    }

    #[test]
    fn missing_rates_cost_nothing() {
        let s = session(MeetingType::Intake, ShowStatus::Show, 5, ServiceAgeGroup::Adult);
        assert_eq!(session_cost(&s, None), 0.0);
    }

    #[test]
    fn non_positive_counts_cost_nothing() {
        let rates = ClinicalStaffRates {
            adult_intake_rate: Some(600.0),
            ..rates()
        };
        for count in [0, -1] {
            let s = session(MeetingType::Intake, ShowStatus::Show, count, ServiceAgeGroup::Adult);
            assert_eq!(session_cost(&s, Some(&rates)), 0.0);
        }
    }

    #[test]
    fn missing_age_group_prices_as_adult() {
        let rates = ClinicalStaffRates {
            adult_intake_rate: Some(600.0),
            child_intake_rate: Some(999.0),
            ..rates()
        };
        let s: ClinicalSession = serde_json::from_value(serde_json::json!({
            "staffId": "s1",
            "clinicType": "TLV",
            "meetingType": "intake",
            "showStatus": "show",
            "count": 1,
            "durationMinutes": 60,
            "month": 3,
            "year": 2024
        }))
        .unwrap();
        assert_eq!(session_cost(&s, Some(&rates)), 600.0);
    }

    #[test]
    fn falls_back_to_legacy_fields() {
        let rates = ClinicalStaffRates {
            adult_intake_rate: Some(0.0),
            intake_session_rate: Some(500.0),
            follow_up_session_rate: Some(400.0),
            no_show_intake_rate: Some(150.0),
            no_show_follow_up_rate: Some(100.0),
            ..rates()
        };

        let cases = [
            (MeetingType::Intake, ShowStatus::Show, ServiceAgeGroup::Adult, 500.0),
            (MeetingType::Intake, ShowStatus::Show, ServiceAgeGroup::Child, 500.0),
            (MeetingType::FollowUp, ShowStatus::Show, ServiceAgeGroup::Adult, 400.0),
            (MeetingType::FollowUp, ShowStatus::Show, ServiceAgeGroup::Child, 400.0),
            (MeetingType::Intake, ShowStatus::NoShow, ServiceAgeGroup::Adult, 150.0),
            (MeetingType::Intake, ShowStatus::NoShow, ServiceAgeGroup::Child, 150.0),
            (MeetingType::FollowUp, ShowStatus::NoShow, ServiceAgeGroup::Adult, 100.0),
            (MeetingType::FollowUp, ShowStatus::NoShow, ServiceAgeGroup::Child, 100.0),
        ];
        for (meeting, status, age, unit) in cases {
            let s = session(meeting, status, 3, age);
            assert_eq!(session_cost(&s, Some(&rates)), unit * 3.0, "{meeting:?} {status:?} {age:?}");
        }
    }

    #[test]
    fn primary_wins_over_legacy() {
        let rates = ClinicalStaffRates {
            child_intake_rate: Some(700.0),
            intake_session_rate: Some(500.0),
            ..rates()
        };
        let s = session(MeetingType::Intake, ShowStatus::Show, 1, ServiceAgeGroup::Child);
        assert_eq!(session_cost(&s, Some(&rates)), 700.0);
    }

    #[test]
    fn both_fields_missing_costs_zero() {
        let rates = ClinicalStaffRates {
            adult_follow_up_rate: Some(0.0),
            follow_up_session_rate: None,
            ..rates()
        };
        let s = session(MeetingType::FollowUp, ShowStatus::Show, 4, ServiceAgeGroup::Adult);
        assert_eq!(session_cost(&s, Some(&rates)), 0.0);
    }

    #[test]
    fn cost_is_linear_in_count() {
        let rates = ClinicalStaffRates {
            adult_follow_up_rate: Some(333.33),
            child_no_show_intake_rate: Some(123.45),
            ..rates()
        };
        for k in 1..=25 {
            for (meeting, status, age) in [
                (MeetingType::FollowUp, ShowStatus::Show, ServiceAgeGroup::Adult),
                (MeetingType::Intake, ShowStatus::NoShow, ServiceAgeGroup::Child),
            ] {
                let single = session_cost(&session(meeting, status, k, age), Some(&rates));
                let double = session_cost(&session(meeting, status, 2 * k, age), Some(&rates));
                assert_eq!(double, 2.0 * single);
            }
        }
    }

    #[test]
    fn negative_rates_never_produce_negative_cost() {
        let rates = ClinicalStaffRates {
            adult_intake_rate: Some(-50.0),
            ..rates()
        };
        let s = session(MeetingType::Intake, ShowStatus::Show, 2, ServiceAgeGroup::Adult);
        assert_eq!(session_cost(&s, Some(&rates)), 0.0);
    }
}
