use std::collections::HashMap;

use crate::db::models::{
    ClinicType, ClinicalSession, MeetingType, ServiceAgeGroup, SessionCandidate, ShowStatus,
};

/// Candidates with equal keys describe the same kind of session.
/// Month and year are uniform within an import batch and not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    staff_id: String,
    clinic_type: ClinicType,
    meeting_type: MeetingType,
    show_status: ShowStatus,
    service_age_group: ServiceAgeGroup,
    duration_minutes: u32,
}

impl From<&SessionCandidate> for SessionKey {
    fn from(candidate: &SessionCandidate) -> Self {
        Self {
            staff_id: candidate.staff_id.clone(),
            clinic_type: candidate.clinic_type,
            meeting_type: candidate.meeting_type,
            show_status: candidate.show_status,
            service_age_group: candidate.service_age_group,
            duration_minutes: candidate.duration_minutes,
        }
    }
}

/// Merge candidates into canonical sessions, summing counts per key.
///
/// Output follows first-seen order of each key, but callers must not depend on it.
pub fn aggregate(candidates: Vec<SessionCandidate>) -> Vec<ClinicalSession> {
    let mut positions: HashMap<SessionKey, usize> = HashMap::new();
    let mut sessions: Vec<ClinicalSession> = Vec::new();

    for candidate in candidates {
        let key = SessionKey::from(&candidate);
        match positions.get(&key) {
            Some(&position) => sessions[position].count += candidate.count,
            None => {
                positions.insert(key, sessions.len());
                sessions.push(ClinicalSession::from(candidate));
            }
        }
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(staff_id: &str, meeting_type: MeetingType, duration: u32) -> SessionCandidate {
        SessionCandidate {
            staff_id: staff_id.into(),
            clinic_type: ClinicType::Tlv,
            meeting_type,
            show_status: ShowStatus::Show,
            service_age_group: ServiceAgeGroup::Adult,
            count: 1,
            duration_minutes: duration,
            month: 3,
            year: 2024,
        }
    }

    fn counts(sessions: &[ClinicalSession]) -> Vec<(String, &'static str, u32, i64)> {
        let mut out: Vec<_> = sessions
            .iter()
            .map(|s| (s.staff_id.clone(), s.meeting_type.as_str(), s.duration_minutes, s.count))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn merges_identical_candidates() {
        let sessions = aggregate(vec![
            candidate("s1", MeetingType::FollowUp, 50),
            candidate("s1", MeetingType::FollowUp, 50),
            candidate("s1", MeetingType::Intake, 50),
            candidate("s1", MeetingType::FollowUp, 45),
            candidate("s2", MeetingType::FollowUp, 50),
            candidate("s1", MeetingType::FollowUp, 50),
        ]);

        assert_eq!(sessions.len(), 4);
        assert_eq!(sessions[0].count, 3);
        assert_eq!(sessions[0].meeting_type, MeetingType::FollowUp);
        assert_eq!(sessions.iter().map(|s| s.count).sum::<i64>(), 6);
    }

    #[test]
    fn input_order_does_not_change_the_result() {
        let input = vec![
            candidate("s1", MeetingType::FollowUp, 50),
            candidate("s2", MeetingType::Intake, 60),
            candidate("s1", MeetingType::FollowUp, 50),
            candidate("s1", MeetingType::Intake, 50),
            candidate("s2", MeetingType::Intake, 60),
            candidate("s2", MeetingType::FollowUp, 60),
        ];
        let expected = counts(&aggregate(input.clone()));

        let mut reversed = input.clone();
        reversed.reverse();
        assert_eq!(counts(&aggregate(reversed)), expected);

        let mut rotated = input;
        rotated.rotate_left(2);
        assert_eq!(counts(&aggregate(rotated)), expected);
    }

    #[test]
    fn empty_input_yields_no_sessions() {
        assert!(aggregate(Vec::new()).is_empty());
    }
}
