use super::ParticipationMode;
use crate::roster::Roster;

/// Names eligible for a draw.
///
/// In `PerMeetup` mode every active participant appears once per meetup
/// attended, so the pool is a multiset and its length is the number of
/// active participations.
pub fn eligibility_pool(roster: &Roster, mode: ParticipationMode) -> Vec<String> {
    roster
        .active()
        .flat_map(|participant| {
            let entries = match mode {
                ParticipationMode::Unique => 1,
                ParticipationMode::PerMeetup => participant.meetup_count as usize,
            };
            std::iter::repeat(participant.name.clone()).take(entries)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::meetup;

    #[test]
    fn per_meetup_pool_is_weighted() {
        let roster = Roster::derive(&[
            meetup("m1", &["A", "B", "C"]),
            meetup("m2", &["B", "C", "D"]),
        ]);

        assert_eq!(
            eligibility_pool(&roster, ParticipationMode::PerMeetup),
            vec!["A", "B", "B", "C", "C", "D"]
        );
        assert_eq!(
            eligibility_pool(&roster, ParticipationMode::Unique),
            vec!["A", "B", "C", "D"]
        );
    }

    #[test]
    fn inactive_participants_are_left_out() {
        let mut roster = Roster::derive(&[meetup("m1", &["A", "B"]), meetup("m2", &["B"])]);
        roster.toggle("B");

        assert_eq!(eligibility_pool(&roster, ParticipationMode::PerMeetup), vec!["A"]);
        assert_eq!(
            eligibility_pool(&roster, ParticipationMode::PerMeetup).len() as u64,
            roster.statistics().participations.active
        );
    }
}
