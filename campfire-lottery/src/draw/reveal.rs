use super::{DrawResult, Slot};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// One step of a draw: the result to show, once `delay` has elapsed since
/// the previous step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    pub result: DrawResult,
    pub delay: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    NoEligibleParticipants,
    Armed,
    Revealing { next: usize },
    Done,
}

/// A draw in progress, advanced one reveal at a time.
///
/// The first item always comes without delay: either the lone
/// `NoEligibleParticipants` slot, or every slot pending. Each following item
/// reveals one more slot after the reveal delay.
pub struct Draw<R> {
    pool: Vec<String>,
    winners: HashSet<String>,
    slots: Vec<Slot>,
    phase: Phase,
    rng: R,
    reveal_delay: Duration,
}

impl<R: Rng> Draw<R> {
    pub fn new(pool: Vec<String>, draw_count: usize, rng: R, reveal_delay: Duration) -> Self {
        let phase = if pool.is_empty() {
            Phase::NoEligibleParticipants
        } else {
            Phase::Armed
        };
        debug!(pool = pool.len(), draw_count, "draw armed");
        Self {
            pool,
            winners: HashSet::new(),
            slots: vec![Slot::Pending; draw_count],
            phase,
            rng,
            reveal_delay,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn paced<P: Pacer>(self, pacer: P) -> Paced<Self, P> {
        Paced { inner: self, pacer }
    }

    fn reveal(&mut self, next: usize) -> Reveal {
        // winners are excluded by name: every pool entry of a winner goes,
        // while the others keep their full weight
        let candidates: Vec<&String> = self
            .pool
            .iter()
            .filter(|name| !self.winners.contains(*name))
            .collect();

        match candidates.choose(&mut self.rng).map(|name| (*name).clone()) {
            Some(winner) => {
                debug!(slot = next, %winner, remaining = candidates.len(), "winner drawn");
                if let Some(slot) = self.slots.get_mut(next) {
                    *slot = Slot::Winner(winner.clone());
                }
                self.winners.insert(winner);
                self.phase = if next + 1 < self.slots.len() {
                    Phase::Revealing { next: next + 1 }
                } else {
                    Phase::Done
                };
            }
            None => {
                debug!(slot = next, "no more participants");
                for slot in self.slots.iter_mut().skip(next) {
                    *slot = Slot::NoMoreParticipants;
                }
                self.phase = Phase::Done;
            }
        }
        if self.phase == Phase::Done {
            info!(winners = self.winners.len(), slots = self.slots.len(), "draw finished");
        }

        Reveal {
            result: DrawResult::from(self.slots.clone()),
            delay: self.reveal_delay,
        }
    }
}

impl<R: Rng> Iterator for Draw<R> {
    type Item = Reveal;

    fn next(&mut self) -> Option<Self::Item> {
        match self.phase {
            Phase::NoEligibleParticipants => {
                info!("no eligible participants");
                self.phase = Phase::Done;
                Some(Reveal {
                    result: DrawResult::from(vec![Slot::NoEligibleParticipants]),
                    delay: Duration::ZERO,
                })
            }
            Phase::Armed => {
                self.phase = if self.slots.is_empty() {
                    Phase::Done
                } else {
                    Phase::Revealing { next: 0 }
                };
                Some(Reveal {
                    result: DrawResult::from(self.slots.clone()),
                    delay: Duration::ZERO,
                })
            }
            Phase::Revealing { next } => Some(self.reveal(next)),
            Phase::Done => None,
        }
    }
}

/// Waits between reveals.
pub trait Pacer {
    fn wait(&mut self, delay: Duration);
}

/// Blocks the current thread for the whole delay.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Reveals everything at once.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn wait(&mut self, _delay: Duration) {}
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn wait(&mut self, delay: Duration) {
        (**self).wait(delay)
    }
}

/// Iterator adapter that honours each reveal's delay before yielding it.
pub struct Paced<I, P> {
    inner: I,
    pacer: P,
}

impl<I: Iterator<Item = Reveal>, P: Pacer> Iterator for Paced<I, P> {
    type Item = DrawResult;

    fn next(&mut self) -> Option<Self::Item> {
        let reveal = self.inner.next()?;
        self.pacer.wait(reveal.delay);
        Some(reveal.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{run_draw, seeded_rng, ParticipationMode, Seed};
    use crate::roster::Roster;
    use crate::testing::meetup;
    use proptest::prelude::*;
    use rand::Rng;
    use test_strategy::proptest;

    const DELAY: Duration = Duration::from_secs(1);

    fn names(pool: &[&str]) -> Vec<String> {
        pool.iter().map(|n| n.to_string()).collect()
    }

    #[derive(Default)]
    struct RecordingPacer(Vec<Duration>);

    impl Pacer for RecordingPacer {
        fn wait(&mut self, delay: Duration) {
            self.0.push(delay);
        }
    }

    #[test]
    fn empty_pool_yields_single_sentinel_without_delay() {
        let roster = Roster::derive(&[]);
        let reveals: Vec<_> =
            run_draw(&roster, 1, ParticipationMode::Unique, seeded_rng([0; 32]), DELAY).collect();

        assert_eq!(
            reveals,
            vec![Reveal {
                result: DrawResult::from(vec![Slot::NoEligibleParticipants]),
                delay: Duration::ZERO,
            }]
        );
    }

    #[test]
    fn reveals_one_slot_at_a_time() {
        let mut draw = Draw::new(names(&["A", "B", "C"]), 3, seeded_rng([1; 32]), DELAY);

        let first = draw.next().unwrap();
        assert_eq!(first.delay, Duration::ZERO);
        assert_eq!(first.result.pending(), 3);

        for revealed in 1..=3 {
            let reveal = draw.next().unwrap();
            assert_eq!(reveal.delay, DELAY);
            assert_eq!(reveal.result.winners().count(), revealed);
            assert_eq!(reveal.result.pending(), 3 - revealed);
            // revealed slots come first
            assert!(reveal.result.slots()[..revealed]
                .iter()
                .all(|slot| slot.winner().is_some()));
        }
        assert!(draw.is_finished());
        assert_eq!(draw.next(), None);
    }

    #[test]
    fn overflow_slots_become_sentinels() {
        let draw = Draw::new(names(&["A", "B"]), 4, seeded_rng([2; 32]), DELAY);
        let last = draw.last().unwrap().result;

        assert_eq!(last.winners().count(), 2);
        assert_eq!(
            &last.slots()[2..],
            &[Slot::NoMoreParticipants, Slot::NoMoreParticipants]
        );
    }

    #[test]
    fn winner_loses_all_pool_entries() {
        let draw = Draw::new(names(&["A", "A", "A"]), 2, seeded_rng([3; 32]), DELAY);
        let last = draw.last().unwrap().result;

        assert_eq!(
            last.slots(),
            &[Slot::Winner("A".to_string()), Slot::NoMoreParticipants]
        );
    }

    #[test]
    fn paced_waits_before_each_reveal() {
        let mut pacer = RecordingPacer::default();
        let results: Vec<_> = Draw::new(names(&["A", "B", "C"]), 2, seeded_rng([4; 32]), DELAY)
            .paced(&mut pacer)
            .collect();

        assert_eq!(results.len(), 3);
        assert_eq!(pacer.0, vec![Duration::ZERO, DELAY, DELAY]);
    }

    #[test]
    fn same_seed_same_winners() {
        let roster = Roster::derive(&[meetup("m1", &["A", "B", "C", "D", "E"])]);
        let run = |seed: Seed| {
            run_draw(&roster, 3, ParticipationMode::Unique, seeded_rng(seed), DELAY)
                .last()
                .unwrap()
                .result
        };
        assert_eq!(run([9; 32]), run([9; 32]));
    }

    #[test]
    fn per_meetup_scenario_draws_four_distinct_names() {
        let roster = Roster::derive(&[
            meetup("m1", &["A", "B", "C"]),
            meetup("m2", &["B", "C", "D"]),
        ]);
        let draw = run_draw(&roster, 4, ParticipationMode::PerMeetup, seeded_rng([5; 32]), DELAY);
        assert_eq!(draw.pool().len(), 6);

        let mut winners: Vec<String> = draw
            .last()
            .unwrap()
            .result
            .winners()
            .map(str::to_string)
            .collect();
        winners.sort();
        assert_eq!(winners, names(&["A", "B", "C", "D"]));
    }

    #[test]
    fn per_meetup_favours_regulars() {
        let roster = Roster::derive(&[
            meetup("m1", &["A", "B"]),
            meetup("m2", &["A"]),
            meetup("m3", &["A"]),
        ]);
        let mut rng = seeded_rng([6; 32]);
        let mut wins_a = 0;
        let mut wins_b = 0;
        for _ in 0..2_000 {
            let seed: Seed = rng.gen();
            let result = run_draw(&roster, 1, ParticipationMode::PerMeetup, seeded_rng(seed), DELAY)
                .last()
                .unwrap()
                .result;
            let winner = result.winners().next();
            match winner {
                Some("A") => wins_a += 1,
                Some("B") => wins_b += 1,
                other => panic!("unexpected winner {:?}", other),
            }
        }
        // expected 3:1
        assert!(wins_a > 2 * wins_b, "A won {} times, B {}", wins_a, wins_b);
    }

    #[test]
    fn remaining_entries_keep_their_weight_after_a_win() {
        let mut rng = seeded_rng([8; 32]);
        let mut wins_b = 0;
        let mut wins_c = 0;
        for _ in 0..5_000 {
            let seed: Seed = rng.gen();
            let result = Draw::new(names(&["X", "B", "B", "B", "C"]), 2, seeded_rng(seed), DELAY)
                .last()
                .unwrap()
                .result;
            if result.slots()[0] != Slot::Winner("X".to_string()) {
                continue;
            }
            let second = result.slots()[1].winner().map(str::to_string);
            match second.as_deref() {
                Some("B") => wins_b += 1,
                Some("C") => wins_c += 1,
                other => panic!("unexpected second winner {:?}", other),
            }
        }
        // B holds 3 of the 4 entries left once X is out
        assert!(wins_c > 0);
        assert!(wins_b > 2 * wins_c, "B won {} times, C {}", wins_b, wins_c);
    }

    #[test]
    fn inactive_participant_never_wins() {
        let mut roster = Roster::derive(&[meetup("m1", &["A", "B", "C"]), meetup("m2", &["A"])]);
        roster.toggle("A");
        for seed in 0..200u8 {
            let draw = run_draw(
                &roster,
                2,
                ParticipationMode::PerMeetup,
                seeded_rng([seed; 32]),
                DELAY,
            );
            let result = draw.last().unwrap().result;
            assert!(result.winners().all(|w| w != "A"));
        }
    }

    #[proptest]
    fn winners_are_distinct_active_names(
        #[strategy(prop::collection::vec(any::<meetup_lib::MeetupRecord>(), 0..5))] meetups: Vec<
            meetup_lib::MeetupRecord,
        >,
        #[strategy(prop::collection::vec("[a-l]", 0..4))] inactive: Vec<String>,
        #[strategy(1..60usize)] draw_count: usize,
        unique: bool,
        seed: [u8; 32],
    ) {
        let mut roster = Roster::derive(&meetups);
        for id in &inactive {
            roster.toggle(id);
        }
        let mode = if unique {
            ParticipationMode::Unique
        } else {
            ParticipationMode::PerMeetup
        };
        let active: HashSet<String> = roster.active().map(|p| p.name.clone()).collect();

        let reveals: Vec<_> =
            run_draw(&roster, draw_count, mode, seeded_rng(seed), DELAY).collect();
        let last = reveals.last().unwrap();

        if active.is_empty() {
            prop_assert_eq!(reveals.len(), 1);
            prop_assert_eq!(last.result.slots(), &[Slot::NoEligibleParticipants]);
        } else {
            let winners: Vec<&str> = last.result.winners().collect();
            let distinct: HashSet<&str> = winners.iter().copied().collect();
            prop_assert_eq!(distinct.len(), winners.len());
            prop_assert!(winners.iter().all(|w| active.contains(*w)));
            prop_assert_eq!(winners.len(), draw_count.min(active.len()));
            prop_assert_eq!(last.result.pending(), 0);
            prop_assert_eq!(last.result.len(), draw_count);
        }
    }
}
