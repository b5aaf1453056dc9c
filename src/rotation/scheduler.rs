//! Rotation Scheduler - decides what is on screen each tick
//!
//! The core is the pure `tick` function. `RotationScheduler` wraps it with
//! owned state, config and randomness for the display loop.
//!
//! Per tick:
//! 1. Advance the page counter
//! 2. Every Nth page is the instruction page
//! 3. Otherwise pick a lane by weighted draw, falling back recent -> older -> archive
//! 4. Page through recent in order; sample older/archive pages at random

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::random::RandomSource;
use super::state::{InstructionReason, RenderedPage, RotationState};
use crate::config::{LaneWeights, RotationConfig};
use crate::domain::Lane;
use crate::error::{Result, SignwallError};
use crate::lanes::{WorkingSet, clamp_index, max_pages, next_sequential, page_slice};

/// Whether `page_counter` lands on the instruction page
pub fn is_instruction_tick(page_counter: u64, frequency: u64) -> bool {
    frequency > 0 && page_counter > 0 && page_counter % frequency == 0
}

/// Lane whose weight band contains `r`.
///
/// Bands are laid out recent, older, archive over `[0, 1)`.
pub fn select_lane(r: f64, weights: &LaneWeights, has_archive: bool) -> Lane {
    let bands = weights.bands(has_archive);
    let mut upper = 0.0;
    for (lane, weight) in bands {
        upper += weight;
        if r < upper {
            return lane;
        }
    }

    // Rounding can leave the top of the range uncovered
    bands
        .iter()
        .rev()
        .find(|(_, weight)| *weight > 0.0)
        .map(|(lane, _)| *lane)
        .unwrap_or(Lane::Recent)
}

/// `chosen` if it has entries, else the first non-empty lane in priority order
pub fn resolve_lane(chosen: Lane, set: &WorkingSet) -> Result<Lane> {
    if chosen.is_entry_lane() && !set.lane(chosen).is_empty() {
        return Ok(chosen);
    }
    Lane::ENTRY_LANES
        .into_iter()
        .find(|lane| !set.lane(*lane).is_empty())
        .ok_or(SignwallError::EmptyWorkingSet)
}

/// Advance one tick: `(state, set, config, rng) -> (state', page)`
pub fn tick<R: RandomSource + ?Sized>(
    state: &RotationState,
    set: &WorkingSet,
    config: &RotationConfig,
    rng: &mut R,
) -> (RotationState, RenderedPage) {
    let page_counter = state.page_counter + 1;

    if is_instruction_tick(page_counter, config.instruction_page_frequency) {
        tracing::debug!(page_counter, "instruction page");
        return (
            RotationState::instruction(page_counter),
            instruction_page(set, InstructionReason::Scheduled),
        );
    }

    let chosen = select_lane(rng.next_unit(), &config.weights, set.has_archive_lane());
    let lane = match resolve_lane(chosen, set) {
        Ok(lane) => lane,
        Err(err) => {
            tracing::debug!(page_counter, error = %err, "nothing to show, falling back to instruction page");
            return (
                RotationState::instruction(page_counter),
                instruction_page(set, InstructionReason::EmptyWorkingSet),
            );
        }
    };

    let pages = max_pages(set.lane(lane).len(), config.page_size);
    let page_index = if lane.is_sequential() {
        next_sequential(state.current_page_index, pages)
    } else {
        rng.next_index(pages)
    };

    let next = RotationState {
        page_counter,
        current_lane: lane,
        current_page_index: page_index,
    };
    tracing::debug!(page_counter, chosen = %chosen, lane = %lane, page_index, pages, "rotation tick");

    let page = render(&next, set, config);
    (next, page)
}

/// Page for `state` against `set`, recovering from any mismatch between them.
///
/// An out-of-range index is clamped onto the last page; an emptied lane falls
/// back like a tick would; nothing left at all yields the instruction page.
pub fn render(state: &RotationState, set: &WorkingSet, config: &RotationConfig) -> RenderedPage {
    if state.current_lane == Lane::Instruction {
        return instruction_page(set, InstructionReason::Scheduled);
    }

    match entries_page(state.current_lane, state.current_page_index, set, config) {
        Ok(page) => page,
        Err(SignwallError::RenderInput {
            lane,
            page_index,
            max_pages,
        }) => {
            let clamped = clamp_index(page_index, max_pages);
            tracing::warn!(lane = %lane, page_index, clamped, "page index out of range, clamping");
            entries_page(lane, clamped, set, config)
                .unwrap_or_else(|_| instruction_page(set, InstructionReason::EmptyWorkingSet))
        }
        Err(err) => {
            tracing::debug!(error = %err, "cannot render entries, showing instruction page");
            instruction_page(set, InstructionReason::EmptyWorkingSet)
        }
    }
}

fn entries_page(lane: Lane, page_index: usize, set: &WorkingSet, config: &RotationConfig) -> Result<RenderedPage> {
    let lane = resolve_lane(lane, set)?;
    let entries = set.lane(lane);
    let slice = page_slice(entries, lane, page_index, config.page_size)?;
    Ok(RenderedPage::Entries {
        lane,
        page_index,
        max_pages: max_pages(entries.len(), config.page_size),
        entries: slice.to_vec(),
    })
}

fn instruction_page(set: &WorkingSet, reason: InstructionReason) -> RenderedPage {
    RenderedPage::Instruction {
        total_entries: set.total_entries(),
        recent_entries: set.recent().len(),
        reason,
    }
}

/// Owns rotation state for one display surface
pub struct RotationScheduler<R: RandomSource = StdRng> {
    state: RotationState,
    config: RotationConfig,
    rng: R,
}

impl RotationScheduler<StdRng> {
    /// Scheduler seeded from the OS
    pub fn new(config: RotationConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Reproducible scheduler for simulations
    pub fn seeded(config: RotationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> RotationScheduler<R> {
    pub fn with_rng(config: RotationConfig, rng: R) -> Self {
        Self {
            state: RotationState::new(),
            config,
            rng,
        }
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Run one tick against `set` and keep the resulting state
    pub fn advance(&mut self, set: &WorkingSet) -> RenderedPage {
        let (next, page) = tick(&self.state, set, &self.config, &mut self.rng);
        self.state = next;
        page
    }

    /// Page for the current state without advancing
    pub fn current_page(&self, set: &WorkingSet) -> RenderedPage {
        render(&self.state, set, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Entry, Snapshot};
    use crate::rotation::random::ScriptedRandom;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn entries(prefix: &str, n: usize, days_ago: i64) -> Vec<Entry> {
        (0..n)
            .map(|i| Entry::new(format!("{}{}", prefix, i), format!("{} {}", prefix, i), now() - Duration::days(days_ago)))
            .collect()
    }

    /// `recent` entries from yesterday, `older` from last month, optional archive
    fn working_set(recent: usize, older: usize, archive: Option<usize>) -> WorkingSet {
        let mut primary = entries("r", recent, 1);
        primary.extend(entries("o", older, 30));
        let mut snapshot = Snapshot::new(primary);
        if let Some(n) = archive {
            snapshot = snapshot.with_archive(entries("a", n, 900), n as u64);
        }
        WorkingSet::classify(snapshot, now(), Duration::days(7))
    }

    fn config() -> RotationConfig {
        RotationConfig::default()
    }

    fn no_interrupts() -> RotationConfig {
        RotationConfig {
            instruction_page_frequency: 0,
            ..RotationConfig::default()
        }
    }

    #[test]
    fn test_is_instruction_tick() {
        assert!(!is_instruction_tick(0, 10));
        assert!(!is_instruction_tick(9, 10));
        assert!(is_instruction_tick(10, 10));
        assert!(is_instruction_tick(30, 10));
        assert!(!is_instruction_tick(10, 0));
    }

    #[test]
    fn test_select_lane_bands() {
        let w = LaneWeights::default();
        assert_eq!(select_lane(0.0, &w, true), Lane::Recent);
        assert_eq!(select_lane(0.69, &w, true), Lane::Recent);
        assert_eq!(select_lane(0.70, &w, true), Lane::Older);
        assert_eq!(select_lane(0.94, &w, true), Lane::Older);
        assert_eq!(select_lane(0.96, &w, true), Lane::Archive);
        assert_eq!(select_lane(0.999_999, &w, true), Lane::Archive);
    }

    #[test]
    fn test_select_lane_two_lane_variant() {
        let w = LaneWeights::default();
        assert_eq!(select_lane(0.69, &w, false), Lane::Recent);
        assert_eq!(select_lane(0.96, &w, false), Lane::Older);
        assert_eq!(select_lane(0.999_999, &w, false), Lane::Older);
    }

    #[test]
    fn test_select_lane_rounding_gap() {
        let w = LaneWeights {
            recent: 0.3,
            older: 0.3,
            archive: 0.3999999,
        };
        assert_eq!(select_lane(0.9999999999, &w, true), Lane::Archive);
    }

    #[test]
    fn test_resolve_lane_fallback_order() {
        let only_older = working_set(0, 3, Some(0));
        assert_eq!(resolve_lane(Lane::Recent, &only_older).unwrap(), Lane::Older);
        assert_eq!(resolve_lane(Lane::Archive, &only_older).unwrap(), Lane::Older);

        let only_archive = working_set(0, 0, Some(2));
        assert_eq!(resolve_lane(Lane::Recent, &only_archive).unwrap(), Lane::Archive);

        let only_recent = working_set(2, 0, None);
        assert_eq!(resolve_lane(Lane::Older, &only_recent).unwrap(), Lane::Recent);
    }

    #[test]
    fn test_resolve_lane_all_empty() {
        let empty = working_set(0, 0, Some(0));
        assert!(matches!(resolve_lane(Lane::Recent, &empty), Err(SignwallError::EmptyWorkingSet)));
    }

    #[test]
    fn test_instruction_every_nth_page() {
        let set = working_set(10, 5, Some(4));
        let config = config();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = RotationState::new();

        for _ in 0..100 {
            let (next, page) = tick(&state, &set, &config, &mut rng);
            assert_eq!(next.page_counter, state.page_counter + 1);
            let expected = next.page_counter % 10 == 0;
            assert_eq!(page.is_instruction(), expected, "counter {}", next.page_counter);
            assert_eq!(next.current_lane == Lane::Instruction, expected);
            state = next;
        }
    }

    #[test]
    fn test_scenario_counter_ten_is_instruction() {
        let set = working_set(10, 5, None);
        let state = RotationState {
            page_counter: 9,
            current_lane: Lane::Older,
            current_page_index: 1,
        };
        let mut rng = ScriptedRandom::new().with_units([0.1]);

        let (next, page) = tick(&state, &set, &config(), &mut rng);
        assert_eq!(next, RotationState::instruction(10));
        assert_eq!(
            page,
            RenderedPage::Instruction {
                total_entries: 15,
                recent_entries: 10,
                reason: InstructionReason::Scheduled,
            }
        );
    }

    #[test]
    fn test_scenario_counter_one_recent_pages_forward() {
        let set = working_set(10, 5, None);
        assert_eq!(set.recent().len(), 10);
        assert_eq!(set.older().len(), 5);

        for prior in [0usize, 1] {
            let state = RotationState {
                page_counter: 0,
                current_lane: Lane::Recent,
                current_page_index: prior,
            };
            let mut rng = ScriptedRandom::new().with_units([0.1]);
            let (next, page) = tick(&state, &set, &config(), &mut rng);
            assert_eq!(next.page_counter, 1);
            assert_eq!(next.current_lane, Lane::Recent);
            assert_eq!(next.current_page_index, (prior + 1) % 2);
            assert_eq!(page.page_index(), Some((prior + 1) % 2));
        }
    }

    #[test]
    fn test_recent_pages_wrap_in_order() {
        let set = working_set(20, 5, None);
        let config = no_interrupts();
        let mut rng = ScriptedRandom::new().with_units(std::iter::repeat_n(0.0, 9));
        let mut state = RotationState {
            page_counter: 0,
            current_lane: Lane::Recent,
            current_page_index: 2,
        };

        let mut visited = Vec::new();
        for _ in 0..9 {
            let (next, _) = tick(&state, &set, &config, &mut rng);
            visited.push(next.current_page_index);
            state = next;
        }
        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_recent_page_contents() {
        let set = working_set(10, 0, None);
        let mut rng = ScriptedRandom::new().with_units([0.0]);
        let (_, page) = tick(&RotationState::new(), &set, &config(), &mut rng);

        let ids: Vec<&str> = page.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["r7", "r8", "r9"]);
    }

    #[test]
    fn test_older_page_is_sampled() {
        let set = working_set(3, 30, None);
        let mut rng = ScriptedRandom::new().with_units([0.8]).with_indices([3]);
        let (next, page) = tick(&RotationState::new(), &set, &config(), &mut rng);

        assert_eq!(next.current_lane, Lane::Older);
        assert_eq!(next.current_page_index, 3);
        match page {
            RenderedPage::Entries {
                lane,
                page_index,
                max_pages,
                entries,
            } => {
                assert_eq!(lane, Lane::Older);
                assert_eq!(page_index, 3);
                assert_eq!(max_pages, 5);
                assert_eq!(entries.len(), 7);
                assert_eq!(entries[0].id, "o21");
            }
            other => panic!("expected entries, got {:?}", other),
        }
    }

    #[test]
    fn test_archive_page_is_sampled() {
        let set = working_set(3, 3, Some(50));
        let mut rng = ScriptedRandom::new().with_units([0.97]).with_indices([7]);
        let (next, page) = tick(&RotationState::new(), &set, &config(), &mut rng);
        assert_eq!(next.current_lane, Lane::Archive);
        assert_eq!(next.current_page_index, 7);
        assert_eq!(page.entries().len(), 1);
        assert_eq!(page.entries()[0].id, "a49");
    }

    #[test]
    fn test_page_index_carries_across_lanes() {
        let set = working_set(21, 30, None);
        let state = RotationState {
            page_counter: 4,
            current_lane: Lane::Older,
            current_page_index: 2,
        };
        let mut rng = ScriptedRandom::new().with_units([0.0]);
        let (next, _) = tick(&state, &set, &config(), &mut rng);
        assert_eq!(next.current_lane, Lane::Recent);
        assert_eq!(next.current_page_index, 0);
    }

    #[test]
    fn test_empty_lane_falls_back() {
        let set = working_set(0, 4, None);
        let mut rng = ScriptedRandom::new().with_units([0.1]);
        let (next, page) = tick(&RotationState::new(), &set, &config(), &mut rng);
        assert_eq!(next.current_lane, Lane::Older);
        assert_eq!(page.lane(), Lane::Older);
        assert_eq!(page.entries().len(), 4);
    }

    #[test]
    fn test_all_empty_always_instruction() {
        let set = working_set(0, 0, Some(0));
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = RotationState::new();
        for _ in 0..50 {
            let (next, page) = tick(&state, &set, &config(), &mut rng);
            assert!(page.is_instruction());
            assert_eq!(next.current_lane, Lane::Instruction);
            assert_eq!(next.page_counter, state.page_counter + 1);
            state = next;
        }
    }

    #[test]
    fn test_all_empty_reason() {
        let set = WorkingSet::empty();
        let mut rng = ScriptedRandom::new().with_units([0.5]);
        let (_, page) = tick(&RotationState::new(), &set, &config(), &mut rng);
        assert_eq!(
            page,
            RenderedPage::Instruction {
                total_entries: 0,
                recent_entries: 0,
                reason: InstructionReason::EmptyWorkingSet,
            }
        );
    }

    #[test]
    fn test_weighted_selection_converges() {
        let set = working_set(30, 30, Some(30));
        let config = no_interrupts();
        let mut rng = StdRng::seed_from_u64(2025);
        let mut state = RotationState::new();
        let ticks = 10_000;
        let mut counts = [0usize; 3];

        for _ in 0..ticks {
            let (next, page) = tick(&state, &set, &config, &mut rng);
            match page.lane() {
                Lane::Recent => counts[0] += 1,
                Lane::Older => counts[1] += 1,
                Lane::Archive => counts[2] += 1,
                Lane::Instruction => panic!("instruction page with interrupts disabled"),
            }
            state = next;
        }

        let share = |n: usize| n as f64 / ticks as f64;
        assert!((share(counts[0]) - 0.70).abs() < 0.02, "recent {}", share(counts[0]));
        assert!((share(counts[1]) - 0.25).abs() < 0.02, "older {}", share(counts[1]));
        assert!((share(counts[2]) - 0.05).abs() < 0.02, "archive {}", share(counts[2]));
    }

    #[test]
    fn test_render_clamps_out_of_range_index() {
        let set = working_set(2, 3, None);
        let state = RotationState {
            page_counter: 3,
            current_lane: Lane::Older,
            current_page_index: 5,
        };
        let page = render(&state, &set, &config());
        assert_eq!(page.lane(), Lane::Older);
        assert_eq!(page.page_index(), Some(0));
        assert_eq!(page.entries().len(), 3);
    }

    #[test]
    fn test_render_vanished_lane_falls_back() {
        let set = working_set(4, 0, None);
        let state = RotationState {
            page_counter: 3,
            current_lane: Lane::Archive,
            current_page_index: 2,
        };
        let page = render(&state, &set, &config());
        assert_eq!(page.lane(), Lane::Recent);
        assert_eq!(page.page_index(), Some(0));
    }

    #[test]
    fn test_render_empty_set_is_instruction() {
        let page = render(&RotationState::new(), &WorkingSet::empty(), &config());
        assert!(page.is_instruction());
    }

    #[test]
    fn test_scheduler_advance_keeps_state() {
        let set = working_set(10, 5, None);
        let mut scheduler = RotationScheduler::with_rng(config(), ScriptedRandom::new());
        assert_eq!(scheduler.state().page_counter, 0);

        let initial = scheduler.current_page(&set);
        assert_eq!(initial.lane(), Lane::Recent);
        assert_eq!(initial.page_index(), Some(0));

        let page = scheduler.advance(&set);
        assert_eq!(scheduler.state().page_counter, 1);
        assert_eq!(page.page_index(), Some(1));
        assert_eq!(scheduler.current_page(&set), page);
    }

    #[test]
    fn test_seeded_schedulers_agree() {
        let set = working_set(10, 40, Some(40));
        let mut a = RotationScheduler::seeded(config(), 77);
        let mut b = RotationScheduler::seeded(config(), 77);
        for _ in 0..25 {
            assert_eq!(a.advance(&set), b.advance(&set));
        }
        assert_eq!(a.state(), b.state());
    }
}
