//! Integration tests for the vessel widget model.
//!
//! These drive the public `Vessel` API the way the frame loop and the
//! pointer handlers do, on an explicit virtual clock.

use std::time::Duration;

use proptest::prelude::*;
use tiltbar::vessel::{Physics, TriggerState, Vessel, GRAVITY_FACTOR};

const FRAME: Duration = Duration::from_millis(16);

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Drag the pointer so the tilt ends at `target` degrees.
fn tilt_to(vessel: &mut Vessel, target: f64) {
    let delta = (target - vessel.tilt().degrees()) / GRAVITY_FACTOR;
    vessel.pointer_down(0.0);
    vessel.pointer_move(delta);
    vessel.pointer_up();
}

/// Tick frame by frame until the trigger count moves past `count`.
/// Returns the time of the triggering frame.
fn tick_until_trigger(vessel: &mut Vessel, now: &mut Duration, count: u8) -> Duration {
    for _ in 0..10_000 {
        *now += FRAME;
        vessel.tick(*now);
        if vessel.trigger_count() > count {
            return *now;
        }
    }
    panic!("trigger {} never fired", count + 1);
}

/// Voice-over on, tilted up, and run until the first response starts.
fn first_trigger() -> (Vessel, Duration) {
    let mut vessel = Vessel::default();
    vessel.set_voiceover(true);
    tilt_to(&mut vessel, 60.0);
    let mut now = Duration::ZERO;
    let at = tick_until_trigger(&mut vessel, &mut now, 0);
    (vessel, at)
}

// ============================================================================
// Physics
// ============================================================================

#[test]
fn test_thirty_degree_tick_adds_quarter() {
    let mut vessel = Vessel::default();
    tilt_to(&mut vessel, 30.0);
    vessel.tick(FRAME);
    assert!((vessel.fill().value() - 0.25).abs() < 1e-9);
}

#[test]
fn test_resting_tilt_leaves_fill_unchanged() {
    for tilt in [0.0, 1.0, -1.0, 0.5] {
        let mut vessel = Vessel::default();
        vessel.set_voiceover(true);
        tilt_to(&mut vessel, tilt);
        vessel.tick(FRAME);
        assert_eq!(vessel.fill().value(), 20.0, "tilt {}", tilt);
    }
}

#[test]
fn test_fill_saturates_at_bounds() {
    let mut vessel = Vessel::default();
    tilt_to(&mut vessel, 90.0);
    for frame in 1..=400 {
        vessel.tick(FRAME * frame);
    }
    assert_eq!(vessel.fill().value(), 100.0);

    tilt_to(&mut vessel, -90.0);
    for frame in 401..=800 {
        vessel.tick(FRAME * frame);
    }
    assert_eq!(vessel.fill().value(), 0.0);
}

#[test]
fn test_custom_gravity_factor() {
    let mut vessel = Vessel::new(Physics::new(1.0, 1.0), 80.0);
    vessel.pointer_down(0.0);
    vessel.pointer_move(30.0);
    assert_eq!(vessel.tilt().degrees(), 30.0);
    vessel.tick(FRAME);
    assert!((vessel.fill().value() - 0.5).abs() < 1e-9);
}

// ============================================================================
// Pointer
// ============================================================================

#[test]
fn test_drag_forty_pixels_down() {
    let mut vessel = Vessel::default();
    vessel.pointer_down(100.0);
    vessel.pointer_move(140.0);
    assert_eq!(vessel.tilt().degrees(), 20.0);
}

#[test]
fn test_drag_accumulates_from_last_position() {
    let mut vessel = Vessel::default();
    vessel.pointer_down(0.0);
    vessel.pointer_move(10.0);
    vessel.pointer_move(30.0);
    vessel.pointer_move(20.0);
    assert_eq!(vessel.tilt().degrees(), 10.0);
}

#[test]
fn test_huge_drag_is_clamped() {
    let mut vessel = Vessel::default();
    vessel.pointer_down(0.0);
    vessel.pointer_move(1e12);
    assert_eq!(vessel.tilt().degrees(), 90.0);
    vessel.pointer_move(-1e12);
    assert_eq!(vessel.tilt().degrees(), -90.0);
}

#[test]
fn test_move_after_release_is_ignored() {
    let mut vessel = Vessel::default();
    vessel.pointer_down(0.0);
    vessel.pointer_up();
    vessel.pointer_move(50.0);
    assert_eq!(vessel.tilt().degrees(), 0.0);
}

// ============================================================================
// Mode toggle
// ============================================================================

#[test]
fn test_enable_and_disable_baselines() {
    let mut vessel = Vessel::default();
    vessel.set_voiceover(true);
    assert_eq!(vessel.fill().value(), 20.0);
    assert_eq!(vessel.tilt().degrees(), -20.0);
    assert_eq!(vessel.message(), "");
    assert_eq!(vessel.trigger_state(), TriggerState::Idle);

    vessel.set_voiceover(false);
    assert_eq!(vessel.fill().value(), 0.0);
    assert_eq!(vessel.tilt().degrees(), 0.0);
    assert_eq!(vessel.message(), "");
}

#[test]
fn test_toggle_off_mid_sequence_cancels_script() {
    let (mut vessel, at) = first_trigger();
    vessel.tick(at + ms(500));
    assert_eq!(vessel.message(), "hey! dont touch my paper!");

    vessel.set_voiceover(false);
    assert_eq!(vessel.pending_timers(), 0);

    for step in [1000, 3000, 5000, 8000] {
        vessel.tick(at + ms(step));
        assert_eq!(vessel.message(), "", "at +{}ms", step);
    }
    assert_eq!(vessel.trigger_count(), 0);
}

#[test]
fn test_toggle_back_on_does_not_revive_old_script() {
    let (mut vessel, at) = first_trigger();
    vessel.set_voiceover(false);
    vessel.set_voiceover(true);

    vessel.tick(at + ms(1000));
    assert_eq!(vessel.message(), "");
    assert_eq!(vessel.trigger_count(), 0);
    assert!(!vessel.is_trigger_busy());
}

// ============================================================================
// Voice-over script
// ============================================================================

#[test]
fn test_full_voiceover_sequence() {
    // Step 1
    let (mut vessel, t1) = first_trigger();
    assert_eq!(vessel.trigger_count(), 1);
    assert!(vessel.is_trigger_busy());
    assert_eq!(vessel.tilt().degrees(), -60.0);
    assert_eq!(vessel.message(), "hey! dont touch my paper!");

    vessel.tick(t1 + ms(999));
    assert_eq!(vessel.message(), "hey! dont touch my paper!");
    vessel.tick(t1 + ms(1000));
    assert_eq!(vessel.message(), "I mean progressbar!");
    vessel.tick(t1 + ms(2999));
    assert_eq!(vessel.message(), "I mean progressbar!");
    vessel.tick(t1 + ms(3000));
    assert_eq!(vessel.message(), "that's much better");
    vessel.tick(t1 + ms(4999));
    assert!(vessel.is_trigger_busy());
    vessel.tick(t1 + ms(5000));
    assert_eq!(vessel.message(), "");
    assert!(!vessel.is_trigger_busy());
    assert_eq!(vessel.trigger_count(), 1);

    // Step 2
    let mut now = t1 + ms(5000);
    tilt_to(&mut vessel, 60.0);
    let t2 = tick_until_trigger(&mut vessel, &mut now, 1);
    assert_eq!(vessel.trigger_count(), 2);
    assert!(vessel.is_trigger_busy());
    assert_eq!(vessel.tilt().degrees(), -60.0);
    assert_eq!(vessel.message(), "stop already!");

    vessel.tick(t2 + ms(1499));
    assert_eq!(vessel.message(), "stop already!");
    vessel.tick(t2 + ms(1500));
    assert_eq!(vessel.message(), "hands up, dont touch anything else");
    vessel.tick(t2 + ms(4000));
    assert_eq!(vessel.message(), "");
    assert!(!vessel.is_trigger_busy());

    // Step 3
    let mut now = t2 + ms(4000);
    tilt_to(&mut vessel, 60.0);
    let t3 = tick_until_trigger(&mut vessel, &mut now, 2);
    assert_eq!(vessel.trigger_count(), 3);
    assert!(!vessel.is_trigger_busy());
    assert_eq!(vessel.tilt().degrees(), 60.0);
    assert_eq!(vessel.message(), "you just never give up, do you");

    vessel.tick(t3 + ms(2999));
    assert_eq!(vessel.message(), "you just never give up, do you");
    vessel.tick(t3 + ms(3000));
    assert_eq!(vessel.message(), "");
    assert_eq!(vessel.trigger_state(), TriggerState::Exhausted);

    // A fourth crossing does nothing.
    let mut now = t3 + ms(3000);
    for _ in 0..500 {
        now += FRAME;
        vessel.tick(now);
        assert_eq!(vessel.message(), "");
    }
    assert!(vessel.fill().value() >= 80.0);
    assert_eq!(vessel.trigger_count(), 3);
    assert_eq!(vessel.pending_timers(), 0);
}

#[test]
fn test_drag_after_forced_correction_wins() {
    let (mut vessel, at) = first_trigger();
    assert_eq!(vessel.tilt().degrees(), -60.0);
    tilt_to(&mut vessel, 10.0);
    vessel.tick(at + FRAME);
    assert_eq!(vessel.tilt().degrees(), 10.0);
}

#[test]
fn test_teardown_cancels_everything() {
    let (mut vessel, at) = first_trigger();
    vessel.teardown();
    assert_eq!(vessel.pending_timers(), 0);

    let message = vessel.message().to_string();
    vessel.tick(at + ms(5000));
    assert_eq!(vessel.message(), message);
}

// ============================================================================
// Invariants under arbitrary input
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Down(f64),
    Move(f64),
    Up,
    Leave,
    Tick(u16),
    Toggle(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-5_000.0f64..5_000.0).prop_map(Op::Down),
        (-5_000.0f64..5_000.0).prop_map(Op::Move),
        Just(Op::Up),
        Just(Op::Leave),
        (0u16..2_000).prop_map(Op::Tick),
        any::<bool>().prop_map(Op::Toggle),
    ]
}

proptest! {
    #[test]
    fn prop_state_stays_in_bounds(ops in prop::collection::vec(op(), 1..200)) {
        let mut vessel = Vessel::default();
        let mut now = Duration::ZERO;

        for op in ops {
            match op {
                Op::Down(y) => vessel.pointer_down(y),
                Op::Move(y) => vessel.pointer_move(y),
                Op::Up => vessel.pointer_up(),
                Op::Leave => vessel.pointer_leave(),
                Op::Tick(step) => {
                    now += Duration::from_millis(u64::from(step));
                    vessel.tick(now);
                }
                Op::Toggle(enabled) => vessel.set_voiceover(enabled),
            }

            let fill = vessel.fill().value();
            let tilt = vessel.tilt().degrees();
            prop_assert!((0.0..=100.0).contains(&fill));
            prop_assert!((-90.0..=90.0).contains(&tilt));
            prop_assert!(vessel.trigger_count() <= 3);
            if vessel.is_trigger_busy() {
                prop_assert!(matches!(vessel.trigger_count(), 1 | 2));
            }
            if !vessel.voiceover_enabled() {
                prop_assert_eq!(vessel.trigger_count(), 0);
                prop_assert_eq!(vessel.message(), "");
            }
        }
    }
}
