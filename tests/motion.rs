use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;
use rand::Rng;
use servo_axis::{
    func_notifier, func_sink, AngleLimits, Axis, AxisConfig, ManualClock,
    PeriodicTimer, SpinTimer, TickPlan, Velocity,
};
use std::cell::RefCell;

#[derive(Debug, Copy, Clone, PartialEq)]
struct Input {
    start: i32,
    target: i32,
    speed: u32,
}

impl Arbitrary for Input {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        Input {
            start: g.gen_range(-90, 91),
            target: g.gen_range(-90, 91),
            speed: g.gen_range(0, 5000),
        }
    }
}

fn axis_at<'a>(start: i32, clock: &'a ManualClock) -> Axis<'a, SpinTimer<&'a ManualClock>> {
    let cfg = AxisConfig::default().with_initial_angle(start);
    Axis::with_config("test", SpinTimer::new(clock), cfg).unwrap()
}

/// Wait for one tick interval and run the control loop.
fn tick<T: PeriodicTimer>(clock: &ManualClock, axis: &mut Axis<'_, T>) -> bool {
    clock.advance(axis.tick_plan().interval);
    axis.poll()
}

#[quickcheck]
fn always_converge_without_overshooting(input: Input) -> TestResult {
    let clock = ManualClock::new();
    let mut axis = axis_at(input.start, &clock);

    axis.go_to_target_angle(input.target, input.speed);

    let distance = (input.target - input.start).abs() as u32;
    // the final tick to report arrival on a zero-length move
    let max_ticks = axis.tick_plan().ticks_for(distance).max(1);
    let mut ticks = 0;

    while axis.is_busy() {
        let before = input.target - axis.angle();
        assert!(tick(&clock, &mut axis));
        let after = input.target - axis.angle();

        ticks += 1;
        if ticks > max_ticks {
            return TestResult::error(format!("Still moving after {} ticks", ticks));
        }

        if before.signum() * after.signum() < 0 {
            return TestResult::error(format!(
                "Overshot the target, {} => {}",
                before, after
            ));
        }
        if after.abs() >= before.abs() && before != 0 {
            return TestResult::error("Didn't get any closer");
        }
    }

    TestResult::from_bool(axis.angle() == input.target && axis.take_target_reached())
}

#[quickcheck]
fn short_moves_take_exactly_one_tick(input: Input) -> TestResult {
    let plan = TickPlan::for_velocity(
        Velocity::new(input.speed),
        AxisConfig::DEFAULT_MIN_TICK_INTERVAL_MS,
    );
    // anything closer than a single step
    let target = input.start + input.target % plan.step as i32;
    if !AngleLimits::default().contains(target) {
        return TestResult::discard();
    }

    let clock = ManualClock::new();
    let mut axis = axis_at(input.start, &clock);
    axis.go_to_target_angle(target, input.speed);
    assert_eq!(axis.tick_plan(), plan);

    assert!(tick(&clock, &mut axis));

    TestResult::from_bool(
        axis.angle() == target && !axis.is_busy() && axis.take_target_reached(),
    )
}

#[quickcheck]
fn reversed_axes_send_the_mirror_image(input: Input) -> bool {
    let sent = RefCell::new(Vec::new());
    let mut sink = func_sink(|angle| sent.borrow_mut().push(angle));
    let clock = ManualClock::new();
    let cfg = AxisConfig::default()
        .with_initial_angle(input.start)
        .with_reversed(true);
    let mut axis = Axis::with_config("test", SpinTimer::new(&clock), cfg).unwrap();
    axis.attach_angle_sink(Some(&mut sink));
    axis.go_to_target_angle(input.target, input.speed);

    let mut logical = Vec::new();
    while axis.is_busy() {
        if tick(&clock, &mut axis) && axis.angle() != logical.last().copied().unwrap_or(input.start) {
            logical.push(axis.angle());
        }
    }

    let mirrored: Vec<i32> = logical.iter().map(|a| -a).collect();
    let matches = *sent.borrow() == mirrored;
    matches
}

#[test]
fn move_from_0_to_25_at_10_degrees_per_tick() {
    let sent = RefCell::new(Vec::new());
    let reached = RefCell::new(Vec::new());
    let mut sink = func_sink(|angle| sent.borrow_mut().push(angle));
    let mut notifier = func_notifier(|angle| reached.borrow_mut().push(angle));
    let clock = ManualClock::new();
    let mut axis = Axis::new("pan", SpinTimer::new(&clock));
    axis.attach_angle_sink(Some(&mut sink));
    axis.attach_target_reached_notifier(Some(&mut notifier));

    axis.go_to_target_angle(25, 500);
    assert_eq!(axis.tick_plan().step, 10);
    assert!(axis.is_busy());

    assert!(tick(&clock, &mut axis));
    assert_eq!(axis.angle(), 10);
    assert!(!axis.take_target_reached());

    assert!(tick(&clock, &mut axis));
    assert_eq!(axis.angle(), 20);
    assert!(!axis.take_target_reached());

    assert!(tick(&clock, &mut axis));
    assert_eq!(axis.angle(), 25);
    assert!(axis.take_target_reached());
    assert!(!axis.is_busy());

    assert_eq!(*sent.borrow(), [10, 20, 25]);
    assert_eq!(*reached.borrow(), [25]);

    // the timer is gone, so time passing doesn't do anything
    assert!(!tick(&clock, &mut axis));
    assert_eq!(*reached.borrow(), [25]);
}

#[test]
fn nothing_happens_between_ticks() {
    let clock = ManualClock::new();
    let mut axis = Axis::new("pan", SpinTimer::new(&clock));

    // 1°/s
    axis.go_to_target_angle(2, 1);

    clock.advance(std::time::Duration::from_millis(999));
    assert!(!axis.poll());
    assert_eq!(axis.angle(), 0);

    clock.advance(std::time::Duration::from_millis(1));
    assert!(axis.poll());
    assert_eq!(axis.angle(), 1);
}

#[test]
fn going_nowhere_is_reported_on_the_next_tick() {
    let reached = RefCell::new(Vec::new());
    let mut notifier = func_notifier(|angle| reached.borrow_mut().push(angle));
    let clock = ManualClock::new();
    let mut axis = Axis::new("pan", SpinTimer::new(&clock));
    axis.attach_target_reached_notifier(Some(&mut notifier));

    axis.go_to_target_angle(0, 100);
    assert!(axis.is_busy());
    assert!(!axis.take_target_reached());

    assert!(tick(&clock, &mut axis));

    assert!(axis.take_target_reached());
    assert!(!axis.is_busy());
    assert_eq!(*reached.borrow(), [0]);
}

#[test]
fn stop_mid_motion() {
    let clock = ManualClock::new();
    let mut axis = Axis::new("pan", SpinTimer::new(&clock));
    axis.go_to_target_angle(25, 250);

    for _ in 0..3 {
        assert!(tick(&clock, &mut axis));
    }
    assert_eq!(axis.angle(), 15);

    axis.stop();

    assert!(!axis.is_busy());
    for _ in 0..5 {
        assert!(!tick(&clock, &mut axis));
    }
    assert_eq!(axis.angle(), 15);
}

#[test]
fn a_new_target_interrupts_the_old_one() {
    let reached = RefCell::new(Vec::new());
    let mut notifier = func_notifier(|angle| reached.borrow_mut().push(angle));
    let clock = ManualClock::new();
    let mut axis = Axis::new("pan", SpinTimer::new(&clock));
    axis.attach_target_reached_notifier(Some(&mut notifier));

    // 20° per tick, so this is a single step
    axis.go_to_target_angle(10, 1000);
    assert!(tick(&clock, &mut axis));
    assert!(axis.take_target_reached());

    // arrive again, but don't read the flag
    axis.go_to_target_angle(0, 1000);
    while axis.is_busy() {
        tick(&clock, &mut axis);
    }

    axis.go_to_target_angle(-30, 1000);
    assert!(!axis.take_target_reached());

    while axis.is_busy() {
        tick(&clock, &mut axis);
    }

    assert_eq!(axis.angle(), -30);
    assert_eq!(*reached.borrow(), [10, 0, -30]);
}
