use std::time::Duration;

use shadow_defend_core::{SpawnInterval, Timestamp};
use shadow_defend_system_spawning::{Config, SpawnDecision, SpawnSchedule};

fn at_millis(millis: u64) -> Timestamp {
    Timestamp::from_offset(Duration::from_millis(millis))
}

fn schedule(interval_ms: u64, quota: u32) -> SpawnSchedule {
    let interval = SpawnInterval::from_duration(Duration::from_millis(interval_ms));
    let mut schedule = SpawnSchedule::new(Config::new(interval), quota);
    schedule.begin(Timestamp::ZERO);
    schedule
}

#[test]
fn first_poll_bootstraps_regardless_of_interval() {
    let mut schedule = schedule(60_000, 3);

    assert_eq!(schedule.poll(at_millis(1), 0), SpawnDecision::Bootstrap);
    assert_eq!(schedule.remaining(), 2);
}

#[test]
fn scheduled_spawn_waits_for_full_interval() {
    let mut schedule = schedule(500, 3);
    assert_eq!(schedule.poll(at_millis(0), 0), SpawnDecision::Bootstrap);

    assert_eq!(schedule.poll(at_millis(499), 1), SpawnDecision::Idle);
    assert_eq!(schedule.poll(at_millis(500), 1), SpawnDecision::Scheduled);
    assert_eq!(schedule.last_spawn(), at_millis(500));

    assert_eq!(schedule.poll(at_millis(900), 2), SpawnDecision::Idle);
    assert_eq!(schedule.poll(at_millis(1_000), 2), SpawnDecision::Scheduled);
    assert_eq!(schedule.remaining(), 0);
}

#[test]
fn only_one_spawn_per_poll_even_after_long_gap() {
    let mut schedule = schedule(100, 5);
    assert_eq!(schedule.poll(at_millis(0), 0), SpawnDecision::Bootstrap);

    assert_eq!(schedule.poll(at_millis(10_000), 1), SpawnDecision::Scheduled);
    assert_eq!(schedule.remaining(), 3);
}

#[test]
fn exhaustion_requires_empty_path() {
    let mut schedule = schedule(100, 1);
    assert_eq!(schedule.poll(at_millis(0), 0), SpawnDecision::Bootstrap);

    assert_eq!(schedule.poll(at_millis(500), 1), SpawnDecision::Idle);
    assert_eq!(schedule.poll(at_millis(600), 0), SpawnDecision::Exhausted);
}

#[test]
fn zero_quota_is_exhausted_immediately() {
    let mut schedule = schedule(100, 0);
    assert_eq!(schedule.poll(at_millis(0), 0), SpawnDecision::Exhausted);
}

#[test]
fn accelerate_then_decelerate_restores_even_interval() {
    let mut schedule = schedule(5_000, 1);
    let original = schedule.spawn_interval();

    schedule.accelerate();
    assert_eq!(schedule.spawn_interval().as_duration(), Duration::from_millis(2_500));
    schedule.decelerate();

    assert_eq!(schedule.spawn_interval(), original);
}

#[test]
fn accelerate_truncates_odd_interval() {
    let mut schedule = SpawnSchedule::new(Config::new(SpawnInterval::from_nanos(3)), 1);

    schedule.accelerate();
    assert_eq!(schedule.spawn_interval().as_nanos(), 1);
    schedule.accelerate();
    assert_eq!(schedule.spawn_interval().as_nanos(), 1, "interval floors at 1ns");
    schedule.decelerate();

    assert_eq!(schedule.spawn_interval().as_nanos(), 2);
}

#[test]
fn accelerated_schedule_spawns_sooner() {
    let mut schedule = schedule(1_000, 3);
    assert_eq!(schedule.poll(at_millis(0), 0), SpawnDecision::Bootstrap);

    schedule.accelerate();

    assert_eq!(schedule.poll(at_millis(500), 1), SpawnDecision::Scheduled);
}
