use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use glam::DVec2;
use shadow_defend_core::Path;
use shadow_defend_system_movement::{Config, Mover};

#[test]
fn deterministic_replay_produces_identical_trajectory() {
    let first = replay(&scripted_path());
    let second = replay(&scripted_path());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.samples.len() > 1, "trajectory should contain steps");
}

#[test]
fn trajectory_ends_within_threshold_of_final_waypoint() {
    let path = scripted_path();
    let outcome = replay(&path);
    let last = outcome.samples.last().expect("at least one sample");
    let end = path.waypoint(path.last_index());
    let position = DVec2::new(f64::from_bits(last.x), f64::from_bits(last.y));

    assert!(position.distance(end) < Config::default().arrival_threshold());
    assert_eq!(last.target_index, path.last_index());
}

fn scripted_path() -> Path {
    Path::new(vec![
        DVec2::new(0.0, 384.0),
        DVec2::new(120.5, 384.0),
        DVec2::new(120.5, 210.25),
        DVec2::new(333.3, 150.0),
        DVec2::new(410.0, 512.75),
    ])
    .expect("valid path")
}

fn replay(path: &Path) -> ReplayOutcome {
    let config = Config::default();
    let mut mover = Mover::spawn(path);
    let mut samples = Vec::new();

    while !mover.is_completed() {
        mover.advance(path, &config);
        samples.push(Sample::from(&mover));
        assert!(samples.len() < 10_000, "mover failed to complete");
    }

    ReplayOutcome { samples }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    samples: Vec<Sample>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Sample {
    x: u64,
    y: u64,
    heading: u64,
    target_index: usize,
}

impl From<&Mover> for Sample {
    fn from(mover: &Mover) -> Self {
        Self {
            x: mover.position().x.to_bits(),
            y: mover.position().y.to_bits(),
            heading: mover.heading().to_bits(),
            target_index: mover.target_index(),
        }
    }
}
