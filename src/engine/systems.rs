// ECS systems for updating the school
// Systems operate on entities with specific component combinations

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::RngCore;
use rand_chacha::ChaCha8Rng;

use super::area::{AnnulusArea, AreaSampler, FISH_REGION};
use super::clock::FixedClock;
use super::components::*;
use super::config::SimConfig;
use super::error::SwimError;
use super::swimmer::{Swimmer, TickOutcome};

/// Seeded randomness shared by every swimmer in the world.
#[derive(Resource)]
pub struct SwimRng(pub ChaCha8Rng);

/// The area collaborator swimmers ask for new destinations.
#[derive(Resource)]
pub struct SwimArea(pub Box<dyn AreaSampler + Send + Sync>);

/// Running totals, handy for periodic logging.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SwimStats {
    pub decisions: u64,
    pub moves: u64,
    pub arrivals: u64,
}

impl SwimStats {
    fn record(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Decided => self.decisions += 1,
            TickOutcome::Moved => self.moves += 1,
            TickOutcome::Arrived => self.arrivals += 1,
            TickOutcome::Idle => {}
        }
    }
}

/// Advance every swimmer by one fixed tick at the clock's current time.
pub fn swim_system(
    mut query: Query<(&mut Transform, &mut Swimmer, &SwimAnchor)>,
    clock: Res<FixedClock>,
    area: Res<SwimArea>,
    mut rng: ResMut<SwimRng>,
    mut stats: ResMut<SwimStats>,
) {
    let (now, step) = (clock.now(), clock.step());
    for (mut transform, mut swimmer, anchor) in query.iter_mut() {
        let outcome = swimmer.tick(&mut transform, anchor.0, now, step, &mut rng.0, &*area.0);
        stats.record(outcome);
    }
}

/// Move the clock on to the next tick. Runs after everything that reads it.
pub fn advance_clock_system(mut clock: ResMut<FixedClock>) {
    clock.advance();
}

/// Build the fixed-tick schedule: swim, then advance time.
pub fn fixed_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((swim_system, advance_clock_system).chain());
    schedule
}

/// Insert the resources the fixed schedule needs.
pub fn insert_swim_resources(
    world: &mut World,
    config: &SimConfig,
    area: Box<dyn AreaSampler + Send + Sync>,
) {
    use rand::SeedableRng;
    world.insert_resource(FixedClock::from_rate_hz(config.tick_rate_hz));
    world.insert_resource(SwimRng(ChaCha8Rng::seed_from_u64(config.seed)));
    world.insert_resource(SwimArea(area));
    world.insert_resource(SwimStats::default());
}

/// Spawn `config.fish_count` swimmers scattered through the band around the
/// anchor.
pub fn spawn_school(
    world: &mut World,
    config: &SimConfig,
    rng: &mut dyn RngCore,
) -> Result<Vec<Entity>, SwimError> {
    let mut spawned = Vec::with_capacity(config.fish_count);
    for _ in 0..config.fish_count {
        let swimmer = Swimmer::new(config.base_speed)?.with_jitter(config.speed_jitter)?;
        let start = AnnulusArea.sample_position(rng, config.anchor, &FISH_REGION);
        let entity = world
            .spawn((Transform::from_position(start), swimmer, SwimAnchor(config.anchor)))
            .id();
        spawned.push(entity);
    }

    log::info!("Spawned {} fish around {}", spawned.len(), config.anchor);
    Ok(spawned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::area::FixedArea;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn world_with(config: &SimConfig, area: Box<dyn AreaSampler + Send + Sync>) -> World {
        let mut world = World::new();
        insert_swim_resources(&mut world, config, area);
        world
    }

    #[test]
    fn schedule_decides_then_swims() {
        let config = SimConfig {
            base_speed: 10.0,
            speed_jitter: crate::engine::swimmer::SpeedJitter { min: 1.0, max: 1.0 },
            ..SimConfig::default()
        };
        let mut world = world_with(&config, Box::new(FixedArea(Vec3::new(100.0, 5.0, 0.0))));
        let fish = world
            .spawn((
                Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
                Swimmer::new(10.0).unwrap().with_jitter(config.speed_jitter).unwrap(),
                SwimAnchor(Vec3::ZERO),
            ))
            .id();
        let mut schedule = fixed_schedule();

        schedule.run(&mut world);
        assert_eq!(world.get::<Swimmer>(fish).unwrap().next_decision_time(), Some(10.0));
        assert_eq!(world.resource::<FixedClock>().ticks(), 1);

        for _ in 0..10 {
            schedule.run(&mut world);
        }
        let position = world.get::<Transform>(fish).unwrap().position;
        assert_relative_eq!(position.x, 2.0, epsilon = 1e-3);

        let stats = *world.resource::<SwimStats>();
        assert_eq!(stats, SwimStats { decisions: 1, moves: 10, arrivals: 0 });
    }

    #[test]
    fn seeded_worlds_replay_identically() {
        let run = || {
            let config = SimConfig { fish_count: 5, seed: 11, ..SimConfig::default() };
            let mut world = world_with(&config, Box::new(AnnulusArea));
            let mut spawn_rng = ChaCha8Rng::seed_from_u64(config.seed);
            let fish = spawn_school(&mut world, &config, &mut spawn_rng).unwrap();
            let mut schedule = fixed_schedule();
            for _ in 0..300 {
                schedule.run(&mut world);
            }
            fish.iter()
                .map(|&e| world.get::<Transform>(e).unwrap().position)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn spawned_fish_start_in_band() {
        let config = SimConfig {
            fish_count: 64,
            anchor: Vec3::new(5.0, 1.0, -5.0),
            ..SimConfig::default()
        };
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let fish = spawn_school(&mut world, &config, &mut rng).unwrap();

        assert_eq!(fish.len(), 64);
        for e in fish {
            let p = world.get::<Transform>(e).unwrap().position;
            assert!(FISH_REGION.contains(config.anchor, p, 1e-2));
        }
    }

    #[test]
    fn negative_speed_refuses_to_spawn() {
        let config = SimConfig { base_speed: -1.0, ..SimConfig::default() };
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(spawn_school(&mut world, &config, &mut rng).is_err());
    }

    #[test]
    fn parked_school_stays_put() {
        let config = SimConfig { fish_count: 4, base_speed: 0.0, ..SimConfig::default() };
        let mut world = world_with(&config, Box::new(AnnulusArea));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let fish = spawn_school(&mut world, &config, &mut rng).unwrap();
        let before: Vec<_> = fish.iter().map(|&e| *world.get::<Transform>(e).unwrap()).collect();

        let mut schedule = fixed_schedule();
        for _ in 0..100 {
            schedule.run(&mut world);
        }

        let after: Vec<_> = fish.iter().map(|&e| *world.get::<Transform>(e).unwrap()).collect();
        assert_eq!(before, after);
        assert_eq!(*world.resource::<SwimStats>(), SwimStats::default());
    }
}
