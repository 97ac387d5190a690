//! Wandering agents
//!
//! Each agent runs its own timer: when it expires the agent either walks in a
//! random direction or stands still until the next decision.

use crate::animation::{AnimatedSprite, AnimationClip, SheetGrid};
use crate::tuning::*;
use crate::world::{depth_to_z, HubEntity};
use avian2d::prelude::*;
use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

pub const AGENT_GRID: SheetGrid = SheetGrid::square(AGENT_FRAME_SIZE, AGENT_SHEET_COLUMNS);
pub const AGENT_IDLE: AnimationClip = AnimationClip::new(0, 1, 3);
pub const AGENT_WALK: AnimationClip = AnimationClip::new(4, 7, 8);

/// Randomness shared by all agents
#[derive(Resource)]
pub struct AgentRng(pub SmallRng);

impl Default for AgentRng {
    fn default() -> Self {
        Self(SmallRng::from_entropy())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentAction {
    /// Velocity in map pixels per second (y down)
    Walk(Vec2),
    Idle,
}

/// Per-agent decision timer
#[derive(Component, Debug, Clone, Default)]
pub struct AgentBrain {
    pub next_decision_ms: u64,
}

impl AgentBrain {
    /// Pick a new action once the current one has run its course.
    ///
    /// Returns `None` while the previous decision is still active.
    pub fn decide<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Option<AgentAction> {
        if now_ms <= self.next_decision_ms {
            return None;
        }

        let walk = rng.gen_bool(AGENT_WALK_PROBABILITY);
        let duration = rng.gen_range(AGENT_MIN_DECISION_MS..AGENT_MAX_DECISION_MS);
        self.next_decision_ms = now_ms + duration;

        if walk {
            let angle = rng.gen_range(0.0..TAU);
            Some(AgentAction::Walk(Vec2::from_angle(angle) * AGENT_SPEED))
        } else {
            Some(AgentAction::Idle)
        }
    }
}

#[derive(Component, Debug, Default)]
pub struct WanderingAgent;

#[derive(Component, Debug, Default)]
pub struct AgentSprite;

/// Spawn one agent at a map pixel position
pub fn spawn_agent(commands: &mut Commands, sheet: Handle<Image>, x: f32, y: f32) -> Entity {
    commands
        .spawn((
            Name::new("Wandering agent"),
            HubEntity,
            WanderingAgent,
            AgentBrain::default(),
            Transform::from_xyz(x, -y, depth_to_z(village_core::constants::depth::WANDERING_AGENT)),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::rectangle(AGENT_BODY_SIZE, AGENT_BODY_SIZE),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(0.0),
            Restitution::new(AGENT_RESTITUTION),
            Friction::ZERO,
            LinearVelocity::ZERO,
        ))
        .with_children(|parent| {
            parent.spawn((
                AgentSprite,
                Sprite {
                    image: sheet,
                    rect: Some(AGENT_GRID.frame_rect(0)),
                    ..default()
                },
                AnimatedSprite::new(AGENT_GRID, AGENT_IDLE),
                Transform::from_scale(Vec3::splat(AGENT_SPRITE_SCALE)),
            ));
        })
        .id()
}

fn wander(
    time: Res<Time>,
    mut rng: ResMut<AgentRng>,
    mut agents: Query<(&mut AgentBrain, &mut LinearVelocity, &Children), With<WanderingAgent>>,
    mut sprites: Query<(&mut Sprite, &mut AnimatedSprite), With<AgentSprite>>,
) {
    let now_ms = time.elapsed().as_millis() as u64;

    for (mut brain, mut velocity, children) in agents.iter_mut() {
        let Some(action) = brain.decide(now_ms, &mut rng.0) else {
            continue;
        };

        let (next_velocity, clip) = match action {
            AgentAction::Walk(v) => (Vec2::new(v.x, -v.y), AGENT_WALK),
            AgentAction::Idle => (Vec2::ZERO, AGENT_IDLE),
        };
        velocity.0 = next_velocity;

        for child in children.iter() {
            if let Ok((mut sprite, mut animated)) = sprites.get_mut(child) {
                animated.play(clip);
                if clip == AGENT_WALK {
                    sprite.flip_x = next_velocity.x < 0.0;
                }
            }
        }
    }
}

pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AgentRng>().add_systems(Update, wander);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_decision_before_deadline() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut brain = AgentBrain {
            next_decision_ms: 2000,
        };
        assert_eq!(brain.decide(1500, &mut rng), None);
        assert_eq!(brain.decide(2000, &mut rng), None);
        assert!(brain.decide(2001, &mut rng).is_some());
    }

    #[test]
    fn test_decision_durations_and_speed() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut brain = AgentBrain::default();
        let mut now = 1;

        for _ in 0..200 {
            let action = brain.decide(now, &mut rng).unwrap();
            let duration = brain.next_decision_ms - now;
            assert!((1000..3000).contains(&duration));
            if let AgentAction::Walk(v) = action {
                assert!((v.length() - AGENT_SPEED).abs() < 1e-3);
            }
            now = brain.next_decision_ms + 1;
        }
    }

    #[test]
    fn test_walk_probability() {
        let mut rng = SmallRng::seed_from_u64(1234);
        let mut walks = 0;
        let trials = 10_000;

        for _ in 0..trials {
            let mut brain = AgentBrain::default();
            if matches!(brain.decide(1, &mut rng), Some(AgentAction::Walk(_))) {
                walks += 1;
            }
        }

        let ratio = walks as f64 / trials as f64;
        assert!((ratio - 0.6).abs() < 0.03, "walk ratio {}", ratio);
    }
}
