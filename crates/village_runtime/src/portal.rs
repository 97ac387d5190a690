//! Portal triggers
//!
//! Touching a portal zone freezes the player, shrinks and fades its sprite, and
//! then emits [`PortalEntered`] once. Contacts during the transition are ignored.

use crate::player::{Player, PlayerSprite};
use crate::tuning::{PLAYER_SPRITE_SCALE, PORTAL_TRANSITION_MS};
use avian2d::prelude::*;
use bevy::prelude::*;
use std::time::Duration;

/// A portal trigger zone
#[derive(Component, Debug, Clone)]
pub struct PortalSensor {
    pub name: String,
    pub target: String,
}

/// Sent when the player has finished entering a portal
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct PortalEntered {
    pub target: String,
}

/// Shrink/fade in progress on the player
#[derive(Component, Debug, Clone)]
pub struct PortalTransition {
    pub target: String,
    pub timer: Timer,
    /// Set once [`PortalEntered`] has been sent
    pub finished: bool,
}

impl PortalTransition {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            timer: Timer::new(Duration::from_millis(PORTAL_TRANSITION_MS), TimerMode::Once),
            finished: false,
        }
    }

    /// Remaining visibility in [0, 1]; drives both scale and alpha
    pub fn remaining(&self) -> f32 {
        1.0 - self.timer.fraction()
    }

    /// Advance the transition, returning the target exactly once on completion
    pub fn tick(&mut self, delta: Duration) -> Option<&str> {
        if self.finished {
            return None;
        }
        self.timer.tick(delta);
        if self.timer.is_finished() {
            self.finished = true;
            Some(&self.target)
        } else {
            None
        }
    }
}

fn detect_portal_entry(
    mut commands: Commands,
    portals: Query<(&PortalSensor, &CollidingEntities)>,
    mut players: Query<
        (Entity, &mut LinearVelocity, Option<&Children>),
        (With<Player>, Without<PortalTransition>),
    >,
) {
    for (player, mut velocity, children) in players.iter_mut() {
        // the body collider lives on a child entity
        let touches = |colliding: &CollidingEntities| {
            colliding.contains(&player)
                || children.is_some_and(|c| c.iter().any(|child| colliding.contains(&child)))
        };
        let Some(portal) = portals
            .iter()
            .find(|(_, colliding)| touches(colliding))
            .map(|(portal, _)| portal)
        else {
            continue;
        };

        info!("Entering portal '{}' -> {}", portal.name, portal.target);
        velocity.0 = Vec2::ZERO;
        commands
            .entity(player)
            .insert(PortalTransition::new(portal.target.clone()));
    }
}

fn run_portal_transition(
    time: Res<Time>,
    mut players: Query<(&mut PortalTransition, &mut LinearVelocity, &Children), With<Player>>,
    mut sprites: Query<(&mut Sprite, &mut Transform), With<PlayerSprite>>,
    mut entered: MessageWriter<PortalEntered>,
) {
    for (mut transition, mut velocity, children) in players.iter_mut() {
        velocity.0 = Vec2::ZERO;

        if let Some(target) = transition.tick(time.delta()) {
            entered.write(PortalEntered {
                target: target.to_string(),
            });
        }

        let remaining = transition.remaining();
        for child in children.iter() {
            if let Ok((mut sprite, mut transform)) = sprites.get_mut(child) {
                sprite.color.set_alpha(remaining);
                transform.scale = Vec3::splat(PLAYER_SPRITE_SCALE * remaining);
            }
        }
    }
}

pub struct PortalPlugin;

impl Plugin for PortalPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PortalEntered>()
            .add_systems(Update, (detect_portal_entry, run_portal_transition).chain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_fires_once() {
        let mut transition = PortalTransition::new("GALLERY");
        assert_eq!(transition.tick(Duration::from_millis(200)), None);
        assert!((transition.remaining() - 0.6).abs() < 1e-4);

        assert_eq!(transition.tick(Duration::from_millis(300)), Some("GALLERY"));
        assert_eq!(transition.remaining(), 0.0);
        assert_eq!(transition.tick(Duration::from_millis(300)), None);
    }

    #[test]
    fn test_reentry_ignored_during_transition() {
        let mut app = App::new();
        app.add_message::<PortalEntered>()
            .add_systems(Update, detect_portal_entry);

        let player = app
            .world_mut()
            .spawn((Player, LinearVelocity(Vec2::new(10.0, 0.0))))
            .id();
        let mut colliding = CollidingEntities::default();
        colliding.insert(player);
        app.world_mut().spawn((
            PortalSensor {
                name: "SOCIAL".to_string(),
                target: "SOCIAL".to_string(),
            },
            colliding,
        ));

        app.update();
        let transition = app.world().get::<PortalTransition>(player).unwrap();
        assert_eq!(transition.target, "SOCIAL");
        assert_eq!(app.world().get::<LinearVelocity>(player).unwrap().0, Vec2::ZERO);

        // a second contact while in flight must not restart the transition
        app.world_mut()
            .get_mut::<PortalTransition>(player)
            .unwrap()
            .timer
            .tick(Duration::from_millis(250));
        app.update();
        let transition = app.world().get::<PortalTransition>(player).unwrap();
        assert!(transition.timer.elapsed() >= Duration::from_millis(250));
    }
}
