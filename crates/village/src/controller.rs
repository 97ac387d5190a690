//! App controller
//!
//! Owns the session-scoped state shared between views: whether the welcome
//! overlay was already dismissed in this run, and which portal the player
//! left through so the hub can place them beside it on return.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use village_runtime::{ControlsEnabled, DespawnWorld, PortalEntered, SpawnWorld};

/// Which view the app is showing
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppView {
    /// The walkable village
    #[default]
    Hub,
    /// A content view reached through the portal with this target
    Content(String),
}

/// State that lives as long as the app, across view switches
#[derive(Resource, Debug, Default)]
pub struct AppSession {
    /// The welcome overlay is shown once per run
    pub seen_welcome: bool,
    return_from: Option<String>,
}

impl AppSession {
    /// Remember the portal the player is leaving through
    pub fn leave_through(&mut self, target: impl Into<String>) {
        self.return_from = Some(target.into());
    }

    /// Consume the return marker; later calls yield `None`
    pub fn take_return_from(&mut self) -> Option<String> {
        self.return_from.take()
    }

    pub fn return_from(&self) -> Option<&str> {
        self.return_from.as_deref()
    }
}

/// Root of the welcome overlay
#[derive(Component)]
struct WelcomeOverlay;

/// Root of the content placeholder
#[derive(Component)]
struct ContentPlaceholder;

const OVERLAY_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);
const PANEL_BACKGROUND: Color = Color::srgb(0.918, 0.831, 0.667);
const PANEL_BORDER: Color = Color::srgb(0.722, 0.435, 0.314);
const PANEL_TEXT: Color = Color::srgb(0.365, 0.251, 0.216);

/// Plugin for switching between the hub and content views
pub struct VillageAppPlugin;

impl Plugin for VillageAppPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppView>()
            .init_resource::<AppSession>()
            .init_resource::<ControlsEnabled>()
            .add_message::<SpawnWorld>()
            .add_message::<DespawnWorld>()
            .add_message::<PortalEntered>()
            .add_systems(OnEnter(AppView::Hub), (enter_hub, show_welcome).chain())
            .add_systems(OnExit(AppView::Hub), leave_hub)
            .add_systems(
                Update,
                (dismiss_welcome, hand_off_to_content)
                    .chain()
                    .run_if(in_state(AppView::Hub)),
            )
            .add_systems(
                Update,
                (show_content_placeholder, return_to_hub).run_if(in_content),
            );
    }
}

fn in_content(view: Res<State<AppView>>) -> bool {
    matches!(view.get(), AppView::Content(_))
}

/// Load the world, placing the player beside the portal they came back from
fn enter_hub(mut session: ResMut<AppSession>, mut spawn: MessageWriter<SpawnWorld>) {
    let return_from = session.take_return_from();
    if let Some(target) = &return_from {
        info!("Returning to the village from {target}");
    }
    spawn.write(SpawnWorld { return_from });
}

fn leave_hub(mut despawn: MessageWriter<DespawnWorld>) {
    despawn.write(DespawnWorld);
}

fn show_welcome(
    mut commands: Commands,
    session: Res<AppSession>,
    mut controls: ResMut<ControlsEnabled>,
) {
    if session.seen_welcome {
        controls.0 = true;
        return;
    }
    controls.0 = false;

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(OVERLAY_BACKGROUND),
            GlobalZIndex(10),
            DespawnOnExit(AppView::Hub),
            WelcomeOverlay,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(24.0)),
                        row_gap: Val::Px(12.0),
                        border: UiRect::all(Val::Px(4.0)),
                        max_width: Val::Px(380.0),
                        ..default()
                    },
                    BackgroundColor(PANEL_BACKGROUND),
                    BorderColor::all(PANEL_BORDER),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new("HELLO!"),
                        TextFont::from_font_size(28.0),
                        TextColor(PANEL_TEXT),
                    ));
                    panel.spawn((
                        Text::new("Welcome to my digital village!"),
                        TextFont::from_font_size(16.0),
                        TextColor(PANEL_TEXT),
                    ));
                    panel.spawn((
                        Text::new(
                            "Walk around with WASD or the arrow keys and step into a portal to learn more about me.",
                        ),
                        TextFont::from_font_size(12.0),
                        TextColor(PANEL_TEXT),
                        TextLayout::new_with_justify(Justify::Center),
                    ));
                    panel.spawn((
                        Text::new("Press Enter or click to explore"),
                        TextFont::from_font_size(14.0),
                        TextColor(PANEL_BORDER),
                    ));
                });
        });
}

fn dismiss_welcome(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    overlays: Query<Entity, With<WelcomeOverlay>>,
    mut session: ResMut<AppSession>,
    mut controls: ResMut<ControlsEnabled>,
) {
    if overlays.is_empty() {
        return;
    }
    let clicked = mouse.is_some_and(|m| m.just_pressed(MouseButton::Left));
    let confirmed = keyboard.any_just_pressed([KeyCode::Enter, KeyCode::Space, KeyCode::Escape]);
    if !clicked && !confirmed {
        return;
    }

    for entity in &overlays {
        commands.entity(entity).despawn();
    }
    session.seen_welcome = true;
    controls.0 = true;
}

fn hand_off_to_content(
    mut entered: MessageReader<PortalEntered>,
    mut session: ResMut<AppSession>,
    mut next_view: ResMut<NextState<AppView>>,
) {
    // One view switch per frame; the world is torn down on exit anyway
    let Some(portal) = entered.read().last() else {
        return;
    };
    info!("Entering {}", portal.target);
    session.leave_through(portal.target.clone());
    next_view.set(AppView::Content(portal.target.clone()));
}

fn show_content_placeholder(
    mut commands: Commands,
    view: Res<State<AppView>>,
    existing: Query<(), With<ContentPlaceholder>>,
) {
    if !existing.is_empty() {
        return;
    }
    let AppView::Content(target) = view.get() else {
        return;
    };

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            DespawnOnExit(view.get().clone()),
            ContentPlaceholder,
        ))
        .with_children(|root| {
            root.spawn((
                Text::new(target.clone()),
                TextFont::from_font_size(36.0),
                TextColor(PANEL_TEXT),
            ));
            root.spawn((
                Text::new("Press Esc to return to the village"),
                TextFont::from_font_size(16.0),
                TextColor(PANEL_BORDER),
            ));
        });
}

fn return_to_hub(keyboard: Res<ButtonInput<KeyCode>>, mut next_view: ResMut<NextState<AppView>>) {
    if keyboard.any_just_pressed([KeyCode::Escape, KeyCode::Backspace]) {
        next_view.set(AppView::Hub);
    }
}
