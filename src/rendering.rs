//! Presentation for the windowed binary: first-person camera, primitive
//! meshes, lights and the text HUD.
//!
//! Nothing here feeds back into the simulation; every system only reads
//! simulation state and writes render components.
//!
//! ## System Responsibilities
//!
//! | System                          | Schedule   | Purpose                                        |
//! |---------------------------------|------------|------------------------------------------------|
//! | `setup_render_assets`           | Startup    | Shared meshes / materials for bullets          |
//! | `setup_scene`                   | Startup    | Ground plane, sun, muzzle light                |
//! | `setup_hud`                     | Startup    | Status line, crosshair and overlay text nodes  |
//! | `attach_player_camera_system`   | Update     | Put the 3D camera on the player entity         |
//! | `attach_enemy_mesh_system`      | Update     | Per-enemy cuboid with its own material         |
//! | `attach_bullet_mesh_system`     | Update     | Small emissive sphere per bullet               |
//! | `enemy_tint_system`             | Update     | Darken enemies as they lose health             |
//! | `muzzle_light_system`           | PostUpdate | Flash the muzzle light after a shot            |
//! | `hud_text_system`               | PostUpdate | Format the `HudSnapshot` into text             |

use bevy::prelude::*;
use onslaught::enemy::{Enemy, EnemyHealth, EnemyKind};
use onslaught::hud::{hud_snapshot_system, AmmoReadout, HudSnapshot};
use onslaught::player::{Bullet, Player};
use onslaught::session::GameState;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(0x10, 0x15, 0x20)))
            .add_systems(Startup, (setup_render_assets, setup_scene, setup_hud))
            .add_systems(
                Update,
                (
                    attach_player_camera_system,
                    attach_enemy_mesh_system,
                    attach_bullet_mesh_system,
                    enemy_tint_system,
                ),
            )
            .add_systems(
                PostUpdate,
                (muzzle_light_system, hud_text_system).after(hud_snapshot_system),
            );
    }
}

// ── Markers / assets ──────────────────────────────────────────────────────────

#[derive(Component)]
pub struct MuzzleLight;

#[derive(Component)]
pub struct HudStatusText;

#[derive(Component)]
pub struct HudCrosshair;

#[derive(Component)]
pub struct HudOverlayText;

/// Shared handles so bullets don't each allocate a mesh and material.
#[derive(Resource)]
pub struct RenderAssets {
    pub bullet_mesh: Handle<Mesh>,
    pub bullet_material: Handle<StandardMaterial>,
}

/// Base colour of each enemy kind at full health.
pub fn enemy_base_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Basic => Color::srgb_u8(0xff, 0x00, 0x00),
        EnemyKind::Fast => Color::srgb_u8(0xff, 0x44, 0x00),
        EnemyKind::Heavy => Color::srgb_u8(0x88, 0x00, 0x00),
        EnemyKind::Boss => Color::srgb_u8(0x44, 0x00, 0x88),
    }
}

/// Lerp the base colour toward black by the missing health fraction.
pub fn enemy_tint(kind: EnemyKind, health_fraction: f32) -> Color {
    let base = enemy_base_color(kind).to_srgba();
    let f = health_fraction.clamp(0.0, 1.0);
    Color::srgb(base.red * f, base.green * f, base.blue * f)
}

// ── Startup ───────────────────────────────────────────────────────────────────

pub fn setup_render_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let bullet_mesh = meshes.add(Sphere::new(0.1));
    let bullet_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xff, 0xff, 0x00),
        emissive: LinearRgba::rgb(4.0, 4.0, 0.5),
        unlit: true,
        ..default()
    });
    commands.insert_resource(RenderAssets {
        bullet_mesh,
        bullet_material,
    });
}

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(400.0, 400.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x3a, 0x5f, 0x3a),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::default(),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(50.0, 100.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PointLight {
            intensity: 0.0,
            range: 15.0,
            color: Color::srgb_u8(0xff, 0xaa, 0x33),
            ..default()
        },
        Transform::default(),
        MuzzleLight,
    ));
}

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            bottom: Val::Px(12.0),
            ..default()
        },
        HudStatusText,
    ));

    commands.spawn((
        Text::new("+"),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            ..default()
        },
        HudCrosshair,
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(30.0),
            top: Val::Percent(35.0),
            ..default()
        },
        HudOverlayText,
    ));
}

// ── Update: attach visuals ────────────────────────────────────────────────────

pub fn attach_player_camera_system(mut commands: Commands, query: Query<Entity, Added<Player>>) {
    for entity in query.iter() {
        commands.entity(entity).insert(Camera3d::default());
    }
}

pub fn attach_enemy_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &EnemyKind, &EnemyHealth), Added<Enemy>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, kind, health) in query.iter() {
        let mesh = meshes.add(Cuboid::from_size(kind.stats().size));
        let base = enemy_base_color(*kind);
        let material = materials.add(StandardMaterial {
            base_color: enemy_tint(*kind, health.fraction()),
            emissive: base.to_linear() * 0.1,
            perceptual_roughness: 0.8,
            metallic: 0.2,
            ..default()
        });
        commands
            .entity(entity)
            .insert((Mesh3d(mesh), MeshMaterial3d(material)));
    }
}

pub fn attach_bullet_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Bullet>>,
    assets: Res<RenderAssets>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(assets.bullet_mesh.clone()),
            MeshMaterial3d(assets.bullet_material.clone()),
        ));
    }
}

pub fn enemy_tint_system(
    query: Query<
        (&EnemyKind, &EnemyHealth, &MeshMaterial3d<StandardMaterial>),
        Changed<EnemyHealth>,
    >,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (kind, health, material) in query.iter() {
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = enemy_tint(*kind, health.fraction());
        }
    }
}

// ── PostUpdate: feedback and HUD text ─────────────────────────────────────────

pub fn muzzle_light_system(
    hud: Res<HudSnapshot>,
    q_player: Query<&Transform, (With<Player>, Without<MuzzleLight>)>,
    mut q_light: Query<(&mut PointLight, &mut Transform), With<MuzzleLight>>,
) {
    let Ok((mut light, mut transform)) = q_light.single_mut() else {
        return;
    };
    if let Ok(player) = q_player.single() {
        transform.translation = player.translation;
    }
    light.intensity = if hud.muzzle_lit { 200_000.0 } else { 0.0 };
}

/// Bottom-left status line.
pub fn status_line(hud: &HudSnapshot) -> String {
    let ammo = match hud.ammo {
        AmmoReadout::Rounds { current, capacity } => format!("{current}/{capacity}"),
        AmmoReadout::Reloading => "RELOADING...".to_string(),
    };
    format!(
        "Health {:.0}  |  {:?} {}  |  Score {}  |  Wave {}  |  Kills {}",
        hud.health.ceil(),
        hud.weapon,
        ammo,
        hud.score,
        hud.wave,
        hud.kills
    )
}

/// Centre overlay for the non-playing states.
pub fn overlay_text(hud: &HudSnapshot) -> Option<String> {
    match hud.state {
        GameState::Briefing => Some(
            "Click to play\nWASD / QE to move, Space to jump\nMouse to look and shoot, R to reload, 1-3 to switch"
                .to_string(),
        ),
        GameState::GameOver => {
            let summary = hud.game_over?;
            Some(format!(
                "GAME OVER\nWave: {}\nScore: {}\nEnemies Killed: {}\nClick to restart",
                summary.wave, summary.score, summary.kills
            ))
        }
        GameState::Playing => None,
    }
}

#[allow(clippy::type_complexity)]
pub fn hud_text_system(
    hud: Res<HudSnapshot>,
    mut q_status: Query<&mut Text, (With<HudStatusText>, Without<HudOverlayText>)>,
    mut q_overlay: Query<&mut Text, (With<HudOverlayText>, Without<HudStatusText>)>,
    mut q_crosshair: Query<&mut TextColor, With<HudCrosshair>>,
) {
    if !hud.is_changed() {
        return;
    }
    if let Ok(mut text) = q_status.single_mut() {
        *text = Text::new(status_line(&hud));
    }
    if let Ok(mut text) = q_overlay.single_mut() {
        *text = Text::new(overlay_text(&hud).unwrap_or_default());
    }
    if let Ok(mut color) = q_crosshair.single_mut() {
        color.0 = if hud.muzzle_lit {
            Color::srgb_u8(0xff, 0xa5, 0x00)
        } else if hud.ammo == AmmoReadout::Reloading {
            Color::srgb_u8(0xff, 0x00, 0x00)
        } else {
            Color::srgba(1.0, 1.0, 1.0, 0.8)
        };
    }
}
