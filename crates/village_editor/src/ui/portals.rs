//! Map size and portal panels

use bevy_egui::egui;

use crate::render::parse_hex_color;
use crate::session::{EditorSession, Tool};

/// Map size in tiles
pub fn render_map_settings(ui: &mut egui::Ui, session: &mut EditorSession) {
    ui.heading("Map");

    let config = &session.state().config;
    let (mut tiles_w, mut tiles_h) = (config.tiles_w, config.tiles_h);
    let mut changed = false;

    egui::Grid::new("map_settings").num_columns(2).show(ui, |ui| {
        ui.label("Width:");
        changed |= ui
            .add(egui::DragValue::new(&mut tiles_w).range(1..=512).suffix(" tiles"))
            .changed();
        ui.end_row();

        ui.label("Height:");
        changed |= ui
            .add(egui::DragValue::new(&mut tiles_h).range(1..=512).suffix(" tiles"))
            .changed();
        ui.end_row();
    });

    if changed {
        session.resize_map(tiles_w, tiles_h);
    }

    let config = &session.state().config;
    ui.label(format!("Spawn: ({}, {})", config.spawn_tx, config.spawn_ty));
    match config
        .border_asset_id
        .as_deref()
        .and_then(|id| session.asset(id))
    {
        Some(asset) => ui.label(format!("Background: {}", asset.name)),
        None => ui.label("Background: grass"),
    };
}

/// Portal list; the selected portal is the one the Portal tool moves
pub fn render_portals(ui: &mut egui::Ui, session: &mut EditorSession) {
    ui.heading("Portals");

    let selected = session.portal_target().to_string();
    let portals: Vec<_> = session
        .state()
        .portals
        .iter()
        .map(|p| (p.target.clone(), p.name.clone(), p.color.clone(), p.tx, p.ty, p.tw, p.th))
        .collect();

    let mut select = None;
    let mut resize = None;

    for (target, name, color, tx, ty, tw, th) in portals {
        let is_selected = target == selected;
        ui.horizontal(|ui| {
            let swatch = parse_hex_color(&color)
                .map(|c| {
                    let c = c.to_srgba();
                    egui::Color32::from_rgb(
                        (c.red * 255.0) as u8,
                        (c.green * 255.0) as u8,
                        (c.blue * 255.0) as u8,
                    )
                })
                .unwrap_or(egui::Color32::GRAY);
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, swatch);

            if ui
                .selectable_label(is_selected, &name)
                .on_hover_text(format!("Leads to {target}"))
                .clicked()
            {
                select = Some(target.clone());
            }
            ui.label(format!("({tx}, {ty})"));
        });

        if is_selected {
            ui.horizontal(|ui| {
                ui.label(format!("Size {tw}x{th}"));
                if ui.small_button("W-").clicked() {
                    resize = Some((target.clone(), -1, 0));
                }
                if ui.small_button("W+").clicked() {
                    resize = Some((target.clone(), 1, 0));
                }
                if ui.small_button("H-").clicked() {
                    resize = Some((target.clone(), 0, -1));
                }
                if ui.small_button("H+").clicked() {
                    resize = Some((target.clone(), 0, 1));
                }
            });
        }
    }

    if session.tool() != Tool::Portal {
        ui.weak("Use the Portal tool to move the selected portal.");
    }

    if let Some(target) = select {
        session.select_portal_target(&target);
    }
    if let Some((target, dw, dh)) = resize {
        session.resize_portal(&target, dw, dh);
    }
}
