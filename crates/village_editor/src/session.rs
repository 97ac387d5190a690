//! Editor session state machine
//!
//! [`EditorSession`] owns the map being edited, the asset catalog and the
//! undo history. It knows nothing about Bevy input or egui: the viewport and
//! the panels translate user gestures into the operations below, which keeps
//! every editing rule testable on its own.

use crate::commands::UndoHistory;
use crate::project::exchange::{self, ImportError};
use crate::project::{starter_assets, CollisionCell, MapState, PlacedObject};
use bevy::prelude::Resource;
use rand::Rng;
use serde::{Deserialize, Serialize};
use village_core::constants::SCALE;
use village_core::{short_id, AssetCategory, AssetDefinition, DocumentError, MapDocument};

/// The six editing tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Stamp the selected asset
    #[default]
    Place,
    /// Toggle blocked cells
    Collision,
    /// Remove objects and blocked cells
    Eraser,
    /// Move the portal of the selected target
    Portal,
    /// Move the player spawn
    Spawn,
    /// Use the selected asset as the map background
    Border,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Place,
        Tool::Collision,
        Tool::Eraser,
        Tool::Portal,
        Tool::Spawn,
        Tool::Border,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Place => "Place",
            Tool::Collision => "Collision",
            Tool::Eraser => "Eraser",
            Tool::Portal => "Portal",
            Tool::Spawn => "Spawn",
            Tool::Border => "Border",
        }
    }

    /// Whether the tool has a rectangular fill
    pub fn supports_fill(self) -> bool {
        matches!(self, Tool::Place | Tool::Collision | Tool::Eraser)
    }
}

/// Inclusive tile rectangle with normalized corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub min: (i32, i32),
    pub max: (i32, i32),
}

impl TileRect {
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            min: (a.0.min(b.0), a.1.min(b.1)),
            max: (a.0.max(b.0), a.1.max(b.1)),
        }
    }

    pub fn contains(&self, tx: i32, ty: i32) -> bool {
        tx >= self.min.0 && tx <= self.max.0 && ty >= self.min.1 && ty <= self.max.1
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.min.1..=self.max.1).flat_map(move |ty| (self.min.0..=self.max.0).map(move |tx| (tx, ty)))
    }
}

/// Everything the editor is working on
#[derive(Resource, Debug, Clone)]
pub struct EditorSession {
    state: MapState,
    assets: Vec<AssetDefinition>,
    history: UndoHistory<MapState>,
    tool: Tool,
    selected_asset: Option<String>,
    portal_target: String,

    // fill gesture
    fill_modifier: bool,
    fill_start: Option<(i32, i32)>,

    // paint gesture
    pointer_held: bool,
    last_applied: Option<(i32, i32)>,

    /// Bumped on every change that affects what the canvas shows
    revision: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            state: MapState::new(),
            assets: starter_assets(),
            history: UndoHistory::default(),
            tool: Tool::default(),
            selected_asset: None,
            portal_target: "PORTFOLIO".to_string(),
            fill_modifier: false,
            fill_start: None,
            pointer_held: false,
            last_applied: None,
            revision: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn assets(&self) -> &[AssetDefinition] {
        &self.assets
    }

    pub fn asset(&self, id: &str) -> Option<&AssetDefinition> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn selected_asset(&self) -> Option<&AssetDefinition> {
        self.selected_asset.as_deref().and_then(|id| self.asset(id))
    }

    pub fn portal_target(&self) -> &str {
        &self.portal_target
    }

    pub fn fill_start(&self) -> Option<(i32, i32)> {
        self.fill_start.filter(|_| self.fill_modifier)
    }

    pub fn is_fill_modifier_held(&self) -> bool {
        self.fill_modifier
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn snapshot(&mut self) {
        self.history.push(self.state.clone());
    }

    // ------------------------------------------------------------------
    // Selection

    /// Switch tools. Map state is never affected.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Pick an asset from the palette.
    ///
    /// With the Border tool active this sets the map background directly.
    pub fn select_asset(&mut self, asset_id: &str) -> bool {
        if self.asset(asset_id).is_none() {
            return false;
        }
        if self.tool == Tool::Border {
            self.set_border(asset_id);
        }
        self.selected_asset = Some(asset_id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected_asset = None;
    }

    /// Choose which portal the Portal tool moves
    pub fn select_portal_target(&mut self, target: &str) -> bool {
        if self.state.portal_for_target(target).is_none() {
            return false;
        }
        self.portal_target = target.to_string();
        true
    }

    fn set_border(&mut self, asset_id: &str) -> bool {
        if self.state.config.border_asset_id.as_deref() == Some(asset_id) {
            return false;
        }
        self.snapshot();
        self.state.config.border_asset_id = Some(asset_id.to_string());
        self.touch();
        true
    }

    // ------------------------------------------------------------------
    // Point and fill actions

    /// Apply the active tool to one tile.
    ///
    /// While the fill modifier is held, the first in-bounds tile latches the
    /// fill start and a later, different tile commits the rectangle. Tiles
    /// outside the map are ignored. Returns whether the map changed.
    pub fn apply_at(&mut self, tx: i32, ty: i32) -> bool {
        if !self.state.in_bounds(tx, ty) {
            return false;
        }

        if self.fill_modifier {
            return match self.fill_start {
                None => {
                    self.fill_start = Some((tx, ty));
                    false
                }
                Some(start) if start == (tx, ty) => false,
                Some(start) => {
                    self.fill_start = None;
                    self.fill(TileRect::from_corners(start, (tx, ty)))
                }
            };
        }

        self.point_action(tx, ty)
    }

    fn point_action(&mut self, tx: i32, ty: i32) -> bool {
        match self.tool {
            Tool::Place => {
                let Some(asset) = self.selected_asset() else {
                    return false;
                };
                let object = PlacedObject::of_asset(asset, tx, ty);
                self.snapshot();
                self.state.objects.push(object);
            }
            Tool::Collision => {
                self.snapshot();
                match self.state.collision_at(tx, ty) {
                    Some(index) => {
                        self.state.collisions.remove(index);
                    }
                    None => self.state.collisions.push(CollisionCell::new(tx, ty)),
                }
            }
            Tool::Eraser => {
                let occupied = self.state.objects_at(tx, ty).next().is_some()
                    || self.state.collision_at(tx, ty).is_some();
                if !occupied {
                    return false;
                }
                self.snapshot();
                self.state.objects.retain(|o| o.tx != tx || o.ty != ty);
                self.state.collisions.retain(|c| c.tx != tx || c.ty != ty);
            }
            Tool::Portal => {
                let target = self.portal_target.clone();
                let Some(portal) = self.state.portal_for_target(&target) else {
                    return false;
                };
                if (portal.tx, portal.ty) == (tx, ty) {
                    return false;
                }
                self.snapshot();
                if let Some(portal) = self.state.portal_for_target_mut(&target) {
                    portal.tx = tx;
                    portal.ty = ty;
                }
            }
            Tool::Spawn => {
                let config = &self.state.config;
                if (config.spawn_tx, config.spawn_ty) == (tx, ty) {
                    return false;
                }
                self.snapshot();
                self.state.config.spawn_tx = tx;
                self.state.config.spawn_ty = ty;
            }
            Tool::Border => {
                let Some(asset_id) = self.selected_asset.clone() else {
                    return false;
                };
                if self.asset(&asset_id).is_none() {
                    return false;
                }
                return self.set_border(&asset_id);
            }
        }
        self.touch();
        true
    }

    /// Apply the active tool to every cell of a rectangle as one undo step
    pub fn fill(&mut self, rect: TileRect) -> bool {
        match self.tool {
            Tool::Place => {
                let Some(asset) = self.selected_asset() else {
                    return false;
                };
                let stamped: Vec<_> = rect
                    .cells()
                    .map(|(tx, ty)| PlacedObject::of_asset(asset, tx, ty))
                    .collect();
                self.snapshot();
                self.state.objects.extend(stamped);
            }
            Tool::Collision => {
                let fresh: Vec<_> = rect
                    .cells()
                    .filter(|&(tx, ty)| self.state.collision_at(tx, ty).is_none())
                    .map(|(tx, ty)| CollisionCell::new(tx, ty))
                    .collect();
                if fresh.is_empty() {
                    return false;
                }
                self.snapshot();
                self.state.collisions.extend(fresh);
            }
            Tool::Eraser => {
                self.snapshot();
                self.state.objects.retain(|o| !rect.contains(o.tx, o.ty));
                self.state.collisions.retain(|c| !rect.contains(c.tx, c.ty));
            }
            Tool::Portal | Tool::Spawn | Tool::Border => return false,
        }
        self.touch();
        true
    }

    pub fn press_fill_modifier(&mut self) {
        self.fill_modifier = true;
    }

    /// Releasing the modifier drops a pending fill start without committing
    pub fn release_fill_modifier(&mut self) {
        self.fill_modifier = false;
        self.fill_start = None;
    }

    // ------------------------------------------------------------------
    // Pointer gesture

    pub fn pointer_down(&mut self, tx: i32, ty: i32) -> bool {
        self.pointer_held = true;
        self.last_applied = None;
        self.paint_at(tx, ty)
    }

    /// Re-apply while held, skipping the tile that was just painted
    pub fn pointer_move(&mut self, tx: i32, ty: i32) -> bool {
        if !self.pointer_held {
            return false;
        }
        self.paint_at(tx, ty)
    }

    /// Ends the gesture; may arrive from anywhere in the window
    pub fn pointer_up(&mut self) {
        self.pointer_held = false;
        self.last_applied = None;
    }

    pub fn is_pointer_held(&self) -> bool {
        self.pointer_held
    }

    fn paint_at(&mut self, tx: i32, ty: i32) -> bool {
        if self.fill_modifier {
            return self.apply_at(tx, ty);
        }
        if self.last_applied == Some((tx, ty)) {
            return false;
        }
        self.last_applied = Some((tx, ty));
        self.apply_at(tx, ty)
    }

    // ------------------------------------------------------------------
    // History

    /// Restore the snapshot taken before the last mutation
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.touch();
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Asset library (not covered by undo)

    pub fn add_asset(&mut self, asset: AssetDefinition) -> String {
        let id = asset.id.clone();
        self.assets.retain(|a| a.id != id);
        self.assets.push(asset);
        self.touch();
        id
    }

    /// Add an uploaded image covering its full size at native scale
    pub fn add_uploaded_asset(
        &mut self,
        source: impl Into<String>,
        name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> String {
        let name = name.into();
        let category = AssetCategory::infer_from_name(&name);
        let asset = AssetDefinition::uploaded(
            short_id("custom_"),
            source,
            width.max(1) as i32,
            height.max(1) as i32,
            name,
        )
        .with_category(category);
        self.add_asset(asset)
    }

    /// Drop an asset from the catalog. Placements referencing it are kept.
    pub fn remove_asset(&mut self, asset_id: &str) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != asset_id);
        if self.assets.len() == before {
            return false;
        }
        if self.selected_asset.as_deref() == Some(asset_id) {
            self.selected_asset = None;
        }
        self.touch();
        true
    }

    /// Change an asset's scale multiplier.
    ///
    /// Existing placements of the asset are rescaled by the same ratio.
    /// Non-finite or non-positive values are rejected.
    pub fn rescale_asset(&mut self, asset_id: &str, scale: f32) -> bool {
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        let Some(asset) = self.assets.iter_mut().find(|a| a.id == asset_id) else {
            return false;
        };
        let ratio = scale / asset.effective_scale();
        asset.scale = Some(scale);

        for object in self.state.objects.iter_mut().filter(|o| o.asset_id == asset_id) {
            object.scale = Some(object.display_scale() * ratio);
        }
        self.touch();
        true
    }

    pub fn set_asset_category(&mut self, asset_id: &str, category: AssetCategory) -> bool {
        let Some(asset) = self.assets.iter_mut().find(|a| a.id == asset_id) else {
            return false;
        };
        asset.category = Some(category);
        self.touch();
        true
    }

    // ------------------------------------------------------------------
    // Per-object edits

    pub fn toggle_above_player(&mut self, object_id: &str) -> bool {
        if self.state.object_mut(object_id).is_none() {
            return false;
        }
        self.snapshot();
        if let Some(object) = self.state.object_mut(object_id) {
            object.is_above_player = !object.is_above_player;
        }
        self.touch();
        true
    }

    /// Set an object's scale; missing or unusable input falls back to the render scale
    pub fn set_object_scale(&mut self, object_id: &str, scale: Option<f32>) -> bool {
        if self.state.object_mut(object_id).is_none() {
            return false;
        }
        let scale = scale
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(SCALE as f32);
        self.snapshot();
        if let Some(object) = self.state.object_mut(object_id) {
            object.scale = Some(scale);
        }
        self.touch();
        true
    }

    pub fn remove_object(&mut self, object_id: &str) -> bool {
        if self.state.object_mut(object_id).is_none() {
            return false;
        }
        self.snapshot();
        self.state.objects.retain(|o| o.id != object_id);
        self.touch();
        true
    }

    /// Scatter `count` copies of an asset over uniformly random tiles as one undo step
    pub fn distribute_randomly<R: Rng + ?Sized>(
        &mut self,
        asset_id: &str,
        count: i64,
        rng: &mut R,
    ) -> usize {
        if count <= 0 {
            return 0;
        }
        let Some(asset) = self.asset(asset_id) else {
            return 0;
        };
        let (w, h) = (self.state.config.tiles_w, self.state.config.tiles_h);
        let scattered: Vec<_> = (0..count)
            .map(|_| PlacedObject::of_asset(asset, rng.gen_range(0..w), rng.gen_range(0..h)))
            .collect();

        self.snapshot();
        let placed = scattered.len();
        self.state.objects.extend(scattered);
        self.touch();
        placed
    }

    // ------------------------------------------------------------------
    // Map settings

    /// Resize the map in tiles; each side is at least one tile
    pub fn resize_map(&mut self, tiles_w: i32, tiles_h: i32) {
        let config = &mut self.state.config;
        config.tiles_w = tiles_w.max(1);
        config.tiles_h = tiles_h.max(1);
        self.touch();
    }

    /// Grow or shrink the selected portal; each side is at least one tile
    pub fn resize_portal(&mut self, target: &str, delta_w: i32, delta_h: i32) -> bool {
        let Some(portal) = self.state.portal_for_target_mut(target) else {
            return false;
        };
        portal.tw = (portal.tw + delta_w).max(1);
        portal.th = (portal.th + delta_h).max(1);
        self.touch();
        true
    }

    // ------------------------------------------------------------------
    // Exchange

    pub fn export_document(&self) -> MapDocument {
        exchange::export_document(&self.state, &self.assets)
    }

    /// Pretty-printed document for the clipboard
    pub fn export_json(&self) -> Result<String, DocumentError> {
        self.export_document().to_json_pretty()
    }

    /// Replace the whole session from pasted JSON.
    ///
    /// On any failure nothing changes.
    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let (state, assets) = exchange::parse_import(text)?;

        self.snapshot();
        self.state = state;
        self.assets = assets;
        if self.selected_asset().is_none() {
            self.selected_asset = None;
        }
        if self.state.portal_for_target(&self.portal_target).is_none() {
            if let Some(first) = self.state.portals.first() {
                self.portal_target = first.target.clone();
            }
        }
        self.fill_start = None;
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn placing_session() -> EditorSession {
        let mut session = EditorSession::new();
        assert!(session.select_asset("tree_1"));
        session
    }

    #[test]
    fn test_place_then_export() {
        let mut session = placing_session();
        assert!(session.apply_at(5, 5));

        let document = session.export_document();
        assert_eq!(document.objects.len(), 1);
        let object = &document.objects[0];
        assert_eq!((object.x, object.y), (240, 240));
        assert!(!object.is_above_player);
        assert_eq!(object.asset_id, "tree_1");
    }

    #[test]
    fn test_place_requires_selection() {
        let mut session = EditorSession::new();
        assert!(!session.apply_at(1, 1));
        assert!(session.state().objects.is_empty());
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_collision_toggle() {
        let mut session = EditorSession::new();
        session.set_tool(Tool::Collision);

        session.apply_at(3, 3);
        let document = session.export_document();
        assert_eq!(document.collisions.len(), 1);
        assert_eq!((document.collisions[0].x, document.collisions[0].y), (144, 144));

        session.apply_at(3, 3);
        assert!(session.export_document().collisions.is_empty());
    }

    #[test]
    fn test_out_of_bounds_never_mutates() {
        let mut session = placing_session();
        for tool in Tool::ALL {
            session.set_tool(tool);
            for (tx, ty) in [(-1, 0), (0, -1), (32, 0), (0, 32), (100, 100)] {
                assert!(!session.apply_at(tx, ty));
            }
        }
        assert_eq!(session.state(), &MapState::new());
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_fill_place_rectangle() {
        let mut session = placing_session();
        session.press_fill_modifier();
        assert!(!session.apply_at(1, 1));
        assert_eq!(session.fill_start(), Some((1, 1)));
        assert!(session.apply_at(0, 0));

        let mut tiles: Vec<_> = session.state().objects.iter().map(|o| (o.tx, o.ty)).collect();
        tiles.sort();
        assert_eq!(tiles, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.fill_start(), None);
    }

    #[test]
    fn test_fill_collision_skips_occupied() {
        let mut session = EditorSession::new();
        session.set_tool(Tool::Collision);
        session.apply_at(1, 1);

        session.press_fill_modifier();
        session.apply_at(0, 0);
        session.apply_at(2, 2);
        assert_eq!(session.state().collisions.len(), 9);
    }

    #[test]
    fn test_fill_eraser() {
        let mut session = placing_session();
        session.apply_at(0, 0);
        session.apply_at(5, 5);
        session.set_tool(Tool::Collision);
        session.apply_at(1, 1);

        session.set_tool(Tool::Eraser);
        session.press_fill_modifier();
        session.apply_at(0, 0);
        session.apply_at(2, 2);

        assert_eq!(session.state().objects.len(), 1);
        assert_eq!(session.state().objects[0].tx, 5);
        assert!(session.state().collisions.is_empty());
    }

    #[test]
    fn test_release_modifier_cancels_fill() {
        let mut session = placing_session();
        session.press_fill_modifier();
        session.apply_at(0, 0);
        session.release_fill_modifier();

        session.press_fill_modifier();
        // latches again instead of committing
        assert!(!session.apply_at(3, 3));
        assert!(session.state().objects.is_empty());
    }

    #[test]
    fn test_drag_does_not_restack() {
        let mut session = placing_session();
        assert!(session.pointer_down(2, 2));
        assert!(!session.pointer_move(2, 2));
        assert!(session.pointer_move(3, 2));
        session.pointer_up();
        assert!(!session.pointer_move(4, 2));
        assert_eq!(session.state().objects.len(), 2);

        // a fresh click on the same tile places again
        assert!(session.pointer_down(3, 2));
        assert_eq!(session.state().objects.len(), 3);
    }

    #[test]
    fn test_eraser_point() {
        let mut session = placing_session();
        session.apply_at(4, 4);
        session.apply_at(4, 4);
        session.set_tool(Tool::Collision);
        session.apply_at(4, 4);

        session.set_tool(Tool::Eraser);
        assert!(session.apply_at(4, 4));
        assert!(session.state().objects.is_empty());
        assert!(session.state().collisions.is_empty());
        assert!(!session.apply_at(4, 4));
    }

    #[test]
    fn test_portal_spawn_border_tools() {
        let mut session = EditorSession::new();

        session.set_tool(Tool::Portal);
        assert!(session.select_portal_target("GALLERY"));
        session.apply_at(1, 2);
        let gallery = session.state().portal_for_target("GALLERY").unwrap();
        assert_eq!((gallery.tx, gallery.ty), (1, 2));
        assert_eq!(session.state().portals.len(), 3);
        assert!(!session.select_portal_target("NOWHERE"));

        session.set_tool(Tool::Spawn);
        session.apply_at(7, 9);
        assert_eq!(
            (session.state().config.spawn_tx, session.state().config.spawn_ty),
            (7, 9)
        );

        session.set_tool(Tool::Border);
        assert!(!session.apply_at(0, 0));
        session.select_asset("rock_1");
        assert_eq!(
            session.state().config.border_asset_id.as_deref(),
            Some("rock_1")
        );
    }

    #[test]
    fn test_undo_restores_exactly() {
        let mut session = placing_session();
        let initial = session.state().clone();

        session.apply_at(0, 0);
        session.set_tool(Tool::Collision);
        session.apply_at(1, 1);
        session.set_tool(Tool::Spawn);
        session.apply_at(2, 2);
        assert_eq!(session.history_len(), 3);

        for _ in 0..3 {
            assert!(session.undo());
        }
        assert_eq!(session.state(), &initial);
        assert!(!session.undo());
    }

    #[test]
    fn test_history_bounded() {
        let mut session = EditorSession::new();
        session.set_tool(Tool::Collision);
        for tx in 0..21 {
            session.apply_at(tx, 0);
        }
        assert_eq!(session.history_len(), 20);
    }

    #[test]
    fn test_undo_ignores_catalog() {
        let mut session = placing_session();
        session.apply_at(0, 0);
        session.add_uploaded_asset("/tmp/cat.png", "cat.png", 20, 10);
        session.undo();
        assert_eq!(session.assets().len(), 4);
        assert!(session.state().objects.is_empty());
    }

    #[test]
    fn test_uploaded_asset() {
        let mut session = EditorSession::new();
        let id = session.add_uploaded_asset("/tmp/cat.png", "cat.png", 20, 10);
        let asset = session.asset(&id).unwrap();
        assert!(id.starts_with("custom_"));
        assert!(asset.is_custom);
        assert_eq!((asset.x, asset.y, asset.w, asset.h), (0, 0, 20, 10));
        assert_eq!(asset.scale, Some(1.0));
    }

    #[test]
    fn test_remove_asset_keeps_placements() {
        let mut session = placing_session();
        session.apply_at(0, 0);
        assert!(session.remove_asset("tree_1"));
        assert!(session.selected_asset().is_none());
        assert_eq!(session.state().objects.len(), 1);
        assert_eq!(session.export_document().objects[0].w, None);
    }

    #[test]
    fn test_rescale_asset() {
        let mut session = placing_session();
        session.apply_at(0, 0);
        assert!(!session.rescale_asset("tree_1", 0.0));
        assert!(!session.rescale_asset("tree_1", f32::NAN));
        assert!(session.rescale_asset("tree_1", 2.0));

        assert_eq!(session.state().objects[0].scale, Some(6.0));
        session.apply_at(1, 0);
        assert_eq!(session.state().objects[1].scale, Some(6.0));
    }

    #[test]
    fn test_object_edits() {
        let mut session = placing_session();
        session.apply_at(0, 0);
        let id = session.state().objects[0].id.clone();

        assert!(session.toggle_above_player(&id));
        assert!(session.state().objects[0].is_above_player);

        session.set_object_scale(&id, Some(1.5));
        assert_eq!(session.state().objects[0].scale, Some(1.5));
        session.set_object_scale(&id, None);
        assert_eq!(session.state().objects[0].scale, Some(3.0));
        session.set_object_scale(&id, Some(0.0));
        assert_eq!(session.state().objects[0].scale, Some(3.0));

        session.undo();
        session.undo();
        assert_eq!(session.state().objects[0].scale, Some(1.5));

        assert!(session.remove_object(&id));
        assert!(session.state().objects.is_empty());
        assert!(!session.toggle_above_player("missing"));
    }

    #[test]
    fn test_distribute_randomly() {
        let mut session = EditorSession::new();
        let mut rng = SmallRng::seed_from_u64(9);

        assert_eq!(session.distribute_randomly("rock_1", 0, &mut rng), 0);
        assert_eq!(session.distribute_randomly("rock_1", -3, &mut rng), 0);
        assert_eq!(session.history_len(), 0);

        assert_eq!(session.distribute_randomly("rock_1", 50, &mut rng), 50);
        assert_eq!(session.history_len(), 1);
        assert!(session
            .state()
            .objects
            .iter()
            .all(|o| session.state().in_bounds(o.tx, o.ty)));

        session.undo();
        assert!(session.state().objects.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let mut session = placing_session();
        session.apply_at(5, 5);
        session.select_asset("house_1");
        session.apply_at(9, 3);
        let id = session.state().objects[1].id.clone();
        session.toggle_above_player(&id);
        session.set_tool(Tool::Collision);
        session.apply_at(3, 3);
        session.apply_at(31, 31);
        session.set_tool(Tool::Spawn);
        session.apply_at(4, 6);
        session.set_tool(Tool::Border);
        session.select_asset("rock_1");
        session.resize_portal("SOCIAL", 1, 0);

        let json = session.export_json().unwrap();
        let mut fresh = EditorSession::new();
        fresh.import_json(&json).unwrap();

        assert_eq!(fresh.state(), session.state());
        assert_eq!(fresh.assets(), session.assets());
    }

    #[test]
    fn test_failed_import_leaves_state() {
        let mut session = placing_session();
        session.apply_at(1, 1);
        let before = session.state().clone();
        let history = session.history_len();

        assert!(session.import_json("{ \"objects\": [] }").is_err());
        assert!(session.import_json("garbage").is_err());
        assert_eq!(session.state(), &before);
        assert_eq!(session.history_len(), history);
        assert_eq!(session.assets().len(), 3);
    }

    #[test]
    fn test_switching_tools_has_no_side_effect() {
        let mut session = placing_session();
        session.apply_at(1, 1);
        let revision = session.revision();
        for tool in Tool::ALL {
            session.set_tool(tool);
        }
        assert_eq!(session.revision(), revision);
        assert_eq!(session.state().objects.len(), 1);
    }
}
