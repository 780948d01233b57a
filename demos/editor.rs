use macroquad::prelude::*;
use std::path::Path;
use tile_grid_engine::render::draw::{draw_editor_view, draw_palette, load_sheet_texture};
use tile_grid_engine::{AtlasRegistry, BrushEditor, CollisionKind, EngineConfig, LayerKind, WriteState};

const MAP_ORIGIN: Vec2 = vec2(20.0, 60.0);
const PALETTE_GAP: f32 = 1.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "Map Editor".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn cell_under(pos: Vec2, origin: Vec2, size: Vec2, rows: usize, cols: usize) -> Option<(usize, usize)> {
    let p = pos - origin;
    if p.x < 0.0 || p.y < 0.0 {
        return None;
    }
    let (row, col) = ((p.y / size.y) as usize, (p.x / size.x) as usize);
    (row < rows && col < cols).then_some((row, col))
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let cfg = EngineConfig::load("engine.json");
    let mut ed = BrushEditor::with_config(AtlasRegistry::builtin(), &cfg).expect("builtin sheets");
    let mut texture = load_sheet_texture(ed.sheet(), Path::new("."))
        .await
        .expect("Failed to load tile sheet");
    let mut payload = String::new();
    let mut last_cell = None;

    loop {
        let mouse = Vec2::from(mouse_position());
        let grid_w = ed.grid().pixel_size().x;
        let palette_origin = MAP_ORIGIN + vec2(grid_w + 40.0, 0.0);

        // layer / kind hotkeys
        for (key, layer) in [(KeyCode::Key1, LayerKind::Base), (KeyCode::Key2, LayerKind::Overlay), (KeyCode::Key3, LayerKind::Collision)] {
            if is_key_pressed(key) {
                ed.set_active_layer(layer);
            }
        }
        for (key, code) in [(KeyCode::F1, 0), (KeyCode::F2, 1), (KeyCode::F3, 2), (KeyCode::F4, 3), (KeyCode::F5, 4)] {
            if let (true, Some(kind)) = (is_key_pressed(key), CollisionKind::from_code(code)) {
                ed.set_selected_collision(kind);
            }
        }
        if is_key_pressed(KeyCode::Tab) {
            let next = ed
                .registry()
                .sheets()
                .iter()
                .map(|s| s.id.clone())
                .find(|id| *id != ed.sheet().id);
            if let Some(id) = next {
                if ed.select_sheet(&id).is_ok() {
                    match load_sheet_texture(ed.sheet(), Path::new(".")).await {
                        Ok(t) => texture = t,
                        Err(e) => log::error!("{e:#}"),
                    }
                }
            }
        }
        if is_key_pressed(KeyCode::G) {
            if let Err(e) = ed.generate_map(cfg.default_rows, cfg.default_cols) {
                log::error!("{e}");
            }
        }
        if is_key_pressed(KeyCode::E) {
            match ed.export_document() {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("{e}"),
            }
        }

        // pending Action/Teleport prompt swallows input until answered
        if matches!(ed.write_state(), WriteState::PendingWrite { .. }) {
            while let Some(c) = get_char_pressed() {
                if !c.is_control() {
                    payload.push(c);
                }
            }
            if is_key_pressed(KeyCode::Backspace) {
                payload.pop();
            }
            if is_key_pressed(KeyCode::Enter) {
                if let Err(e) = ed.confirm(std::mem::take(&mut payload)) {
                    log::error!("{e}");
                }
            }
            if is_key_pressed(KeyCode::Escape) {
                payload.clear();
                ed.cancel();
            }
        } else {
            let sheet = ed.sheet().clone();
            let tile = vec2(sheet.tile_width as f32, sheet.tile_height as f32);
            let palette_hit = cell_under(mouse, palette_origin, tile + PALETTE_GAP, sheet.rows as usize, sheet.columns as usize)
                .and_then(|(r, c)| sheet.index_at(r as u32, c as u32).ok());
            let map_hit = cell_under(mouse, MAP_ORIGIN, ed.grid().tile_size(), ed.grid().rows(), ed.grid().cols());

            let result = match (palette_hit, map_hit) {
                (Some(index), _) if is_mouse_button_pressed(MouseButton::Left) => ed.begin_selection(index),
                (Some(index), _) if is_mouse_button_down(MouseButton::Left) => ed.extend_selection(index),
                (_, Some((r, c))) if is_mouse_button_pressed(MouseButton::Left) => {
                    last_cell = Some((r, c));
                    ed.pointer_down(r, c).map(|_| ())
                }
                (_, Some(cell)) if last_cell != Some(cell) => {
                    last_cell = Some(cell);
                    ed.pointer_enter(cell.0, cell.1).map(|_| ())
                }
                _ => Ok(()),
            };
            if let Err(e) = result {
                log::warn!("{e}");
            }
            if is_mouse_button_released(MouseButton::Left) {
                if let Err(e) = ed.end_selection() {
                    log::warn!("{e}");
                }
                ed.pointer_up();
            }
        }

        clear_background(DARKGRAY);
        draw_editor_view(ed.grid(), &texture, ed.sheet(), MAP_ORIGIN);
        draw_palette(ed.sheet(), &texture, palette_origin, PALETTE_GAP, ed.selection());

        let brush = ed
            .brush()
            .map(|b| format!("{} x {}", b.dims().0, b.dims().1))
            .unwrap_or_else(|| "none".into());
        draw_text(
            &format!(
                "sheet: {}  layer: {}  collision: {:?}  brush: {}",
                ed.sheet().name,
                ed.active_layer(),
                ed.selected_collision(),
                brush
            ),
            20.0,
            30.0,
            24.0,
            WHITE,
        );
        if let WriteState::PendingWrite { kind, .. } = ed.write_state() {
            let prompt = if *kind == CollisionKind::Action { "Action Function" } else { "Teleport Target" };
            draw_rectangle(300.0, 250.0, 500.0, 120.0, Color::new(0.0, 0.0, 0.0, 0.85));
            draw_text(prompt, 320.0, 285.0, 28.0, WHITE);
            draw_text(&format!("> {payload}_"), 320.0, 330.0, 28.0, YELLOW);
        }

        next_frame().await;
    }
}
