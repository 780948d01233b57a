use macroquad::prelude::*;
use std::path::Path;
use tile_grid_engine::play::JoystickInput;
use tile_grid_engine::render::draw::draw_play_view;
use tile_grid_engine::{AtlasRegistry, EngineConfig, LoadedMap, MovementLoop, PlaySession, SelectOutcome};

const STICK_RADIUS: f32 = 50.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "Play".into(),
        window_width: 600,
        window_height: 400,
        ..Default::default()
    }
}

/// Arrow keys stand in for the on-screen stick; a mouse drag works too.
fn read_stick(drag_origin: &mut Option<Vec2>) -> JoystickInput {
    if is_mouse_button_pressed(MouseButton::Left) {
        *drag_origin = Some(mouse_position().into());
    }
    if is_mouse_button_released(MouseButton::Left) {
        *drag_origin = None;
    }
    if let Some(origin) = drag_origin {
        let offset = Vec2::from(mouse_position()) - *origin;
        return JoystickInput::from_drag(offset, STICK_RADIUS);
    }

    let mut dir = Vec2::ZERO;
    if is_key_down(KeyCode::Left) {
        dir.x -= 1.0;
    }
    if is_key_down(KeyCode::Right) {
        dir.x += 1.0;
    }
    if is_key_down(KeyCode::Up) {
        dir.y -= 1.0;
    }
    if is_key_down(KeyCode::Down) {
        dir.y += 1.0;
    }
    JoystickInput::from_drag(dir, 1.0)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let cfg = EngineConfig::load("engine.json");
    let registry = AtlasRegistry::builtin();
    let map = LoadedMap::load("assets/maps/sample.json", &registry, Path::new("."))
        .await
        .expect("Failed to load map");

    let mut game = MovementLoop::new(PlaySession::new(map.grid, map.sheet, cfg));
    let mut drag_origin = None;

    while game.is_running() {
        let session = game.session_mut();
        session.set_input(read_stick(&mut drag_origin));
        session.set_running(is_key_down(KeyCode::LeftShift));
        if is_key_pressed(KeyCode::Escape) {
            session.menu_button();
        }
        if is_key_pressed(KeyCode::Space) && session.select() == SelectOutcome::Exit {
            game.stop();
        }

        game.tick();

        clear_background(BLACK);
        let s = game.session();
        draw_play_view(
            s.grid(),
            &map.texture,
            s.sheet(),
            s.camera(),
            s.config().viewport(),
            s.position(),
        );

        if let Some(hit) = s.adjacent() {
            let label = hit.payload.as_deref().unwrap_or("?");
            draw_text(&format!("[Space] {label}"), 10.0, screen_height() - 20.0, 24.0, YELLOW);
        }
        if let Some(notice) = s.notice() {
            draw_text(&notice.text, 10.0, 30.0, 28.0, WHITE);
        }
        if s.menu().is_open() {
            draw_rectangle(200.0, 100.0, 200.0, 180.0, Color::new(0.0, 0.0, 0.0, 0.7));
            for (i, item) in tile_grid_engine::play::MenuItem::ALL.iter().enumerate() {
                let color = if i == s.menu().focus() { YELLOW } else { WHITE };
                draw_text(&item.to_string(), 230.0, 140.0 + i as f32 * 36.0, 28.0, color);
            }
        }
        if s.is_inventory_open() {
            draw_rectangle(150.0, 80.0, 300.0, 220.0, Color::new(0.0, 0.0, 0.0, 0.7));
            draw_text("Inventory", 170.0, 110.0, 28.0, WHITE);
            for (i, (item, count)) in s.inventory().items().enumerate() {
                draw_text(&format!("{item}: {count}"), 170.0, 150.0 + i as f32 * 30.0, 24.0, WHITE);
            }
        }

        next_frame().await;
    }
}
