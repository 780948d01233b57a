use macroquad::prelude::*;

use crate::config::EngineConfig;
use crate::map::LayeredGrid;
use crate::render::CameraController;
use crate::spatial::{adjacent_action, resolve_step, AdjacentAction};
use crate::tileset::TileAtlas;

use super::input::JoystickInput;
use super::interaction::{ActionRegistry, InteractionContext, Inventory, Notice};
use super::menu::{Menu, MenuItem};

/// Result of pressing the select button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Menu closed by `Resume`
    Resumed,
    /// Inventory overlay opened
    InventoryOpened,
    /// `Settings` chosen
    Settings,
    /// `Exit` chosen; the owner should tear the view down
    Exit,
    /// An adjacent action's handler ran
    Interacted(String),
    /// The handler returned an error; its writes were rolled back
    Failed(String),
    /// The adjacent action names no registered handler
    Unhandled(Option<String>),
    /// Nothing adjacent to act on
    NothingAdjacent,
    /// The inventory overlay swallowed the press
    Ignored,
}

/// Everything the play view owns for one session.
///
/// Input callbacks only record state; [`PlaySession::tick`] reads it afresh
/// each frame.
#[derive(Debug)]
pub struct PlaySession {
    grid: LayeredGrid,
    sheet: TileAtlas,
    config: EngineConfig,
    camera_ctl: CameraController,
    actions: ActionRegistry,

    position: Vec2,
    camera: Vec2,

    input: JoystickInput,
    running: bool,
    menu: Menu,
    inventory_open: bool,
    inventory: Inventory,

    adjacent: Option<AdjacentAction>,
    notice: Option<Notice>,
}

impl PlaySession {
    /// Start a session with the entity at the floored map centre
    pub fn new(grid: LayeredGrid, sheet: TileAtlas, config: EngineConfig) -> Self {
        let camera_ctl = CameraController::new(config.viewport(), config.camera_margin_tiles);
        let position = (grid.pixel_size() / 2.0).floor();
        let mut session = Self {
            grid,
            sheet,
            config,
            camera_ctl,
            actions: ActionRegistry::with_builtins(),
            position,
            camera: Vec2::ZERO,
            input: JoystickInput::REST,
            running: false,
            menu: Menu::default(),
            inventory_open: false,
            inventory: Inventory::default(),
            adjacent: None,
            notice: None,
        };
        session.settle();
        log::info!(
            "play session on {}x{} map, entity at {:?}",
            session.grid.rows(),
            session.grid.cols(),
            session.position
        );
        session
    }

    /// Swap the dispatch table
    pub fn with_actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    /// The map being played
    pub fn grid(&self) -> &LayeredGrid {
        &self.grid
    }

    /// Sheet the map is drawn with
    pub fn sheet(&self) -> &TileAtlas {
        &self.sheet
    }

    /// Session tuning
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Entity position in map pixels
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleport the entity; camera and adjacency follow
    pub fn set_position(&mut self, pos: Vec2) {
        let extent = self.grid.pixel_size();
        self.position = pos.clamp(Vec2::ZERO, extent);
        self.settle();
    }

    /// Camera offset (viewport top-left in map pixels)
    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    /// Action cell next to the entity, as of the last tick
    pub fn adjacent(&self) -> Option<&AdjacentAction> {
        self.adjacent.as_ref()
    }

    /// Current transient notice
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Items collected so far
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Menu state
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Whether the inventory overlay is shown
    pub fn is_inventory_open(&self) -> bool {
        self.inventory_open
    }

    /// Whether the run button is held
    pub fn is_running(&self) -> bool {
        self.running
    }

    // === Input ===

    /// Record a joystick sample; `(0, 0, 0)` on release
    pub fn on_joystick(&mut self, dx: f32, dy: f32, magnitude: f32) {
        self.input = JoystickInput::new(dx, dy, magnitude);
    }

    /// Record a full sample
    pub fn set_input(&mut self, input: JoystickInput) {
        self.input = input;
    }

    /// Run button held or released
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Menu button: closes the inventory overlay if shown, otherwise toggles the menu
    pub fn menu_button(&mut self) {
        if self.inventory_open {
            self.inventory_open = false;
        } else {
            self.menu.toggle();
        }
    }

    /// Select button
    pub fn select(&mut self) -> SelectOutcome {
        if self.menu.is_open() {
            return self.activate(self.menu.focused());
        }
        if self.inventory_open {
            return SelectOutcome::Ignored;
        }

        let Some(hit) = self.adjacent.clone() else {
            self.post("Nothing to interact with");
            return SelectOutcome::NothingAdjacent;
        };
        let name = hit.payload.clone().unwrap_or_default();
        if name.is_empty() || !self.actions.contains(&name) {
            log::warn!("no handler for action '{}' at ({}, {})", name, hit.row, hit.col);
            self.post(format!("No action registered for '{name}'"));
            return SelectOutcome::Unhandled(hit.payload);
        }

        // a failing handler must not leave half its writes behind
        let saved = (self.grid.clone(), self.inventory.clone());
        let qty = self.config.interaction_quantity;
        let mut ctx = InteractionContext::new(
            &mut self.grid,
            &mut self.inventory,
            &mut self.notice,
            self.config.notice_ticks,
        );
        let outcome = match self.actions.dispatch(&name, &mut ctx, qty, hit.row, hit.col) {
            Ok(_) => SelectOutcome::Interacted(name),
            Err(e) => {
                log::warn!("action '{}' failed: {}", name, e);
                (self.grid, self.inventory) = saved;
                self.post(format!("Action '{name}' failed"));
                SelectOutcome::Failed(name)
            }
        };
        self.adjacent = adjacent_action(&self.grid, self.position);
        outcome
    }

    fn activate(&mut self, item: MenuItem) -> SelectOutcome {
        log::debug!("menu item {} selected", item);
        match item {
            MenuItem::Resume => {
                self.menu.set_open(false);
                SelectOutcome::Resumed
            }
            MenuItem::Inventory => {
                self.menu.set_open(false);
                self.inventory_open = true;
                SelectOutcome::InventoryOpened
            }
            MenuItem::Settings => {
                self.post("Selected: Settings");
                SelectOutcome::Settings
            }
            MenuItem::Exit => SelectOutcome::Exit,
        }
    }

    fn post(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            remaining: self.config.notice_ticks,
        });
    }

    // === Per-frame update ===

    /// One frame: move (or navigate the menu), then recompute camera and adjacency
    pub fn tick(&mut self) {
        let input = self.input;
        let cfg = &self.config;
        let speed = cfg.base_speed(self.running) * input.magnitude;
        let modal = self.menu.is_open() || self.inventory_open;

        if !modal && speed > cfg.move_epsilon {
            let step = resolve_step(&self.grid, self.position, input.direction() * speed);
            self.position = step.pos;
        }
        if self.menu.is_open() {
            self.menu
                .navigate(input.dy, cfg.menu_trigger_threshold, cfg.menu_rearm_threshold);
        }

        self.settle();

        if let Some(n) = self.notice.as_mut() {
            if !n.tick() {
                self.notice = None;
            }
        }
    }

    fn settle(&mut self) {
        self.camera = self.camera_ctl.compute_offset(&self.grid, self.position);
        self.adjacent = adjacent_action(&self.grid, self.position);
    }
}

/// Drives a [`PlaySession`] once per frame until its view is torn down
#[derive(Debug)]
pub struct MovementLoop {
    session: PlaySession,
    running: bool,
    ticks: u64,
}

impl MovementLoop {
    /// A running loop over `session`
    pub fn new(session: PlaySession) -> Self {
        log::debug!("movement loop started");
        Self {
            session,
            running: true,
            ticks: 0,
        }
    }

    /// Advance one frame. Returns `false` (and does nothing) once stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.session.tick();
        self.ticks += 1;
        true
    }

    /// No further ticks run after this
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("movement loop stopped after {} ticks", self.ticks);
        }
        self.running = false;
    }

    /// Whether ticks still run
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The driven session
    pub fn session(&self) -> &PlaySession {
        &self.session
    }

    /// Mutable access for input callbacks
    pub fn session_mut(&mut self) -> &mut PlaySession {
        &mut self.session
    }

    /// Tear down, keeping the session state
    pub fn into_session(self) -> PlaySession {
        self.session
    }
}
