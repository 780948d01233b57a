use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::GridError;
use crate::layer::{CollisionCell, LayerKind};
use crate::map::LayeredGrid;

/// Item counts picked up during a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    /// Add `qty` of `item`
    pub fn add(&mut self, item: &str, qty: u32) {
        *self.items.entry(item.to_owned()).or_insert(0) += qty;
    }

    /// How many of `item` are held
    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// `(item, count)` pairs in name order
    pub fn items(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A transient message shown over the play view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text
    pub text: String,
    /// Ticks left before it disappears
    pub remaining: u32,
}

impl Notice {
    /// Count one tick down; `false` once expired
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }
}

/// What an action handler may touch
pub struct InteractionContext<'a> {
    grid: &'a mut LayeredGrid,
    inventory: &'a mut Inventory,
    notice: &'a mut Option<Notice>,
    notice_ticks: u32,
}

impl<'a> InteractionContext<'a> {
    /// Borrow the session state a handler needs
    pub fn new(
        grid: &'a mut LayeredGrid,
        inventory: &'a mut Inventory,
        notice: &'a mut Option<Notice>,
        notice_ticks: u32,
    ) -> Self {
        Self {
            grid,
            inventory,
            notice,
            notice_ticks,
        }
    }

    /// Clear the overlay tile at `(row, col)`
    pub fn remove_overlay_tile(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.grid.set_tile(LayerKind::Overlay, row, col, None)
    }

    /// Reset the collision cell at `(row, col)` to walkable
    pub fn clear_collision_tile(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.grid.set_collision(row, col, CollisionCell::Walkable)
    }

    /// The session inventory
    pub fn inventory(&mut self) -> &mut Inventory {
        self.inventory
    }

    /// Read-only view of the map
    pub fn grid(&self) -> &LayeredGrid {
        self.grid
    }

    /// Replace the current notice
    pub fn notify(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("notice: {}", text);
        *self.notice = Some(Notice {
            text,
            remaining: self.notice_ticks,
        });
    }
}

/// Handler signature: `(context, quantity, row, col)`
pub type ActionHandler = Box<dyn Fn(&mut InteractionContext<'_>, u32, usize, usize) -> Result<(), GridError>>;

/// Harvest wood: the tree's overlay tile and collision go away, wood is added.
pub fn get_wood(ctx: &mut InteractionContext<'_>, qty: u32, row: usize, col: usize) -> Result<(), GridError> {
    ctx.remove_overlay_tile(row, col)?;
    ctx.clear_collision_tile(row, col)?;
    ctx.inventory().add("wood", qty);
    ctx.notify(format!("Picked up {qty} wood!"));
    Ok(())
}

/// Payload name to handler table
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("ActionRegistry").field("handlers", &names).finish()
    }
}

impl ActionRegistry {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with `getWood` registered
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("getWood", get_wood);
        reg
    }

    /// Add or replace the handler for `name`
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&mut InteractionContext<'_>, u32, usize, usize) -> Result<(), GridError> + 'static,
    {
        self.handlers.insert(name.to_owned(), Box::new(handler));
    }

    /// Whether `name` has a handler
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Run `name`'s handler. `Ok(false)` when no handler is registered.
    pub fn dispatch(
        &self,
        name: &str,
        ctx: &mut InteractionContext<'_>,
        qty: u32,
        row: usize,
        col: usize,
    ) -> Result<bool, GridError> {
        match self.handlers.get(name) {
            Some(handler) => {
                log::debug!("dispatching '{}' at ({}, {})", name, row, col);
                handler(ctx, qty, row, col)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
