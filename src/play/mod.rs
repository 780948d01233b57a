//! The play view: joystick-driven movement, camera follow, menu and interactions.

mod input;
mod interaction;
mod menu;
mod session;

pub use input::JoystickInput;
pub use interaction::{get_wood, ActionHandler, ActionRegistry, InteractionContext, Inventory, Notice};
pub use menu::{Menu, MenuItem};
pub use session::{MovementLoop, PlaySession, SelectOutcome};
