use macroquad::prelude::*;

/// One joystick sample: a unit direction (or zero at rest) and a magnitude in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JoystickInput {
    /// Horizontal direction component
    pub dx: f32,
    /// Vertical direction component, positive down
    pub dy: f32,
    /// Stick deflection
    pub magnitude: f32,
}

impl JoystickInput {
    /// Released stick
    pub const REST: JoystickInput = JoystickInput {
        dx: 0.0,
        dy: 0.0,
        magnitude: 0.0,
    };

    /// Sample with the magnitude clamped into `[0, 1]`
    pub fn new(dx: f32, dy: f32, magnitude: f32) -> Self {
        Self {
            dx,
            dy,
            magnitude: magnitude.clamp(0.0, 1.0),
        }
    }

    /// Convert a knob drag `offset` from the stick centre.
    ///
    /// Direction is the normalised offset, magnitude is the distance over
    /// `max_distance`, capped at 1. A zero offset is the rest sample.
    pub fn from_drag(offset: Vec2, max_distance: f32) -> Self {
        let dist = offset.length();
        if dist == 0.0 || max_distance <= 0.0 {
            return Self::REST;
        }
        let dir = offset / dist;
        Self::new(dir.x, dir.y, dist / max_distance)
    }

    /// Direction as a vector
    pub fn direction(&self) -> Vec2 {
        vec2(self.dx, self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_past_the_rim_saturates() {
        let j = JoystickInput::from_drag(vec2(0.0, -80.0), 40.0);
        assert_eq!(j.direction(), vec2(0.0, -1.0));
        assert_eq!(j.magnitude, 1.0);
    }

    #[test]
    fn partial_drag_scales_magnitude() {
        let j = JoystickInput::from_drag(vec2(30.0, 40.0), 100.0);
        assert!((j.dx - 0.6).abs() < 1e-6);
        assert!((j.dy - 0.8).abs() < 1e-6);
        assert!((j.magnitude - 0.5).abs() < 1e-6);
    }

    #[test]
    fn centre_is_rest() {
        assert_eq!(JoystickInput::from_drag(Vec2::ZERO, 40.0), JoystickInput::REST);
    }
}
