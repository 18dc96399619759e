use glam::Vec2;
use std::collections::{HashMap, HashSet};

/// Snapshot of held controls, keyed by control path (`<Keyboard>/w`,
/// `<Gamepad>/buttonWest`, ...). Paths are compared case-insensitively.
///
/// Whoever owns the devices (a real backend or a scripted driver) calls
/// `begin_frame` once per frame, then `press`/`release`/`set_axis`.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: HashSet<String>,
    previous: HashSet<String>,
    axes: HashMap<String, Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch this frame's held set so `just_pressed` can detect edges.
    pub fn begin_frame(&mut self) {
        self.previous = self.held.clone();
    }

    pub fn press(&mut self, path: &str) {
        self.held.insert(path.to_ascii_lowercase());
    }

    pub fn release(&mut self, path: &str) {
        self.held.remove(&path.to_ascii_lowercase());
    }

    #[allow(dead_code)]
    pub fn set_axis(&mut self, path: &str, value: Vec2) {
        self.axes.insert(path.to_ascii_lowercase(), value);
    }

    pub fn is_held(&self, path: &str) -> bool {
        self.held.contains(&path.to_ascii_lowercase())
    }

    /// Held now but not at the last `begin_frame`.
    pub fn just_pressed(&self, path: &str) -> bool {
        let path = path.to_ascii_lowercase();
        self.held.contains(&path) && !self.previous.contains(&path)
    }

    pub fn axis(&self, path: &str) -> Vec2 {
        self.axes
            .get(&path.to_ascii_lowercase())
            .copied()
            .unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_relative_to_begin_frame() {
        let mut input = InputState::new();
        input.begin_frame();
        input.press("<Keyboard>/J");
        assert!(input.is_held("<keyboard>/j"));
        assert!(input.just_pressed("<Keyboard>/j"));

        input.begin_frame();
        assert!(input.is_held("<Keyboard>/j"));
        assert!(!input.just_pressed("<Keyboard>/j"));

        input.release("<Keyboard>/j");
        assert!(!input.is_held("<Keyboard>/j"));
    }

    #[test]
    fn unknown_axis_reads_zero() {
        let mut input = InputState::new();
        assert_eq!(input.axis("<Gamepad>/leftStick"), Vec2::ZERO);
        input.set_axis("<Gamepad>/leftStick", Vec2::new(0.5, -0.5));
        assert_eq!(input.axis("<gamepad>/leftstick"), Vec2::new(0.5, -0.5));
        assert_eq!(input.axis("<Gamepad>/rightStick"), Vec2::ZERO);
    }
}
