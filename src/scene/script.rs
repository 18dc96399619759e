use crate::engine::input::InputState;

const ATTACK_CONTROL: &str = "<Keyboard>/j";

/// Stands in for a human at the keyboard during headless runs: taps the
/// attack key every `interval` seconds and otherwise stands still.
pub struct InputScript {
    interval: f32,
    timer: f32,
    holding: bool,
}

impl InputScript {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            timer: 0.0,
            holding: false,
        }
    }

    /// Call once per frame, after `InputState::begin_frame`.
    pub fn drive(&mut self, input: &mut InputState, dt: f32) {
        // A tap lasts exactly one frame.
        if self.holding {
            input.release(ATTACK_CONTROL);
            self.holding = false;
        }

        self.timer += dt;
        if self.timer >= self.interval {
            self.timer -= self.interval;
            input.press(ATTACK_CONTROL);
            self.holding = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_actions::{InputActionAsset, ATTACK};

    #[test]
    fn taps_attack_once_per_interval() {
        let actions = InputActionAsset::default_player();
        let mut input = InputState::new();
        let mut script = InputScript::new(0.5);

        let mut presses = 0;
        for _ in 0..16 {
            input.begin_frame();
            script.drive(&mut input, 0.125);
            if actions.was_pressed(ATTACK, &input) {
                presses += 1;
            }
        }
        // 16 frames * 0.125 s = 2 s of input
        assert_eq!(presses, 4);
    }
}
