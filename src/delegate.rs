use bevy::math::Mat4;

use crate::types::{Button, CapabilityFlags, DeviceType, Hand};

/// Sink for controller state, implemented by the browser's controller layer.
///
/// The input mapper pushes into this once per frame and per hand; it never
/// reads anything back.
pub trait ControllerDelegate {
    fn create_controller(&mut self, hand: Hand, name: &str, beam_transform: Mat4);
    fn set_left_handed(&mut self, hand: Hand, left_handed: bool);
    fn set_controller_type(&mut self, hand: Hand, device_type: DeviceType);
    fn set_button_count(&mut self, hand: Hand, count: u32);
    fn set_haptic_count(&mut self, hand: Hand, count: u32);
    fn set_enabled(&mut self, hand: Hand, enabled: bool);
    fn set_visible(&mut self, hand: Hand, visible: bool);
    fn set_capability_flags(&mut self, hand: Hand, flags: CapabilityFlags);
    fn set_transform(&mut self, hand: Hand, transform: Mat4);
    /// `immersive_index` is the button's slot in the xr-standard gamepad, if any.
    fn set_button_state(
        &mut self,
        hand: Hand,
        button: Button,
        immersive_index: Option<usize>,
        pressed: bool,
        touched: bool,
        value: f32,
    );
    fn set_axes(&mut self, hand: Hand, axes: &[f32]);
    fn set_scrolled_delta(&mut self, hand: Hand, x: f32, y: f32);
    fn set_select_action_start(&mut self, hand: Hand);
    fn set_select_action_stop(&mut self, hand: Hand);
    fn set_squeeze_action_start(&mut self, hand: Hand);
    fn set_squeeze_action_stop(&mut self, hand: Hand);
}
