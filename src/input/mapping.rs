//! Derivation of gamepad button state from raw channel values.

use super::actions::ActionValue;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ButtonState {
    pub pressed: bool,
    pub touched: bool,
    pub value: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisButtonState {
    pub pressed: bool,
    pub touched: bool,
    pub x: f32,
    pub y: f32,
}

/// A click channel takes precedence; without one the analog value must
/// exceed `threshold`.
pub fn click_or_threshold(click: ActionValue<bool>, value: ActionValue<f32>, threshold: f32) -> bool {
    if click.is_active {
        click.current_state
    } else {
        value.is_active && value.current_state > threshold
    }
}

fn analog_value(pressed: bool, value: ActionValue<f32>) -> f32 {
    if value.is_active {
        value.current_state
    } else if pressed {
        1.0
    } else {
        0.0
    }
}

pub fn menu(click: ActionValue<bool>) -> Option<ButtonState> {
    click.is_active.then(|| ButtonState {
        pressed: click.current_state,
        touched: click.current_state,
        value: if click.current_state { 1.0 } else { 0.0 },
    })
}

pub fn trigger(
    click: ActionValue<bool>,
    touch: ActionValue<bool>,
    value: ActionValue<f32>,
    threshold: f32,
) -> Option<ButtonState> {
    if !(click.is_active || touch.is_active || value.is_active) {
        return None;
    }
    let pressed = click_or_threshold(click, value, threshold);
    let touched = pressed
        || (value.is_active && value.current_state > 0.0)
        || touch.active_and();
    Some(ButtonState {
        pressed,
        touched,
        value: analog_value(pressed, value),
    })
}

pub fn squeeze(click: ActionValue<bool>, value: ActionValue<f32>, threshold: f32) -> Option<ButtonState> {
    if !(click.is_active || value.is_active) {
        return None;
    }
    let pressed = click_or_threshold(click, value, threshold);
    Some(ButtonState {
        pressed,
        touched: pressed,
        value: analog_value(pressed, value),
    })
}

/// Shared by trackpad and thumbstick.
pub fn axis_button(
    click: ActionValue<bool>,
    touch: ActionValue<bool>,
    x: ActionValue<f32>,
    y: ActionValue<f32>,
) -> Option<AxisButtonState> {
    if !(click.is_active || touch.is_active || x.is_active || y.is_active) {
        return None;
    }
    let pressed = click.active_and();
    Some(AxisButtonState {
        pressed,
        touched: pressed || touch.active_and(),
        x: x.value_or_zero(),
        y: y.value_or_zero(),
    })
}

/// A/B style buttons are only reported when their click channel is bound.
pub fn face_button(click: ActionValue<bool>, touch: ActionValue<bool>) -> Option<ButtonState> {
    click.is_active.then(|| {
        let pressed = click.current_state;
        ButtonState {
            pressed,
            touched: pressed || touch.active_and(),
            value: if pressed { 1.0 } else { 0.0 },
        }
    })
}
