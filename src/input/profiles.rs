//! Suggested bindings per interaction profile.
//!
//! See <https://registry.khronos.org/OpenXR/specs/1.0/html/xrspec.html#semantic-path-interaction-profiles>

use std::borrow::Cow;

use super::actions::LogicalInput;
use crate::types::DeviceType;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XrBinding {
    pub input: LogicalInput,
    pub path: Cow<'static, str>,
}

impl XrBinding {
    pub fn new(input: LogicalInput, path: impl Into<Cow<'static, str>>) -> XrBinding {
        XrBinding {
            input,
            path: path.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingProfile {
    pub interaction_profile: Cow<'static, str>,
    pub device_type: DeviceType,
    pub bindings: Vec<XrBinding>,
}

/// Binds `input` to `component` on both hands.
fn both_hands(input: LogicalInput, component: &str) -> [XrBinding; 2] {
    [
        XrBinding::new(input, format!("/user/hand/left/{component}")),
        XrBinding::new(input, format!("/user/hand/right/{component}")),
    ]
}

impl BindingProfile {
    pub fn new(
        interaction_profile: impl Into<Cow<'static, str>>,
        device_type: DeviceType,
    ) -> Self {
        Self {
            interaction_profile: interaction_profile.into(),
            device_type,
            bindings: Vec::new(),
        }
    }

    pub fn with_binding(mut self, binding: XrBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn with_both_hands(mut self, input: LogicalInput, component: &str) -> Self {
        self.bindings.extend(both_hands(input, component));
        self
    }

    /// Generic fallback for controllers without a dedicated profile.
    pub fn khr_simple() -> Self {
        Self::new("/interaction_profiles/khr/simple_controller", DeviceType::Generic)
            .with_both_hands(LogicalInput::Pose, "input/aim/pose")
            .with_both_hands(LogicalInput::Menu, "input/menu/click")
            .with_both_hands(LogicalInput::TriggerClick, "input/select/click")
    }

    pub fn oculus_touch() -> Self {
        use LogicalInput::*;
        Self::new("/interaction_profiles/oculus/touch_controller", DeviceType::OculusQuest)
            .with_both_hands(Pose, "input/aim/pose")
            // left controller only
            .with_binding(XrBinding::new(Menu, "/user/hand/left/input/menu/click"))
            .with_binding(XrBinding::new(ButtonAClick, "/user/hand/left/input/x/click"))
            .with_binding(XrBinding::new(ButtonATouch, "/user/hand/left/input/x/touch"))
            .with_binding(XrBinding::new(ButtonBClick, "/user/hand/left/input/y/click"))
            .with_binding(XrBinding::new(ButtonBTouch, "/user/hand/left/input/y/touch"))
            // right controller only
            .with_binding(XrBinding::new(ButtonAClick, "/user/hand/right/input/a/click"))
            .with_binding(XrBinding::new(ButtonATouch, "/user/hand/right/input/a/touch"))
            .with_binding(XrBinding::new(ButtonBClick, "/user/hand/right/input/b/click"))
            .with_binding(XrBinding::new(ButtonBTouch, "/user/hand/right/input/b/touch"))
            .with_both_hands(TriggerValue, "input/trigger/value")
            .with_both_hands(TriggerTouch, "input/trigger/touch")
            .with_both_hands(SqueezeValue, "input/squeeze/value")
            .with_both_hands(ThumbstickClick, "input/thumbstick/click")
            .with_both_hands(ThumbstickTouch, "input/thumbstick/touch")
            .with_both_hands(ThumbstickX, "input/thumbstick/x")
            .with_both_hands(ThumbstickY, "input/thumbstick/y")
    }

    pub fn oculus_go() -> Self {
        use LogicalInput::*;
        Self::new("/interaction_profiles/oculus/go_controller", DeviceType::OculusGo)
            .with_both_hands(Pose, "input/aim/pose")
            .with_both_hands(Menu, "input/back/click")
            .with_both_hands(TriggerClick, "input/trigger/click")
            .with_both_hands(TrackpadClick, "input/trackpad/click")
            .with_both_hands(TrackpadTouch, "input/trackpad/touch")
            .with_both_hands(TrackpadX, "input/trackpad/x")
            .with_both_hands(TrackpadY, "input/trackpad/y")
    }

    pub fn binds(&self, input: LogicalInput) -> bool {
        self.bindings.iter().any(|b| b.input == input)
    }
}
