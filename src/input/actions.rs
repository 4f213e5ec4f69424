//! The fixed set of logical inputs the browser declares to the runtime.
//!
//! Inputs loosely follow the xr-standard gamepad mapping:
//! <https://www.w3.org/TR/webxr-gamepads-module-1/#xr-standard-gamepad-mapping>

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionType {
    Bool,
    F32,
    PoseF,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalInput {
    Pose,
    Menu,
    TriggerClick,
    TriggerTouch,
    TriggerValue,
    SqueezeClick,
    SqueezeValue,
    TrackpadClick,
    TrackpadTouch,
    TrackpadX,
    TrackpadY,
    ThumbstickClick,
    ThumbstickTouch,
    ThumbstickX,
    ThumbstickY,
    ButtonAClick,
    ButtonATouch,
    ButtonBClick,
    ButtonBTouch,
}

impl LogicalInput {
    pub const ALL: [LogicalInput; 19] = [
        LogicalInput::Pose,
        LogicalInput::Menu,
        LogicalInput::TriggerClick,
        LogicalInput::TriggerTouch,
        LogicalInput::TriggerValue,
        LogicalInput::SqueezeClick,
        LogicalInput::SqueezeValue,
        LogicalInput::TrackpadClick,
        LogicalInput::TrackpadTouch,
        LogicalInput::TrackpadX,
        LogicalInput::TrackpadY,
        LogicalInput::ThumbstickClick,
        LogicalInput::ThumbstickTouch,
        LogicalInput::ThumbstickX,
        LogicalInput::ThumbstickY,
        LogicalInput::ButtonAClick,
        LogicalInput::ButtonATouch,
        LogicalInput::ButtonBClick,
        LogicalInput::ButtonBTouch,
    ];

    pub fn action_type(self) -> ActionType {
        use LogicalInput::*;
        match self {
            Pose => ActionType::PoseF,
            TriggerValue | SqueezeValue | TrackpadX | TrackpadY | ThumbstickX | ThumbstickY => {
                ActionType::F32
            }
            _ => ActionType::Bool,
        }
    }

    /// Runtime-facing action name.
    pub fn name(self) -> &'static str {
        use LogicalInput::*;
        match self {
            Pose => "hand_pose",
            Menu => "menu",
            TriggerClick => "trigger_click",
            TriggerTouch => "trigger_touch",
            TriggerValue => "trigger_value",
            SqueezeClick => "squeeze_click",
            SqueezeValue => "squeeze_value",
            TrackpadClick => "trackpad_click",
            TrackpadTouch => "trackpad_touch",
            TrackpadX => "trackpad_value_x",
            TrackpadY => "trackpad_value_y",
            ThumbstickClick => "thumbstick_click",
            ThumbstickTouch => "thumbstick_touch",
            ThumbstickX => "thumbstick_value_x",
            ThumbstickY => "thumbstick_value_y",
            ButtonAClick => "button_a_click",
            ButtonATouch => "button_a_touch",
            ButtonBClick => "button_b_click",
            ButtonBTouch => "button_b_touch",
        }
    }

    pub fn pretty_name(self) -> &'static str {
        use LogicalInput::*;
        match self {
            Pose => "Hand Pose",
            Menu => "Menu",
            TriggerClick => "Trigger click",
            TriggerTouch => "Trigger touch",
            TriggerValue => "Trigger value",
            SqueezeClick => "Squeeze click",
            SqueezeValue => "Squeeze value",
            TrackpadClick => "Trackpad click",
            TrackpadTouch => "Trackpad touch",
            TrackpadX => "Trackpad value X",
            TrackpadY => "Trackpad value Y",
            ThumbstickClick => "Thumbstick click",
            ThumbstickTouch => "Thumbstick touch",
            ThumbstickX => "Thumbstick value X",
            ThumbstickY => "Thumbstick value Y",
            ButtonAClick => "Button A click",
            ButtonATouch => "Button A touch",
            ButtonBClick => "Button B click",
            ButtonBTouch => "Button B touch",
        }
    }
}

/// State of one boolean or scalar channel for one hand on the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActionValue<T> {
    pub is_active: bool,
    pub current_state: T,
}

impl<T> ActionValue<T> {
    pub fn new(is_active: bool, current_state: T) -> Self {
        Self {
            is_active,
            current_state,
        }
    }
}

impl<T: Default> ActionValue<T> {
    pub fn inactive() -> Self {
        Self::default()
    }
}

impl ActionValue<bool> {
    /// `true` only when the channel is active and reports `true`.
    pub fn active_and(&self) -> bool {
        self.is_active && self.current_state
    }
}

impl ActionValue<f32> {
    /// The value when active, 0.0 otherwise.
    pub fn value_or_zero(&self) -> f32 {
        if self.is_active {
            self.current_state
        } else {
            0.0
        }
    }
}

impl<T: Copy + openxr::ActionInput> From<openxr::ActionState<T>> for ActionValue<T> {
    fn from(state: openxr::ActionState<T>) -> Self {
        Self::new(state.is_active, state.current_state)
    }
}
