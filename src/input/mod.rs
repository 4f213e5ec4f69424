pub mod actions;
pub mod mapping;
pub mod profiles;
pub mod runtime;

use bevy::log::{debug, info};
use bevy::math::{Mat4, Vec3};
use bevy::prelude::Resource;
use openxr as xr;

use self::actions::{ActionValue, LogicalInput};
use self::runtime::{HandLocation, XrInputRuntime};
use crate::config::InputMapperConfig;
use crate::delegate::ControllerDelegate;
use crate::error::{OxrError, Result};
use crate::types::{
    Button, CapabilityFlags, DeviceType, Hand, Handed, PoseConv, RenderMode, AXIS_COUNT,
    AXIS_THUMBSTICK_X, AXIS_THUMBSTICK_Y, AXIS_TOUCHPAD_X, AXIS_TOUCHPAD_Y, GAMEPAD_BUTTON_COUNT,
    GAMEPAD_HAPTIC_COUNT,
};

/// Lifecycle of one hand's controller.
///
/// Leaving `Uninitialized` happens once, on the first frame the hand's pose
/// is active; afterwards the hand flips between `Active` and `Inactive`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandState {
    #[default]
    Uninitialized,
    Active,
    Inactive,
}

impl HandState {
    pub fn is_created(self) -> bool {
        self != HandState::Uninitialized
    }

    pub fn is_enabled(self) -> bool {
        self == HandState::Active
    }
}

/// Raw channel values of one hand for one frame.
#[derive(Clone, Copy, Debug, Default)]
struct HandChannels {
    menu: ActionValue<bool>,
    trigger_click: ActionValue<bool>,
    trigger_touch: ActionValue<bool>,
    trigger_value: ActionValue<f32>,
    squeeze_click: ActionValue<bool>,
    squeeze_value: ActionValue<f32>,
    trackpad_click: ActionValue<bool>,
    trackpad_touch: ActionValue<bool>,
    trackpad_x: ActionValue<f32>,
    trackpad_y: ActionValue<f32>,
    thumbstick_click: ActionValue<bool>,
    thumbstick_touch: ActionValue<bool>,
    thumbstick_x: ActionValue<f32>,
    thumbstick_y: ActionValue<f32>,
    button_a_click: ActionValue<bool>,
    button_a_touch: ActionValue<bool>,
    button_b_click: ActionValue<bool>,
    button_b_touch: ActionValue<bool>,
}

/// Maps OpenXR controller actions onto the browser's controller delegate.
#[derive(Resource)]
pub struct InputMapper<R: XrInputRuntime> {
    runtime: R,
    config: InputMapperConfig,
    subaction_paths: Handed<xr::Path>,
    /// Device class of every suggested interaction profile.
    profile_types: Vec<(xr::Path, DeviceType)>,
    hands: Handed<HandState>,
    initialized: bool,
}

impl<R: XrInputRuntime> InputMapper<R> {
    /// Declares the browser's action set, suggests bindings for every
    /// configured profile, creates the hand pose spaces and attaches the set
    /// to the session.
    pub fn initialize(mut runtime: R, config: InputMapperConfig) -> Result<Self> {
        runtime.create_action_set(
            &config.action_set_name,
            &config.localized_action_set_name,
            config.priority,
        )?;

        let subaction_paths = Handed::new(
            runtime.string_to_path(Hand::Left.subaction_path())?,
            runtime.string_to_path(Hand::Right.subaction_path())?,
        );
        let hand_paths = [subaction_paths.left, subaction_paths.right];

        for input in LogicalInput::ALL {
            runtime.create_action(input, &hand_paths)?;
        }

        let mut profile_types = Vec::with_capacity(config.profiles.len());
        for profile in &config.profiles {
            let profile_path = runtime.string_to_path(&profile.interaction_profile)?;
            profile_types.push((profile_path, profile.device_type));
            let bindings = profile
                .bindings
                .iter()
                .map(|b| Ok((b.input, runtime.string_to_path(&b.path)?)))
                .collect::<Result<Vec<_>>>()?;
            runtime.suggest_bindings(profile_path, &bindings)?;
            debug!(
                "suggested {} bindings for {}",
                bindings.len(),
                profile.interaction_profile
            );
        }

        for hand in Hand::BOTH {
            runtime.create_action_space(hand, subaction_paths[hand])?;
        }
        runtime.attach_action_set()?;
        info!(
            "attached action set \"{}\" with {} interaction profiles",
            config.action_set_name,
            config.profiles.len()
        );

        Ok(Self {
            runtime,
            config,
            subaction_paths,
            profile_types,
            hands: Handed::default(),
            initialized: true,
        })
    }

    pub fn hand_state(&self, hand: Hand) -> HandState {
        self.hands[hand]
    }

    pub fn config(&self) -> &InputMapperConfig {
        &self.config
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    #[cfg(test)]
    pub(crate) fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    /// Pulls this frame's action state and pushes it into `delegate`.
    pub fn update<D: ControllerDelegate + ?Sized>(
        &mut self,
        predicted_display_time: xr::Time,
        base_space: &R::Space,
        render_mode: RenderMode,
        delegate: &mut D,
    ) -> Result<()> {
        if !self.initialized {
            return Err(OxrError::InputNotInitialized);
        }
        self.runtime.sync_actions()?;
        for hand in Hand::BOTH {
            self.update_hand(hand, predicted_display_time, base_space, render_mode, delegate)?;
        }
        Ok(())
    }

    /// Destroys the action set; every action and pose space goes with it.
    pub fn destroy(&mut self) {
        if !self.initialized {
            return;
        }
        self.runtime.destroy_action_set();
        self.hands = Handed::default();
        self.initialized = false;
        info!("destroyed input mapper");
    }

    fn update_hand<D: ControllerDelegate + ?Sized>(
        &mut self,
        hand: Hand,
        time: xr::Time,
        base_space: &R::Space,
        render_mode: RenderMode,
        delegate: &mut D,
    ) -> Result<()> {
        let path = self.subaction_paths[hand];
        if !self.runtime.pose_active(path)? {
            if self.hands[hand].is_created() {
                delegate.set_enabled(hand, false);
                self.hands[hand] = HandState::Inactive;
            }
            return Ok(());
        }

        if !self.hands[hand].is_created() {
            self.create_controller(hand, delegate)?;
            self.hands[hand] = HandState::Inactive;
        }

        let location = match self.runtime.locate_hand(hand, base_space, time) {
            Ok(location) if location.flags.contains(xr::SpaceLocationFlags::ORIENTATION_VALID) => {
                Some(location)
            }
            Ok(_) => {
                debug!("{hand:?} controller has no valid orientation");
                None
            }
            Err(err) => {
                debug!("{hand:?} controller not tracked: {err}");
                None
            }
        };
        let Some(location) = location else {
            self.hands[hand] = HandState::Inactive;
            delegate.set_enabled(hand, false);
            delegate.set_visible(hand, false);
            return Ok(());
        };

        self.hands[hand] = HandState::Active;
        delegate.set_enabled(hand, true);
        delegate.set_visible(hand, true);
        delegate.set_capability_flags(hand, capability_flags(location.flags));
        delegate.set_transform(hand, self.controller_transform(&location, render_mode));

        let channels = self.read_channels(path)?;
        self.push_buttons(hand, &channels, render_mode, delegate);
        Ok(())
    }

    fn create_controller<D: ControllerDelegate + ?Sized>(
        &self,
        hand: Hand,
        delegate: &mut D,
    ) -> Result<()> {
        let info = &self.config.controllers[hand];
        let reported = self
            .runtime
            .current_interaction_profile(self.subaction_paths[hand])?;
        let device_type = self
            .profile_types
            .iter()
            .find(|(path, _)| *path == reported)
            .map_or(info.device_type, |&(_, device_type)| device_type);

        delegate.create_controller(hand, &info.name, Mat4::from_translation(info.beam_offset));
        if hand == Hand::Left {
            delegate.set_left_handed(hand, true);
        }
        delegate.set_controller_type(hand, device_type);
        delegate.set_button_count(hand, GAMEPAD_BUTTON_COUNT);
        delegate.set_haptic_count(hand, GAMEPAD_HAPTIC_COUNT);
        debug!("created controller \"{}\" as {device_type:?}", info.name);
        Ok(())
    }

    fn controller_transform(&self, location: &HandLocation, render_mode: RenderMode) -> Mat4 {
        let transform = location.pose.to_mat4();
        match render_mode {
            RenderMode::StandAlone => {
                Mat4::from_translation(Vec3::Y * self.config.standing_eye_height) * transform
            }
            RenderMode::Immersive => transform,
        }
    }

    fn read_channels(&self, path: xr::Path) -> Result<HandChannels> {
        use LogicalInput::*;
        let b = |input| self.runtime.bool_state(input, path);
        let f = |input| self.runtime.float_state(input, path);
        Ok(HandChannels {
            menu: b(Menu)?,
            trigger_click: b(TriggerClick)?,
            trigger_touch: b(TriggerTouch)?,
            trigger_value: f(TriggerValue)?,
            squeeze_click: b(SqueezeClick)?,
            squeeze_value: f(SqueezeValue)?,
            trackpad_click: b(TrackpadClick)?,
            trackpad_touch: b(TrackpadTouch)?,
            trackpad_x: f(TrackpadX)?,
            trackpad_y: f(TrackpadY)?,
            thumbstick_click: b(ThumbstickClick)?,
            thumbstick_touch: b(ThumbstickTouch)?,
            thumbstick_x: f(ThumbstickX)?,
            thumbstick_y: f(ThumbstickY)?,
            button_a_click: b(ButtonAClick)?,
            button_a_touch: b(ButtonATouch)?,
            button_b_click: b(ButtonBClick)?,
            button_b_touch: b(ButtonBTouch)?,
        })
    }

    fn push_buttons<D: ControllerDelegate + ?Sized>(
        &self,
        hand: Hand,
        c: &HandChannels,
        render_mode: RenderMode,
        delegate: &mut D,
    ) {
        let threshold = self.config.press_threshold;
        let immersive = render_mode == RenderMode::Immersive;
        let mut axes = [0.0f32; AXIS_COUNT];

        let button = |delegate: &mut D, id: Button, state: mapping::ButtonState| {
            delegate.set_button_state(
                hand,
                id,
                id.immersive_index(),
                state.pressed,
                state.touched,
                state.value,
            );
        };

        if let Some(state) = mapping::menu(c.menu) {
            button(delegate, Button::App, state);
        }

        if let Some(state) =
            mapping::trigger(c.trigger_click, c.trigger_touch, c.trigger_value, threshold)
        {
            button(delegate, Button::Trigger, state);
            if state.pressed && immersive {
                delegate.set_select_action_start(hand);
            } else {
                delegate.set_select_action_stop(hand);
            }
        }

        if let Some(state) = mapping::squeeze(c.squeeze_click, c.squeeze_value, threshold) {
            button(delegate, Button::Squeeze, state);
            if state.pressed && immersive {
                delegate.set_squeeze_action_start(hand);
            } else {
                delegate.set_squeeze_action_stop(hand);
            }
        }

        let sticks = [
            (
                Button::Touchpad,
                mapping::axis_button(c.trackpad_click, c.trackpad_touch, c.trackpad_x, c.trackpad_y),
                (AXIS_TOUCHPAD_X, AXIS_TOUCHPAD_Y),
            ),
            (
                Button::Thumbstick,
                mapping::axis_button(
                    c.thumbstick_click,
                    c.thumbstick_touch,
                    c.thumbstick_x,
                    c.thumbstick_y,
                ),
                (AXIS_THUMBSTICK_X, AXIS_THUMBSTICK_Y),
            ),
        ];
        for (id, state, (x_axis, y_axis)) in sticks {
            let Some(state) = state else { continue };
            button(
                delegate,
                id,
                mapping::ButtonState {
                    pressed: state.pressed,
                    touched: state.touched,
                    value: if state.pressed { 1.0 } else { 0.0 },
                },
            );
            axes[x_axis] = state.x;
            axes[y_axis] = state.y;
            delegate.set_scrolled_delta(hand, state.x, state.y);
        }

        if let Some(state) = mapping::face_button(c.button_a_click, c.button_a_touch) {
            button(delegate, Button::A, state);
        }
        if let Some(state) = mapping::face_button(c.button_b_click, c.button_b_touch) {
            button(delegate, Button::B, state);
        }

        delegate.set_axes(hand, &axes);
    }
}

fn capability_flags(flags: xr::SpaceLocationFlags) -> CapabilityFlags {
    let mut caps = CapabilityFlags::ORIENTATION;
    if flags.contains(xr::SpaceLocationFlags::POSITION_VALID) {
        caps |= if flags.contains(xr::SpaceLocationFlags::POSITION_TRACKED) {
            CapabilityFlags::POSITION
        } else {
            CapabilityFlags::POSITION_EMULATED
        };
    }
    caps
}
