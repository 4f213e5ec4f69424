use bevy::math::Vec3;

use crate::input::profiles::BindingProfile;
use crate::types::{DeviceType, Handed, RenderMode};

/// Analog value above which a trigger or squeeze counts as pressed when the
/// controller has no click channel.
pub const PRESS_THRESHOLD: f32 = 0.99;

/// Vertical offset applied to controller poses in stand-alone mode.
pub const STANDING_EYE_HEIGHT: f32 = 1.7;

pub const IMMERSIVE_SAMPLES: u32 = 0;
pub const STANDALONE_SAMPLES: u32 = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct ControllerInfo {
    pub name: String,
    pub beam_offset: Vec3,
    pub device_type: DeviceType,
}

#[derive(Clone, Debug)]
pub struct InputMapperConfig {
    pub action_set_name: String,
    pub localized_action_set_name: String,
    pub priority: u32,
    pub press_threshold: f32,
    pub standing_eye_height: f32,
    /// Interaction profiles to suggest bindings for.
    pub profiles: Vec<BindingProfile>,
    pub controllers: Handed<ControllerInfo>,
}

impl Default for InputMapperConfig {
    fn default() -> Self {
        Self {
            action_set_name: "browser".into(),
            localized_action_set_name: "Browser".into(),
            priority: 0,
            press_threshold: PRESS_THRESHOLD,
            standing_eye_height: STANDING_EYE_HEIGHT,
            profiles: vec![BindingProfile::khr_simple(), BindingProfile::oculus_touch()],
            controllers: Handed {
                left: ControllerInfo {
                    name: "Oculus Touch (Left)".into(),
                    beam_offset: Vec3::new(-0.011, -0.007, 0.0),
                    device_type: DeviceType::OculusQuest,
                },
                right: ControllerInfo {
                    name: "Oculus Touch (Right)".into(),
                    beam_offset: Vec3::new(0.011, -0.007, 0.0),
                    device_type: DeviceType::OculusQuest,
                },
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwapchainConfig {
    pub immersive_samples: u32,
    pub standalone_samples: u32,
    pub address_mode: wgpu::AddressMode,
    pub filter: wgpu::FilterMode,
}

impl SwapchainConfig {
    pub fn samples(&self, render_mode: RenderMode) -> u32 {
        match render_mode {
            RenderMode::Immersive => self.immersive_samples,
            RenderMode::StandAlone => self.standalone_samples,
        }
    }
}

impl Default for SwapchainConfig {
    fn default() -> Self {
        Self {
            immersive_samples: IMMERSIVE_SAMPLES,
            standalone_samples: STANDALONE_SAMPLES,
            address_mode: wgpu::AddressMode::ClampToEdge,
            filter: wgpu::FilterMode::Linear,
        }
    }
}
