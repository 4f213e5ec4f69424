use std::ops::{Index, IndexMut};

use bevy::math::{Mat4, Quat, Vec3};
use bitflags::bitflags;

/// Number of buttons reported for the xr-standard gamepad mapping.
pub const GAMEPAD_BUTTON_COUNT: u32 = 7;
pub const GAMEPAD_HAPTIC_COUNT: u32 = 0;
pub const AXIS_COUNT: usize = 4;

pub const AXIS_TOUCHPAD_X: usize = 0;
pub const AXIS_TOUCHPAD_Y: usize = 1;
pub const AXIS_THUMBSTICK_X: usize = 2;
pub const AXIS_THUMBSTICK_Y: usize = 3;

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }

    pub fn subaction_path(self) -> &'static str {
        match self {
            Hand::Left => "/user/hand/left",
            Hand::Right => "/user/hand/right",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Handed<T> {
    pub left: T,
    pub right: T,
}

impl<T> Handed<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }
}

impl<T> Index<Hand> for Handed<T> {
    type Output = T;

    fn index(&self, hand: Hand) -> &T {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Hand> for Handed<T> {
    fn index_mut(&mut self, hand: Hand) -> &mut T {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }
}

/// Whether the browser renders into the headset on its own or on behalf of
/// an immersive WebXR session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    StandAlone,
    Immersive,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CapabilityFlags: u32 {
        const ORIENTATION = 1 << 0;
        const POSITION = 1 << 1;
        const POSITION_EMULATED = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceType {
    #[default]
    OculusQuest,
    OculusGo,
    Generic,
}

/// Browser-level button ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    App,
    Trigger,
    Squeeze,
    Touchpad,
    Thumbstick,
    A,
    B,
}

impl Button {
    /// Slot of this button in the xr-standard gamepad mapping, if it has one.
    pub fn immersive_index(self) -> Option<usize> {
        match self {
            Button::App => None,
            Button::Trigger => Some(0),
            Button::Squeeze => Some(1),
            Button::Touchpad => Some(2),
            Button::Thumbstick => Some(3),
            Button::A => Some(4),
            Button::B => Some(5),
        }
    }
}

pub trait Vec3Conv {
    fn to_vec3(&self) -> Vec3;
}

impl Vec3Conv for openxr::Vector3f {
    fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

pub trait QuatConv {
    fn to_quat(&self) -> Quat;
}

impl QuatConv for openxr::Quaternionf {
    fn to_quat(&self) -> Quat {
        Quat::from_xyzw(self.x, self.y, self.z, self.w)
    }
}

pub trait PoseConv {
    fn to_mat4(&self) -> Mat4;
}

impl PoseConv for openxr::Posef {
    fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation.to_quat(), self.position.to_vec3())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handed_indexing_follows_hand() {
        let mut handed = Handed::new(1, 2);
        handed[Hand::Right] = 5;
        assert_eq!(handed[Hand::Left], 1);
        assert_eq!(handed.right, 5);
    }

    #[test]
    fn app_button_has_no_gamepad_slot() {
        assert_eq!(Button::App.immersive_index(), None);
        assert_eq!(Button::Trigger.immersive_index(), Some(0));
        assert_eq!(Button::B.immersive_index(), Some(5));
    }

    #[test]
    fn identity_pose_is_identity_matrix() {
        assert_eq!(openxr::Posef::IDENTITY.to_mat4(), Mat4::IDENTITY);
    }
}
