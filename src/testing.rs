//! Scripted stand-ins for the runtime, GPU and browser used by unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bevy::math::Mat4;
use bevy::utils::HashMap;
use openxr as xr;

use crate::delegate::ControllerDelegate;
use crate::error::{OxrError, Result};
use crate::input::actions::{ActionValue, LogicalInput};
use crate::input::runtime::{HandLocation, XrInputRuntime};
use crate::swapchain::{
    FramebufferAttributes, FramebufferContext, SwapchainDescriptor, SwapchainImages, SwapchainSession,
};
use crate::types::{Button, CapabilityFlags, DeviceType, Hand, Handed};

#[derive(Default)]
pub struct ScriptedRuntime {
    paths: RefCell<HashMap<String, u64>>,
    pub action_sets_created: usize,
    pub action_sets_attached: usize,
    pub action_set_destroyed: bool,
    pub actions: Vec<(LogicalInput, Vec<xr::Path>)>,
    pub suggested: Vec<(xr::Path, Vec<(LogicalInput, xr::Path)>)>,
    pub spaces: Vec<Hand>,
    pub syncs: usize,
    pub fail_sync: bool,
    pub pose_active: Handed<bool>,
    pub interaction_profiles: Handed<Option<&'static str>>,
    pub locations: Handed<Option<HandLocation>>,
    pub bools: HashMap<(Hand, LogicalInput), ActionValue<bool>>,
    pub floats: HashMap<(Hand, LogicalInput), ActionValue<f32>>,
}

impl ScriptedRuntime {
    pub fn path(&self, path: &str) -> Option<xr::Path> {
        self.paths.borrow().get(path).map(|&raw| xr::Path::from_raw(raw))
    }

    fn hand_for(&self, subaction_path: xr::Path) -> Hand {
        if Some(subaction_path) == self.path(Hand::Left.subaction_path()) {
            Hand::Left
        } else {
            Hand::Right
        }
    }

    /// Makes `hand` active and tracked at the identity pose.
    pub fn track(&mut self, hand: Hand) {
        self.pose_active[hand] = true;
        self.locations[hand] = Some(HandLocation {
            pose: xr::Posef::IDENTITY,
            flags: xr::SpaceLocationFlags::ORIENTATION_VALID
                | xr::SpaceLocationFlags::POSITION_VALID
                | xr::SpaceLocationFlags::POSITION_TRACKED,
        });
    }

    pub fn set_bool(&mut self, hand: Hand, input: LogicalInput, state: bool) {
        self.bools.insert((hand, input), ActionValue::new(true, state));
    }

    pub fn set_float(&mut self, hand: Hand, input: LogicalInput, state: f32) {
        self.floats.insert((hand, input), ActionValue::new(true, state));
    }
}

impl XrInputRuntime for ScriptedRuntime {
    type Space = ();

    fn string_to_path(&self, path: &str) -> Result<xr::Path> {
        let mut paths = self.paths.borrow_mut();
        let next = paths.len() as u64 + 1;
        let raw = *paths.entry(path.to_owned()).or_insert(next);
        Ok(xr::Path::from_raw(raw))
    }

    fn create_action_set(&mut self, _: &str, _: &str, _: u32) -> Result<()> {
        self.action_sets_created += 1;
        Ok(())
    }

    fn create_action(&mut self, input: LogicalInput, subaction_paths: &[xr::Path]) -> Result<()> {
        self.actions.push((input, subaction_paths.to_vec()));
        Ok(())
    }

    fn suggest_bindings(
        &mut self,
        interaction_profile: xr::Path,
        bindings: &[(LogicalInput, xr::Path)],
    ) -> Result<()> {
        self.suggested.push((interaction_profile, bindings.to_vec()));
        Ok(())
    }

    fn create_action_space(&mut self, hand: Hand, _: xr::Path) -> Result<()> {
        self.spaces.push(hand);
        Ok(())
    }

    fn attach_action_set(&mut self) -> Result<()> {
        self.action_sets_attached += 1;
        Ok(())
    }

    fn sync_actions(&mut self) -> Result<()> {
        if self.fail_sync {
            return Err(xr::sys::Result::ERROR_SESSION_NOT_RUNNING.into());
        }
        self.syncs += 1;
        Ok(())
    }

    fn pose_active(&self, subaction_path: xr::Path) -> Result<bool> {
        Ok(self.pose_active[self.hand_for(subaction_path)])
    }

    fn current_interaction_profile(&self, subaction_path: xr::Path) -> Result<xr::Path> {
        match self.interaction_profiles[self.hand_for(subaction_path)] {
            Some(profile) => self.string_to_path(profile),
            None => Ok(xr::Path::from_raw(0)),
        }
    }

    fn bool_state(&self, input: LogicalInput, subaction_path: xr::Path) -> Result<ActionValue<bool>> {
        let hand = self.hand_for(subaction_path);
        Ok(self.bools.get(&(hand, input)).copied().unwrap_or_default())
    }

    fn float_state(&self, input: LogicalInput, subaction_path: xr::Path) -> Result<ActionValue<f32>> {
        let hand = self.hand_for(subaction_path);
        Ok(self.floats.get(&(hand, input)).copied().unwrap_or_default())
    }

    fn locate_hand(&self, hand: Hand, _: &(), _: xr::Time) -> Result<HandLocation> {
        self.locations[hand].ok_or(OxrError::OpenXrError(xr::sys::Result::ERROR_POSE_INVALID))
    }

    fn destroy_action_set(&mut self) {
        self.action_set_destroyed = true;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DelegateEvent {
    Create(Hand, String, Mat4),
    LeftHanded(Hand),
    ControllerType(Hand, DeviceType),
    ButtonCount(Hand, u32),
    HapticCount(Hand, u32),
    Enabled(Hand, bool),
    Visible(Hand, bool),
    Capabilities(Hand, CapabilityFlags),
    Transform(Hand, Mat4),
    Button {
        hand: Hand,
        button: Button,
        immersive_index: Option<usize>,
        pressed: bool,
        touched: bool,
        value: f32,
    },
    Axes(Hand, Vec<f32>),
    Scroll(Hand, f32, f32),
    SelectStart(Hand),
    SelectStop(Hand),
    SqueezeStart(Hand),
    SqueezeStop(Hand),
}

#[derive(Default)]
pub struct RecordingDelegate {
    pub events: Vec<DelegateEvent>,
}

impl RecordingDelegate {
    pub fn count(&self, pred: impl Fn(&DelegateEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn button(&self, hand: Hand, button: Button) -> Option<&DelegateEvent> {
        self.events.iter().rev().find(|e| {
            matches!(e, DelegateEvent::Button { hand: h, button: b, .. } if *h == hand && *b == button)
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ControllerDelegate for RecordingDelegate {
    fn create_controller(&mut self, hand: Hand, name: &str, beam_transform: Mat4) {
        self.events
            .push(DelegateEvent::Create(hand, name.to_owned(), beam_transform));
    }
    fn set_left_handed(&mut self, hand: Hand, left_handed: bool) {
        if left_handed {
            self.events.push(DelegateEvent::LeftHanded(hand));
        }
    }
    fn set_controller_type(&mut self, hand: Hand, device_type: DeviceType) {
        self.events.push(DelegateEvent::ControllerType(hand, device_type));
    }
    fn set_button_count(&mut self, hand: Hand, count: u32) {
        self.events.push(DelegateEvent::ButtonCount(hand, count));
    }
    fn set_haptic_count(&mut self, hand: Hand, count: u32) {
        self.events.push(DelegateEvent::HapticCount(hand, count));
    }
    fn set_enabled(&mut self, hand: Hand, enabled: bool) {
        self.events.push(DelegateEvent::Enabled(hand, enabled));
    }
    fn set_visible(&mut self, hand: Hand, visible: bool) {
        self.events.push(DelegateEvent::Visible(hand, visible));
    }
    fn set_capability_flags(&mut self, hand: Hand, flags: CapabilityFlags) {
        self.events.push(DelegateEvent::Capabilities(hand, flags));
    }
    fn set_transform(&mut self, hand: Hand, transform: Mat4) {
        self.events.push(DelegateEvent::Transform(hand, transform));
    }
    fn set_button_state(
        &mut self,
        hand: Hand,
        button: Button,
        immersive_index: Option<usize>,
        pressed: bool,
        touched: bool,
        value: f32,
    ) {
        self.events.push(DelegateEvent::Button {
            hand,
            button,
            immersive_index,
            pressed,
            touched,
            value,
        });
    }
    fn set_axes(&mut self, hand: Hand, axes: &[f32]) {
        self.events.push(DelegateEvent::Axes(hand, axes.to_vec()));
    }
    fn set_scrolled_delta(&mut self, hand: Hand, x: f32, y: f32) {
        self.events.push(DelegateEvent::Scroll(hand, x, y));
    }
    fn set_select_action_start(&mut self, hand: Hand) {
        self.events.push(DelegateEvent::SelectStart(hand));
    }
    fn set_select_action_stop(&mut self, hand: Hand) {
        self.events.push(DelegateEvent::SelectStop(hand));
    }
    fn set_squeeze_action_start(&mut self, hand: Hand) {
        self.events.push(DelegateEvent::SqueezeStart(hand));
    }
    fn set_squeeze_action_stop(&mut self, hand: Hand) {
        self.events.push(DelegateEvent::SqueezeStop(hand));
    }
}

/// Swapchain whose acquire order is scripted up front.
#[derive(Default)]
pub struct FakeSwapchain {
    pub images: Vec<u32>,
    pub acquire_order: Vec<u32>,
    pub acquires: usize,
    pub waits: Vec<xr::Duration>,
    /// Shared with the session so releases stay visible after the swapchain is dropped.
    pub releases: Rc<Cell<usize>>,
}

impl SwapchainImages for FakeSwapchain {
    type Image = u32;

    fn enumerate_images(&self) -> Result<Vec<u32>> {
        Ok(self.images.clone())
    }

    fn acquire_image(&mut self) -> Result<u32> {
        let index = self.acquire_order[self.acquires % self.acquire_order.len()];
        self.acquires += 1;
        Ok(index)
    }

    fn wait_image(&mut self, timeout: xr::Duration) -> Result<()> {
        self.waits.push(timeout);
        Ok(())
    }

    fn release_image(&mut self) -> Result<()> {
        self.releases.set(self.releases.get() + 1);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSession {
    pub image_count: u32,
    pub acquire_order: Vec<u32>,
    pub releases: Rc<Cell<usize>>,
}

impl SwapchainSession for FakeSession {
    type Format = u32;
    type Swapchain = FakeSwapchain;

    fn create_swapchain(&self, _: &SwapchainDescriptor<u32>) -> Result<FakeSwapchain> {
        Ok(FakeSwapchain {
            images: (100..100 + self.image_count).collect(),
            acquire_order: self.acquire_order.clone(),
            releases: self.releases.clone(),
            ..Default::default()
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct FakeFramebuffer {
    pub id: usize,
    pub texture: u32,
    pub width: u32,
    pub height: u32,
    pub attributes: FramebufferAttributes,
}

#[derive(Default)]
pub struct FakeContext {
    pub created: usize,
    pub bound: Vec<usize>,
}

impl FramebufferContext<u32> for FakeContext {
    type Framebuffer = FakeFramebuffer;

    fn create_framebuffer(
        &mut self,
        image: &u32,
        width: u32,
        height: u32,
        attributes: &FramebufferAttributes,
    ) -> Result<FakeFramebuffer> {
        self.created += 1;
        Ok(FakeFramebuffer {
            id: self.created,
            texture: *image,
            width,
            height,
            attributes: *attributes,
        })
    }

    fn bind_framebuffer(&mut self, framebuffer: &FakeFramebuffer) {
        self.bound.push(framebuffer.id);
    }
}
