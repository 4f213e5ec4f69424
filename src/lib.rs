//! OpenXR plumbing for a VR browser: controller actions mapped onto the
//! browser's gamepad model, and swapchain images cached as render targets.

pub mod config;
pub mod delegate;
pub mod error;
pub mod input;
pub mod swapchain;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{ControllerInfo, InputMapperConfig, SwapchainConfig};
pub use delegate::ControllerDelegate;
pub use error::{OxrError, Result};
pub use input::runtime::{OxrInputRuntime, XrInputRuntime};
pub use input::{HandState, InputMapper};
#[cfg(feature = "vulkan")]
pub use swapchain::vulkan::{WgpuFramebuffer, WgpuFramebufferContext};
pub use swapchain::{
    FramebufferAttributes, FramebufferContext, SwapchainCache, SwapchainDescriptor, SwapchainImages,
    SwapchainSession,
};
pub use types::{Button, CapabilityFlags, DeviceType, Hand, Handed, RenderMode};
