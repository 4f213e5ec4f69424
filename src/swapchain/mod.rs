//! Lazily wraps OpenXR swapchain images as renderable framebuffers.

#[cfg(feature = "vulkan")]
pub mod vulkan;

use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use openxr as xr;

use crate::config::SwapchainConfig;
use crate::error::{OxrError, Result};
use crate::types::RenderMode;

/// Everything needed to create a swapchain, independent of the graphics API.
#[derive(Clone, Copy, Debug)]
pub struct SwapchainDescriptor<F> {
    pub create_flags: xr::SwapchainCreateFlags,
    pub usage_flags: xr::SwapchainUsageFlags,
    pub format: F,
    pub sample_count: u32,
    pub width: u32,
    pub height: u32,
    pub face_count: u32,
    pub array_size: u32,
    pub mip_count: u32,
}

impl<F> SwapchainDescriptor<F> {
    /// Single layer, single mip color target.
    pub fn color(format: F, width: u32, height: u32) -> Self {
        Self {
            create_flags: xr::SwapchainCreateFlags::EMPTY,
            usage_flags: xr::SwapchainUsageFlags::COLOR_ATTACHMENT
                | xr::SwapchainUsageFlags::SAMPLED,
            format,
            sample_count: 1,
            width,
            height,
            face_count: 1,
            array_size: 1,
            mip_count: 1,
        }
    }
}

pub trait SwapchainSession {
    type Format: Copy;
    type Swapchain: SwapchainImages;

    fn create_swapchain(
        &self,
        descriptor: &SwapchainDescriptor<Self::Format>,
    ) -> Result<Self::Swapchain>;
}

pub trait SwapchainImages {
    type Image;

    fn enumerate_images(&self) -> Result<Vec<Self::Image>>;
    fn acquire_image(&mut self) -> Result<u32>;
    fn wait_image(&mut self, timeout: xr::Duration) -> Result<()>;
    fn release_image(&mut self) -> Result<()>;
}

impl<G: xr::Graphics> SwapchainSession for xr::Session<G>
where
    G::Format: Copy,
{
    type Format = G::Format;
    type Swapchain = xr::Swapchain<G>;

    fn create_swapchain(&self, d: &SwapchainDescriptor<G::Format>) -> Result<xr::Swapchain<G>> {
        let swapchain = xr::Session::create_swapchain(
            self,
            &xr::SwapchainCreateInfo {
                create_flags: d.create_flags,
                usage_flags: d.usage_flags,
                format: d.format,
                sample_count: d.sample_count,
                width: d.width,
                height: d.height,
                face_count: d.face_count,
                array_size: d.array_size,
                mip_count: d.mip_count,
            },
        )?;
        Ok(swapchain)
    }
}

impl<G: xr::Graphics> SwapchainImages for xr::Swapchain<G> {
    type Image = G::SwapchainImage;

    fn enumerate_images(&self) -> Result<Vec<G::SwapchainImage>> {
        Ok(xr::Swapchain::enumerate_images(self)?)
    }

    fn acquire_image(&mut self) -> Result<u32> {
        Ok(xr::Swapchain::acquire_image(self)?)
    }

    fn wait_image(&mut self, timeout: xr::Duration) -> Result<()> {
        Ok(xr::Swapchain::wait_image(self, timeout)?)
    }

    fn release_image(&mut self) -> Result<()> {
        Ok(xr::Swapchain::release_image(self)?)
    }
}

/// Sampling state applied to every framebuffer built from a swapchain image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramebufferAttributes {
    /// 0 means render straight into the swapchain image.
    pub samples: u32,
    pub address_mode: wgpu::AddressMode,
    pub filter: wgpu::FilterMode,
}

/// GPU side of the cache: turns a swapchain image into a render target.
pub trait FramebufferContext<I> {
    type Framebuffer;

    fn create_framebuffer(
        &mut self,
        image: &I,
        width: u32,
        height: u32,
        attributes: &FramebufferAttributes,
    ) -> Result<Self::Framebuffer>;

    /// Makes `framebuffer` the current target. Backends without global
    /// binding state may only record it.
    fn bind_framebuffer(&mut self, framebuffer: &Self::Framebuffer);
}

/// A swapchain image and, once it has been acquired, its framebuffer.
struct Slot<I, F> {
    image: I,
    framebuffer: Option<F>,
}

struct Swapchain<S: SwapchainImages, C: FramebufferContext<S::Image>> {
    handle: S,
    context: C,
    slots: Vec<Slot<S::Image, C::Framebuffer>>,
    width: u32,
    height: u32,
    attributes: FramebufferAttributes,
    acquired: Option<usize>,
}

/// Owns one swapchain and the framebuffer built for each of its images.
///
/// A framebuffer is created the first time its image is acquired and is
/// reused for every later acquisition of the same index.
#[derive(Resource)]
pub struct SwapchainCache<S: SwapchainImages, C: FramebufferContext<S::Image>> {
    config: SwapchainConfig,
    inner: Option<Swapchain<S, C>>,
}

impl<S: SwapchainImages, C: FramebufferContext<S::Image>> Default for SwapchainCache<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SwapchainImages, C: FramebufferContext<S::Image>> SwapchainCache<S, C> {
    pub fn new() -> Self {
        Self::with_config(SwapchainConfig::default())
    }

    pub fn with_config(config: SwapchainConfig) -> Self {
        Self {
            config,
            inner: None,
        }
    }

    /// Creates the swapchain and one empty slot per image, discarding any
    /// previous swapchain first.
    pub fn init<X>(
        &mut self,
        context: C,
        session: &X,
        descriptor: &SwapchainDescriptor<X::Format>,
        render_mode: RenderMode,
    ) -> Result<()>
    where
        X: SwapchainSession<Swapchain = S>,
    {
        self.destroy();

        let handle = session.create_swapchain(descriptor)?;
        let images = handle.enumerate_images()?;
        if images.is_empty() {
            return Err(OxrError::NoSwapchainImages);
        }
        info!(
            "created {}x{} swapchain with {} images",
            descriptor.width,
            descriptor.height,
            images.len()
        );

        self.inner = Some(Swapchain {
            handle,
            context,
            slots: images
                .into_iter()
                .map(|image| Slot {
                    image,
                    framebuffer: None,
                })
                .collect(),
            width: descriptor.width,
            height: descriptor.height,
            attributes: FramebufferAttributes {
                samples: self.config.samples(render_mode),
                address_mode: self.config.address_mode,
                filter: self.config.filter,
            },
            acquired: None,
        });
        Ok(())
    }

    /// Acquires the next image, blocks until it is ready and makes sure its
    /// framebuffer exists.
    pub fn acquire_image(&mut self) -> Result<()> {
        let inner = self.inner_mut()?;
        if inner.acquired.is_some() {
            return Err(OxrError::AlreadyAcquired);
        }

        let index = inner.handle.acquire_image()?;
        let count = inner.slots.len();
        let slot_index = index as usize;
        if slot_index >= count {
            return Err(OxrError::ImageIndexOutOfRange { index, count });
        }
        inner.handle.wait_image(xr::Duration::INFINITE)?;

        let slot = &mut inner.slots[slot_index];
        if slot.framebuffer.is_none() {
            slot.framebuffer = Some(inner.context.create_framebuffer(
                &slot.image,
                inner.width,
                inner.height,
                &inner.attributes,
            )?);
            debug!("built framebuffer for swapchain image {index}");
        }

        inner.acquired = Some(slot_index);
        Ok(())
    }

    pub fn release_image(&mut self) -> Result<()> {
        let inner = self.inner_mut()?;
        if inner.acquired.is_none() {
            return Err(OxrError::NotAcquired);
        }
        inner.handle.release_image()?;
        inner.acquired = None;
        Ok(())
    }

    /// Hands the acquired image's framebuffer to the context as the current
    /// target and returns it for the caller's render pass.
    pub fn bind_fbo(&mut self) -> Result<&C::Framebuffer> {
        let inner = self.inner.as_mut().ok_or(OxrError::SwapchainNotInitialized)?;
        let index = inner.acquired.ok_or(OxrError::NotAcquired)?;
        let framebuffer = inner.slots[index]
            .framebuffer
            .as_ref()
            .ok_or(OxrError::NotAcquired)?;
        inner.context.bind_framebuffer(framebuffer);
        Ok(framebuffer)
    }

    /// Releases a held image and drops the swapchain. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        let Some(mut inner) = self.inner.take() else {
            return;
        };
        if inner.acquired.is_some() {
            if let Err(err) = inner.handle.release_image() {
                warn!("failed to release swapchain image on destroy: {err}");
            }
        }
        info!("destroyed swapchain");
    }

    pub fn width(&self) -> u32 {
        self.inner.as_ref().map_or(0, |s| s.width)
    }

    pub fn height(&self) -> u32 {
        self.inner.as_ref().map_or(0, |s| s.height)
    }

    pub fn swapchain(&self) -> Option<&S> {
        self.inner.as_ref().map(|s| &s.handle)
    }

    pub fn context(&self) -> Option<&C> {
        self.inner.as_ref().map(|s| &s.context)
    }

    pub fn image_count(&self) -> usize {
        self.inner.as_ref().map_or(0, |s| s.slots.len())
    }

    pub fn is_acquired(&self) -> bool {
        self.inner.as_ref().is_some_and(|s| s.acquired.is_some())
    }

    fn inner_mut(&mut self) -> Result<&mut Swapchain<S, C>> {
        self.inner.as_mut().ok_or(OxrError::SwapchainNotInitialized)
    }
}
