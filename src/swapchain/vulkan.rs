use ash::vk::{self, Handle};
use bevy::log::debug;
use wgpu_hal::api::Vulkan as V;
use wgpu_hal::Api;

use super::{FramebufferAttributes, FramebufferContext};
use crate::error::Result;

/// A Vulkan swapchain image wrapped for wgpu, plus the state needed to render
/// into and sample from it.
pub struct WgpuFramebuffer {
    pub id: usize,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Multisampled target resolved into `view`. Absent when rendering
    /// straight into the swapchain image.
    pub msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
}

impl WgpuFramebuffer {
    pub fn color_attachment(&self, clear: wgpu::Color) -> wgpu::RenderPassColorAttachment<'_> {
        let ops = wgpu::Operations {
            load: wgpu::LoadOp::Clear(clear),
            store: wgpu::StoreOp::Store,
        };
        match &self.msaa {
            Some((_, msaa_view)) => wgpu::RenderPassColorAttachment {
                view: msaa_view,
                resolve_target: Some(&self.view),
                ops,
            },
            None => wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops,
            },
        }
    }
}

/// Builds framebuffers for the raw `VkImage` handles a Vulkan swapchain
/// enumerates.
pub struct WgpuFramebufferContext {
    device: wgpu::Device,
    format: wgpu::TextureFormat,
    created: usize,
    bound: Option<usize>,
}

impl WgpuFramebufferContext {
    pub fn new(device: wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            format,
            created: 0,
            bound: None,
        }
    }

    /// Id of the framebuffer last bound as the render target.
    pub fn bound(&self) -> Option<usize> {
        self.bound
    }

    fn wrap_image(&self, image: u64, size: wgpu::Extent3d) -> wgpu::Texture {
        let color_image = vk::Image::from_raw(image);
        // the runtime owns the image, so no drop guard is handed over
        let hal_texture = unsafe {
            <V as Api>::Device::texture_from_raw(
                color_image,
                &wgpu_hal::TextureDescriptor {
                    label: Some("XR swapchain image"),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: self.format,
                    usage: wgpu_hal::TextureUses::COLOR_TARGET
                        | wgpu_hal::TextureUses::COPY_DST
                        | wgpu_hal::TextureUses::RESOURCE,
                    memory_flags: wgpu_hal::MemoryFlags::empty(),
                    view_formats: vec![],
                },
                None,
            )
        };
        unsafe {
            self.device.create_texture_from_hal::<V>(
                hal_texture,
                &wgpu::TextureDescriptor {
                    label: Some("XR swapchain image"),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: self.format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                        | wgpu::TextureUsages::COPY_DST
                        | wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                },
            )
        }
    }
}

impl FramebufferContext<u64> for WgpuFramebufferContext {
    type Framebuffer = WgpuFramebuffer;

    fn create_framebuffer(
        &mut self,
        image: &u64,
        width: u32,
        height: u32,
        attributes: &FramebufferAttributes,
    ) -> Result<WgpuFramebuffer> {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.wrap_image(*image, size);
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D2),
            format: Some(self.format),
            ..Default::default()
        });
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("XR swapchain sampler"),
            address_mode_u: attributes.address_mode,
            address_mode_v: attributes.address_mode,
            address_mode_w: attributes.address_mode,
            mag_filter: attributes.filter,
            min_filter: attributes.filter,
            ..Default::default()
        });

        let msaa = (attributes.samples > 1).then(|| {
            let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("XR multisample target"),
                size,
                mip_level_count: 1,
                sample_count: attributes.samples,
                dimension: wgpu::TextureDimension::D2,
                format: self.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            (texture, view)
        });

        self.created += 1;
        debug!(
            "wrapped VkImage {image:#x} as {width}x{height} framebuffer with {} samples",
            attributes.samples
        );
        Ok(WgpuFramebuffer {
            id: self.created,
            texture,
            view,
            sampler,
            msaa,
        })
    }

    fn bind_framebuffer(&mut self, framebuffer: &WgpuFramebuffer) {
        self.bound = Some(framebuffer.id);
    }
}
