use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::DrawableSize;

use super::backend::ResourceTable;
use super::surface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// wgpu context bound to one window.
///
/// Owns the device, queue and surface configuration, the resources created
/// through `render::GpuBackend`, and the frame being recorded between
/// `begin_frame` and `present`.
pub struct Gpu<'w> {
    window: &'w Window,

    /// Surface lifetime is tied to `window` via `'w`.
    surface: wgpu::Surface<'w>,
    pub(super) device: wgpu::Device,
    pub(super) queue: wgpu::Queue,

    pub(super) config: wgpu::SurfaceConfiguration,
    present_modes: Vec<wgpu::PresentMode>,

    /// Current window size in physical pixels; may be 0x0 while minimized.
    size: PhysicalSize<u32>,

    pub(super) resources: ResourceTable,
    pub(super) texture_layout: wgpu::BindGroupLayout,
    pub(super) sampler: wgpu::Sampler,

    pub(super) frame: Option<GpuFrame>,
    /// Size the current frame's draws are mapped onto.
    pub(super) viewport: DrawableSize,

    lost: bool,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to `window`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sunburst device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface::choose_present_mode(&caps.present_modes, init.vsync),
            alpha_mode: surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sunburst sprite bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sunburst sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let info = adapter.get_info();
        log::info!(
            "GPU: {} ({:?}), surface {:?} {}x{} {:?}",
            info.name,
            info.backend,
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            present_modes: caps.present_modes,
            size,
            resources: ResourceTable::default(),
            texture_layout,
            sampler,
            frame: None,
            viewport: DrawableSize::unset(),
            lost: false,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current window size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// `true` once surface acquisition failed fatally; the runtime exits.
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn vsync(&self) -> bool {
        self.config.present_mode == wgpu::PresentMode::Fifo
    }

    /// Reconfigures the surface after a resize.
    ///
    /// A 0x0 size (minimized) is recorded but configuration is deferred.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Switches between vsync'd (Fifo) and tearing presentation.
    pub fn set_vsync(&mut self, vsync: bool) {
        let mode = surface::choose_present_mode(&self.present_modes, vsync);
        if mode == self.config.present_mode {
            return;
        }

        self.config.present_mode = mode;
        if self.size.width > 0 && self.size.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
        log::info!("vsync {} ({mode:?})", if vsync { "on" } else { "off" });
    }

    /// Acquires the next surface texture and opens an encoder for it.
    pub(super) fn acquire_frame(&mut self) -> Option<GpuFrame> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                self.handle_surface_error(err);
                return None;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sunburst frame encoder"),
            });

        Some(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents.
    pub(super) fn submit(&mut self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        self.window.pre_present_notify();
        frame.surface_texture.present();
        self.resources.end_frame();
    }

    fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface::map_surface_error(&err);
        match action {
            SurfaceErrorAction::Reconfigured => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                log::debug!("surface {err}; reconfigured");
            }
            SurfaceErrorAction::SkipFrame => log::debug!("surface {err}; frame skipped"),
            SurfaceErrorAction::Fatal => {
                log::error!("surface acquisition failed: {err}");
                self.lost = true;
            }
        }
        action
    }
}
