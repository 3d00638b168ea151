//! The ring scene: one pipeline, fixed vertex buffers, and up to two rotation
//! uniforms rewritten every frame.

pub mod geometry;
mod pipeline;
pub mod rotation;
pub mod variant;

use anyhow::{Result, anyhow};
use wgpu::util::DeviceExt;

use spinner_engine::device::capture_validation;
use spinner_engine::render::{RenderCtx, RenderTarget};

use crate::shader::ShaderCode;

use geometry::{RingGrid, VERTEX_COUNT};
use rotation::{RingAngles, Rotation2};
pub use variant::Variant;

/// Background the target is cleared to every frame.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// GPU resources for one scene build.
///
/// Nothing here is created or resized after [`Scene::new`]; frames only
/// overwrite the contents of `xforms`.
pub struct Scene {
    variant: Variant,
    pipeline: wgpu::RenderPipeline,
    vertex_buffers: Vec<wgpu::Buffer>,
    /// Rotation uniforms in binding order (see `Variant::xform_range`).
    xforms: Vec<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl Scene {
    /// Compiles `shader` and uploads the vertex grid.
    ///
    /// Shader compilation and pipeline validation errors are captured and
    /// returned rather than left to the device's uncaptured-error handler.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        variant: Variant,
        shader: &ShaderCode,
    ) -> Result<Self> {
        let (scene, error) = capture_validation(device, || {
            Self::create(device, surface_format, variant, &shader.source)
        });

        if let Some(e) = error {
            return Err(anyhow!("building the {variant} scene from {} failed: {e}", shader.origin));
        }

        log::info!(
            "{variant} scene ready: {} vertex stream(s), {} uniform(s)",
            scene.vertex_buffers.len(),
            scene.xforms.len()
        );
        Ok(scene)
    }

    fn create(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        variant: Variant,
        source: &str,
    ) -> Self {
        let (pipeline, bind_group_layout) = pipeline::build(device, surface_format, variant, source);

        let grid = RingGrid::new();
        let vertex_buffers = match variant.vertex_streams() {
            1 => vec![vertex_buffer(device, "spinner position vbo", &grid.combined())],
            _ => vec![
                vertex_buffer(device, "spinner center vbo", &grid.centers),
                vertex_buffer(device, "spinner corner vbo", &grid.corners),
            ],
        };

        let xforms: Vec<wgpu::Buffer> = variant
            .xform_range()
            .map(|_| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("spinner xform ubo"),
                    contents: bytemuck::bytes_of(&Rotation2::IDENTITY),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                })
            })
            .collect();

        let bind_group = bind_group_layout.map(|layout| {
            let entries: Vec<wgpu::BindGroupEntry> = xforms
                .iter()
                .enumerate()
                .map(|(binding, buffer)| wgpu::BindGroupEntry {
                    binding: binding as u32,
                    resource: buffer.as_entire_binding(),
                })
                .collect();

            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("spinner xform bind group"),
                layout: &layout,
                entries: &entries,
            })
        });

        Self {
            variant,
            pipeline,
            vertex_buffers,
            xforms,
            bind_group,
        }
    }

    /// Overwrites every rotation uniform for `timestamp_ms`.
    fn write_xforms(&self, queue: &wgpu::Queue, timestamp_ms: f64) {
        let angles = RingAngles::at(timestamp_ms);
        let all = [angles.big_xform(), angles.small_xform()];
        let bound = &all[self.variant.xform_range()];

        for (buffer, xform) in self.xforms.iter().zip(bound) {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(xform));
        }
    }

    /// Records the frame: rotation writes, then one cleared pass with one
    /// 9-vertex draw.
    pub fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, timestamp_ms: f64) {
        self.write_xforms(ctx.queue, timestamp_ms);

        let mut pass = target.begin_pass("spinner pass");
        pass.set_pipeline(&self.pipeline);
        if let Some(bind_group) = self.bind_group.as_ref() {
            pass.set_bind_group(0, bind_group, &[]);
        }
        for (slot, buffer) in self.vertex_buffers.iter().enumerate() {
            pass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }
        pass.draw(0..VERTEX_COUNT, 0..1);
    }
}

fn vertex_buffer(device: &wgpu::Device, label: &str, points: &[geometry::Point]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(points),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

    /// A headless device, or `None` when the machine has no adapter at all.
    fn headless_device() -> Option<wgpu::Device> {
        let instance = wgpu::Instance::default();
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()?;
        Some(device)
    }

    fn code(source: &str) -> ShaderCode {
        ShaderCode {
            origin: "triangle.wgsl".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn builtin_shaders_build_cleanly() {
        let Some(device) = headless_device() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };

        for variant in [Variant::Rings, Variant::Ring, Variant::Still] {
            let scene = Scene::new(&device, FORMAT, variant, &code(variant.builtin_shader()))
                .unwrap_or_else(|e| panic!("{variant}: {e:#}"));
            assert_eq!(scene.vertex_buffers.len(), variant.vertex_streams());
            assert_eq!(scene.xforms.len(), variant.uniform_count());
            assert_eq!(scene.bind_group.is_some(), variant.uniform_count() > 0);
        }
    }

    #[test]
    fn invalid_wgsl_is_reported() {
        let Some(device) = headless_device() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };

        let err = Scene::new(&device, FORMAT, Variant::Still, &code("fn vertex_shader( {"))
            .err()
            .expect("broken WGSL must not build");
        let message = err.to_string();
        assert!(
            message.starts_with("building the still scene from triangle.wgsl failed: "),
            "{message}"
        );
        assert!(message.len() > "building the still scene from triangle.wgsl failed: ".len());
    }

    #[test]
    fn missing_fragment_entry_point_is_reported() {
        let Some(device) = headless_device() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };

        let source = Variant::Still.builtin_shader().replace("fn blue(", "fn red(");
        let err = Scene::new(&device, FORMAT, Variant::Still, &code(&source))
            .err()
            .expect("a shader without `blue` must not build");
        assert!(
            err.to_string().starts_with("building the still scene from triangle.wgsl failed: "),
            "{err}"
        );
    }
}
