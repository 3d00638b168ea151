use super::geometry::Point;
use super::rotation::Rotation2;
use super::variant::Variant;

pub const VERTEX_ENTRY: &str = "vertex_shader";
pub const FRAGMENT_ENTRY: &str = "blue";

/// Builds the one render pipeline for `variant`.
///
/// Group 0 holds the rotation uniforms; `still` has no bind groups at all.
/// Validation is the caller's job: wrap this in an error scope.
pub(crate) fn build(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    variant: Variant,
    source: &str,
) -> (wgpu::RenderPipeline, Option<wgpu::BindGroupLayout>) {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("spinner shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let bind_group_layout = xform_layout(device, variant.uniform_count());
    let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = bind_group_layout.iter().collect();

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("spinner pipeline layout"),
        bind_group_layouts: &bind_group_layouts,
        immediate_size: 0,
    });

    let buffers: Vec<wgpu::VertexBufferLayout<'static>> = (0..variant.vertex_streams() as u32)
        .map(Point::layout)
        .collect();

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("spinner pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    (pipeline, bind_group_layout)
}

fn xform_layout(device: &wgpu::Device, uniforms: usize) -> Option<wgpu::BindGroupLayout> {
    if uniforms == 0 {
        return None;
    }

    let min_binding_size = wgpu::BufferSize::new(std::mem::size_of::<Rotation2>() as u64);
    let entries: Vec<wgpu::BindGroupLayoutEntry> = (0..uniforms as u32)
        .map(|binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size,
            },
            count: None,
        })
        .collect();

    Some(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("spinner xform bgl"),
        entries: &entries,
    }))
}
