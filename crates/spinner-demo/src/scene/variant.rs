use std::fmt;
use std::ops::Range;

use clap::ValueEnum;

/// Which version of the ring scene to draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// Both rings rotate, at independent rates.
    #[default]
    Rings,
    /// Each triangle spins in place; the big ring stays put.
    Ring,
    /// Static picture: positions combined on the CPU, no uniforms.
    Still,
}

impl Variant {
    /// Number of `float32x2` vertex streams the pipeline consumes.
    pub fn vertex_streams(self) -> usize {
        match self {
            Variant::Rings | Variant::Ring => 2,
            Variant::Still => 1,
        }
    }

    /// Which of `[big, small]` rotations are bound, in binding order.
    pub fn xform_range(self) -> Range<usize> {
        match self {
            Variant::Rings => 0..2,
            Variant::Ring => 1..2,
            Variant::Still => 0..0,
        }
    }

    pub fn uniform_count(self) -> usize {
        self.xform_range().len()
    }

    /// WGSL compiled into the binary for this variant.
    pub fn builtin_shader(self) -> &'static str {
        match self {
            Variant::Rings => include_str!("../../shaders/rings.wgsl"),
            Variant::Ring => include_str!("../../shaders/ring.wgsl"),
            Variant::Still => include_str!("../../shaders/still.wgsl"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Rings => "rings",
            Variant::Ring => "ring",
            Variant::Still => "still",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_counts() {
        assert_eq!(Variant::Rings.uniform_count(), 2);
        assert_eq!(Variant::Ring.uniform_count(), 1);
        assert_eq!(Variant::Still.uniform_count(), 0);
    }

    #[test]
    fn builtin_shaders_declare_entry_points() {
        for v in [Variant::Rings, Variant::Ring, Variant::Still] {
            let src = v.builtin_shader();
            assert!(src.contains("fn vertex_shader("), "{v}");
            assert!(src.contains("fn blue("), "{v}");
        }
    }

    #[test]
    fn builtin_shaders_bind_what_the_variant_uploads() {
        for v in [Variant::Rings, Variant::Ring, Variant::Still] {
            let bindings = v.builtin_shader().matches("var<uniform>").count();
            assert_eq!(bindings, v.uniform_count(), "{v}");
            let locations = v.builtin_shader().matches("@location(").count() - 1; // fragment output
            assert_eq!(locations, v.vertex_streams(), "{v}");
        }
    }
}
