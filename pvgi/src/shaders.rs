use log::debug;

/// Returns source of a WGSL program, prepended with the declarations shared
/// by all programs.
macro_rules! source {
    ($name:literal) => {
        concat!(
            include_str!("shaders/common.wgsl"),
            include_str!(concat!("shaders/", $name, ".wgsl")),
        )
    };
}

macro_rules! shader {
    ($device:expr, $name:literal) => {{
        debug!("Compiling shader: {}", $name);

        $device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(concat!("pvgi_", $name)),
            source: wgpu::ShaderSource::Wgsl(source!($name).into()),
        })
    }};
}

#[derive(Debug)]
pub struct Shaders {
    pub scene_capture: (wgpu::ShaderModule, &'static str),
    pub voxel_cleanup: (wgpu::ShaderModule, &'static str),
    pub voxel_injection: (wgpu::ShaderModule, &'static str),
    pub voxel_tracing: (wgpu::ShaderModule, &'static str),

    /// Contains both `main_vs` and `main_fs`
    pub frame_composition: wgpu::ShaderModule,
}

impl Shaders {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            scene_capture: (shader!(device, "scene_capture"), "main"),
            voxel_cleanup: (shader!(device, "voxel_cleanup"), "main"),
            voxel_injection: (shader!(device, "voxel_injection"), "main"),
            voxel_tracing: (shader!(device, "voxel_tracing"), "main"),
            frame_composition: shader!(device, "frame_composition"),
        }
    }
}

#[cfg(test)]
mod tests {
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    #[test]
    fn programs() {
        let programs = [
            ("scene_capture", source!("scene_capture"), &["main"][..]),
            ("voxel_cleanup", source!("voxel_cleanup"), &["main"][..]),
            ("voxel_injection", source!("voxel_injection"), &["main"][..]),
            ("voxel_tracing", source!("voxel_tracing"), &["main"][..]),
            (
                "frame_composition",
                source!("frame_composition"),
                &["main_vs", "main_fs"][..],
            ),
        ];

        for (name, source, entry_points) in programs {
            let module = naga::front::wgsl::parse_str(source)
                .unwrap_or_else(|err| {
                    panic!("{name}: {}", err.emit_to_string(source))
                });

            Validator::new(ValidationFlags::all(), Capabilities::all())
                .validate(&module)
                .unwrap_or_else(|err| panic!("{name}: {err:?}"));

            for entry_point in entry_points {
                let found = module
                    .entry_points
                    .iter()
                    .any(|ep| ep.name == *entry_point);

                assert!(found, "{name}: missing entry point `{entry_point}`");
            }
        }
    }
}
