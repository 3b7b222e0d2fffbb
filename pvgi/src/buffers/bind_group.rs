use crate::VariantBindable;

#[derive(Debug)]
pub struct BindGroup {
    variants: Vec<wgpu::BindGroup>,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl BindGroup {
    pub fn builder<'ctx>(label: impl ToString) -> BindGroupBuilder<'ctx> {
        BindGroupBuilder {
            label: label.to_string(),
            layouts: Default::default(),
            resources: Default::default(),
        }
    }

    /// Returns given variant of this bind group; bind groups with a single
    /// variant return it for any index.
    pub fn get(&self, variant: usize) -> &wgpu::BindGroup {
        &self.variants[variant.min(self.variants.len() - 1)]
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

pub struct BindGroupBuilder<'a> {
    label: String,
    layouts: Vec<wgpu::BindGroupLayoutEntry>,
    resources: Vec<Vec<wgpu::BindingResource<'a>>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn add(mut self, item: &'a dyn VariantBindable) -> Self {
        for (layout, resources) in item.bind(self.resources.len() as u32) {
            self.layouts.push(layout);
            self.resources.push(resources);
        }

        self
    }

    pub fn build(self, device: &wgpu::Device) -> BindGroup {
        let label = format!("pvgi_{}", self.label);

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label}_layout")),
                entries: &self.layouts,
            });

        let variants = self
            .resources
            .iter()
            .map(|resources| resources.len())
            .max()
            .unwrap_or(1)
            .max(1);

        for resources in &self.resources {
            assert!(resources.len() == 1 || resources.len() == variants);
        }

        let variants = (0..variants)
            .map(|variant| {
                let entries: Vec<_> = self
                    .resources
                    .iter()
                    .enumerate()
                    .map(|(binding, resources)| wgpu::BindGroupEntry {
                        binding: binding as _,
                        resource: resources[variant.min(resources.len() - 1)]
                            .clone(),
                    })
                    .collect();

                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{label}_v{variant}")),
                    layout: &bind_group_layout,
                    entries: &entries,
                })
            })
            .collect();

        BindGroup {
            variants,
            bind_group_layout,
        }
    }
}
