use std::marker::PhantomData;
use std::mem;
use std::ops::Range;

use bytemuck::Pod;
use glam::UVec3;
use log::debug;

use crate::{BindGroup, BindGroupBuilder, VariantBindable};

#[derive(Debug)]
pub struct GiComputePass<P = ()> {
    label: String,
    bind_groups: Vec<BindGroup>,
    pipeline: wgpu::ComputePipeline,
    _params: PhantomData<P>,
}

impl<P> GiComputePass<P>
where
    P: Pod,
{
    pub fn builder<'a>(label: impl ToString) -> GiPassBuilder<'a, P> {
        GiPassBuilder {
            label: label.to_string(),
            bind_groups: Default::default(),
            external_layouts: Default::default(),
            _params: Default::default(),
        }
    }

    /// Dispatches given number of workgroups.
    ///
    /// `variant` selects variant of every multi-variant bind group (e.g. the
    /// cascade level), while `external` are bind groups created outside of the
    /// pass, bound after the pass' own ones.
    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        variant: usize,
        external: &[&wgpu::BindGroup],
        size: UVec3,
        params: P,
    ) {
        let label = format!("pvgi_{}_pass", self.label);

        let mut pass =
            encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(&label),
            });

        pass.set_pipeline(&self.pipeline);

        if mem::size_of::<P>() > 0 {
            pass.set_push_constants(0, bytemuck::bytes_of(&params));
        }

        for (bind_group_idx, bind_group) in self.bind_groups.iter().enumerate()
        {
            pass.set_bind_group(
                bind_group_idx as u32,
                bind_group.get(variant),
                &[],
            );
        }

        for (bind_group_idx, bind_group) in external.iter().enumerate() {
            pass.set_bind_group(
                (self.bind_groups.len() + bind_group_idx) as u32,
                bind_group,
                &[],
            );
        }

        pass.dispatch_workgroups(size.x, size.y, size.z);
    }
}

pub struct GiPassBuilder<'a, P> {
    label: String,
    bind_groups: Vec<BindGroupBuilder<'a>>,
    external_layouts: Vec<&'a wgpu::BindGroupLayout>,
    _params: PhantomData<P>,
}

impl<'a, P> GiPassBuilder<'a, P>
where
    P: Pod,
{
    pub fn bind<const N: usize>(
        mut self,
        items: [&'a dyn VariantBindable; N],
    ) -> Self {
        let mut bind_group = BindGroup::builder(format!(
            "{}_bg{}",
            self.label,
            self.bind_groups.len()
        ));

        for item in items {
            bind_group = bind_group.add(item);
        }

        self.bind_groups.push(bind_group);
        self
    }

    /// Declares a bind group that's created outside of the pass and provided
    /// on each [`GiComputePass::run()`].
    pub fn bind_external(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.external_layouts.push(layout);
        self
    }

    pub fn build(
        self,
        device: &wgpu::Device,
        (module, entry_point): &(wgpu::ShaderModule, &'static str),
    ) -> GiComputePass<P> {
        debug!("Initializing pass: {}:{}", self.label, entry_point);

        let bind_groups: Vec<_> = self
            .bind_groups
            .into_iter()
            .map(|bg| bg.build(device))
            .collect();

        let bind_group_layouts: Vec<_> = bind_groups
            .iter()
            .map(|bg| bg.layout())
            .chain(self.external_layouts)
            .collect();

        let push_constant_ranges = if mem::size_of::<P>() > 0 {
            vec![wgpu::PushConstantRange {
                stages: wgpu::ShaderStages::COMPUTE,
                range: Range {
                    start: 0,
                    end: mem::size_of::<P>() as u32,
                },
            }]
        } else {
            vec![]
        };

        let pipeline_layout_label =
            format!("pvgi_{}_pipeline_layout", self.label);

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&pipeline_layout_label),
                bind_group_layouts: &bind_group_layouts,
                push_constant_ranges: &push_constant_ranges,
            });

        let pipeline_label = format!("pvgi_{}_pipeline", self.label);

        let pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&pipeline_label),
                layout: Some(&pipeline_layout),
                module,
                entry_point,
            });

        GiComputePass {
            label: self.label,
            bind_groups,
            pipeline,
            _params: PhantomData,
        }
    }
}
