/// Object that can be attached to a pipeline, e.g. a buffer or a texture
pub trait Bindable {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)>;
}

/// Object that can be attached to a pipeline in several variants sharing the
/// same layout (e.g. one texture per cascade level), with each variant ending
/// up in a separate bind group.
pub trait VariantBindable {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, Vec<wgpu::BindingResource>)>;
}

impl<T> VariantBindable for T
where
    T: Bindable,
{
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, Vec<wgpu::BindingResource>)> {
        Bindable::bind(self, binding)
            .into_iter()
            .map(|(layout, resource)| (layout, vec![resource]))
            .collect()
    }
}

/// Binds each of given objects as a separate variant.
///
/// See: [`VariantBindable`].
pub struct Variants<T> {
    items: Vec<T>,
}

impl<T> Variants<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

impl<T> VariantBindable for Variants<T>
where
    T: Bindable,
{
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, Vec<wgpu::BindingResource>)> {
        let mut entries: Vec<(_, Vec<_>)> = Vec::new();

        for item in &self.items {
            let item = Bindable::bind(item, binding);

            if entries.is_empty() {
                entries = item
                    .into_iter()
                    .map(|(layout, resource)| (layout, vec![resource]))
                    .collect();
            } else {
                assert_eq!(entries.len(), item.len());

                for ((layout, resources), (item_layout, item_resource)) in
                    entries.iter_mut().zip(item)
                {
                    assert_eq!(*layout, item_layout);

                    resources.push(item_resource);
                }
            }
        }

        entries
    }
}
