use bevy::{
    asset::{Assets, Handle, RenderAssetUsages},
    image::{Image, ImageAddressMode, ImageSampler, ImageSamplerDescriptor},
};

/// The context used to prepare resolved resources before they are rendered.
///
/// Both operations only change how a resource is used, never its content,
/// so applying them more than once has no further effect.
pub trait TierPreparation<H> {
    /// Makes the resource available to the GPU, unless it already is.
    fn initialize(&mut self, handle: &H);

    /// Configures the resource to repeat outside of the [0, 1] texture coordinate range.
    fn set_repeat_wrapping(&mut self, handle: &H);
}

impl TierPreparation<Handle<Image>> for Assets<Image> {
    // `get_mut` always queues a `Modified` event and a re-upload of the image,
    // so images are only borrowed mutably when they change.
    fn initialize(&mut self, handle: &Handle<Image>) {
        let uploaded = self
            .get(handle)
            .map_or(true, |image| {
                image.asset_usage.contains(RenderAssetUsages::RENDER_WORLD)
            });
        if uploaded {
            return;
        }

        if let Some(image) = self.get_mut(handle) {
            image.asset_usage |= RenderAssetUsages::RENDER_WORLD;
        }
    }

    fn set_repeat_wrapping(&mut self, handle: &Handle<Image>) {
        let Some(image) = self.get(handle) else {
            return;
        };

        let mut descriptor = match &image.sampler {
            ImageSampler::Descriptor(descriptor) => descriptor.clone(),
            ImageSampler::Default => ImageSamplerDescriptor::default(),
        };

        if matches!(descriptor.address_mode_u, ImageAddressMode::Repeat)
            && matches!(descriptor.address_mode_v, ImageAddressMode::Repeat)
        {
            return;
        }

        descriptor.address_mode_u = ImageAddressMode::Repeat;
        descriptor.address_mode_v = ImageAddressMode::Repeat;

        if let Some(image) = self.get_mut(handle) {
            image.sampler = ImageSampler::Descriptor(descriptor);
        }
    }
}
