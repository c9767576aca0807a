use bevy::{
    asset::{AssetServer, Handle, LoadState},
    image::Image,
    prelude::*,
};

/// The resolution state of a single requested resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceStatus {
    /// The resource is still loading.
    Pending,
    /// The resource is loaded and its handle can be used.
    Ready,
    /// The resource could not be loaded and never will be.
    Failed,
}

/// A service that loads resources by identifier.
///
/// Loading happens asynchronously behind [`request`](ResourceSource::request),
/// the caller observes the progress by polling [`status`](ResourceSource::status).
pub trait ResourceSource {
    type Handle: Clone;

    /// Starts loading the resource and returns its handle immediately.
    fn request(&mut self, identifier: &str) -> Self::Handle;

    fn status(&self, handle: &Self::Handle) -> ResourceStatus;

    /// Gives up the handle. Pending loads are cancelled, loaded resources may be freed.
    fn release(&mut self, handle: Self::Handle);
}

/// Loads images through the Bevy [`AssetServer`].
pub struct AssetServerSource<'a>(pub &'a AssetServer);

impl ResourceSource for AssetServerSource<'_> {
    type Handle = Handle<Image>;

    fn request(&mut self, identifier: &str) -> Handle<Image> {
        self.0.load(identifier.to_owned())
    }

    fn status(&self, handle: &Handle<Image>) -> ResourceStatus {
        match self.0.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => ResourceStatus::Ready,
            Some(LoadState::Failed(_)) => ResourceStatus::Failed,
            _ => ResourceStatus::Pending,
        }
    }

    fn release(&mut self, handle: Handle<Image>) {
        // the asset server drops the asset once the last strong handle is gone
        debug!("Releasing image {:?}", handle.path());
    }
}
