//! The collaborators shared by every host in a process.

use std::fmt;
use std::sync::Arc;

use canopy_core::{AppLifecycle, CloseAuthorization};
use canopy_render::DrawableFactory;

use crate::coordinator::ContentRootCoordinator;
use crate::window::PackageMetadata;

/// Everything a native host needs from the application.
///
/// Cloning is cheap; every clone refers to the same lifecycle, coordinator
/// and services.
#[derive(Clone)]
pub struct HostContext {
    lifecycle: Arc<AppLifecycle>,
    coordinator: Arc<ContentRootCoordinator>,
    close_authority: Arc<dyn CloseAuthorization>,
    package: Arc<dyn PackageMetadata>,
    factory: DrawableFactory,
}

impl HostContext {
    /// Create a context with a fresh coordinator.
    pub fn new(
        lifecycle: Arc<AppLifecycle>,
        close_authority: Arc<dyn CloseAuthorization>,
        package: Arc<dyn PackageMetadata>,
    ) -> Self {
        Self::with_coordinator(
            lifecycle,
            ContentRootCoordinator::new(),
            close_authority,
            package,
        )
    }

    /// Create a context sharing an existing coordinator.
    pub fn with_coordinator(
        lifecycle: Arc<AppLifecycle>,
        coordinator: Arc<ContentRootCoordinator>,
        close_authority: Arc<dyn CloseAuthorization>,
        package: Arc<dyn PackageMetadata>,
    ) -> Self {
        Self {
            lifecycle,
            coordinator,
            close_authority,
            package,
            factory: DrawableFactory::new(),
        }
    }

    /// Use `factory` to build backgrounds.
    pub fn with_factory(mut self, factory: DrawableFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn lifecycle(&self) -> &Arc<AppLifecycle> {
        &self.lifecycle
    }

    pub fn coordinator(&self) -> &Arc<ContentRootCoordinator> {
        &self.coordinator
    }

    pub fn close_authority(&self) -> &Arc<dyn CloseAuthorization> {
        &self.close_authority
    }

    pub fn package(&self) -> &Arc<dyn PackageMetadata> {
        &self.package
    }

    pub fn factory(&self) -> &DrawableFactory {
        &self.factory
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("lifecycle", &self.lifecycle)
            .field("coordinator", &self.coordinator)
            .field("package", &self.package.display_name())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(HostContext: Send, Sync);
