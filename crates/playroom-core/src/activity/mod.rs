//! Activity contract
//!
//! An activity is one self-contained interactive screen. It moves between
//! two states, unmounted and mounted, any number of times:
//!
//! ```text
//! Unmounted --mount--> Mounted --unmount--> Unmounted
//!                        |  ^
//!                        +--+ mount again (implicit unmount first)
//! ```
//!
//! Implementors embed a [`Lifecycle`] and provide [`Activity::build`]. The
//! provided `mount`/`unmount` take care of the mount flag, the resource
//! scope and the surface. Everything a build schedules must go through
//! [`Stage::scope`], and callbacks check [`Stage::is_mounted`] before
//! touching the surface or the services.

mod context;
mod manifest;

use std::rc::Rc;

use tracing::debug;

use crate::error::ActivityError;
use crate::host::Surface;

pub use context::{ActivityContext, Lifecycle, MountFlag, Stage};
pub use manifest::ActivityManifest;

/// Interface every activity implements
pub trait Activity {
    /// Static metadata
    fn manifest(&self) -> &'static ActivityManifest;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Build the presentation and acquire resources for a fresh mount.
    ///
    /// The surface is already empty and the mount flag raised. On error the
    /// caller unmounts, releasing whatever was acquired.
    fn build(&mut self, stage: &Stage) -> Result<(), ActivityError>;

    /// Drop per-mount state after resources have been released
    fn teardown(&mut self) {}

    /// Called when the page is hidden
    fn pause(&mut self) {}

    /// Called when the page is visible again
    fn resume(&mut self) {}

    /// Identifier from the manifest
    fn id(&self) -> &'static str {
        self.manifest().id
    }

    fn is_mounted(&self) -> bool {
        self.lifecycle().is_mounted()
    }

    /// Mount into `surface`, unmounting first if already mounted
    fn mount(&mut self, surface: Rc<dyn Surface>) -> Result<(), ActivityError> {
        if self.lifecycle().stage().is_some() {
            debug!(activity = self.id(), "remount, releasing previous generation");
            self.unmount();
        }
        let stage = self.lifecycle_mut().begin(surface);
        debug!(activity = self.id(), generation = stage.generation(), "mount");
        self.build(&stage)
    }

    /// Lower the mount flag, release every resource and clear the surface.
    /// Does nothing when not mounted.
    fn unmount(&mut self) {
        if self.lifecycle_mut().end() {
            debug!(activity = self.id(), "unmount");
            self.teardown();
        }
    }
}
