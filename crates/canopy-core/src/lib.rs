//! Core systems for Canopy.
//!
//! This crate provides the pieces of the hosting layer that know nothing about
//! windows or drawing:
//!
//! - **Signals**: synchronous, thread-safe observer lists
//! - **Application lifecycle**: activation, suspend and background transitions,
//!   including deferrable background exits
//! - **Close negotiation**: the [`CloseAuthorization`] capability and its stock
//!   [`SystemNavigation`] implementation
//! - **Thread affinity**: debug checks for single-UI-thread objects
//! - **Logging**: `tracing` targets per subsystem
//!
//! # Example
//!
//! ```
//! use canopy_core::{AppLifecycle, BackgroundReason};
//!
//! let app = AppLifecycle::new();
//! app.entered_background().connect(|args| {
//!     println!("backgrounded: {:?}", args.reason);
//! });
//! app.raise_entered_background(BackgroundReason::Minimized);
//! ```

mod error;
pub mod lifecycle;
pub mod logging;
pub mod navigation;
pub mod signal;
pub mod thread_check;

pub use error::{CoreError, Result};
pub use lifecycle::{
    ActivationState, AppLifecycle, ApplicationState, BackgroundReason, Continuation, Deferral,
    EnteredBackgroundEventArgs, LeavingBackgroundEventArgs,
};
pub use navigation::{CloseAuthorization, CloseRequestedEventArgs, SystemNavigation};
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
