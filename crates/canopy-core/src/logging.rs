//! Logging facilities for Canopy.
//!
//! Canopy uses the `tracing` crate for instrumentation. To see logs, install a
//! tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // ...
//! }
//! ```
//!
//! Every subsystem logs under its own target so hosts can filter, e.g.
//! `RUST_LOG=canopy::window=debug`.

/// Span names used throughout Canopy for tracing.
pub mod span_names {
    /// Native event dispatch span.
    pub const NATIVE_EVENT: &str = "canopy::native_event";
    /// Paint resolution span.
    pub const PAINT: &str = "canopy::paint";
    /// Content root layout span.
    pub const ARRANGE: &str = "canopy::arrange";
}

/// Target names for log filtering.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "canopy_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "canopy_core::signal";
    /// Application lifecycle target.
    pub const LIFECYCLE: &str = "canopy_core::lifecycle";
    /// Close negotiation target.
    pub const NAVIGATION: &str = "canopy_core::navigation";
    /// Paint and drawable resolution target.
    pub const RENDER: &str = "canopy_render";
    /// Content root and coordinator target.
    pub const CONTENT_ROOT: &str = "canopy::content_root";
    /// Native window adapter target.
    pub const WINDOW: &str = "canopy::window";
    /// Icon resolution target.
    pub const ICON: &str = "canopy::window::icon";
}
