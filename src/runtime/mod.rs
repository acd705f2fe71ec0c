/// Hover-preview runtime
///
/// This module handles one page session over a built manifest:
/// - Display capabilities and the grid renderer (surface.rs)
/// - Throttled pointer sampling and hit-testing (sampler.rs)
/// - Per-cell metadata cache (cache.rs)
/// - Latest-request-wins guard for async results (latest.rs)
/// - The hover state machine (hover.rs)
/// - Metadata fetching (source.rs)
/// - The async session driver (session.rs)

pub mod cache;
pub mod hover;
pub mod latest;
pub mod sampler;
pub mod session;
pub mod source;
pub mod surface;
