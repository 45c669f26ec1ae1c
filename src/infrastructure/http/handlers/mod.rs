//! HTTP Handlers

mod audio;
mod jobs;
mod ping;
mod queue;
mod voices;

pub use audio::*;
pub use jobs::*;
pub use ping::*;
pub use queue::*;
pub use voices::*;
