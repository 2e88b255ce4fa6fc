//! Sync orchestration
//!
//! Drives the native launcher and client through a small state machine and
//! runs the decode, diff and download pipeline once the client has written
//! its manifests.
//!
//! ```text
//! ResolvingVersion ─► LocatingLauncher ─► Launching(launcher) ─► PollingForManifest
//!                            │                                        │
//!                            └──────────► Launching(client) ◄─────────┘
//!                                               │
//!                                               ▼
//!                                           Syncing ─► Finalizing ─► Done
//! ```
//!
//! Any state may end in `Failed`.

mod orchestrator;
mod types;

pub use orchestrator::SyncOrchestrator;
pub use types::{
    IndexReport, LaunchTarget, SyncContext, SyncFailure, SyncOutcome, SyncReport, SyncState,
};
