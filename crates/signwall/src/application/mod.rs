//! Application layer of the signage wall.
//!
//! # What lives here? (for beginners)
//!
//! This layer sits between the pure allocation rules in `signwall_core` and the
//! adapters in `infrastructure`.  It decides *when* things happen (apply a
//! config, tick a surface, tear everything down) but never *how* a page is
//! drawn or *where* a config file lives.  Every outside capability reaches it
//! through a trait:
//!
//! | Trait                | Real adapter              | Test adapter          |
//! |----------------------|---------------------------|-----------------------|
//! | `DisplayBackend`     | `TracingBackend`          | `RecordingBackend`    |
//! | `SchedulerFactory`   | `IntervalSchedulerFactory`| `ManualSchedulerFactory` |
//! | `TopologyProvider`   | `StaticTopology`          | `MockTopology`        |
//! | `ConfigStore`        | `FileConfigStore`         | `MemoryConfigStore`   |
//!
//! # Sub-modules
//!
//! - **`scheduler`**    – the per-surface timer contract and the tick message.
//! - **`surface`**      – output surfaces, slots, and the renderer traits.
//! - **`controller`**   – builds and tears down surfaces on every apply.
//! - **`display_loop`** – the single task that owns the controller.
//! - **`settings`**     – draft editing and validation of user settings.

pub mod controller;
pub mod display_loop;
pub mod scheduler;
pub mod settings;
pub mod surface;
