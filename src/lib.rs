//! # curve-tracer
//!
//! Editing core for a Bezier curve tracing tool.
//!
//! ## Features
//!
//! - **Curve groups**: named paths of points joined by cubic Bezier segments
//! - **Tool modes**: pointer input adds points or drags points, control
//!   handles, the origin point or the reference image, depending on the tool
//! - **Reference image**: a movable, scalable overlay to trace over
//! - **Export**: SVG path data, plus JSON in relative or angle/distance form
//! - **Persistence**: whole-editor snapshots in a key-value store
//!
//! ## Example
//!
//! ```rust,ignore
//! use curve_tracer::{Editor, ExportFormat, Point, Tool};
//!
//! let mut editor = Editor::new();
//! let id = editor.helper.new_group();
//! editor.helper.set_active_group(&id);
//! editor.set_tool(Tool::AddPoints);
//! for p in [Point::new(10.0, 10.0), Point::new(100.0, 40.0)] {
//!     editor.pointer_moved(p);
//!     editor.pointer_down();
//!     editor.pointer_up();
//! }
//! let svg = editor.export(ExportFormat::Svg).unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod export;
pub mod group;
pub mod helper;
pub mod persist;
pub mod reference;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod types;

// Re-export commonly used items
pub use engine::Editor;
pub use error::{ImageError, RenderError, StoreError};
pub use export::ExportFormat;
pub use group::CurveGroup;
pub use helper::{DragTarget, DrawingHelper, Notice};
pub use persist::{FileStore, KeyValueStore, MemoryStore, STORAGE_KEY, Snapshot};
pub use reference::ReferenceImage;
pub use render::{DrawCommand, DrawList, Surface};
pub use session::Session;
pub use settings::{SettingUpdate, Settings};
pub use types::{ControlHandle, Endpoint, Point, Rect, Tool};
