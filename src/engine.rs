//! Host-facing facade bundling the editor root, input session and frame
//! scheduler.

use crate::error::StoreError;
use crate::export::{self, ExportFormat};
use crate::helper::{DrawingHelper, Notice};
use crate::persist::{self, KeyValueStore};
use crate::render::Surface;
use crate::scheduler::FrameScheduler;
use crate::session::Session;
use crate::types::{Point, Tool};

#[derive(Debug, Clone, Default)]
pub struct Editor {
    pub helper: DrawingHelper,
    pub session: Session,
    pub scheduler: FrameScheduler,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.session.set_tool(tool);
    }

    pub fn tool(&self) -> Tool {
        self.session.tool
    }

    pub fn pointer_moved(&mut self, pos: Point) {
        self.session.pointer_moved(pos);
    }

    pub fn pointer_down(&mut self) -> Option<Notice> {
        self.helper.pointer_down(&self.session)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.helper.pointer_up(&self.session)
    }

    pub fn visibility_changed(&mut self, visible: bool) {
        self.scheduler.set_visible(visible);
    }

    /// One scheduler tick: finish any pending image decode, then run the
    /// update pass onto `surface`. Returns true if a frame was drawn.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> bool {
        if !self.scheduler.is_running() {
            return false;
        }
        self.helper.reference.complete_decode();
        let Self {
            helper,
            session,
            scheduler,
        } = self;
        scheduler.run_frame(|| helper.update(session, surface))
    }

    pub fn export(&self, format: ExportFormat) -> Result<String, serde_json::Error> {
        export::export(&self.helper, format)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        persist::save(store, &self.helper, &self.session)
    }

    pub fn load(&mut self, store: &dyn KeyValueStore) -> Result<bool, StoreError> {
        persist::load(store, &mut self.helper, &mut self.session)
    }

    pub fn load_str(&mut self, json: &str) -> Result<(), StoreError> {
        persist::load_str(json, &mut self.helper, &mut self.session)
    }
}
