use crate::types::{Point, Tool};

/// Input context shared by every handler and the update pass: the active
/// tool and the last known pointer position in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Session {
    pub tool: Tool,
    pub pointer: Point,
}

impl Session {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            pointer: Point::ZERO,
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            tracing::debug!("Tool switched: {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
    }

    pub fn pointer_moved(&mut self, pos: Point) {
        self.pointer = pos;
    }
}
