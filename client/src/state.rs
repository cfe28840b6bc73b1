use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use pdfedit_shared::{AnnotationId, Editor, Point};

use crate::net::ApiClient;
use crate::pdfjs::PdfDocument;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Select,
    Text,
    Draw,
    Highlight,
}

impl Tool {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(Tool::Select),
            "text" => Some(Tool::Text),
            "draw" => Some(Tool::Draw),
            "highlight" => Some(Tool::Highlight),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Text => "text",
            Tool::Draw => "draw",
            Tool::Highlight => "highlight",
        }
    }

    pub fn cursor(self) -> &'static str {
        match self {
            Tool::Select => "default",
            Tool::Text => "text",
            Tool::Draw | Tool::Highlight => "crosshair",
        }
    }
}

/// Pointer interaction in progress on the annotation layer. Points are in
/// layer (screen) coordinates.
pub enum Gesture {
    Idle,
    Drawing { points: Vec<Point> },
    Highlighting { start: Point, current: Point },
    Dragging { id: AnnotationId, grab: Point },
}

/// The page canvas, the layer above it and the overlay canvas inside it.
#[derive(Clone)]
pub struct Surface {
    pub page_canvas: HtmlCanvasElement,
    pub layer: HtmlElement,
    pub overlay: HtmlCanvasElement,
    pub overlay_ctx: CanvasRenderingContext2d,
}

pub struct State {
    pub editor: Editor,
    pub api: ApiClient,
    pub file_id: String,
    pub file_name: String,
    pub document: Option<PdfDocument>,
    pub surface: Surface,
    pub tool: Tool,
    pub gesture: Gesture,
    pub selected: Option<AnnotationId>,
    pub color: String,
    pub font_size: f64,
    pub line_width: f64,
}

impl State {
    pub fn new(api: ApiClient, file_id: String, file_name: String, surface: Surface) -> Self {
        Self {
            editor: Editor::new(1),
            api,
            file_id,
            file_name,
            document: None,
            surface,
            tool: Tool::Select,
            gesture: Gesture::Idle,
            selected: None,
            color: pdfedit_shared::annotation::DEFAULT_COLOR.to_string(),
            font_size: pdfedit_shared::annotation::DEFAULT_FONT_SIZE,
            line_width: pdfedit_shared::annotation::DEFAULT_LINE_WIDTH,
        }
    }

    /// Name offered for the downloaded copy.
    pub fn download_name(&self) -> String {
        let name = if self.file_name.is_empty() {
            "document.pdf"
        } else {
            self.file_name.as_str()
        };
        format!("edited_{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_round_trip_through_data_attributes() {
        for tool in [Tool::Select, Tool::Text, Tool::Draw, Tool::Highlight] {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name("eraser"), None);
    }
}
