use limebar_theme::Color;

/// One drawing step, in the order it must be executed.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Segment background.
    FillRect {
        x:      i32,
        y:      i32,
        width:  i32,
        height: i32,
        color:  Color,
    },
    /// Segment text, top-left at `(x, y)`, in `fonts[font]`.
    Text {
        x:     i32,
        y:     i32,
        font:  usize,
        text:  String,
        color: Color,
    },
    /// Horizontal stroke centred on row `y`.
    Underline {
        x:         i32,
        y:         i32,
        width:     i32,
        thickness: i32,
        color:     Color,
    },
    /// Separator text, always in font 0.
    Separator {
        x:     i32,
        y:     i32,
        text:  String,
        color: Color,
    },
}

/// Result of a layout pass for one surface size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    /// Surface size the plan was computed for.
    pub surface_width:  u32,
    pub surface_height: u32,
    /// Content width used for alignment.
    pub total_width:    i32,
    /// Where the first segment starts.
    pub start_x:        i32,
    pub commands:       Vec<DrawCommand>,
}
