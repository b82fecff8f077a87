//! Annotation tool names.

use std::fmt;
use std::str::FromStr;

/// Built-in annotation tools, addressed by name from the host toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Rectangle,
    Ellipse,
    StraightLine,
    FreeCurve,
    MarkerPen,
    Number,
    Arrow,
    Eraser,
    Mosaic,
    GaussianBlur,
    Text,
}

impl ToolName {
    pub const ALL: [ToolName; 11] = [
        ToolName::Rectangle,
        ToolName::Ellipse,
        ToolName::StraightLine,
        ToolName::FreeCurve,
        ToolName::MarkerPen,
        ToolName::Number,
        ToolName::Arrow,
        ToolName::Eraser,
        ToolName::Mosaic,
        ToolName::GaussianBlur,
        ToolName::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::Rectangle => "RectangleTool",
            ToolName::Ellipse => "EllipseTool",
            ToolName::StraightLine => "StraightLineTool",
            ToolName::FreeCurve => "FreeCurveTool",
            ToolName::MarkerPen => "MarkerPenTool",
            ToolName::Number => "NumberTool",
            ToolName::Arrow => "ArrowTool",
            ToolName::Eraser => "EraserTool",
            ToolName::Mosaic => "MosaicTool",
            ToolName::GaussianBlur => "GaussianBlurTool",
            ToolName::Text => "TextTool",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in ToolName::ALL {
            assert_eq!(name.to_string().parse::<ToolName>(), Ok(name));
        }
    }

    #[test]
    fn unknown_name_is_returned() {
        assert_eq!("LassoTool".parse::<ToolName>(), Err("LassoTool".to_string()));
    }
}
