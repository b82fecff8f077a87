//! Font descriptor for text rendering.

/// Font configuration for text rendering.
///
/// Describes which font to use, including family name, weight, and style.
/// The size travels separately because text tools adjust it live.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Monospace", "Arial")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light" or numeric 100-900)
    pub weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    pub style: String,
}

impl FontDescriptor {
    /// Creates a new font descriptor with the specified parameters.
    pub fn new(family: String, weight: String, style: String) -> Self {
        Self {
            family,
            weight,
            style,
        }
    }

    /// Regular-weight upright font of the given family.
    pub fn regular(family: &str) -> Self {
        Self::new(family.to_string(), "normal".to_string(), "normal".to_string())
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family Style Weight Size"
    /// Example: "Sans Bold 32" or "Monospace Italic 24"
    pub fn to_pango_string(&self, size: f64) -> String {
        let mut parts = vec![self.family.clone()];

        if self.style.to_lowercase() != "normal" {
            parts.push(capitalize_first(&self.style));
        }

        if self.weight.to_lowercase() != "normal" {
            parts.push(capitalize_first(&self.weight));
        }

        // Pango sizes in points; annotation sizes are pixels, hence "px"
        parts.push(format!("{}px", size.round() as i32));

        parts.join(" ")
    }

    /// Builds the Pango description for this font at `size` pixels.
    pub fn to_pango(&self, size: f64) -> pango::FontDescription {
        pango::FontDescription::from_string(&self.to_pango_string(size))
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::regular("Sans")
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
