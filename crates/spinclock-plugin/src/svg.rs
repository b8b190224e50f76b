//! SVG clock face template and image payload encoding.
//!
//! The face is a 144x144 black square with the two-digit hour drawn large
//! and bold in the instance's colour, rotated about the centre by the
//! minute angle. The host accepts images as `data:` URLs, so the rendered
//! SVG is base64 encoded into one.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use minijinja::{Environment, context};
use spinclock_core::face::ClockFace;

use crate::error::PluginError;

/// Template name; the `.svg` suffix keeps minijinja from HTML-escaping.
const FACE_TEMPLATE_NAME: &str = "face.svg";

const FACE_TEMPLATE: &str = r#"<svg width="144" height="144" xmlns="http://www.w3.org/2000/svg">
  <rect width="144" height="144" fill="black"/>
  <text x="72" y="108"
        font-family="Arial, sans-serif"
        font-size="96"
        font-weight="bold"
        fill="{{ colour }}"
        text-anchor="middle"
        dominant-baseline="central"
        transform="rotate({{ rotation }}, 72, 72)">
    {{ hour }}
  </text>
</svg>"#;

const DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// Compiled clock face template.
pub struct FaceTemplate {
    env: Environment<'static>,
}

impl FaceTemplate {
    /// Compile the built-in face template.
    pub fn new() -> Result<Self, PluginError> {
        let mut env = Environment::new();
        env.add_template(FACE_TEMPLATE_NAME, FACE_TEMPLATE)
            .map_err(|e| PluginError::Template(format!("failed to add face template: {e}")))?;
        Ok(Self { env })
    }

    /// Render `face` to SVG markup.
    pub fn render(&self, face: &ClockFace) -> Result<String, minijinja::Error> {
        self.env.get_template(FACE_TEMPLATE_NAME)?.render(context! {
            colour => face.colour,
            rotation => face.rotation,
            hour => face.label(),
        })
    }
}

impl std::fmt::Debug for FaceTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceTemplate")
            .field("name", &FACE_TEMPLATE_NAME)
            .finish()
    }
}

/// Wrap SVG markup in a base64 `data:` URL.
pub fn svg_data_url(svg: &str) -> String {
    let mut url = String::from(DATA_URL_PREFIX);
    STANDARD.encode_string(svg, &mut url);
    url
}
