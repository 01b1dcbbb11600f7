//! Page rendering.
//!
//! A [`PageRenderer`] owns the parsed page template. For each request it
//! inlines the image as a `data:` URI, serializes the box list and fills the
//! placeholders below:
//!
//! | Placeholder    | Value                                   |
//! |----------------|-----------------------------------------|
//! | `idx`          | zero-based index (already wrapped)      |
//! | `display_idx`  | `idx + 1`                               |
//! | `total`        | number of gallery entries               |
//! | `img_data_uri` | JPEG `data:` URI of the image           |
//! | `int_list`     | box list as a JSON array of 5-arrays    |
//! | `next_idx`     | index of the next entry (wraps)         |
//! | `prev_idx`     | index of the previous entry (wraps)     |

mod data_uri;
mod error;
mod template;

use std::collections::HashMap;
use std::path::Path;

use crate::gallery::GalleryStore;

pub use data_uri::encode_data_uri;
pub use error::RenderError;
pub use template::{Template, TemplateSyntax};

/// Every placeholder name a page template may use.
pub const PLACEHOLDERS: [&str; 7] = [
    "idx",
    "display_idx",
    "total",
    "img_data_uri",
    "int_list",
    "next_idx",
    "prev_idx",
];

/// Values substituted into one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub idx: usize,
    pub total: usize,
    pub img_data_uri: String,
    pub int_list: String,
    pub next_idx: usize,
    pub prev_idx: usize,
}

impl PageContext {
    fn values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("idx", self.idx.to_string()),
            ("display_idx", (self.idx + 1).to_string()),
            ("total", self.total.to_string()),
            ("img_data_uri", self.img_data_uri.clone()),
            ("int_list", self.int_list.clone()),
            ("next_idx", self.next_idx.to_string()),
            ("prev_idx", self.prev_idx.to_string()),
        ])
    }
}

/// Renders gallery pages from a validated template.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    template: Template,
}

impl PageRenderer {
    /// Wrap a parsed template, rejecting unknown placeholders up front.
    pub fn new(template: Template) -> Result<Self, RenderError> {
        template.validate(&PLACEHOLDERS)?;
        Ok(Self { template })
    }

    /// Load, parse and validate a template file.
    pub fn load(path: &Path, syntax: TemplateSyntax) -> Result<Self, RenderError> {
        let renderer = Self::new(Template::load(path, syntax)?)?;
        log::info!("Loaded page template {:?} ({:?} syntax)", path, syntax);
        Ok(renderer)
    }

    /// Build the context for `idx` and render it.
    pub fn render(&self, store: &GalleryStore, idx: i64) -> Result<String, RenderError> {
        let resolved = store.resolve(idx);
        let entry = store.get(idx);
        let (prev_idx, next_idx) = store.neighbors(idx);

        let context = PageContext {
            idx: resolved,
            total: store.len(),
            img_data_uri: encode_data_uri(&entry.image)?,
            int_list: serde_json::to_string(&entry.boxes)?,
            next_idx,
            prev_idx,
        };

        log::debug!(
            "Rendering page {} of {} ({} boxes)",
            resolved + 1,
            store.len(),
            entry.boxes.len()
        );
        self.render_context(&context)
    }

    /// Substitute an already-built context.
    pub fn render_context(&self, context: &PageContext) -> Result<String, RenderError> {
        self.template.render(&context.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use image::{Rgb, RgbImage};

    use crate::model::BoundingBox;

    fn context() -> PageContext {
        PageContext {
            idx: 1,
            total: 2,
            img_data_uri: "data:image/jpeg;base64,AAAA".to_string(),
            int_list: r#"[[1,2,3,4,"other"]]"#.to_string(),
            next_idx: 0,
            prev_idx: 0,
        }
    }

    #[test]
    fn test_unknown_placeholder_rejected_at_load() {
        let template = Template::parse("${idx} ${title}", TemplateSyntax::Dollar).unwrap();
        assert!(matches!(
            PageRenderer::new(template),
            Err(RenderError::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn test_all_placeholders() {
        let source = PLACEHOLDERS
            .iter()
            .map(|p| format!("${{{p}}}"))
            .collect::<Vec<_>>()
            .join("|");
        let renderer =
            PageRenderer::new(Template::parse(&source, TemplateSyntax::Dollar).unwrap()).unwrap();

        assert_eq!(
            renderer.render_context(&context()).unwrap(),
            r#"1|2|2|data:image/jpeg;base64,AAAA|[[1,2,3,4,"other"]]|0|0"#
        );
    }

    #[test]
    fn test_legacy_template_with_css() {
        let source = "<style>body {{ color: red; }}</style><a href=\"/?idx={next_idx}\">{display_idx}/{total}</a>";
        let renderer =
            PageRenderer::new(Template::parse(source, TemplateSyntax::Brace).unwrap()).unwrap();

        assert_eq!(
            renderer.render_context(&context()).unwrap(),
            "<style>body { color: red; }</style><a href=\"/?idx=0\">2/2</a>"
        );
    }

    #[test]
    fn test_render_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("a.png");
        RgbImage::from_pixel(4, 4, Rgb([0, 128, 255])).save(&image).unwrap();

        let store = GalleryStore::new(
            vec![image.clone(), PathBuf::from(&image)],
            vec![vec![BoundingBox::new(1, 2, 3, 4, "plasmocyte")], Vec::new()],
        )
        .unwrap();
        let renderer = PageRenderer::new(
            Template::parse(
                "${idx};${prev_idx};${next_idx};${int_list};${img_data_uri}",
                TemplateSyntax::Dollar,
            )
            .unwrap(),
        )
        .unwrap();

        let html = renderer.render(&store, -2).unwrap();
        assert!(html.starts_with(r#"0;1;1;[[1,2,3,4,"plasmocyte"]];data:image/jpeg;base64,"#));

        let html = renderer.render(&store, 3).unwrap();
        assert!(html.starts_with("1;0;0;[];"));
    }
}
