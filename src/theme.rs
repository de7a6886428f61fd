//! Typographic theme configuration. A theme is a font stack, a small named
//! palette, and a type scale; [`Theme::to_css`] renders the whole thing as
//! the site's base stylesheet, which [`crate::build`] writes into the static
//! output directory. Every field has a default, so a project without a
//! `theme.yaml` still gets a complete stylesheet.

use std::collections::BTreeMap;

use serde::Deserialize;

/// The site's typographic theme.
#[derive(Clone, Debug, Deserialize)]
pub struct Theme {
    /// The font stack applied to every scale entry, most specific first.
    #[serde(default = "Theme::default_fonts")]
    pub fonts: Vec<String>,

    /// Named colors, emitted as `--color-{name}` custom properties.
    #[serde(default = "Theme::default_palette")]
    pub palette: BTreeMap<String, String>,

    /// The type scale, one entry per selector group.
    #[serde(default = "Theme::default_scale")]
    pub scale: Vec<TypeStyle>,
}

/// One entry of the type scale.
#[derive(Clone, Debug, Deserialize)]
pub struct TypeStyle {
    /// The CSS selector group the entry applies to, e.g. `h1, .heading`.
    pub selector: String,

    /// Font size, e.g. `2.75rem`. Entries without a size only restate
    /// family and weight.
    #[serde(default)]
    pub size: Option<String>,

    pub weight: u16,

    #[serde(default = "TypeStyle::default_line_height")]
    pub line_height: String,
}

impl TypeStyle {
    fn default_line_height() -> String {
        "normal".to_owned()
    }

    fn new(selector: &str, size: Option<&str>, weight: u16) -> TypeStyle {
        TypeStyle {
            selector: selector.to_owned(),
            size: size.map(str::to_owned),
            weight,
            line_height: TypeStyle::default_line_height(),
        }
    }
}

impl Default for Theme {
    fn default() -> Theme {
        Theme {
            fonts: Theme::default_fonts(),
            palette: Theme::default_palette(),
            scale: Theme::default_scale(),
        }
    }
}

impl Theme {
    fn default_fonts() -> Vec<String> {
        vec!["Montserrat".to_owned(), "sans-serif".to_owned()]
    }

    fn default_palette() -> BTreeMap<String, String> {
        let mut palette = BTreeMap::new();
        palette.insert("accent".to_owned(), "#64e3a1".to_owned());
        palette.insert("secondary".to_owned(), "#3b4252".to_owned());
        palette.insert("main".to_owned(), "#1c1e26".to_owned());
        palette.insert("white".to_owned(), "#fafafa".to_owned());
        palette
    }

    fn default_scale() -> Vec<TypeStyle> {
        vec![
            TypeStyle::new("h1, .heading", Some("2.75rem"), 700),
            TypeStyle::new("h2, .heading2", Some("2.5rem"), 700),
            TypeStyle::new("h3, .subheading", Some("2rem"), 500),
            TypeStyle::new("h4, .subheading2", Some("1.75rem"), 500),
            TypeStyle::new("h5, .subheading3", Some("1.25rem"), 700),
            TypeStyle::new("p, .text-regular", Some("1rem"), 400),
            TypeStyle::new(".text-medium", None, 500),
            TypeStyle::new(".text-s", Some("0.75rem"), 500),
            TypeStyle::new(".text-xs", Some("0.625rem"), 500),
            TypeStyle::new("a, .link", Some("1rem"), 400),
        ]
    }

    /// Renders the theme as a base stylesheet: the palette as `:root`
    /// custom properties, one rule per scale entry, and the accent
    /// underline on link hover.
    pub fn to_css(&self) -> String {
        let family = self.fonts.join(", ");
        let mut css = String::new();

        css.push_str(":root {\n");
        for (name, value) in &self.palette {
            css.push_str(&format!("  --color-{}: {};\n", name, value));
        }
        css.push_str("}\n");

        for style in &self.scale {
            css.push_str(&format!("\n{} {{\n", style.selector));
            css.push_str(&format!("  font-family: {};\n", family));
            if let Some(size) = &style.size {
                css.push_str(&format!("  font-size: {};\n", size));
            }
            css.push_str("  font-style: normal;\n");
            css.push_str(&format!("  font-weight: {};\n", style.weight));
            css.push_str(&format!("  line-height: {};\n", style.line_height));
            css.push_str("}\n");
        }

        css.push_str(
            "\na:hover, .link:hover {\n  \
             text-decoration: underline;\n  \
             text-decoration-color: var(--color-accent);\n  \
             cursor: pointer;\n}\n",
        );

        css
    }
}
