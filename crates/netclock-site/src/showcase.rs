//! Feature showcase - the homepage's three-column highlight block

use std::fmt::Write;

use crate::layout::{escape, heading, render_page, PageMeta, Style};

/// Reference to an icon asset, resolved by whoever serves static files
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconRef(pub &'static str);

/// Trusted markup, emitted without escaping
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Markup(pub &'static str);

/// One highlighted feature
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureEntry {
    pub title: &'static str,
    pub icon: IconRef,
    pub description: Markup,
}

/// Homepage features, rendered left to right
pub const FEATURES: [FeatureEntry; 3] = [
    FeatureEntry {
        title: "左侧条目",
        icon: IconRef("img/undraw_docusaurus_mountain.svg"),
        description: Markup("这是最左边的内容。这个网页很好"),
    },
    FeatureEntry {
        title: "中间条目",
        icon: IconRef("img/undraw_docusaurus_tree.svg"),
        description: Markup(
            "Docusaurus lets you focus on your docs, and we&apos;ll do the chores. Go \
             ahead and move your docs into the <code>docs</code> directory.",
        ),
    },
    FeatureEntry {
        title: "右侧条目",
        icon: IconRef("img/undraw_docusaurus_react.svg"),
        description: Markup("右侧对对对"),
    },
];

const FEATURE_SVG: Style = Style(&[("height", "200px"), ("width", "200px")]);
const FEATURES_SECTION: Style = Style(&[
    ("display", "flex"),
    ("align-items", "center"),
    ("padding", "2rem 0"),
    ("width", "100%"),
]);

fn render_feature(entry: &FeatureEntry, out: &mut String) {
    out.push_str("<div class=\"col col--4\">\n");
    let _ = writeln!(
        out,
        "<div class=\"text--center\"><img class=\"featureSvg\" src=\"{}\" alt=\"\" role=\"img\"{}></div>",
        escape(entry.icon.0),
        FEATURE_SVG.attr()
    );
    out.push_str("<div class=\"text--center padding-horiz--md\">\n");
    out.push_str(&heading(3, entry.title, Style(&[])));
    let _ = write!(out, "\n<p>{}</p>\n", entry.description.0);
    out.push_str("</div>\n</div>\n");
}

/// Render entries as columns of one row, in list order
pub fn render_features(entries: &[FeatureEntry]) -> String {
    let mut out = format!("<section class=\"features\"{}>\n", FEATURES_SECTION.attr());
    out.push_str("<div class=\"container\">\n<div class=\"row\">\n");
    for entry in entries {
        render_feature(entry, &mut out);
    }
    out.push_str("</div>\n</div>\n</section>");
    out
}

/// The full homepage document
pub fn render_home_page() -> String {
    let meta = PageMeta::new("Home", "Network clock and documentation site");
    render_page(&meta, "", &render_features(&FEATURES))
}
