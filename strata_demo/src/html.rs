// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-file HTML report of SVG snapshots.

use std::fmt::Write;

/// One titled snapshot.
#[derive(Clone, Debug)]
pub(crate) struct HtmlSection {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) svg: String,
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 24px; color: #222; }
section { margin-bottom: 32px; }
h2 { font-size: 16px; margin: 0 0 4px; }
p { font-size: 13px; color: #555; margin: 0 0 8px; }
.chart { display: inline-block; border: 1px solid #eee; }
";

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let title = escape_html(title);
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );
    for section in sections {
        let _ = write!(
            out,
            "<section>\n<h2>{}</h2>\n<p>{}</p>\n<div class=\"chart\">\n{}</div>\n</section>\n",
            escape_html(&section.title),
            escape_html(&section.description),
            section.svg
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
