//! HTML rendering of an `InspectedRequest`.
//!
//! Every value that came from the request is escaped before it is written into
//! markup; the static shell is the only unescaped text in the page.

use crate::request::InspectedRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show body decoding and read errors under the body section.
    pub display_errors: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            display_errors: true,
        }
    }
}

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Request Information</title>
    <style>
        table {
            border-collapse: collapse;
            width: 100%;
        }

        th, td {
            padding: 8px;
            text-align: left;
            border-bottom: 1px solid #ddd;
        }

        th {
            background-color: #f2f2f2;
        }

        .error {
            color: #b00020;
        }
    </style>
</head>
<body>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Render the full page for one request.
pub fn render(req: &InspectedRequest, opts: &RenderOptions) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(HEAD);

    html.push_str("    <h2>Request Information</h2>\n\n");
    html.push_str("    <table>\n");
    html.push_str("        <tr>\n");
    html.push_str("            <th>Method</th>\n");
    html.push_str("            <th>IP Address</th>\n");
    html.push_str("            <th>Start Line</th>\n");
    html.push_str("        </tr>\n");
    html.push_str("        <tr>\n");
    for cell in [req.method(), req.remote_addr(), req.request_line()] {
        html.push_str(&format!("            <td>{}</td>\n", escape(cell)));
    }
    html.push_str("        </tr>\n");
    html.push_str("    </table>\n\n");

    html.push_str("    <h3>Headers</h3>\n\n");
    html.push_str("    <table>\n");
    html.push_str("        <tr>\n");
    html.push_str("            <th>Header</th>\n");
    html.push_str("            <th>Value</th>\n");
    html.push_str("        </tr>\n");
    for (name, value) in req.headers() {
        html.push_str(&format!(
            "        <tr><td>{}</td><td>{}</td></tr>\n",
            escape(name),
            escape(value)
        ));
    }
    html.push_str("    </table>\n");

    if let Some(body) = req.body() {
        html.push_str("\n    <h3>Body</h3>\n\n");
        html.push_str(&format!("    <pre>{}</pre>\n", escape(&body.display())));
        if opts.display_errors {
            if let Some(err) = req.body_error() {
                html.push_str(&format!(
                    "    <p class=\"error\">{}</p>\n",
                    escape(&err.to_string())
                ));
            }
        }
    }

    html.push_str(TAIL);
    html
}

/// Escape text for use inside element content or quoted attributes.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
