//! Server-rendered pages: homepage, tool shells, and the 404 page.
//!
//! Every tool is a client-side application; the server only renders a shell
//! document that mounts the tool's script and stylesheet from /static. The
//! registry below drives both the homepage listing and the per-tool pages.

/// One browser tool hosted by the toolbox.
#[derive(Debug, Clone, Copy)]
pub struct Tool {
    /// URL slug under /tools/
    pub slug: &'static str,

    /// Display name
    pub title: &'static str,

    /// One-line description shown on the homepage
    pub tagline: &'static str,
}

/// Every tool the toolbox serves.
pub const TOOLS: &[Tool] = &[
    Tool {
        slug: "images",
        title: "Image Optimizer",
        tagline: "Resize, convert and compress images.",
    },
    Tool {
        slug: "usernames",
        title: "Username Checker",
        tagline: "Check username availability across platforms.",
    },
    Tool {
        slug: "webcams",
        title: "Webcam Tester",
        tagline: "Preview your camera without installing anything.",
    },
    Tool {
        slug: "resolution",
        title: "Resolution Inspector",
        tagline: "Inspect your screen and viewport dimensions.",
    },
    Tool {
        slug: "keyboard",
        title: "Keyboard Tester",
        tagline: "See every event your keyboard produces.",
    },
];

/// Look up a tool by its URL slug.
pub fn find_tool(slug: &str) -> Option<&'static Tool> {
    TOOLS.iter().find(|tool| tool.slug == slug)
}

/// Escape HTML special characters to prevent XSS attacks.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Shared document shell around every page body.
fn render_layout(title: &str, head_extra: &str, body: &str) -> String {
    let escaped_title = html_escape(title);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{escaped_title} - Web Toolbox</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            background: #0f0f0f;
            color: #e5e5e5;
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            line-height: 1.5;
            min-height: 100vh;
        }}
        main {{
            max-width: 720px;
            margin: 0 auto;
            padding: 48px 16px;
        }}
        a {{
            color: #818cf8;
            text-decoration: none;
        }}
        a:hover {{
            text-decoration: underline;
        }}
        footer {{
            max-width: 720px;
            margin: 0 auto;
            padding: 16px;
            color: rgba(255, 255, 255, 0.4);
            font-size: 12px;
        }}
    </style>
    {head_extra}
</head>
<body>
    <main>
{body}
    </main>
    <footer>No logging, no ads, just solutions.</footer>
</body>
</html>"##
    )
}

/// Render the homepage listing every registered tool.
pub fn render_homepage() -> String {
    let cards: Vec<String> = TOOLS
        .iter()
        .map(|tool| {
            format!(
                r#"        <li class="card">
            <a href="/tools/{slug}"><h2>{title}</h2></a>
            <p>{tagline}</p>
        </li>"#,
                slug = tool.slug,
                title = html_escape(tool.title),
                tagline = html_escape(tool.tagline),
            )
        })
        .collect();

    let head_extra = r#"<style>
        .card {
            list-style: none;
            background: rgba(255, 255, 255, 0.04);
            border: 1px solid rgba(255, 255, 255, 0.1);
            border-radius: 8px;
            padding: 16px 20px;
            margin-bottom: 12px;
        }
        .card p {
            color: rgba(255, 255, 255, 0.7);
            font-size: 14px;
        }
    </style>"#;

    let body = format!(
        "        <h1>Web Toolbox</h1>\n        <p>A collection of tools. No logging, no ads, just solutions.</p>\n        <ul>\n{}\n        </ul>",
        cards.join("\n")
    );

    render_layout("Home", head_extra, &body)
}

/// Render the shell page for one tool.
///
/// The page is an empty mount point; the tool's own bundle (served from
/// /static) does the rest client-side.
pub fn render_tool_page(tool: &Tool) -> String {
    let head_extra = format!(
        r#"<link rel="stylesheet" href="/static/styles/tools/{slug}.css">
    <script type="module" src="/static/tools/{slug}/entry.js" defer></script>"#,
        slug = tool.slug,
    );

    let body = format!(
        r#"        <p><a href="/">&larr; Back to the toolbox</a></p>
        <h1>{title}</h1>
        <div id="root"></div>"#,
        title = html_escape(tool.title),
    );

    render_layout(tool.title, &head_extra, &body)
}

/// Render the 404 page.
pub fn render_not_found() -> String {
    let body = r#"        <h1>Not Found</h1>
        <p>Ooops! That page doesn't seem to exist.</p>
        <p><a href="/">&larr; Back to the toolbox</a></p>"#;

    render_layout("Not Found", "", body)
}

// =============================================================================
// Tests
// =============================================================================
