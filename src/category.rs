//! Tool-name to category classification.
//!
//! The category is opaque context data for the governance service; it only
//! has to be stable, not clever. Exact table lookup first, then a keyword
//! scan for tools that embed a known name ("my_grep_tool"), then `"other"`.

/// Known tool names and the category each maps to. Scanned in order.
const CATEGORY_MAP: &[(&str, &str)] = &[
    // Bash / shell
    ("bash", "bash"),
    ("shell", "bash"),
    ("exec", "bash"),
    ("terminal", "bash"),
    ("run_terminal_cmd", "bash"),
    ("run_command", "bash"),
    // Filesystem
    ("read", "filesystem"),
    ("write", "filesystem"),
    ("edit", "filesystem"),
    ("list_dir", "filesystem"),
    ("glob", "filesystem"),
    ("grep", "filesystem"),
    ("file_search", "filesystem"),
    ("multi_edit", "filesystem"),
    ("str_replace_editor", "filesystem"),
    ("str_replace", "filesystem"),
    ("view_file", "filesystem"),
    ("create_file", "filesystem"),
    ("delete_file", "filesystem"),
    ("search_files", "filesystem"),
    // Browser / computer
    ("browser", "browser"),
    ("browser_navigate", "browser"),
    ("browser_click", "browser"),
    ("browser_type", "browser"),
    ("browser_snapshot", "browser"),
    ("browser_fill", "browser"),
    ("browser_scroll", "browser"),
    ("computer", "browser"),
    ("computer_use", "browser"),
    // Network
    ("web_fetch", "network"),
    ("web_search", "network"),
    ("http", "network"),
    ("curl", "network"),
    ("mcp", "network"),
    // Canvas / notebook
    ("canvas", "canvas"),
    ("notebook", "canvas"),
];

/// Category assigned to tools no table entry matches.
pub const OTHER_CATEGORY: &str = "other";

/// Classify a tool name into its governance category.
#[must_use]
pub fn resolve(tool_name: &str) -> &'static str {
    let normalized = normalize(tool_name);
    for (key, category) in CATEGORY_MAP {
        if *key == normalized {
            return category;
        }
    }
    for (key, category) in CATEGORY_MAP {
        if normalized.contains(key) {
            return category;
        }
    }
    OTHER_CATEGORY
}

/// Lowercase and collapse separators so "Run Terminal-Cmd" matches
/// "run_terminal_cmd".
fn normalize(tool_name: &str) -> String {
    tool_name
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}
