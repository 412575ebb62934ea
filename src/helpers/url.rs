//! URL and path helper functions

/// Join a base location and a relative path with exactly one `/` between them
///
/// # Examples
/// ```ignore
/// join_url("http://localhost:8000/", "/blogs/en/a.md") // -> "http://localhost:8000/blogs/en/a.md"
/// ```
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if base.is_empty() {
        path.to_string()
    } else if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Markdown source location: `<base>/<language>/<slug>.md`
pub fn markdown_path(base: &str, language: &str, slug: &str) -> String {
    join_url(base, &format!("{}/{}.md", language, slug))
}

/// Rendered page location: `<base>/<slug>_<language>.html`
pub fn html_path(base: &str, language: &str, slug: &str) -> String {
    join_url(base, &format!("{}_{}.html", slug, language))
}

/// File stem of the last path segment, e.g. `blogs/en/250415.md` -> `250415`
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}
