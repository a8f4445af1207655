//! String-level path helpers shared by the transforms.
//!
//! All paths handled here are forward-slash-normalized strings; the
//! transforms never consult the filesystem, so these helpers are purely
//! lexical.

/// Collapse runs of `/` and `\` separators into single forward slashes.
pub fn normalize_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;
    for ch in path.chars() {
        if ch == '/' || ch == '\\' {
            if !prev_sep {
                out.push('/');
            }
            prev_sep = true;
        } else {
            out.push(ch);
            prev_sep = false;
        }
    }
    out
}

/// The file name portion of a path.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Strip the extension (if any) from the final path segment.
pub fn strip_extension(path: &str) -> &str {
    match base_name(path).rfind('.') {
        Some(dot) => &path[..path.len() - (base_name(path).len() - dot)],
        None => path,
    }
}

/// The exported symbol name a module file stands for: its base name minus
/// the extension. The emitter produces one file per exported symbol, so
/// this is the module's default-export identifier.
pub fn symbol_name(path: &str) -> &str {
    let base = base_name(path);
    match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base,
    }
}

/// The directory portion of a path (everything before the final segment).
pub fn dir_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Compute the relative path from `from_dir` to `to`.
///
/// Both arguments must be normalized absolute paths. The result uses `../`
/// segments to climb out of `from_dir` and never starts with `./`.
pub fn relative_path(from_dir: &str, to: &str) -> String {
    let from_parts: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = String::new();
    for _ in common..from_parts.len() {
        out.push_str("../");
    }
    out.push_str(&to_parts[common..].join("/"));
    if out.ends_with('/') {
        out.pop();
    }
    out
}
