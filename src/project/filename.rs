use rand::Rng;

/// Maximum length of a sanitized file name
const MAX_NAME_LEN: usize = 100;

/// Sanitizes a string for use as a file or directory name
///
/// Spaces become underscores; every other character outside `[A-Za-z0-9_]` is
/// removed; the result is truncated to 100 characters. Path separators and
/// traversal sequences (`../`) cannot survive this, so a sanitized name can
/// never escape its parent directory.
///
/// # Examples
///
/// ```
/// use scrapkit::project::sanitize;
///
/// assert_eq!(sanitize("my project v2!"), "my_project_v2");
/// assert_eq!(sanitize("../../etc/passwd"), "etcpasswd");
/// ```
pub fn sanitize(name: &str) -> String {
    name.replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(MAX_NAME_LEN)
        .collect()
}

/// Sanitizes a name and appends a random numeric suffix for uniqueness
pub fn sanitize_unique(name: &str) -> String {
    format!("{}_{}", sanitize(name), random_id())
}

/// Generates a random integer id for unique identification
pub fn random_id() -> u64 {
    rand::thread_rng().gen_range(10_000..100_000_000_000_000)
}

/// Generates a random 20-character lowercase basename for temp files
pub fn random_basename() -> String {
    let mut rng = rand::thread_rng();
    (0..20).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}
