use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `REALTY_QUIET=1` silences the decorative CLI output (banners, success
/// lines); data output and errors are still printed.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("REALTY_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
