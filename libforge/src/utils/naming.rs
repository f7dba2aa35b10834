//! Name conversions for output filenames and export symbols.
//!
//! Module names may contain `/` separators (e.g. `ngx/button`). The bundle
//! filename joins the parts with `__`, while the UMD export symbol camel-cases
//! each part and joins with `.`.

/// Converts a single name part to camelCase.
///
/// Splits on `-`, `_`, `.` and whitespace: `button-group` becomes
/// `buttonGroup`.
#[must_use]
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut capitalize_next = false;
    for ch in input.chars() {
        if matches!(ch, '-' | '_' | '.' | ' ') {
            capitalize_next = !out.is_empty();
        } else if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Derives the global export symbol for a module name.
///
/// `ngx/button-group` becomes `ngx.buttonGroup`.
#[must_use]
pub fn export_symbol(name: &str) -> String {
    name.split('/')
        .filter(|part| !part.is_empty())
        .map(camel_case)
        .collect::<Vec<_>>()
        .join(".")
}

/// Derives the output file stem for a module name.
///
/// `ngx/button` becomes `ngx__button`; the bundle stage appends `.umd.js`.
#[must_use]
pub fn file_stem(name: &str) -> String {
    name.split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("button"), "button");
        assert_eq!(camel_case("button-group"), "buttonGroup");
        assert_eq!(camel_case("my_lib"), "myLib");
        assert_eq!(camel_case("Widgets"), "widgets");
    }

    #[test]
    fn test_export_symbol() {
        assert_eq!(export_symbol("core"), "core");
        assert_eq!(export_symbol("ngx/button-group"), "ngx.buttonGroup");
        assert_eq!(export_symbol("/leading/slash"), "leading.slash");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("core"), "core");
        assert_eq!(file_stem("ngx/button"), "ngx__button");
        assert_eq!(file_stem("/a/b/"), "a__b");
    }
}
