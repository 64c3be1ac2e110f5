//! 域名名称处理
//!
//! Names handed to a [`RecordClient`](crate::RecordClient) are always relative to their
//! zone; the helpers here convert between the two forms.

/// Lowercase a domain name and drop the trailing root dot.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// 将完整域名转换为相对名称
///
/// - `"_acme-challenge.www.example.com"` + `"example.com"` -> `Some("_acme-challenge.www")`
/// - `"example.com"` + `"example.com"` -> `Some("")`
/// - `"example.org"` + `"example.com"` -> `None`
///
/// Both inputs are normalised first, so the comparison is case-insensitive.
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> Option<String> {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full == zone {
        Some(String::new())
    } else {
        full.strip_suffix(&format!(".{zone}")).map(str::to_string)
    }
}

/// 将相对名称转换为完整域名
///
/// - `"_acme-challenge"` + `"example.com"` -> `"_acme-challenge.example.com"`
/// - `""` or `"@"` + `"example.com"` -> `"example.com"`
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);

    if relative_name == "@" || relative_name.is_empty() {
        zone
    } else {
        format!("{relative_name}.{zone}")
    }
}
