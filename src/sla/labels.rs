//! Typed view of the string-prefixed labels the SLA workflow relies on.

pub const SEVERITY_PREFIX: &str = "SEV-";
pub const FIX_TIMELINE_PREFIX: &str = "Fix timeline:";
pub const RELEASED_LABEL: &str = "Released";
const TRIAGED_DATE_PREFIX: &str = "triaged date:";
const RELEASE_PREFIX: &str = "release:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPlatform {
    Mobile,
    Extension,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelKind<'a> {
    /// `SEV-<n>`; carries the full label name, which is the policy key.
    Severity(&'a str),
    /// `Triaged date:<iso>`; the raw value after the first ':'.
    TriageDate(&'a str),
    /// `Release:<version>`; the trimmed, non-empty version.
    ReleaseVersion(&'a str),
    /// `Fix timeline: <text>`; the trimmed text.
    FixTimeline(&'a str),
    Released,
    Target(TargetPlatform),
    Unknown,
}

/// Classify a label name.
///
/// `SEV-` and `Fix timeline:` are case-sensitive; the release, triage and
/// target labels are matched case-insensitively.
pub fn parse_label(name: &str) -> LabelKind<'_> {
    if name.starts_with(SEVERITY_PREFIX) {
        return LabelKind::Severity(name);
    }
    if let Some(text) = name.strip_prefix(FIX_TIMELINE_PREFIX) {
        return LabelKind::FixTimeline(text.trim());
    }

    let lower = name.to_lowercase();
    match lower.as_str() {
        "released" => LabelKind::Released,
        "mobile" => LabelKind::Target(TargetPlatform::Mobile),
        "extension" => LabelKind::Target(TargetPlatform::Extension),
        _ if lower.starts_with(TRIAGED_DATE_PREFIX) || lower.starts_with(RELEASE_PREFIX) => {
            // Both prefixes are ASCII, so the ':' position in `name` matches `lower`.
            let value = name.split_once(':').map_or("", |(_, v)| v);
            if lower.starts_with(RELEASE_PREFIX) {
                match value.trim() {
                    "" => LabelKind::Unknown,
                    version => LabelKind::ReleaseVersion(version),
                }
            } else {
                LabelKind::TriageDate(value)
            }
        }
        _ => LabelKind::Unknown,
    }
}

/// Full label name for a fix-timeline text, e.g. `Fix timeline: 3 weeks`.
pub fn fix_timeline_label(text: &str) -> String {
    format!("{FIX_TIMELINE_PREFIX} {text}")
}
