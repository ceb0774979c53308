//! Label classification and the per-PR label set view
//!
//! Raw label strings from the forge are classified once into [`LabelKind`]
//! so the gating logic branches on variants instead of re-parsing names.

/// Label added by `/approve`
pub const APPROVED_LABEL: &str = "approved";

/// Review label literal, and prefix of per-reviewer review labels
pub const LGTM_LABEL: &str = "lgtm";

/// Prefix of merge-method labels (`merge/<method>`)
pub const MERGE_METHOD_PREFIX: &str = "merge/";

/// Label added by `/rebase`
pub const REBASE_LABEL: &str = "merge/rebase";

/// Label added by `/squash`
pub const SQUASH_LABEL: &str = "merge/squash";

/// Forges (gitee in particular) cap label names at 20 characters.
///
/// Per-reviewer labels are truncated to this length without collision
/// detection: two logins sharing the first 15 characters map to the same
/// label.
pub const LABEL_LEN_LIMIT: usize = 20;

/// Semantic category of a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelKind {
    /// The approval label
    Approval,
    /// A review label; `reviewer` is `None` for the bare `lgtm` literal
    Review {
        /// Reviewer suffix encoded in the label, if any
        reviewer: Option<String>,
    },
    /// A `merge/<method>` label carrying the method segment
    MergeMethod(String),
    /// Anything else (blocking, required-extra or cosmetic labels)
    Other,
}

impl LabelKind {
    /// Classify a raw label name
    pub fn classify(name: &str) -> Self {
        if name == APPROVED_LABEL {
            return Self::Approval;
        }
        if let Some(rest) = name.strip_prefix(LGTM_LABEL) {
            let reviewer = rest.trim_start_matches('-');
            return Self::Review {
                reviewer: (!reviewer.is_empty()).then(|| reviewer.to_string()),
            };
        }
        if let Some(method) = name.strip_prefix(MERGE_METHOD_PREFIX) {
            // Only the segment directly after the prefix names the method
            let method = method.split('/').next().unwrap_or_default();
            return Self::MergeMethod(method.to_string());
        }
        Self::Other
    }
}

/// A label attached to a PR together with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Raw label name as returned by the forge
    pub name: String,
    /// Classification computed on ingestion
    pub kind: LabelKind,
}

impl Label {
    /// Classify and wrap a label name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = LabelKind::classify(&name);
        Self { name, kind }
    }

    /// Whether this is a review label
    pub const fn is_review(&self) -> bool {
        matches!(self.kind, LabelKind::Review { .. })
    }
}

/// Deduplicated view of the labels currently on a PR
///
/// Keeps first-seen order so "first merge-method label" is deterministic.
/// The empty label never becomes a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// Build the set from raw forge labels
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<Label> = Vec::new();
        for name in raw {
            let name = name.as_ref();
            if name.is_empty() || labels.iter().any(|l| l.name == name) {
                continue;
            }
            labels.push(Label::new(name));
        }
        Self { labels }
    }

    /// Whether `name` is present
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// Every review label present (bare `lgtm` and `lgtm-<reviewer>` alike)
    pub fn review_labels(&self) -> Vec<&Label> {
        self.labels.iter().filter(|l| l.is_review()).collect()
    }

    /// First merge-method label, if any
    pub fn merge_method_label(&self) -> Option<&Label> {
        self.labels
            .iter()
            .find(|l| matches!(l.kind, LabelKind::MergeMethod(_)))
    }

    /// Iterate labels in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    /// Label names in first-seen order
    pub fn names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no labels are present
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Review label a reviewer receives for `/lgtm`
///
/// With a single required review the bare `lgtm` literal is used; otherwise
/// the reviewer's lowercased login is appended and the result truncated to
/// [`LABEL_LEN_LIMIT`] characters.
pub fn review_label_for(login: &str, required: u32) -> String {
    if required <= 1 {
        return LGTM_LABEL.to_string();
    }

    let label = format!("{LGTM_LABEL}-{}", login.to_lowercase());
    label.chars().take(LABEL_LEN_LIMIT).collect()
}
