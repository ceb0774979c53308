//! Bot comment bodies posted in reply to commands

use crate::commands::cleanup::ClearReason;

pub const SELF_LGTM: &str =
    "***lgtm*** can not be added in your self-own pull request. :astonished:";

pub fn label_added(label: &str, by: &str) -> String {
    format!(
        "***{label}*** was added to this pull request by: ***{by}***. :wave: \n\
         **NOTE:** If this pull request is not merged while all conditions are met, \
         comment \"/check-pr\" to try again. :smile: "
    )
}

pub fn label_removed(label: &str, by: &str) -> String {
    format!("***{label}*** was removed in this pull request by: ***{by}***. :flushed: ")
}

pub fn review_thanks(commenter: &str) -> String {
    format!(
        "Thanks for your review, ***{commenter}***, your opinion is very important to us.:wave:\n\
         The maintainers will consider your advice carefully."
    )
}

pub fn no_permission(commenter: &str, action: &str, label: &str) -> String {
    format!(
        "\n***@{commenter}*** has no permission to {action} ***{label}*** label in this pull request. \
         :astonished:\nPlease contact to the collaborators in this repository."
    )
}

/// Asked for `wanted` while the opposite method label `existing` is attached
pub fn method_conflict(existing: &str, existing_command: &str, wanted_command: &str) -> String {
    format!(
        "Please use **/{existing_command} cancel** to remove **{existing}** label, \
         and try **/{wanted_command}** again"
    )
}

pub fn labels_cleared(reason: ClearReason, labels: &[String]) -> String {
    let labels = labels.join(", ");
    match reason {
        ClearReason::SourceUpdated => format!(
            "New code changes of pr are detected and remove these labels ***{labels}***. :flushed: "
        ),
        ClearReason::Reopened => {
            format!("When PR is reopened, remove these labels ***{labels}***. :flushed: ")
        }
    }
}
