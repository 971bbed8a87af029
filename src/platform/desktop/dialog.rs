use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

/// Blocking yes/no prompt. Returns `true` only on an explicit "Yes".
pub fn confirm(title: &str, description: &str) -> bool {
    let answer = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show();
    answer == MessageDialogResult::Yes
}
