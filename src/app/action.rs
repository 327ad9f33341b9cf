use askbox::ask::SafeAsked;

use crate::app::dialogs::Dismissal;

#[derive(Debug)]
pub enum Action {
    /// Ask the confirm dialog whether to delete a repository.
    ConfirmDelete { repository: String },
    /// Ask for the repository name to be typed back before deleting.
    TypeToDelete { repository: String },
    /// Await the rename widget's locally held question.
    AwaitRename {
        repository: String,
        key: u64,
        answer: SafeAsked<String, Dismissal>,
    },
    Quit,
}
