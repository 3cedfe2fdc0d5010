//! Prompt text and function-contract constants.
//!
//! Everything the model sees by name lives here: the classification
//! function contract, the classification prompts, and the organizer
//! assistant's system prompt.

/// Forced function name for the single-shot classification call.
pub const CLASSIFY_FUNCTION: &str = "classify_the_website";

/// Description published with the classification function.
pub const CLASSIFY_FUNCTION_DESCRIPTION: &str =
    "Automatically match the best folder path based on the website title and content";

/// Name of the folder-path parameter in the classification schema.
pub const FOLDER_PATH_PARAM: &str = "folder_path";

/// Description of the folder-path parameter.
pub const FOLDER_PATH_DESCRIPTION: &str = "Folder path separated by /";

/// Name of the optional suggested-title parameter.
pub const TITLE_PARAM: &str = "title";

/// Description of the suggested-title parameter.
pub const TITLE_DESCRIPTION: &str = "A concise, descriptive title for the bookmark";

/// System instruction for the classification call.
pub const CLASSIFY_SYSTEM_PROMPT: &str = "Please classify the website into the most \
appropriate folder path based on the title of the website, the website content, and \
the meaning of the folder name. The website content is more important than the title \
when determining the classification.";

/// User-message prefix preceding the page title.
pub const CLASSIFY_USER_PROMPT: &str = "The website title is:";

/// System instruction for the conversational organizing assistant.
pub const ORGANIZER_SYSTEM_PROMPT: &str = "You are a bookmark organizing assistant. \
You help the user tidy their bookmark collection using the provided tools: find \
duplicate bookmarks, move a bookmark into a folder path, rename a bookmark, delete \
a bookmark, and batch-edit several bookmarks at once. Folder paths are separated \
by `/` and missing folders are created automatically when moving. Always look up \
bookmark ids with your tools before modifying anything, prefer batch operations \
when changing several bookmarks, and confirm destructive actions in your reply so \
the user understands what changed. Answer in the user's language.";

/// Render the existing-folder-paths block appended to the classification
/// user message when new paths are allowed.
pub fn render_existing_paths(paths: &[String]) -> String {
    if paths.is_empty() {
        return String::new();
    }
    let list = paths
        .iter()
        .map(|path| format!("- {path}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Existing folder paths (prefer reusing one when it fits):\n{list}")
}
