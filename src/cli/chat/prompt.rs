use rustyline::{CompletionType, Config, Editor, Result};

const DEFAULT_PROMPT: &str = "> ";

/// History is only kept for the current session.
const HISTORY_SIZE: usize = 200;

pub fn generate_prompt(custom_prompt: Option<&str>) -> String {
    custom_prompt.unwrap_or(DEFAULT_PROMPT).to_string()
}

pub fn rl() -> Result<Editor<()>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .history_ignore_dups(true)
        .max_history_size(HISTORY_SIZE)
        .completion_type(CompletionType::List)
        .build();
    Editor::with_config(config)
}
