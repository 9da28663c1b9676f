use anyhow::Result;
use inquire::{Confirm, CustomType, Select, Text};

/// The questions the wizard can ask. Tests script the answers.
pub trait PromptDriver {
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String>;

    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool>;

    fn ask_u64(&self, title: &str, help: &str, default: u64) -> Result<u64>;

    /// Index of the chosen entry of `options`.
    fn ask_select(&self, title: &str, help: &str, options: Vec<String>, start: usize) -> Result<usize>;
}

/// Terminal prompts.
pub struct InquireDriver;

impl PromptDriver for InquireDriver {
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        let mut prompt = Text::new(title).with_default(default);
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt()?)
    }

    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        let mut prompt = Confirm::new(title).with_default(default);
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt()?)
    }

    fn ask_u64(&self, title: &str, help: &str, default: u64) -> Result<u64> {
        let mut prompt = CustomType::<u64>::new(title)
            .with_default(default)
            .with_error_message("Please type a non-negative integer");
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt()?)
    }

    fn ask_select(&self, title: &str, help: &str, options: Vec<String>, start: usize) -> Result<usize> {
        let start = start.min(options.len().saturating_sub(1));
        let mut prompt = Select::new(title, options).with_starting_cursor(start);
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.raw_prompt()?.index)
    }
}
