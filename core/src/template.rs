//! Placeholder binding for row templates.
//!
//! Row templates are authored once with the reserved `__prefix__` token in
//! every indexed attribute (`name`, `id`, `for`, ...). Binding swaps the token
//! for a concrete decimal index; the markup is otherwise untouched.

pub const PLACEHOLDER: &str = "__prefix__";

pub fn bind_prefix(markup: &str, index: usize) -> String {
    markup.replace(PLACEHOLDER, &index.to_string())
}

pub fn has_placeholder(markup: &str) -> bool {
    markup.contains(PLACEHOLDER)
}
