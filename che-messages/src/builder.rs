//! Template rendering behind the [`msg!`](crate::msg) macro.
//!
//! Catalog templates carry named `{key}` placeholders; anonymous `{}`
//! slots are also supported and are filled in the order the values were
//! queued. Unbound placeholders stay in the output so a missing binding
//! is visible instead of silently dropped.

pub struct MessageBuilder {
    template: &'static str,
    named: Vec<(&'static str, String)>,
    positional: Vec<String>,
}

impl MessageBuilder {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            named: Vec::new(),
            positional: Vec::new(),
        }
    }

    /// Binds a named `{key}` placeholder.
    pub fn var(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.named.push((key, value.into()));
        self
    }

    /// Queues a value for the next anonymous `{}` slot.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn build(self) -> String {
        let mut rendered = self.template.to_string();
        for (key, value) in &self.named {
            rendered = rendered.replace(&format!("{{{key}}}"), value);
        }
        for value in &self.positional {
            match rendered.find("{}") {
                Some(slot) => rendered.replace_range(slot..slot + 2, value),
                None => break,
            }
        }
        rendered
    }
}
