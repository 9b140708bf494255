use crate::process::Runtime;

/// Terminal color handling
pub struct Terminal {
    pub supports_color: bool,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            supports_color: console::colors_enabled(),
        }
    }

    /// Plain output, for tests
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            supports_color: false,
        }
    }

    /// Get color style based on runtime
    pub fn runtime_style(&self, runtime: Runtime) -> console::Style {
        let style = console::Style::new();
        if !self.supports_color {
            return style;
        }

        match runtime {
            Runtime::Java => style.yellow().bold(), // needs preparation
            Runtime::NonSpecial => style.green(),
        }
    }

    pub fn paint(&self, style: &console::Style, text: &str) -> String {
        if self.supports_color {
            style.apply_to(text).force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_terminal_does_not_style() {
        let terminal = Terminal::plain();
        let style = terminal.runtime_style(Runtime::Java);
        assert_eq!(terminal.paint(&style, "java"), "java");
    }

    #[test]
    fn test_color_terminal_styles() {
        let terminal = Terminal {
            supports_color: true,
        };
        let style = terminal.runtime_style(Runtime::Java);
        let painted = terminal.paint(&style, "java");
        assert!(painted.contains("java"));
        assert!(painted.contains('\x1b'));
    }
}
