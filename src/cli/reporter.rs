use colored::Colorize;
use objrest_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// One line per diagnostic, each ending in a newline.
    pub fn render(&self, file: &str, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(file, diagnostic));
            out.push('\n');
        }
        out
    }

    pub fn format_diagnostic(&self, file: &str, diagnostic: &Diagnostic) -> String {
        let file = if file.is_empty() { "<stdin>" } else { file };
        format!(
            "{} - {} {}: {}",
            self.format_file(file),
            self.format_category(diagnostic.category),
            self.format_code(diagnostic.code),
            diagnostic.message_text
        )
    }

    fn format_file(&self, file: &str) -> String {
        if self.color {
            file.cyan().to_string()
        } else {
            file.to_string()
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let name = category.name();
        if !self.color {
            return name.to_string();
        }
        match category {
            DiagnosticCategory::Error => name.red().bold().to_string(),
            DiagnosticCategory::Warning => name.yellow().bold().to_string(),
            DiagnosticCategory::Message => name.blue().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let code = format!("OR{code}");
        if self.color {
            code.bright_black().to_string()
        } else {
            code
        }
    }
}
