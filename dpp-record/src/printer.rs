//! Line printer for the canonical layout
//!
//! Two-space indentation, `\n` separators, no trailing newline.

pub(crate) struct Printer {
    buffer: String,
    indent_level: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    /// Write one line at the current indentation
    pub fn writeln(&mut self, s: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        for _ in 0..self.indent_level {
            self.buffer.push_str("  ");
        }
        self.buffer.push_str(s);
    }

    pub fn open(&mut self, tag: &str) {
        self.writeln(&format!("<{tag}>"));
        self.indent_level += 1;
    }

    pub fn close(&mut self, tag: &str) {
        self.indent_level = self.indent_level.saturating_sub(1);
        self.writeln(&format!("</{tag}>"));
    }

    /// `<tag>value</tag>`; `value` must already be escaped
    pub fn element(&mut self, tag: &str, value: &str) {
        self.writeln(&format!("<{tag}>{value}</{tag}>"));
    }

    /// `<tag unit="...">value</tag>`
    pub fn element_with_unit(&mut self, tag: &str, unit: &str, value: &str) {
        self.writeln(&format!("<{tag} unit=\"{unit}\">{value}</{tag}>"));
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_layout() {
        let mut p = Printer::new();
        p.open("Root");
        p.element("A", "1");
        p.element_with_unit("B", "V", "2.000");
        p.close("Root");
        assert_eq!(p.finish(), "<Root>\n  <A>1</A>\n  <B unit=\"V\">2.000</B>\n</Root>");
    }
}
