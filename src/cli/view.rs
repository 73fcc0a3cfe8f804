use super::ui;
use super::widget::ConverterView;
use crate::core::{CurrencyCode, SymbolSet};
use comfy_table::Cell;
use rust_decimal::Decimal;
use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Selection {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: Decimal,
}

/// Renders widget output as text on a terminal (or any writer).
pub struct TerminalView<W: Write> {
    selection: Option<Selection>,
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(selection: Option<Selection>, out: W) -> Self {
        Self { selection, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            debug!(error = %e, "Failed to write view output");
        }
    }
}

impl<W: Write> ConverterView for TerminalView<W> {
    fn selected_codes(&self) -> Option<(CurrencyCode, CurrencyCode)> {
        self.selection
            .as_ref()
            .map(|s| (s.from.clone(), s.to.clone()))
    }

    fn amount(&self) -> Option<Decimal> {
        self.selection.as_ref().map(|s| s.amount)
    }

    fn swap_selection(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            std::mem::swap(&mut selection.from, &mut selection.to);
        }
    }

    fn show_symbols(&mut self, symbols: &SymbolSet) {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
        for (code, name) in &symbols.symbols {
            table.add_row(vec![Cell::new(code), Cell::new(name)]);
        }

        let title = ui::style_text("Currencies", ui::StyleType::Title);
        let footer = ui::style_text(
            &format!("{} currencies", symbols.len()),
            ui::StyleType::Subtle,
        );
        self.line(&format!("{title}\n\n{table}\n{footer}"));
    }

    fn show_rate(&mut self, rate: f64) {
        let text = match &self.selection {
            Some(s) => format!("1 {} = {:.4} {}", s.from, rate, s.to),
            None => format!("{rate:.4}"),
        };
        let label = ui::style_text("Rate:", ui::StyleType::Label);
        self.line(&format!("{label} {text}"));
    }

    fn show_converted(&mut self, converted_amount: f64) {
        let value = ui::style_text(&format!("{converted_amount:.2}"), ui::StyleType::Value);
        let text = match &self.selection {
            Some(s) => format!("{} {} = {} {}", s.amount, s.from, value, s.to),
            None => value,
        };
        self.line(&text);
    }

    fn show_failure(&mut self, message: &str) {
        let text = ui::style_text(message, ui::StyleType::Error);
        self.line(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn selection() -> Option<Selection> {
        Some(Selection {
            from: "USD".parse().unwrap(),
            to: "EUR".parse().unwrap(),
            amount: Decimal::from(100),
        })
    }

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_rate_and_amount_formatting() {
        let mut view = TerminalView::new(selection(), Vec::new());
        view.show_rate(0.912345);
        view.show_converted(91.2345);

        let out = output(view);
        assert!(out.contains("0.9123"), "{out}");
        assert!(!out.contains("0.912345"), "{out}");
        assert!(out.contains("91.23"), "{out}");
        assert!(out.contains("USD"));
        assert!(out.contains("EUR"));
    }

    #[test]
    fn test_swap_selection() {
        let mut view = TerminalView::new(selection(), Vec::new());
        view.swap_selection();
        let (from, to) = view.selected_codes().unwrap();
        assert_eq!(from.as_str(), "EUR");
        assert_eq!(to.as_str(), "USD");
        assert_eq!(view.amount(), Some(Decimal::from(100)));

        // Nothing selected, nothing to swap
        let mut empty = TerminalView::new(None, Vec::new());
        empty.swap_selection();
        assert!(empty.selected_codes().is_none());
    }

    #[test]
    fn test_symbols_table() {
        let mut view = TerminalView::new(None, Vec::new());
        view.show_symbols(&SymbolSet {
            symbols: BTreeMap::from([
                ("EUR".to_string(), "Euro".to_string()),
                ("JPY".to_string(), "Japanese Yen".to_string()),
            ]),
        });

        let out = output(view);
        assert!(out.contains("Japanese Yen"));
        assert!(out.contains("2 currencies"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test_log::test]
    fn test_write_errors_are_swallowed() {
        let mut view = TerminalView::new(selection(), BrokenPipe);
        view.show_rate(0.9123);
        view.show_failure("Failed to load conversion data");
        assert_eq!(view.amount(), Some(Decimal::from(100)));
    }

    #[test]
    fn test_failure_message() {
        let mut view = TerminalView::new(None, Vec::new());
        view.show_failure("Failed to load conversion data");
        assert!(output(view).contains("Failed to load conversion data"));
    }
}
