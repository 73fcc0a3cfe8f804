//! User actions of the converter and the handlers bound to them.
//!
//! The core returns typed errors; this is the only layer that flattens them
//! into a log line and a generic failure message for the user.

use crate::core::{CurrencyCode, CurrencyConverter, SymbolProvider, SymbolSet};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error};

/// What the widget reads from and writes to.
pub trait ConverterView {
    /// Selected source and target currencies.
    fn selected_codes(&self) -> Option<(CurrencyCode, CurrencyCode)>;
    fn amount(&self) -> Option<Decimal>;
    fn swap_selection(&mut self);
    fn show_symbols(&mut self, symbols: &SymbolSet);
    fn show_rate(&mut self, rate: f64);
    fn show_converted(&mut self, converted_amount: f64);
    fn show_failure(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadSymbols,
    Convert,
    Swap,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Action::LoadSymbols => "load-symbols",
                Action::Convert => "convert",
                Action::Swap => "swap",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
}

pub struct Widget {
    symbols: Arc<dyn SymbolProvider>,
    converter: Arc<dyn CurrencyConverter>,
}

impl Widget {
    pub fn new(symbols: Arc<dyn SymbolProvider>, converter: Arc<dyn CurrencyConverter>) -> Self {
        Self { symbols, converter }
    }

    pub async fn dispatch(&self, action: Action, view: &mut dyn ConverterView) -> Outcome {
        debug!(%action, "Dispatching action");
        match action {
            Action::LoadSymbols => self.on_load_symbols(view).await,
            Action::Convert => self.on_convert(view).await,
            Action::Swap => self.on_swap(view).await,
        }
    }

    async fn on_load_symbols(&self, view: &mut dyn ConverterView) -> Outcome {
        match self.symbols.get_symbols().await {
            Ok(symbols) => {
                view.show_symbols(&symbols);
                Outcome::Done
            }
            Err(e) => {
                error!(error = %e, "Error fetching currencies");
                view.show_failure("Failed to load currencies");
                Outcome::Failed
            }
        }
    }

    async fn on_convert(&self, view: &mut dyn ConverterView) -> Outcome {
        let (Some((from, to)), Some(amount)) = (view.selected_codes(), view.amount()) else {
            view.show_failure("Select two currencies and an amount");
            return Outcome::Failed;
        };

        match self.converter.convert(&from, &to, amount).await {
            Ok(result) => {
                view.show_rate(result.rate);
                view.show_converted(result.converted_amount);
                Outcome::Done
            }
            Err(e) => {
                error!(error = %e, %from, %to, %amount, "Error fetching conversion data");
                view.show_failure("Failed to load conversion data");
                Outcome::Failed
            }
        }
    }

    async fn on_swap(&self, view: &mut dyn ConverterView) -> Outcome {
        view.swap_selection();
        self.on_convert(view).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionError, ConversionResult, FetchError};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    struct FakeSymbols {
        fail: bool,
    }

    #[async_trait]
    impl SymbolProvider for FakeSymbols {
        async fn get_symbols(&self) -> Result<SymbolSet, FetchError> {
            if self.fail {
                return Err(FetchError::HttpStatus { status: 503 });
            }
            Ok(SymbolSet {
                symbols: BTreeMap::from([
                    ("EUR".to_string(), "Euro".to_string()),
                    ("USD".to_string(), "United States Dollar".to_string()),
                ]),
            })
        }
    }

    /// Fixed rate of 2.0 from USD, 0.5 otherwise. Records every pair.
    #[derive(Default)]
    struct FakeConverter {
        calls: Mutex<Vec<(String, String, Decimal)>>,
        fail: bool,
    }

    #[async_trait]
    impl CurrencyConverter for FakeConverter {
        async fn convert(
            &self,
            from: &CurrencyCode,
            to: &CurrencyCode,
            amount: Decimal,
        ) -> Result<ConversionResult, ConversionError> {
            self.calls
                .lock()
                .unwrap()
                .push((from.to_string(), to.to_string(), amount));
            if self.fail {
                return Err(ConversionError::Rejected { reason: None });
            }
            let rate = if from.as_str() == "USD" { 2.0 } else { 0.5 };
            let amount: f64 = amount.to_string().parse().unwrap();
            Ok(ConversionResult {
                rate,
                converted_amount: amount * rate,
            })
        }
    }

    #[derive(Default)]
    struct RecordingView {
        codes: Option<(CurrencyCode, CurrencyCode)>,
        amount: Option<Decimal>,
        symbols: Option<SymbolSet>,
        rate: Option<f64>,
        converted: Option<f64>,
        failures: Vec<String>,
    }

    impl RecordingView {
        fn with_pair(from: &str, to: &str, amount: i64) -> Self {
            Self {
                codes: Some((from.parse().unwrap(), to.parse().unwrap())),
                amount: Some(Decimal::from(amount)),
                ..Default::default()
            }
        }
    }

    impl ConverterView for RecordingView {
        fn selected_codes(&self) -> Option<(CurrencyCode, CurrencyCode)> {
            self.codes.clone()
        }
        fn amount(&self) -> Option<Decimal> {
            self.amount
        }
        fn swap_selection(&mut self) {
            self.codes = self.codes.take().map(|(a, b)| (b, a));
        }
        fn show_symbols(&mut self, symbols: &SymbolSet) {
            self.symbols = Some(symbols.clone());
        }
        fn show_rate(&mut self, rate: f64) {
            self.rate = Some(rate);
        }
        fn show_converted(&mut self, converted_amount: f64) {
            self.converted = Some(converted_amount);
        }
        fn show_failure(&mut self, message: &str) {
            self.failures.push(message.to_string());
        }
    }

    fn widget(symbols_fail: bool, converter: Arc<FakeConverter>) -> Widget {
        Widget::new(Arc::new(FakeSymbols { fail: symbols_fail }), converter)
    }

    #[tokio::test]
    async fn test_load_symbols() {
        let w = widget(false, Arc::new(FakeConverter::default()));
        let mut view = RecordingView::default();

        assert_eq!(w.dispatch(Action::LoadSymbols, &mut view).await, Outcome::Done);
        assert_eq!(view.symbols.unwrap().name_of("EUR"), Some("Euro"));
        assert!(view.failures.is_empty());
    }

    #[tokio::test]
    async fn test_load_symbols_failure_is_flattened() {
        let w = widget(true, Arc::new(FakeConverter::default()));
        let mut view = RecordingView::default();

        assert_eq!(
            w.dispatch(Action::LoadSymbols, &mut view).await,
            Outcome::Failed
        );
        assert!(view.symbols.is_none());
        assert_eq!(view.failures, vec!["Failed to load currencies".to_string()]);
    }

    #[tokio::test]
    async fn test_convert_renders_rate_and_amount() {
        let converter = Arc::new(FakeConverter::default());
        let w = widget(false, converter.clone());
        let mut view = RecordingView::with_pair("USD", "EUR", 100);

        assert_eq!(w.dispatch(Action::Convert, &mut view).await, Outcome::Done);
        assert_eq!(view.rate, Some(2.0));
        assert_eq!(view.converted, Some(200.0));
        assert_eq!(
            converter.calls.lock().unwrap().as_slice(),
            &[("USD".to_string(), "EUR".to_string(), Decimal::from(100))]
        );
    }

    #[tokio::test]
    async fn test_swap_exchanges_codes_then_converts() {
        let converter = Arc::new(FakeConverter::default());
        let w = widget(false, converter.clone());
        let mut view = RecordingView::with_pair("USD", "EUR", 10);

        assert_eq!(w.dispatch(Action::Swap, &mut view).await, Outcome::Done);
        let (from, to) = view.codes.clone().unwrap();
        assert_eq!((from.as_str(), to.as_str()), ("EUR", "USD"));
        assert_eq!(view.rate, Some(0.5));
        assert_eq!(view.converted, Some(5.0));
        assert_eq!(converter.calls.lock().unwrap()[0].0, "EUR");
    }

    #[tokio::test]
    async fn test_convert_failure_leaves_display_untouched() {
        let converter = Arc::new(FakeConverter {
            fail: true,
            ..Default::default()
        });
        let w = widget(false, converter.clone());
        let mut view = RecordingView::with_pair("USD", "EUR", 100);

        assert_eq!(w.dispatch(Action::Convert, &mut view).await, Outcome::Failed);
        assert!(view.rate.is_none());
        assert!(view.converted.is_none());
        assert_eq!(converter.calls.lock().unwrap().len(), 1);
        assert_eq!(view.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_convert_without_selection_does_not_call_service() {
        let converter = Arc::new(FakeConverter::default());
        let w = widget(false, converter.clone());
        let mut view = RecordingView::default();

        assert_eq!(w.dispatch(Action::Convert, &mut view).await, Outcome::Failed);
        assert!(converter.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::LoadSymbols.to_string(), "load-symbols");
        assert_eq!(Action::Convert.to_string(), "convert");
        assert_eq!(Action::Swap.to_string(), "swap");
    }
}
