//! Interactive quote session
//!
//! Keeps one [`Session`] alive across commands, so a preview replaces the last
//! conversion on screen and vice versa.

use super::{currencies, quote, ui};
use crate::core::view;
use crate::core::{CurrencyCode, Operation, Session, request};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const PROMPT: &str = "bridge> ";

const HELP: &str = "\
Commands:
  preview <amount> [from] [to]   Request a pre-quote
  convert <amount> [from] [to]   Request a full conversion
  show                           Show the current result
  currencies                     List supported currencies
  help                           Show this help
  quit                           Leave the shell";

#[derive(Debug, PartialEq)]
enum ShellCommand {
    Quote {
        operation: Operation,
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Show,
    Currencies,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };

    let command = match command {
        "preview" | "prequote" | "convert" => {
            let operation = if command == "convert" {
                Operation::Conversion
            } else {
                Operation::Preview
            };
            let amount = parts
                .next()
                .ok_or_else(|| format!("Usage: {command} <amount> [from] [to]"))?
                .to_string();
            ShellCommand::Quote {
                operation,
                amount,
                from: parts.next().map(str::to_string),
                to: parts.next().map(str::to_string),
            }
        }
        "show" => ShellCommand::Show,
        "currencies" => ShellCommand::Currencies,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("Unknown command: {other}. Type `help` for usage.")),
    };
    Ok(Some(command))
}

/// Currently selected currency pair.
struct Selection {
    from: CurrencyCode,
    to: CurrencyCode,
}

impl Selection {
    fn update(&mut self, from: Option<&str>, to: Option<&str>) -> Result<(), String> {
        let from = from
            .map(CurrencyCode::parse)
            .transpose()
            .map_err(|e| e.to_string())?;
        let to = to
            .map(CurrencyCode::parse)
            .transpose()
            .map_err(|e| e.to_string())?;
        if let Some(from) = from {
            self.from = from;
        }
        if let Some(to) = to {
            self.to = to;
        }
        Ok(())
    }
}

pub async fn run<R, W>(
    session: &Session,
    from: CurrencyCode,
    to: CurrencyCode,
    reader: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut selection = Selection { from, to };
    let mut lines = reader.lines();

    writeln!(out, "{}", ui::style_text("Bridge: Crypto/Fiat Converter", ui::StyleType::Title))?;
    writeln!(out, "{}", ui::style_text("Type `help` for commands.", ui::StyleType::Subtle))?;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{}", ui::style_text(&message, ui::StyleType::Error))?;
                continue;
            }
        };
        debug!(?command, "Shell command");

        match command {
            ShellCommand::Quote {
                operation,
                amount,
                from,
                to,
            } => {
                if let Err(message) = selection.update(from.as_deref(), to.as_deref()) {
                    writeln!(out, "{}", ui::style_text(&message, ui::StyleType::Error))?;
                    continue;
                }
                let request =
                    request::build(&amount, selection.from.clone(), selection.to.clone());
                match quote::run(session, operation, request).await {
                    Ok(rendered) => writeln!(out, "{rendered}")?,
                    Err(e) => writeln!(
                        out,
                        "{}",
                        ui::style_text(&format!("{operation} failed: {e}"), ui::StyleType::Error)
                    )?,
                }
            }
            ShellCommand::Show => {
                writeln!(out, "{}", quote::render(&view::session_view(&session.state())))?
            }
            ShellCommand::Currencies => writeln!(out, "{}", currencies::display_as_table())?,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        ConversionRequest, ConversionResult, LogReporter, QuoteError, QuoteResult, QuoteService,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoService;

    #[async_trait]
    impl QuoteService for EchoService {
        async fn pre_quote(&self, request: &ConversionRequest) -> Result<QuoteResult, QuoteError> {
            Ok(QuoteResult {
                direct_amount: request.amount * 2.0,
            })
        }

        async fn convert(
            &self,
            request: &ConversionRequest,
        ) -> Result<ConversionResult, QuoteError> {
            Ok(ConversionResult {
                converted_amount: Some(request.amount * 3.0),
                exchange_path: Some(vec![request.from.to_string(), request.to.to_string()]),
                ..Default::default()
            })
        }
    }

    async fn run_script(script: &str) -> (String, Session) {
        let session = Session::new(Arc::new(EchoService), Arc::new(LogReporter));
        let mut out = Vec::new();
        run(
            &session,
            CurrencyCode::parse("BTC").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            std::io::Cursor::new(script.as_bytes().to_vec()),
            &mut out,
        )
        .await
        .unwrap();
        (String::from_utf8(out).unwrap(), session)
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("show"), Ok(Some(ShellCommand::Show)));
        assert_eq!(
            parse_line("convert 2 ETH EUR"),
            Ok(Some(ShellCommand::Quote {
                operation: Operation::Conversion,
                amount: "2".to_string(),
                from: Some("ETH".to_string()),
                to: Some("EUR".to_string()),
            }))
        );
        assert!(parse_line("preview").is_err());
        assert!(parse_line("withdraw 5").is_err());
    }

    #[tokio::test]
    async fn test_preview_then_convert() {
        let (output, session) = run_script("preview 5\nconvert 2 ETH\nquit\n").await;

        assert!(output.contains("Pre-Quoted Amount:"));
        assert!(output.contains("10 USD"));
        assert!(output.contains("6 USD"));
        assert!(output.contains("ETH → USD"));

        let state = session.state();
        assert!(state.last_preview.is_none());
        assert!(state.last_conversion.is_some());
    }

    #[tokio::test]
    async fn test_selection_persists_between_commands() {
        let (output, session) = run_script("preview 1 SOL EUR\npreview 4\n").await;
        assert!(output.contains("8 EUR"));
        let request = session.state().last_request.unwrap();
        assert_eq!(request.from.as_str(), "SOL");
        assert_eq!(request.to.as_str(), "EUR");
    }

    #[tokio::test]
    async fn test_errors_do_not_end_the_shell() {
        let (output, session) = run_script("preview 1 doge\nfoo\nshow\npreview 3\n").await;
        assert!(output.contains("Unsupported currency: doge"));
        assert!(output.contains("Unknown command: foo"));
        assert!(output.contains("No quote yet."));
        assert_eq!(session.state().last_preview.unwrap().direct_amount, 6.0);
    }
}
