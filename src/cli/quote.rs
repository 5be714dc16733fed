use super::ui;
use crate::core::view::{self, ConversionView, PreviewView, QuoteView};
use crate::core::{ConversionRequest, Operation, QuoteError, Session};
use comfy_table::Cell;

impl PreviewView {
    pub fn display(&self) -> String {
        format!(
            "{} {}",
            ui::style_text("Pre-Quoted Amount:", ui::StyleType::Label),
            ui::style_text(&self.pre_quoted_amount, ui::StyleType::Amount)
        )
    }
}

impl ConversionView {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Conversion"), ui::header_cell("")]);

        for row in &self.rows {
            table.add_row(vec![Cell::new(row.label), ui::value_cell(&row.value)]);
        }

        let mut output = table.to_string();
        if let Some(profit) = &self.arbitrage {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    &format!("Arbitrage Profit Earned: {profit}"),
                    ui::StyleType::Alert
                )
            ));
        }
        output
    }
}

pub fn render(view: &QuoteView) -> String {
    match view {
        QuoteView::Empty => ui::style_text("No quote yet.", ui::StyleType::Subtle),
        QuoteView::Preview(preview) => preview.display(),
        QuoteView::Conversion(conversion) => conversion.display_as_table(),
    }
}

/// Runs one request on the session with a spinner, returning the rendered result.
pub async fn run(
    session: &Session,
    operation: Operation,
    request: ConversionRequest,
) -> Result<String, QuoteError> {
    let message = match operation {
        Operation::Preview => "Fetching pre-quote...",
        Operation::Conversion => "Converting...",
    };
    let pb = ui::new_spinner(message);

    let outcome = match operation {
        Operation::Preview => session.start_preview(request).await.map(|_| ()),
        Operation::Conversion => session.start_conversion(request).await.map(|_| ()),
    };
    pb.finish_and_clear();
    outcome?;

    Ok(render(&view::session_view(&session.state())))
}
