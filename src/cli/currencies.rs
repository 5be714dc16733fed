use super::ui;
use crate::core::currency;
use comfy_table::Cell;

pub fn display_as_table() -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Kind")]);

    for (code, kind) in currency::all() {
        table.add_row(vec![Cell::new(code.as_str()), Cell::new(kind.to_string())]);
    }

    table.to_string()
}

pub fn run() {
    println!("{}", display_as_table());
}
