//! Striped grids for rows that also render as terminal tables

use eframe::egui::{self, RichText, Ui};
use tabled::Tabled;

pub fn show_table<T: Tabled>(ui: &mut Ui, id: &str, rows: &[T]) {
    egui::Grid::new(id)
        .striped(true)
        .min_col_width(72.0)
        .show(ui, |ui| {
            for header in T::headers() {
                ui.label(RichText::new(header.as_ref()).strong());
            }
            ui.end_row();

            for row in rows {
                for field in row.fields() {
                    ui.monospace(field.as_ref());
                }
                ui.end_row();
            }
        });
}
