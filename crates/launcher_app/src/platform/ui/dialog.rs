use launcher_core::{Dialog, DialogKind, Msg};

use super::theme::ThemeProvider;

pub fn show(ctx: &egui::Context, dialog: &Dialog, theme: ThemeProvider, outbox: &mut Vec<Msg>) {
    let palette = theme.palette();
    let title_color = match dialog.kind {
        DialogKind::Info => palette.text,
        DialogKind::Error => palette.danger,
    };

    let response = egui::Modal::new(egui::Id::new("launcher_dialog")).show(ctx, |ui| {
        ui.set_max_width(420.0);
        ui.label(egui::RichText::new(&dialog.title).strong().color(title_color));
        ui.add_space(6.0);
        ui.label(&dialog.message);
        ui.add_space(10.0);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.button("OK").clicked()
        })
        .inner
    });

    if response.inner || response.should_close() {
        outbox.push(Msg::DialogDismissed);
    }
}
