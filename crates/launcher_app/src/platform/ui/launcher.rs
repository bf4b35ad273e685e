use launcher_core::{LauncherView, Msg};

use super::theme::ThemeProvider;

/// Create Program form contents; UI-only until submitted.
#[derive(Debug, Default)]
pub struct CreateDraft {
    pub open: bool,
    pub name: String,
    pub prompt: String,
}

impl CreateDraft {
    fn take_submission(&mut self) -> Msg {
        let msg = Msg::CreateProgramSubmitted {
            name: self.name.clone(),
            prompt: self.prompt.clone(),
        };
        if !self.name.trim().is_empty() && !self.prompt.trim().is_empty() {
            *self = Self::default();
        }
        msg
    }
}

/// Draws the launcher overlay over the chat. Escape or a backdrop click dismisses it.
pub fn show(
    ctx: &egui::Context,
    view: &LauncherView,
    theme: ThemeProvider,
    draft: &mut CreateDraft,
    outbox: &mut Vec<Msg>,
) {
    let palette = theme.palette();
    let response = egui::Modal::new(egui::Id::new("launcher_overlay")).show(ctx, |ui| {
        ui.set_width(560.0);
        ui.heading("Programs");
        ui.colored_label(palette.muted, "Choose a program to auto-prime, or create one.");
        ui.add_space(8.0);

        program_table(ui, view, outbox);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Run Program").clicked() {
                outbox.push(Msg::RunSelectedClicked);
            }
            if ui.button("Create Program").clicked() {
                draft.open = !draft.open;
            }
            if ui.selectable_label(view.manage_mode, "Manage Programs").clicked() {
                outbox.push(Msg::ManageToggled);
            }
            if ui.button("Continue to chat").clicked() {
                outbox.push(Msg::HideLauncher);
            }
            if ui.button("Exit").clicked() {
                outbox.push(Msg::ExitClicked);
            }
        });

        if view.manage_mode {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let delete = egui::Button::new(
                    egui::RichText::new("Delete selected").color(palette.danger),
                );
                if ui.add_enabled(view.has_selection, delete).clicked() {
                    outbox.push(Msg::DeleteSelectedClicked);
                }
                if ui.button("Refresh").clicked() {
                    outbox.push(Msg::RefreshPrograms);
                }
            });
        }

        if draft.open {
            ui.separator();
            create_form(ui, draft, outbox);
        }
    });

    if response.should_close() {
        outbox.push(Msg::HideLauncher);
    }
}

fn program_table(ui: &mut egui::Ui, view: &LauncherView, outbox: &mut Vec<Msg>) {
    egui::ScrollArea::vertical()
        .max_height(260.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            egui::Grid::new("programs_table")
                .num_columns(2)
                .striped(true)
                .min_col_width(160.0)
                .show(ui, |ui| {
                    ui.strong("Program");
                    ui.strong("Created");
                    ui.end_row();

                    for row in &view.rows {
                        let response = ui.selectable_label(row.selected, &row.name);
                        if response.double_clicked() {
                            outbox.push(Msg::ProgramActivated(row.name.clone()));
                        } else if response.clicked() {
                            outbox.push(Msg::ProgramSelected(row.name.clone()));
                        }
                        ui.weak(&row.created_at);
                        ui.end_row();
                    }
                });

            if let Some(hint) = &view.empty_hint {
                ui.add_space(6.0);
                ui.weak(hint);
            }
        });
}

fn create_form(ui: &mut egui::Ui, draft: &mut CreateDraft, outbox: &mut Vec<Msg>) {
    ui.label("New program");
    ui.add(
        egui::TextEdit::singleline(&mut draft.name)
            .hint_text("Name")
            .desired_width(f32::INFINITY),
    );
    ui.add(
        egui::TextEdit::multiline(&mut draft.prompt)
            .hint_text("Priming prompt")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            outbox.push(draft.take_submission());
        }
        if ui.button("Cancel").clicked() {
            *draft = CreateDraft::default();
        }
    });
}
