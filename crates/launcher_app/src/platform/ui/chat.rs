use egui::text::LayoutJob;
use launcher_core::{AppViewModel, Msg, SeedPhase, TranscriptSpan};

use super::theme::ThemeProvider;

const TRANSCRIPT_FONT_SIZE: f32 = 14.0;

pub fn show(
    ctx: &egui::Context,
    view: &AppViewModel,
    theme: ThemeProvider,
    outbox: &mut Vec<Msg>,
) {
    top_bar(ctx, view, theme, outbox);
    composer(ctx, view, outbox);

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(transcript_job(&view.transcript, theme, ui.available_width()));
            });
    });
}

fn top_bar(ctx: &egui::Context, view: &AppViewModel, theme: ThemeProvider, outbox: &mut Vec<Msg>) {
    egui::TopBottomPanel::top("chat_top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Programs").clicked() {
                outbox.push(Msg::ShowLauncher);
            }
            ui.separator();
            ui.colored_label(theme.palette().muted, status_text(view));
            if view.streaming {
                ui.spinner();
            }
        });
    });
}

fn composer(ctx: &egui::Context, view: &AppViewModel, outbox: &mut Vec<Msg>) {
    egui::TopBottomPanel::bottom("chat_composer").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let send_width = 72.0;
            let mut input = view.input.clone();
            let response = ui.add_enabled(
                view.input_enabled,
                egui::TextEdit::singleline(&mut input)
                    .id_salt("chat_input")
                    .hint_text("Type a message (Enter to send)")
                    .desired_width(ui.available_width() - send_width),
            );
            if response.changed() {
                outbox.push(Msg::InputChanged(input));
            }

            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(view.input_enabled, egui::Button::new("Send"))
                .clicked();
            if enter || clicked {
                outbox.push(Msg::InputSubmitted);
                response.request_focus();
            }
        });
        ui.add_space(4.0);
    });
}

fn status_text(view: &AppViewModel) -> &'static str {
    match (view.streaming, view.seed_phase) {
        (true, SeedPhase::Firing) => "Writing a welcome message…",
        (true, _) => "Generating…",
        (false, SeedPhase::PendingOverlayClose | SeedPhase::PendingReady) => {
            "Welcome message pending"
        }
        (false, _) => "Ready",
    }
}

/// One layout job for the whole transcript, colored per tag.
fn transcript_job(spans: &[TranscriptSpan], theme: ThemeProvider, wrap_width: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;
    for span in spans {
        job.append(
            &span.text,
            0.0,
            egui::TextFormat {
                font_id: egui::FontId::monospace(TRANSCRIPT_FONT_SIZE),
                color: theme.tag_color(span.tag),
                ..Default::default()
            },
        );
    }
    job
}
