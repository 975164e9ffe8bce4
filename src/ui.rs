use crate::about;
use crate::color::{LampColor, LampCommand};
use crate::device::DeviceRecord;
use crate::screen::{Action, NoticeKind, Prompt, ADAPTER_OFF_QUESTION, ADAPTER_OFF_TITLE};
use crate::state::State;
use crate::{LampRemote, INITIAL_WIDTH, PROGRAM_TITLE};
use eframe::egui::{self, Align2, Color32, Context, RichText, ScrollArea, Ui};
use eframe::egui::widgets::color_picker::{color_picker_color32, Alpha};
use std::time::Duration;

const HEADER_COLOR: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
const ERROR_COLOR: Color32 = Color32::from_rgb(255, 80, 80);

// Keep UI action handlers associated with LampRemote
impl LampRemote {
    fn handle_picker_change(&mut self) {
        let color = LampColor::from(self.picker_color);
        self.hex_input = color.to_hex();
        self.controller.dispatch(Action::ColorChanged(color));
    }

    fn handle_hex_submit(&mut self) {
        match LampColor::from_hex(self.hex_input.trim()) {
            Ok(color) => {
                self.picker_color = color.to_color32();
                self.controller.dispatch(Action::ColorChanged(color));
            }
            Err(e) => log::warn!("Ignoring colour input: {}", e),
        }
    }
}

// Main eframe application loop
impl eframe::App for LampRemote {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Keeps polling worker outcomes even without input events
        ctx.request_repaint_after(Duration::from_millis(50));
        self.controller.pump();

        draw_header(self, ctx);
        if self.state == State::Running {
            // Panels must be laid out before the central panel
            draw_footer(self, ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.state {
            State::Initialising => {
                ui.centered_and_justified(|ui| {
                    ui.label("Initialising...");
                });
                // Actual init logic runs once after this frame
                self.init();
            }
            State::About => draw_about_screen(self, ui),
            State::Running => draw_running_state(self, ui),
        });

        draw_prompt_window(self, ctx);
        draw_notice_window(self, ctx);
    }

    // Called when the application is about to close
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown_app();
    }
}

// --- UI Drawing Functions ---

fn draw_header(app: &LampRemote, ctx: &Context) {
    egui::TopBottomPanel::top("header")
        .frame(egui::Frame::none().fill(HEADER_COLOR).inner_margin(12.0))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(app.controller.screen().display_text())
                        .color(Color32::WHITE)
                        .size(20.0),
                );
            });
        });
}

pub(crate) fn draw_about_screen(app: &mut LampRemote, ui: &mut Ui) {
    ui.set_width(INITIAL_WIDTH);
    ui.vertical_centered(|ui| {
        ui.heading(format!("About {}", PROGRAM_TITLE));
        ui.separator();
        for line in about::about() {
            ui.label(line);
        }
        ui.separator();
        if ui.button("OK").clicked() {
            app.state = State::Running;
        }
    });
}

pub(crate) fn draw_running_state(app: &mut LampRemote, ui: &mut Ui) {
    let screen = app.controller.screen();
    if screen.is_busy() {
        draw_loader(ui);
    } else if screen.connected_device().is_some() {
        draw_lamp_controls(app, ui);
    } else {
        draw_device_list(app, ui);
    }
}

fn draw_footer(app: &mut LampRemote, ctx: &Context) {
    let screen = app.controller.screen();
    if screen.is_busy() {
        return;
    }
    if screen.connected_device().is_some() {
        draw_lamp_footer(app, ctx);
    } else {
        draw_refresh_footer(app, ctx);
    }
}

fn draw_loader(ui: &mut Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.add(egui::Spinner::new().size(64.0));
            ui.label("Łączenie...");
        });
    });
}

fn draw_device_list(app: &mut LampRemote, ui: &mut Ui) {
    let mut picked: Option<DeviceRecord> = None;

    ui.vertical_centered(|ui| {
        ui.add_space(20.0);
        ui.label(RichText::new("Lista powiązanych urządzeń:").size(20.0));
        ui.add_space(10.0);
    });

    let devices = app.controller.screen().devices();
    if devices.is_empty() {
        ui.vertical_centered(|ui| {
            ui.label("(No paired devices, pair the lamp in system settings and refresh)");
        });
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for device in devices {
                let label = RichText::new(format!("{}", device)).size(17.0);
                if ui.selectable_label(false, label).clicked() {
                    picked = Some(device.clone());
                }
            }
        });

    // Dispatch after the list borrow ends
    if let Some(device) = picked {
        app.controller.dispatch(Action::Connect(device));
    }
}

fn draw_lamp_controls(app: &mut LampRemote, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(10.0);
        if color_picker_color32(ui, &mut app.picker_color, Alpha::Opaque) {
            app.handle_picker_change();
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.label("Hex:");
            let response = ui.text_edit_singleline(&mut app.hex_input);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                app.handle_hex_submit();
            }
        });

        let screen = app.controller.screen();
        if let Some(color) = screen.selected_color() {
            ui.label(RichText::new(format!("Sending {}", color)).color(color.to_color32()));
        }
        if let Some(last) = screen.last_write() {
            ui.label(
                RichText::new(format!("Last command {:?} at {}", last.payload, last.at.format("%H:%M:%S")))
                    .small()
                    .weak(),
            );
        }
    });
}

fn draw_lamp_footer(app: &mut LampRemote, ctx: &Context) {
    egui::TopBottomPanel::bottom("lamp_footer").show(ctx, |ui| {
        ui.horizontal(|ui| {
            for command in [LampCommand::On, LampCommand::Off] {
                if ui.button(command.label()).clicked() {
                    app.controller.dispatch(Action::Command(command));
                }
            }
            if ui.button("Rozłącz").clicked() {
                app.controller.dispatch(Action::Disconnect);
            }
        });
    });
}

fn draw_refresh_footer(app: &mut LampRemote, ctx: &Context) {
    egui::TopBottomPanel::bottom("refresh_footer").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Odśwież").clicked() {
                log::info!("Refreshing device list manually.");
                app.controller.dispatch(Action::RefreshDevices);
            }
            if ui.button("About").clicked() {
                app.state = State::About;
            }
        });
    });
}

fn draw_prompt_window(app: &mut LampRemote, ctx: &Context) {
    let Some(Prompt::EnableAdapter) = app.controller.screen().prompt() else {
        return;
    };

    egui::Window::new(ADAPTER_OFF_TITLE)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(ADAPTER_OFF_QUESTION);
            ui.horizontal(|ui| {
                if ui.button("Nie").clicked() {
                    app.controller.dispatch(Action::DeclineEnable);
                }
                if ui.button("Tak").clicked() {
                    app.controller.dispatch(Action::ConfirmEnable);
                }
            });
        });
}

fn draw_notice_window(app: &mut LampRemote, ctx: &Context) {
    let Some(notice) = app.controller.screen().current_notice() else {
        return;
    };
    let text = match notice.kind {
        NoticeKind::Info => RichText::new(&notice.message),
        NoticeKind::Error => RichText::new(&notice.message).color(ERROR_COLOR),
    };
    let raised_at = notice.raised_at.format("%H:%M:%S").to_string();
    let title = notice.title.clone();

    egui::Window::new(title)
        .id(egui::Id::new("notice_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 80.0])
        .show(ctx, |ui| {
            ui.label(text);
            ui.label(RichText::new(raised_at).small().weak());
            if ui.button("OK").clicked() {
                app.controller.dispatch(Action::DismissNotice);
            }
        });
}
