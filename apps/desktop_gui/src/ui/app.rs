use std::time::Duration;

use client_core::{BoardView, FactBoard, LoadTicket, StoreError, EMPTY_BOARD_MESSAGE};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Category, CategoryFilter, Fact, FactId, VoteKind};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::apply_ui_event;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    ToggleForm,
    SelectCategory(CategoryFilter),
    Submit,
    Vote(FactId, VoteKind),
    DismissAlert,
    DismissStatus,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Authentication",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

fn vote_icon(kind: VoteKind) -> &'static str {
    match kind {
        VoteKind::Likes => "❤",
        VoteKind::Upvotes => "👍",
        VoteKind::Downvotes => "👎",
    }
}

pub struct FactasticApp {
    board: FactBoard,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    alert: Option<UiError>,
    status: Option<String>,
    form_error: Option<String>,
    theme_applied: bool,
}

impl FactasticApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            board: FactBoard::new(),
            cmd_tx,
            ui_rx,
            alert: None,
            status: None,
            form_error: None,
            theme_applied: false,
        };
        let ticket = app.board.begin_load();
        app.send_load(ticket);
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if let Some(err) = apply_ui_event(&mut self.board, event) {
                self.surface(err);
            }
        }
    }

    fn surface(&mut self, err: UiError) {
        tracing::warn!(context = ?err.context(), "ui error: {}", err.message());
        if err.is_alert() {
            self.alert = Some(err);
        } else if err.is_inline() {
            self.form_error = Some(err.message().to_string());
        } else {
            self.status = Some(format!("{}: {}", err_label(err.category()), err.message()));
        }
    }

    fn send_load(&mut self, ticket: LoadTicket) {
        if let Err(status) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::LoadFacts { ticket })
        {
            let folded = apply_ui_event(
                &mut self.board,
                UiEvent::FactsLoaded {
                    ticket,
                    result: Err(StoreError::Unavailable(status)),
                },
            );
            if let Some(err) = folded {
                self.surface(err);
            }
        }
    }

    fn handle(&mut self, action: UiAction) {
        if self.alert.is_some() && action != UiAction::DismissAlert {
            return;
        }

        match action {
            UiAction::ToggleForm => {
                self.board.toggle_form();
                self.form_error = None;
            }
            UiAction::SelectCategory(filter) => {
                let ticket = self.board.set_category(filter);
                self.send_load(ticket);
            }
            UiAction::Submit => match self.board.begin_submit() {
                Ok(new_fact) => {
                    self.form_error = None;
                    if let Err(status) = dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::InsertFact { new_fact },
                    ) {
                        let folded = apply_ui_event(
                            &mut self.board,
                            UiEvent::FactInserted {
                                result: Err(StoreError::Unavailable(status)),
                            },
                        );
                        if let Some(err) = folded {
                            self.surface(err);
                        }
                    }
                }
                Err(err) => self.surface(UiError::from_board(&err)),
            },
            UiAction::Vote(id, kind) => match self.board.begin_vote(id, kind) {
                Ok(request) => {
                    if let Err(status) =
                        dispatch_backend_command(&self.cmd_tx, BackendCommand::Vote { request })
                    {
                        let folded = apply_ui_event(
                            &mut self.board,
                            UiEvent::VoteRecorded {
                                request,
                                result: Err(StoreError::Unavailable(status)),
                            },
                        );
                        if let Some(err) = folded {
                            self.surface(err);
                        }
                    }
                }
                Err(err) => self.surface(UiError::from_board(&err)),
            },
            UiAction::DismissAlert => self.alert = None,
            UiAction::DismissStatus => self.status = None,
        }
    }
}

fn show_header(ui: &mut egui::Ui, board: &FactBoard, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("FACTASTIC").size(28.0).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let toggle = egui::Button::new(egui::RichText::new(board.toggle_label()).strong())
                .fill(theme::ACCENT)
                .min_size(egui::vec2(140.0, 36.0));
            if ui.add(toggle).clicked() {
                actions.push(UiAction::ToggleForm);
            }
        });
    });
}

fn show_form(
    ui: &mut egui::Ui,
    board: &mut FactBoard,
    form_error: Option<&str>,
    actions: &mut Vec<UiAction>,
) {
    let uploading = board.is_uploading();
    egui::Frame::NONE
        .fill(theme::CARD_FILL)
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.add_enabled_ui(!uploading, |ui| {
                let draft = board.draft_mut();
                ui.horizontal_wrapped(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut draft.text)
                            .hint_text("Share a fact with the world...")
                            .desired_width(360.0),
                    );
                    let remaining = draft.remaining_chars();
                    let counter = egui::RichText::new(remaining.to_string());
                    ui.label(if remaining < 0 {
                        counter.color(theme::DISPUTED)
                    } else {
                        counter.color(theme::MUTED_TEXT)
                    });
                    ui.add(
                        egui::TextEdit::singleline(&mut draft.source)
                            .hint_text("Trustworthy source...")
                            .desired_width(220.0),
                    );
                    let selected = if draft.category.is_empty() {
                        "Choose category:".to_string()
                    } else {
                        draft.category.to_uppercase()
                    };
                    egui::ComboBox::from_id_salt("fact_category")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for category in Category::ALL {
                                ui.selectable_value(
                                    &mut draft.category,
                                    category.name().to_string(),
                                    category.name().to_uppercase(),
                                );
                            }
                        });
                    if ui
                        .add(egui::Button::new("Post").min_size(egui::vec2(80.0, 28.0)))
                        .clicked()
                    {
                        actions.push(UiAction::Submit);
                    }
                });
            });
            if let Some(message) = form_error {
                ui.colored_label(theme::DISPUTED, message);
            }
        });
}

fn show_categories(ui: &mut egui::Ui, board: &FactBoard, actions: &mut Vec<UiAction>) {
    let current = board.current_category();
    let size = egui::vec2(170.0, 34.0);
    ui.add_space(8.0);

    let all = egui::Button::new(egui::RichText::new("All").strong())
        .fill(theme::ACCENT)
        .selected(current == CategoryFilter::All)
        .min_size(size);
    if ui.add(all).clicked() {
        actions.push(UiAction::SelectCategory(CategoryFilter::All));
    }
    ui.add_space(6.0);

    for category in Category::ALL {
        let filter = CategoryFilter::Only(category);
        let button = egui::Button::new(egui::RichText::new(category.name().to_uppercase()).strong())
            .fill(theme::category_color(category))
            .selected(current == filter)
            .min_size(size);
        if ui.add(button).clicked() {
            actions.push(UiAction::SelectCategory(filter));
        }
    }
}

fn show_fact_card(ui: &mut egui::Ui, fact: &Fact, updating: bool, actions: &mut Vec<UiAction>) {
    egui::Frame::NONE
        .fill(theme::CARD_FILL)
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(14, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                if fact.is_disputed() {
                    ui.label(
                        egui::RichText::new("[DISPUTED]")
                            .color(theme::DISPUTED)
                            .strong(),
                    );
                }
                ui.label(&fact.text);
                ui.hyperlink_to("(Source)", &fact.source);
            });
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(fact.category.name().to_uppercase())
                        .background_color(theme::category_color(fact.category))
                        .strong(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    for kind in VoteKind::ALL.into_iter().rev() {
                        let label = format!("{} {}", vote_icon(kind), fact.votes(kind));
                        if ui.add_enabled(!updating, egui::Button::new(label)).clicked() {
                            actions.push(UiAction::Vote(fact.id, kind));
                        }
                    }
                });
            });
        });
}

fn show_facts(ui: &mut egui::Ui, board: &FactBoard, actions: &mut Vec<UiAction>) {
    match board.view() {
        BoardView::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        }
        BoardView::Empty => {
            ui.label(egui::RichText::new(EMPTY_BOARD_MESSAGE).size(18.0));
        }
        BoardView::Facts(facts) => {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for fact in facts {
                        show_fact_card(ui, fact, board.is_updating(fact.id), actions);
                        ui.add_space(6.0);
                    }
                    ui.label(egui::RichText::new(board.summary()).color(theme::MUTED_TEXT));
                });
        }
    }
}

fn show_alert(ctx: &egui::Context, alert: &UiError, actions: &mut Vec<UiAction>) {
    egui::Window::new("Something went wrong")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(alert.message());
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                actions.push(UiAction::DismissAlert);
            }
        });
}

impl eframe::App for FactasticApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }
        self.process_ui_events();

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            show_header(ui, &self.board, &mut actions);
            if self.board.show_form() {
                ui.add_space(6.0);
                show_form(ui, &mut self.board, self.form_error.as_deref(), &mut actions);
            }
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.status {
                Some(status) => {
                    ui.colored_label(theme::DISPUTED, status);
                    if ui.small_button("Dismiss").clicked() {
                        actions.push(UiAction::DismissStatus);
                    }
                }
                None => {
                    ui.colored_label(theme::MUTED_TEXT, "Ready");
                }
            });
        });

        egui::SidePanel::left("categories")
            .resizable(false)
            .show(ctx, |ui| show_categories(ui, &self.board, &mut actions));

        egui::CentralPanel::default().show(ctx, |ui| show_facts(ui, &self.board, &mut actions));

        if let Some(alert) = &self.alert {
            show_alert(ctx, alert, &mut actions);
        }

        for action in actions {
            self.handle(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
