//! Gemini Studio main window — egui/eframe application.
//!
//! # Architecture
//!
//! [`StudioApp`] is the top-level [`eframe::App`].  It owns one state
//! container per screen and a [`tokio::runtime::Handle`] the containers spawn
//! their simulated work on:
//!
//! * Chat screen  — [`CredentialGate`] until a key is accepted, then a
//!   [`ChatSession`] wrapping a [`ChatSimulator`].
//! * Tools screen — [`ToolsScreen`] wrapping an [`ImageTextExtractor`].
//!
//! Every frame the app drains both containers ([`StudioApp::poll`]) and then
//! renders the active screen.  Signing out drops the [`ChatSession`], which
//! aborts any reply still in flight.
//!
//! # Screens
//!
//! | Screen | Path     | Content |
//! |--------|----------|---------|
//! | Chat   | `/`      | API-key gate, then message log + input + settings |
//! | Tools  | `/tools` | Image selection, extract button, result text |

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::chat::{
    ChatError, ChatSimulator, Credential, Message, ModelSettings, ReplyBackend, Role,
    SettingsForm, SimulatedReply,
};
use crate::config::AppConfig;
use crate::extract::{mime_for_path, ImageHandle, ImageTextExtractor, SystemClipboard};

/// Character limit of the chat input box.
pub const MAX_INPUT_CHARS: usize = 32_000;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 90, 80);
const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(40, 90, 170);
const ASSISTANT_BUBBLE: egui::Color32 = egui::Color32::from_rgb(55, 55, 60);

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// The two navigable screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Chat,
    Tools,
}

impl Screen {
    /// Fixed route of the screen.
    pub fn path(&self) -> &'static str {
        match self {
            Screen::Chat => "/",
            Screen::Tools => "/tools",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Chat => "Chat",
            Screen::Tools => "Tools",
        }
    }
}

// ---------------------------------------------------------------------------
// Chat screen state
// ---------------------------------------------------------------------------

/// Sign-in form shown before a key has been accepted.
#[derive(Debug, Default)]
pub struct CredentialGate {
    pub key_input: String,
    pub error: Option<String>,
}

/// A signed-in chat session.  Dropping it discards the key, the log and any
/// pending reply.
pub struct ChatSession {
    credential: Credential,
    pub chat: ChatSimulator,
    pub input: String,
    pub input_error: Option<String>,
    settings_form: Option<SettingsForm>,
}

impl ChatSession {
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Send the input box contents; the box is cleared on success.
    pub fn submit_input(&mut self) {
        match self.chat.send(&self.input) {
            Ok(()) => {
                self.input.clear();
                self.input_error = None;
            }
            Err(ChatError::Busy) => {}
            Err(e) => self.input_error = Some(e.to_string()),
        }
    }

    pub fn settings_open(&self) -> bool {
        self.settings_form.is_some()
    }

    pub fn toggle_settings(&mut self) {
        self.settings_form = match self.settings_form.take() {
            Some(form) => {
                form.cancel();
                None
            }
            None => Some(SettingsForm::open(self.chat.settings())),
        };
    }

    pub fn settings_form_mut(&mut self) -> Option<&mut SettingsForm> {
        self.settings_form.as_mut()
    }

    /// Commit the draft and close the form.
    pub fn save_settings(&mut self) {
        if let Some(form) = self.settings_form.take() {
            match form.save() {
                Ok(settings) => self.chat.set_settings(settings),
                Err(e) => log::warn!("settings rejected: {e}"),
            }
        }
    }

    /// Discard the draft and close the form.
    pub fn cancel_settings(&mut self) {
        if let Some(form) = self.settings_form.take() {
            form.cancel();
        }
    }
}

pub enum ChatScreen {
    SignedOut(CredentialGate),
    SignedIn(Box<ChatSession>),
}

// ---------------------------------------------------------------------------
// Tools screen state
// ---------------------------------------------------------------------------

pub struct ToolsScreen {
    pub extractor: ImageTextExtractor,
    /// Path typed into the file field.
    pub path_input: String,
}

// ---------------------------------------------------------------------------
// StudioApp
// ---------------------------------------------------------------------------

/// eframe application — the Gemini Studio main window.
pub struct StudioApp {
    pub screen: Screen,
    pub chat: ChatScreen,
    pub tools: ToolsScreen,
    reply_backend: Arc<dyn ReplyBackend>,
    config: AppConfig,
    runtime: Handle,
}

impl StudioApp {
    /// Create the app.  Simulated work is spawned on `runtime`.
    pub fn new(config: AppConfig, runtime: Handle) -> Self {
        let reply_backend: Arc<dyn ReplyBackend> =
            Arc::new(SimulatedReply::from_config(&config.simulation));
        let extractor =
            ImageTextExtractor::from_config(&config, Arc::new(SystemClipboard), runtime.clone());

        Self {
            screen: config.ui.start_screen,
            chat: ChatScreen::SignedOut(CredentialGate::default()),
            tools: ToolsScreen {
                extractor,
                path_input: String::new(),
            },
            reply_backend,
            config,
            runtime,
        }
    }

    pub fn navigate(&mut self, screen: Screen) {
        if self.screen != screen {
            log::debug!("navigate: {} -> {}", self.screen.path(), screen.path());
            self.screen = screen;
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.chat, ChatScreen::SignedIn(_))
    }

    /// Validate the key typed into the gate and open a chat session.
    pub fn submit_credential(&mut self) {
        let ChatScreen::SignedOut(gate) = &mut self.chat else {
            return;
        };
        match Credential::parse(&gate.key_input) {
            Ok(credential) => {
                log::info!("chat: signed in");
                let chat = ChatSimulator::new(
                    Arc::clone(&self.reply_backend),
                    self.config.model,
                    self.runtime.clone(),
                );
                self.chat = ChatScreen::SignedIn(Box::new(ChatSession {
                    credential,
                    chat,
                    input: String::new(),
                    input_error: None,
                    settings_form: None,
                }));
            }
            Err(e) => gate.error = Some(e.to_string()),
        }
    }

    /// Drop the chat session and return to the gate.
    pub fn sign_out(&mut self) {
        if self.is_signed_in() {
            log::info!("chat: signed out");
        }
        self.chat = ChatScreen::SignedOut(CredentialGate::default());
    }

    /// Drain both screens.  Returns `true` if anything changed.
    pub fn poll(&mut self) -> bool {
        let chat_changed = match &mut self.chat {
            ChatScreen::SignedIn(session) => session.chat.poll(),
            ChatScreen::SignedOut(_) => false,
        };
        let tools_changed = self.tools.extractor.poll();
        chat_changed || tools_changed
    }

    /// `true` while something on screen is waiting on a timer.
    fn is_animating(&self) -> bool {
        let chat_pending = match &self.chat {
            ChatScreen::SignedIn(session) => session.chat.is_pending(),
            ChatScreen::SignedOut(_) => false,
        };
        let ex = &self.tools.extractor;
        chat_pending || ex.is_busy() || ex.is_copied()
    }

    /// Take a file dropped on the window as the extractor's image.
    fn accept_dropped(&mut self, file: &egui::DroppedFile) {
        self.navigate(Screen::Tools);
        if let Some(path) = &file.path {
            let _ = self.tools.extractor.load_file(path);
        } else if let Some(bytes) = &file.bytes {
            match mime_for_path(Path::new(&file.name)) {
                Some(mime) => self
                    .tools
                    .extractor
                    .set_image(ImageHandle::from_bytes(file.name.clone(), mime, bytes.to_vec())),
                None => log::warn!("ignoring dropped non-image file {:?}", file.name),
            }
        }
    }

    // ── Navigation bar ───────────────────────────────────────────────────

    fn draw_nav(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong("Gemini Studio");
            ui.separator();
            for screen in [Screen::Chat, Screen::Tools] {
                if ui
                    .selectable_label(self.screen == screen, screen.title())
                    .clicked()
                {
                    self.navigate(screen);
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(self.screen.path()).weak().monospace());
            });
        });
    }

    // ── Chat screen ──────────────────────────────────────────────────────

    fn draw_chat(&mut self, ui: &mut egui::Ui) {
        let action = match &mut self.chat {
            ChatScreen::SignedOut(gate) => draw_gate(ui, gate),
            ChatScreen::SignedIn(session) => draw_session(ui, session),
        };
        match action {
            ChatAction::SignIn => self.submit_credential(),
            ChatAction::SignOut => self.sign_out(),
            ChatAction::Clear => {
                if let ChatScreen::SignedIn(session) = &mut self.chat {
                    log::debug!("chat: log cleared");
                    session.chat.clear();
                }
            }
            ChatAction::None => {}
        }
    }

    // ── Tools screen ─────────────────────────────────────────────────────

    fn draw_tools(&mut self, ui: &mut egui::Ui) {
        let tools = &mut self.tools;
        let mut action = ToolsAction::None;

        ui.heading("Text Extraction Tools");
        ui.label(
            egui::RichText::new(
                "Upload an image to extract text, correct spelling with Gemini, and copy to clipboard",
            )
            .weak(),
        );
        ui.add_space(8.0);

        // Image drop zone
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_height(110.0);
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                match &tools.extractor.state().image {
                    Some(image) => {
                        ui.label(egui::RichText::new(image.name()).strong());
                        let dims = image
                            .dimensions()
                            .map(|(w, h)| format!(" · {w}×{h}"))
                            .unwrap_or_default();
                        ui.label(
                            egui::RichText::new(format!(
                                "{} · {} bytes{dims}",
                                image.mime(),
                                image.bytes().len()
                            ))
                            .weak(),
                        );
                    }
                    None => {
                        ui.label(
                            egui::RichText::new(
                                "Drop an image here, paste one, or enter a file path below",
                            )
                            .weak(),
                        );
                    }
                }
            });
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let resp = ui.add(
                egui::TextEdit::singleline(&mut tools.path_input)
                    .hint_text("Path to an image file")
                    .desired_width(280.0),
            );
            let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Select Image").clicked() || enter {
                action = ToolsAction::Load;
            }
            if ui.button("Paste Image").clicked() {
                action = ToolsAction::Paste;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let ex = &tools.extractor;
                if ex.is_busy() {
                    ui.label(format!("{}...", ex.state().status.label()));
                    ui.spinner();
                } else {
                    let has_image = ex.state().image.is_some();
                    if ui
                        .add_enabled(has_image, egui::Button::new(ex.variant().action_label()))
                        .clicked()
                    {
                        action = ToolsAction::Extract;
                    }
                }
            });
        });

        if let Some(err) = tools.extractor.error() {
            ui.add_space(4.0);
            ui.colored_label(ERROR_COLOR, err);
        }

        let state = tools.extractor.state();
        let copied = tools.extractor.is_copied();

        if !state.extracted_text.is_empty() {
            ui.add_space(8.0);
            let is_final = state.corrected_text.is_empty() && !state.status.is_busy();
            if result_header(ui, "Extracted Text:", is_final, copied) {
                action = ToolsAction::Copy;
            }
            read_only_text(ui, &state.extracted_text);
        }

        if !state.corrected_text.is_empty() {
            ui.add_space(8.0);
            if result_header(ui, "Corrected Text (Gemini):", true, copied) {
                action = ToolsAction::Copy;
            }
            read_only_text(ui, &state.corrected_text);
        }

        match action {
            ToolsAction::Load => {
                let path = PathBuf::from(tools.path_input.trim());
                let _ = tools.extractor.load_file(&path);
            }
            ToolsAction::Paste => {
                let _ = tools.extractor.paste_from_clipboard();
            }
            ToolsAction::Extract => {
                let _ = tools.extractor.extract();
            }
            ToolsAction::Copy => tools.extractor.copy_result(),
            ToolsAction::None => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Screen renderers
// ---------------------------------------------------------------------------

enum ChatAction {
    None,
    SignIn,
    SignOut,
    Clear,
}

enum ToolsAction {
    None,
    Load,
    Paste,
    Extract,
    Copy,
}

enum FormAction {
    None,
    Save,
    Cancel,
}

/// Render the API-key gate.
fn draw_gate(ui: &mut egui::Ui, gate: &mut CredentialGate) -> ChatAction {
    let mut action = ChatAction::None;
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.heading("Welcome to Gemini Chat");
        ui.label(
            egui::RichText::new(
                "Enter your Gemini API key to start chatting with the gemini-2.0-flash model",
            )
            .weak(),
        );
        ui.add_space(12.0);

        let resp = ui.add(
            egui::TextEdit::singleline(&mut gate.key_input)
                .password(true)
                .hint_text("Enter your Gemini API key")
                .desired_width(320.0),
        );
        let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if let Some(err) = &gate.error {
            ui.colored_label(ERROR_COLOR, err);
        }

        ui.add_space(8.0);
        if ui.button("Start Chat →").clicked() || enter {
            action = ChatAction::SignIn;
        }
    });
    action
}

/// Render a signed-in chat session.
fn draw_session(ui: &mut egui::Ui, session: &mut ChatSession) -> ChatAction {
    let mut action = ChatAction::None;

    ui.horizontal(|ui| {
        ui.heading("Gemini Chat");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Sign Out").clicked() {
                action = ChatAction::SignOut;
            }
            if ui
                .add_enabled(!session.chat.messages().is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                action = ChatAction::Clear;
            }
            ui.label(egui::RichText::new(session.credential().masked()).weak().monospace());
            if ui
                .selectable_label(session.settings_open(), "⚙ Settings")
                .clicked()
            {
                session.toggle_settings();
            }
        });
    });
    ui.separator();

    let form_action = session
        .settings_form_mut()
        .map(|form| draw_settings_form(ui, form));
    match form_action {
        Some(FormAction::Save) => session.save_settings(),
        Some(FormAction::Cancel) => session.cancel_settings(),
        _ => {}
    }

    // Message log
    let log_height = (ui.available_height() - 120.0).max(80.0);
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .max_height(log_height)
        .show(ui, |ui| {
            if session.chat.messages().is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label("No messages yet");
                    ui.label(egui::RichText::new("Start a conversation with Gemini AI").weak());
                });
            }
            for message in session.chat.messages() {
                draw_message(ui, message);
            }
            if session.chat.is_pending() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(egui::RichText::new("Gemini is thinking...").weak());
                });
            }
        });

    // Input
    ui.separator();
    let enabled = !session.chat.is_pending();
    let mut submit = false;
    ui.horizontal(|ui| {
        let resp = ui.add_enabled(
            enabled,
            egui::TextEdit::multiline(&mut session.input)
                .hint_text("Type your message...")
                .char_limit(MAX_INPUT_CHARS)
                .desired_rows(3)
                .desired_width(ui.available_width() - 70.0),
        );
        let shortcut =
            resp.has_focus() && ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));
        let can_send = enabled && !session.input.trim().is_empty();
        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() || (can_send && shortcut) {
            submit = true;
        }
    });
    if submit {
        session.submit_input();
    }

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!(
                "{} / {MAX_INPUT_CHARS}",
                session.input.chars().count()
            ))
            .small()
            .weak(),
        );
        if let Some(err) = &session.input_error {
            ui.colored_label(ERROR_COLOR, err);
        }
    });

    action
}

/// Render one chat bubble, right-aligned for the user.
fn draw_message(ui: &mut egui::Ui, message: &Message) {
    let (layout, fill) = match message.role {
        Role::User => (egui::Layout::right_to_left(egui::Align::TOP), USER_BUBBLE),
        Role::Assistant => (egui::Layout::left_to_right(egui::Align::TOP), ASSISTANT_BUBBLE),
    };
    let max_width = ui.available_width() * 0.8;

    ui.with_layout(layout, |ui| {
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.vertical(|ui| {
                    let time = message
                        .timestamp
                        .with_timezone(&chrono::Local)
                        .format("%H:%M");
                    ui.label(
                        egui::RichText::new(format!("{} · {time}", message.role.label()))
                            .small()
                            .color(egui::Color32::from_rgb(190, 190, 190)),
                    );
                    ui.label(egui::RichText::new(&message.content).color(egui::Color32::WHITE));
                });
            });
    });
    ui.add_space(6.0);
}

/// Render the model settings card.
fn draw_settings_form(ui: &mut egui::Ui, form: &mut SettingsForm) -> FormAction {
    let mut action = FormAction::None;

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.strong("Model Settings");
        ui.add_space(4.0);

        let mut temperature = form.draft().temperature;
        if ui
            .add(
                egui::Slider::new(&mut temperature, ModelSettings::TEMPERATURE)
                    .step_by(0.1)
                    .text("Temperature"),
            )
            .changed()
        {
            form.set_temperature(temperature);
        }
        hint(ui, "Controls randomness: lower values are more deterministic, higher values are more creative.");

        let mut top_k = form.draft().top_k;
        if ui
            .add(egui::Slider::new(&mut top_k, ModelSettings::TOP_K).text("Top K"))
            .changed()
        {
            form.set_top_k(top_k);
        }
        hint(ui, "Limits vocabulary to top K tokens at each step.");

        let mut top_p = form.draft().top_p;
        if ui
            .add(
                egui::Slider::new(&mut top_p, ModelSettings::TOP_P)
                    .step_by(0.01)
                    .text("Top P"),
            )
            .changed()
        {
            form.set_top_p(top_p);
        }
        hint(ui, "Nucleus sampling: only consider tokens with cumulative probability < top_p.");

        ui.horizontal(|ui| {
            ui.label("Max Output Tokens");
            if ui
                .add(egui::TextEdit::singleline(form.max_tokens_text_mut()).desired_width(80.0))
                .changed()
            {
                form.commit_max_tokens_text();
            }
        });
        hint(ui, "Maximum number of tokens to generate in the response.");

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Cancel").clicked() {
                action = FormAction::Cancel;
            }
            if ui.button("Save Settings").clicked() {
                action = FormAction::Save;
            }
        });
    });
    ui.add_space(6.0);

    action
}

fn hint(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).small().weak());
}

/// Section header with a copy button.  Returns `true` when copy is clicked.
fn result_header(ui: &mut egui::Ui, title: &str, copyable: bool, copied: bool) -> bool {
    let mut clicked = false;
    ui.horizontal(|ui| {
        ui.strong(title);
        if copyable {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if copied {
                    ui.colored_label(SUCCESS_COLOR, "✔ Copied");
                } else if ui.small_button("Copy").clicked() {
                    clicked = true;
                }
            });
        }
    });
    clicked
}

fn read_only_text(ui: &mut egui::Ui, text: &str) {
    let mut text = text;
    ui.add(
        egui::TextEdit::multiline(&mut text)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for StudioApp {
    /// Called every frame by eframe.  Polls both screens, picks up dropped
    /// files, then renders the active screen.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll();

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.first() {
            self.accept_dropped(file);
        }

        // Keep repainting while a simulated timer is outstanding so results
        // show up without user input.
        if self.is_animating() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("nav").show(ctx, |ui| self.draw_nav(ui));

        egui::CentralPanel::default().show(ctx, |ui| match self.screen {
            Screen::Chat => self.draw_chat(ui),
            Screen::Tools => self.draw_tools(ui),
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.sign_out();
        self.tools.extractor.cancel();
        log::info!("Gemini Studio closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
