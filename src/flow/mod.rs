//! Command handling independent of the Telegram transport.
//!
//! `dispatch` takes one user input, runs it against that user's dialogue
//! and returns the replies to send. The user's dialogue stays locked for the
//! whole call, backend requests included, so inputs from the same user are
//! processed strictly one after another.

mod account;
mod admin;
mod login;
mod payment;
mod register;
mod scan;

use teloxide::types::{InlineKeyboardMarkup, UserId};

use crate::{
    command::Command,
    error::{BotError, BotResult},
    format,
    handler::{get_cancel_keyboard, get_main_menu_keyboard, get_scan_tier_keyboard},
    middleware::{authorize, RequestContext},
    service::{
        api::ApiService,
        dialogue::{DialogueGuard, DialogueState, Flow},
        session::SessionService,
    },
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Text(String),
    Callback(String),
}

impl Input {
    /// Buttons that behave exactly like a command become that command.
    fn resolve(self) -> Self {
        match self {
            Input::Callback(data) => match data.as_str() {
                "scan" => Input::Command(Command::Scan),
                "dashboard" => Input::Command(Command::Dashboard),
                "balance" => Input::Command(Command::Balance),
                "history" => Input::Command(Command::History),
                "upgrade" => Input::Command(Command::Upgrade),
                "show_help" => Input::Command(Command::Help),
                "cancel" => Input::Command(Command::Cancel),
                _ => Input::Callback(data),
            },
            other => other,
        }
    }

    fn kind(&self) -> String {
        match self {
            Input::Command(command) => format!("command {:?}", command),
            Input::Text(text) => format!("text ({} chars)", text.chars().count()),
            Input::Callback(data) => format!("callback {}", data),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outcome {
    pub replies: Vec<Reply>,
    /// The input message held a password and should be removed from the chat.
    pub delete_input: bool,
}

pub(crate) struct FlowContext<'a> {
    app: &'a AppState,
    ctx: &'a RequestContext,
    dialogue: DialogueGuard,
    outcome: Outcome,
}

impl FlowContext<'_> {
    fn user_id(&self) -> UserId {
        self.ctx.user_id
    }

    fn api(&self) -> &ApiService {
        &self.app.services.api
    }

    fn sessions(&self) -> &SessionService {
        &self.app.services.session
    }

    fn reply(&mut self, text: impl Into<String>) {
        self.outcome.replies.push(Reply::text(text));
    }

    fn reply_with(&mut self, text: impl Into<String>, keyboard: InlineKeyboardMarkup) {
        self.outcome.replies.push(Reply::with_keyboard(text, keyboard));
    }

    /// The stored auth token, or a "please login" reply when there is none.
    fn require_token(&mut self) -> Option<String> {
        let token = self.sessions().auth_token(self.user_id());
        if token.is_none() {
            self.reply(format::ERROR_NOT_LOGGED_IN);
        }
        token
    }

    fn fail(&mut self, action: &str, error: BotError) {
        let mut text = format::error_message(action, &error);

        if !error.resets_flow() {
            debug!("{} for user {} not accepted: {}", action, self.user_id(), error);
            let keyboard = match self.dialogue.state() {
                DialogueState::ScanTier { .. } => Some(get_scan_tier_keyboard()),
                state if state.is_idle() => None,
                _ => Some(get_cancel_keyboard()),
            };
            self.outcome.replies.push(Reply { text, keyboard });
            return;
        }

        if matches!(&error, BotError::BackendRejected(api) if api.is_auth()) {
            let logged_in = self
                .sessions()
                .get(self.user_id())
                .is_some_and(|session| session.is_authenticated());
            if logged_in {
                self.sessions().clear_token(self.user_id());
            } else {
                text = format::ERROR_NOT_LOGGED_IN.to_string();
            }
        }

        warn!("{} failed for user {}: {}", action, self.user_id(), error);
        self.dialogue.reset();
        self.reply_with(text, get_main_menu_keyboard());
    }
}

fn action_of(state: &DialogueState, input: &Input) -> &'static str {
    match input {
        Input::Command(command) => match command {
            Command::Register => "Registration",
            Command::Login => "Login",
            Command::Logout => "Logout",
            Command::Dashboard => "Dashboard",
            Command::Scan => "Scan",
            Command::History => "History",
            Command::Balance => "Balance",
            Command::VerifyPayment(_) => "Payment verification",
            Command::Admin | Command::Stats | Command::Users | Command::Transactions => "Admin request",
            _ => "Request",
        },
        Input::Callback(data) if data.starts_with("buy:") => "Purchase",
        _ => match state.flow() {
            Flow::Register => "Registration",
            Flow::Login => "Login",
            Flow::Scan => "Scan",
            Flow::None => "Request",
        },
    }
}

pub async fn dispatch(app: &AppState, ctx: &RequestContext, input: Input) -> Outcome {
    let input = input.resolve();
    debug!("User {} sent {}", ctx.user_id, input.kind());

    if let Input::Command(command) = &input {
        if let Err(error) = authorize(ctx, command) {
            return Outcome {
                replies: vec![Reply::text(format::error_message("Request", &error))],
                delete_input: false,
            };
        }
    }

    let dialogue = app.services.dialogue.acquire(ctx.user_id).await;
    let mut cx = FlowContext {
        app,
        ctx,
        dialogue,
        outcome: Outcome::default(),
    };

    // an expired password step still gets its message removed
    let step = cx.dialogue.expired_from().unwrap_or(cx.dialogue.state());
    if matches!(input, Input::Text(_)) && step.awaits_password() {
        cx.outcome.delete_input = true;
    }

    let action = action_of(cx.dialogue.state(), &input);
    if let Err(error) = route(&mut cx, input).await {
        cx.fail(action, error);
    }

    cx.dialogue.touch();
    cx.outcome
}

async fn route(cx: &mut FlowContext<'_>, input: Input) -> BotResult<()> {
    match input {
        Input::Command(Command::Cancel) => cancel(cx),
        Input::Command(command) => {
            if !cx.dialogue.state().is_idle() {
                info!(
                    "User {} left {} for {:?}",
                    cx.user_id(),
                    cx.dialogue.state(),
                    command
                );
                cx.dialogue.reset();
            }
            run_command(cx, command).await
        }
        Input::Text(text) => {
            if cx.dialogue.expired() {
                cx.reply_with(format::OPERATION_EXPIRED, get_main_menu_keyboard());
                return Ok(());
            }
            match cx.dialogue.state().flow() {
                Flow::Register => register::handle_text(cx, &text).await,
                Flow::Login => login::handle_text(cx, &text).await,
                Flow::Scan => scan::handle_text(cx, &text).await,
                Flow::None => {
                    cx.reply_with(format::UNKNOWN_MESSAGE, get_main_menu_keyboard());
                    Ok(())
                }
            }
        }
        Input::Callback(data) => handle_callback(cx, &data).await,
    }
}

async fn run_command(cx: &mut FlowContext<'_>, command: Command) -> BotResult<()> {
    match command {
        Command::Start => account::start(cx),
        Command::Help => account::help(cx),
        Command::Register => register::start(cx),
        Command::Login => login::start(cx),
        Command::Logout => account::logout(cx).await,
        Command::Dashboard => account::dashboard(cx).await,
        Command::Scan => scan::start(cx),
        Command::History => account::history(cx).await,
        Command::Balance => account::balance(cx).await,
        Command::Upgrade => payment::upgrade(cx),
        Command::Pricing => payment::pricing(cx),
        Command::BuyCredits => payment::buy_credits(cx),
        Command::VerifyPayment(args) => payment::verify_payment(cx, &args).await,
        Command::Cancel => cancel(cx),
        Command::Admin => admin::overview(cx).await,
        Command::Stats => admin::detailed_stats(cx).await,
        Command::Users => admin::users(cx).await,
        Command::Transactions => admin::transactions(cx).await,
    }
}

async fn handle_callback(cx: &mut FlowContext<'_>, data: &str) -> BotResult<()> {
    match data.split_once(':') {
        Some(("scan_tier", tier)) => scan::handle_tier_choice(cx, tier).await,
        Some(("buy", credits)) => payment::handle_package(cx, credits),
        _ if data == "main_menu" => {
            cx.reply_with(format::MAIN_MENU, get_main_menu_keyboard());
            Ok(())
        }
        _ => {
            warn!("Unknown callback data from user {}: {}", cx.user_id(), data);
            Ok(())
        }
    }
}

fn cancel(cx: &mut FlowContext<'_>) -> BotResult<()> {
    let previous = cx.dialogue.reset();
    if !previous.is_idle() {
        info!(
            "User {} cancelled {} (collected: {:?})",
            cx.user_id(),
            previous,
            previous.collected_fields()
        );
    }
    cx.reply_with(format::OPERATION_CANCELLED, get_main_menu_keyboard());
    Ok(())
}
