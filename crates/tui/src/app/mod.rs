pub mod forms;
pub mod state;

use std::{future::Future, time::Duration};

use chrono::Local;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use api_types::{
    auth::{RegisterResponse, SessionUser},
    category::Category,
    dashboard::DashboardStats,
    recurring::RecurringTransaction,
    transaction::{Transaction, TransactionPage},
    user::Profile,
};
use fintrack_client::{Api, ClientError, FieldErrors};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use state::{AppState, FormModal, ListRequest, LoadState, Route, ToastLevel, ToastState};

type Outcome<T> = std::result::Result<T, ClientError>;

/// Completion of a background request.
#[derive(Debug)]
pub enum AppEvent {
    LoggedIn(Outcome<SessionUser>),
    Registered(Outcome<RegisterResponse>),
    Dashboard {
        ticket: u64,
        result: Outcome<DashboardStats>,
    },
    Transactions {
        ticket: u64,
        result: Outcome<TransactionPage>,
    },
    Recurring {
        ticket: u64,
        result: Outcome<Vec<RecurringTransaction>>,
    },
    Categories {
        ticket: u64,
        result: Outcome<Vec<Category>>,
    },
    Profile {
        ticket: u64,
        result: Outcome<Profile>,
    },
    TransactionSaved(Outcome<Transaction>),
    TransactionDeleted {
        id: i64,
        result: Outcome<()>,
    },
    RecurringSaved(Outcome<RecurringTransaction>),
    RecurringDeleted {
        id: i64,
        result: Outcome<()>,
    },
}

pub struct App {
    api: Api,
    pub state: AppState,
    events_tx: mpsc::UnboundedSender<(u64, AppEvent)>,
    events_rx: mpsc::UnboundedReceiver<(u64, AppEvent)>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig, api: Api) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = AppState::new(api.gateway().base_url().as_str(), &config.username);
        Self {
            api,
            state,
            events_tx,
            events_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state.user = self.api.session().current_user();
        self.navigate(Route::Dashboard);

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            self.state.expire_toast(std::time::Instant::now());
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            let next = tokio::select! {
                event = self.events_rx.recv() => event,
                _ = tokio::time::sleep(tick_rate) => None,
            };
            if let Some((epoch, event)) = next {
                self.deliver(epoch, event);
            }
            while let Ok((epoch, event)) = self.events_rx.try_recv() {
                self.deliver(epoch, event);
            }

            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()?
                    && key.kind == KeyEventKind::Press
                {
                    self.handle_key(key);
                }
            }
        }

        Ok(())
    }

    /// Runs `request` on the runtime; its outcome comes back through the
    /// event channel, tagged with the session epoch it was issued in.
    fn spawn<F, Fut>(&self, request: F)
    where
        F: FnOnce(Api) -> Fut,
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let events = self.events_tx.clone();
        let epoch = self.state.session_epoch;
        let fut = request(self.api.clone());
        tokio::spawn(async move {
            // The receiver only goes away on shutdown.
            let _ = events.send((epoch, fut.await));
        });
    }

    /// Handles `event` unless the session it was requested in has ended.
    fn deliver(&mut self, epoch: u64, event: AppEvent) {
        if epoch != self.state.session_epoch {
            tracing::debug!("dropping response from session epoch {epoch}");
            return;
        }
        self.handle_event(event);
    }

    fn has_session(&self) -> bool {
        self.api.session().is_authenticated()
    }

    pub fn navigate(&mut self, requested: Route) {
        let route = state::guard(requested, self.has_session());
        if route != requested {
            tracing::debug!("{:?} redirected to {:?}", requested, route);
        }
        self.state.route = route;
        self.load_route();
    }

    /// Loads whatever the current page shows.
    fn load_route(&mut self) {
        match self.state.route {
            Route::Login | Route::Register => {}
            Route::Dashboard => self.load_dashboard(),
            Route::Transactions => {
                self.ensure_categories();
                let req = self.state.transactions.reload();
                self.load_transactions(req);
            }
            Route::Recurring => {
                self.ensure_categories();
                self.load_recurring();
            }
            Route::Categories => self.load_categories(),
            Route::Profile => self.load_profile(),
        }
    }

    fn load_dashboard(&mut self) {
        let ticket = self.state.dashboard.stats.begin();
        let (from, to) = (self.state.dashboard.from, self.state.dashboard.to);
        self.spawn(move |api| async move {
            let result = api.dashboard().stats(from, to).await;
            AppEvent::Dashboard { ticket, result }
        });
    }

    fn load_transactions(&mut self, req: ListRequest) {
        let ListRequest { ticket, filters } = req;
        self.spawn(move |api| async move {
            let result = api.transactions().list(&filters).await;
            AppEvent::Transactions { ticket, result }
        });
    }

    fn load_recurring(&mut self) {
        let ticket = self.state.recurring.list.begin();
        self.spawn(move |api| async move {
            let result = api.recurring().list().await;
            AppEvent::Recurring { ticket, result }
        });
    }

    fn load_categories(&mut self) {
        let ticket = self.state.categories.begin();
        self.spawn(move |api| async move {
            let result = api.categories().list().await;
            AppEvent::Categories { ticket, result }
        });
    }

    fn ensure_categories(&mut self) {
        if matches!(
            self.state.categories.state,
            LoadState::Idle | LoadState::Failed(_)
        ) {
            self.load_categories();
        }
    }

    fn load_profile(&mut self) {
        let ticket = self.state.profile.begin();
        self.spawn(move |api| async move {
            let result = api.user().profile().await;
            AppEvent::Profile { ticket, result }
        });
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoggedIn(result) => self.on_logged_in(result),
            AppEvent::Registered(result) => self.on_registered(result),
            AppEvent::Dashboard { ticket, result } => {
                if !self.state.dashboard.stats.is_current(ticket) {
                    return;
                }
                let result = self.describe_failure(result);
                self.state.dashboard.apply(ticket, result);
                self.mark_refreshed();
            }
            AppEvent::Transactions { ticket, result } => {
                if !self.state.transactions.list.is_current(ticket) {
                    return;
                }
                let result = self.describe_failure(result);
                self.state.transactions.apply(ticket, result);
                self.mark_refreshed();
            }
            AppEvent::Recurring { ticket, result } => {
                if !self.state.recurring.list.is_current(ticket) {
                    return;
                }
                let result = self.describe_failure(result);
                self.state.recurring.apply(ticket, result);
            }
            AppEvent::Categories { ticket, result } => {
                if !self.state.categories.is_current(ticket) {
                    return;
                }
                let result = self.describe_failure(result);
                self.state.categories.finish(ticket, result);
            }
            AppEvent::Profile { ticket, result } => {
                if !self.state.profile.is_current(ticket) {
                    return;
                }
                let result = self.describe_failure(result);
                self.state.profile.finish(ticket, result);
            }
            AppEvent::TransactionSaved(result) => self.on_transaction_saved(result),
            AppEvent::TransactionDeleted { id, result } => {
                self.state.transactions.deleting = None;
                match result {
                    Ok(()) => {
                        self.state
                            .show_toast(ToastLevel::Success, format!("Transaction {id} deleted"));
                        let req = self.state.transactions.reload();
                        self.load_transactions(req);
                    }
                    Err(err) => self.toast_error(&err),
                }
            }
            AppEvent::RecurringSaved(result) => self.on_recurring_saved(result),
            AppEvent::RecurringDeleted { id, result } => {
                self.state.recurring.deleting = None;
                match result {
                    Ok(()) => {
                        self.state.show_toast(
                            ToastLevel::Success,
                            format!("Recurring transaction {id} deleted"),
                        );
                        self.load_recurring();
                    }
                    Err(err) => self.toast_error(&err),
                }
            }
        }
    }

    fn mark_refreshed(&mut self) {
        if self.has_session() {
            self.state.last_refresh = Some(Local::now());
        }
    }

    /// Turns a load error into its display message. A rejected token ends
    /// the session.
    fn describe_failure<T>(
        &mut self,
        result: Outcome<T>,
    ) -> std::result::Result<T, String> {
        result.map_err(|err| {
            self.expire_session_on(&err);
            message_for_error(&err)
        })
    }

    fn expire_session_on(&mut self, err: &ClientError) {
        if matches!(err, ClientError::Unauthorized) && self.has_session() {
            tracing::warn!("session rejected by the server");
            self.api.session().logout();
            self.state.reset_session_data();
            self.state.login.error("Session expired, please log in again.");
            self.navigate(Route::Login);
        }
    }

    fn toast_error(&mut self, err: &ClientError) {
        self.expire_session_on(err);
        self.state.show_toast(ToastLevel::Error, message_for_error(err));
    }

    fn on_logged_in(&mut self, result: Outcome<SessionUser>) {
        self.state.login.busy = false;
        match result {
            Ok(user) => {
                self.state.login.message = None;
                self.state.login.form.set("password", "");
                self.state
                    .show_toast(ToastLevel::Success, format!("Welcome, {}", user.username));
                self.state.user = Some(user);
                self.navigate(Route::Dashboard);
            }
            Err(err) => {
                self.state.login.error(login_message_for_error(&err));
            }
        }
    }

    fn on_registered(&mut self, result: Outcome<RegisterResponse>) {
        self.state.register.busy = false;
        match result {
            Ok(created) => {
                self.state.register.form = forms::Form::new(forms::REGISTER_FIELDS);
                self.state.register.message = None;
                self.state.login.form = forms::Form::new(forms::LOGIN_FIELDS)
                    .with("username", created.username.clone());
                self.state
                    .login
                    .info(format!("Account {} created, please log in.", created.username));
                self.navigate(Route::Login);
            }
            Err(ClientError::Validation(errors)) => {
                self.state.register.form.errors = errors;
            }
            Err(err) => {
                self.state.register.error(message_for_error(&err));
            }
        }
    }

    fn on_transaction_saved(&mut self, result: Outcome<Transaction>) {
        let modal = &mut self.state.transactions.modal;
        match result {
            Ok(tx) => {
                let verb = if modal.editing().is_some() {
                    "updated"
                } else {
                    "added"
                };
                modal.close();
                self.state
                    .show_toast(ToastLevel::Success, format!("Transaction {} {verb}", tx.name));
                let req = self.state.transactions.reload();
                self.load_transactions(req);
            }
            Err(ClientError::Validation(errors)) => modal.reject(errors),
            Err(err) => {
                modal.reject(FieldErrors::new());
                self.toast_error(&err);
            }
        }
    }

    fn on_recurring_saved(
        &mut self,
        result: Outcome<RecurringTransaction>,
    ) {
        let modal = &mut self.state.recurring.modal;
        match result {
            Ok(item) => {
                let verb = if modal.editing().is_some() {
                    "updated"
                } else {
                    "scheduled"
                };
                modal.close();
                self.state
                    .show_toast(ToastLevel::Success, format!("{} {verb}", item.name));
                self.load_recurring();
            }
            Err(ClientError::Validation(errors)) => modal.reject(errors),
            Err(err) => {
                modal.reject(FieldErrors::new());
                self.toast_error(&err);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key, self.state.is_editing_text());
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::None => {}
            _ => match self.state.route {
                Route::Login => self.handle_login_key(action),
                Route::Register => self.handle_register_key(action),
                Route::Dashboard => self.handle_dashboard_key(action),
                Route::Transactions => self.handle_transactions_key(action),
                Route::Recurring => self.handle_recurring_key(action),
                Route::Categories | Route::Profile => {
                    if let AppAction::Input(ch) = action {
                        self.handle_global_key(ch);
                    }
                }
            },
        }
    }

    /// Section switching and other keys that work on every private page.
    fn handle_global_key(&mut self, ch: char) -> bool {
        match ch {
            'd' => self.navigate(Route::Dashboard),
            't' => self.navigate(Route::Transactions),
            'r' => self.navigate(Route::Recurring),
            'c' => self.navigate(Route::Categories),
            'p' => self.navigate(Route::Profile),
            'g' => self.load_route(),
            'o' => self.logout(),
            _ => return false,
        }
        true
    }

    fn logout(&mut self) {
        self.api.auth().logout();
        self.state.reset_session_data();
        self.state.login.info("Logged out.");
        self.navigate(Route::Login);
    }

    fn handle_login_key(&mut self, action: AppAction) {
        let login = &mut self.state.login;
        if login.busy {
            return;
        }
        match action {
            AppAction::NextField => login.form.next_field(),
            AppAction::PrevField => login.form.prev_field(),
            AppAction::Backspace => login.form.backspace(),
            AppAction::Input(ch) => login.form.input(ch),
            AppAction::SwitchAuth => self.navigate(Route::Register),
            AppAction::Submit => self.submit_login(),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let form = &self.state.login.form;
        let username = form.value("username").trim().to_string();
        let password = form.value("password").to_string();
        if username.is_empty() || password.is_empty() {
            self.state.login.error("Enter username and password.");
            return;
        }

        self.state.login.busy = true;
        self.state.login.message = None;
        self.spawn(move |api| async move {
            AppEvent::LoggedIn(api.auth().login(&username, &password).await)
        });
    }

    fn handle_register_key(&mut self, action: AppAction) {
        let register = &mut self.state.register;
        if register.busy {
            return;
        }
        match action {
            AppAction::NextField => register.form.next_field(),
            AppAction::PrevField => register.form.prev_field(),
            AppAction::Backspace => register.form.backspace(),
            AppAction::Input(ch) => register.form.input(ch),
            AppAction::SwitchAuth | AppAction::Cancel => self.navigate(Route::Login),
            AppAction::Submit => self.submit_register(),
            _ => {}
        }
    }

    fn submit_register(&mut self) {
        let register = &mut self.state.register;
        let reg = match forms::registration(&register.form) {
            Ok(reg) => reg,
            Err(errors) => {
                register.form.errors = errors;
                return;
            }
        };

        register.form.errors = FieldErrors::new();
        register.message = None;
        register.busy = true;
        self.spawn(move |api| async move {
            let result = api
                .auth()
                .register(&reg.username, &reg.password, &reg.confirm_password, reg.balance)
                .await;
            AppEvent::Registered(result)
        });
    }

    fn handle_dashboard_key(&mut self, action: AppAction) {
        let dashboard = &mut self.state.dashboard;
        if let Some(editor) = dashboard.range_editor.as_mut() {
            match action {
                AppAction::Cancel => dashboard.range_editor = None,
                AppAction::NextField => editor.next_field(),
                AppAction::PrevField => editor.prev_field(),
                AppAction::Backspace => editor.backspace(),
                AppAction::Input(ch) => editor.input(ch),
                AppAction::Submit => match forms::date_range(editor) {
                    Ok((from, to)) => {
                        dashboard.from = from;
                        dashboard.to = to;
                        dashboard.range_editor = None;
                        self.load_dashboard();
                    }
                    Err(errors) => editor.errors = errors,
                },
                _ => {}
            }
            return;
        }

        if let AppAction::Input(ch) = action
            && !self.handle_global_key(ch)
            && ch == '/'
        {
            let dashboard = &mut self.state.dashboard;
            dashboard.range_editor = Some(forms::date_range_form(dashboard.from, dashboard.to));
        }
    }

    fn handle_transactions_key(&mut self, action: AppAction) {
        if self.state.transactions.filter_panel.is_some() {
            self.handle_filter_panel_key(action);
            return;
        }
        if self.state.transactions.modal.is_open() {
            self.handle_transaction_modal_key(action);
            return;
        }
        if let Some(id) = self.state.transactions.confirm_delete.take() {
            if action == AppAction::Input('y') {
                self.delete_transaction(id);
            }
            return;
        }

        let page = &mut self.state.transactions;
        match action {
            AppAction::Up => page.select_prev(),
            AppAction::Down => page.select_next(),
            AppAction::Left => page.prev_page(),
            AppAction::Right => page.next_page(),
            AppAction::Delete => {
                page.confirm_delete = page.selected_transaction().map(|tx| tx.id);
            }
            AppAction::Input(ch) => match ch {
                'j' => page.select_next(),
                'k' => page.select_prev(),
                'n' => page.next_page(),
                'b' => page.prev_page(),
                '/' => page.filter_panel = Some(forms::filter_form(page.filters())),
                'z' => {
                    if let Some(req) = page.clear_filters() {
                        self.load_transactions(req);
                    }
                }
                'a' => page.modal = FormModal::open(None, forms::transaction_form(None)),
                'e' => {
                    let selected = page
                        .selected_transaction()
                        .map(|tx| (tx.id, forms::transaction_form(Some(tx))));
                    if let Some((id, form)) = selected {
                        page.modal = FormModal::open(Some(id), form);
                    }
                }
                other => {
                    self.handle_global_key(other);
                }
            },
            _ => {}
        }
    }

    fn handle_filter_panel_key(&mut self, action: AppAction) {
        let categories = self.state.known_categories().to_vec();
        let page = &mut self.state.transactions;
        let Some(panel) = page.filter_panel.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => page.filter_panel = None,
            AppAction::NextField | AppAction::Down => panel.next_field(),
            AppAction::PrevField | AppAction::Up => panel.prev_field(),
            AppAction::Backspace => panel.backspace(),
            AppAction::Input(ch) => panel.input(ch),
            AppAction::Submit => match forms::filters(panel, &categories) {
                Ok(filters) => {
                    page.filter_panel = None;
                    if let Some(req) = page.set_filters(filters) {
                        self.load_transactions(req);
                    }
                }
                Err(errors) => panel.errors = errors,
            },
            _ => {}
        }
    }

    fn handle_transaction_modal_key(&mut self, action: AppAction) {
        if action == AppAction::Cancel {
            if !self.state.transactions.modal.is_submitting() {
                self.state.transactions.modal.close();
            }
            return;
        }
        let Some(form) = self.state.transactions.modal.form_mut() else {
            return;
        };
        match action {
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::PrevField | AppAction::Up => form.prev_field(),
            AppAction::Backspace => form.backspace(),
            AppAction::Input(ch) => form.input(ch),
            AppAction::Submit => self.submit_transaction(),
            _ => {}
        }
    }

    fn submit_transaction(&mut self) {
        let categories = self.state.known_categories().to_vec();
        let modal = &mut self.state.transactions.modal;
        let Some(form) = modal.form_mut() else {
            return;
        };
        let req = match forms::transaction_request(form, &categories) {
            Ok(req) => req,
            Err(errors) => {
                form.errors = errors;
                return;
            }
        };

        let editing = modal.editing();
        modal.begin_submit();
        self.spawn(move |api| async move {
            let result = match editing {
                Some(id) => api.transactions().update(id, &req).await,
                None => api.transactions().create(&req).await,
            };
            AppEvent::TransactionSaved(result)
        });
    }

    fn delete_transaction(&mut self, id: i64) {
        self.state.transactions.deleting = Some(id);
        self.spawn(move |api| async move {
            let result = api.transactions().delete(id).await;
            AppEvent::TransactionDeleted { id, result }
        });
    }

    fn handle_recurring_key(&mut self, action: AppAction) {
        if self.state.recurring.modal.is_open() {
            self.handle_recurring_modal_key(action);
            return;
        }
        if let Some(id) = self.state.recurring.confirm_delete.take() {
            if action == AppAction::Input('y') {
                self.delete_recurring(id);
            }
            return;
        }

        let page = &mut self.state.recurring;
        match action {
            AppAction::Up => page.select_prev(),
            AppAction::Down => page.select_next(),
            AppAction::Delete => {
                page.confirm_delete = page.selected_item().map(|item| item.id);
            }
            AppAction::Input(ch) => match ch {
                'j' => page.select_next(),
                'k' => page.select_prev(),
                'a' => page.modal = FormModal::open(None, forms::recurring_form(None)),
                'e' => {
                    let selected = page
                        .selected_item()
                        .map(|item| (item.id, forms::recurring_form(Some(item))));
                    if let Some((id, form)) = selected {
                        page.modal = FormModal::open(Some(id), form);
                    }
                }
                other => {
                    self.handle_global_key(other);
                }
            },
            _ => {}
        }
    }

    fn handle_recurring_modal_key(&mut self, action: AppAction) {
        if action == AppAction::Cancel {
            if !self.state.recurring.modal.is_submitting() {
                self.state.recurring.modal.close();
            }
            return;
        }
        let Some(form) = self.state.recurring.modal.form_mut() else {
            return;
        };
        match action {
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::PrevField | AppAction::Up => form.prev_field(),
            AppAction::Backspace => form.backspace(),
            AppAction::Input(ch) => form.input(ch),
            AppAction::Submit => self.submit_recurring(),
            _ => {}
        }
    }

    fn submit_recurring(&mut self) {
        let categories = self.state.known_categories().to_vec();
        let modal = &mut self.state.recurring.modal;
        let Some(form) = modal.form_mut() else {
            return;
        };
        let req = match forms::recurring_request(form, &categories) {
            Ok(req) => req,
            Err(errors) => {
                form.errors = errors;
                return;
            }
        };

        let editing = modal.editing();
        modal.begin_submit();
        self.spawn(move |api| async move {
            let result = match editing {
                Some(id) => api.recurring().update(id, &req).await,
                None => api.recurring().create(&req).await,
            };
            AppEvent::RecurringSaved(result)
        });
    }

    fn delete_recurring(&mut self, id: i64) {
        self.state.recurring.deleting = Some(id);
        self.spawn(move |api| async move {
            let result = api.recurring().delete(id).await;
            AppEvent::RecurringDeleted { id, result }
        });
    }
}

pub fn message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Validation(errors) => format!("Invalid input: {errors}"),
        ClientError::Unauthorized => "Your session is no longer valid.".to_string(),
        ClientError::Forbidden => "You are not allowed to do that.".to_string(),
        ClientError::NotFound(message) => format!("Not found: {message}"),
        ClientError::Http { status, message } => {
            format!("Server error ({}): {message}", status.as_u16())
        }
        ClientError::Timeout => "The server took too long to answer.".to_string(),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
        ClientError::NoSession => "You are not logged in.".to_string(),
        ClientError::Storage(message) => format!("Could not save the session: {message}"),
        ClientError::InvalidBaseUrl(message) => format!("Bad server address: {message}"),
    }
}

fn login_message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => {
            "Invalid username or password.".to_string()
        }
        other => message_for_error(other),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fintrack_client::{MemoryStorage, SessionStore};

    use super::*;

    fn app_with(storage: MemoryStorage) -> App {
        let api = Api::new(
            "http://127.0.0.1:9/api/",
            Duration::from_secs(1),
            SessionStore::new(storage),
        )
        .unwrap();
        let mut app = App::new(&AppConfig::default(), api);
        app.state.user = app.api.session().current_user();
        app
    }

    fn logged_in_app() -> App {
        app_with(
            MemoryStorage::new()
                .with_entry("token", "t0k3n")
                .with_entry("user", r#"{"username":"alice"}"#),
        )
    }

    #[test]
    fn failed_delete_keeps_the_list() {
        let mut app = logged_in_app();
        app.state.route = Route::Transactions;
        let req = app.state.transactions.reload();
        app.state.transactions.apply(
            req.ticket,
            Ok(TransactionPage {
                transactions_count: 3,
                ..Default::default()
            }),
        );
        app.state.transactions.deleting = Some(9);

        app.handle_event(AppEvent::TransactionDeleted {
            id: 9,
            result: Err(ClientError::NotFound("transaction 9".to_string())),
        });

        assert_eq!(app.state.transactions.deleting, None);
        let count = app
            .state
            .transactions
            .list
            .data()
            .map(|page| page.transactions_count);
        assert_eq!(count, Some(3));
        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toast.message.contains("transaction 9"));
        assert_eq!(app.state.route, Route::Transactions);
    }

    #[test]
    fn rejected_token_on_load_ends_the_session() {
        let mut app = logged_in_app();
        app.state.route = Route::Dashboard;
        let ticket = app.state.dashboard.stats.begin();

        app.handle_event(AppEvent::Dashboard {
            ticket,
            result: Err(ClientError::Unauthorized),
        });

        assert_eq!(app.state.route, Route::Login);
        assert!(app.state.user.is_none());
        assert!(!app.api.session().is_authenticated());
        assert_eq!(app.api.session().token(), None);
        let (level, message) = app.state.login.message.clone().unwrap();
        assert_eq!(level, ToastLevel::Error);
        assert_eq!(message, "Session expired, please log in again.");
    }

    fn bob() -> SessionUser {
        SessionUser {
            username: "bob".to_string(),
        }
    }

    /// Logs alice out and bob in, returning alice's session epoch.
    fn switch_to_bob(app: &mut App) -> u64 {
        let alice_epoch = app.state.session_epoch;
        app.logout();
        app.api.session().establish("bob-token", bob()).unwrap();
        app.on_logged_in(Ok(bob()));
        alice_epoch
    }

    fn assert_bob_still_logged_in(app: &App) {
        assert_eq!(app.state.route, Route::Dashboard);
        assert_eq!(app.state.user, Some(bob()));
        assert!(app.api.session().is_authenticated());
        assert_eq!(app.api.session().token().as_deref(), Some("bob-token"));
    }

    #[tokio::test]
    async fn late_rejection_from_previous_session_keeps_new_session() {
        let mut app = logged_in_app();
        app.state.route = Route::Transactions;
        let alice_req = app.state.transactions.reload();
        let alice_epoch = switch_to_bob(&mut app);

        app.deliver(
            alice_epoch,
            AppEvent::Transactions {
                ticket: alice_req.ticket,
                result: Err(ClientError::Unauthorized),
            },
        );

        assert_bob_still_logged_in(&app);
    }

    #[tokio::test]
    async fn write_results_from_previous_session_are_dropped() {
        let mut app = logged_in_app();
        let alice_epoch = switch_to_bob(&mut app);
        app.state.toast = None;

        let events = [
            AppEvent::TransactionSaved(Err(ClientError::Unauthorized)),
            AppEvent::TransactionDeleted {
                id: 1,
                result: Err(ClientError::Unauthorized),
            },
            AppEvent::RecurringSaved(Err(ClientError::Unauthorized)),
            AppEvent::RecurringDeleted {
                id: 2,
                result: Err(ClientError::Unauthorized),
            },
        ];
        for event in events {
            app.deliver(alice_epoch, event);
        }

        assert!(app.state.toast.is_none());
        assert_bob_still_logged_in(&app);
    }

    #[test]
    fn superseded_load_failure_has_no_side_effects() {
        let mut app = logged_in_app();
        app.state.route = Route::Profile;
        let old = app.state.profile.begin();
        let _newer = app.state.profile.begin();
        let epoch = app.state.session_epoch;

        app.deliver(
            epoch,
            AppEvent::Profile {
                ticket: old,
                result: Err(ClientError::Unauthorized),
            },
        );

        assert_eq!(app.state.route, Route::Profile);
        assert!(app.api.session().is_authenticated());
        assert!(app.state.profile.state.is_loading());
    }

    #[test]
    fn private_routes_need_a_session() {
        let mut app = app_with(MemoryStorage::new());
        app.navigate(Route::Profile);
        assert_eq!(app.state.route, Route::Login);
    }

    #[test]
    fn login_rejection_reads_as_bad_credentials() {
        assert_eq!(
            login_message_for_error(&ClientError::Unauthorized),
            "Invalid username or password."
        );
        assert_eq!(
            login_message_for_error(&ClientError::Timeout),
            "The server took too long to answer."
        );
    }

    #[test]
    fn field_errors_are_listed() {
        let mut errors = FieldErrors::new();
        errors.add("amount", "Amount must be greater than 0");
        assert_eq!(
            message_for_error(&ClientError::Validation(errors)),
            "Invalid input: amount: Amount must be greater than 0"
        );
    }
}
