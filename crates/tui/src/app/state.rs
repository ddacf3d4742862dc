use std::time::{Duration, Instant};

use api_types::{
    auth::SessionUser,
    category::Category,
    dashboard::DashboardStats,
    recurring::RecurringTransaction,
    transaction::{Transaction, TransactionFilters, TransactionPage},
    user::Profile,
};
use chrono::{DateTime, Local, NaiveDate};
use fintrack_client::FieldErrors;

use super::forms::{Form, LOGIN_FIELDS, REGISTER_FIELDS};

pub const PAGE_SIZE: usize = 10;
const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Transactions,
    Recurring,
    Categories,
    Profile,
}

impl Route {
    /// Sections reachable from the tab bar, in display order.
    pub const SECTIONS: [Route; 5] = [
        Route::Dashboard,
        Route::Transactions,
        Route::Recurring,
        Route::Categories,
        Route::Profile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Dashboard => "Dashboard",
            Self::Transactions => "Transactions",
            Self::Recurring => "Recurring",
            Self::Categories => "Categories",
            Self::Profile => "Profile",
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// Where a navigation request actually lands.
///
/// Private routes need a session; public ones are skipped once logged in.
pub fn guard(requested: Route, has_session: bool) -> Route {
    match (requested.is_public(), has_session) {
        (false, false) => Route::Login,
        (true, true) => Route::Dashboard,
        _ => requested,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Monotonic request counter. Only the response to the latest ticket is
/// allowed to update the page.
#[derive(Debug, Default, Clone, Copy)]
pub struct Generation(u64);

impl Generation {
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0 == ticket
    }
}

/// Data loaded by a single request, together with its staleness guard.
#[derive(Debug)]
pub struct Resource<T> {
    pub state: LoadState<T>,
    generation: Generation,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            generation: Generation::default(),
        }
    }
}

impl<T> Resource<T> {
    /// Marks the resource as loading and returns the ticket of the new request.
    pub fn begin(&mut self) -> u64 {
        self.state = LoadState::Loading;
        self.generation.next()
    }

    /// Applies a response. Returns `false`, changing nothing, when a newer
    /// request has been issued since `ticket`.
    pub fn finish(&mut self, ticket: u64, result: Result<T, String>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("dropping stale response {ticket}");
            return false;
        }
        self.state = match result {
            Ok(data) => LoadState::Loaded(data),
            Err(message) => LoadState::Failed(message),
        };
        true
    }

    /// Whether `ticket` belongs to the latest request.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.is_current(ticket)
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }

    /// Back to `Idle`. Requests still in flight become stale.
    pub fn reset(&mut self) {
        self.state = LoadState::Idle;
        self.generation.next();
    }
}

/// Dialog lifecycle shared by the create/edit forms.
#[derive(Debug, Default)]
pub enum FormModal {
    #[default]
    Closed,
    Open { editing: Option<i64>, form: Form },
    Submitting { editing: Option<i64>, form: Form },
}

impl FormModal {
    pub fn open(editing: Option<i64>, form: Form) -> Self {
        Self::Open { editing, form }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    pub fn form(&self) -> Option<&Form> {
        match self {
            Self::Closed => None,
            Self::Open { form, .. } | Self::Submitting { form, .. } => Some(form),
        }
    }

    /// The form, while it still accepts input.
    pub fn form_mut(&mut self) -> Option<&mut Form> {
        match self {
            Self::Open { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn editing(&self) -> Option<i64> {
        match self {
            Self::Closed => None,
            Self::Open { editing, .. } | Self::Submitting { editing, .. } => *editing,
        }
    }

    /// `Open` to `Submitting`. Returns `false` in any other state.
    pub fn begin_submit(&mut self) -> bool {
        match std::mem::take(self) {
            Self::Open { editing, mut form } => {
                form.errors = FieldErrors::new();
                *self = Self::Submitting { editing, form };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Back to `Open` after a rejected submission, keeping the input.
    pub fn reject(&mut self, errors: FieldErrors) {
        if let Self::Submitting { editing, mut form } = std::mem::take(self) {
            form.errors = errors;
            *self = Self::Open { editing, form };
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }
}

/// Request for the transaction list, tagged with its generation ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub ticket: u64,
    pub filters: TransactionFilters,
}

#[derive(Debug, Default)]
pub struct TransactionsPage {
    filters: TransactionFilters,
    pub list: Resource<TransactionPage>,
    page: usize,
    selected: usize,
    pub filter_panel: Option<Form>,
    pub modal: FormModal,
    pub confirm_delete: Option<i64>,
    pub deleting: Option<i64>,
}

impl TransactionsPage {
    pub fn filters(&self) -> &TransactionFilters {
        &self.filters
    }

    /// Issues a list request with the current filters.
    pub fn reload(&mut self) -> ListRequest {
        ListRequest {
            ticket: self.list.begin(),
            filters: self.filters.clone(),
        }
    }

    /// Replaces the filter set. A change resets to the first page and yields
    /// exactly one request; an identical set yields none.
    pub fn set_filters(&mut self, filters: TransactionFilters) -> Option<ListRequest> {
        if filters == self.filters {
            return None;
        }
        self.filters = filters;
        self.page = 0;
        self.selected = 0;
        Some(self.reload())
    }

    /// Changes a single filter field, keeping the others.
    pub fn update_filter(
        &mut self,
        change: impl FnOnce(&mut TransactionFilters),
    ) -> Option<ListRequest> {
        let mut filters = self.filters.clone();
        change(&mut filters);
        self.set_filters(filters)
    }

    pub fn clear_filters(&mut self) -> Option<ListRequest> {
        self.set_filters(TransactionFilters::default())
    }

    pub fn apply(&mut self, ticket: u64, result: Result<TransactionPage, String>) {
        if self.list.finish(ticket, result) {
            self.page = self.page.min(self.page_count().saturating_sub(1));
            self.selected = self.selected.min(self.visible().len().saturating_sub(1));
        }
    }

    fn items(&self) -> &[Transaction] {
        self.list
            .data()
            .map(|page| page.transactions.as_slice())
            .unwrap_or(&[])
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.items().len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Rows of the current page.
    pub fn visible(&self) -> &[Transaction] {
        let items = self.items();
        let start = (self.page * PAGE_SIZE).min(items.len());
        let end = (start + PAGE_SIZE).min(items.len());
        &items[start..end]
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.visible().get(self.selected)
    }

    pub fn reset(&mut self) {
        let mut list = std::mem::take(&mut self.list);
        list.reset();
        *self = Self {
            list,
            ..Self::default()
        };
    }
}

#[derive(Debug, Default)]
pub struct RecurringPage {
    pub list: Resource<Vec<RecurringTransaction>>,
    selected: usize,
    pub modal: FormModal,
    pub confirm_delete: Option<i64>,
    pub deleting: Option<i64>,
}

impl RecurringPage {
    pub fn items(&self) -> &[RecurringTransaction] {
        self.list.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn apply(&mut self, ticket: u64, result: Result<Vec<RecurringTransaction>, String>) {
        if self.list.finish(ticket, result) {
            self.selected = self.selected.min(self.items().len().saturating_sub(1));
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let len = self.items().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&RecurringTransaction> {
        self.items().get(self.selected)
    }

    pub fn reset(&mut self) {
        let mut list = std::mem::take(&mut self.list);
        list.reset();
        *self = Self {
            list,
            ..Self::default()
        };
    }
}

#[derive(Debug, Default)]
pub struct DashboardPage {
    pub stats: Resource<DashboardStats>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub range_editor: Option<Form>,
}

impl DashboardPage {
    /// Applies a response; the range the server actually used becomes the
    /// range shown and sent next time.
    pub fn apply(&mut self, ticket: u64, result: Result<DashboardStats, String>) {
        if self.stats.finish(ticket, result)
            && let Some(stats) = self.stats.data()
        {
            self.from = stats.from.or(self.from);
            self.to = stats.to.or(self.to);
        }
    }

    pub fn reset(&mut self) {
        let mut stats = std::mem::take(&mut self.stats);
        stats.reset();
        *self = Self {
            stats,
            ..Self::default()
        };
    }
}

#[derive(Debug)]
pub struct AuthForm {
    pub form: Form,
    pub busy: bool,
    pub message: Option<(ToastLevel, String)>,
}

impl AuthForm {
    fn new(form: Form) -> Self {
        Self {
            form,
            busy: false,
            message: None,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.message = Some((ToastLevel::Info, message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.message = Some((ToastLevel::Error, message.into()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub route: Route,
    pub user: Option<SessionUser>,
    pub base_url: String,
    pub login: AuthForm,
    pub register: AuthForm,
    pub dashboard: DashboardPage,
    pub transactions: TransactionsPage,
    pub recurring: RecurringPage,
    pub categories: Resource<Vec<Category>>,
    pub profile: Resource<Profile>,
    pub toast: Option<ToastState>,
    pub last_refresh: Option<DateTime<Local>>,
    /// Bumped whenever the session ends. Requests remember the epoch they
    /// were issued in.
    pub session_epoch: u64,
}

impl AppState {
    pub fn new(base_url: impl Into<String>, username: &str) -> Self {
        Self {
            route: Route::Login,
            user: None,
            base_url: base_url.into(),
            login: AuthForm::new(Form::new(LOGIN_FIELDS).with("username", username)),
            register: AuthForm::new(Form::new(REGISTER_FIELDS)),
            dashboard: DashboardPage::default(),
            transactions: TransactionsPage::default(),
            recurring: RecurringPage::default(),
            categories: Resource::default(),
            profile: Resource::default(),
            toast: None,
            last_refresh: None,
            session_epoch: 0,
        }
    }

    pub fn known_categories(&self) -> &[Category] {
        self.categories.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drops everything tied to the previous session. Responses to its
    /// requests are ignored from here on.
    pub fn reset_session_data(&mut self) {
        self.user = None;
        self.dashboard.reset();
        self.transactions.reset();
        self.recurring.reset();
        self.categories.reset();
        self.profile.reset();
        self.last_refresh = None;
        self.session_epoch += 1;
    }

    /// Whether keystrokes should go to a text field instead of hotkeys.
    pub fn is_editing_text(&self) -> bool {
        match self.route {
            Route::Login | Route::Register => true,
            Route::Dashboard => self.dashboard.range_editor.is_some(),
            Route::Transactions => {
                self.transactions.filter_panel.is_some() || self.transactions.modal.is_open()
            }
            Route::Recurring => self.recurring.modal.is_open(),
            Route::Categories | Route::Profile => false,
        }
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.expires_at <= now) {
            self.toast = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::{Amount, CategoryType, category::Category};
    use chrono::NaiveDateTime;

    use super::*;
    use crate::app::forms::{TRANSACTION_FIELDS, filter_form, filters};

    fn transaction(id: i64) -> Transaction {
        Transaction {
            id,
            user: None,
            category: Category {
                id: 1,
                name: "GROCERIES".to_string(),
                kind: CategoryType::Expense,
            },
            name: format!("item {id}"),
            amount: Amount::new(100 * id),
            datetime: NaiveDateTime::parse_from_str("2025-01-10 08:30:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            payment_mode: Some("CASH".to_string()),
            note: None,
        }
    }

    fn page_of(count: i64) -> TransactionPage {
        TransactionPage {
            transactions_count: count as u64,
            transactions: (1..=count).map(transaction).collect(),
            ..Default::default()
        }
    }

    fn loaded(count: i64) -> TransactionsPage {
        let mut page = TransactionsPage::default();
        let req = page.reload();
        page.apply(req.ticket, Ok(page_of(count)));
        page
    }

    #[test]
    fn guard_redirects_by_session() {
        assert_eq!(guard(Route::Transactions, false), Route::Login);
        assert_eq!(guard(Route::Register, false), Route::Register);
        assert_eq!(guard(Route::Login, true), Route::Dashboard);
        assert_eq!(guard(Route::Register, true), Route::Dashboard);
        assert_eq!(guard(Route::Profile, true), Route::Profile);
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut resource = Resource::<u32>::default();
        let first = resource.begin();
        let second = resource.begin();

        assert!(!resource.finish(first, Ok(1)));
        assert!(resource.state.is_loading());
        assert!(resource.finish(second, Ok(2)));
        assert_eq!(resource.data(), Some(&2));
    }

    #[test]
    fn failure_is_kept_as_message() {
        let mut resource = Resource::<u32>::default();
        let ticket = resource.begin();
        resource.finish(ticket, Err("Server unreachable".to_string()));
        assert_eq!(
            resource.state,
            LoadState::Failed("Server unreachable".to_string())
        );
    }

    #[test]
    fn each_filter_change_issues_one_request_with_all_filters() {
        let mut page = loaded(3);
        page.update_filter(|f| f.category_type = Some(CategoryType::Expense))
            .unwrap();

        let req = page
            .update_filter(|f| f.name = Some("bread".to_string()))
            .unwrap();
        assert_eq!(req.filters.category_type, Some(CategoryType::Expense));
        assert_eq!(req.filters.name.as_deref(), Some("bread"));
        assert_eq!(&req.filters, page.filters());
        assert!(page.list.state.is_loading());

        assert!(page
            .update_filter(|f| f.name = Some("bread".to_string()))
            .is_none());
    }

    #[test]
    fn applying_the_filter_panel_changes_only_what_was_edited() {
        let mut page = loaded(3);
        page.update_filter(|f| f.payment_mode = Some("CASH".to_string()));

        let mut form = filter_form(page.filters());
        form.set("minAmount", "10");
        let req = page.set_filters(filters(&form, &[]).unwrap()).unwrap();
        assert_eq!(req.filters.payment_mode.as_deref(), Some("CASH"));
        assert_eq!(req.filters.min_amount, Some(Amount::new(1_000)));
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let mut page = loaded(25);
        page.next_page();
        page.next_page();
        assert_eq!(page.page(), 2);

        page.update_filter(|f| f.note = Some("gift".to_string()));
        assert_eq!(page.page(), 0);
    }

    #[test]
    fn pagination_is_local() {
        let mut page = loaded(25);
        assert_eq!(page.page_count(), 3);
        assert_eq!(page.visible().len(), 10);

        page.next_page();
        page.next_page();
        page.next_page();
        assert_eq!(page.page(), 2);
        assert_eq!(page.visible().len(), 5);
        assert_eq!(page.visible()[0].id, 21);
        assert!(page.list.data().is_some());

        page.prev_page();
        assert_eq!(page.visible()[0].id, 11);
    }

    #[test]
    fn stale_list_does_not_overwrite_newer_filters() {
        let mut page = TransactionsPage::default();
        let old = page.reload();
        let new = page
            .update_filter(|f| f.category_type = Some(CategoryType::Income))
            .unwrap();

        page.apply(new.ticket, Ok(page_of(2)));
        page.apply(old.ticket, Ok(page_of(30)));
        assert_eq!(page.visible().len(), 2);
        assert_eq!(page.page_count(), 1);
    }

    #[test]
    fn selection_stays_within_page() {
        let mut page = loaded(12);
        for _ in 0..20 {
            page.select_next();
        }
        assert_eq!(page.selected(), 9);
        page.next_page();
        assert_eq!(page.selected(), 0);
        page.select_next();
        page.select_next();
        assert_eq!(page.selected_transaction().map(|t| t.id), Some(12));
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let page = loaded(0);
        assert_eq!(page.page_count(), 1);
        assert!(page.visible().is_empty());
        assert!(page.selected_transaction().is_none());
    }

    #[test]
    fn modal_goes_back_to_open_on_rejection() {
        let mut modal = FormModal::open(Some(4), Form::new(TRANSACTION_FIELDS).with("name", "x"));
        assert!(modal.begin_submit());
        assert!(modal.is_submitting());
        assert!(modal.form_mut().is_none());
        assert!(!modal.begin_submit());

        let mut errors = FieldErrors::new();
        errors.add("name", "Name of transaction is required");
        modal.reject(errors);
        assert_eq!(modal.editing(), Some(4));
        let form = modal.form_mut().unwrap();
        assert_eq!(form.value("name"), "x");
        assert!(form.error("name").is_some());

        modal.close();
        assert!(!modal.is_open());
    }

    #[test]
    fn dashboard_adopts_server_range() {
        let mut page = DashboardPage::default();
        let ticket = page.stats.begin();
        page.apply(
            ticket,
            Ok(DashboardStats {
                from: NaiveDate::from_ymd_opt(2025, 1, 1),
                to: NaiveDate::from_ymd_opt(2025, 1, 31),
                ..Default::default()
            }),
        );
        assert_eq!(page.from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(page.to, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn responses_from_previous_session_are_ignored() {
        let mut state = AppState::new("http://localhost:8080/api", "");
        let old = state.transactions.reload();
        state.reset_session_data();
        let new = state.transactions.reload();

        state.transactions.apply(old.ticket, Ok(page_of(5)));
        assert!(state.transactions.list.state.is_loading());
        state.transactions.apply(new.ticket, Ok(page_of(1)));
        assert_eq!(state.transactions.visible().len(), 1);
    }

    #[test]
    fn session_reset_moves_to_a_new_epoch() {
        let mut state = AppState::new("http://localhost:8080/api", "");
        let before = state.session_epoch;
        let ticket = state.categories.begin();
        state.reset_session_data();
        assert_ne!(state.session_epoch, before);
        assert!(!state.categories.is_current(ticket));
    }

    #[test]
    fn toast_expires() {
        let mut state = AppState::new("http://localhost:8080/api", "");
        state.show_toast(ToastLevel::Info, "saved");
        state.expire_toast(Instant::now());
        assert!(state.toast.is_some());
        state.expire_toast(Instant::now() + TOAST_TTL);
        assert!(state.toast.is_none());
    }

    #[test]
    fn text_entry_depends_on_route_and_dialogs() {
        let mut state = AppState::new("http://localhost:8080/api", "");
        assert!(state.is_editing_text());

        state.route = Route::Transactions;
        assert!(!state.is_editing_text());
        state.transactions.modal = FormModal::open(None, Form::new(TRANSACTION_FIELDS));
        assert!(state.is_editing_text());
    }
}
