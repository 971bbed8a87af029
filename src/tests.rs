use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::app::{build_backends, switch_backends};
use crate::config::{default_db_path, AppConfig, DataSourceKind};
use crate::domain::entities::alarm::{format_call_id, Alarm};
use crate::domain::entities::draft::{parse_timestamp, Draft};
use crate::domain::entities::query::{page_count, InvalidQuery, PageResult, Query, SortDirection};
use crate::domain::entities::record::{collate, Record};
use crate::domain::entities::task::{Task, TaskStatus};
use crate::domain::entities::user::{avatar_for, User, UserPayload};
use crate::ensure_webview_data_dir;
use crate::infra::http::repo::{query_params, HttpConfig, HttpRepository};
use crate::infra::memory::repo::MemoryRepository;
use crate::infra::memory::seed::{parse_records, seed_alarms, seed_tasks, seed_users};
use crate::infra::sqlite::repo::SqliteRepository;
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::ui::screens::alarms::{alarm_screen, format_duration};
use crate::ui::screens::users::user_screen;
use crate::ui::state::collection_state::{CollectionState, EditState, FetchOutcome, FilterChange};
use crate::ui::styles::{root_container_style, table_container_style, table_header_cell_style};
use crate::ui::view::{
    create_view, filter_views, pagination_view, table_view, BodyState, InputKind,
};
use crate::usecase::ports::repo::{RepoError, Repository};
use crate::usecase::services::fetch_guard::{Debouncer, RequestSequencer};
use crate::usecase::services::query_service::{field_options, run_query};

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("admin-console-{prefix}-{nanos}"))
}

trait QueryBuilder {
    fn with_page(self, page: u32) -> Self;
    fn with_sort(self, field: &str, direction: SortDirection) -> Self;
    fn with_filter(self, field: &str, value: impl Into<String>) -> Self;
}

impl QueryBuilder for Query {
    fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort_field = field.to_string();
        self.sort_direction = direction;
        self
    }

    fn with_filter(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.insert(field.to_string(), value.into());
        self
    }
}

trait DraftBuilder {
    fn with(self, field: &str, value: &str) -> Self;
}

impl DraftBuilder for Draft {
    fn with(mut self, field: &str, value: &str) -> Self {
        self.set(field, value);
        self
    }
}

fn users() -> Vec<User> {
    seed_users().expect("user fixtures should parse")
}

fn alarms() -> Vec<Alarm> {
    seed_alarms().expect("alarm fixtures should parse")
}

fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("user{id}@example.com"),
        role: "User".to_string(),
        avatar: avatar_for(id),
    }
}

fn ids(page: &PageResult<User>) -> Vec<i64> {
    page.items.iter().map(|user| user.id).collect()
}

fn call_ids(page: &PageResult<Alarm>) -> Vec<String> {
    page.items.iter().map(|alarm| alarm.call_id.clone()).collect()
}

fn user_draft(name: &str, email: &str, role: &str) -> Draft {
    Draft::default()
        .with("name", name)
        .with("email", email)
        .with("role", role)
}

fn alarm_draft() -> Draft {
    Draft::blank_for::<Alarm>()
        .with("caller_number", "+15550001111")
        .with("called_number", "+15550002222")
        .with("start_time", "2025-03-01T10:00")
        .with("end_time", "2025-03-01T10:05:30")
        .with("duration_seconds", "330")
        .with("charge_amount", "1.25")
}

fn loaded_state(records: &[User], page_size: u32) -> CollectionState<User> {
    let mut state = CollectionState::<User>::new(page_size, Duration::from_millis(300));
    let (ticket, query) = state.begin_fetch();
    let outcome = state.complete_fetch(ticket, run_query(records, &query));
    assert_eq!(outcome, FetchOutcome::Applied);
    state
}

// Fixtures

#[test]
fn seed_fixtures_parse_into_records() {
    assert_eq!(users().len(), 23);
    assert_eq!(seed_tasks().expect("task fixtures should parse").len(), 8);

    let alarms = alarms();
    assert_eq!(alarms.len(), 40);
    assert_eq!(alarms[0].call_id, "CALL-0001");
    assert_eq!(alarms[39].call_id, "CALL-0040");
}

#[test]
fn parse_records_reports_bad_rows() {
    let csv = "id,title,description,status,userId\n1,Ok,,pending,1\n2,Broken,,archived,1\n";

    let err = parse_records::<Task>(csv).expect_err("unknown status should be rejected");

    assert!(
        format!("{err:#}").contains("tasks fixture row 2"),
        "error should name the failing row: {err:#}"
    );
}

// Query pipeline

#[test]
fn basic_pagination_over_twenty_three_records() {
    let users = users();
    let query = Query::new("id", 10);

    let first = run_query(&users, &query).expect("page 1 should load");
    let third = run_query(&users, &query.clone().with_page(3)).expect("page 3 should load");
    let fourth = run_query(&users, &query.clone().with_page(4)).expect("page 4 should load");

    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 23);
    assert_eq!(ids(&third), vec![21, 22, 23]);
    assert_eq!(third.total, 23);
    assert!(fourth.items.is_empty());
    assert_eq!(fourth.total, 23);
}

#[test]
fn pages_past_the_end_are_empty_with_correct_total() {
    let users = users();
    for page_size in [1, 5, 7, 10, 23, 50] {
        let last = page_count(23, page_size);
        for page in last + 1..last + 4 {
            let result = run_query(&users, &Query::new("id", page_size).with_page(page))
                .expect("out of range page should not error");
            assert!(result.items.is_empty(), "page {page} of size {page_size}");
            assert_eq!(result.total, 23);
        }
    }
}

#[test]
fn page_zero_is_rejected() {
    let result = run_query(&users(), &Query::new("id", 10).with_page(0));

    assert_eq!(
        result,
        Err(RepoError::InvalidQuery(InvalidQuery::PageOutOfRange))
    );
}

#[test]
fn page_count_rounds_up_and_is_zero_for_empty() {
    assert_eq!(page_count(23, 10), 3);
    assert_eq!(page_count(20, 10), 2);
    assert_eq!(page_count(0, 10), 0);
    assert_eq!(page_count(5, 0), 0);
}

#[test]
fn sort_ties_keep_original_order() {
    let records = vec![user(1, "b"), user(2, "a"), user(3, "a")];
    let query = Query::new("name", 2).with_sort("name", SortDirection::Asc);

    let result = run_query(&records, &query).expect("query should succeed");

    assert_eq!(ids(&result), vec![2, 3]);
    assert_eq!(result.total, 3);
}

#[test]
fn descending_sort_reverses_distinct_values_and_keeps_ties_stable() {
    let users = users();
    let asc = run_query(&users, &Query::new("id", 50).with_sort("role", SortDirection::Asc))
        .expect("ascending query should succeed");
    let desc = run_query(&users, &Query::new("id", 50).with_sort("role", SortDirection::Desc))
        .expect("descending query should succeed");

    let admins = |page: &PageResult<User>| {
        page.items
            .iter()
            .filter(|user| user.role == "Admin")
            .map(|user| user.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(asc.items.first().map(|user| user.role.as_str()), Some("Admin"));
    assert_eq!(desc.items.first().map(|user| user.role.as_str()), Some("User"));
    assert_eq!(admins(&asc), vec![1, 4, 7, 10, 13, 16, 19, 22]);
    assert_eq!(admins(&asc), admins(&desc), "ties should keep source order");
}

#[test]
fn numeric_fields_sort_by_value() {
    let result = run_query(&users(), &Query::new("id", 3).with_sort("id", SortDirection::Desc))
        .expect("query should succeed");

    assert_eq!(ids(&result), vec![23, 22, 21]);
}

#[test]
fn timestamps_sort_chronologically() {
    let result = run_query(
        &alarms(),
        &Query::new("call_id", 50).with_sort("start_time", SortDirection::Asc),
    )
    .expect("query should succeed");

    assert_eq!(result.items.first().map(|alarm| alarm.call_id.as_str()), Some("CALL-0038"));
    assert_eq!(result.items.last().map(|alarm| alarm.call_id.as_str()), Some("CALL-0015"));
    assert!(result
        .items
        .windows(2)
        .all(|pair| pair[0].start_time <= pair[1].start_time));
}

#[test]
fn text_filters_match_case_insensitive_substrings() {
    let result = run_query(&users(), &Query::new("id", 10).with_filter("name", "JO"))
        .expect("query should succeed");

    assert_eq!(ids(&result), vec![1, 3]);
    assert_eq!(result.total, 2);
}

#[test]
fn enum_filters_match_exactly() {
    let users = users();
    let admins = run_query(&users, &Query::new("id", 50).with_filter("role", "Admin"))
        .expect("query should succeed");
    let lowercase = run_query(&users, &Query::new("id", 50).with_filter("role", "admin"))
        .expect("query should succeed");

    assert_eq!(admins.total, 8);
    assert_eq!(lowercase.total, 0);
}

#[test]
fn blank_and_unknown_filters_do_not_constrain() {
    let query = Query::new("id", 10)
        .with_filter("name", "   ")
        .with_filter("shoe_size", "42");

    let result = run_query(&users(), &query).expect("query should succeed");

    assert_eq!(result.total, 23);
}

#[test]
fn filters_compose_regardless_of_order() {
    let alarms = alarms();
    let both = Query::new("call_id", 50)
        .with_filter("carrier", "T-Mobile")
        .with_filter("call_type", "Incoming");
    let combined = run_query(&alarms, &both).expect("combined filter should succeed");

    let carrier_first = run_query(&alarms, &Query::new("call_id", 50).with_filter("carrier", "T-Mobile"))
        .expect("carrier filter should succeed");
    let then_type = run_query(
        &carrier_first.items,
        &Query::new("call_id", 50).with_filter("call_type", "Incoming"),
    )
    .expect("call type filter should succeed");

    let type_first = run_query(&alarms, &Query::new("call_id", 50).with_filter("call_type", "Incoming"))
        .expect("call type filter should succeed");
    let then_carrier = run_query(
        &type_first.items,
        &Query::new("call_id", 50).with_filter("carrier", "T-Mobile"),
    )
    .expect("carrier filter should succeed");

    let again = run_query(&combined.items, &both).expect("re-filter should succeed");

    assert_eq!(
        call_ids(&combined),
        vec!["CALL-0003", "CALL-0004", "CALL-0008", "CALL-0011", "CALL-0029", "CALL-0033", "CALL-0037"]
    );
    assert_eq!(call_ids(&combined), call_ids(&then_type));
    assert_eq!(call_ids(&combined), call_ids(&then_carrier));
    assert_eq!(call_ids(&combined), call_ids(&again));
}

#[test]
fn field_options_prefer_declared_values() {
    let users = users();

    assert_eq!(
        field_options(&users, "role").expect("role options should resolve"),
        vec!["Admin", "User"]
    );
    let emails = field_options(&users, "email").expect("email options should resolve");
    assert_eq!(emails.len(), 23);
    assert_eq!(emails.first().map(String::as_str), Some("amanda@example.com"));
    assert!(field_options(&users, "shoe_size")
        .expect_err("unknown field should fail")
        .is_not_found());
}

#[test]
fn collation_is_case_insensitive_with_a_stable_tie_break() {
    use std::cmp::Ordering;

    assert_eq!(collate("apple", "Banana"), Ordering::Less);
    assert_eq!(collate("Apple", "apple"), Ordering::Less);
    assert_eq!(collate("same", "same"), Ordering::Equal);
}

#[test]
fn accented_names_sort_with_their_base_letter() {
    use std::cmp::Ordering;

    assert_eq!(collate("Émile", "Zoe"), Ordering::Less);
    assert_eq!(collate("Emile", "Émile"), Ordering::Less);

    let mut names = vec!["Zoe", "Émile", "adam"];
    names.sort_by(|a, b| collate(a, b));
    assert_eq!(names, vec!["adam", "Émile", "Zoe"]);

    let records = vec![user(1, "Zoe"), user(2, "Émile"), user(3, "adam")];
    let result = run_query(&records, &Query::new("name", 10).with_sort("name", SortDirection::Asc))
        .expect("sort should succeed");
    assert_eq!(ids(&result), vec![3, 2, 1]);
}

#[test]
fn numeric_filters_match_whole_values() {
    let result = run_query(&users(), &Query::new("id", 50).with_filter("id", "1"))
        .expect("filter should succeed");
    assert_eq!(ids(&result), vec![1]);

    let result = run_query(&users(), &Query::new("id", 50).with_filter("id", "12.0"))
        .expect("filter should succeed");
    assert_eq!(ids(&result), vec![12]);

    let result = run_query(&users(), &Query::new("id", 50).with_filter("id", "one"))
        .expect("filter should succeed");
    assert_eq!(result.total, 0);
}

// Records and drafts

#[test]
fn user_draft_requires_name_and_valid_email() {
    let errors = User::payload_from_draft(&Draft::blank_for::<User>())
        .expect_err("blank draft should be invalid");

    assert_eq!(errors.get("name"), Some("is required"));
    assert_eq!(errors.get("email"), Some("is required"));
    assert_eq!(errors.get("role"), None, "role starts on its first option");

    let errors = User::payload_from_draft(&user_draft("Ann", "not-an-email", "Owner"))
        .expect_err("bad email and role should be invalid");
    assert_eq!(errors.get("email"), Some("must be an email address"));
    assert_eq!(errors.get("role"), Some("must be one of Admin, User"));
    assert_eq!(errors.len(), 2);
}

#[test]
fn user_update_keeps_existing_avatar() {
    let existing = user(3, "Mike");
    let payload = User::payload_from_draft(&user_draft(" Michael ", "mike@example.com", "Admin"))
        .expect("draft should be valid");

    let updated = User::from_payload(3, payload, Some(&existing));

    assert_eq!(updated.name, "Michael");
    assert_eq!(updated.role, "Admin");
    assert_eq!(updated.avatar, existing.avatar);
}

#[test]
fn task_draft_validates_status_and_assignee() {
    let draft = Draft::blank_for::<Task>().with("title", "Ship it");
    let errors = Task::payload_from_draft(&draft).expect_err("missing assignee should fail");
    assert_eq!(errors.get("userId"), Some("is required"));

    let payload = Task::payload_from_draft(&draft.with("userId", "4").with("status", "completed"))
        .expect("complete draft should be valid");
    assert_eq!(payload.status, TaskStatus::Completed);
    assert_eq!(payload.user_id, 4);
}

#[test]
fn task_serializes_assignee_as_user_id() {
    let task = seed_tasks().expect("task fixtures should parse").remove(0);

    let body = serde_json::to_value(&task).expect("task should serialize");

    assert_eq!(body["userId"], json!(1));
    assert_eq!(body["status"], json!("pending"));
}

#[test]
fn alarm_draft_collects_every_error() {
    let errors = Alarm::payload_from_draft(&Draft::blank_for::<Alarm>())
        .expect_err("blank alarm should be invalid");

    assert_eq!(errors.get("caller_number"), Some("is required"));
    assert_eq!(errors.get("called_number"), Some("is required"));
    assert_eq!(errors.get("start_time"), Some("is required"));
    assert_eq!(errors.get("end_time"), Some("is required"));
    assert_eq!(errors.len(), 4, "optional numbers default to zero: {errors}");
}

#[test]
fn alarm_end_must_not_precede_start() {
    let draft = alarm_draft().with("end_time", "2025-03-01T09:59");

    let errors = Alarm::payload_from_draft(&draft).expect_err("reversed times should fail");

    assert_eq!(errors.get("end_time"), Some("must not be before the start"));
}

#[test]
fn alarm_draft_round_trips_through_the_edit_form() {
    let alarm = alarms().remove(0);

    let payload = Alarm::payload_from_draft(&alarm.to_draft()).expect("stored alarm should be valid");
    let rebuilt = Alarm::from_payload(alarm.call_id.clone(), payload, Some(&alarm));

    assert_eq!(rebuilt, alarm);
}

#[test]
fn blank_carrier_is_accepted_and_edited_as_blank() {
    let mut alarm = alarms().remove(0);
    alarm.carrier = String::new();

    let payload = Alarm::payload_from_draft(&alarm.to_draft()).expect("carrier should be optional");
    assert_eq!(payload.carrier, "");
    let errors = Alarm::payload_from_draft(&alarm.to_draft().with("carrier", "Vodafone"))
        .expect_err("unknown carrier should be rejected");
    assert_eq!(
        errors.get("carrier"),
        Some("must be one of Verizon, AT&T, T-Mobile, Sprint")
    );

    let mut state = CollectionState::<Alarm>::new(10, Duration::from_millis(300));
    let (ticket, query) = state.begin_fetch();
    state.complete_fetch(ticket, run_query(std::slice::from_ref(&alarm), &query));
    state.begin_edit(&alarm);
    let screen = alarm_screen();
    let carrier = screen
        .columns
        .iter()
        .position(|column| column.field == "carrier")
        .expect("carrier column should exist");

    let view = table_view(&state, &screen.columns, &[10]);

    assert_eq!(view.columns[carrier].options[0], "");
    assert_eq!(view.rows[0].cells[carrier].edit_value, "");
}

#[test]
fn timestamps_accept_form_and_rfc3339_input() {
    let expected = parse_timestamp("2025-02-21T11:28:47").expect("form input should parse");

    assert_eq!(parse_timestamp("2025-02-21 11:28:47"), Some(expected));
    assert_eq!(parse_timestamp("2025-02-21T12:28:47+01:00"), Some(expected));
    assert!(parse_timestamp("2025-02-21T11:28").is_some());
    assert!(parse_timestamp("yesterday").is_none());
}

#[test]
fn next_ids_follow_the_highest_existing_id() {
    assert_eq!(User::next_id(&users()), 24);
    assert_eq!(User::next_id(&[]), 1);
    assert_eq!(Alarm::next_id(&alarms()), "CALL-0041");
    assert_eq!(format_call_id(7), "CALL-0007");
}

#[test]
fn not_found_error_names_resource_and_id() {
    let err = RepoError::not_found::<User>(&42);

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "users 42 not found");
}

// Fetch guards

#[test]
fn only_the_latest_request_ticket_is_current() {
    let mut sequencer = RequestSequencer::default();
    let first = sequencer.issue();
    let second = sequencer.issue();

    assert!(!sequencer.is_current(first));
    assert!(sequencer.is_current(second));
}

#[test]
fn debouncer_invalidates_earlier_tickets() {
    let mut debouncer = Debouncer::new(Duration::from_millis(250));
    let first = debouncer.bump();
    let second = debouncer.bump();

    assert!(!debouncer.is_current(first));
    assert!(debouncer.is_current(second));
    assert_eq!(debouncer.window(), Duration::from_millis(250));
}

// Collection state

#[test]
fn stale_response_never_overwrites_newer_page() {
    let users = users();
    for newer_resolves_first in [true, false] {
        let mut state = CollectionState::<User>::new(10, Duration::from_millis(300));
        let (first_ticket, first_query) = state.begin_fetch();
        assert!(state.page_requested(2));
        let (second_ticket, second_query) = state.begin_fetch();

        let first_result = run_query(&users, &first_query);
        let second_result = run_query(&users, &second_query);
        if newer_resolves_first {
            assert_eq!(state.complete_fetch(second_ticket, second_result), FetchOutcome::Applied);
            assert_eq!(state.complete_fetch(first_ticket, first_result), FetchOutcome::Stale);
        } else {
            assert_eq!(state.complete_fetch(first_ticket, first_result), FetchOutcome::Stale);
            assert!(state.loading(), "newer fetch is still pending");
            assert_eq!(state.complete_fetch(second_ticket, second_result), FetchOutcome::Applied);
        }

        let shown = state.result().expect("a page should be shown");
        assert_eq!(shown.page, 2);
        assert_eq!(ids(shown), (11..=20).collect::<Vec<_>>());
        assert!(!state.loading());
    }
}

#[test]
fn failed_fetch_keeps_previous_page_and_raises_banner() {
    let mut state = loaded_state(&users(), 10);
    let before = state.result().cloned();

    let (ticket, _) = state.begin_fetch();
    let outcome = state.complete_fetch(ticket, Err(RepoError::Network("connection refused".into())));

    assert_eq!(outcome, FetchOutcome::Failed);
    assert_eq!(state.result().cloned(), before);
    assert_eq!(
        state.banner(),
        Some("Failed to load users: network error: connection refused")
    );
    assert!(!state.loading());
}

#[test]
fn sorting_toggles_direction_and_resets_page() {
    let mut state = loaded_state(&users(), 10);
    assert!(state.page_requested(3));

    assert!(state.sort_requested("name"));
    assert_eq!(state.query().sort_field, "name");
    assert_eq!(state.query().sort_direction, SortDirection::Asc);
    assert_eq!(state.query().page, 1);

    assert!(state.sort_requested("name"));
    assert_eq!(state.query().sort_direction, SortDirection::Desc);

    assert!(state.sort_requested("email"));
    assert_eq!(state.query().sort_direction, SortDirection::Asc);

    assert!(!state.sort_requested("shoe_size"));
}

#[test]
fn page_size_change_returns_to_first_page() {
    let mut state = loaded_state(&users(), 10);
    assert!(state.page_requested(3));
    assert!(!state.page_requested(3), "same page is a no-op");
    assert!(!state.page_requested(0));

    assert!(state.page_size_requested(20));

    assert_eq!(state.query().page, 1);
    assert_eq!(state.query().page_size, 20);
    assert!(!state.page_size_requested(20));
}

#[test]
fn select_filters_apply_immediately() {
    let mut state = loaded_state(&users(), 10);
    assert!(state.page_requested(2));

    let change = state.filter_changed("role", "Admin".to_string());

    assert_eq!(change, FilterChange::Immediate);
    assert_eq!(state.query().filters.get("role").map(String::as_str), Some("Admin"));
    assert_eq!(state.query().page, 1);
    assert_eq!(state.filter_changed("role", "Admin".to_string()), FilterChange::Unchanged);
}

#[test]
fn text_filters_wait_for_the_last_keystroke() {
    let mut state = loaded_state(&users(), 10);

    let FilterChange::Debounced(first) = state.filter_changed("name", "jo".to_string()) else {
        panic!("text filter should be debounced");
    };
    let FilterChange::Debounced(second) = state.filter_changed("name", "joh".to_string()) else {
        panic!("text filter should be debounced");
    };

    assert!(state.query().filters.is_empty(), "nothing applies before the window");
    assert_eq!(state.pending_filter("name"), "joh");
    assert!(!state.debounce_elapsed(first));
    assert!(state.debounce_elapsed(second));
    assert_eq!(state.query().filters.get("name").map(String::as_str), Some("joh"));
    assert!(!state.debounce_elapsed(second), "already applied");
}

#[test]
fn reset_filters_clears_pending_input() {
    let mut state = loaded_state(&users(), 10);
    let FilterChange::Debounced(ticket) = state.filter_changed("email", "example".to_string()) else {
        panic!("text filter should be debounced");
    };
    assert!(state.debounce_elapsed(ticket));
    let FilterChange::Debounced(pending) = state.filter_changed("email", "examp".to_string()) else {
        panic!("text filter should be debounced");
    };

    assert!(state.reset_filters());

    assert!(state.query().filters.is_empty());
    assert_eq!(state.pending_filter("email"), "");
    assert!(!state.debounce_elapsed(pending), "reset cancels pending input");
    assert!(!state.reset_filters());
}

#[test]
fn invalid_edit_stays_open_with_field_errors() {
    let users = users();
    let mut state = loaded_state(&users, 10);
    state.begin_edit(&users[0]);
    state.edit_field("name", "  ".to_string());

    assert!(state.commit_edit().is_none());

    let EditState::Editing { errors, saving, .. } = state.edit() else {
        panic!("row should still be in edit mode");
    };
    assert_eq!(errors.get("name"), Some("is required"));
    assert!(!saving);
}

#[test]
fn edit_commit_marks_saving_and_failure_keeps_draft() {
    let users = users();
    let mut state = loaded_state(&users, 10);
    state.begin_edit(&users[1]);
    state.edit_field("name", "Janet Smith".to_string());

    let (id, payload) = state.commit_edit().expect("draft should be valid");
    assert_eq!(id, 2);
    assert_eq!(payload.name, "Janet Smith");
    assert!(state.commit_edit().is_none(), "no second submit while saving");

    let refetch = state.edit_committed(Err(RepoError::Status {
        code: 500,
        message: "boom".to_string(),
    }));

    assert!(!refetch);
    assert_eq!(state.banner(), Some("Failed to update user: server responded 500: boom"));
    let EditState::Editing { draft, saving, .. } = state.edit() else {
        panic!("failed save should keep the row in edit mode");
    };
    assert_eq!(draft.get("name"), "Janet Smith");
    assert!(!saving);
}

#[test]
fn successful_edit_returns_to_viewing() {
    let users = users();
    let mut state = loaded_state(&users, 10);
    state.begin_edit(&users[1]);
    state.commit_edit().expect("unchanged draft should be valid");

    let mut updated = users[1].clone();
    updated.name = "Janet Smith".to_string();
    assert!(state.edit_committed(Ok(updated)));

    assert_eq!(state.edit(), &EditState::Viewing);
    assert_eq!(state.notice(), Some("Updated user 2"));
}

#[test]
fn editing_another_row_discards_the_open_draft() {
    let users = users();
    let mut state = loaded_state(&users, 10);
    state.begin_edit(&users[0]);
    state.edit_field("name", "Changed".to_string());

    state.begin_edit(&users[4]);

    assert!(state.is_editing(&5));
    assert!(!state.is_editing(&1));
    let EditState::Editing { draft, .. } = state.edit() else {
        panic!("second row should be in edit mode");
    };
    assert_eq!(draft.get("name"), "Tom Brown");
}

#[test]
fn create_form_validates_before_submitting() {
    let mut state = loaded_state(&users(), 10);
    assert!(state.submit_create().is_none(), "closed form cannot submit");

    state.open_create();
    assert_eq!(state.create().draft.get("role"), "Admin");
    assert!(state.submit_create().is_none());
    assert_eq!(state.create().errors.get("name"), Some("is required"));

    state.create_field("name", "Ada Lovelace".to_string());
    state.create_field("email", "ada@example.com".to_string());
    let payload = state.submit_create().expect("complete form should submit");
    assert_eq!(
        payload,
        UserPayload {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role: "Admin".to_string(),
        }
    );
    assert!(state.create().saving);

    let created = User::from_payload(24, payload, None);
    assert!(state.create_finished(Ok(created)));
    assert!(!state.create().open);
    assert_eq!(state.notice(), Some("Created user 24"));
}

#[test]
fn failed_create_keeps_the_form_open() {
    let mut state = loaded_state(&users(), 10);
    state.open_create();
    state.create_field("name", "Ada".to_string());
    state.create_field("email", "ada@example.com".to_string());
    state.submit_create().expect("form should submit");

    assert!(!state.create_finished(Err(RepoError::Network("timeout".to_string()))));

    assert!(state.create().open);
    assert!(!state.create().saving);
    assert_eq!(state.create().draft.get("name"), "Ada");
}

#[test]
fn delete_requires_confirmation() {
    let mut state = loaded_state(&users(), 10);

    state.request_delete(5);
    assert_eq!(state.pending_delete(), Some(&5));
    state.cancel_delete();
    assert_eq!(state.confirm_delete(), None);

    state.request_delete(5);
    assert_eq!(state.confirm_delete(), Some(5));
    assert_eq!(state.pending_delete(), None);
}

#[tokio::test]
async fn delete_not_found_leaves_page_unchanged() {
    let repo = MemoryRepository::new(alarms());
    let mut state = CollectionState::<Alarm>::new(10, Duration::from_millis(300));
    let (ticket, query) = state.begin_fetch();
    let result = repo.list(&query).await;
    state.complete_fetch(ticket, result);
    let before = state.result().cloned();

    let id = "nonexistent-id".to_string();
    let result = repo.delete(&id).await;

    assert!(matches!(&result, Err(RepoError::NotFound { .. })), "{result:?}");
    assert!(!state.delete_finished(&id, result));
    assert_eq!(state.result().cloned(), before);
    assert_eq!(
        state.banner(),
        Some("Could not delete alarm nonexistent-id: it no longer exists")
    );
}

#[test]
fn options_fall_back_to_declared_values() {
    let mut state = CollectionState::<User>::new(10, Duration::from_millis(300));
    assert_eq!(state.options("role"), vec!["Admin", "User"]);
    assert!(state.options("name").is_empty());

    state.options_loaded("role", Err(RepoError::Network("offline".to_string())));
    assert_eq!(state.options("role"), vec!["Admin", "User"]);

    state.options_loaded("role", Ok(vec!["Admin".to_string(), "Auditor".to_string()]));
    assert_eq!(state.options("role"), vec!["Admin", "Auditor"]);
}

// View projection

#[test]
fn table_shows_loading_until_first_page_arrives() {
    let mut state = CollectionState::<User>::new(10, Duration::from_millis(300));
    state.begin_fetch();

    let view = table_view(&state, &user_screen().columns, &[5, 10, 20, 50]);

    assert_eq!(view.body, BodyState::Loading);
    assert!(view.loading);
    assert!(view.pagination.is_none());
}

#[test]
fn refetch_keeps_rows_visible_and_disables_controls() {
    let mut state = loaded_state(&users(), 10);
    let columns = user_screen().columns;
    let before = table_view(&state, &columns, &[5, 10, 20, 50]);
    assert!(before.columns[0].sortable);
    assert!(!before.pagination.as_ref().expect("pagination").disabled);

    state.begin_fetch();
    let view = table_view(&state, &columns, &[5, 10, 20, 50]);

    assert!(view.loading);
    assert_eq!(view.body, BodyState::Rows);
    assert_eq!(view.rows, before.rows);
    assert!(view.columns.iter().all(|column| !column.sortable));
    assert_eq!(view.columns[0].sort_indicator, Some("↑"));
    let pagination = view.pagination.expect("pagination should stay visible");
    assert!(pagination.disabled);
    assert_eq!(pagination.current_page, 1);
}

#[test]
fn empty_result_hides_pagination() {
    let state = loaded_state(&[], 10);

    let view = table_view(&state, &user_screen().columns, &[5, 10, 20, 50]);

    assert_eq!(view.body, BodyState::Empty);
    assert!(!view.loading);
    assert!(view.pagination.is_none());
}

#[test]
fn table_view_projects_rows_and_sort_indicator() {
    let state = loaded_state(&users(), 10);

    let view = table_view(&state, &user_screen().columns, &[5, 10, 20, 50]);

    assert_eq!(view.body, BodyState::Rows);
    assert_eq!(view.rows.len(), 10);
    assert_eq!(view.rows[0].id, "1");
    assert_eq!(view.rows[0].cells[1].text, "John Doe");
    assert_eq!(view.columns[0].sort_indicator, Some("↑"));
    assert_eq!(view.columns[1].sort_indicator, None);
    assert_eq!(view.columns[0].input, None, "ids are read-only");
    assert_eq!(view.columns[2].input, Some(InputKind::Email));
    assert_eq!(view.columns[3].options, vec!["Admin", "User"]);

    let pagination = view.pagination.expect("pagination should be shown");
    assert_eq!(pagination.total_pages, 3);
    assert_eq!((pagination.first_item, pagination.last_item), (1, 10));
    assert!(!pagination.has_prev);
    assert!(pagination.has_next);
}

#[test]
fn editing_row_projects_draft_values_and_errors() {
    let users = users();
    let mut state = loaded_state(&users, 10);
    state.begin_edit(&users[0]);
    state.edit_field("email", "john-at-example".to_string());
    assert!(state.commit_edit().is_none());

    let view = table_view(&state, &user_screen().columns, &[10]);

    let row = &view.rows[0];
    assert!(row.editing);
    assert_eq!(row.cells[2].edit_value, "john-at-example");
    assert_eq!(row.cells[2].error.as_deref(), Some("must be an email address"));
    assert!(!view.rows[1].editing);
}

#[test]
fn pagination_view_describes_the_last_page() {
    let view = pagination_view(3, 10, 23, &[5, 10, 20]).expect("pagination should exist");

    assert_eq!((view.first_item, view.last_item), (21, 23));
    assert!(view.has_prev);
    assert!(!view.has_next);

    let custom = pagination_view(1, 25, 23, &[5, 10, 20]).expect("pagination should exist");
    assert_eq!(custom.page_size_choices, vec![5, 10, 20, 25]);

    assert!(pagination_view(1, 10, 0, &[10]).is_none());
}

#[test]
fn filter_views_offer_an_any_option_for_selects() {
    let users = users().into_iter().take(3).collect::<Vec<_>>();
    let mut state = loaded_state(&users, 10);
    state.filter_changed("name", "ja".to_string());

    let views = filter_views(&state, &user_screen().filters);

    assert_eq!(views[0].value, "ja");
    assert!(views[0].options.is_none());
    assert_eq!(
        views[2].options.as_deref(),
        Some(&["".to_string(), "Admin".to_string(), "User".to_string()][..])
    );
}

#[test]
fn create_view_lists_editable_fields() {
    let mut state = CollectionState::<Alarm>::new(10, Duration::from_millis(300));
    state.open_create();

    let view = create_view(&state);

    assert!(view.open);
    assert!(view.fields.iter().all(|field| field.field != "call_id"));
    let start = view
        .fields
        .iter()
        .find(|field| field.field == "start_time")
        .expect("start time should be editable");
    assert_eq!(start.input, InputKind::DateTime);
    assert!(start.required);
    let carrier = view
        .fields
        .iter()
        .find(|field| field.field == "carrier")
        .expect("carrier should be editable");
    assert_eq!(carrier.value, "", "optional choices start blank");
    assert_eq!(carrier.options, vec!["", "Verizon", "AT&T", "T-Mobile", "Sprint"]);
    let call_type = view
        .fields
        .iter()
        .find(|field| field.field == "call_type")
        .expect("call type should be editable");
    assert_eq!(call_type.value, "Incoming");
    assert_eq!(call_type.options, vec!["Incoming", "Outgoing", "Missed"]);
}

#[test]
fn alarm_columns_render_duration_and_charge() {
    let alarm = alarms().remove(0);
    let screen = alarm_screen();
    let cell = |field: &str| {
        screen
            .columns
            .iter()
            .find(|column| column.field == field)
            .map(|column| column.cell_text(&alarm))
            .expect("column should exist")
    };

    assert_eq!(cell("duration_seconds"), "47m 56s");
    assert_eq!(cell("charge_amount"), "$2.40");
    assert_eq!(cell("start_time"), "2025-02-21 11:28:47");
    assert_eq!(format_duration(45), "45s");
    assert_eq!(format_duration(3725), "1h 02m 05s");
}

// Styles

#[test]
fn table_header_cell_style_is_sticky() {
    let style = table_header_cell_style(true);

    assert!(style.contains("position: sticky"));
    assert!(style.contains("top: 0"));
    assert!(style.contains("z-index"));
    assert!(style.contains("cursor: pointer"));
    assert!(table_header_cell_style(false).contains("cursor: default"));
}

#[test]
fn table_container_style_allows_scroll() {
    let style = table_container_style();

    assert!(style.contains("overflow: auto"));
    assert!(style.contains("flex: 1"));
    assert!(style.contains("min-height: 0"));
}

#[test]
fn root_container_style_uses_viewport_height_and_flex() {
    let style = root_container_style();

    assert!(style.contains("height: 100vh"));
    assert!(style.contains("display: flex"));
    assert!(style.contains("flex-direction: column"));
    assert!(style.contains("overflow: hidden"));
}

// Config

#[test]
fn config_defaults_match_the_mock_setup() {
    let config = AppConfig::default();

    assert_eq!(config.data_source, DataSourceKind::Mock);
    assert_eq!(config.page_size, 10);
    assert_eq!(config.page_size_options(), vec![5, 10, 20, 50]);
    assert_eq!(config.filter_debounce(), Duration::from_millis(300));
    assert_eq!(config.api_base_url, "http://localhost:8080/api");
}

#[test]
fn config_file_overrides_selected_keys() {
    let config = AppConfig::from_toml_str(
        r#"
        data_source = "http"
        api_base_url = "https://admin.example.com/api"
        bearer_token = "secret"
        page_size = 25
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.data_source, DataSourceKind::Http);
    assert_eq!(config.bearer_token.as_deref(), Some("secret"));
    assert_eq!(config.page_size_options(), vec![5, 10, 20, 25, 50]);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
}

#[test]
fn config_load_applies_data_source_override() {
    let temp_dir = unique_test_dir("config");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let config_path = temp_dir.join("config.toml");
    fs::write(&config_path, "page_size = 20\n").expect("should write config");

    let config = AppConfig::load_from(Some(config_path.as_path()), Some("sqlite"))
        .expect("config should load");
    assert_eq!(config.data_source, DataSourceKind::Sqlite);
    assert_eq!(config.page_size, 20);

    let missing = AppConfig::load_from(Some(temp_dir.join("missing.toml").as_path()), None)
        .expect("missing file should mean defaults");
    assert_eq!(missing, AppConfig::default());

    assert!(AppConfig::load_from(None, Some("ftp")).is_err());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn config_rejects_zero_page_size() {
    let config = AppConfig::from_toml_str("page_size = 0").expect("config should parse");

    assert!(config.validate().is_err());
}

#[test]
fn data_source_switch_keeps_other_settings() {
    let config = AppConfig::from_toml_str("page_size = 20\nmock_latency_ms = 0")
        .expect("config should parse");

    let sqlite = config
        .with_data_source(DataSourceKind::Sqlite)
        .expect("sqlite should be valid");

    assert_eq!(sqlite.data_source, DataSourceKind::Sqlite);
    assert_eq!(sqlite.page_size, 20);
    assert_eq!(sqlite.mock_latency_ms, 0);
    for kind in DataSourceKind::ALL {
        assert_eq!(kind.key().parse::<DataSourceKind>().expect("key should parse"), kind);
    }

    let no_api = AppConfig {
        api_base_url: " ".to_string(),
        ..config
    };
    assert!(no_api.with_data_source(DataSourceKind::Http).is_err());
}

#[tokio::test]
async fn switching_data_source_rebuilds_every_repository() {
    let temp_dir = unique_test_dir("switch");
    let config = AppConfig {
        db_path: Some(temp_dir.join("records.sqlite")),
        mock_latency_ms: 0,
        ..AppConfig::default()
    };
    let mock = build_backends(&config).expect("mock backends should build");
    mock.users.delete(&1).await.expect("mock delete should succeed");

    let sqlite = switch_backends(&config, DataSourceKind::Sqlite).expect("sqlite backends should build");

    assert!(sqlite != mock);
    assert_eq!(sqlite.settings, mock.settings);
    let query = Query::new("id", 10);
    assert_eq!(sqlite.users.list(&query).await.expect("sqlite list").total, 23);
    assert_eq!(mock.users.list(&query).await.expect("mock list").total, 22);
    let alarm_total = sqlite
        .alarms
        .list(&Query::new("call_id", 10))
        .await
        .expect("sqlite alarms should list")
        .total;
    assert_eq!(alarm_total, 40);

    drop(sqlite);
    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn default_db_path_uses_app_directory() {
    let db_path = default_db_path().expect("default db path should resolve");

    assert_eq!(
        db_path.file_name().and_then(|name| name.to_str()),
        Some("records.sqlite")
    );
    assert!(db_path.to_string_lossy().contains("admin-console"));
}

#[test]
fn ensure_webview_data_dir_creates_webview2_subdir() {
    let temp_dir = unique_test_dir("webview-data-dir");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    let webview_dir =
        ensure_webview_data_dir(&temp_dir).expect("webview data dir should be created");

    assert_eq!(webview_dir, temp_dir.join("webview2"));
    assert!(webview_dir.is_dir(), "webview2 directory should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// Memory repository

#[tokio::test]
async fn memory_repository_create_is_visible_to_the_next_fetch() {
    let repo = MemoryRepository::new(users());
    let payload = User::payload_from_draft(&user_draft("Ada Lovelace", "ada@example.com", "User"))
        .expect("draft should be valid");

    let created = repo.create(payload.clone()).await.expect("create should succeed");
    let found = repo
        .list(&Query::new("id", 10).with_filter("id", created.id.to_string()))
        .await
        .expect("list should succeed");

    assert_eq!(created.id, 24);
    assert_eq!(created.avatar, "/assets/avatar/6.jpg");
    assert_eq!(found.total, 1);
    assert_eq!(found.items, vec![User::from_payload(24, payload, None)]);
}

#[tokio::test]
async fn memory_repository_update_and_get() {
    let repo = MemoryRepository::new(users());
    let payload = User::payload_from_draft(&user_draft("Janet Smith", "janet@example.com", "Admin"))
        .expect("draft should be valid");

    let updated = repo.update(&2, payload).await.expect("update should succeed");
    let fetched = repo.get(&2).await.expect("get should succeed");

    assert_eq!(updated, fetched);
    assert_eq!(fetched.role, "Admin");
    assert_eq!(fetched.avatar, "/assets/avatar/2.jpg");
    assert!(repo.get(&99).await.expect_err("missing id").is_not_found());
}

#[tokio::test]
async fn memory_repository_delete_removes_record() {
    let repo = MemoryRepository::new(users());

    repo.delete(&7).await.expect("delete should succeed");

    let page = repo.list(&Query::new("id", 50)).await.expect("list should succeed");
    assert_eq!(page.total, 22);
    assert!(!ids(&page).contains(&7));
    assert!(repo.delete(&7).await.expect_err("second delete").is_not_found());
}

#[tokio::test]
async fn memory_repositories_do_not_share_state() {
    let first = MemoryRepository::new(users());
    let second = MemoryRepository::new(users());

    first.delete(&1).await.expect("delete should succeed");

    let query = Query::new("id", 50);
    assert_eq!(first.list(&query).await.expect("first should list").total, 22);
    assert_eq!(second.list(&query).await.expect("second should list").total, 23);
}

#[tokio::test]
async fn memory_repository_assigns_sequential_call_ids() {
    let repo = MemoryRepository::new(alarms());
    let payload = Alarm::payload_from_draft(&alarm_draft()).expect("draft should be valid");

    let created = repo.create(payload).await.expect("create should succeed");
    let found = repo
        .list(&Query::new("call_id", 10).with_filter("call_id", "CALL-0041"))
        .await
        .expect("list should succeed");

    assert_eq!(created.call_id, "CALL-0041");
    assert_eq!(found.items, vec![created]);
}

#[tokio::test]
async fn memory_repository_latency_delays_responses() {
    let repo = MemoryRepository::new(users()).with_latency(Duration::from_millis(30));
    let started = std::time::Instant::now();

    repo.list(&Query::new("id", 10)).await.expect("list should succeed");

    assert!(started.elapsed() >= Duration::from_millis(30));
}

// SQLite repository

#[tokio::test]
async fn sqlite_repository_seeds_once_and_pages() {
    let temp_dir = unique_test_dir("sqlite-seed");
    let db_path = temp_dir.join("records.sqlite");
    let repo = SqliteRepository::<User>::open(&db_path).expect("sqlite repo should open");

    assert!(repo.seed_if_empty(&users()).expect("seed should succeed"));
    assert!(!repo.seed_if_empty(&users()).expect("second seed should succeed"));

    let third = repo
        .list(&Query::new("id", 10).with_page(3))
        .await
        .expect("list should succeed");
    assert_eq!(ids(&third), vec![21, 22, 23]);
    assert_eq!(third.total, 23);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn sqlite_repository_persists_mutations_across_reopen() {
    let temp_dir = unique_test_dir("sqlite-mutations");
    let db_path = temp_dir.join("records.sqlite");
    {
        let repo = SqliteRepository::<User>::open(&db_path).expect("sqlite repo should open");
        repo.seed_if_empty(&users()).expect("seed should succeed");
        let payload = User::payload_from_draft(&user_draft("Ada", "ada@example.com", "User"))
            .expect("draft should be valid");
        let created = repo.create(payload).await.expect("create should succeed");
        assert_eq!(created.id, 24);

        let payload = User::payload_from_draft(&user_draft("Johnny Doe", "john@example.com", "Admin"))
            .expect("draft should be valid");
        repo.update(&1, payload).await.expect("update should succeed");
        repo.delete(&2).await.expect("delete should succeed");
    }

    let reopened = SqliteRepository::<User>::open(&db_path).expect("sqlite repo should reopen");
    let page = reopened
        .list(&Query::new("id", 50))
        .await
        .expect("list should succeed");
    assert_eq!(page.total, 23);
    assert_eq!(page.items.last().map(|user| user.name.as_str()), Some("Ada"));
    let first = reopened.get(&1).await.expect("get should succeed");
    assert_eq!(first.name, "Johnny Doe");
    assert_eq!(first.avatar, "/assets/avatar/1.jpg");
    assert!(reopened.get(&2).await.expect_err("deleted").is_not_found());
    assert!(reopened.delete(&2).await.expect_err("deleted").is_not_found());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn sqlite_repository_keeps_resources_apart() {
    let temp_dir = unique_test_dir("sqlite-resources");
    let db_path = temp_dir.join("records.sqlite");
    let users_repo = SqliteRepository::<User>::open(&db_path).expect("users repo should open");
    let alarms_repo = SqliteRepository::<Alarm>::open(&db_path).expect("alarms repo should open");
    users_repo.seed_if_empty(&users()).expect("seed users");
    alarms_repo.seed_if_empty(&alarms()).expect("seed alarms");

    let alarm_page = alarms_repo
        .list(&Query::new("call_id", 5).with_filter("carrier", "Verizon"))
        .await
        .expect("list should succeed");
    let carriers = alarms_repo.options("carrier").await.expect("options should resolve");

    assert_eq!(alarm_page.total, 6);
    assert_eq!(carriers, vec!["Verizon", "AT&T", "T-Mobile", "Sprint"]);
    assert_eq!(users_repo.list(&Query::new("id", 5)).await.expect("list").total, 23);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn sqlite_connections_wait_for_other_writers() {
    let temp_dir = unique_test_dir("sqlite-busy");
    let db_path = temp_dir.join("records.sqlite");
    init_db(&db_path).expect("schema should initialize");

    let conn = open_connection(&db_path).expect("connection should open");
    let busy_timeout: i64 = conn
        .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
        .expect("busy timeout should be readable");

    assert_eq!(busy_timeout, 5000);
    drop(conn);
    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// HTTP repository

fn http_users(server: &MockServer) -> HttpRepository<User> {
    HttpRepository::new(
        HttpConfig::new(format!("{}/api", server.uri())).with_bearer_token("secret"),
    )
    .expect("http client should build")
}

#[test]
fn query_params_carry_paging_sort_and_active_filters() {
    let query = Query::new("name", 5)
        .with_page(2)
        .with_sort("name", SortDirection::Desc)
        .with_filter("role", "Admin")
        .with_filter("email", "  ");

    let params = query_params(&query);

    assert_eq!(
        params,
        vec![
            ("page".to_string(), "2".to_string()),
            ("pageSize".to_string(), "5".to_string()),
            ("sortBy".to_string(), "name".to_string()),
            ("sortOrder".to_string(), "desc".to_string()),
            ("role".to_string(), "Admin".to_string()),
        ]
    );
}

#[tokio::test]
async fn http_repository_lists_a_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "5"))
        .and(query_param("sortBy", "name"))
        .and(query_param("sortOrder", "desc"))
        .and(query_param("role", "Admin"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 4, "name": "Sarah Wilson", "email": "sarah@example.com", "role": "Admin", "avatar": "/assets/avatar/4.jpg"}
            ],
            "total": 8
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query::new("id", 5)
        .with_page(2)
        .with_sort("name", SortDirection::Desc)
        .with_filter("role", "Admin");
    let page = http_users(&server).list(&query).await.expect("list should succeed");

    assert_eq!(ids(&page), vec![4]);
    assert_eq!(page.total, 8);
    assert_eq!(page.page, 2);
}

#[tokio::test]
async fn http_repository_maps_missing_records_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = http_users(&server).delete(&99).await.expect_err("delete should fail");

    assert_eq!(
        err,
        RepoError::NotFound {
            resource: "users".to_string(),
            id: "99".to_string(),
        }
    );
}

#[tokio::test]
async fn http_repository_reports_server_errors_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let payload = User::payload_from_draft(&user_draft("Ada", "ada@example.com", "User"))
        .expect("draft should be valid");
    let err = http_users(&server).create(payload).await.expect_err("create should fail");

    assert_eq!(
        err,
        RepoError::Status {
            code: 500,
            message: "database unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn http_repository_sends_payload_and_reads_back_record() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "title": "Update Dependencies",
            "description": "",
            "status": "completed",
            "userId": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = HttpRepository::<Task>::new(HttpConfig::new(format!("{}/api/", server.uri())))
        .expect("http client should build");
    let draft = Draft::blank_for::<Task>()
        .with("title", "Update Dependencies")
        .with("status", "completed")
        .with("userId", "3");
    let payload = Task::payload_from_draft(&draft).expect("draft should be valid");
    let updated = repo.update(&3, payload).await.expect("update should succeed");

    assert_eq!(updated.status, TaskStatus::Completed);
}

#[tokio::test]
async fn http_repository_rejects_malformed_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = http_users(&server).get(&1).await.expect_err("get should fail");

    assert!(matches!(err, RepoError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn http_repository_reads_both_option_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/role-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Admin", "User"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/email-options"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": ["a@example.com"]})),
        )
        .mount(&server)
        .await;

    let repo = http_users(&server);

    assert_eq!(repo.options("role").await.expect("role options"), vec!["Admin", "User"]);
    assert_eq!(
        repo.options("email").await.expect("email options"),
        vec!["a@example.com"]
    );
}

#[tokio::test]
async fn http_repository_reports_unreachable_server_as_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("should bind a free port");
    let port = listener
        .local_addr()
        .expect("listener should have an address")
        .port();
    drop(listener);

    let repo = HttpRepository::<User>::new(
        HttpConfig::new(format!("http://127.0.0.1:{port}/api"))
            .with_timeout(Duration::from_secs(2)),
    )
    .expect("http client should build");
    let err = repo
        .list(&Query::new("id", 10))
        .await
        .expect_err("list should fail");

    assert!(matches!(err, RepoError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn http_repository_validates_query_before_sending() {
    let server = MockServer::start().await;

    let err = http_users(&server)
        .list(&Query::new("id", 10).with_page(0))
        .await
        .expect_err("page 0 should fail");

    assert_eq!(err, RepoError::InvalidQuery(InvalidQuery::PageOutOfRange));
}
