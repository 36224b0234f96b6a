mod state;

use contracts::domain::a001_alarm::aggregate::{Alarm, AlarmSeverity};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::json;
use std::cmp::Ordering;
use std::sync::Arc;
use thaw::*;

use crate::domain::a001_alarm::api;
use crate::domain::a001_alarm::ui::details::{AlarmDeleteModal, AlarmEditModal, AlarmViewModal};
use crate::shared::list_utils::{get_sort_indicator, page_slice, sort_list, total_pages, Sortable};
use crate::shared::modal_url::{modal_outlet, provide_modal_controller, CrudModal, ALARM_MODAL};
use crate::shared::state::query_state::use_query_state;
use crate::system::auth::guard::{PageBoundary, PermissionGate, RequirePermission};
use state::AlarmListQuery;

impl Sortable for Alarm {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "asset_name" => self
                .asset_name
                .to_lowercase()
                .cmp(&other.asset_name.to_lowercase()),
            "severity" => self.severity.cmp(&other.severity),
            "acknowledged" => self.acknowledged.cmp(&other.acknowledged),
            "message" => self.message.to_lowercase().cmp(&other.message.to_lowercase()),
            _ => self.raised_at.cmp(&other.raised_at),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct AlarmPage {
    rows: Vec<Alarm>,
    total_count: usize,
    total_pages: usize,
}

fn select_page(all: &[Alarm], query: &AlarmListQuery) -> AlarmPage {
    let mut data: Vec<Alarm> = all
        .iter()
        .filter(|a| a.matches(&query.search))
        .filter(|a| query.severity.map_or(true, |s| a.severity == s))
        .filter(|a| !query.unacknowledged_only || !a.acknowledged)
        .cloned()
        .collect();
    sort_list(&mut data, &query.sort_field, query.sort_ascending);

    AlarmPage {
        total_count: data.len(),
        total_pages: total_pages(data.len(), query.page_size),
        rows: page_slice(&data, query.page, query.page_size),
    }
}

#[component]
pub fn AlarmListPage() -> impl IntoView {
    view! {
        <PageBoundary>
            <RequirePermission
                required="alarm:list"
                loading=|| view! { <Spinner /> }
            >
                <AlarmList />
            </RequirePermission>
        </PageBoundary>
    }
}

#[component]
fn AlarmList() -> impl IntoView {
    let modal = provide_modal_controller(ALARM_MODAL);
    let query = use_query_state(&AlarmListQuery::default());
    let alarms: RwSignal<Vec<Alarm>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let search_input = RwSignal::new(String::new());

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            let result = api::fetch_alarms().await;
            // Страница могла быть уже закрыта; тогда все записи ниже ничего не делают
            let _ = set_loading.try_set(false);
            match result {
                Ok(data) => {
                    let _ = alarms.try_set(data);
                    let _ = set_error.try_set(None);
                }
                Err(e) => {
                    log::warn!("{}", e);
                    let _ = set_error.try_set(Some(format!("Failed to load alarms: {}", e)));
                }
            }
        });
    };
    load();

    let reload = Callback::new(move |_| load());
    let on_changed = Callback::new(move |_| {
        modal.close_modal();
        load();
    });

    let page = Memo::new(move |_| {
        let q: AlarmListQuery = query.decode().unwrap_or_default();
        alarms.with(|all| select_page(all, &q))
    });

    let apply_search = move || {
        query.patch(json!({ "search": search_input.get_untracked(), "page": 0 }));
    };

    let set_severity = move |severity: Option<AlarmSeverity>| {
        query.patch(json!({ "severity": severity, "page": 0 }));
    };

    let toggle_sort = move |field: &'static str| {
        move |_: leptos::ev::MouseEvent| {
            let q: AlarmListQuery = query.decode_untracked().unwrap_or_default();
            let ascending = if q.sort_field == field {
                !q.sort_ascending
            } else {
                true
            };
            query.patch(json!({ "sort_field": field, "sort_ascending": ascending }));
        }
    };

    let sort_label = move |field: &'static str, title: &'static str| {
        move || {
            let q: AlarmListQuery = query.decode().unwrap_or_default();
            format!(
                "{}{}",
                title,
                get_sort_indicator(&q.sort_field, field, q.sort_ascending)
            )
        }
    };

    let go_to_page = move |delta: isize| {
        let current = query.get::<usize>("page").unwrap_or(0);
        let last = page.with_untracked(|p| p.total_pages.saturating_sub(1));
        let next = current.saturating_add_signed(delta).min(last);
        query.patch(json!({ "page": next }));
    };

    view! {
        <div class="page">
            <div class="page-header">
                <h1>"Alarms"</h1>
                <Flex>
                    <Input value=search_input placeholder="Asset, message or id" />
                    <Button on_click=move |_| apply_search()>"Find"</Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload.run(())
                        disabled=Signal::derive(move || loading.get())
                    >
                        "Refresh"
                    </Button>
                </Flex>
                <Flex>
                    <Button size=ButtonSize::Small on_click=move |_| set_severity(None)>"All"</Button>
                    <Button size=ButtonSize::Small on_click=move |_| set_severity(Some(AlarmSeverity::Critical))>
                        "Critical"
                    </Button>
                    <Button size=ButtonSize::Small on_click=move |_| set_severity(Some(AlarmSeverity::Warning))>
                        "Warning"
                    </Button>
                    <label>
                        <input
                            type="checkbox"
                            prop:checked={move || query.get::<bool>("unacknowledged_only").unwrap_or(false)}
                            on:change=move |ev| {
                                query.patch(json!({
                                    "unacknowledged_only": event_target_checked(&ev),
                                    "page": 0
                                }))
                            }
                        />
                        " Unacknowledged only"
                    </label>
                </Flex>
            </div>

            <Show when=move || error.get().is_some()>
                <div class="error-message">{move || error.get().unwrap_or_default()}</div>
            </Show>

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell min_width=160.0>
                            <div style="cursor: pointer; user-select: none;" on:click=toggle_sort("raised_at")>
                                {sort_label("raised_at", "Raised")}
                            </div>
                        </TableHeaderCell>
                        <TableHeaderCell min_width=180.0>
                            <div style="cursor: pointer; user-select: none;" on:click=toggle_sort("asset_name")>
                                {sort_label("asset_name", "Asset")}
                            </div>
                        </TableHeaderCell>
                        <TableHeaderCell min_width=100.0>
                            <div style="cursor: pointer; user-select: none;" on:click=toggle_sort("severity")>
                                {sort_label("severity", "Severity")}
                            </div>
                        </TableHeaderCell>
                        <TableHeaderCell min_width=260.0>"Message"</TableHeaderCell>
                        <TableHeaderCell min_width=80.0>
                            <div style="cursor: pointer; user-select: none;" on:click=toggle_sort("acknowledged")>
                                {sort_label("acknowledged", "Ack")}
                            </div>
                        </TableHeaderCell>
                        <TableHeaderCell min_width=220.0>""</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    <For
                        each=move || page.get().rows
                        key=|alarm| alarm.id.clone()
                        children=move |alarm| {
                            let row = StoredValue::new(alarm.clone());
                            view! {
                                <TableRow>
                                    <TableCell>{alarm.raised_at.format("%Y-%m-%d %H:%M:%S").to_string()}</TableCell>
                                    <TableCell>{alarm.asset_name.clone()}</TableCell>
                                    <TableCell>
                                        <span class=format!("badge badge--{}", alarm.severity.code())>
                                            {alarm.severity.display_name()}
                                        </span>
                                    </TableCell>
                                    <TableCell>{alarm.message.clone()}</TableCell>
                                    <TableCell>{if alarm.acknowledged { "Yes" } else { "No" }}</TableCell>
                                    <TableCell>
                                        <Flex>
                                            <PermissionGate required="alarm:read">
                                                <Button
                                                    size=ButtonSize::Small
                                                    on_click=move |_| modal.open_modal(CrudModal::View, row.get_value())
                                                >
                                                    "View"
                                                </Button>
                                            </PermissionGate>
                                            <PermissionGate required="alarm:update">
                                                <Button
                                                    size=ButtonSize::Small
                                                    on_click=move |_| modal.open_modal(CrudModal::Edit, row.get_value())
                                                >
                                                    "Edit"
                                                </Button>
                                            </PermissionGate>
                                            <PermissionGate required="alarm:delete">
                                                <Button
                                                    size=ButtonSize::Small
                                                    on_click=move |_| modal.open_modal(CrudModal::Delete, row.get_value())
                                                >
                                                    "Delete"
                                                </Button>
                                            </PermissionGate>
                                        </Flex>
                                    </TableCell>
                                </TableRow>
                            }
                        }
                    />
                </TableBody>
            </Table>

            <div class="pagination">
                <Button size=ButtonSize::Small on_click=move |_| go_to_page(-1)>"‹"</Button>
                <span>
                    {move || {
                        let p = page.get();
                        let current = query.get::<usize>("page").unwrap_or(0);
                        format!(
                            "Page {} of {} ({} alarms)",
                            current.min(p.total_pages - 1) + 1,
                            p.total_pages,
                            p.total_count
                        )
                    }}
                </span>
                <Button size=ButtonSize::Small on_click=move |_| go_to_page(1)>"›"</Button>
            </div>

            {modal_outlet(modal, CrudModal::View, move |alarm: Arc<Alarm>| {
                view! { <AlarmViewModal alarm=alarm /> }
            })}
            {modal_outlet(modal, CrudModal::Edit, move |alarm: Arc<Alarm>| {
                view! { <AlarmEditModal alarm=alarm on_saved=on_changed /> }
            })}
            {modal_outlet(modal, CrudModal::Delete, move |alarm: Arc<Alarm>| {
                view! { <AlarmDeleteModal alarm=alarm on_deleted=on_changed /> }
            })}
        </div>
    }
}
