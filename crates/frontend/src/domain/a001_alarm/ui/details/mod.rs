use contracts::domain::a001_alarm::aggregate::{Alarm, UpdateAlarmDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;
use thaw::*;

use crate::domain::a001_alarm::api;
use crate::shared::modal::Modal;
use crate::shared::modal_url::{expect_modal_controller, CrudModal};

fn close_callback() -> Callback<()> {
    expect_modal_controller::<CrudModal>().on_close()
}

#[component]
pub fn AlarmViewModal(alarm: Arc<Alarm>) -> impl IntoView {
    let on_close = close_callback();
    let title = format!("Alarm {}", alarm.id);

    view! {
        <Modal title=title on_close=on_close>
            <dl class="details-grid">
                <dt>"Asset"</dt>
                <dd>{format!("{} ({})", alarm.asset_name, alarm.asset_id)}</dd>
                <dt>"Severity"</dt>
                <dd>{alarm.severity.display_name()}</dd>
                <dt>"Message"</dt>
                <dd>{alarm.message.clone()}</dd>
                <dt>"Raised"</dt>
                <dd>{alarm.raised_at.format("%Y-%m-%d %H:%M:%S").to_string()}</dd>
                <dt>"Acknowledged"</dt>
                <dd>{if alarm.acknowledged { "Yes" } else { "No" }}</dd>
                <dt>"Note"</dt>
                <dd>{alarm.note.clone().unwrap_or_else(|| "-".to_string())}</dd>
            </dl>
        </Modal>
    }
}

#[component]
pub fn AlarmEditModal(alarm: Arc<Alarm>, on_saved: Callback<()>) -> impl IntoView {
    let on_close = close_callback();
    let title = format!("Edit alarm {}", alarm.id);
    let dto = UpdateAlarmDto::from(alarm.as_ref());
    let id = dto.id.clone();
    let (acknowledged, set_acknowledged) = signal(dto.acknowledged);
    let (note, set_note) = signal(dto.note.unwrap_or_default());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_saving, set_is_saving) = signal(false);

    let save = move || {
        let note_val = note.get_untracked();
        let dto = UpdateAlarmDto {
            id: id.clone(),
            acknowledged: acknowledged.get_untracked(),
            note: if note_val.trim().is_empty() {
                None
            } else {
                Some(note_val)
            },
        };

        set_is_saving.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::update_alarm(dto).await {
                Ok(()) => on_saved.run(()),
                Err(e) => {
                    let _ = set_error_message.try_set(Some(e));
                    let _ = set_is_saving.try_set(false);
                }
            }
        });
    };

    view! {
        <Modal title=title on_close=on_close>
            <Show when=move || error_message.get().is_some()>
                <div class="error-message">
                    {move || error_message.get().unwrap_or_default()}
                </div>
            </Show>

            <p class="alarm-summary">{format!("{}: {}", alarm.asset_name, alarm.message)}</p>

            <div class="form-group">
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || acknowledged.get()
                        on:change=move |ev| set_acknowledged.set(event_target_checked(&ev))
                        disabled=move || is_saving.get()
                    />
                    " Acknowledged"
                </label>
            </div>

            <div class="form-group">
                <label for="alarm-note">"Note"</label>
                <textarea
                    id="alarm-note"
                    prop:value=move || note.get()
                    on:input=move |ev| set_note.set(event_target_value(&ev))
                    disabled=move || is_saving.get()
                ></textarea>
            </div>

            <div class="form-actions">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || is_saving.get())
                    on_click=move |_| save()
                >
                    {move || if is_saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </div>
        </Modal>
    }
}

#[component]
pub fn AlarmDeleteModal(alarm: Arc<Alarm>, on_deleted: Callback<()>) -> impl IntoView {
    let on_close = close_callback();
    let id = StoredValue::new(alarm.id.clone());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_deleting, set_is_deleting) = signal(false);

    let confirm = move || {
        let id = id.get_value();
        set_is_deleting.set(true);
        spawn_local(async move {
            match api::delete_alarm(&id).await {
                Ok(()) => on_deleted.run(()),
                Err(e) => {
                    let _ = set_error_message.try_set(Some(e));
                    let _ = set_is_deleting.try_set(false);
                }
            }
        });
    };

    view! {
        <Modal title="Delete alarm".to_string() on_close=on_close>
            <Show when=move || error_message.get().is_some()>
                <div class="error-message">
                    {move || error_message.get().unwrap_or_default()}
                </div>
            </Show>

            <p>
                {format!(
                    "Delete alarm {} raised on {} at {}?",
                    alarm.id,
                    alarm.asset_name,
                    alarm.raised_at.format("%Y-%m-%d %H:%M"),
                )}
            </p>

            <div class="form-actions">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || is_deleting.get())
                    on_click=move |_| confirm()
                >
                    "Delete"
                </Button>
            </div>
        </Modal>
    }
}
