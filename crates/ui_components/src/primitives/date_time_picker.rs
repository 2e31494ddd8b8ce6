use std::{iter, rc::Rc};

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use disclosure_headless::{
    datetime::{
        add_months, format_date_time, format_time, parse_time, with_time, CalendarMonth,
        DateRange,
    },
    ChangeHandler, ControllableState,
};

use super::*;
use crate::context::mirror_controllable;

const TRIGGER_CLASS: &str = "w-[240px] justify-start text-left font-normal";

const PANEL_CLASS: &str = "w-auto p-3";

const DAY_CLASS: &str = "h-8 w-8 rounded-md p-0 text-sm font-normal hover:bg-accent hover:text-accent-foreground disabled:pointer-events-none disabled:opacity-50 data-[outside]:text-muted-foreground aria-selected:bg-primary aria-selected:text-primary-foreground";

fn weekday_headers(week_start: Weekday) -> Vec<String> {
    iter::successors(Some(week_start), |day| Some(day.succ()))
        .take(7)
        .map(|day| day.to_string().chars().take(2).collect())
        .collect()
}

/// Value after picking `date`: keeps the selected time of day, pulled into `range`.
fn pick_day(current: Option<NaiveDateTime>, date: NaiveDate, range: DateRange) -> NaiveDateTime {
    let time = current.map_or(NaiveTime::MIN, |value| value.time());
    range.clamp(date.and_time(time))
}

/// Value after typing `HH:MM`; the date falls back to `today` when nothing is selected.
fn pick_time(
    current: Option<NaiveDateTime>,
    input: &str,
    today: NaiveDate,
    range: DateRange,
) -> Result<NaiveDateTime, disclosure_headless::datetime::DateTimeError> {
    let time = parse_time(input)?;
    let date = current.map_or(today, |value| value.date());
    with_time(date, time.hour(), time.minute()).map(|value| range.clamp(value))
}

/// Day reached by paging from `date`: a month per PageUp/PageDown, a year with Shift.
fn page_day(date: NaiveDate, key: &str, shift: bool) -> Option<NaiveDate> {
    let step = if shift { 12 } else { 1 };
    match key {
        "PageUp" => Some(add_months(date, -step)),
        "PageDown" => Some(add_months(date, step)),
        _ => None,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[component]
/// Date and time field: a popover with a month grid and an `HH:MM` input.
///
/// Pass `value` to control it; `min`/`max` bound what can be picked.
pub fn DateTimePicker(
    #[prop(optional, into)] value: Option<MaybeSignal<Option<NaiveDateTime>>>,
    #[prop(optional)] default_value: Option<NaiveDateTime>,
    #[prop(optional)] on_change: Option<Callback<Option<NaiveDateTime>>>,
    #[prop(optional)] min: Option<NaiveDateTime>,
    #[prop(optional)] max: Option<NaiveDateTime>,
    #[prop(default = Weekday::Mon)] week_start: Weekday,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
) -> impl IntoView {
    let on_change = on_change.map(|callback| {
        Rc::new(move |value: &Option<NaiveDateTime>| callback.call(*value))
            as ChangeHandler<Option<NaiveDateTime>>
    });
    let state = ControllableState::new(
        value.as_ref().map(|value| value.get_untracked()),
        default_value,
        on_change,
    );
    let selected = mirror_controllable(&state, value, "DateTimePicker");
    let state = store_value(state);
    let request = Callback::new(move |next: Option<NaiveDateTime>| {
        state.get_value().request_change(next);
    });

    let range = DateRange { min, max };
    let placeholder = placeholder.unwrap_or_else(|| "Pick a date".to_string());
    let label = move || {
        selected
            .get()
            .map(format_date_time)
            .unwrap_or_else(|| placeholder.clone())
    };

    view! {
        <div class="inline-block" data-ui-kind="date-time-picker" {..attrs}>
            <Popover class=part_class("", class.as_deref())>
                <PopoverTrigger
                    class=TRIGGER_CLASS
                    attr:data-ui-slot="date-time-trigger"
                    attr:data-empty=move || selected.get().is_none().then_some("")
                >
                    {label}
                </PopoverTrigger>
                <PopoverContent class=PANEL_CLASS>
                    <CalendarPanel
                        selected=selected.into()
                        request=request
                        range=range
                        week_start=week_start
                    />
                </PopoverContent>
            </Popover>
        </div>
    }
}

#[component]
fn CalendarPanel(
    selected: Signal<Option<NaiveDateTime>>,
    request: Callback<Option<NaiveDateTime>>,
    range: DateRange,
    week_start: Weekday,
) -> impl IntoView {
    let initial = selected.get_untracked().map_or_else(today, |value| value.date());
    let month = create_rw_signal(CalendarMonth::containing(initial));

    let select_day = Callback::new(move |date: NaiveDate| {
        request.call(Some(pick_day(selected.get_untracked(), date, range)));
    });
    let set_time = Callback::new(move |input: String| {
        match pick_time(selected.get_untracked(), &input, today(), range) {
            Ok(value) => request.call(Some(value)),
            Err(err) => logging::warn!("DateTimePicker: {err}"),
        }
    });

    let headers = weekday_headers(week_start)
        .into_iter()
        .map(|label| {
            view! {
                <div class="w-8 text-center text-xs text-muted-foreground" role="columnheader">
                    {label}
                </div>
            }
        })
        .collect_view();

    let days = move || {
        month
            .get()
            .grid(week_start)
            .into_iter()
            .map(|day| {
                let date = day.date;
                let is_selected = move || selected.get().is_some_and(|value| value.date() == date);
                view! {
                    <button
                        type="button"
                        role="gridcell"
                        class=DAY_CLASS
                        disabled=!range.contains_date(date)
                        aria-selected=move || bool_token(is_selected())
                        data-outside=(!day.in_month).then_some("")
                        data-ui-kind="calendar-day"
                        on:click=move |_| select_day.call(date)
                        on:keydown=move |ev: KeyboardEvent| {
                            let Some(target) = page_day(date, &ev.key(), ev.shift_key()) else {
                                return;
                            };
                            ev.prevent_default();
                            month.set(CalendarMonth::containing(target));
                            if range.contains_date(target) {
                                select_day.call(target);
                            }
                        }
                    >
                        {date.day()}
                    </button>
                }
            })
            .collect_view()
    };

    view! {
        <div class="space-y-3" data-ui-kind="calendar">
            <div class="flex items-center justify-between">
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:aria-label="Previous month"
                    on_click=Callback::new(move |_| month.update(|month| *month = month.previous()))
                >
                    "‹"
                </Button>
                <div class="text-sm font-medium" aria-live="polite">
                    {move || month.get().label()}
                </div>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:aria-label="Next month"
                    on_click=Callback::new(move |_| month.update(|month| *month = month.next()))
                >
                    "›"
                </Button>
            </div>
            <div class="grid grid-cols-7 gap-1" role="grid">
                {headers}
                {days}
            </div>
            <div class="flex items-center gap-2">
                <Input
                    input_type="time"
                    aria_label="Time"
                    value=Signal::derive(move || selected.get().map(format_time).unwrap_or_default())
                    on_change=set_time
                />
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    disabled=Signal::derive(move || selected.get().is_none())
                    on_click=Callback::new(move |_| request.call(None))
                >
                    "Clear"
                </Button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid date time")
    }

    #[test]
    fn headers_start_on_configured_weekday() {
        assert_eq!(
            weekday_headers(Weekday::Sun),
            vec!["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
        );
    }

    #[test]
    fn picking_a_day_keeps_the_time() {
        let current = Some(at(2024, 3, 1, 14, 30));
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        assert_eq!(
            pick_day(current, date, DateRange::default()),
            at(2024, 3, 9, 14, 30)
        );
        assert_eq!(
            pick_day(None, date, DateRange::default()),
            at(2024, 3, 9, 0, 0)
        );
    }

    #[test]
    fn picked_values_are_clamped_into_range() {
        let range = DateRange {
            min: Some(at(2024, 3, 9, 9, 0)),
            max: Some(at(2024, 3, 20, 17, 0)),
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        assert_eq!(pick_day(None, date, range), at(2024, 3, 9, 9, 0));

        let late = pick_time(Some(at(2024, 3, 20, 8, 0)), "23:15", date, range);
        assert_eq!(late, Ok(at(2024, 3, 20, 17, 0)));
    }

    #[test]
    fn paging_moves_by_month_and_clamps_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).expect("date");
        assert_eq!(
            page_day(date, "PageDown", false),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            page_day(date, "PageUp", false),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert_eq!(
            page_day(date, "PageUp", true),
            NaiveDate::from_ymd_opt(2023, 1, 31)
        );
        assert_eq!(page_day(date, "ArrowDown", false), None);
    }

    #[test]
    fn typed_time_without_selection_uses_today() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).expect("date");
        assert_eq!(
            pick_time(None, "07:05", today, DateRange::default()),
            Ok(at(2024, 5, 2, 7, 5))
        );
        assert!(pick_time(None, "7 o'clock", today, DateRange::default()).is_err());
    }
}
