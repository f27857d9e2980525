use chrono::NaiveDate;
use todoscope_core::filter::parse_date_bound;
use todoscope_core::task::DATE_FORMAT;
use todoscope_core::view::{
    PageControl,
    Row,
};
use yew::{Callback, Html, Properties, TargetCast, classes, function_component, html};

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: Option<String>,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <div class="error-banner" role="alert">{ message.clone() }</div>
        },
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub search: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub on_search: Callback<String>,
    pub on_from: Callback<Option<NaiveDate>>,
    pub on_to: Callback<Option<NaiveDate>>,
    pub on_filter: Callback<()>,
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Browser date pickers only hand back `YYYY-MM-DD` or an empty string, so a
/// parse failure means the field was cleared mid-edit.
fn date_callback(target: Callback<Option<NaiveDate>>) -> Callback<web_sys::Event> {
    Callback::from(move |e: web_sys::Event| {
        let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() else {
            tracing::warn!("date change event had non-input target");
            return;
        };
        match parse_date_bound(&input.value()) {
            Ok(date) => target.emit(date),
            Err(err) => {
                tracing::warn!(%err, "ignoring malformed date bound");
                target.emit(None);
            }
        }
    })
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let on_search_input = {
        let on_search = props.on_search.clone();
        Callback::from(move |e: web_sys::InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            on_search.emit(input.value());
        })
    };
    let on_filter_click = {
        let on_filter = props.on_filter.clone();
        Callback::from(move |_: web_sys::MouseEvent| on_filter.emit(()))
    };

    html! {
        <div class="filter-bar">
            <input
                id="search"
                type="text"
                placeholder="Search todos"
                value={props.search.clone()}
                oninput={on_search_input}
            />
            <label for="start-date">{ "From" }</label>
            <input
                id="start-date"
                type="date"
                value={date_value(props.from)}
                onchange={date_callback(props.on_from.clone())}
            />
            <label for="end-date">{ "To" }</label>
            <input
                id="end-date"
                type="date"
                value={date_value(props.to)}
                onchange={date_callback(props.on_to.clone())}
            />
            <button id="filter-button" onclick={on_filter_click}>{ "Filter" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AddTaskFormProps {
    pub title: String,
    pub on_title: Callback<String>,
    pub on_add: Callback<()>,
}

#[function_component(AddTaskForm)]
pub fn add_task_form(props: &AddTaskFormProps) -> Html {
    let on_input = {
        let on_title = props.on_title.clone();
        Callback::from(move |e: web_sys::InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            on_title.emit(input.value());
        })
    };
    let on_click = {
        let on_add = props.on_add.clone();
        Callback::from(move |_: web_sys::MouseEvent| on_add.emit(()))
    };

    html! {
        <div class="add-task">
            <input
                id="new-todo-title"
                type="text"
                placeholder="New todo"
                value={props.title.clone()}
                oninput={on_input}
            />
            <button id="add-todo-button" onclick={on_click}>{ "Add" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
    pub rows: Vec<Row>,
    pub placeholder: Option<&'static str>,
}

/// Row ids are not unique: the demo endpoint answers every POST with the
/// same id, so keys pair the id with the row's position.
fn row_key(index: usize, row: &Row) -> String {
    format!("{index}-{}", row.id)
}

#[function_component(TaskList)]
pub fn task_list(props: &TaskListProps) -> Html {
    if let Some(text) = props.placeholder {
        return html! {
            <ul id="todo-list"><li class="placeholder">{ text }</li></ul>
        };
    }

    html! {
        <ul id="todo-list">
            {
                for props.rows.iter().enumerate().map(|(index, row)| html! {
                    <li
                        key={row_key(index, row)}
                        class={classes!("todo", row.completed.then_some("completed"))}
                    >
                        { row.line.clone() }
                    </li>
                })
            }
        </ul>
    }
}

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub pages: Vec<PageControl>,
    pub on_page: Callback<usize>,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let make_link = |control: &PageControl| {
        let on_page = props.on_page.clone();
        let number = control.number;
        let onclick = Callback::from(move |e: web_sys::MouseEvent| {
            e.prevent_default();
            on_page.emit(number);
        });
        html! {
            <a
                href="#"
                key={number}
                class={classes!("page-link", control.active.then_some("active"))}
                {onclick}
            >
                { number }
            </a>
        }
    };

    html! {
        <nav id="pagination">
            { for props.pages.iter().map(make_link) }
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64) -> Row {
        Row {
            id,
            line: format!("Test {id}"),
            completed: false,
        }
    }

    #[test]
    fn repeated_ids_get_distinct_keys() {
        let rows = [row(201), row(201), row(1)];
        let keys: Vec<String> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| row_key(index, row))
            .collect();
        assert_eq!(keys, vec!["0-201", "1-201", "2-1"]);
    }

    #[test]
    fn date_value_formats_or_blanks() {
        assert_eq!(date_value(NaiveDate::from_ymd_opt(2024, 3, 9)), "2024-03-09");
        assert_eq!(date_value(None), "");
    }
}
