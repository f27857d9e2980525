use std::rc::Rc;

use chrono::{
  NaiveDate,
  Utc
};
use gloo::timers::future::TimeoutFuture;
use todoscope_core::action::{
  Context,
  dispatch
};
use todoscope_core::binder::perform_effect;
use todoscope_core::dates::ConfiguredDates;
use todoscope_core::session::Session;
use todoscope_core::view::render;
use todoscope_core::{
  Action,
  Effect,
  HttpTaskApi
};
use yew::{
  Callback,
  Html,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_mut_ref,
  use_reducer
};

use crate::components::{
  AddTaskForm,
  ErrorBanner,
  FilterBar,
  Pagination,
  TaskList
};
use crate::settings::UiSettings;

type Api = HttpTaskApi<ConfiguredDates>;

/// Reducer input: a session action, or the launch hook reporting that every
/// effect up to `seq` is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
  Session(Action),
  Launched(u64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEffect {
  pub seq:    u64,
  pub effect: Effect
}

/// Session plus the effects its handlers asked for that have not been
/// launched yet. The reducer stays pure; a hook in [`App`] launches queued
/// effects, reports them with [`Msg::Launched`] and feeds results back.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct AppState {
  pub session:  Session,
  pub queue:    Vec<QueuedEffect>,
  next_effect:  u64
}

impl Reducible for AppState {
  type Action = Msg;

  fn reduce(
    self: Rc<Self>,
    msg: Msg
  ) -> Rc<Self> {
    let mut next = Rc::unwrap_or_clone(self);
    let action = match msg {
      | Msg::Session(action) => action,
      | Msg::Launched(seq) => {
        next
          .queue
          .retain(|queued| queued.seq > seq);
        return Rc::new(next);
      }
    };
    let step = dispatch(
      std::mem::take(&mut next.session),
      action,
      &Context::at(Utc::now())
    );
    next.session = step.session;

    if let Some(effect) = step.effect {
      next.next_effect += 1;
      next.queue.push(QueuedEffect {
        seq: next.next_effect,
        effect
      });
    }

    Rc::new(next)
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let settings = use_memo((), |_| {
    UiSettings::from_document()
  });
  let api = {
    let settings = settings.clone();
    use_memo((), move |_| {
      Api::new(
        settings.endpoint.clone(),
        ConfiguredDates::new(
          settings.date_mode,
          settings.date_window_ms
        )
      )
    })
  };
  let state =
    use_reducer(AppState::default);
  let launched = use_mut_ref(|| 0_u64);

  {
    let dispatcher = state.dispatcher();
    use_effect_with((), move |_| {
      tracing::info!(
        "frontend mounted, loading tasks"
      );
      dispatcher
        .dispatch(Msg::Session(Action::Load));
      || ()
    });
  }

  {
    let dispatcher = state.dispatcher();
    let api = api.clone();
    use_effect_with(
      state.queue.clone(),
      move |queue| {
        let already = *launched.borrow();
        let fresh: Vec<QueuedEffect> = queue
          .iter()
          .filter(|queued| {
            queued.seq > already
          })
          .cloned()
          .collect();

        if let Some(last) = fresh.last() {
          *launched.borrow_mut() =
            last.seq;
          dispatcher
            .dispatch(Msg::Launched(last.seq));
        }

        for queued in fresh {
          let dispatcher =
            dispatcher.clone();
          let api = api.clone();
          tracing::debug!(
            seq = queued.seq,
            effect = ?queued.effect,
            "launching effect"
          );
          wasm_bindgen_futures::spawn_local(
            async move {
              let outcome = perform_effect(
                &*api,
                queued.effect
              )
              .await;
              tracing::debug!(
                kind = outcome.kind().name(),
                "effect finished"
              );
              dispatcher
                .dispatch(Msg::Session(outcome));
            }
          );
        }
        || ()
      }
    );
  }

  {
    let dispatcher = state.dispatcher();
    let timeout_ms =
      settings.banner_timeout_ms();
    let banner_seq = state
      .session
      .banner
      .as_ref()
      .map(|banner| banner.seq);
    use_effect_with(
      banner_seq,
      move |seq| {
        if let Some(seq) = *seq {
          wasm_bindgen_futures::spawn_local(
            async move {
              TimeoutFuture::new(
                timeout_ms
              )
              .await;
              tracing::debug!(
                seq,
                "banner timer elapsed"
              );
              dispatcher.dispatch(
                Msg::Session(
                  Action::DismissError(seq)
                )
              );
            }
          );
        }
        || ()
      }
    );
  }

  let view = render(
    &state.session,
    &settings.binder,
    Utc::now()
  );

  let on_search = {
    let dispatcher = state.dispatcher();
    Callback::from(move |text: String| {
      dispatcher
        .dispatch(Msg::Session(Action::EditSearch(text)));
    })
  };
  let on_from = {
    let dispatcher = state.dispatcher();
    Callback::from(
      move |date: Option<NaiveDate>| {
        dispatcher
          .dispatch(Msg::Session(Action::EditFrom(date)));
      }
    )
  };
  let on_to = {
    let dispatcher = state.dispatcher();
    Callback::from(
      move |date: Option<NaiveDate>| {
        dispatcher
          .dispatch(Msg::Session(Action::EditTo(date)));
      }
    )
  };
  let on_filter = {
    let dispatcher = state.dispatcher();
    Callback::from(move |_: ()| {
      dispatcher
        .dispatch(Msg::Session(Action::ApplyFilter));
    })
  };
  let on_page = {
    let dispatcher = state.dispatcher();
    Callback::from(move |page: usize| {
      dispatcher
        .dispatch(Msg::Session(Action::GoToPage(page)));
    })
  };
  let on_title = {
    let dispatcher = state.dispatcher();
    Callback::from(move |text: String| {
      dispatcher.dispatch(Msg::Session(
        Action::EditNewTitle(text)
      ));
    })
  };
  let on_add = {
    let dispatcher = state.dispatcher();
    Callback::from(move |_: ()| {
      dispatcher
        .dispatch(Msg::Session(Action::AddTask));
    })
  };

  let inputs = &state.session.inputs;

  html! {
      <div class="todoscope">
          <h1>{ "Todos" }</h1>
          <ErrorBanner message={view.banner.clone()} />
          <FilterBar
              search={inputs.search.clone()}
              from={inputs.from}
              to={inputs.to}
              on_search={on_search}
              on_from={on_from}
              on_to={on_to}
              on_filter={on_filter}
          />
          <AddTaskForm
              title={inputs.new_title.clone()}
              on_title={on_title}
              on_add={on_add}
          />
          <TaskList
              rows={view.rows.clone()}
              placeholder={view.placeholder}
          />
          <Pagination
              pages={view.pages.clone()}
              on_page={on_page}
          />
      </div>
  }
}
