pub mod action;
pub mod binder;
pub mod client;
pub mod dates;
pub mod error;
pub mod filter;
pub mod paginate;
pub mod session;
pub mod store;
pub mod task;
pub mod view;

pub use action::{
  Action,
  Effect
};
pub use binder::Binder;
pub use client::{
  DEFAULT_ENDPOINT,
  HttpTaskApi,
  TaskApi
};
pub use error::ClientError;
pub use session::{
  BinderSettings,
  Session
};
pub use task::Task;
pub use view::View;
